//! Opto Click
//!
//! Four optocoupler channels, each read as a plain input: OUT1 on AN, OUT2
//! on RST, OUT3 on PWM, OUT4 on INT. A channel reads high while its LED side
//! conducts.

use embedded_hal::digital::InputPin;
use platform::{Board, MikrobusPins, PinName};

use crate::config::ClickConfig;
use crate::error::{Error, Result};

/// Optocoupler channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// OUT1
    Out1,
    /// OUT2
    Out2,
    /// OUT3
    Out3,
    /// OUT4
    Out4,
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Channel::Out1),
            2 => Ok(Channel::Out2),
            3 => Ok(Channel::Out3),
            4 => Ok(Channel::Out4),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// Opto Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct OptoConfig {
    pub out1: PinName,
    pub out2: PinName,
    pub out3: PinName,
    pub out4: PinName,
}

impl ClickConfig for OptoConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            out1: pins.an,
            out2: pins.rst,
            out3: pins.pwm,
            out4: pins.int,
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            an: self.out1,
            rst: self.out2,
            pwm: self.out3,
            int: self.out4,
            ..MikrobusPins::default()
        }
    }
}

/// Opto Click driver
#[derive(Debug)]
pub struct Opto<I> {
    outputs: [I; 4],
}

impl<I: InputPin> Opto<I> {
    /// Open the four channel inputs.
    pub fn init<B: Board<Input = I>>(board: &mut B, config: &OptoConfig) -> Result<Self> {
        Ok(Self::new([
            board.open_input(config.out1)?,
            board.open_input(config.out2)?,
            board.open_input(config.out3)?,
            board.open_input(config.out4)?,
        ]))
    }

    /// Wrap already-open inputs, OUT1 first.
    pub fn new(outputs: [I; 4]) -> Self {
        Self { outputs }
    }

    /// `true` while `channel` conducts.
    pub fn channel(&mut self, channel: Channel) -> Result<bool> {
        let [out1, out2, out3, out4] = &mut self.outputs;
        let pin = match channel {
            Channel::Out1 => out1,
            Channel::Out2 => out2,
            Channel::Out3 => out3,
            Channel::Out4 => out4,
        };
        pin.is_high().map_err(Error::pin)
    }

    /// All channels as a bit mask, OUT1 in bit 0.
    pub fn channels(&mut self) -> Result<u8> {
        let mut mask = 0;
        for (bit, pin) in self.outputs.iter_mut().enumerate() {
            if pin.is_high().map_err(Error::pin)? {
                mask |= 1 << bit;
            }
        }
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn channel_reads_its_own_pin() {
        let mut out3 = PinMock::new(&[Transaction::get(State::High)]);
        let mut idle = PinMock::new(&[]);
        let mut opto = Opto::new([idle.clone(), idle.clone(), out3.clone(), idle.clone()]);
        assert!(opto.channel(Channel::try_from(3).unwrap()).unwrap());
        assert_eq!(Channel::try_from(5), Err(Error::InvalidArgument));
        out3.done();
        idle.done();
    }

    #[test]
    fn channels_pack_into_mask() {
        let mut board = MockBoard::new();
        let pins = Socket::Mikrobus2.pins();
        let mut opto = Opto::init(&mut board, &OptoConfig::mikrobus(Socket::Mikrobus2)).unwrap();
        board.pin(pins.an).set_level(true);
        board.pin(pins.int).set_level(true);
        assert_eq!(opto.channels().unwrap(), 0b1001);
        assert!(!opto.channel(Channel::Out2).unwrap());
    }
}
