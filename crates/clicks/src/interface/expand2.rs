//! Expand 2 Click
//!
//! Microchip MCP23017 16-bit I/O expander. Registers use the power-on
//! `IOCON.BANK = 0` layout, where every port A register is followed by its
//! port B twin. The expander's reset line is on RST (active low).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// 7-bit address with A2..A0 low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

/// Register map (port A addresses; port B is `+ 1`)
pub mod reg {
    /// I/O direction, 1 = input
    pub const IODIR: u8 = 0x00;
    /// Pull-up enable
    pub const GPPU: u8 = 0x0C;
    /// Port value
    pub const GPIO: u8 = 0x12;
    /// Output latch
    pub const OLAT: u8 = 0x14;
}

/// One 8-bit port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Port {
    A,
    B,
}

impl Port {
    const fn register(self, base: u8) -> u8 {
        match self {
            Port::A => base,
            Port::B => base + 1,
        }
    }
}

impl TryFrom<u8> for Port {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Port::A),
            1 => Ok(Port::B),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// Expand 2 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expand2Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Reset (active low)
    pub rst: PinName,
    /// Interrupt A
    pub int: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
}

impl Default for Expand2Config {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            rst: PinName::NC,
            int: PinName::NC,
            speed: I2cSpeed::Standard,
            address: DEFAULT_ADDRESS,
        }
    }
}

impl ClickConfig for Expand2Config {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            scl: pins.scl,
            sda: pins.sda,
            rst: pins.rst,
            int: pins.int,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            scl: self.scl,
            sda: self.sda,
            rst: self.rst,
            int: self.int,
            ..MikrobusPins::default()
        }
    }
}

/// Expand 2 Click driver
#[derive(Debug)]
pub struct Expand2<I, O, D> {
    i2c: I,
    rst: O,
    delay: D,
    address: u8,
}

impl<I, O, D> Expand2<I, O, D>
where
    I: I2c,
    O: OutputPin,
    D: DelayNs,
{
    /// Open the bus and release reset.
    pub fn init<B>(board: &mut B, config: &Expand2Config) -> Result<Self>
    where
        B: Board<I2c = I, Output = O, Delay = D>,
    {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        let rst = board.open_output(config.rst, PinState::High)?;
        Ok(Self::new(i2c, rst, board.delay(), config.address))
    }

    /// Wrap already-open handles.
    pub fn new(i2c: I, rst: O, delay: D, address: u8) -> Self {
        Self {
            i2c,
            rst,
            delay,
            address,
        }
    }

    /// Pulse the reset line; all pins return to inputs.
    pub fn reset(&mut self) -> Result<()> {
        self.rst.set_low().map_err(Error::pin)?;
        self.delay.delay_ms(1);
        self.rst.set_high().map_err(Error::pin)?;
        self.delay.delay_ms(1);
        Ok(())
    }

    /// Set the direction mask of `port` (bit set = input).
    pub fn set_direction(&mut self, port: Port, inputs: u8) -> Result<()> {
        self.write_register(port.register(reg::IODIR), inputs)
    }

    /// Enable the 100 kΩ pull-ups selected by `mask`.
    pub fn set_pull_ups(&mut self, port: Port, mask: u8) -> Result<()> {
        self.write_register(port.register(reg::GPPU), mask)
    }

    /// Read the pin levels of `port`.
    pub fn read_port(&mut self, port: Port) -> Result<u8> {
        self.read_register(port.register(reg::GPIO))
    }

    /// Write the output latch of `port`.
    pub fn write_port(&mut self, port: Port, value: u8) -> Result<()> {
        self.write_register(port.register(reg::OLAT), value)
    }

    /// Drive output `pin` (0..=7) of `port` high.
    pub fn set_pin(&mut self, port: Port, pin: u8) -> Result<()> {
        let mask = pin_mask(pin)?;
        self.update_latch(port, |latch| latch | mask)
    }

    /// Drive output `pin` (0..=7) of `port` low.
    pub fn clear_pin(&mut self, port: Port, pin: u8) -> Result<()> {
        let mask = pin_mask(pin)?;
        self.update_latch(port, |latch| latch & !mask)
    }

    /// Level of `pin` (0..=7) of `port`.
    pub fn pin_state(&mut self, port: Port, pin: u8) -> Result<bool> {
        let mask = pin_mask(pin)?;
        Ok(self.read_port(port)? & mask != 0)
    }

    fn update_latch(&mut self, port: Port, f: impl FnOnce(u8) -> u8) -> Result<()> {
        let register = port.register(reg::OLAT);
        let latch = self.read_register(register)?;
        self.write_register(register, f(latch))
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::i2c)
    }

    fn read_register(&mut self, register: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(Error::i2c)?;
        Ok(buf[0])
    }
}

fn pin_mask(pin: u8) -> Result<u8> {
    if pin > 7 {
        return Err(Error::InvalidArgument);
    }
    Ok(1 << pin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn port_b_registers_follow_port_a() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![0x00, 0xFF]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x01, 0x00]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x15, 0xA5]),
            Transaction::write_read(DEFAULT_ADDRESS, vec![0x12], vec![0x3C]),
        ]);
        let mut rst = PinMock::new(&[]);
        let mut expander = Expand2::new(i2c.clone(), rst.clone(), NoopDelay::new(), DEFAULT_ADDRESS);
        expander.set_direction(Port::A, 0xFF).unwrap();
        expander.set_direction(Port::B, 0x00).unwrap();
        expander.write_port(Port::B, 0xA5).unwrap();
        assert_eq!(expander.read_port(Port::A), Ok(0x3C));
        i2c.done();
        rst.done();
    }

    #[test]
    fn pin_updates_are_read_modify_write() {
        let mut board = MockBoard::new();
        let bus = board.i2c();
        bus.set_register(DEFAULT_ADDRESS, 0x14, &[0b1000_0001]);

        let mut expander =
            Expand2::init(&mut board, &Expand2Config::mikrobus(Socket::Mikrobus1)).unwrap();
        expander.set_pin(Port::A, 3).unwrap();
        assert_eq!(bus.register(DEFAULT_ADDRESS, 0x14), Some(vec![0b1000_1001]));
        expander.clear_pin(Port::A, 7).unwrap();
        assert_eq!(bus.register(DEFAULT_ADDRESS, 0x14), Some(vec![0b0000_1001]));
        assert_eq!(expander.set_pin(Port::A, 8), Err(Error::InvalidArgument));
        assert_eq!(Port::try_from(2), Err(Error::InvalidArgument));
    }

    #[test]
    fn reset_pulses_low() {
        let mut board = MockBoard::new();
        let config = Expand2Config::mikrobus(Socket::Mikrobus2);
        let mut expander = Expand2::init(&mut board, &config).unwrap();
        expander.reset().unwrap();
        assert_eq!(board.pin(config.rst).history(), vec![false, true]);
        assert_eq!(board.delay_handle().elapsed_ms(), 2);
    }
}
