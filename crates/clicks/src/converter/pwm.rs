//! PWM Click
//!
//! PCA9685 16-channel 12-bit PWM controller on I2C with an active-low output
//! enable on CS. All channels share one prescaler; each channel has an ON
//! and an OFF count inside the 4096-tick period.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// Default 7-bit address (A5..A0 low).
pub const DEFAULT_ADDRESS: u8 = 0x40;
/// Number of output channels.
pub const CHANNELS: u8 = 16;
/// Highest ON / OFF count.
pub const MAX_COUNT: u16 = 4095;
/// Internal oscillator (Hz).
pub const OSCILLATOR_HZ: u32 = 25_000_000;
/// Default output frequency (Hz).
pub const DEFAULT_FREQUENCY_HZ: u32 = 50;

/// Register map
#[allow(missing_docs)]
pub mod reg {
    pub const MODE1: u8 = 0x00;
    pub const MODE2: u8 = 0x01;
    pub const LED0_ON_L: u8 = 0x06;
    pub const ALL_LED_ON_L: u8 = 0xFA;
    pub const PRESCALE: u8 = 0xFE;
}

mod mode1 {
    pub const RESTART: u8 = 0x80;
    pub const AUTO_INCREMENT: u8 = 0x20;
    pub const SLEEP: u8 = 0x10;
}

/// MODE2 OUTDRV: totem-pole outputs.
const MODE2_TOTEM_POLE: u8 = 0x04;
/// Full-on / full-off flag in the high count byte.
const FULL: u8 = 0x10;

/// Prescaler value for `hz`, clamped to the hardware range `3..=255`.
pub fn prescale(hz: u32) -> Result<u8> {
    if hz == 0 {
        return Err(Error::InvalidArgument);
    }
    let period = 4096 * u64::from(hz);
    let rounded = (u64::from(OSCILLATOR_HZ) + period / 2) / period;
    let value = rounded.saturating_sub(1).clamp(3, 255);
    u8::try_from(value).map_err(|_| Error::InvalidArgument)
}

/// PWM Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Output enable, active low
    pub oe: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
    /// Output frequency programmed by `default_cfg` (Hz)
    pub frequency: u32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            oe: PinName::NC,
            speed: I2cSpeed::Standard,
            address: DEFAULT_ADDRESS,
            frequency: DEFAULT_FREQUENCY_HZ,
        }
    }
}

impl ClickConfig for PwmConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            scl: pins.scl,
            sda: pins.sda,
            oe: pins.cs,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            scl: self.scl,
            sda: self.sda,
            cs: self.oe,
            ..MikrobusPins::default()
        }
    }
}

/// PWM Click driver
#[derive(Debug)]
pub struct Pwm<I, O, D> {
    i2c: I,
    oe: O,
    delay: D,
    address: u8,
}

impl<I, O, D> Pwm<I, O, D>
where
    I: I2c,
    O: OutputPin,
    D: DelayNs,
{
    /// Open the bus and the output enable (outputs enabled).
    pub fn init<B>(board: &mut B, config: &PwmConfig) -> Result<Self>
    where
        B: Board<I2c = I, Output = O, Delay = D>,
    {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        let oe = board.open_output(config.oe, PinState::Low)?;
        Ok(Self::new(i2c, oe, board.delay(), config.address))
    }

    /// Wrap already-open handles.
    pub fn new(i2c: I, oe: O, delay: D, address: u8) -> Self {
        Self {
            i2c,
            oe,
            delay,
            address,
        }
    }

    /// Program the prescaler for `frequency` and restart the oscillator.
    pub fn default_cfg(&mut self, frequency: u32) -> Result<()> {
        let prescale = prescale(frequency)?;
        self.write(reg::MODE1, &[mode1::SLEEP | mode1::AUTO_INCREMENT])?;
        self.write(reg::PRESCALE, &[prescale])?;
        self.write(reg::MODE2, &[MODE2_TOTEM_POLE])?;
        self.write(reg::MODE1, &[mode1::AUTO_INCREMENT])?;
        // oscillator needs 500 us after leaving sleep
        self.delay.delay_ms(1);
        self.write(reg::MODE1, &[mode1::RESTART | mode1::AUTO_INCREMENT])?;
        log_info!("PCA9685 at {} Hz, prescale {}", frequency, prescale);
        Ok(())
    }

    /// Set the ON and OFF counts of `channel`.
    pub fn set_channel(&mut self, channel: u8, on: u16, off: u16) -> Result<()> {
        if channel >= CHANNELS || on > MAX_COUNT || off > MAX_COUNT {
            return Err(Error::InvalidArgument);
        }
        self.write_counts(reg::LED0_ON_L + 4 * channel, on, off)
    }

    /// Set the ON and OFF counts of every channel at once.
    pub fn set_all(&mut self, on: u16, off: u16) -> Result<()> {
        if on > MAX_COUNT || off > MAX_COUNT {
            return Err(Error::InvalidArgument);
        }
        self.write_counts(reg::ALL_LED_ON_L, on, off)
    }

    /// Drive `channel` at `duty` (`0.0..=1.0`) starting at count 0.
    ///
    /// 0 % and 100 % use the full-off / full-on flags so the output never
    /// glitches.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_duty(&mut self, channel: u8, duty: f32) -> Result<()> {
        if channel >= CHANNELS {
            return Err(Error::InvalidArgument);
        }
        let duty = platform::pwm::check_duty(duty)?;
        let base = reg::LED0_ON_L + 4 * channel;
        if duty >= 1.0 {
            return self.write(base, &[0x00, FULL, 0x00, 0x00]);
        }
        let off = (duty * 4096.0 + 0.5) as u16;
        if off == 0 {
            return self.write(base, &[0x00, 0x00, 0x00, FULL]);
        }
        self.write_counts(base, 0, off.min(MAX_COUNT))
    }

    /// Enable (`true`) or tri-state (`false`) every output.
    pub fn set_output_enable(&mut self, enabled: bool) -> Result<()> {
        self.oe.set_state(PinState::from(!enabled)).map_err(Error::pin)
    }

    fn write_counts(&mut self, base: u8, on: u16, off: u16) -> Result<()> {
        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        self.write(base, &[on_l, on_h, off_l, off_h])
    }

    fn write(&mut self, register: u8, data: &[u8]) -> Result<()> {
        let mut frame = [0u8; 5];
        let len = data.len() + 1;
        frame[0] = register;
        frame[1..len].copy_from_slice(data);
        self.i2c
            .write(self.address, &frame[..len])
            .map_err(Error::i2c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn prescale_values() {
        assert_eq!(prescale(50), Ok(121));
        assert_eq!(prescale(1000), Ok(5));
        assert_eq!(prescale(1), Ok(255));
        assert_eq!(prescale(100_000), Ok(3));
        assert_eq!(prescale(0), Err(Error::InvalidArgument));
    }

    #[test]
    fn default_cfg_sequence() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![0x00, 0x30]),
            Transaction::write(DEFAULT_ADDRESS, vec![0xFE, 121]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x01, 0x04]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x00, 0x20]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x00, 0xA0]),
        ]);
        let mut oe = PinMock::new(&[]);
        let mut pwm = Pwm::new(i2c.clone(), oe.clone(), NoopDelay::new(), DEFAULT_ADDRESS);
        pwm.default_cfg(50).unwrap();
        i2c.done();
        oe.done();
    }

    #[test]
    fn channel_counts_are_little_endian() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![0x0E, 0x00, 0x00, 0x00, 0x08]),
            Transaction::write(DEFAULT_ADDRESS, vec![0xFA, 0x10, 0x00, 0xFF, 0x0F]),
        ]);
        let mut oe = PinMock::new(&[]);
        let mut pwm = Pwm::new(i2c.clone(), oe.clone(), NoopDelay::new(), DEFAULT_ADDRESS);
        pwm.set_channel(2, 0, 2048).unwrap();
        pwm.set_all(16, 4095).unwrap();
        assert_eq!(pwm.set_channel(16, 0, 0), Err(Error::InvalidArgument));
        assert_eq!(pwm.set_channel(0, 0, 4096), Err(Error::InvalidArgument));
        i2c.done();
        oe.done();
    }

    #[test]
    fn duty_extremes_use_full_flags() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![0x06, 0x00, 0x10, 0x00, 0x00]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x06, 0x00, 0x00, 0x00, 0x10]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x0A, 0x00, 0x00, 0x00, 0x04]),
        ]);
        let mut oe = PinMock::new(&[]);
        let mut pwm = Pwm::new(i2c.clone(), oe.clone(), NoopDelay::new(), DEFAULT_ADDRESS);
        pwm.set_duty(0, 1.0).unwrap();
        pwm.set_duty(0, 0.0).unwrap();
        pwm.set_duty(1, 0.25).unwrap();
        assert!(pwm.set_duty(1, 1.5).is_err());
        i2c.done();
        oe.done();
    }

    #[test]
    fn output_enable_is_active_low() {
        let mut oe = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);
        let mut i2c = I2cMock::new(&[]);
        let mut pwm = Pwm::new(i2c.clone(), oe.clone(), NoopDelay::new(), DEFAULT_ADDRESS);
        pwm.set_output_enable(false).unwrap();
        pwm.set_output_enable(true).unwrap();
        i2c.done();
        oe.done();
    }

    #[test]
    fn init_enables_outputs() {
        let mut board = MockBoard::new();
        let config = PwmConfig::mikrobus(Socket::Mikrobus1);
        let mut pwm = Pwm::init(&mut board, &config).unwrap();
        assert!(!board.pin(config.oe).is_set_high());
        pwm.default_cfg(config.frequency).unwrap();
        assert_eq!(board.i2c().register(DEFAULT_ADDRESS, reg::PRESCALE), Some(vec![121]));
        assert_eq!(board.delay_handle().elapsed_ms(), 1);
    }
}
