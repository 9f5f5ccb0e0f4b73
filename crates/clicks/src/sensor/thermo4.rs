//! Thermo 4 Click
//!
//! NXP LM75A digital thermometer with an over-temperature shutdown output
//! routed to INT. Temperature is an 11-bit two's complement value in the
//! upper bits of a 16-bit register (0.125 °C/LSB); the TOS and THYST limits
//! are 9-bit (0.5 °C/LSB).

use embedded_hal::digital::InputPin;
use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// 7-bit address with A2..A0 low.
pub const DEFAULT_ADDRESS: u8 = 0x48;
/// Temperature register.
pub const REG_TEMPERATURE: u8 = 0x00;
/// Configuration register.
pub const REG_CONFIG: u8 = 0x01;
/// Hysteresis register.
pub const REG_HYSTERESIS: u8 = 0x02;
/// Over-temperature shutdown register.
pub const REG_OVERTEMP: u8 = 0x03;

/// Limits accepted by TOS / THYST (°C).
const LIMIT_RANGE: core::ops::RangeInclusive<f32> = -55.0..=125.0;

/// Decode the temperature register.
pub fn decode_temperature(raw: [u8; 2]) -> f32 {
    f32::from(i16::from_be_bytes(raw) >> 5) * 0.125
}

/// Decode a TOS / THYST register.
pub fn decode_limit(raw: [u8; 2]) -> f32 {
    f32::from(i16::from_be_bytes(raw) >> 7) * 0.5
}

/// Encode a TOS / THYST limit, rounded to the nearest 0.5 °C.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_limit(celsius: f32) -> Result<[u8; 2]> {
    if !LIMIT_RANGE.contains(&celsius) {
        return Err(Error::InvalidArgument);
    }
    let half_degrees = celsius * 2.0;
    let rounded = if half_degrees < 0.0 {
        (half_degrees - 0.5) as i16
    } else {
        (half_degrees + 0.5) as i16
    };
    Ok((rounded << 7).to_be_bytes())
}

/// OS output polarity and mode bits of the configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OsMode {
    /// OS asserted while above TOS, released below THYST
    Comparator,
    /// OS pulses on each crossing until the temperature is read
    Interrupt,
}

/// Thermo 4 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thermo4Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Over-temperature output (active low)
    pub int: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
}

impl Default for Thermo4Config {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            int: PinName::NC,
            speed: I2cSpeed::Standard,
            address: DEFAULT_ADDRESS,
        }
    }
}

impl ClickConfig for Thermo4Config {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            scl: pins.scl,
            sda: pins.sda,
            int: pins.int,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            scl: self.scl,
            sda: self.sda,
            int: self.int,
            ..MikrobusPins::default()
        }
    }
}

/// Thermo 4 Click driver
#[derive(Debug)]
pub struct Thermo4<I, P> {
    i2c: I,
    os: P,
    address: u8,
}

impl<I: I2c, P: InputPin> Thermo4<I, P> {
    /// Open the I2C bus and the OS input.
    pub fn init<B>(board: &mut B, config: &Thermo4Config) -> Result<Self>
    where
        B: Board<I2c = I, Input = P>,
    {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        let os = board.open_input(config.int)?;
        Ok(Self::new(i2c, os, config.address))
    }

    /// Wrap already-open handles.
    pub fn new(i2c: I, os: P, address: u8) -> Self {
        Self { i2c, os, address }
    }

    /// Temperature in °C.
    pub fn read_temperature(&mut self) -> Result<f32> {
        self.read_pair(REG_TEMPERATURE).map(decode_temperature)
    }

    /// Program the over-temperature shutdown threshold (°C).
    pub fn set_overtemp(&mut self, celsius: f32) -> Result<()> {
        let raw = encode_limit(celsius)?;
        self.write_pair(REG_OVERTEMP, raw)
    }

    /// Program the hysteresis threshold at which OS is released (°C).
    pub fn set_hysteresis(&mut self, celsius: f32) -> Result<()> {
        let raw = encode_limit(celsius)?;
        self.write_pair(REG_HYSTERESIS, raw)
    }

    /// `(overtemp, hysteresis)` in °C.
    pub fn limits(&mut self) -> Result<(f32, f32)> {
        let tos = self.read_pair(REG_OVERTEMP).map(decode_limit)?;
        let thyst = self.read_pair(REG_HYSTERESIS).map(decode_limit)?;
        Ok((tos, thyst))
    }

    /// Select comparator or interrupt OS mode (active low, 1 fault).
    pub fn set_os_mode(&mut self, mode: OsMode) -> Result<()> {
        let bits = match mode {
            OsMode::Comparator => 0x00,
            OsMode::Interrupt => 0x02,
        };
        self.i2c
            .write(self.address, &[REG_CONFIG, bits])
            .map_err(Error::i2c)
    }

    /// Whether the OS output is asserted.
    pub fn os_active(&mut self) -> Result<bool> {
        self.os.is_low().map_err(Error::pin)
    }

    fn read_pair(&mut self, register: u8) -> Result<[u8; 2]> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(Error::i2c)?;
        Ok(buf)
    }

    fn write_pair(&mut self, register: u8, [high, low]: [u8; 2]) -> Result<()> {
        self.i2c
            .write(self.address, &[register, high, low])
            .map_err(Error::i2c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn temperature_decoding() {
        assert!((decode_temperature([0x7F, 0x00]) - 127.0).abs() < 1e-6);
        assert!((decode_temperature([0x19, 0x00]) - 25.0).abs() < 1e-6);
        assert!((decode_temperature([0x00, 0x20]) - 0.125).abs() < 1e-6);
        assert!((decode_temperature([0xFF, 0xE0]) + 0.125).abs() < 1e-6);
        assert!((decode_temperature([0xC9, 0x20]) + 54.875).abs() < 1e-6);
    }

    #[test]
    fn limit_encoding() {
        assert_eq!(encode_limit(80.0), Ok([0x50, 0x00]));
        assert_eq!(encode_limit(75.5), Ok([0x4B, 0x80]));
        assert_eq!(encode_limit(-25.0), Ok([0xE7, 0x00]));
        assert_eq!(encode_limit(130.0), Err(Error::InvalidArgument));
        assert_eq!(encode_limit(f32::NAN), Err(Error::InvalidArgument));
        assert!((decode_limit([0x4B, 0x80]) - 75.5).abs() < 1e-6);
    }

    #[test]
    fn limits_are_written_to_their_registers() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![REG_OVERTEMP, 0x50, 0x00]),
            Transaction::write(DEFAULT_ADDRESS, vec![REG_HYSTERESIS, 0x4B, 0x00]),
        ]);
        let mut os = PinMock::new(&[PinTransaction::get(State::Low)]);
        let mut sensor = Thermo4::new(i2c.clone(), os.clone(), DEFAULT_ADDRESS);
        sensor.set_overtemp(80.0).unwrap();
        sensor.set_hysteresis(75.0).unwrap();
        assert_eq!(sensor.set_overtemp(-60.0), Err(Error::InvalidArgument));
        assert_eq!(sensor.os_active(), Ok(true));
        i2c.done();
        os.done();
    }

    #[test]
    fn reads_through_board() {
        let mut board = MockBoard::new();
        let config = Thermo4Config::mikrobus(Socket::Mikrobus1);
        board
            .i2c()
            .set_register(DEFAULT_ADDRESS, REG_TEMPERATURE, &[0x19, 0x80]);
        board.pin(config.int).set_level(true);

        let mut sensor = Thermo4::init(&mut board, &config).unwrap();
        let celsius = sensor.read_temperature().unwrap();
        assert!((celsius - 25.5).abs() < 1e-6);
        assert_eq!(sensor.os_active(), Ok(false));

        sensor.set_overtemp(90.0).unwrap();
        sensor.set_hysteresis(85.0).unwrap();
        let (tos, thyst) = sensor.limits().unwrap();
        assert!((tos - 90.0).abs() < 1e-6);
        assert!((thyst - 85.0).abs() < 1e-6);
    }
}
