//! Current 2 Click
//!
//! High-side shunt amplifier digitised by a Microchip MCP3221 12-bit I2C
//! ADC. The ADC has no register pointer: every 2-byte read returns the
//! latest conversion (`0000 D11..D8 | D7..D0`).
//!
//! The zero-current output is board dependent; [`Current2::calib_offset`]
//! samples it with no load connected and later readings are taken relative
//! to it.

use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::converter::code_to_voltage;
use crate::error::{Error, Result};

/// MCP3221A5 7-bit address.
pub const DEFAULT_ADDRESS: u8 = 0x4D;
/// ADC reference (VDD, V).
pub const VREF: f32 = 3.3;
/// Resolution in bits.
pub const RESOLUTION_BITS: u8 = 12;
/// Amplifier gain (V/V).
pub const AMPLIFIER_GAIN: f32 = 50.0;
/// Shunt resistance (Ω).
pub const SHUNT_OHMS: f32 = 0.005;
/// Suggested sample count for [`Current2::calib_offset`].
pub const DEFAULT_CALIBRATION_SAMPLES: u16 = 16;

/// Current 2 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Current2Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
}

impl Default for Current2Config {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            speed: I2cSpeed::Standard,
            address: DEFAULT_ADDRESS,
        }
    }
}

impl ClickConfig for Current2Config {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            scl: pins.scl,
            sda: pins.sda,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            scl: self.scl,
            sda: self.sda,
            ..MikrobusPins::default()
        }
    }
}

/// Current 2 Click driver
#[derive(Debug)]
pub struct Current2<I> {
    i2c: I,
    address: u8,
    offset: f32,
}

impl<I: I2c> Current2<I> {
    /// Open the I2C bus.
    pub fn init<B: Board<I2c = I>>(board: &mut B, config: &Current2Config) -> Result<Self> {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, config.address))
    }

    /// Wrap an already-open bus, with a zero offset.
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            offset: 0.0,
        }
    }

    /// Latest 12-bit conversion.
    pub fn read_raw(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.i2c.read(self.address, &mut buf).map_err(Error::i2c)?;
        let [high, low] = buf;
        Ok((u16::from(high & 0x0F) << 8) | u16::from(low))
    }

    /// Latest conversion in volts at the amplifier output.
    pub fn read_voltage(&mut self) -> Result<f32> {
        let raw = self.read_raw()?;
        code_to_voltage(raw, VREF, RESOLUTION_BITS)
    }

    /// Average `samples` readings and store them as the zero-current
    /// offset (V). Run with no load connected.
    pub fn calib_offset(&mut self, samples: u16) -> Result<f32> {
        if samples == 0 {
            return Err(Error::InvalidArgument);
        }
        let mut sum = 0.0;
        for _ in 0..samples {
            sum += self.read_voltage()?;
        }
        self.offset = sum / f32::from(samples);
        log_info!("current 2 offset {} V", self.offset);
        Ok(self.offset)
    }

    /// Stored zero-current offset (V).
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Load current in mA, relative to the stored offset.
    pub fn read_current(&mut self) -> Result<f32> {
        let volts = self.read_voltage()? - self.offset;
        Ok(volts / (AMPLIFIER_GAIN * SHUNT_OHMS) * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn raw_masks_upper_nibble() {
        let mut i2c = I2cMock::new(&[Transaction::read(DEFAULT_ADDRESS, vec![0xF8, 0x00])]);
        let mut sensor = Current2::new(i2c.clone(), DEFAULT_ADDRESS);
        assert_eq!(sensor.read_raw(), Ok(0x0800));
        i2c.done();
    }

    #[test]
    fn offset_is_average_of_samples() {
        let mut board = MockBoard::new();
        let bus = board.i2c();
        // codes 0x400 and 0x402
        bus.queue_read(DEFAULT_ADDRESS, &[0x04, 0x00]);
        bus.queue_read(DEFAULT_ADDRESS, &[0x04, 0x02]);

        let mut sensor =
            Current2::init(&mut board, &Current2Config::mikrobus(Socket::Mikrobus1)).unwrap();
        let offset = sensor.calib_offset(2).unwrap();
        assert!((offset - code_to_voltage(0x401, VREF, 12).unwrap()).abs() < 1e-6);
        assert!((sensor.offset() - offset).abs() < f32::EPSILON);
        assert_eq!(sensor.calib_offset(0), Err(Error::InvalidArgument));
    }

    #[test]
    fn current_is_relative_to_offset() {
        let mut board = MockBoard::new();
        let bus = board.i2c();
        bus.queue_read(DEFAULT_ADDRESS, &[0x04, 0x00]);
        // 0x600: offset + 0x200 codes = 0.4125 V at the amplifier
        bus.queue_read(DEFAULT_ADDRESS, &[0x06, 0x00]);

        let mut sensor =
            Current2::init(&mut board, &Current2Config::mikrobus(Socket::Mikrobus1)).unwrap();
        sensor.calib_offset(1).unwrap();
        let milliamps = sensor.read_current().unwrap();
        assert!((milliamps - 1650.0).abs() < 0.5);
    }
}
