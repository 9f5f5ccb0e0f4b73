//! Ambient 2 Click
//!
//! TI OPT3001 ambient light sensor. The 16-bit result register holds a
//! 4-bit exponent and a 12-bit mantissa: `lux = 0.01 * 2^E * R`.
//!
//! Reference: TI OPT3001 datasheet (SBOS681B)

use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// 7-bit address with ADDR tied to GND.
pub const DEFAULT_ADDRESS: u8 = 0x44;
/// Result register (E[15:12], R[11:0]).
pub const REG_RESULT: u8 = 0x00;
/// Configuration register.
pub const REG_CONFIG: u8 = 0x01;
/// Manufacturer ID register.
pub const REG_MANUFACTURER_ID: u8 = 0x7E;
/// Device ID register.
pub const REG_DEVICE_ID: u8 = 0x7F;
/// Automatic full-scale, 800 ms conversion, continuous mode, latched.
pub const CONFIG_CONTINUOUS: u16 = 0xCE10;
/// "TI" in ASCII.
pub const MANUFACTURER_ID: u16 = 0x5449;
/// OPT3001 device ID.
pub const DEVICE_ID: u16 = 0x3001;

/// Convert a raw result word to lux.
pub fn raw_to_lux(raw: u16) -> f32 {
    let exponent = raw >> 12;
    let mantissa = raw & 0x0FFF;
    0.01 * f32::from(1u16 << exponent.min(15)) * f32::from(mantissa)
}

/// Ambient 2 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ambient2Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Interrupt output (open drain)
    pub int: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
}

impl Default for Ambient2Config {
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

impl ClickConfig for Ambient2Config {
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

/// Ambient 2 Click driver
#[derive(Debug)]
pub struct Ambient2<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Ambient2<I> {
    /// Open the I2C bus.
    pub fn init<B: Board<I2c = I>>(board: &mut B, config: &Ambient2Config) -> Result<Self> {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, config.address))
    }

    /// Wrap an already-open bus.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Start continuous conversions with automatic range selection.
    pub fn default_cfg(&mut self) -> Result<()> {
        self.write_register(REG_CONFIG, CONFIG_CONTINUOUS)
    }

    /// Write a 16-bit register (big endian).
    pub fn write_register(&mut self, register: u8, value: u16) -> Result<()> {
        let [high, low] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[register, high, low])
            .map_err(Error::i2c)
    }

    /// Read a 16-bit register (big endian).
    pub fn read_register(&mut self, register: u8) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(Error::i2c)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// `(manufacturer ID, device ID)`.
    pub fn device_id(&mut self) -> Result<(u16, u16)> {
        let manufacturer = self.read_register(REG_MANUFACTURER_ID)?;
        let device = self.read_register(REG_DEVICE_ID)?;
        Ok((manufacturer, device))
    }

    /// Latest conversion in lux.
    pub fn read_lux(&mut self) -> Result<f32> {
        self.read_register(REG_RESULT).map(raw_to_lux)
    }
}
