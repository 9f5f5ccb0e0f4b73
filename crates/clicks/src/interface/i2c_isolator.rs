//! I2C Isolator Click
//!
//! Galvanically isolated I2C repeater. The board has no registers of its
//! own, so the driver forwards raw transactions to whatever slave sits on
//! the isolated side.

use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// I2C Isolator Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cIsolatorConfig {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Address of the slave behind the isolator
    pub address: u8,
}

impl Default for I2cIsolatorConfig {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            speed: I2cSpeed::Standard,
            address: 0x00,
        }
    }
}

impl ClickConfig for I2cIsolatorConfig {
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

/// I2C Isolator Click driver
#[derive(Debug)]
pub struct I2cIsolator<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cIsolator<I> {
    /// Open the I2C bus.
    pub fn init<B: Board<I2c = I>>(board: &mut B, config: &I2cIsolatorConfig) -> Result<Self> {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, config.address))
    }

    /// Wrap an already-open bus.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Retarget the slave address.
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Write `data` to the slave.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.i2c.write(self.address, data).map_err(Error::i2c)
    }

    /// Fill `buf` from the slave.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.i2c.read(self.address, buf).map_err(Error::i2c)
    }

    /// Write `data` then read `buf` with a repeated start.
    pub fn write_read(&mut self, data: &[u8], buf: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(self.address, data, buf)
            .map_err(Error::i2c)
    }
}
