//! Proximity Click
//!
//! Vishay VCNL4010 proximity and ambient light sensor with an integrated
//! IR emitter. Both results are 16-bit big-endian register pairs.

use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// Fixed 7-bit address.
pub const DEFAULT_ADDRESS: u8 = 0x13;

/// Register map
pub mod reg {
    /// Command (self-timed enables, on-demand triggers, data-ready flags)
    pub const COMMAND: u8 = 0x80;
    /// Product ID (upper nibble) and revision
    pub const PRODUCT_ID: u8 = 0x81;
    /// Proximity measurement rate
    pub const PROXIMITY_RATE: u8 = 0x82;
    /// IR LED current (10 mA steps)
    pub const LED_CURRENT: u8 = 0x83;
    /// Ambient light parameters
    pub const AMBIENT_PARAMETER: u8 = 0x84;
    /// Ambient light result, high byte
    pub const AMBIENT_RESULT: u8 = 0x85;
    /// Proximity result, high byte
    pub const PROXIMITY_RESULT: u8 = 0x87;
}

/// Self-timed proximity and ambient measurements enabled.
const COMMAND_SELF_TIMED: u8 = 0x07;
/// 3.9 measurements/s.
const RATE_3_9_HZ: u8 = 0x02;
/// 200 mA.
const LED_200_MA: u8 = 20;
/// Continuous conversion, 2 Hz, auto offset, 32 averages.
const AMBIENT_CONTINUOUS: u8 = 0x9D;
/// Product ID in the upper nibble of `PRODUCT_ID`.
pub const PRODUCT_ID: u8 = 0x2;

/// Proximity Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityConfig {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Interrupt output
    pub int: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
}

impl Default for ProximityConfig {
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

impl ClickConfig for ProximityConfig {
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

/// Proximity Click driver
#[derive(Debug)]
pub struct Proximity<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Proximity<I> {
    /// Open the I2C bus.
    pub fn init<B: Board<I2c = I>>(board: &mut B, config: &ProximityConfig) -> Result<Self> {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, config.address))
    }

    /// Wrap an already-open bus.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Enable self-timed proximity and ambient measurements.
    pub fn default_cfg(&mut self) -> Result<()> {
        self.write_register(reg::PROXIMITY_RATE, RATE_3_9_HZ)?;
        self.write_register(reg::LED_CURRENT, LED_200_MA)?;
        self.write_register(reg::AMBIENT_PARAMETER, AMBIENT_CONTINUOUS)?;
        self.write_register(reg::COMMAND, COMMAND_SELF_TIMED)
    }

    /// Write one register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::i2c)
    }

    /// Read one register.
    pub fn read_register(&mut self, register: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(Error::i2c)?;
        Ok(buf[0])
    }

    /// `(product ID, revision)`.
    pub fn product_id(&mut self) -> Result<(u8, u8)> {
        let id = self.read_register(reg::PRODUCT_ID)?;
        Ok((id >> 4, id & 0x0F))
    }

    /// Latest ambient light count.
    pub fn read_ambient(&mut self) -> Result<u16> {
        self.read_word(reg::AMBIENT_RESULT)
    }

    /// Latest proximity count (larger is closer).
    pub fn read_proximity(&mut self) -> Result<u16> {
        self.read_word(reg::PROXIMITY_RESULT)
    }

    fn read_word(&mut self, register: u8) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(Error::i2c)?;
        Ok(u16::from_be_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn default_cfg_enables_self_timed_mode() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![0x82, 0x02]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x83, 20]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x84, 0x9D]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x80, 0x07]),
        ]);
        let mut sensor = Proximity::new(i2c.clone(), DEFAULT_ADDRESS);
        sensor.default_cfg().unwrap();
        i2c.done();
    }

    #[test]
    fn results_are_big_endian() {
        let mut board = MockBoard::new();
        let bus = board.i2c();
        bus.set_register(DEFAULT_ADDRESS, reg::PRODUCT_ID, &[0x21]);
        bus.set_register(DEFAULT_ADDRESS, reg::AMBIENT_RESULT, &[0x01, 0x02]);
        bus.set_register(DEFAULT_ADDRESS, reg::PROXIMITY_RESULT, &[0x0A, 0xF0]);

        let mut sensor =
            Proximity::init(&mut board, &ProximityConfig::mikrobus(Socket::Mikrobus2)).unwrap();
        assert_eq!(sensor.product_id(), Ok((PRODUCT_ID, 1)));
        assert_eq!(sensor.read_ambient(), Ok(0x0102));
        assert_eq!(sensor.read_proximity(), Ok(0x0AF0));
    }
}
