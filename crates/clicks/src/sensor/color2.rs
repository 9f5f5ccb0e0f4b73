//! Color 2 Click
//!
//! Intersil ISL29125 RGB light sensor. In RGB mode the three 16-bit
//! channels are stored little endian from 0x09 in green, red, blue order.

use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// Fixed 7-bit address.
pub const DEFAULT_ADDRESS: u8 = 0x44;
/// Device ID register.
pub const REG_DEVICE_ID: u8 = 0x00;
/// Configuration 1 (mode, range, resolution).
pub const REG_CONFIG1: u8 = 0x01;
/// Status register.
pub const REG_STATUS: u8 = 0x08;
/// Green channel, low byte.
pub const REG_GREEN_LOW: u8 = 0x09;
/// Value of the device ID register.
pub const DEVICE_ID: u8 = 0x7D;
/// RGB mode, 375 lux range, 16-bit ADC.
pub const CONFIG1_RGB: u8 = 0x05;
/// Conversion done flag in the status register.
pub const STATUS_CONVERSION_DONE: u8 = 0x02;

/// One RGB sample (raw counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct Rgb {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Color 2 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color2Config {
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

impl Default for Color2Config {
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

impl ClickConfig for Color2Config {
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

/// Color 2 Click driver
#[derive(Debug)]
pub struct Color2<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Color2<I> {
    /// Open the I2C bus.
    pub fn init<B: Board<I2c = I>>(board: &mut B, config: &Color2Config) -> Result<Self> {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, config.address))
    }

    /// Wrap an already-open bus.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check the device ID and switch to continuous RGB conversion.
    pub fn default_cfg(&mut self) -> Result<()> {
        let id = self.read_register(REG_DEVICE_ID)?;
        if id != DEVICE_ID {
            log_warn!("ISL29125 device id {}", id);
            return Err(Error::Device(id));
        }
        self.write_register(REG_CONFIG1, CONFIG1_RGB)
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

    /// Whether a new RGB conversion has completed.
    pub fn conversion_done(&mut self) -> Result<bool> {
        Ok(self.read_register(REG_STATUS)? & STATUS_CONVERSION_DONE != 0)
    }

    /// Read all three channels in one burst.
    pub fn read_rgb(&mut self) -> Result<Rgb> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_GREEN_LOW], &mut buf)
            .map_err(Error::i2c)?;
        let [gl, gh, rl, rh, bl, bh] = buf;
        Ok(Rgb {
            red: u16::from_le_bytes([rl, rh]),
            green: u16::from_le_bytes([gl, gh]),
            blue: u16::from_le_bytes([bl, bh]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn burst_order_is_green_red_blue() {
        let mut i2c = I2cMock::new(&[Transaction::write_read(
            DEFAULT_ADDRESS,
            vec![REG_GREEN_LOW],
            vec![0x34, 0x12, 0x78, 0x56, 0xBC, 0x9A],
        )]);
        let mut sensor = Color2::new(i2c.clone(), DEFAULT_ADDRESS);
        assert_eq!(
            sensor.read_rgb(),
            Ok(Rgb {
                red: 0x5678,
                green: 0x1234,
                blue: 0x9ABC
            })
        );
        i2c.done();
    }

    #[test]
    fn default_cfg_checks_identity() {
        let mut board = MockBoard::new();
        board.i2c().set_register(DEFAULT_ADDRESS, REG_DEVICE_ID, &[DEVICE_ID]);
        let mut sensor =
            Color2::init(&mut board, &Color2Config::mikrobus(Socket::Mikrobus1)).unwrap();
        sensor.default_cfg().unwrap();
        assert_eq!(
            board.i2c().register(DEFAULT_ADDRESS, REG_CONFIG1),
            Some(vec![CONFIG1_RGB])
        );
    }

    #[test]
    fn wrong_identity_is_rejected() {
        let mut i2c = I2cMock::new(&[Transaction::write_read(
            DEFAULT_ADDRESS,
            vec![REG_DEVICE_ID],
            vec![0x00],
        )]);
        let mut sensor = Color2::new(i2c.clone(), DEFAULT_ADDRESS);
        assert_eq!(sensor.default_cfg(), Err(Error::Device(0x00)));
        i2c.done();
    }
}
