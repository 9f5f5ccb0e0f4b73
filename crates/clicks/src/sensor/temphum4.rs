//! Temp&Hum 4 Click
//!
//! TI HDC1080 humidity and temperature sensor. A measurement is triggered by
//! writing the result register pointer; the result is read in a separate
//! transaction once the conversion time has elapsed.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// Fixed 7-bit address.
pub const DEFAULT_ADDRESS: u8 = 0x40;
/// Temperature result register.
pub const REG_TEMPERATURE: u8 = 0x00;
/// Humidity result register.
pub const REG_HUMIDITY: u8 = 0x01;
/// Configuration register.
pub const REG_CONFIG: u8 = 0x02;
/// Manufacturer ID register.
pub const REG_MANUFACTURER_ID: u8 = 0xFE;
/// Device ID register.
pub const REG_DEVICE_ID: u8 = 0xFF;
/// Heater off, temperature and humidity in sequence, 14-bit both.
pub const CONFIG_DEFAULT: u16 = 0x1000;
/// Software reset bit of the configuration register.
pub const CONFIG_SOFT_RESET: u16 = 0x8000;
/// Value of the device ID register.
pub const DEVICE_ID: u16 = 0x1050;

/// Worst-case 14-bit conversion plus margin (ms).
const CONVERSION_MS: u32 = 15;

/// Decode a temperature result (°C).
pub fn decode_temperature(raw: u16) -> f32 {
    f32::from(raw) / 65_536.0 * 165.0 - 40.0
}

/// Decode a humidity result (%RH).
pub fn decode_humidity(raw: u16) -> f32 {
    f32::from(raw) / 65_536.0 * 100.0
}

/// Temp&Hum 4 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempHum4Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Data ready (unused by the HDC1080, routed on the board)
    pub int: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
}

impl Default for TempHum4Config {
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

impl ClickConfig for TempHum4Config {
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

/// Temp&Hum 4 Click driver
#[derive(Debug)]
pub struct TempHum4<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> TempHum4<I, D> {
    /// Open the I2C bus.
    pub fn init<B>(board: &mut B, config: &TempHum4Config) -> Result<Self>
    where
        B: Board<I2c = I, Delay = D>,
    {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, board.delay(), config.address))
    }

    /// Wrap already-open handles.
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Write the default configuration (heater off, 14-bit results).
    pub fn default_cfg(&mut self) -> Result<()> {
        self.write_register(REG_CONFIG, CONFIG_DEFAULT)
    }

    /// Reset the configuration register to its power-on value.
    pub fn soft_reset(&mut self) -> Result<()> {
        self.write_register(REG_CONFIG, CONFIG_SOFT_RESET)?;
        self.delay.delay_ms(CONVERSION_MS);
        Ok(())
    }

    /// Device ID (expected [`DEVICE_ID`]).
    pub fn device_id(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_DEVICE_ID], &mut buf)
            .map_err(Error::i2c)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Trigger and read one temperature conversion (°C).
    pub fn read_temperature(&mut self) -> Result<f32> {
        self.measure(REG_TEMPERATURE).map(decode_temperature)
    }

    /// Trigger and read one humidity conversion (%RH).
    pub fn read_humidity(&mut self) -> Result<f32> {
        self.measure(REG_HUMIDITY).map(decode_humidity)
    }

    fn measure(&mut self, register: u8) -> Result<u16> {
        self.i2c
            .write(self.address, &[register])
            .map_err(Error::i2c)?;
        self.delay.delay_ms(CONVERSION_MS);
        let mut buf = [0u8; 2];
        self.i2c.read(self.address, &mut buf).map_err(Error::i2c)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn write_register(&mut self, register: u8, value: u16) -> Result<()> {
        let [high, low] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[register, high, low])
            .map_err(Error::i2c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn decoding() {
        assert!((decode_temperature(0x0000) + 40.0).abs() < 1e-4);
        assert!((decode_temperature(0x8000) - 42.5).abs() < 1e-4);
        assert!((decode_humidity(0x8000) - 50.0).abs() < 1e-4);
        assert!(decode_humidity(0x0000).abs() < 1e-6);
    }

    #[test]
    fn measurement_is_trigger_then_read() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![REG_CONFIG, 0x10, 0x00]),
            Transaction::write(DEFAULT_ADDRESS, vec![REG_TEMPERATURE]),
            Transaction::read(DEFAULT_ADDRESS, vec![0x80, 0x00]),
            Transaction::write(DEFAULT_ADDRESS, vec![REG_HUMIDITY]),
            Transaction::read(DEFAULT_ADDRESS, vec![0x40, 0x00]),
        ]);
        let mut sensor = TempHum4::new(i2c.clone(), NoopDelay::new(), DEFAULT_ADDRESS);
        sensor.default_cfg().unwrap();
        assert!((sensor.read_temperature().unwrap() - 42.5).abs() < 1e-4);
        assert!((sensor.read_humidity().unwrap() - 25.0).abs() < 1e-4);
        i2c.done();
    }

    #[test]
    fn conversion_time_is_waited() {
        let mut board = MockBoard::new();
        let bus = board.i2c();
        bus.set_register(DEFAULT_ADDRESS, REG_DEVICE_ID, &[0x10, 0x50]);
        bus.set_register(DEFAULT_ADDRESS, REG_TEMPERATURE, &[0x66, 0x66]);

        let mut sensor =
            TempHum4::init(&mut board, &TempHum4Config::mikrobus(Socket::Mikrobus1)).unwrap();
        assert_eq!(sensor.device_id(), Ok(DEVICE_ID));
        let celsius = sensor.read_temperature().unwrap();
        assert!((celsius - 26.0).abs() < 0.01);
        assert_eq!(board.delay_handle().elapsed_ms(), u64::from(CONVERSION_MS));
    }
}
