//! Accel Click
//!
//! Analog Devices ADXL345 3-axis accelerometer on 4-wire SPI (mode 3).
//! The first byte of a frame is `R/W | MB | A5..A0`; multi-byte reads set
//! MB so the address auto-increments.

use embedded_hal::spi::{Operation, SpiDevice};
use platform::{Board, MikrobusPins, PinName, SpiMode};

use crate::config::{spi_bus, ClickConfig};
use crate::error::{Error, Result};

/// Read flag of the command byte.
const READ: u8 = 0x80;
/// Multi-byte flag of the command byte.
const MULTI_BYTE: u8 = 0x40;

/// Register map
pub mod reg {
    /// Device ID
    pub const DEVID: u8 = 0x00;
    /// Data rate and power mode
    pub const BW_RATE: u8 = 0x2C;
    /// Power-saving features
    pub const POWER_CTL: u8 = 0x2D;
    /// Data format
    pub const DATA_FORMAT: u8 = 0x31;
    /// X-axis data 0 (six data bytes follow, little endian)
    pub const DATAX0: u8 = 0x32;
}

/// Value of the device ID register.
pub const DEVICE_ID: u8 = 0xE5;
/// 100 Hz output data rate.
const BW_RATE_100HZ: u8 = 0x0A;
/// Measurement mode.
const POWER_CTL_MEASURE: u8 = 0x08;
/// Full resolution, ±2 g, 4-wire SPI, right-justified.
const DATA_FORMAT_FULL_RES: u8 = 0x08;
/// Scale in full-resolution mode (g/LSB).
pub const SCALE_G_PER_LSB: f32 = 0.0039;

/// Raw acceleration sample (LSB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct Axes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Axes {
    /// Sample scaled to g.
    pub fn to_g(self) -> (f32, f32, f32) {
        (
            f32::from(self.x) * SCALE_G_PER_LSB,
            f32::from(self.y) * SCALE_G_PER_LSB,
            f32::from(self.z) * SCALE_G_PER_LSB,
        )
    }
}

/// Accel Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelConfig {
    /// SPI clock
    pub sck: PinName,
    /// SPI data in
    pub miso: PinName,
    /// SPI data out
    pub mosi: PinName,
    /// Chip select
    pub cs: PinName,
    /// Interrupt 1
    pub int: PinName,
    /// SPI clock (Hz, 5 MHz max)
    pub frequency: u32,
    /// SPI mode
    pub mode: SpiMode,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            sck: PinName::NC,
            miso: PinName::NC,
            mosi: PinName::NC,
            cs: PinName::NC,
            int: PinName::NC,
            frequency: platform::config::SPI_DEFAULT_HZ,
            mode: SpiMode::Mode3,
        }
    }
}

impl ClickConfig for AccelConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            sck: pins.sck,
            miso: pins.miso,
            mosi: pins.mosi,
            cs: pins.cs,
            int: pins.int,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            sck: self.sck,
            miso: self.miso,
            mosi: self.mosi,
            cs: self.cs,
            int: self.int,
            ..MikrobusPins::default()
        }
    }
}

/// Accel Click driver
#[derive(Debug)]
pub struct Accel<S> {
    spi: S,
}

impl<S: SpiDevice> Accel<S> {
    /// Open the SPI device.
    pub fn init<B: Board<Spi = S>>(board: &mut B, config: &AccelConfig) -> Result<Self> {
        let spi = board.open_spi(&spi_bus(
            (config.sck, config.miso, config.mosi, config.cs),
            config.frequency,
            config.mode,
        ))?;
        Ok(Self::new(spi))
    }

    /// Wrap an already-open SPI device.
    pub fn new(spi: S) -> Self {
        Self { spi }
    }

    /// Check the device ID, then start 100 Hz full-resolution measurement.
    pub fn default_cfg(&mut self) -> Result<()> {
        let id = self.device_id()?;
        if id != DEVICE_ID {
            log_warn!("ADXL345 device id {}", id);
            return Err(Error::Device(id));
        }
        self.write_register(reg::BW_RATE, BW_RATE_100HZ)?;
        self.write_register(reg::DATA_FORMAT, DATA_FORMAT_FULL_RES)?;
        self.write_register(reg::POWER_CTL, POWER_CTL_MEASURE)
    }

    /// Device ID (expected [`DEVICE_ID`]).
    pub fn device_id(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_registers(reg::DEVID, &mut buf)?;
        Ok(buf[0])
    }

    /// Write one register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.spi.write(&[register & 0x3F, value]).map_err(Error::spi)
    }

    /// Burst-read consecutive registers starting at `register`.
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<()> {
        let command = READ | MULTI_BYTE | (register & 0x3F);
        self.spi
            .transaction(&mut [Operation::Write(&[command]), Operation::Read(buf)])
            .map_err(Error::spi)
    }

    /// Latest sample of all three axes.
    pub fn read_axes(&mut self) -> Result<Axes> {
        let mut buf = [0u8; 6];
        self.read_registers(reg::DATAX0, &mut buf)?;
        let [x0, x1, y0, y1, z0, z1] = buf;
        Ok(Axes {
            x: i16::from_le_bytes([x0, x1]),
            y: i16::from_le_bytes([y0, y1]),
            z: i16::from_le_bytes([z0, z1]),
        })
    }
}
