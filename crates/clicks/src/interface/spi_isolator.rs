//! SPI Isolator Click
//!
//! Four-channel digital isolator carrying SCK, MOSI, MISO and CS across the
//! barrier. Transactions are forwarded unchanged.

use embedded_hal::spi::{Operation, SpiDevice};
use platform::{Board, MikrobusPins, PinName, SpiMode};

use crate::config::{spi_bus, ClickConfig};
use crate::error::{Error, Result};

/// SPI Isolator Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct SpiIsolatorConfig {
    pub sck: PinName,
    pub miso: PinName,
    pub mosi: PinName,
    pub cs: PinName,
    /// SPI clock (Hz)
    pub frequency: u32,
    /// SPI mode of the device behind the isolator
    pub mode: SpiMode,
}

impl Default for SpiIsolatorConfig {
    fn default() -> Self {
        Self {
            sck: PinName::NC,
            miso: PinName::NC,
            mosi: PinName::NC,
            cs: PinName::NC,
            frequency: platform::config::SPI_DEFAULT_HZ,
            mode: SpiMode::Mode0,
        }
    }
}

impl ClickConfig for SpiIsolatorConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            sck: pins.sck,
            miso: pins.miso,
            mosi: pins.mosi,
            cs: pins.cs,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            sck: self.sck,
            miso: self.miso,
            mosi: self.mosi,
            cs: self.cs,
            ..MikrobusPins::default()
        }
    }
}

/// SPI Isolator Click driver
#[derive(Debug)]
pub struct SpiIsolator<S> {
    spi: S,
}

impl<S: SpiDevice> SpiIsolator<S> {
    /// Open the SPI device.
    pub fn init<B: Board<Spi = S>>(board: &mut B, config: &SpiIsolatorConfig) -> Result<Self> {
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

    /// Write `data` in one chip-select frame.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.spi.write(data).map_err(Error::spi)
    }

    /// Write `command`, then read `buf` in the same frame.
    pub fn read(&mut self, command: &[u8], buf: &mut [u8]) -> Result<()> {
        self.spi
            .transaction(&mut [Operation::Write(command), Operation::Read(buf)])
            .map_err(Error::spi)
    }

    /// Full-duplex exchange; `buf` is replaced by the received bytes.
    pub fn transfer(&mut self, buf: &mut [u8]) -> Result<()> {
        self.spi.transfer_in_place(buf).map_err(Error::spi)
    }
}
