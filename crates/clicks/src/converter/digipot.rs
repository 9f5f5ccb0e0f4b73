//! DIGI POT Click
//!
//! MCP4161 single 8-bit (257-step) digital potentiometer on SPI. Commands
//! address volatile wiper 0:
//!
//! | Command   | Frame                          |
//! |-----------|--------------------------------|
//! | write     | `0000 00 D8 D7..D0` (16 bit)   |
//! | read      | `0000 11 xx xxxxxxxx` (16 bit) |
//! | increment | `0000 0100` (8 bit)            |
//! | decrement | `0000 1000` (8 bit)            |

use embedded_hal::spi::SpiDevice;
use platform::{Board, MikrobusPins, PinName, SpiMode};

use crate::config::{spi_bus, ClickConfig};
use crate::error::{Error, Result};

/// Highest wiper position (full scale, terminal A).
pub const MAX_WIPER: u16 = 256;
/// Mid-scale position after power-on reset.
pub const MID_SCALE: u16 = 128;

const CMD_WRITE: u8 = 0x00;
const CMD_INCREMENT: u8 = 0x04;
const CMD_DECREMENT: u8 = 0x08;
const CMD_READ: u8 = 0x0C;

/// DIGI POT Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct DigipotConfig {
    pub sck: PinName,
    pub miso: PinName,
    pub mosi: PinName,
    pub cs: PinName,
    /// SPI clock (Hz)
    pub frequency: u32,
    /// SPI mode
    pub mode: SpiMode,
}

impl Default for DigipotConfig {
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

impl ClickConfig for DigipotConfig {
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

/// DIGI POT Click driver
#[derive(Debug)]
pub struct Digipot<S> {
    spi: S,
}

impl<S: SpiDevice> Digipot<S> {
    /// Open the SPI device.
    pub fn init<B: Board<Spi = S>>(board: &mut B, config: &DigipotConfig) -> Result<Self> {
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

    /// Move the wiper to `position` (`0..=256`).
    pub fn set_wiper(&mut self, position: u16) -> Result<()> {
        if position > MAX_WIPER {
            return Err(Error::InvalidArgument);
        }
        let [high, low] = position.to_be_bytes();
        self.spi
            .write(&[CMD_WRITE | (high & 0x01), low])
            .map_err(Error::spi)
    }

    /// Current wiper position.
    pub fn wiper(&mut self) -> Result<u16> {
        let mut frame = [CMD_READ, 0xFF];
        self.spi.transfer_in_place(&mut frame).map_err(Error::spi)?;
        Ok(u16::from_be_bytes(frame) & 0x01FF)
    }

    /// Step the wiper one position towards terminal A.
    pub fn increment(&mut self) -> Result<()> {
        self.spi.write(&[CMD_INCREMENT]).map_err(Error::spi)
    }

    /// Step the wiper one position towards terminal B.
    pub fn decrement(&mut self) -> Result<()> {
        self.spi.write(&[CMD_DECREMENT]).map_err(Error::spi)
    }
}
