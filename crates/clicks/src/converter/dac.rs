//! DAC Click
//!
//! MCP4921 12-bit DAC on SPI. Every write is one 16-bit word:
//!
//! ```text
//! 15    14   13   12    11..0
//! A/B   BUF  GA   SHDN  D11..D0
//! ```
//!
//! The driver always selects channel A, unbuffered VREF, 1x gain and the
//! output active, i.e. `0x3000 | code`.

use embedded_hal::spi::SpiDevice;
use platform::{Board, MikrobusPins, PinName, SpiMode};

use crate::config::{spi_bus, ClickConfig};
use crate::converter::{code_to_voltage, voltage_to_code};
use crate::error::{Error, Result};

/// Resolution in bits.
pub const RESOLUTION_BITS: u8 = 12;
/// Highest code.
pub const MAX_CODE: u16 = 0x0FFF;
/// Control bits: channel A, unbuffered, 1x gain, active.
pub const CONTROL_BITS: u16 = 0x3000;

/// DAC Click configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct DacConfig {
    pub sck: PinName,
    pub miso: PinName,
    pub mosi: PinName,
    pub cs: PinName,
    /// SPI clock (Hz)
    pub frequency: u32,
    /// SPI mode
    pub mode: SpiMode,
    /// Reference voltage on VREF (V)
    pub vref: f32,
}

impl Default for DacConfig {
    fn default() -> Self {
        Self {
            sck: PinName::NC,
            miso: PinName::NC,
            mosi: PinName::NC,
            cs: PinName::NC,
            frequency: platform::config::SPI_DEFAULT_HZ,
            mode: SpiMode::Mode0,
            vref: platform::config::ADC_DEFAULT_VREF,
        }
    }
}

impl ClickConfig for DacConfig {
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

/// DAC Click driver
#[derive(Debug)]
pub struct Dac<S> {
    spi: S,
    vref: f32,
}

impl<S: SpiDevice> Dac<S> {
    /// Open the SPI device.
    pub fn init<B: Board<Spi = S>>(board: &mut B, config: &DacConfig) -> Result<Self> {
        let spi = board.open_spi(&spi_bus(
            (config.sck, config.miso, config.mosi, config.cs),
            config.frequency,
            config.mode,
        ))?;
        Ok(Self::new(spi, config.vref))
    }

    /// Wrap an already-open SPI device.
    pub fn new(spi: S, vref: f32) -> Self {
        Self { spi, vref }
    }

    /// Write a raw 12-bit code.
    pub fn set_code(&mut self, code: u16) -> Result<()> {
        if code > MAX_CODE {
            return Err(Error::InvalidArgument);
        }
        let word = CONTROL_BITS | code;
        self.spi.write(&word.to_be_bytes()).map_err(Error::spi)
    }

    /// Write the code nearest to `voltage` (V).
    pub fn set_voltage(&mut self, voltage: f32) -> Result<()> {
        let code = voltage_to_code(voltage, self.vref, RESOLUTION_BITS)?;
        self.set_code(code)
    }

    /// Output voltage a code produces with this board's reference.
    pub fn code_to_voltage(&self, code: u16) -> Result<f32> {
        code_to_voltage(code, self.vref, RESOLUTION_BITS)
    }
}
