//! RMS to DC Click
//!
//! Linear LTC1966 true-RMS converter followed by a Microchip MCP3201 12-bit
//! SPI ADC. The converter is enabled by the RST pin (active high on the
//! board). The ADC answers every 2-byte read with
//! `xx 0 B11..B7 | B6..B0 B1`; the trailing bit is discarded.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::spi::SpiDevice;
use platform::{Board, MikrobusPins, PinName, SpiMode};

use crate::config::{spi_bus, ClickConfig};
use crate::converter::code_to_voltage;
use crate::error::{Error, Result};

/// Resolution in bits.
pub const RESOLUTION_BITS: u8 = 12;
/// Default ADC reference (V).
pub const DEFAULT_VREF: f32 = 2.048;
/// DC output per volt RMS at the input terminals.
pub const RMS_RATIO: f32 = 0.1325;

/// Extract the 12-bit result from an MCP3201 frame.
pub fn decode(frame: [u8; 2]) -> u16 {
    let [high, low] = frame;
    (u16::from(high & 0x1F) << 7) | u16::from(low >> 1)
}

/// RMS to DC Click configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsToDcConfig {
    /// SPI clock
    pub sck: PinName,
    /// SPI data in
    pub miso: PinName,
    /// SPI data out (unused by the ADC)
    pub mosi: PinName,
    /// Chip select
    pub cs: PinName,
    /// Converter enable
    pub en: PinName,
    /// SPI clock (Hz)
    pub frequency: u32,
    /// SPI mode
    pub mode: SpiMode,
    /// ADC reference (V)
    pub vref: f32,
}

impl Default for RmsToDcConfig {
    fn default() -> Self {
        Self {
            sck: PinName::NC,
            miso: PinName::NC,
            mosi: PinName::NC,
            cs: PinName::NC,
            en: PinName::NC,
            frequency: platform::config::SPI_DEFAULT_HZ,
            mode: SpiMode::Mode0,
            vref: DEFAULT_VREF,
        }
    }
}

impl ClickConfig for RmsToDcConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            sck: pins.sck,
            miso: pins.miso,
            mosi: pins.mosi,
            cs: pins.cs,
            en: pins.rst,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            sck: self.sck,
            miso: self.miso,
            mosi: self.mosi,
            cs: self.cs,
            rst: self.en,
            ..MikrobusPins::default()
        }
    }
}

/// RMS to DC Click driver
#[derive(Debug)]
pub struct RmsToDc<S, O> {
    spi: S,
    en: O,
    vref: f32,
}

impl<S: SpiDevice, O: OutputPin> RmsToDc<S, O> {
    /// Open the ADC and enable the converter.
    pub fn init<B>(board: &mut B, config: &RmsToDcConfig) -> Result<Self>
    where
        B: Board<Spi = S, Output = O>,
    {
        let spi = board.open_spi(&spi_bus(
            (config.sck, config.miso, config.mosi, config.cs),
            config.frequency,
            config.mode,
        ))?;
        let en = board.open_output(config.en, PinState::High)?;
        Ok(Self::new(spi, en, config.vref))
    }

    /// Wrap already-open handles.
    pub fn new(spi: S, en: O, vref: f32) -> Self {
        Self { spi, en, vref }
    }

    /// Replace the ADC reference used for scaling (V).
    pub fn set_vref(&mut self, vref: f32) -> Result<()> {
        if vref.is_nan() || vref <= 0.0 {
            return Err(Error::InvalidArgument);
        }
        self.vref = vref;
        Ok(())
    }

    /// Enable or shut down the RMS converter.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.en.set_state(PinState::from(enabled)).map_err(Error::pin)
    }

    /// One 12-bit conversion.
    pub fn read_raw(&mut self) -> Result<u16> {
        let mut frame = [0u8; 2];
        self.spi.read(&mut frame).map_err(Error::spi)?;
        Ok(decode(frame))
    }

    /// Converter output in volts.
    pub fn read_voltage(&mut self) -> Result<f32> {
        let raw = self.read_raw()?;
        code_to_voltage(raw, self.vref, RESOLUTION_BITS)
    }

    /// Input RMS voltage (V).
    pub fn read_rms(&mut self) -> Result<f32> {
        Ok(self.read_voltage()? / RMS_RATIO)
    }
}
