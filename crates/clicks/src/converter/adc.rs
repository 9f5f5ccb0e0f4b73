//! ADC Click
//!
//! MCP3204 4-channel 12-bit SAR ADC on SPI. A conversion is one 3-byte
//! full-duplex frame:
//!
//! ```text
//! MOSI  0000 01 S/D x | D1 D0 xxxxxx | xxxxxxxx
//! MISO  ???????? ???? | ??? 0 B11..B8 | B7..B0
//! ```

use embedded_hal::spi::SpiDevice;
use platform::{Board, MikrobusPins, PinName, SpiMode};

use crate::config::{spi_bus, ClickConfig};
use crate::converter::code_to_voltage;
use crate::error::{Error, Result};

/// Resolution in bits.
pub const RESOLUTION_BITS: u8 = 12;
/// Start bit in the first command byte.
const START: u8 = 0x04;

/// Input channel (CH0..CH3, or the pair starting there in differential mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Channel {
    Ch0,
    Ch1,
    Ch2,
    Ch3,
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Channel::Ch0),
            1 => Ok(Channel::Ch1),
            2 => Ok(Channel::Ch2),
            3 => Ok(Channel::Ch3),
            _ => Err(Error::InvalidArgument),
        }
    }
}

impl Channel {
    const fn index(self) -> u8 {
        match self {
            Channel::Ch0 => 0,
            Channel::Ch1 => 1,
            Channel::Ch2 => 2,
            Channel::Ch3 => 3,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// Channel against AGND
    SingleEnded,
    /// Channel pair (CH0-CH1, CH1-CH0, CH2-CH3, CH3-CH2)
    Differential,
}

/// Command bytes for one conversion.
pub const fn command(channel: Channel, mode: InputMode) -> [u8; 3] {
    let single = match mode {
        InputMode::SingleEnded => 0x02,
        InputMode::Differential => 0x00,
    };
    [START | single, channel.index() << 6, 0x00]
}

/// ADC Click configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct AdcConfig {
    pub sck: PinName,
    pub miso: PinName,
    pub mosi: PinName,
    pub cs: PinName,
    /// SPI clock (Hz)
    pub frequency: u32,
    /// SPI mode
    pub mode: SpiMode,
    /// Reference voltage (V)
    pub vref: f32,
}

impl Default for AdcConfig {
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

impl ClickConfig for AdcConfig {
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

/// ADC Click driver
#[derive(Debug)]
pub struct Adc<S> {
    spi: S,
    vref: f32,
}

impl<S: SpiDevice> Adc<S> {
    /// Open the SPI device.
    pub fn init<B: Board<Spi = S>>(board: &mut B, config: &AdcConfig) -> Result<Self> {
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

    /// Run one conversion and return the 12-bit result.
    pub fn read_raw(&mut self, channel: Channel, mode: InputMode) -> Result<u16> {
        let mut frame = command(channel, mode);
        self.spi.transfer_in_place(&mut frame).map_err(Error::spi)?;
        let [_, high, low] = frame;
        Ok((u16::from(high & 0x0F) << 8) | u16::from(low))
    }

    /// Run one conversion and scale it to volts.
    pub fn read_voltage(&mut self, channel: Channel, mode: InputMode) -> Result<f32> {
        let raw = self.read_raw(channel, mode)?;
        code_to_voltage(raw, self.vref, RESOLUTION_BITS)
    }
}
