//! Thermo Click
//!
//! Maxim MAX31855 K-type thermocouple converter. The device is read-only:
//! every access clocks out one 32-bit frame.
//!
//! ```text
//! 31..18  thermocouple, 14-bit signed, 0.25 °C/LSB
//! 16      fault (any of SCV / SCG / OC)
//! 15..4   internal (cold junction), 12-bit signed, 0.0625 °C/LSB
//! 2..0    SCV, SCG, OC
//! ```

use embedded_hal::spi::SpiDevice;
use platform::{Board, MikrobusPins, PinName, SpiMode};

use crate::config::{spi_bus, ClickConfig};
use crate::error::{Error, Result};

const FAULT: u32 = 1 << 16;
const FAULT_BITS: u32 = 0x07;

/// Thermocouple temperature of a frame (°C).
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
pub fn thermocouple_celsius(frame: u32) -> f32 {
    ((frame as i32) >> 18) as f32 * 0.25
}

/// Cold-junction temperature of a frame (°C).
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
pub fn internal_celsius(frame: u32) -> f32 {
    (((frame << 16) as i32) >> 20) as f32 * 0.0625
}

/// Fault flags of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fault {
    /// Thermocouple shorted to VCC
    pub short_to_vcc: bool,
    /// Thermocouple shorted to GND
    pub short_to_gnd: bool,
    /// Thermocouple open
    pub open_circuit: bool,
}

impl Fault {
    /// Fault flags of `frame`, `None` when the fault bit is clear.
    pub fn from_frame(frame: u32) -> Option<Self> {
        if frame & FAULT == 0 {
            return None;
        }
        Some(Self {
            short_to_vcc: frame & 0x04 != 0,
            short_to_gnd: frame & 0x02 != 0,
            open_circuit: frame & 0x01 != 0,
        })
    }
}

/// Thermo Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ThermoConfig {
    pub sck: PinName,
    pub miso: PinName,
    pub mosi: PinName,
    pub cs: PinName,
    /// SPI clock (Hz, 5 MHz max)
    pub frequency: u32,
    /// SPI mode
    pub mode: SpiMode,
}

impl Default for ThermoConfig {
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

impl ClickConfig for ThermoConfig {
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

/// Thermo Click driver
#[derive(Debug)]
pub struct Thermo<S> {
    spi: S,
}

impl<S: SpiDevice> Thermo<S> {
    /// Open the SPI device.
    pub fn init<B: Board<Spi = S>>(board: &mut B, config: &ThermoConfig) -> Result<Self> {
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

    /// Clock out one raw 32-bit frame.
    pub fn read_frame(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.spi.read(&mut buf).map_err(Error::spi)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Thermocouple temperature (°C); a faulted frame is an error carrying
    /// the SCV/SCG/OC bits.
    pub fn read_thermocouple(&mut self) -> Result<f32> {
        let frame = self.read_frame()?;
        if frame & FAULT != 0 {
            let bits = (frame & FAULT_BITS).to_le_bytes()[0];
            log_warn!("MAX31855 fault bits {}", bits);
            return Err(Error::Device(bits));
        }
        Ok(thermocouple_celsius(frame))
    }

    /// Cold-junction temperature (°C).
    pub fn read_internal(&mut self) -> Result<f32> {
        self.read_frame().map(internal_celsius)
    }

    /// Current fault flags, `None` when the thermocouple is healthy.
    pub fn fault(&mut self) -> Result<Option<Fault>> {
        self.read_frame().map(Fault::from_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    #[test]
    fn frame_decoding() {
        // 100.75 °C thermocouple, 25.0625 °C internal
        let frame = (403u32 << 18) | (401u32 << 4);
        assert!((thermocouple_celsius(frame) - 100.75).abs() < 1e-6);
        assert!((internal_celsius(frame) - 25.0625).abs() < 1e-6);

        // -250 °C thermocouple, -55 °C internal (datasheet table)
        let frame = 0xF060_C900;
        assert!((thermocouple_celsius(frame) + 250.0).abs() < 1e-6);
        assert!((internal_celsius(frame) + 55.0).abs() < 1e-6);
    }

    #[test]
    fn fault_bits() {
        assert_eq!(Fault::from_frame(0x0000_0001), None);
        assert_eq!(
            Fault::from_frame(0x0001_0001),
            Some(Fault {
                open_circuit: true,
                ..Fault::default()
            })
        );
    }

    #[test]
    fn faulted_frame_is_an_error() {
        let mut spi = SpiMock::new(&[
            Transaction::transaction_start(),
            Transaction::read_vec(vec![0x00, 0x01, 0x00, 0x02]),
            Transaction::transaction_end(),
        ]);
        let mut thermo = Thermo::new(spi.clone());
        assert_eq!(thermo.read_thermocouple(), Err(Error::Device(0x02)));
        spi.done();
    }

    #[test]
    fn reads_through_board() {
        let mut board = MockBoard::new();
        let config = ThermoConfig::mikrobus(Socket::Mikrobus1);
        board.spi(config.cs).queue_response(&[0x06, 0x4C, 0x19, 0x10]);
        let mut thermo = Thermo::init(&mut board, &config).unwrap();
        let celsius = thermo.read_thermocouple().unwrap();
        assert!((celsius - 100.75).abs() < 1e-6);
    }
}
