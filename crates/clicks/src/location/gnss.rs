//! GNSS Click
//!
//! u-blox receiver reachable over UART, I2C (DDC) or SPI; the transport is
//! picked once at `init`. Whatever the transport, the receiver streams the
//! same NMEA bytes:
//!
//! - UART: bytes as they arrive
//! - I2C: registers `0xFD`/`0xFE` hold the pending byte count (big endian),
//!   register `0xFF` is the stream
//! - SPI: every clocked byte is stream data, `0xFF` is idle filler

use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;
use embedded_io::{Read, ReadReady, Write};
use platform::{Board, I2cSpeed, MikrobusPins, PinName, SpiMode};

use super::GgaFix;
use crate::config::{i2c_bus, spi_bus, uart_bus, ClickConfig};
use crate::error::{Error, Result};
use crate::scan::nmea;

/// DDC slave address.
pub const DEFAULT_ADDRESS: u8 = 0x42;
/// Sentence identifier decoded by [`Gnss::parse_gga`].
pub const GGA_COMMAND: &str = "GNGGA";

const REG_BYTES_AVAILABLE: u8 = 0xFD;
const REG_STREAM: u8 = 0xFF;
const SPI_IDLE: u8 = 0xFF;

/// Bus the receiver is reached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    /// RX / TX
    #[default]
    Uart,
    /// SCL / SDA
    I2c,
    /// SCK / MISO / MOSI / CS
    Spi,
}

/// Open transport handle
#[derive(Debug)]
pub enum Transport<U, I, S> {
    /// UART handle
    Uart(U),
    /// I2C bus and the receiver's address on it
    I2c {
        /// Bus handle
        bus: I,
        /// 7-bit address
        address: u8,
    },
    /// SPI device
    Spi(S),
}

/// GNSS Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct GnssConfig {
    pub rx: PinName,
    pub tx: PinName,
    pub scl: PinName,
    pub sda: PinName,
    pub sck: PinName,
    pub miso: PinName,
    pub mosi: PinName,
    pub cs: PinName,
    /// Transport opened by `init`
    pub interface: Interface,
    /// UART baud rate
    pub baud_rate: u32,
    /// I2C bus speed
    pub speed: I2cSpeed,
    /// I2C slave address
    pub address: u8,
    /// SPI clock (Hz)
    pub frequency: u32,
    /// SPI mode
    pub mode: SpiMode,
}

impl Default for GnssConfig {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            scl: PinName::NC,
            sda: PinName::NC,
            sck: PinName::NC,
            miso: PinName::NC,
            mosi: PinName::NC,
            cs: PinName::NC,
            interface: Interface::Uart,
            baud_rate: platform::config::UART_DEFAULT_BAUD,
            speed: I2cSpeed::Standard,
            address: DEFAULT_ADDRESS,
            frequency: platform::config::SPI_DEFAULT_HZ,
            mode: SpiMode::Mode0,
        }
    }
}

impl ClickConfig for GnssConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            rx: pins.rx,
            tx: pins.tx,
            scl: pins.scl,
            sda: pins.sda,
            sck: pins.sck,
            miso: pins.miso,
            mosi: pins.mosi,
            cs: pins.cs,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            rx: self.rx,
            tx: self.tx,
            scl: self.scl,
            sda: self.sda,
            sck: self.sck,
            miso: self.miso,
            mosi: self.mosi,
            cs: self.cs,
            ..MikrobusPins::default()
        }
    }
}

/// GNSS Click driver
#[derive(Debug)]
pub struct Gnss<U, I, S> {
    transport: Transport<U, I, S>,
}

impl<U, I, S> Gnss<U, I, S>
where
    U: Read + Write + ReadReady,
    I: I2c,
    S: SpiDevice,
{
    /// Open the transport named by `config.interface`.
    pub fn init<B>(board: &mut B, config: &GnssConfig) -> Result<Self>
    where
        B: Board<Uart = U, I2c = I, Spi = S>,
    {
        let transport = match config.interface {
            Interface::Uart => {
                Transport::Uart(board.open_uart(&uart_bus(config.rx, config.tx, config.baud_rate))?)
            }
            Interface::I2c => Transport::I2c {
                bus: board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?,
                address: config.address,
            },
            Interface::Spi => Transport::Spi(board.open_spi(&spi_bus(
                (config.sck, config.miso, config.mosi, config.cs),
                config.frequency,
                config.mode,
            ))?),
        };
        log_debug!("GNSS transport opened");
        Ok(Self::new(transport))
    }

    /// Wrap an already-open transport.
    pub fn new(transport: Transport<U, I, S>) -> Self {
        Self { transport }
    }

    /// Transport in use.
    pub fn interface(&self) -> Interface {
        match self.transport {
            Transport::Uart(_) => Interface::Uart,
            Transport::I2c { .. } => Interface::I2c,
            Transport::Spi(_) => Interface::Spi,
        }
    }

    /// Move pending stream bytes into `buf`; returns how many were copied.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        match &mut self.transport {
            Transport::Uart(uart) => {
                if !uart.read_ready().map_err(Error::uart)? {
                    return Ok(0);
                }
                uart.read(buf).map_err(Error::uart)
            }
            Transport::I2c { bus, address } => {
                let mut available = [0u8; 2];
                bus.write_read(*address, &[REG_BYTES_AVAILABLE], &mut available)
                    .map_err(Error::i2c)?;
                let count = usize::from(u16::from_be_bytes(available)).min(buf.len());
                if count == 0 {
                    return Ok(0);
                }
                let chunk = buf.get_mut(..count).ok_or(Error::InvalidArgument)?;
                bus.write_read(*address, &[REG_STREAM], chunk)
                    .map_err(Error::i2c)?;
                Ok(count)
            }
            Transport::Spi(spi) => {
                buf.fill(SPI_IDLE);
                spi.transfer_in_place(buf).map_err(Error::spi)?;
                Ok(strip_filler(buf))
            }
        }
    }

    /// Field `element` of the first `command` sentence in `buffer`.
    pub fn parse_element<'a>(buffer: &'a [u8], command: &str, element: usize) -> Result<&'a str> {
        Ok(nmea::parse_element(buffer, command, element)?)
    }

    /// Decode the first `GNGGA` sentence in `buffer`; `None` without a fix.
    pub fn parse_gga(buffer: &[u8]) -> Result<Option<GgaFix>> {
        Ok(GgaFix::parse(buffer, GGA_COMMAND)?)
    }
}

/// Compact `buf` in place dropping idle bytes; returns the data length.
fn strip_filler(buf: &mut [u8]) -> usize {
    let mut len = 0;
    for index in 0..buf.len() {
        let byte = buf[index];
        if byte != SPI_IDLE {
            buf[len] = byte;
            len += 1;
        }
    }
    len
}
