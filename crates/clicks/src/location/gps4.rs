//! GPS 4 Click
//!
//! Quectel L70 receiver streaming NMEA at 9600 baud. Reset is on RST.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_io::{Read, ReadReady, Write};
use platform::{Board, MikrobusPins, PinName};

use super::GgaFix;
use crate::config::{uart_bus, ClickConfig};
use crate::error::{Error, Result};
use crate::scan::nmea;

/// Sentence identifier decoded by [`Gps4::parse_gga`].
pub const GGA_COMMAND: &str = "GPGGA";

/// GPS 4 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gps4Config {
    /// UART receive
    pub rx: PinName,
    /// UART transmit
    pub tx: PinName,
    /// Reset
    pub rst: PinName,
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for Gps4Config {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            rst: PinName::NC,
            baud_rate: platform::config::UART_DEFAULT_BAUD,
        }
    }
}

impl ClickConfig for Gps4Config {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            rx: pins.rx,
            tx: pins.tx,
            rst: pins.rst,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            rx: self.rx,
            tx: self.tx,
            rst: self.rst,
            ..MikrobusPins::default()
        }
    }
}

/// GPS 4 Click driver
#[derive(Debug)]
pub struct Gps4<U, O, D> {
    uart: U,
    rst: O,
    delay: D,
}

impl<U, O, D> Gps4<U, O, D>
where
    U: Read + Write + ReadReady,
    O: OutputPin,
    D: DelayNs,
{
    /// Open the UART with the receiver running.
    pub fn init<B>(board: &mut B, config: &Gps4Config) -> Result<Self>
    where
        B: Board<Uart = U, Output = O, Delay = D>,
    {
        let uart = board.open_uart(&uart_bus(config.rx, config.tx, config.baud_rate))?;
        let rst = board.open_output(config.rst, PinState::Low)?;
        log_info!("GPS 4 ready at {} baud", config.baud_rate);
        Ok(Self::new(uart, rst, board.delay()))
    }

    /// Wrap already-open handles.
    pub fn new(uart: U, rst: O, delay: D) -> Self {
        Self { uart, rst, delay }
    }

    /// Hold reset for 100 ms, then give the receiver a second to boot.
    pub fn reset(&mut self) -> Result<()> {
        self.rst.set_high().map_err(Error::pin)?;
        self.delay.delay_ms(100);
        self.rst.set_low().map_err(Error::pin)?;
        self.delay.delay_ms(1000);
        Ok(())
    }

    /// Move pending bytes into `buf`; returns how many were copied.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut count = 0;
        while count < buf.len() && self.uart.read_ready().map_err(Error::uart)? {
            let Some(rest) = buf.get_mut(count..) else {
                break;
            };
            let read = self.uart.read(rest).map_err(Error::uart)?;
            if read == 0 {
                break;
            }
            count += read;
        }
        Ok(count)
    }

    /// Send a PMTK command line (`$PMTK...*hh`); CR LF is appended.
    pub fn send_command(&mut self, sentence: &str) -> Result<()> {
        self.uart
            .write_all(sentence.as_bytes())
            .and_then(|()| self.uart.write_all(b"\r\n"))
            .and_then(|()| self.uart.flush())
            .map_err(Error::uart)
    }

    /// Field `element` of the first `command` sentence in `buffer`.
    pub fn parse_element<'a>(buffer: &'a [u8], command: &str, element: usize) -> Result<&'a str> {
        Ok(nmea::parse_element(buffer, command, element)?)
    }

    /// Decode the first `GPGGA` sentence in `buffer`; `None` without a fix.
    pub fn parse_gga(buffer: &[u8]) -> Result<Option<GgaFix>> {
        Ok(GgaFix::parse(buffer, GGA_COMMAND)?)
    }
}
