//! RS485 Click
//!
//! Half-duplex RS485 transceiver on the UART. DE (driver enable, active
//! high) is on CS and RE (receiver enable, active low) is on RST. The
//! driver idles in receive mode and switches to transmit only for the
//! duration of [`Rs485::send`].

use embedded_hal::digital::{OutputPin, PinState};
use embedded_io::{Read, ReadReady, Write};
use platform::{Board, MikrobusPins, PinName};

use crate::config::{uart_bus, ClickConfig};
use crate::error::{Error, Result};

/// RS485 Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rs485Config {
    /// UART receive
    pub rx: PinName,
    /// UART transmit
    pub tx: PinName,
    /// Driver enable
    pub de: PinName,
    /// Receiver enable (active low)
    pub re: PinName,
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for Rs485Config {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            de: PinName::NC,
            re: PinName::NC,
            baud_rate: platform::config::UART_DEFAULT_BAUD,
        }
    }
}

impl ClickConfig for Rs485Config {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            rx: pins.rx,
            tx: pins.tx,
            de: pins.cs,
            re: pins.rst,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            rx: self.rx,
            tx: self.tx,
            cs: self.de,
            rst: self.re,
            ..MikrobusPins::default()
        }
    }
}

/// Line direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Receiver on, driver off
    Receive,
    /// Driver on, receiver off
    Transmit,
}

/// RS485 Click driver
#[derive(Debug)]
pub struct Rs485<U, O> {
    uart: U,
    de: O,
    re: O,
}

impl<U, O> Rs485<U, O>
where
    U: Read + Write + ReadReady,
    O: OutputPin,
{
    /// Open the UART and both enables in receive mode.
    pub fn init<B>(board: &mut B, config: &Rs485Config) -> Result<Self>
    where
        B: Board<Uart = U, Output = O>,
    {
        let uart = board.open_uart(&uart_bus(config.rx, config.tx, config.baud_rate))?;
        let de = board.open_output(config.de, PinState::Low)?;
        let re = board.open_output(config.re, PinState::Low)?;
        Ok(Self::new(uart, de, re))
    }

    /// Wrap already-open handles.
    pub fn new(uart: U, de: O, re: O) -> Self {
        Self { uart, de, re }
    }

    /// Switch the transceiver direction.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let transmit = direction == Direction::Transmit;
        self.de.set_state(PinState::from(transmit)).map_err(Error::pin)?;
        self.re.set_state(PinState::from(transmit)).map_err(Error::pin)
    }

    /// Transmit `data` and return to receive mode once the UART has
    /// flushed.
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        self.set_direction(Direction::Transmit)?;
        let sent = self
            .uart
            .write_all(data)
            .and_then(|()| self.uart.flush())
            .map_err(Error::uart);
        // release the line even when the write failed
        self.set_direction(Direction::Receive)?;
        sent
    }

    /// Copy whatever has been received into `buf`; returns the byte count,
    /// 0 when nothing is pending.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.uart.read_ready().map_err(Error::uart)? {
            return Ok(0);
        }
        self.uart.read(buf).map_err(Error::uart)
    }
}
