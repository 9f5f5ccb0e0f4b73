//! NB IoT Click
//!
//! Quectel BC95 NB-IoT module at 9600 baud. RST drives the module reset
//! through an inverting transistor, so a high pulse resets it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_io::{Read, ReadReady, Write};
use platform::{Board, MikrobusPins, PinName};

use super::{Modem, SignalQuality, DEFAULT_TIMEOUT_POLLS};
use crate::config::{uart_bus, ClickConfig};
use crate::error::{Error, Result};
use crate::scan::AtResponse;

/// Reset pulse width (ms).
const RESET_PULSE_MS: u32 = 100;
/// Boot time after reset (ms).
const BOOT_MS: u32 = 3000;

/// NB IoT Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NbIotConfig {
    /// UART receive
    pub rx: PinName,
    /// UART transmit
    pub tx: PinName,
    /// Reset
    pub rst: PinName,
    /// Baud rate
    pub baud_rate: u32,
    /// Polls before a response times out
    pub timeout_polls: u32,
}

impl Default for NbIotConfig {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            rst: PinName::NC,
            baud_rate: platform::config::UART_DEFAULT_BAUD,
            timeout_polls: DEFAULT_TIMEOUT_POLLS,
        }
    }
}

impl ClickConfig for NbIotConfig {
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

/// NB IoT Click driver
#[derive(Debug)]
pub struct NbIot<U, O, D> {
    modem: Modem<U, D>,
    rst: O,
}

impl<U, O, D> NbIot<U, O, D>
where
    U: Read + Write + ReadReady,
    O: OutputPin,
    D: DelayNs,
{
    /// Open the UART with the module out of reset.
    pub fn init<B>(board: &mut B, config: &NbIotConfig) -> Result<Self>
    where
        B: Board<Uart = U, Output = O, Delay = D>,
    {
        let uart = board.open_uart(&uart_bus(config.rx, config.tx, config.baud_rate))?;
        let rst = board.open_output(config.rst, PinState::Low)?;
        Ok(Self::new(Modem::new(uart, board.delay(), config.timeout_polls), rst))
    }

    /// Wrap an AT channel and the reset pin.
    pub fn new(modem: Modem<U, D>, rst: O) -> Self {
        Self { modem, rst }
    }

    /// Reset the module and wait for it to boot.
    pub fn power_on(&mut self) -> Result<()> {
        self.rst.set_high().map_err(Error::pin)?;
        self.modem.delay_ms(RESET_PULSE_MS);
        self.rst.set_low().map_err(Error::pin)?;
        self.modem.delay_ms(BOOT_MS);
        log_info!("NB IoT module booted");
        Ok(())
    }

    /// Write `command` terminated by CR.
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        self.modem.send_command(command)
    }

    /// Poll until `OK`, `ERROR` or a prompt arrives.
    pub fn wait_response(&mut self) -> Result<AtResponse> {
        self.modem.wait_response()
    }

    /// Send `command` and require `OK`.
    pub fn command(&mut self, command: &str) -> Result<()> {
        self.modem.command(command)
    }

    /// Bytes received for the last command.
    pub fn response(&self) -> &[u8] {
        self.modem.response()
    }

    /// Query the signal quality.
    pub fn signal_quality(&mut self) -> Result<SignalQuality> {
        self.modem.signal_quality()
    }

    /// Switch the radio on (`AT+CFUN=1`) and start attaching
    /// (`AT+CGATT=1`).
    pub fn attach(&mut self) -> Result<()> {
        self.command("AT+CFUN=1")?;
        self.command("AT+CGATT=1")
    }
}
