//! GSM Click
//!
//! Quectel M95 GSM/GPRS module. PWRKEY is on the PWM pin and toggles the
//! module on or off when held for about a second; the ring indicator (RI,
//! active low) is on INT.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_io::{Read, ReadReady, Write};
use platform::{Board, MikrobusPins, PinName};

use super::{expect, Modem, SignalQuality, DEFAULT_TIMEOUT_POLLS};
use crate::config::{uart_bus, ClickConfig};
use crate::error::{Error, Result};
use crate::scan::AtResponse;

/// PWRKEY hold time (ms).
const PWRKEY_MS: u32 = 1000;
/// Time to reach the AT-ready state after PWRKEY (ms).
const BOOT_MS: u32 = 2000;
/// Ends an SMS body.
const CTRL_Z: u8 = 0x1A;

/// GSM Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsmConfig {
    /// UART receive
    pub rx: PinName,
    /// UART transmit
    pub tx: PinName,
    /// Power key
    pub pwrkey: PinName,
    /// Ring indicator
    pub ring: PinName,
    /// Baud rate
    pub baud_rate: u32,
    /// Polls before a response times out
    pub timeout_polls: u32,
}

impl Default for GsmConfig {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            pwrkey: PinName::NC,
            ring: PinName::NC,
            baud_rate: platform::config::UART_DEFAULT_BAUD,
            timeout_polls: DEFAULT_TIMEOUT_POLLS,
        }
    }
}

impl ClickConfig for GsmConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            rx: pins.rx,
            tx: pins.tx,
            pwrkey: pins.pwm,
            ring: pins.int,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            rx: self.rx,
            tx: self.tx,
            pwm: self.pwrkey,
            int: self.ring,
            ..MikrobusPins::default()
        }
    }
}

/// GSM Click driver
#[derive(Debug)]
pub struct Gsm<U, O, P, D> {
    modem: Modem<U, D>,
    pwrkey: O,
    ring: P,
}

impl<U, O, P, D> Gsm<U, O, P, D>
where
    U: Read + Write + ReadReady,
    O: OutputPin,
    P: InputPin,
    D: DelayNs,
{
    /// Open the UART, PWRKEY (released) and the ring input.
    pub fn init<B>(board: &mut B, config: &GsmConfig) -> Result<Self>
    where
        B: Board<Uart = U, Output = O, Input = P, Delay = D>,
    {
        let uart = board.open_uart(&uart_bus(config.rx, config.tx, config.baud_rate))?;
        let pwrkey = board.open_output(config.pwrkey, PinState::Low)?;
        let ring = board.open_input(config.ring)?;
        Ok(Self::new(
            Modem::new(uart, board.delay(), config.timeout_polls),
            pwrkey,
            ring,
        ))
    }

    /// Wrap an AT channel and the control pins.
    pub fn new(modem: Modem<U, D>, pwrkey: O, ring: P) -> Self {
        Self {
            modem,
            pwrkey,
            ring,
        }
    }

    /// Hold PWRKEY, release it and wait for the module to boot.
    pub fn power_on(&mut self) -> Result<()> {
        self.pwrkey.set_high().map_err(Error::pin)?;
        self.modem.delay_ms(PWRKEY_MS);
        self.pwrkey.set_low().map_err(Error::pin)?;
        self.modem.delay_ms(BOOT_MS);
        log_info!("GSM module powered");
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

    /// Whether the ring indicator is asserted (incoming call or SMS).
    pub fn ringing(&mut self) -> Result<bool> {
        self.ring.is_low().map_err(Error::pin)
    }

    /// Send a text-mode SMS to `number`.
    pub fn send_sms(&mut self, number: &str, text: &str) -> Result<()> {
        if number.is_empty() || text.as_bytes().contains(&CTRL_Z) {
            return Err(Error::InvalidArgument);
        }
        self.command("AT+CMGF=1")?;

        self.modem
            .send_parts(&[b"AT+CMGS=\"", number.as_bytes(), b"\"\r"])?;
        expect(self.modem.wait_response()?, AtResponse::Prompt)?;

        self.modem.send_parts(&[text.as_bytes(), &[CTRL_Z]])?;
        expect(self.modem.wait_response()?, AtResponse::Ok)?;
        log_debug!("SMS sent ({} bytes)", text.len());
        Ok(())
    }
}
