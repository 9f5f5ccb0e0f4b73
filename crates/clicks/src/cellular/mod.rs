//! Cellular modems
//!
//! Both boards speak AT commands over the UART. [`Modem`] owns the UART and
//! a [`ResponseReader`] and runs one exchange at a time: write a command
//! line, then poll until a terminal token arrives or the poll budget runs
//! out. The board drivers add their power sequencing on top.

pub mod gsm;
pub mod nbiot;

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::error::{Error, Result};
use crate::scan::at::{extract_line, AtError, AtResponse, ResponseReader};

/// Response buffer capacity
pub const RESPONSE_CAPACITY: usize = 256;
/// Default poll budget; one poll per millisecond.
pub const DEFAULT_TIMEOUT_POLLS: u32 = 5000;

/// `+CSQ` report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality {
    /// 0..=31, 99 = unknown
    pub rssi: u8,
    /// 0..=7, 99 = unknown
    pub ber: u8,
}

impl SignalQuality {
    /// Parse the payload of a `+CSQ: <rssi>,<ber>` line.
    pub fn parse(payload: &str) -> Result<Self> {
        let mut fields = payload.split(',').map(str::trim);
        let mut next = || -> Result<u8> {
            fields
                .next()
                .and_then(|field| field.parse().ok())
                .ok_or(Error::At(AtError::LineNotFound))
        };
        Ok(Self {
            rssi: next()?,
            ber: next()?,
        })
    }

    /// Received power in dBm; `None` when unknown.
    pub fn dbm(&self) -> Option<i16> {
        (self.rssi <= 31).then(|| -113 + 2 * i16::from(self.rssi))
    }
}

/// AT command channel
#[derive(Debug)]
pub struct Modem<U, D> {
    uart: U,
    delay: D,
    reader: ResponseReader<RESPONSE_CAPACITY>,
}

impl<U, D> Modem<U, D>
where
    U: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Wrap an open UART; responses time out after `timeout_polls` polls.
    pub fn new(uart: U, delay: D, timeout_polls: u32) -> Self {
        Self {
            uart,
            delay,
            reader: ResponseReader::new(timeout_polls),
        }
    }

    /// Write `command` terminated by CR; the previous response is dropped.
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        self.send_parts(&[command.as_bytes(), b"\r"])
    }

    /// Start a new exchange by writing `parts` back to back.
    pub fn send_parts(&mut self, parts: &[&[u8]]) -> Result<()> {
        self.reader.clear();
        for part in parts {
            self.uart.write_all(part).map_err(Error::uart)?;
        }
        self.uart.flush().map_err(Error::uart)
    }

    /// Poll once per millisecond until a terminal token arrives.
    pub fn wait_response(&mut self) -> Result<AtResponse> {
        loop {
            if let Some(response) = self.reader.poll(&mut self.uart)? {
                return Ok(response);
            }
            self.delay.delay_ms(1);
        }
    }

    /// Send `command` and require `OK`.
    pub fn command(&mut self, command: &str) -> Result<()> {
        self.send_command(command)?;
        expect(self.wait_response()?, AtResponse::Ok)
    }

    /// Bytes received for the current exchange.
    pub fn response(&self) -> &[u8] {
        self.reader.as_bytes()
    }

    /// Query `AT+CSQ`.
    pub fn signal_quality(&mut self) -> Result<SignalQuality> {
        self.command("AT+CSQ")?;
        SignalQuality::parse(extract_line(self.response(), "+CSQ")?)
    }

    /// Busy-wait `ms` milliseconds on the modem's delay.
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

/// Map a terminal token to `Ok` when it is `wanted`.
pub fn expect(response: AtResponse, wanted: AtResponse) -> Result<()> {
    match response {
        r if r == wanted => Ok(()),
        AtResponse::Error => Err(AtError::Rejected.into()),
        _ => Err(AtError::Unexpected.into()),
    }
}
