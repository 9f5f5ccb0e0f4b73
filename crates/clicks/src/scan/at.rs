//! AT-command response scanning
//!
//! [`ResponseReader`] accumulates UART bytes into a bounded buffer and counts
//! every poll. A response is complete when a terminated `OK` or `ERROR` line
//! (or a `+CME ERROR` / `+CMS ERROR` line) has arrived, or when a `>` prompt
//! is waiting for input. When the poll count passes the limit without a
//! token the scan times out, so a modem streaming noise still expires.

use embedded_io::{Read, ReadReady};
use thiserror_no_std::Error;

use crate::error::Error as DriverError;

/// Terminal token of an AT response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AtResponse {
    /// `OK`
    Ok,
    /// `ERROR`, `+CME ERROR: ..` or `+CMS ERROR: ..`
    Error,
    /// `> ` data prompt (SMS body, socket payload)
    Prompt,
}

/// AT scanning errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AtError {
    /// No terminal token within the poll limit.
    #[error("response timed out")]
    Timeout,
    /// No line with the requested prefix.
    #[error("response line not found")]
    LineNotFound,
    /// The modem answered `ERROR`.
    #[error("command rejected")]
    Rejected,
    /// The modem answered with a different terminal token.
    #[error("unexpected response")]
    Unexpected,
}

/// Scan a complete buffer for a terminal token.
///
/// Only terminated lines count, except for the data prompt which the modem
/// sends without a line end.
///
/// ```
/// use clicks::scan::at::{check_response, AtResponse};
///
/// assert_eq!(check_response(b"AT\r\nOK\r\n"), Some(AtResponse::Ok));
/// assert_eq!(check_response(b"AT+X\r\nOK"), None);
/// ```
pub fn check_response(buffer: &[u8]) -> Option<AtResponse> {
    let mut lines = buffer.split(|&b| b == b'\r' || b == b'\n');
    let trailing = lines.next_back().unwrap_or_default();
    for line in lines {
        if line == b"OK" {
            return Some(AtResponse::Ok);
        }
        if line == b"ERROR" || line.starts_with(b"+CME ERROR") || line.starts_with(b"+CMS ERROR") {
            return Some(AtResponse::Error);
        }
    }
    if trailing == b">" || trailing == b"> " {
        return Some(AtResponse::Prompt);
    }
    None
}

/// Payload of the first `<prefix>: ...` line, trimmed.
///
/// ```
/// use clicks::scan::at::extract_line;
///
/// let reply = b"AT+CSQ\r\n+CSQ: 23,99\r\n\r\nOK\r\n";
/// assert_eq!(extract_line(reply, "+CSQ"), Ok("23,99"));
/// ```
pub fn extract_line<'a>(buffer: &'a [u8], prefix: &str) -> Result<&'a str, AtError> {
    let prefix = prefix.as_bytes();
    buffer
        .split(|&b| b == b'\r' || b == b'\n')
        .find_map(|line| line.strip_prefix(prefix)?.strip_prefix(b":"))
        .and_then(|payload| core::str::from_utf8(payload).ok())
        .map(str::trim)
        .ok_or(AtError::LineNotFound)
}

/// Bounded accumulator for one AT exchange.
///
/// `N` is the buffer capacity. A buffer that fills without a token is
/// cleared and accumulation continues with the next bytes.
#[derive(Debug)]
pub struct ResponseReader<const N: usize> {
    buffer: heapless::Vec<u8, N>,
    polls: u32,
    limit: u32,
}

impl<const N: usize> ResponseReader<N> {
    /// Create a reader that times out after `limit` polls.
    pub const fn new(limit: u32) -> Self {
        Self {
            buffer: heapless::Vec::new(),
            polls: 0,
            limit,
        }
    }

    /// Drop accumulated bytes and restart the poll count.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.polls = 0;
    }

    /// Accumulated bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Polls counted since the last [`clear`](Self::clear).
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Append received bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.buffer.push(byte).is_err() {
                log_debug!("AT buffer full ({} bytes), clearing", N);
                self.buffer.clear();
                // fits unless N is zero
                let _ = self.buffer.push(byte);
            }
        }
    }

    /// Count one poll and check the accumulated bytes.
    ///
    /// `Ok(None)` means keep polling.
    pub fn check_response(&mut self) -> Result<Option<AtResponse>, AtError> {
        if let Some(response) = check_response(&self.buffer) {
            return Ok(Some(response));
        }
        self.polls = self.polls.saturating_add(1);
        if self.polls > self.limit {
            log_warn!("AT response timed out after {} polls", self.polls);
            return Err(AtError::Timeout);
        }
        Ok(None)
    }

    /// Move whatever `uart` has ready into the buffer, then check it.
    pub fn poll<U: Read + ReadReady>(
        &mut self,
        uart: &mut U,
    ) -> Result<Option<AtResponse>, DriverError> {
        if uart.read_ready().map_err(DriverError::uart)? {
            let mut chunk = [0u8; 32];
            let count = uart.read(&mut chunk).map_err(DriverError::uart)?;
            self.push(chunk.get(..count).unwrap_or_default());
        }
        Ok(self.check_response()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::MockUart;

    #[test]
    fn ok_and_error_tokens() {
        assert_eq!(check_response(b"AT\r\nOK\r\n"), Some(AtResponse::Ok));
        assert_eq!(check_response(b"AT+CGATT?\r\nERROR\r\n"), Some(AtResponse::Error));
        assert_eq!(
            check_response(b"\r\n+CME ERROR: 10\r\n"),
            Some(AtResponse::Error)
        );
        assert_eq!(check_response(b"AT+CMGS=\"123\"\r\r\n> "), Some(AtResponse::Prompt));
        assert_eq!(check_response(b"BOOK\r\n"), None);
        assert_eq!(check_response(b""), None);
    }

    #[test]
    fn extracts_prefixed_line() {
        let reply = b"\r\n+CGATT: 1\r\n\r\nOK\r\n";
        assert_eq!(extract_line(reply, "+CGATT"), Ok("1"));
        assert_eq!(extract_line(reply, "+CSQ"), Err(AtError::LineNotFound));
    }

    #[test]
    fn noise_times_out() {
        let mut reader = ResponseReader::<64>::new(5);
        for _ in 0..5 {
            reader.push(b"\x55\xAA noise ");
            assert_eq!(reader.check_response(), Ok(None));
        }
        reader.push(b"more noise");
        assert_eq!(reader.check_response(), Err(AtError::Timeout));
    }

    #[test]
    fn overflow_clears_and_keeps_scanning() {
        let mut reader = ResponseReader::<8>::new(10);
        reader.push(b"0123456789");
        assert_eq!(reader.as_bytes(), b"89");
        reader.push(b"\r\nOK\r\n");
        assert_eq!(reader.check_response(), Ok(Some(AtResponse::Ok)));
    }

    #[test]
    fn polls_uart_until_ok() {
        let mut uart = MockUart::new();
        let mut reader = ResponseReader::<64>::new(3);
        assert_eq!(reader.poll(&mut uart), Ok(None));
        uart.feed(b"AT\r\nOK\r\n");
        assert_eq!(reader.poll(&mut uart), Ok(Some(AtResponse::Ok)));
        assert_eq!(reader.polls(), 1);
    }

    #[test]
    fn silent_uart_times_out() {
        let mut uart = MockUart::new();
        let mut reader = ResponseReader::<64>::new(2);
        assert_eq!(reader.poll(&mut uart), Ok(None));
        assert_eq!(reader.poll(&mut uart), Ok(None));
        assert_eq!(
            reader.poll(&mut uart),
            Err(DriverError::At(AtError::Timeout))
        );
    }
}
