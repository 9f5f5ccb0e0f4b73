//! Mock UART with scripted command responses

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};

/// SMS body terminator; ends a line like CR / LF.
const CTRL_Z: u8 = 0x1A;

#[derive(Debug, Default)]
struct UartState {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    line: Vec<u8>,
    rules: Vec<(Vec<u8>, Vec<u8>)>,
}

impl UartState {
    fn end_of_line(&mut self) {
        let line = core::mem::take(&mut self.line);
        if line.is_empty() {
            return;
        }
        if let Some((_, response)) = self
            .rules
            .iter()
            .find(|(command, _)| line.starts_with(command))
        {
            let response = response.clone();
            self.rx.extend(response);
        }
    }
}

/// Mock UART
///
/// Bytes pushed with [`MockUart::feed`] appear on the receive side; bytes the
/// driver writes are captured for inspection. Rules registered with
/// [`MockUart::on_command`] answer a transmitted line (terminated by CR, LF
/// or Ctrl-Z) whose text starts with the rule's command.
#[derive(Debug, Clone, Default)]
pub struct MockUart {
    state: Rc<RefCell<UartState>>,
}

impl MockUart {
    /// Create an idle UART.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `bytes` available to the next reads.
    pub fn feed(&self, bytes: &[u8]) {
        self.state.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Answer every transmitted line starting with `command` with `response`.
    pub fn on_command(&self, command: &str, response: &str) {
        self.state
            .borrow_mut()
            .rules
            .push((command.as_bytes().to_vec(), response.as_bytes().to_vec()));
    }

    /// Everything written so far.
    pub fn transmitted(&self) -> Vec<u8> {
        self.state.borrow().tx.clone()
    }

    /// Everything written so far, lossily decoded.
    pub fn transmitted_str(&self) -> String {
        String::from_utf8_lossy(&self.state.borrow().tx).into_owned()
    }

    /// Forget transmitted bytes.
    pub fn clear_transmitted(&self) {
        self.state.borrow_mut().tx.clear();
    }

    /// Bytes still waiting to be read.
    pub fn pending(&self) -> usize {
        self.state.borrow().rx.len()
    }
}

impl ErrorType for MockUart {
    type Error = ErrorKind;
}

impl Read for MockUart {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut state = self.state.borrow_mut();
        let count = buf.len().min(state.rx.len());
        for (slot, byte) in buf.iter_mut().zip(state.rx.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}

impl ReadReady for MockUart {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state.borrow().rx.is_empty())
    }
}

impl Write for MockUart {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let state = &mut *self.state.borrow_mut();
        state.tx.extend_from_slice(buf);
        for &byte in buf {
            if byte == b'\r' || byte == b'\n' || byte == CTRL_Z {
                state.end_of_line();
            } else {
                state.line.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_response_follows_command_line() {
        let mut uart = MockUart::new();
        uart.on_command("AT+CSQ", "\r\n+CSQ: 20,0\r\n\r\nOK\r\n");
        uart.write_all(b"AT+CSQ").unwrap();
        assert!(!uart.read_ready().unwrap());
        uart.write_all(b"\r").unwrap();
        assert!(uart.read_ready().unwrap());

        let mut buf = [0u8; 64];
        let n = uart.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"\r\n+CSQ: 20,0\r\n\r\nOK\r\n");
        assert_eq!(uart.transmitted(), b"AT+CSQ\r");
    }

    #[test]
    fn empty_receive_reads_zero() {
        let mut uart = MockUart::new();
        let mut buf = [0u8; 4];
        assert_eq!(uart.read(&mut buf).unwrap(), 0);
        uart.feed(b"ab");
        assert_eq!(uart.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(uart.pending(), 0);
    }
}
