//! RFID Click (125 kHz)
//!
//! EM4100 reader reporting each tag as an ASCII frame:
//!
//! ```text
//! STX  D0 D1 .. D9  C0 C1  CR LF  ETX
//! ```
//!
//! Ten hex digits of tag data and two of checksum; the checksum is the XOR
//! of the five data bytes.

use embedded_io::{Read, ReadReady};
use platform::{Board, MikrobusPins, PinName};

use crate::config::{uart_bus, ClickConfig};
use crate::error::{Error, Result};
use crate::scan::{extract_frame, FrameError};

const STX: u8 = 0x02;
const ETX: u8 = 0x03;
/// Receive buffer; a frame is 16 bytes.
const BUFFER: usize = 64;

/// Tag identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tag(pub [u8; 5]);

impl Tag {
    /// Version / customer byte.
    pub fn customer(&self) -> u8 {
        self.0[0]
    }

    /// 32-bit serial number.
    pub fn serial(&self) -> u32 {
        let [_, a, b, c, d] = self.0;
        u32::from_be_bytes([a, b, c, d])
    }
}

/// Decode the bytes between STX and ETX.
pub fn decode_frame(payload: &[u8]) -> Result<Tag> {
    let mut bytes = [0u8; 6];
    let mut digits = 0usize;
    for &ch in payload.iter().filter(|&&b| b != b'\r' && b != b'\n') {
        let nibble = hex_value(ch).ok_or(Error::Checksum)?;
        let slot = bytes.get_mut(digits / 2).ok_or(Error::Checksum)?;
        *slot = (*slot << 4) | nibble;
        digits += 1;
    }
    if digits != 12 {
        return Err(Error::Checksum);
    }
    let [a, b, c, d, e, check] = bytes;
    if a ^ b ^ c ^ d ^ e != check {
        return Err(Error::Checksum);
    }
    Ok(Tag([a, b, c, d, e]))
}

fn hex_value(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}

/// RFID Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfidConfig {
    /// UART receive
    pub rx: PinName,
    /// UART transmit
    pub tx: PinName,
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for RfidConfig {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            baud_rate: platform::config::UART_DEFAULT_BAUD,
        }
    }
}

impl ClickConfig for RfidConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            rx: pins.rx,
            tx: pins.tx,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            rx: self.rx,
            tx: self.tx,
            ..MikrobusPins::default()
        }
    }
}

/// RFID Click driver
#[derive(Debug)]
pub struct Rfid<U> {
    uart: U,
    buffer: heapless::Vec<u8, BUFFER>,
}

impl<U: Read + ReadReady> Rfid<U> {
    /// Open the UART.
    pub fn init<B: Board<Uart = U>>(board: &mut B, config: &RfidConfig) -> Result<Self> {
        let uart = board.open_uart(&uart_bus(config.rx, config.tx, config.baud_rate))?;
        Ok(Self::new(uart))
    }

    /// Wrap an already-open UART.
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            buffer: heapless::Vec::new(),
        }
    }

    /// Collect pending bytes and decode a complete frame if one arrived.
    ///
    /// `Ok(None)` while no frame is complete. A complete frame is consumed
    /// whether or not its checksum holds.
    pub fn read_tag(&mut self) -> Result<Option<Tag>> {
        self.fill()?;
        let payload = match extract_frame(&self.buffer, &[STX], &[ETX]) {
            Ok(payload) => payload,
            Err(FrameError::EndNotFound) => return Ok(None),
            Err(FrameError::StartNotFound) => {
                self.buffer.clear();
                return Ok(None);
            }
        };
        let tag = decode_frame(payload);
        self.consume_frame();
        if tag.is_err() {
            log_warn!("RFID frame rejected");
        }
        tag.map(Some)
    }

    /// Drop everything up to and including the first ETX after STX; bytes
    /// of the next frame stay buffered.
    fn consume_frame(&mut self) {
        let end = self
            .buffer
            .iter()
            .position(|&b| b == STX)
            .and_then(|stx| {
                let etx = self.buffer.iter().skip(stx).position(|&b| b == ETX)?;
                Some(stx + etx + 1)
            })
            .unwrap_or(self.buffer.len());
        let tail = self.buffer.get(end..).unwrap_or_default();
        let rest: heapless::Vec<u8, BUFFER> = heapless::Vec::from_slice(tail).unwrap_or_default();
        self.buffer = rest;
    }

    fn fill(&mut self) -> Result<()> {
        while self.uart.read_ready().map_err(Error::uart)? {
            let mut chunk = [0u8; 16];
            let count = self.uart.read(&mut chunk).map_err(Error::uart)?;
            if count == 0 {
                break;
            }
            for &byte in chunk.get(..count).unwrap_or_default() {
                if self.buffer.push(byte).is_err() {
                    // overflow without ETX: restart on this byte
                    self.buffer.clear();
                    let _ = self.buffer.push(byte);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::{MockBoard, MockUart};
    use platform::Socket;

    const FRAME: &[u8] = b"\x020415D9F6B28C\r\n\x03";

    #[test]
    fn decodes_valid_frame() {
        let tag = decode_frame(b"0415D9F6B28C\r\n").unwrap();
        assert_eq!(tag, Tag([0x04, 0x15, 0xD9, 0xF6, 0xB2]));
        assert_eq!(tag.customer(), 0x04);
        assert_eq!(tag.serial(), 0x15D9_F6B2);
    }

    #[test]
    fn bad_checksum_or_digits() {
        assert_eq!(decode_frame(b"0415D9F6B28D"), Err(Error::Checksum));
        assert_eq!(decode_frame(b"0415D9F6B2"), Err(Error::Checksum));
        assert_eq!(decode_frame(b"0415D9F6B28C00"), Err(Error::Checksum));
        assert_eq!(decode_frame(b"0415D9F6B2ZZ"), Err(Error::Checksum));
    }

    #[test]
    fn frame_assembles_across_reads() {
        let mut board = MockBoard::new();
        let config = RfidConfig::mikrobus(Socket::Mikrobus1);
        let mut rfid = Rfid::init(&mut board, &config).unwrap();
        let uart: MockUart = board.uart(config.rx);

        assert_eq!(rfid.read_tag(), Ok(None));
        uart.feed(&FRAME[..7]);
        assert_eq!(rfid.read_tag(), Ok(None));
        uart.feed(&FRAME[7..]);
        let tag = rfid.read_tag().unwrap().unwrap();
        assert_eq!(tag.serial(), 0x15D9_F6B2);
        assert_eq!(rfid.read_tag(), Ok(None));
    }

    #[test]
    fn back_to_back_frames_are_both_read() {
        let mut board = MockBoard::new();
        let config = RfidConfig::mikrobus(Socket::Mikrobus1);
        let mut rfid = Rfid::init(&mut board, &config).unwrap();
        let uart = board.uart(config.rx);

        let second = b"\x02010203040501\r\n\x03";
        let mut stream = FRAME.to_vec();
        stream.extend_from_slice(second);
        stream.extend_from_slice(&FRAME[..5]);
        uart.feed(&stream);

        assert_eq!(rfid.read_tag().unwrap().unwrap().serial(), 0x15D9_F6B2);
        assert_eq!(rfid.read_tag().unwrap(), Some(Tag([0x01, 0x02, 0x03, 0x04, 0x05])));
        assert_eq!(rfid.read_tag(), Ok(None));
        uart.feed(&FRAME[5..]);
        assert_eq!(rfid.read_tag().unwrap().unwrap().customer(), 0x04);
    }

    #[test]
    fn noise_before_stx_is_discarded() {
        let mut board = MockBoard::new();
        let config = RfidConfig::mikrobus(Socket::Mikrobus2);
        let mut rfid = Rfid::init(&mut board, &config).unwrap();
        let uart = board.uart(config.rx);
        uart.feed(b"\xFF\x00junk");
        assert_eq!(rfid.read_tag(), Ok(None));
        uart.feed(b"junk");
        uart.feed(FRAME);
        assert!(rfid.read_tag().unwrap().is_some());

        uart.feed(b"\x020415D9F6B28D\r\n\x03");
        assert_eq!(rfid.read_tag(), Err(Error::Checksum));
    }
}
