//! Fingerprint Click
//!
//! R50x-family optical sensor. Every exchange is a command packet answered
//! by one acknowledge packet:
//!
//! ```text
//! EF 01 | address (4) | PID | length (2) | payload | checksum (2)
//! ```
//!
//! All multi-byte fields are big endian. `length` counts the payload plus
//! the checksum; the checksum is the 16-bit sum of PID, length and payload.
//! The first payload byte of an acknowledge is the confirmation code.

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use platform::{Board, MikrobusPins, PinName};

use crate::config::{uart_bus, ClickConfig};
use crate::error::{Error, Result};

/// Packet header.
pub const HEADER: [u8; 2] = [0xEF, 0x01];
/// Factory module address.
pub const DEFAULT_ADDRESS: u32 = 0xFFFF_FFFF;
/// Factory baud rate.
pub const DEFAULT_BAUD: u32 = 57_600;
/// Largest packet handled (header, address, PID, length, 32-byte payload,
/// checksum).
pub const MAX_PACKET: usize = 9 + 32 + 2;

const HEADER_LEN: usize = 9;

/// Packet identifiers
#[allow(missing_docs)]
pub mod pid {
    pub const COMMAND: u8 = 0x01;
    pub const DATA: u8 = 0x02;
    pub const ACK: u8 = 0x07;
    pub const END_OF_DATA: u8 = 0x08;
}

/// Instruction codes
#[allow(missing_docs)]
pub mod instruction {
    pub const GEN_IMG: u8 = 0x01;
    pub const IMG_2_TZ: u8 = 0x02;
    pub const VFY_PWD: u8 = 0x13;
    pub const TEMPLATE_NUM: u8 = 0x1D;
}

/// Confirmation code: no finger on the sensor.
pub const NO_FINGER: u8 = 0x02;

/// Frame `payload` as one packet.
pub fn build_packet(
    address: u32,
    pid: u8,
    payload: &[u8],
) -> Result<heapless::Vec<u8, MAX_PACKET>> {
    let length = u16::try_from(payload.len() + 2).map_err(|_| Error::InvalidArgument)?;
    let mut packet = heapless::Vec::<u8, MAX_PACKET>::new();
    let mut put = |bytes: &[u8]| packet.extend_from_slice(bytes).map_err(|_| Error::InvalidArgument);
    put(&HEADER)?;
    put(&address.to_be_bytes())?;
    put(&[pid])?;
    put(&length.to_be_bytes())?;
    put(payload)?;
    let sum = checksum(pid, length, payload);
    put(&sum.to_be_bytes())?;
    Ok(packet)
}

fn checksum(pid: u8, length: u16, payload: &[u8]) -> u16 {
    let [len_hi, len_lo] = length.to_be_bytes();
    [pid, len_hi, len_lo]
        .iter()
        .chain(payload)
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// Decoded acknowledge packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Confirmation code; 0 is success.
    pub code: u8,
    /// Payload after the confirmation code.
    pub data: heapless::Vec<u8, 32>,
}

impl Ack {
    /// `Ok(self)` for confirmation code 0, otherwise `Device(code)`.
    pub fn success(self) -> Result<Self> {
        if self.code == 0 {
            Ok(self)
        } else {
            Err(Error::Device(self.code))
        }
    }
}

/// Parse a complete packet expected to be an acknowledge.
pub fn parse_ack(packet: &[u8]) -> Result<Ack> {
    let [h0, h1, _, _, _, _, packet_id, len_hi, len_lo, rest @ ..] = packet else {
        return Err(Error::Checksum);
    };
    if [*h0, *h1] != HEADER {
        return Err(Error::Checksum);
    }
    let length = u16::from_be_bytes([*len_hi, *len_lo]);
    if usize::from(length) != rest.len() {
        return Err(Error::Checksum);
    }
    let [payload @ .., sum_hi, sum_lo] = rest else {
        return Err(Error::Checksum);
    };
    if u16::from_be_bytes([*sum_hi, *sum_lo]) != checksum(*packet_id, length, payload) {
        return Err(Error::Checksum);
    }
    if *packet_id != pid::ACK {
        return Err(Error::Device(*packet_id));
    }
    let (&code, data) = payload.split_first().ok_or(Error::Checksum)?;
    Ok(Ack {
        code,
        data: heapless::Vec::from_slice(data).map_err(|_| Error::Checksum)?,
    })
}

/// Fingerprint Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// UART receive
    pub rx: PinName,
    /// UART transmit
    pub tx: PinName,
    /// Baud rate
    pub baud_rate: u32,
    /// Module address
    pub address: u32,
    /// Polls (1 ms apart) before an acknowledge times out
    pub timeout_polls: u32,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            baud_rate: DEFAULT_BAUD,
            address: DEFAULT_ADDRESS,
            timeout_polls: 1000,
        }
    }
}

impl ClickConfig for FingerprintConfig {
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

/// Fingerprint Click driver
#[derive(Debug)]
pub struct Fingerprint<U, D> {
    uart: U,
    delay: D,
    address: u32,
    timeout_polls: u32,
}

impl<U, D> Fingerprint<U, D>
where
    U: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Open the UART.
    pub fn init<B>(board: &mut B, config: &FingerprintConfig) -> Result<Self>
    where
        B: Board<Uart = U, Delay = D>,
    {
        let uart = board.open_uart(&uart_bus(config.rx, config.tx, config.baud_rate))?;
        Ok(Self::new(uart, board.delay(), config.address, config.timeout_polls))
    }

    /// Wrap an already-open UART.
    pub fn new(uart: U, delay: D, address: u32, timeout_polls: u32) -> Self {
        Self {
            uart,
            delay,
            address,
            timeout_polls,
        }
    }

    /// Send a command packet carrying `instruction` and `params`.
    pub fn send_command(&mut self, instruction: u8, params: &[u8]) -> Result<()> {
        let mut payload = heapless::Vec::<u8, 32>::new();
        payload.push(instruction).map_err(|_| Error::InvalidArgument)?;
        payload
            .extend_from_slice(params)
            .map_err(|_| Error::InvalidArgument)?;
        let packet = build_packet(self.address, pid::COMMAND, &payload)?;
        self.uart
            .write_all(&packet)
            .and_then(|()| self.uart.flush())
            .map_err(Error::uart)
    }

    /// Wait for one acknowledge packet.
    ///
    /// Bytes before the `EF 01` header are skipped. Fails with `Timeout`
    /// when no complete packet arrives within the poll budget, `Checksum`
    /// on a corrupt packet, `Device(pid)` when the packet is not an
    /// acknowledge.
    pub fn read_ack(&mut self) -> Result<Ack> {
        let mut packet = heapless::Vec::<u8, MAX_PACKET>::new();
        let mut polls = 0u32;
        loop {
            while self.uart.read_ready().map_err(Error::uart)? {
                let mut byte = [0u8; 1];
                if self.uart.read(&mut byte).map_err(Error::uart)? == 0 {
                    break;
                }
                let [byte] = byte;
                if packet.len() < HEADER.len() && HEADER.get(packet.len()) != Some(&byte) {
                    packet.clear();
                    if byte == HEADER[0] {
                        packet.push(byte).map_err(|_| Error::Checksum)?;
                    }
                    continue;
                }
                packet.push(byte).map_err(|_| Error::Checksum)?;
                if let Some(total) = packet_len(&packet) {
                    if total > MAX_PACKET {
                        return Err(Error::Checksum);
                    }
                    if packet.len() == total {
                        return parse_ack(&packet);
                    }
                }
            }
            polls += 1;
            if polls > self.timeout_polls {
                log_warn!("fingerprint acknowledge timed out");
                return Err(Error::Timeout);
            }
            self.delay.delay_ms(1);
        }
    }

    fn exchange(&mut self, instruction: u8, params: &[u8]) -> Result<Ack> {
        self.send_command(instruction, params)?;
        self.read_ack()
    }

    /// Unlock the module with `password`.
    pub fn verify_password(&mut self, password: u32) -> Result<()> {
        self.exchange(instruction::VFY_PWD, &password.to_be_bytes())?
            .success()
            .map(drop)
    }

    /// Capture a finger image; `Ok(false)` when no finger is present.
    pub fn capture_image(&mut self) -> Result<bool> {
        let ack = self.exchange(instruction::GEN_IMG, &[])?;
        if ack.code == NO_FINGER {
            return Ok(false);
        }
        ack.success().map(|_| true)
    }

    /// Extract features of the captured image into char buffer 1 or 2.
    pub fn image_to_char(&mut self, buffer: u8) -> Result<()> {
        if !(1..=2).contains(&buffer) {
            return Err(Error::InvalidArgument);
        }
        self.exchange(instruction::IMG_2_TZ, &[buffer])?
            .success()
            .map(drop)
    }

    /// Number of stored templates.
    pub fn template_count(&mut self) -> Result<u16> {
        let ack = self.exchange(instruction::TEMPLATE_NUM, &[])?.success()?;
        match *ack.data {
            [hi, lo, ..] => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(Error::Checksum),
        }
    }
}

/// Total packet length once the header is complete.
fn packet_len(packet: &[u8]) -> Option<usize> {
    match packet {
        [_, _, _, _, _, _, _, hi, lo, ..] => {
            Some(HEADER_LEN + usize::from(u16::from_be_bytes([*hi, *lo])))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::{MockBoard, MockDelay, MockUart};
    use platform::Socket;

    const ACK_OK: [u8; 12] = [0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x03, 0x00, 0x00, 0x0A];

    fn setup() -> (MockUart, Fingerprint<MockUart, MockDelay>) {
        let mut board = MockBoard::new();
        let config = FingerprintConfig {
            timeout_polls: 10,
            ..FingerprintConfig::mikrobus(Socket::Mikrobus1)
        };
        let sensor = Fingerprint::init(&mut board, &config).unwrap();
        assert_eq!(board.uart_opened()[0].baud_rate, 57_600);
        (board.uart(config.rx), sensor)
    }

    #[test]
    fn packet_layout() {
        let packet = build_packet(DEFAULT_ADDRESS, pid::COMMAND, &[0x13, 0, 0, 0, 0]).unwrap();
        assert_eq!(
            &packet[..],
            &[0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x07, 0x13, 0, 0, 0, 0, 0x00, 0x1B]
        );
        assert!(build_packet(DEFAULT_ADDRESS, pid::DATA, &[0u8; 40]).is_err());
    }

    #[test]
    fn ack_parsing() {
        assert_eq!(
            parse_ack(&ACK_OK),
            Ok(Ack {
                code: 0,
                data: heapless::Vec::new()
            })
        );
        let mut corrupt = ACK_OK;
        corrupt[11] = 0x0B;
        assert_eq!(parse_ack(&corrupt), Err(Error::Checksum));

        let data = [0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x02, 0x00, 0x03, 0x00, 0x00, 0x05];
        assert_eq!(parse_ack(&data), Err(Error::Device(pid::DATA)));
    }

    #[test]
    fn verify_password_round_trip() {
        let (uart, mut sensor) = setup();
        uart.feed(&ACK_OK);
        sensor.verify_password(0).unwrap();
        assert_eq!(
            uart.transmitted(),
            vec![0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x07, 0x13, 0, 0, 0, 0, 0x00, 0x1B]
        );
    }

    #[test]
    fn capture_without_finger() {
        let (uart, mut sensor) = setup();
        uart.feed(&[0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x03, 0x02, 0x00, 0x0C]);
        assert_eq!(sensor.capture_image(), Ok(false));
        uart.feed(&ACK_OK);
        assert_eq!(sensor.capture_image(), Ok(true));
    }

    #[test]
    fn image_to_char_checks_buffer() {
        let (uart, mut sensor) = setup();
        assert_eq!(sensor.image_to_char(3), Err(Error::InvalidArgument));
        uart.feed(&ACK_OK);
        sensor.image_to_char(1).unwrap();
        assert_eq!(
            uart.transmitted(),
            vec![0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x04, 0x02, 0x01, 0x00, 0x08]
        );
    }

    #[test]
    fn template_count_after_noise() {
        let (uart, mut sensor) = setup();
        uart.feed(&[0x00, 0xEF, 0x55]);
        uart.feed(&[0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x05, 0x00, 0x00, 0x05, 0x00, 0x11]);
        assert_eq!(sensor.template_count(), Ok(5));
    }

    #[test]
    fn error_code_and_timeout() {
        let (uart, mut sensor) = setup();
        uart.feed(&[0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x03, 0x13, 0x00, 0x1D]);
        assert_eq!(sensor.verify_password(1), Err(Error::Device(0x13)));
        assert_eq!(sensor.template_count(), Err(Error::Timeout));
    }
}
