//! EEPROM Click
//!
//! 24C08 8 Kbit (1 KiB) I2C EEPROM. The two high address bits select one of
//! four 256-byte blocks through the slave address (`0x50 | block`); the low
//! eight bits are sent as the word address. Writes are buffered in 16-byte
//! pages and need a self-timed write cycle before the next access.
//!
//! Write protect is on the PWM pin (active high).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// Base 7-bit address (block 0).
pub const BASE_ADDRESS: u8 = 0x50;
/// Capacity in bytes.
pub const CAPACITY: usize = 1024;
/// Write page size in bytes.
pub const PAGE_SIZE: usize = 16;
/// Block size addressed by one slave address.
const BLOCK_SIZE: usize = 256;
/// Maximum self-timed write cycle (ms).
pub const WRITE_CYCLE_MS: u32 = 5;

/// EEPROM Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EepromConfig {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Write protect
    pub wp: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address of block 0
    pub address: u8,
}

impl Default for EepromConfig {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            wp: PinName::NC,
            speed: I2cSpeed::Fast,
            address: BASE_ADDRESS,
        }
    }
}

impl ClickConfig for EepromConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            scl: pins.scl,
            sda: pins.sda,
            wp: pins.pwm,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            scl: self.scl,
            sda: self.sda,
            pwm: self.wp,
            ..MikrobusPins::default()
        }
    }
}

/// EEPROM Click driver
#[derive(Debug)]
pub struct Eeprom<I, O, D> {
    i2c: I,
    wp: O,
    delay: D,
    address: u8,
}

impl<I, O, D> Eeprom<I, O, D>
where
    I: I2c,
    O: OutputPin,
    D: DelayNs,
{
    /// Open the bus with write protection released.
    pub fn init<B>(board: &mut B, config: &EepromConfig) -> Result<Self>
    where
        B: Board<I2c = I, Output = O, Delay = D>,
    {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        let wp = board.open_output(config.wp, PinState::Low)?;
        Ok(Self::new(i2c, wp, board.delay(), config.address))
    }

    /// Wrap already-open handles.
    pub fn new(i2c: I, wp: O, delay: D, address: u8) -> Self {
        Self {
            i2c,
            wp,
            delay,
            address,
        }
    }

    /// Assert or release hardware write protection.
    pub fn set_write_protect(&mut self, protect: bool) -> Result<()> {
        self.wp.set_state(PinState::from(protect)).map_err(Error::pin)
    }

    /// Write one byte and wait out the write cycle.
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        self.write_page(address, &[value])
    }

    /// Write up to one page starting at `address`; the data must not cross
    /// a page boundary.
    pub fn write_page(&mut self, address: u16, data: &[u8]) -> Result<()> {
        let start = usize::from(address);
        let offset = start % PAGE_SIZE;
        if data.is_empty() || offset + data.len() > PAGE_SIZE || start + data.len() > CAPACITY {
            return Err(Error::InvalidArgument);
        }
        let (slave, word) = self.split(start);
        let mut frame = [0u8; PAGE_SIZE + 1];
        frame[0] = word;
        frame[1..=data.len()].copy_from_slice(data);
        self.i2c
            .write(slave, &frame[..=data.len()])
            .map_err(Error::i2c)?;
        self.delay.delay_ms(WRITE_CYCLE_MS);
        Ok(())
    }

    /// Fill `buf` starting at `address`, splitting at block boundaries.
    pub fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<()> {
        let mut start = usize::from(address);
        if start + buf.len() > CAPACITY {
            return Err(Error::InvalidArgument);
        }
        let mut rest = buf;
        while !rest.is_empty() {
            let in_block = BLOCK_SIZE - start % BLOCK_SIZE;
            let (chunk, tail) = rest.split_at_mut(in_block.min(rest.len()));
            let (slave, word) = self.split(start);
            self.i2c
                .write_read(slave, &[word], chunk)
                .map_err(Error::i2c)?;
            start += chunk.len();
            rest = tail;
        }
        Ok(())
    }

    /// Read one byte.
    pub fn read_byte(&mut self, address: u16) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read(address, &mut buf)?;
        Ok(buf[0])
    }

    /// Slave address and word address of a linear address.
    fn split(&self, address: usize) -> (u8, u8) {
        let [low, high] = u16::try_from(address).unwrap_or(u16::MAX).to_le_bytes();
        (self.address | (high & 0x03), low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    fn eeprom(i2c: &I2cMock) -> Eeprom<I2cMock, PinMock, NoopDelay> {
        Eeprom::new(i2c.clone(), PinMock::new(&[]), NoopDelay::new(), BASE_ADDRESS)
    }

    #[test]
    fn block_bits_select_slave_address() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(0x50, vec![0x10, 0xAA]),
            Transaction::write(0x53, vec![0xFF, 0x55]),
        ]);
        let mut rom = eeprom(&i2c);
        rom.write_byte(0x010, 0xAA).unwrap();
        rom.write_byte(0x3FF, 0x55).unwrap();
        assert_eq!(rom.write_byte(0x400, 0x00), Err(Error::InvalidArgument));
        i2c.done();
        rom.wp.done();
    }

    #[test]
    fn page_write_rejects_boundary_crossing() {
        let mut i2c = I2cMock::new(&[Transaction::write(0x51, vec![0x20, 1, 2, 3, 4])]);
        let mut rom = eeprom(&i2c);
        rom.write_page(0x120, &[1, 2, 3, 4]).unwrap();
        assert_eq!(rom.write_page(0x12E, &[1, 2, 3]), Err(Error::InvalidArgument));
        assert_eq!(rom.write_page(0x120, &[]), Err(Error::InvalidArgument));
        i2c.done();
        rom.wp.done();
    }

    #[test]
    fn read_is_split_at_block_boundary() {
        let mut i2c = I2cMock::new(&[
            Transaction::write_read(0x50, vec![0xFE], vec![0x01, 0x02]),
            Transaction::write_read(0x51, vec![0x00], vec![0x03, 0x04]),
        ]);
        let mut rom = eeprom(&i2c);
        let mut buf = [0u8; 4];
        rom.read(0x0FE, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(rom.read(0x3FE, &mut buf), Err(Error::InvalidArgument));
        i2c.done();
        rom.wp.done();
    }

    #[test]
    fn write_waits_for_write_cycle() {
        let mut board = MockBoard::new();
        let config = EepromConfig::mikrobus(Socket::Mikrobus1);
        let mut rom = Eeprom::init(&mut board, &config).unwrap();
        rom.write_byte(0x042, 0x5A).unwrap();
        assert_eq!(board.delay_handle().elapsed_ms(), u64::from(WRITE_CYCLE_MS));
        assert_eq!(rom.read_byte(0x042), Ok(0x5A));

        rom.set_write_protect(true).unwrap();
        assert!(board.pin(config.wp).is_set_high());
    }
}
