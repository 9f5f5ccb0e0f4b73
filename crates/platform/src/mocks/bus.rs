//! Mock I2C and SPI buses

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::i2c::{self, I2c, NoAcknowledgeSource};
use embedded_hal::spi::{self, SpiDevice};

use super::fill;

#[derive(Debug, Default)]
struct I2cState {
    registers: HashMap<(u8, u8), Vec<u8>>,
    pointer: HashMap<u8, u8>,
    queued: HashMap<u8, VecDeque<Vec<u8>>>,
    writes: Vec<(u8, Vec<u8>)>,
    absent: HashSet<u8>,
}

/// Mock I2C bus
///
/// Models each slave as a register file keyed by the first byte of a write.
/// A write `[reg, data..]` stores `data` under `reg` and moves the register
/// pointer; a read returns the bytes stored under the current pointer
/// (zero-padded). Reads queued with [`MockI2c::queue_read`] take priority,
/// which suits devices without a register pointer.
#[derive(Debug, Clone, Default)]
pub struct MockI2c {
    state: Rc<RefCell<I2cState>>,
}

impl MockI2c {
    /// Create an empty bus where every address acknowledges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the contents of `reg` on slave `address`.
    pub fn set_register(&self, address: u8, reg: u8, value: &[u8]) {
        self.state
            .borrow_mut()
            .registers
            .insert((address, reg), value.to_vec());
    }

    /// Current contents of `reg` on slave `address`.
    pub fn register(&self, address: u8, reg: u8) -> Option<Vec<u8>> {
        self.state.borrow().registers.get(&(address, reg)).cloned()
    }

    /// Queue a raw read response for slave `address`.
    pub fn queue_read(&self, address: u8, bytes: &[u8]) {
        self.state
            .borrow_mut()
            .queued
            .entry(address)
            .or_default()
            .push_back(bytes.to_vec());
    }

    /// Make `address` NACK every transaction.
    pub fn remove_device(&self, address: u8) {
        self.state.borrow_mut().absent.insert(address);
    }

    /// Every write seen so far as `(address, bytes)`.
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.state.borrow().writes.clone()
    }

    /// Forget recorded writes.
    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        let state = &mut *self.state.borrow_mut();
        if state.absent.contains(&address) {
            return Err(i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations.iter_mut() {
            match op {
                i2c::Operation::Write(data) => {
                    state.writes.push((address, data.to_vec()));
                    if let Some((reg, payload)) = data.split_first() {
                        state.pointer.insert(address, *reg);
                        if !payload.is_empty() {
                            state.registers.insert((address, *reg), payload.to_vec());
                        }
                    }
                }
                i2c::Operation::Read(buffer) => {
                    let queued = state
                        .queued
                        .get_mut(&address)
                        .and_then(VecDeque::pop_front);
                    let source = queued.unwrap_or_else(|| {
                        let reg = state.pointer.get(&address).copied().unwrap_or(0);
                        state
                            .registers
                            .get(&(address, reg))
                            .cloned()
                            .unwrap_or_default()
                    });
                    fill(buffer, &source);
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SpiState {
    transactions: Vec<Vec<u8>>,
    responses: VecDeque<Vec<u8>>,
}

/// Mock SPI device
///
/// Records the bytes written in each chip-select frame and answers every
/// read-type operation with the next queued response (zero-padded).
#[derive(Debug, Clone, Default)]
pub struct MockSpi {
    state: Rc<RefCell<SpiState>>,
}

impl MockSpi {
    /// Create a device with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the bytes the device clocks out on the next read operation.
    pub fn queue_response(&self, bytes: &[u8]) {
        self.state.borrow_mut().responses.push_back(bytes.to_vec());
    }

    /// Bytes written per chip-select frame, oldest first.
    pub fn transactions(&self) -> Vec<Vec<u8>> {
        self.state.borrow().transactions.clone()
    }

    /// Bytes written in the most recent frame.
    pub fn last_transaction(&self) -> Option<Vec<u8>> {
        self.state.borrow().transactions.last().cloned()
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [spi::Operation<'_, u8>]) -> Result<(), Self::Error> {
        let state = &mut *self.state.borrow_mut();
        let mut written = Vec::new();
        for op in operations.iter_mut() {
            match op {
                spi::Operation::Write(data) => written.extend_from_slice(data),
                spi::Operation::Read(buffer) => {
                    let response = state.responses.pop_front().unwrap_or_default();
                    fill(buffer, &response);
                }
                spi::Operation::Transfer(read, write) => {
                    written.extend_from_slice(write);
                    let response = state.responses.pop_front().unwrap_or_default();
                    fill(read, &response);
                }
                spi::Operation::TransferInPlace(buffer) => {
                    written.extend_from_slice(buffer);
                    let response = state.responses.pop_front().unwrap_or_default();
                    fill(buffer, &response);
                }
                spi::Operation::DelayNs(_) => {}
            }
        }
        state.transactions.push(written);
        Ok(())
    }
}
