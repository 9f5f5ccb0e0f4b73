//! Mock implementations for testing
//!
//! Host-side stand-ins for every handle a [`Board`](crate::Board) hands out,
//! plus [`MockBoard`] tying them together. Handles are cheap clones sharing
//! state through `Rc<RefCell<_>>`, so a test (or demo) keeps a clone to
//! inject input and inspect traffic after the driver has taken ownership.
//!
//! # Example
//!
//! ```ignore
//! use platform::mocks::MockBoard;
//! use platform::{Board, I2cConfig, Socket};
//! use embedded_hal::i2c::I2c;
//!
//! let mut board = MockBoard::new();
//! board.i2c().set_register(0x44, 0x7E, &[0x54, 0x49]);
//!
//! let pins = Socket::Mikrobus1.pins();
//! let config = I2cConfig { scl: pins.scl, sda: pins.sda, ..I2cConfig::default() };
//! let mut bus = board.open_i2c(&config).unwrap();
//!
//! let mut id = [0u8; 2];
//! bus.write_read(0x44, &[0x7E], &mut id).unwrap();
//! assert_eq!(id, [0x54, 0x49]);
//! ```

#![cfg(any(test, feature = "std"))]

mod board;
mod bus;
mod gpio;
mod uart;

pub use board::MockBoard;
pub use bus::{MockI2c, MockSpi};
pub use gpio::{MockAnalog, MockDelay, MockPin, MockPwm};
pub use uart::MockUart;

/// Copy `source` into `target`, zero-filling whatever `source` does not cover.
fn fill(target: &mut [u8], source: &[u8]) {
    for (i, byte) in target.iter_mut().enumerate() {
        *byte = source.get(i).copied().unwrap_or(0);
    }
}
