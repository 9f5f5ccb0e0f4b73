//! Platform seam for MikroE Click board drivers
//!
//! Every Click driver talks to the host MCU through a small family of
//! primitives: GPIO, SPI, I2C, UART, ADC, PWM and a busy-wait delay. This
//! crate does not implement those primitives. It declares the seam they are
//! consumed through and the wiring contract between a board and the MCU.
//!
//! # Architecture Layers
//!
//! ```text
//! Demo application (demo crate)
//!         ↓
//! Click drivers (clicks crate)
//!         ↓
//! Platform seam (this crate: Board, MikroBUS pin model, bus configs)
//!         ↓
//! Vendor HAL (embedded-hal implementations for a concrete MCU)
//! ```
//!
//! # Modules
//!
//! - [`mikrobus`] - socket / pin-role model replacing per-board pin macros
//! - [`peripheral`] - unbound bus configuration records (SPI, I2C, UART, ADC, PWM)
//! - [`board`] - the [`Board`] trait through which drivers open handles
//! - [`analog`] / [`pwm`] - ADC and PWM traits (embedded-hal 1.0 has neither)
//! - [`config`] - documented bus defaults
//! - [`mocks`] - host-side mock board (`std` feature)
//!
//! # Features
//!
//! - `std`: host mock board used by tests and the demo binaries
//! - `defmt`: `defmt::Format` derives for target builds

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
// Pedantic lints suppressed for this HAL seam crate:
#![allow(clippy::doc_markdown)] // pin and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod analog;
pub mod board;
pub mod config;
pub mod error;
pub mod mikrobus;
pub mod peripheral;
pub mod pwm;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use analog::{AdcResolution, AnalogIn};
pub use board::Board;
pub use error::{Error, HalError, Result};
pub use mikrobus::{MikrobusPins, PinName, PinRole, Socket};
pub use peripheral::{
    AnalogConfig, BitOrder, ChipSelectPolarity, DataBits, I2cConfig, I2cSpeed, Parity, PwmConfig,
    SpiConfig, SpiMode, StopBits, UartConfig,
};
pub use pwm::PwmOut;

// Pin levels are shared with embedded-hal so drivers need only one type.
pub use embedded_hal::digital::PinState;
