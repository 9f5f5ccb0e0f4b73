//! MikroE Click board driver catalog
//!
//! Each module drives one Click board through the [`platform`] seam. Every
//! driver has the same shape:
//!
//! ```text
//! <Name>Config::default()          unmapped pins, documented bus defaults
//! <Name>Config::mikrobus(socket)   same, pins bound to a MikroBUS socket
//! <Name>::init(&mut board, &cfg)   open handles through platform::Board
//! <Name>::default_cfg()            fixed power-on sequence (some boards)
//! accessors                        one bus transaction each
//! ```
//!
//! Drivers are generic over embedded-hal 1.0 handles, so `<Name>::new(..)`
//! accepts handles opened elsewhere.
//!
//! # Modules
//!
//! - [`scan`] - NMEA, AT-response and frame scanners shared by UART boards
//! - [`actuator`] - relay, vibro, buzz, DC motor
//! - [`input`] - opto, button G
//! - [`sensor`] - ambient 2, color 2, proximity, thermo 4, temp&hum 4,
//!   thermo, accel, current 2, RMS to DC
//! - [`converter`] - DAC, DAC 3, ADC, DIGI POT, PWM
//! - [`interface`] - RS485, expand 2, I2C / SPI isolators
//! - [`storage`] / [`clock`] - EEPROM, RTC
//! - [`location`] - GPS 4, GNSS
//! - [`cellular`] - NB IoT, GSM
//! - [`identification`] - RFID, fingerprint
//!
//! # Features
//!
//! - `defmt`: log through defmt, derive `defmt::Format` on public types
//! - `tracing`: log through tracing (host builds)

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
// Pedantic lints suppressed for this driver crate:
#![allow(clippy::doc_markdown)] // part numbers and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)] // Ambient2Config in ambient2
#![allow(clippy::missing_errors_doc)] // every accessor returns crate::Error

#[macro_use]
mod logging;

pub mod config;
pub mod error;
pub mod scan;

pub mod actuator;
pub mod cellular;
pub mod clock;
pub mod converter;
pub mod identification;
pub mod input;
pub mod interface;
pub mod location;
pub mod sensor;
pub mod storage;

pub use config::ClickConfig;
pub use error::{Error, Result};

// Flat paths: `clicks::ambient2::Ambient2`.
pub use actuator::{buzz, dc_motor, relay, vibro};
pub use cellular::{gsm, nbiot};
pub use clock::rtc;
pub use converter::{adc, dac, dac3, digipot, pwm};
pub use identification::{fingerprint, rfid};
pub use input::{button_g, opto};
pub use interface::{expand2, i2c_isolator, rs485, spi_isolator};
pub use location::{gnss, gps4};
pub use sensor::{accel, ambient2, color2, current2, proximity, rmstodc, temphum4, thermo, thermo4};
pub use storage::eeprom;
