//! Identification readers
//!
//! - [`rfid`] - 125 kHz EM4100 tags, ASCII frames between STX and ETX
//! - [`fingerprint`] - R50x sensor, checksummed command / acknowledge packets

pub mod fingerprint;
pub mod rfid;
