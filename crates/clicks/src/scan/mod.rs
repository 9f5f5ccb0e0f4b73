//! Byte-stream scanners
//!
//! The UART boards (GPS, GNSS, cellular, RFID, fingerprint) accumulate bytes
//! into a fixed buffer and then pull a field out of it. Nothing here keeps
//! state beyond the buffer and a poll counter.
//!
//! - [`nmea`] - comma-field extraction from NMEA 0183 sentences
//! - [`at`] - AT-command response accumulation and line extraction
//! - [`frame`] - bytes between a start and an end marker

pub mod at;
pub mod frame;
pub mod nmea;

pub use at::{AtError, AtResponse, ResponseReader};
pub use frame::{extract_frame, FrameError};
pub use nmea::{parse_element, NmeaError};

/// Index of the first occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
