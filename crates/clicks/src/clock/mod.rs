//! Timekeeping boards

pub mod rtc;
