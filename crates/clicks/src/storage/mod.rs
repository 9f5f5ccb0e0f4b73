//! Non-volatile storage boards

pub mod eeprom;
