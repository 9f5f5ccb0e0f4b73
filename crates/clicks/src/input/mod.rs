//! Digital input boards

pub mod button_g;
pub mod opto;
