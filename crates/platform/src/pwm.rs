//! PWM output abstraction
//!
//! Mirrors the open / freq / duty / start / stop call group of the vendor
//! HALs. embedded-hal's `SetDutyCycle` covers only the duty part.

use crate::error::HalError;

/// Single PWM output channel.
///
/// Duty cycle is a fraction in `0.0..=1.0`; anything outside is rejected
/// with [`HalError::InvalidDuty`] and leaves the output untouched.
pub trait PwmOut {
    /// Change the carrier frequency.
    fn set_frequency(&mut self, hz: u32) -> Result<(), HalError>;

    /// Current carrier frequency in Hz.
    fn frequency(&self) -> u32;

    /// Set the duty cycle.
    fn set_duty(&mut self, duty: f32) -> Result<(), HalError>;

    /// Start driving the output.
    fn start(&mut self) -> Result<(), HalError>;

    /// Stop driving the output (pin idles low).
    fn stop(&mut self) -> Result<(), HalError>;
}

/// Reject duty cycles outside `0.0..=1.0` (NaN included).
pub fn check_duty(duty: f32) -> Result<f32, HalError> {
    if (0.0..=1.0).contains(&duty) {
        Ok(duty)
    } else {
        Err(HalError::InvalidDuty)
    }
}
