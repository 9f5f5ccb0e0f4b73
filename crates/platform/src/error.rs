//! Platform error types
//!
//! Opening a handle is the only platform operation that can fail in a way
//! drivers care about; bus transactions report through the embedded-hal
//! error kinds of the handle itself.

use thiserror_no_std::Error;

use crate::mikrobus::PinRole;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while binding a configuration to handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A bus pin required by the configuration is `NC`.
    #[error("{0:?} pin is not mapped")]
    UnmappedPin(PinRole),
    /// A plain GPIO was requested on an `NC` pin.
    #[error("GPIO pin is not connected")]
    NotConnected,
    /// The HAL cannot provide the requested bus parameters.
    #[error("unsupported configuration: {0}")]
    Unsupported(&'static str),
    /// The peripheral is already owned by another handle.
    #[error("peripheral busy")]
    Busy,
    /// ADC / PWM primitive failure.
    #[error("HAL error: {0}")]
    Hal(HalError),
}

impl From<HalError> for Error {
    fn from(err: HalError) -> Self {
        Self::Hal(err)
    }
}

/// Errors reported by the [`AnalogIn`](crate::AnalogIn) and
/// [`PwmOut`](crate::PwmOut) primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// The ADC did not produce a sample.
    #[error("ADC conversion failed")]
    Conversion,
    /// Duty cycle outside `0.0..=1.0`.
    #[error("duty cycle out of range")]
    InvalidDuty,
    /// The timer cannot generate this frequency.
    #[error("unsupported PWM frequency {0} Hz")]
    InvalidFrequency(u32),
}
