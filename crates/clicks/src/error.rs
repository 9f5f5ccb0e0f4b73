//! Catalog error type
//!
//! HAL errors are reduced to their embedded-hal `ErrorKind` at the driver
//! boundary so every driver returns the same concrete [`Error`].

use thiserror_no_std::Error;

use platform::HalError;

use crate::scan::{AtError, FrameError, NmeaError};

/// Result type for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Opening a handle failed during `init`.
    #[error("init failed: {0}")]
    Platform(#[from] platform::Error),

    /// I2C transaction failed.
    #[error("I2C error: {0:?}")]
    I2c(embedded_hal::i2c::ErrorKind),

    /// SPI transaction failed.
    #[error("SPI error: {0:?}")]
    Spi(embedded_hal::spi::ErrorKind),

    /// GPIO access failed.
    #[error("GPIO error: {0:?}")]
    Pin(embedded_hal::digital::ErrorKind),

    /// UART read or write failed.
    #[error("UART error: {0:?}")]
    Uart(embedded_io::ErrorKind),

    /// ADC / PWM primitive failed.
    #[error("HAL error: {0}")]
    Hal(#[from] HalError),

    /// Selector or value outside the documented range.
    #[error("invalid argument")]
    InvalidArgument,

    /// The device did not answer within the poll budget.
    #[error("timed out")]
    Timeout,

    /// NMEA field extraction failed.
    #[error("NMEA: {0}")]
    Nmea(#[from] NmeaError),

    /// AT response scanning failed.
    #[error("AT: {0}")]
    At(#[from] AtError),

    /// Frame extraction failed.
    #[error("frame: {0}")]
    Frame(#[from] FrameError),

    /// A received checksum did not match.
    #[error("checksum mismatch")]
    Checksum,

    /// The device answered with an error or unexpected identity code.
    #[error("device reported 0x{0:02X}")]
    Device(u8),
}

impl Error {
    /// Reduce an I2C bus error to its kind.
    pub fn i2c<E: embedded_hal::i2c::Error>(err: E) -> Self {
        Self::I2c(err.kind())
    }

    /// Reduce an SPI device error to its kind.
    pub fn spi<E: embedded_hal::spi::Error>(err: E) -> Self {
        Self::Spi(err.kind())
    }

    /// Reduce a GPIO error to its kind.
    pub fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Self::Pin(err.kind())
    }

    /// Reduce a UART error to its kind.
    pub fn uart<E: embedded_io::Error>(err: E) -> Self {
        Self::Uart(err.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hal_errors_reduce_to_kind() {
        let err = Error::i2c(embedded_hal::i2c::ErrorKind::ArbitrationLoss);
        assert_eq!(err, Error::I2c(embedded_hal::i2c::ErrorKind::ArbitrationLoss));
        let err = Error::uart(embedded_io::ErrorKind::TimedOut);
        assert_eq!(err, Error::Uart(embedded_io::ErrorKind::TimedOut));
    }

    #[test]
    fn platform_errors_convert() {
        let err: Error = platform::Error::NotConnected.into();
        assert_eq!(err, Error::Platform(platform::Error::NotConnected));
        let err: Error = HalError::InvalidDuty.into();
        assert_eq!(err, Error::Hal(HalError::InvalidDuty));
    }
}
