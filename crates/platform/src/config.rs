//! Documented bus defaults
//!
//! Every Click configuration starts from these values. Drivers override only
//! what their board needs (slave address, SPI mode, baud rate).

/// I2C standard-mode clock (Hz).
pub const I2C_STANDARD_HZ: u32 = 100_000;

/// I2C fast-mode clock (Hz).
pub const I2C_FAST_HZ: u32 = 400_000;

/// I2C fast-mode-plus clock (Hz).
pub const I2C_FAST_PLUS_HZ: u32 = 1_000_000;

/// Default SPI clock (Hz).
pub const SPI_DEFAULT_HZ: u32 = 1_000_000;

/// Default UART baud rate for modules that do not autobaud.
pub const UART_DEFAULT_BAUD: u32 = 9_600;

/// Default UART software ring buffer size (bytes).
pub const UART_BUFFER_SIZE: usize = 256;

/// Default ADC reference voltage (V).
pub const ADC_DEFAULT_VREF: f32 = 3.3;

/// Default PWM carrier frequency (Hz).
pub const PWM_DEFAULT_HZ: u32 = 5_000;
