//! Peripheral configuration records
//!
//! Unbound bus parameters consumed once by [`Board`](crate::Board) when a
//! driver opens its handles. Every `Default` leaves pins at
//! [`PinName::NC`] and bus parameters at the values in [`crate::config`].

use crate::analog::AdcResolution;
use crate::config;
use crate::mikrobus::PinName;

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock pin
    pub sck: PinName,
    /// Master-in pin
    pub miso: PinName,
    /// Master-out pin
    pub mosi: PinName,
    /// Chip-select pin (owned by the resulting `SpiDevice`)
    pub cs: PinName,
    /// Clock frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL, CPHA)
    pub mode: SpiMode,
    /// Chip-select active level
    pub cs_polarity: ChipSelectPolarity,
    /// Bit order
    pub bit_order: BitOrder,
    /// Byte clocked out while reading
    pub default_write_data: u8,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            sck: PinName::NC,
            miso: PinName::NC,
            mosi: PinName::NC,
            cs: PinName::NC,
            frequency: config::SPI_DEFAULT_HZ,
            mode: SpiMode::Mode0,
            cs_polarity: ChipSelectPolarity::ActiveLow,
            bit_order: BitOrder::MsbFirst,
            default_write_data: 0x00,
        }
    }
}

/// SPI modes (CPOL, CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

/// Chip-select polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelectPolarity {
    /// Selected when low (almost every Click)
    ActiveLow,
    /// Selected when high
    ActiveHigh,
}

/// Bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock pin
    pub scl: PinName,
    /// Data pin
    pub sda: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// 7-bit slave address the driver talks to
    pub address: u8,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            speed: I2cSpeed::Standard,
            address: 0x00,
        }
    }
}

/// I2C bus speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cSpeed {
    /// 100 kHz
    Standard,
    /// 400 kHz
    Fast,
    /// 1 MHz
    FastPlus,
}

impl I2cSpeed {
    /// Clock frequency in Hz.
    pub const fn hz(self) -> u32 {
        match self {
            I2cSpeed::Standard => config::I2C_STANDARD_HZ,
            I2cSpeed::Fast => config::I2C_FAST_HZ,
            I2cSpeed::FastPlus => config::I2C_FAST_PLUS_HZ,
        }
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// MCU receive pin
    pub rx: PinName,
    /// MCU transmit pin
    pub tx: PinName,
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits
    pub data_bits: DataBits,
    /// Parity
    pub parity: Parity,
    /// Stop bits
    pub stop_bits: StopBits,
    /// Receive ring buffer size requested from the HAL
    pub rx_buffer_size: usize,
    /// Transmit ring buffer size requested from the HAL
    pub tx_buffer_size: usize,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            rx: PinName::NC,
            tx: PinName::NC,
            baud_rate: config::UART_DEFAULT_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            rx_buffer_size: config::UART_BUFFER_SIZE,
            tx_buffer_size: config::UART_BUFFER_SIZE,
        }
    }
}

/// Data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 7 data bits
    Seven,
    /// 8 data bits
    Eight,
    /// 9 data bits
    Nine,
}

/// Parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 stop bit
    One,
    /// 2 stop bits
    Two,
}

/// ADC channel configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogConfig {
    /// Analog input pin (usually the socket AN pin)
    pub pin: PinName,
    /// Conversion resolution
    pub resolution: AdcResolution,
    /// Reference voltage (V)
    pub vref: f32,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            pin: PinName::NC,
            resolution: AdcResolution::Bits12,
            vref: config::ADC_DEFAULT_VREF,
        }
    }
}

/// PWM channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmConfig {
    /// PWM output pin
    pub pin: PinName,
    /// Carrier frequency in Hz
    pub frequency: u32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            pin: PinName::NC,
            frequency: config::PWM_DEFAULT_HZ,
        }
    }
}
