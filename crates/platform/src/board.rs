//! Root board trait
//!
//! A [`Board`] is the vendor HAL as seen by a Click driver's `init`: it turns
//! unbound configuration records into open handles. Every handle type is an
//! associated type so dispatch is resolved at compile time.
//!
//! Implementations must reject `NC` pins ([`PinName::require`]) and any bus
//! parameter they cannot honour; drivers do not retry a failed open.
//!
//! # Example
//!
//! ```ignore
//! impl Board for MyMcu {
//!     type I2c = MyI2c;
//!     // ... other associated types
//!
//!     fn open_i2c(&mut self, config: &I2cConfig) -> Result<Self::I2c> {
//!         let scl = config.scl.require(PinRole::Scl)?;
//!         let sda = config.sda.require(PinRole::Sda)?;
//!         MyI2c::new(scl, sda, config.speed.hz())
//!     }
//!
//!     // ... other methods
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;
use embedded_io::{Read, ReadReady, Write};

use crate::analog::AnalogIn;
use crate::error::Result;
use crate::mikrobus::PinName;
use crate::peripheral::{AnalogConfig, I2cConfig, PwmConfig, SpiConfig, UartConfig};
use crate::pwm::PwmOut;

/// Handle factory of the host MCU.
pub trait Board {
    /// I2C master handle
    type I2c: I2c;

    /// SPI device handle (bus + chip select)
    type Spi: SpiDevice;

    /// UART handle backed by the HAL ring buffers
    type Uart: Read + Write + ReadReady;

    /// Digital output pin
    type Output: OutputPin;

    /// Digital input pin
    type Input: InputPin;

    /// Analog input channel
    type Analog: AnalogIn;

    /// PWM output channel
    type Pwm: PwmOut;

    /// Busy-wait delay provider
    type Delay: DelayNs;

    /// Open an I2C master on `config.scl` / `config.sda`.
    fn open_i2c(&mut self, config: &I2cConfig) -> Result<Self::I2c>;

    /// Open an SPI device selected by `config.cs`.
    fn open_spi(&mut self, config: &SpiConfig) -> Result<Self::Spi>;

    /// Open a UART on `config.rx` / `config.tx`.
    fn open_uart(&mut self, config: &UartConfig) -> Result<Self::Uart>;

    /// Configure `pin` as a push-pull output driven to `initial`.
    fn open_output(&mut self, pin: PinName, initial: PinState) -> Result<Self::Output>;

    /// Configure `pin` as a digital input.
    fn open_input(&mut self, pin: PinName) -> Result<Self::Input>;

    /// Open an ADC channel on `config.pin`.
    fn open_analog(&mut self, config: &AnalogConfig) -> Result<Self::Analog>;

    /// Open a PWM channel on `config.pin` (stopped, 0 % duty).
    fn open_pwm(&mut self, config: &PwmConfig) -> Result<Self::Pwm>;

    /// Hand out a delay provider.
    fn delay(&mut self) -> Self::Delay;
}
