//! Mock board handing out shared mock handles

use std::collections::HashMap;
use std::vec::Vec;

use embedded_hal::digital::PinState;

use crate::board::Board;
use crate::error::{Error, Result};
use crate::mikrobus::{PinName, PinRole};
use crate::peripheral::{AnalogConfig, I2cConfig, PwmConfig, SpiConfig, UartConfig};

use super::{MockAnalog, MockDelay, MockI2c, MockPin, MockPwm, MockSpi, MockUart};

/// Host-side [`Board`]
///
/// All I2C opens share one bus. SPI devices are keyed by their chip select,
/// UARTs by their RX pin, GPIO/ADC/PWM handles by pin. The accessor methods
/// return the same shared handle a driver receives, creating it on first use,
/// so a test can preset device state before `init` and inspect it after.
#[derive(Debug, Default)]
pub struct MockBoard {
    i2c: MockI2c,
    spi: HashMap<PinName, MockSpi>,
    uart: HashMap<PinName, MockUart>,
    pins: HashMap<PinName, MockPin>,
    analog: HashMap<PinName, MockAnalog>,
    pwm: HashMap<PinName, MockPwm>,
    delay: MockDelay,
    i2c_opened: Vec<I2cConfig>,
    uart_opened: Vec<UartConfig>,
}

impl MockBoard {
    /// Create a board with every device idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared I2C bus.
    pub fn i2c(&self) -> MockI2c {
        self.i2c.clone()
    }

    /// The SPI device selected by `cs`.
    pub fn spi(&mut self, cs: PinName) -> MockSpi {
        self.spi.entry(cs).or_default().clone()
    }

    /// The UART receiving on `rx`.
    pub fn uart(&mut self, rx: PinName) -> MockUart {
        self.uart.entry(rx).or_default().clone()
    }

    /// The GPIO on `pin`.
    pub fn pin(&mut self, pin: PinName) -> MockPin {
        self.pins.entry(pin).or_default().clone()
    }

    /// The ADC channel on `pin`.
    pub fn analog(&mut self, pin: PinName) -> MockAnalog {
        self.analog.entry(pin).or_default().clone()
    }

    /// The PWM channel on `pin`.
    pub fn pwm(&mut self, pin: PinName) -> MockPwm {
        self.pwm.entry(pin).or_default().clone()
    }

    /// The delay handle given to drivers.
    pub fn delay_handle(&self) -> MockDelay {
        self.delay.clone()
    }

    /// Configurations passed to `open_i2c`, oldest first.
    pub fn i2c_opened(&self) -> &[I2cConfig] {
        &self.i2c_opened
    }

    /// Configurations passed to `open_uart`, oldest first.
    pub fn uart_opened(&self) -> &[UartConfig] {
        &self.uart_opened
    }
}

impl Board for MockBoard {
    type I2c = MockI2c;
    type Spi = MockSpi;
    type Uart = MockUart;
    type Output = MockPin;
    type Input = MockPin;
    type Analog = MockAnalog;
    type Pwm = MockPwm;
    type Delay = MockDelay;

    fn open_i2c(&mut self, config: &I2cConfig) -> Result<MockI2c> {
        config.scl.require(PinRole::Scl)?;
        config.sda.require(PinRole::Sda)?;
        self.i2c_opened.push(*config);
        Ok(self.i2c.clone())
    }

    fn open_spi(&mut self, config: &SpiConfig) -> Result<MockSpi> {
        config.sck.require(PinRole::Sck)?;
        config.miso.require(PinRole::Miso)?;
        config.mosi.require(PinRole::Mosi)?;
        let cs = config.cs.require(PinRole::Cs)?;
        if config.frequency == 0 {
            return Err(Error::Unsupported("SPI frequency"));
        }
        Ok(self.spi(cs))
    }

    fn open_uart(&mut self, config: &UartConfig) -> Result<MockUart> {
        let rx = config.rx.require(PinRole::Rx)?;
        config.tx.require(PinRole::Tx)?;
        if config.baud_rate == 0 {
            return Err(Error::Unsupported("UART baud rate"));
        }
        self.uart_opened.push(*config);
        Ok(self.uart(rx))
    }

    fn open_output(&mut self, pin: PinName, initial: PinState) -> Result<MockPin> {
        if !pin.is_connected() {
            return Err(Error::NotConnected);
        }
        let handle = self.pin(pin);
        handle.set_level(initial == PinState::High);
        Ok(handle)
    }

    fn open_input(&mut self, pin: PinName) -> Result<MockPin> {
        if !pin.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(self.pin(pin))
    }

    fn open_analog(&mut self, config: &AnalogConfig) -> Result<MockAnalog> {
        let pin = config.pin.require(PinRole::An)?;
        if config.vref <= 0.0 {
            return Err(Error::Unsupported("ADC reference"));
        }
        let handle = self.analog(pin);
        handle.configure(config.resolution, config.vref);
        Ok(handle)
    }

    fn open_pwm(&mut self, config: &PwmConfig) -> Result<MockPwm> {
        let pin = config.pin.require(PinRole::Pwm)?;
        if config.frequency == 0 {
            return Err(Error::Unsupported("PWM frequency"));
        }
        let mut handle = self.pwm(pin);
        crate::pwm::PwmOut::set_frequency(&mut handle, config.frequency)?;
        Ok(handle)
    }

    fn delay(&mut self) -> MockDelay {
        self.delay.clone()
    }
}
