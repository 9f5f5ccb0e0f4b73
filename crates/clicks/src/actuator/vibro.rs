//! Vibro motor Click
//!
//! The eccentric rotating mass motor is switched by the PWM pin used as a
//! plain output.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use platform::{Board, MikrobusPins, PinName};

use crate::config::ClickConfig;
use crate::error::{Error, Result};

/// Vibro Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VibroConfig {
    /// Motor enable
    pub en: PinName,
}

impl ClickConfig for VibroConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self { en: pins.pwm }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            pwm: self.en,
            ..MikrobusPins::default()
        }
    }
}

/// Vibro Click driver
#[derive(Debug)]
pub struct Vibro<O, D> {
    en: O,
    delay: D,
}

impl<O: OutputPin, D: DelayNs> Vibro<O, D> {
    /// Open the enable output with the motor off.
    pub fn init<B>(board: &mut B, config: &VibroConfig) -> Result<Self>
    where
        B: Board<Output = O, Delay = D>,
    {
        let en = board.open_output(config.en, PinState::Low)?;
        Ok(Self::new(en, board.delay()))
    }

    /// Wrap an already-open output.
    pub fn new(en: O, delay: D) -> Self {
        Self { en, delay }
    }

    /// Start the motor.
    pub fn enable(&mut self) -> Result<()> {
        self.en.set_high().map_err(Error::pin)
    }

    /// Stop the motor.
    pub fn disable(&mut self) -> Result<()> {
        self.en.set_low().map_err(Error::pin)
    }

    /// Run the motor for `ms` milliseconds, then stop it.
    pub fn pulse(&mut self, ms: u32) -> Result<()> {
        self.enable()?;
        self.delay.delay_ms(ms);
        self.disable()
    }
}
