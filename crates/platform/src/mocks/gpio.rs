//! Mock pins, analog inputs, PWM channels and delays

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};

use crate::analog::{AdcResolution, AnalogIn};
use crate::error::HalError;
use crate::pwm::{check_duty, PwmOut};

#[derive(Debug, Default)]
struct LevelState {
    high: bool,
    history: Vec<bool>,
}

/// Mock GPIO usable as output and input
///
/// Output writes are recorded; input reads return the level last set by
/// either side.
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    state: Rc<RefCell<LevelState>>,
}

impl MockPin {
    /// Create a pin idling low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the level seen by `is_high` / `is_low`.
    pub fn set_level(&self, high: bool) {
        self.state.borrow_mut().high = high;
    }

    /// Current level.
    pub fn is_set_high(&self) -> bool {
        self.state.borrow().high
    }

    /// Levels written through `OutputPin`, oldest first.
    pub fn history(&self) -> Vec<bool> {
        self.state.borrow().history.clone()
    }

    fn drive(&self, high: bool) {
        let mut state = self.state.borrow_mut();
        state.high = high;
        state.history.push(high);
    }
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.state.borrow().high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state.borrow().high)
    }
}

#[derive(Debug)]
struct AnalogState {
    value: u16,
    samples: VecDeque<u16>,
    resolution: AdcResolution,
    vref: f32,
}

/// Mock ADC channel
///
/// Returns queued samples first, then the steady value.
#[derive(Debug, Clone)]
pub struct MockAnalog {
    state: Rc<RefCell<AnalogState>>,
}

impl Default for MockAnalog {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(AnalogState {
                value: 0,
                samples: VecDeque::new(),
                resolution: AdcResolution::Bits12,
                vref: crate::config::ADC_DEFAULT_VREF,
            })),
        }
    }
}

impl MockAnalog {
    /// Create a 12-bit channel referenced to 3.3 V reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the steady raw value.
    pub fn set_value(&self, raw: u16) {
        self.state.borrow_mut().value = raw;
    }

    /// Queue one-shot samples returned before the steady value.
    pub fn queue_samples(&self, samples: &[u16]) {
        self.state.borrow_mut().samples.extend(samples.iter().copied());
    }

    pub(crate) fn configure(&self, resolution: AdcResolution, vref: f32) {
        let mut state = self.state.borrow_mut();
        state.resolution = resolution;
        state.vref = vref;
    }
}

impl AnalogIn for MockAnalog {
    fn read(&mut self) -> Result<u16, HalError> {
        let mut state = self.state.borrow_mut();
        let value = state.value;
        Ok(state.samples.pop_front().unwrap_or(value))
    }

    fn resolution(&self) -> AdcResolution {
        self.state.borrow().resolution
    }

    fn vref(&self) -> f32 {
        self.state.borrow().vref
    }
}

#[derive(Debug, Default)]
struct PwmState {
    frequency: u32,
    duty: f32,
    running: bool,
}

/// Mock PWM channel
#[derive(Debug, Clone, Default)]
pub struct MockPwm {
    state: Rc<RefCell<PwmState>>,
}

impl MockPwm {
    /// Create a stopped channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last accepted duty cycle.
    pub fn duty(&self) -> f32 {
        self.state.borrow().duty
    }

    /// Whether the output is being driven.
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }
}

impl PwmOut for MockPwm {
    fn set_frequency(&mut self, hz: u32) -> Result<(), HalError> {
        if hz == 0 {
            return Err(HalError::InvalidFrequency(hz));
        }
        self.state.borrow_mut().frequency = hz;
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.state.borrow().frequency
    }

    fn set_duty(&mut self, duty: f32) -> Result<(), HalError> {
        self.state.borrow_mut().duty = check_duty(duty)?;
        Ok(())
    }

    fn start(&mut self) -> Result<(), HalError> {
        self.state.borrow_mut().running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HalError> {
        self.state.borrow_mut().running = false;
        Ok(())
    }
}

/// Mock delay that only accumulates the requested time
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    elapsed_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    /// Create a delay with nothing elapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }
}
