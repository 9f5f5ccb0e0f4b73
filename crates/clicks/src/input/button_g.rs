//! Button G Click
//!
//! Push button on INT (high while pressed) with a green LED backlight on the
//! PWM pin.

use embedded_hal::digital::InputPin;
use platform::{Board, MikrobusPins, PinName, PwmConfig, PwmOut};

use crate::config::ClickConfig;
use crate::error::{Error, Result};

/// Button G Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonGConfig {
    /// Button state
    pub int: PinName,
    /// Backlight PWM
    pub pwm: PinName,
    /// Backlight PWM frequency (Hz)
    pub frequency: u32,
}

impl Default for ButtonGConfig {
    fn default() -> Self {
        Self {
            int: PinName::NC,
            pwm: PinName::NC,
            frequency: platform::config::PWM_DEFAULT_HZ,
        }
    }
}

impl ClickConfig for ButtonGConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            int: pins.int,
            pwm: pins.pwm,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            int: self.int,
            pwm: self.pwm,
            ..MikrobusPins::default()
        }
    }
}

/// Button G Click driver
#[derive(Debug)]
pub struct ButtonG<I, P> {
    int: I,
    pwm: P,
}

impl<I: InputPin, P: PwmOut> ButtonG<I, P> {
    /// Open the button input and the backlight, dark but running.
    pub fn init<B>(board: &mut B, config: &ButtonGConfig) -> Result<Self>
    where
        B: Board<Input = I, Pwm = P>,
    {
        let int = board.open_input(config.int)?;
        let mut pwm = board.open_pwm(&PwmConfig {
            pin: config.pwm,
            frequency: config.frequency,
        })?;
        pwm.set_duty(0.0)?;
        pwm.start()?;
        Ok(Self::new(int, pwm))
    }

    /// Wrap already-open handles.
    pub fn new(int: I, pwm: P) -> Self {
        Self { int, pwm }
    }

    /// `true` while the button is held down.
    pub fn is_pressed(&mut self) -> Result<bool> {
        self.int.is_high().map_err(Error::pin)
    }

    /// Backlight intensity as a duty cycle in `0.0..=1.0`.
    pub fn set_backlight(&mut self, duty: f32) -> Result<()> {
        self.pwm.set_duty(duty)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::MockBoard;
    use platform::{HalError, Socket};

    #[test]
    fn press_lights_backlight() {
        let mut board = MockBoard::new();
        let pins = Socket::Mikrobus1.pins();
        let mut button = ButtonG::init(&mut board, &ButtonGConfig::mikrobus(Socket::Mikrobus1)).unwrap();

        assert!(!button.is_pressed().unwrap());
        board.pin(pins.int).set_level(true);
        assert!(button.is_pressed().unwrap());

        button.set_backlight(1.0).unwrap();
        assert!((board.pwm(pins.pwm).duty() - 1.0).abs() < f32::EPSILON);
        assert_eq!(button.set_backlight(-0.5), Err(Error::Hal(HalError::InvalidDuty)));
    }
}
