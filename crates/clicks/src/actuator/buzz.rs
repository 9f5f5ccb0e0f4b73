//! Buzz Click
//!
//! Piezo transducer driven by the PWM pin. The carrier frequency sets the
//! pitch and the duty cycle the loudness.

use embedded_hal::delay::DelayNs;
use platform::{Board, MikrobusPins, PinName, PwmConfig, PwmOut};

use crate::config::ClickConfig;
use crate::error::Result;

/// Duty cycle used until [`Buzz::set_duty`] is called.
pub const DEFAULT_DUTY: f32 = 0.5;

/// Musical note frequencies (Hz) for the fourth octave.
pub mod note {
    /// C4
    pub const C4: u32 = 262;
    /// D4
    pub const D4: u32 = 294;
    /// E4
    pub const E4: u32 = 330;
    /// F4
    pub const F4: u32 = 349;
    /// G4
    pub const G4: u32 = 392;
    /// A4
    pub const A4: u32 = 440;
    /// B4
    pub const B4: u32 = 494;
}

/// Buzz Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuzzConfig {
    /// PWM output
    pub pwm: PinName,
    /// Initial carrier frequency (Hz)
    pub frequency: u32,
}

impl Default for BuzzConfig {
    fn default() -> Self {
        Self {
            pwm: PinName::NC,
            frequency: platform::config::PWM_DEFAULT_HZ,
        }
    }
}

impl ClickConfig for BuzzConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            pwm: pins.pwm,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            pwm: self.pwm,
            ..MikrobusPins::default()
        }
    }
}

/// Buzz Click driver
#[derive(Debug)]
pub struct Buzz<P, D> {
    pwm: P,
    delay: D,
    duty: f32,
}

impl<P: PwmOut, D: DelayNs> Buzz<P, D> {
    /// Open the PWM channel, silent.
    pub fn init<B>(board: &mut B, config: &BuzzConfig) -> Result<Self>
    where
        B: Board<Pwm = P, Delay = D>,
    {
        let pwm = board.open_pwm(&PwmConfig {
            pin: config.pwm,
            frequency: config.frequency,
        })?;
        Ok(Self::new(pwm, board.delay()))
    }

    /// Wrap an already-open PWM channel.
    pub fn new(pwm: P, delay: D) -> Self {
        Self {
            pwm,
            delay,
            duty: DEFAULT_DUTY,
        }
    }

    /// Set the loudness as a duty cycle in `0.0..=1.0`.
    pub fn set_duty(&mut self, duty: f32) -> Result<()> {
        self.pwm.set_duty(duty)?;
        self.duty = duty;
        Ok(())
    }

    /// Sound `frequency` Hz for `ms` milliseconds, then stop.
    pub fn play(&mut self, frequency: u32, ms: u32) -> Result<()> {
        self.pwm.set_frequency(frequency)?;
        self.pwm.set_duty(self.duty)?;
        self.pwm.start()?;
        self.delay.delay_ms(ms);
        self.stop()
    }

    /// Silence the buzzer.
    pub fn stop(&mut self) -> Result<()> {
        self.pwm.stop()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use platform::mocks::MockBoard;
    use platform::{HalError, Socket};

    #[test]
    fn play_sets_pitch_then_stops() {
        let mut board = MockBoard::new();
        let mut buzz = Buzz::init(&mut board, &BuzzConfig::mikrobus(Socket::Mikrobus1)).unwrap();
        buzz.set_duty(0.2).unwrap();
        buzz.play(note::A4, 300).unwrap();

        let pwm = board.pwm(Socket::Mikrobus1.pins().pwm);
        assert_eq!(pwm.frequency(), 440);
        assert!((pwm.duty() - 0.2).abs() < f32::EPSILON);
        assert!(!pwm.is_running());
        assert_eq!(board.delay_handle().elapsed_ms(), 300);
    }

    #[test]
    fn out_of_range_duty_keeps_previous_volume() {
        let mut board = MockBoard::new();
        let mut buzz = Buzz::init(&mut board, &BuzzConfig::mikrobus(Socket::Mikrobus1)).unwrap();
        assert_eq!(buzz.set_duty(1.5), Err(Error::Hal(HalError::InvalidDuty)));
        buzz.play(note::C4, 1).unwrap();
        let pwm = board.pwm(Socket::Mikrobus1.pins().pwm);
        assert!((pwm.duty() - DEFAULT_DUTY).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_frequency_is_rejected_by_init() {
        let mut board = MockBoard::new();
        let config = BuzzConfig {
            frequency: 0,
            ..BuzzConfig::mikrobus(Socket::Mikrobus1)
        };
        assert!(Buzz::init(&mut board, &config).is_err());
    }
}
