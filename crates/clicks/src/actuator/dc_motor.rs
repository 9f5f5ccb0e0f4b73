//! DC Motor Click
//!
//! H-bridge with two direction inputs, a PWM speed input, an active-low
//! sleep input and an open-drain fault output.
//!
//! | Mode    | IN1 | IN2 |
//! |---------|-----|-----|
//! | Coast   | L   | L   |
//! | Reverse | L   | H   |
//! | Forward | H   | L   |
//! | Brake   | H   | H   |

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use platform::{Board, MikrobusPins, PinName, PwmConfig, PwmOut};

use crate::config::ClickConfig;
use crate::error::{Error, Result};

/// Bridge mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Both low: outputs floating, motor spins down.
    Coast,
    /// Current flows OUT2 to OUT1.
    Reverse,
    /// Current flows OUT1 to OUT2.
    Forward,
    /// Both high: outputs shorted, motor brakes.
    Brake,
}

impl Mode {
    /// `(IN1, IN2)` levels for this mode.
    pub const fn levels(self) -> (PinState, PinState) {
        match self {
            Mode::Coast => (PinState::Low, PinState::Low),
            Mode::Reverse => (PinState::Low, PinState::High),
            Mode::Forward => (PinState::High, PinState::Low),
            Mode::Brake => (PinState::High, PinState::High),
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Mode::Coast),
            1 => Ok(Mode::Reverse),
            2 => Ok(Mode::Forward),
            3 => Ok(Mode::Brake),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// DC Motor Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DcMotorConfig {
    /// Direction input 1
    pub in1: PinName,
    /// Direction input 2
    pub in2: PinName,
    /// Sleep (active low)
    pub slp: PinName,
    /// Speed PWM
    pub pwm: PinName,
    /// Fault output (active low)
    pub flt: PinName,
    /// PWM carrier frequency (Hz)
    pub frequency: u32,
}

impl Default for DcMotorConfig {
    fn default() -> Self {
        Self {
            in1: PinName::NC,
            in2: PinName::NC,
            slp: PinName::NC,
            pwm: PinName::NC,
            flt: PinName::NC,
            frequency: platform::config::PWM_DEFAULT_HZ,
        }
    }
}

impl ClickConfig for DcMotorConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            in1: pins.an,
            in2: pins.rst,
            slp: pins.cs,
            pwm: pins.pwm,
            flt: pins.int,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            an: self.in1,
            rst: self.in2,
            cs: self.slp,
            pwm: self.pwm,
            int: self.flt,
            ..MikrobusPins::default()
        }
    }
}

/// DC Motor Click driver
#[derive(Debug)]
pub struct DcMotor<O, I, P> {
    in1: O,
    in2: O,
    slp: O,
    flt: I,
    pwm: P,
}

impl<O: OutputPin, I: InputPin, P: PwmOut> DcMotor<O, I, P> {
    /// Open all pins: coasting, asleep, PWM running at 0 % duty.
    pub fn init<B>(board: &mut B, config: &DcMotorConfig) -> Result<Self>
    where
        B: Board<Output = O, Input = I, Pwm = P>,
    {
        let in1 = board.open_output(config.in1, PinState::Low)?;
        let in2 = board.open_output(config.in2, PinState::Low)?;
        let slp = board.open_output(config.slp, PinState::Low)?;
        let flt = board.open_input(config.flt)?;
        let mut pwm = board.open_pwm(&PwmConfig {
            pin: config.pwm,
            frequency: config.frequency,
        })?;
        pwm.set_duty(0.0)?;
        pwm.start()?;
        log_info!("dc_motor: init done");
        Ok(Self::new(in1, in2, slp, flt, pwm))
    }

    /// Wrap already-open handles.
    pub fn new(in1: O, in2: O, slp: O, flt: I, pwm: P) -> Self {
        Self {
            in1,
            in2,
            slp,
            flt,
            pwm,
        }
    }

    /// Drive the direction inputs per the mode truth table.
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        let (in1, in2) = mode.levels();
        self.in1.set_state(in1).map_err(Error::pin)?;
        self.in2.set_state(in2).map_err(Error::pin)
    }

    /// Speed as a duty cycle in `0.0..=1.0`.
    pub fn set_speed(&mut self, duty: f32) -> Result<()> {
        self.pwm.set_duty(duty)?;
        Ok(())
    }

    /// Wake (`true`) or sleep (`false`) the bridge.
    pub fn set_awake(&mut self, awake: bool) -> Result<()> {
        self.slp.set_state(PinState::from(awake)).map_err(Error::pin)
    }

    /// `true` while the bridge reports over-current or over-temperature.
    pub fn fault(&mut self) -> Result<bool> {
        self.flt.is_low().map_err(Error::pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
    use platform::mocks::{MockBoard, MockPwm};
    use platform::Socket;

    fn state(level: PinState) -> State {
        match level {
            PinState::Low => State::Low,
            PinState::High => State::High,
        }
    }

    #[test]
    fn every_mode_follows_truth_table() {
        for raw in 0u8..=3 {
            let mode = Mode::try_from(raw).unwrap();
            let (a, b) = mode.levels();
            let mut in1 = PinMock::new(&[Transaction::set(state(a))]);
            let mut in2 = PinMock::new(&[Transaction::set(state(b))]);
            let mut slp = PinMock::new(&[]);
            let mut flt = PinMock::new(&[]);
            let mut motor = DcMotor::new(in1.clone(), in2.clone(), slp.clone(), flt.clone(), MockPwm::new());
            motor.set_mode(mode).unwrap();
            in1.done();
            in2.done();
            slp.done();
            flt.done();
        }
        assert_eq!(Mode::Forward.levels(), (PinState::High, PinState::Low));
        assert_eq!(Mode::Brake.levels(), (PinState::High, PinState::High));
    }

    #[test]
    fn invalid_mode_leaves_pins_alone() {
        let mut in1 = PinMock::new(&[]);
        let mut in2 = PinMock::new(&[]);
        let mut slp = PinMock::new(&[]);
        let mut flt = PinMock::new(&[]);
        let mut motor = DcMotor::new(in1.clone(), in2.clone(), slp.clone(), flt.clone(), MockPwm::new());
        for raw in 4u8..=255 {
            let result = Mode::try_from(raw).and_then(|m| motor.set_mode(m));
            assert_eq!(result, Err(Error::InvalidArgument));
        }
        in1.done();
        in2.done();
        slp.done();
        flt.done();
    }

    #[test]
    fn fault_is_active_low() {
        let mut in1 = PinMock::new(&[]);
        let mut in2 = PinMock::new(&[]);
        let mut slp = PinMock::new(&[]);
        let mut flt = PinMock::new(&[Transaction::get(State::Low), Transaction::get(State::High)]);
        let mut motor = DcMotor::new(in1.clone(), in2.clone(), slp.clone(), flt.clone(), MockPwm::new());
        assert!(motor.fault().unwrap());
        assert!(!motor.fault().unwrap());
        in1.done();
        in2.done();
        slp.done();
        flt.done();
    }

    #[test]
    fn init_starts_pwm_idle_and_sets_speed() {
        let mut board = MockBoard::new();
        let pins = Socket::Mikrobus1.pins();
        let mut motor = DcMotor::init(&mut board, &DcMotorConfig::mikrobus(Socket::Mikrobus1)).unwrap();
        let pwm = board.pwm(pins.pwm);
        assert!(pwm.is_running());
        assert!(pwm.duty().abs() < f32::EPSILON);

        motor.set_awake(true).unwrap();
        motor.set_mode(Mode::Forward).unwrap();
        motor.set_speed(0.75).unwrap();
        assert!(board.pin(pins.cs).is_set_high());
        assert!(board.pin(pins.an).is_set_high());
        assert!(!board.pin(pins.rst).is_set_high());
        assert!((pwm.duty() - 0.75).abs() < f32::EPSILON);
    }
}
