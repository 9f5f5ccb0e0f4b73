//! Relay Click
//!
//! Two relays switched by plain GPIOs: RL1 on the PWM pin, RL2 on CS.

use embedded_hal::digital::{OutputPin, PinState};
use platform::{Board, MikrobusPins, PinName};

use crate::config::ClickConfig;
use crate::error::{Error, Result};

/// Relay selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelaySelect {
    /// RL1
    Relay1,
    /// RL2
    Relay2,
}

impl TryFrom<u8> for RelaySelect {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Relay1),
            2 => Ok(Self::Relay2),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// Relay Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayConfig {
    /// RL1 control
    pub rl1: PinName,
    /// RL2 control
    pub rl2: PinName,
}

impl ClickConfig for RelayConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            rl1: pins.pwm,
            rl2: pins.cs,
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            pwm: self.rl1,
            cs: self.rl2,
            ..MikrobusPins::default()
        }
    }
}

/// Relay Click driver
#[derive(Debug)]
pub struct Relay<O> {
    rl1: O,
    rl2: O,
}

impl<O: OutputPin> Relay<O> {
    /// Open both relay outputs, released.
    pub fn init<B: Board<Output = O>>(board: &mut B, config: &RelayConfig) -> Result<Self> {
        let rl1 = board.open_output(config.rl1, PinState::Low)?;
        let rl2 = board.open_output(config.rl2, PinState::Low)?;
        log_info!("relay: init done");
        Ok(Self::new(rl1, rl2))
    }

    /// Wrap already-open outputs.
    pub fn new(rl1: O, rl2: O) -> Self {
        Self { rl1, rl2 }
    }

    /// Energise (`High`) or release (`Low`) one relay.
    pub fn set_relay(&mut self, relay: RelaySelect, state: PinState) -> Result<()> {
        let pin = match relay {
            RelaySelect::Relay1 => &mut self.rl1,
            RelaySelect::Relay2 => &mut self.rl2,
        };
        pin.set_state(state).map_err(Error::pin)
    }
}
