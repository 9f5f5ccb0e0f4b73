//! Relay Click demo
//!
//! Switches RL1 and RL2 alternately, one second apart.
//!
//! Run with: cargo run -p demo --bin relay

use clicks::relay::{Relay, RelayConfig, RelaySelect};
use clicks::ClickConfig;
use demo::App;
use platform::mocks::{MockBoard, MockPin};
use platform::{PinState, Socket};

struct RelayApp {
    relay: Relay<MockPin>,
    config: RelayConfig,
    step: u32,
}

impl App for RelayApp {
    const NAME: &'static str = "relay";

    fn init(board: &mut MockBoard) -> clicks::Result<Self> {
        let config = RelayConfig::mikrobus(Socket::Mikrobus1);
        let relay = Relay::init(board, &config)?;
        Ok(Self {
            relay,
            config,
            step: 0,
        })
    }

    fn task(&mut self, board: &mut MockBoard) -> clicks::Result<()> {
        let (on, off) = if self.step % 2 == 0 {
            (RelaySelect::Relay1, RelaySelect::Relay2)
        } else {
            (RelaySelect::Relay2, RelaySelect::Relay1)
        };
        self.relay.set_relay(off, PinState::Low)?;
        self.relay.set_relay(on, PinState::High)?;
        self.step = self.step.wrapping_add(1);

        tracing::info!(
            rl1 = board.pin(self.config.rl1).is_set_high(),
            rl2 = board.pin(self.config.rl2).is_set_high(),
            "relays switched"
        );
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    demo::run::<RelayApp>(&mut MockBoard::new(), 4)
}
