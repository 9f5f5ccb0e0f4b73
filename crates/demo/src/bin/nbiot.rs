//! NB IoT Click demo
//!
//! Boots the module, attaches to the network and logs the signal quality
//! once per second.
//!
//! Run with: cargo run -p demo --bin nbiot

use clicks::nbiot::{NbIot, NbIotConfig};
use clicks::scan::at::extract_line;
use clicks::ClickConfig;
use demo::App;
use platform::mocks::{MockBoard, MockDelay, MockPin, MockUart};
use platform::Socket;

/// Scripted module replies; the first matching prefix answers.
const REPLIES: [(&str, &str); 5] = [
    ("AT+CSQ", "\r\n+CSQ: 23,99\r\n\r\nOK\r\n"),
    ("AT+CGATT?", "\r\n+CGATT: 1\r\n\r\nOK\r\n"),
    ("AT+CGATT", "\r\nOK\r\n"),
    ("AT+CFUN", "\r\nOK\r\n"),
    ("AT", "\r\nOK\r\n"),
];

struct NbIotApp {
    modem: NbIot<MockUart, MockPin, MockDelay>,
}

impl App for NbIotApp {
    const NAME: &'static str = "nbiot";

    fn init(board: &mut MockBoard) -> clicks::Result<Self> {
        let config = NbIotConfig::mikrobus(Socket::Mikrobus2);
        let uart = board.uart(config.rx);
        for (command, reply) in REPLIES {
            uart.on_command(command, reply);
        }

        let mut modem = NbIot::init(board, &config)?;
        modem.power_on()?;
        modem.command("AT")?;
        modem.attach()?;

        modem.command("AT+CGATT?")?;
        let attached = extract_line(modem.response(), "+CGATT")? == "1";
        tracing::info!(attached, "network attach requested");

        Ok(Self { modem })
    }

    fn task(&mut self, _board: &mut MockBoard) -> clicks::Result<()> {
        let quality = self.modem.signal_quality()?;
        match quality.dbm() {
            Some(dbm) => tracing::info!(rssi = quality.rssi, "signal: {dbm} dBm"),
            None => tracing::warn!("signal: unknown"),
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    demo::run::<NbIotApp>(&mut MockBoard::new(), 3)
}
