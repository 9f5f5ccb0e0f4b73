//! Current 2 Click demo
//!
//! Calibrates the zero-current offset, then logs the load current once per
//! second.
//!
//! Run with: cargo run -p demo --bin current2

use clicks::current2::{Current2, Current2Config, DEFAULT_CALIBRATION_SAMPLES};
use clicks::ClickConfig;
use demo::App;
use platform::mocks::{MockBoard, MockI2c};
use platform::Socket;

/// Amplifier output with no load connected (MCP3221 code).
const IDLE_CODE: u16 = 0x007C;
/// Simulated conversions under load.
const LOAD_CODES: [u16; 4] = [0x0200, 0x0340, 0x0480, 0x0100];

/// The MCP3221 has no register pointer; the mock serves reads from
/// register 0.
fn set_conversion(bus: &MockI2c, address: u8, code: u16) {
    bus.set_register(address, 0, &code.to_be_bytes());
}

struct Current2App {
    sensor: Current2<MockI2c>,
    address: u8,
    sample: usize,
}

impl App for Current2App {
    const NAME: &'static str = "current2";

    fn init(board: &mut MockBoard) -> clicks::Result<Self> {
        let config = Current2Config::mikrobus(Socket::Mikrobus1);
        set_conversion(&board.i2c(), config.address, IDLE_CODE);

        let mut sensor = Current2::init(board, &config)?;
        let offset = sensor.calib_offset(DEFAULT_CALIBRATION_SAMPLES)?;
        tracing::info!("zero-current offset: {offset:.4} V");

        Ok(Self {
            sensor,
            address: config.address,
            sample: 0,
        })
    }

    fn task(&mut self, board: &mut MockBoard) -> clicks::Result<()> {
        let code = LOAD_CODES[self.sample % LOAD_CODES.len()];
        set_conversion(&board.i2c(), self.address, code);
        self.sample += 1;

        let milliamps = self.sensor.read_current()?;
        tracing::info!("current: {milliamps:.1} mA");
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    demo::run::<Current2App>(&mut MockBoard::new(), 4)
}
