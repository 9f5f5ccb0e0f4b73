//! Ambient 2 Click demo
//!
//! Checks the OPT3001 identity, starts continuous conversions and logs the
//! illuminance once per second.
//!
//! Run with: cargo run -p demo --bin ambient2

use clicks::ambient2::{
    Ambient2, Ambient2Config, DEVICE_ID, MANUFACTURER_ID, REG_DEVICE_ID, REG_MANUFACTURER_ID,
    REG_RESULT,
};
use clicks::{ClickConfig, Error};
use demo::App;
use platform::mocks::{MockBoard, MockI2c};
use platform::Socket;

/// Simulated result words: exponent 4 bits, mantissa 12 bits.
const READINGS: [u16; 4] = [0x1320, 0x2410, 0x3FFF, 0x0000];

struct Ambient2App {
    sensor: Ambient2<MockI2c>,
    address: u8,
    sample: usize,
}

impl App for Ambient2App {
    const NAME: &'static str = "ambient2";

    fn init(board: &mut MockBoard) -> clicks::Result<Self> {
        let config = Ambient2Config::mikrobus(Socket::Mikrobus2);
        let bus = board.i2c();
        bus.set_register(config.address, REG_MANUFACTURER_ID, &MANUFACTURER_ID.to_be_bytes());
        bus.set_register(config.address, REG_DEVICE_ID, &DEVICE_ID.to_be_bytes());

        let mut sensor = Ambient2::init(board, &config)?;
        let (manufacturer, device) = sensor.device_id()?;
        if (manufacturer, device) != (MANUFACTURER_ID, DEVICE_ID) {
            tracing::error!(manufacturer, device, "unexpected identity");
            return Err(Error::InvalidArgument);
        }
        sensor.default_cfg()?;
        tracing::info!("OPT3001 {device:#06X} running");

        Ok(Self {
            sensor,
            address: config.address,
            sample: 0,
        })
    }

    fn task(&mut self, board: &mut MockBoard) -> clicks::Result<()> {
        let raw = READINGS[self.sample % READINGS.len()];
        board
            .i2c()
            .set_register(self.address, REG_RESULT, &raw.to_be_bytes());
        self.sample += 1;

        let lux = self.sensor.read_lux()?;
        tracing::info!("light: {lux:.2} lx");
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    demo::run::<Ambient2App>(&mut MockBoard::new(), 4)
}
