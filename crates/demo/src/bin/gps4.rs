//! GPS 4 Click demo
//!
//! Resets the receiver, then drains the UART once per second and logs the
//! latest GGA fix.
//!
//! Run with: cargo run -p demo --bin gps4

use clicks::gps4::{Gps4, Gps4Config, GGA_COMMAND};
use clicks::location::{gga, GgaFix};
use clicks::scan::NmeaError;
use clicks::{ClickConfig, Error};
use demo::App;
use platform::config::UART_BUFFER_SIZE;
use platform::mocks::{MockBoard, MockDelay, MockPin, MockUart};
use platform::{PinName, Socket};

/// What the receiver prints while acquiring, then once it has a fix.
const SENTENCES: [&[u8]; 3] = [
    b"$GPGGA,235947.000,,,,,0,00,,,M,,M,,*41\r\n",
    b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n",
    b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n",
];

type Driver = Gps4<MockUart, MockPin, MockDelay>;

struct Gps4App {
    gps: Driver,
    rx: PinName,
    buffer: [u8; UART_BUFFER_SIZE],
    second: usize,
}

impl App for Gps4App {
    const NAME: &'static str = "gps4";

    fn init(board: &mut MockBoard) -> clicks::Result<Self> {
        let config = Gps4Config::mikrobus(Socket::Mikrobus1);
        let mut gps = Gps4::init(board, &config)?;
        gps.reset()?;
        Ok(Self {
            gps,
            rx: config.rx,
            buffer: [0; UART_BUFFER_SIZE],
            second: 0,
        })
    }

    fn task(&mut self, board: &mut MockBoard) -> clicks::Result<()> {
        if let Some(sentence) = SENTENCES.get(self.second) {
            board.uart(self.rx).feed(sentence);
        }
        self.second += 1;

        let count = self.gps.read_into(&mut self.buffer)?;
        let received = self.buffer.get(..count).unwrap_or_default();
        match Gps4App::fix(received) {
            Ok(Some(fix)) => tracing::info!(
                "fix at {}: {:.5}, {:.5} alt {} m, {} satellites",
                fix.utc_time,
                fix.latitude,
                fix.longitude,
                fix.altitude,
                fix.satellites
            ),
            Ok(None) => tracing::info!("waiting for fix"),
            Err(Error::Nmea(NmeaError::CommandNotFound)) => {
                tracing::debug!(bytes = count, "no GGA sentence this second");
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

impl Gps4App {
    fn fix(received: &[u8]) -> clicks::Result<Option<GgaFix>> {
        let latitude = Driver::parse_element(received, GGA_COMMAND, gga::LATITUDE)?;
        tracing::debug!(latitude, "GGA latitude field");
        Driver::parse_gga(received)
    }
}

fn main() -> anyhow::Result<()> {
    demo::run::<Gps4App>(&mut MockBoard::new(), 4)
}
