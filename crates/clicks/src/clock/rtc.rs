//! RTC Click
//!
//! NXP PCF8563 real-time clock. Time registers are BCD, read and written as
//! one 7-byte burst from `VL_SECONDS` so the value cannot roll over between
//! fields. Bit 7 of `VL_SECONDS` reports that the clock integrity is no
//! longer guaranteed (supply dropped below VLOW).

use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::error::{Error, Result};

/// Fixed 7-bit address.
pub const DEFAULT_ADDRESS: u8 = 0x51;

/// Register map
#[allow(missing_docs)]
pub mod reg {
    pub const CONTROL1: u8 = 0x00;
    pub const CONTROL2: u8 = 0x01;
    pub const VL_SECONDS: u8 = 0x02;
    pub const MINUTES: u8 = 0x03;
    pub const HOURS: u8 = 0x04;
    pub const DAYS: u8 = 0x05;
    pub const WEEKDAYS: u8 = 0x06;
    pub const CENTURY_MONTHS: u8 = 0x07;
    pub const YEARS: u8 = 0x08;
}

const VOLTAGE_LOW: u8 = 0x80;
const CENTURY: u8 = 0x80;

/// Pack `value` (0..=99) as two BCD digits.
pub fn encode_bcd(value: u8) -> Result<u8> {
    if value > 99 {
        return Err(Error::InvalidArgument);
    }
    Ok(((value / 10) << 4) | (value % 10))
}

/// Unpack two BCD digits.
pub const fn decode_bcd(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Calendar time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// 2000..=2199
    pub year: u16,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    /// 0..=6, 0 = Sunday
    pub weekday: u8,
    /// 0..=23
    pub hours: u8,
    /// 0..=59
    pub minutes: u8,
    /// 0..=59
    pub seconds: u8,
}

impl DateTime {
    fn validate(&self) -> Result<()> {
        let valid = (2000..=2199).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.weekday <= 6
            && self.hours <= 23
            && self.minutes <= 59
            && self.seconds <= 59;
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidArgument)
        }
    }

    /// Register image from `VL_SECONDS` to `YEARS`.
    pub fn to_registers(&self) -> Result<[u8; 7]> {
        self.validate()?;
        let century = if self.year >= 2100 { CENTURY } else { 0 };
        let year = u8::try_from(self.year % 100).map_err(|_| Error::InvalidArgument)?;
        Ok([
            encode_bcd(self.seconds)?,
            encode_bcd(self.minutes)?,
            encode_bcd(self.hours)?,
            encode_bcd(self.day)?,
            self.weekday,
            century | encode_bcd(self.month)?,
            encode_bcd(year)?,
        ])
    }

    /// Decode a register image from `VL_SECONDS` to `YEARS`.
    pub fn from_registers(regs: [u8; 7]) -> Self {
        let [seconds, minutes, hours, days, weekdays, century_months, years] = regs;
        let century = if century_months & CENTURY != 0 { 2100 } else { 2000 };
        Self {
            year: century + u16::from(decode_bcd(years)),
            month: decode_bcd(century_months & 0x1F),
            day: decode_bcd(days & 0x3F),
            weekday: weekdays & 0x07,
            hours: decode_bcd(hours & 0x3F),
            minutes: decode_bcd(minutes & 0x7F),
            seconds: decode_bcd(seconds & 0x7F),
        }
    }
}

/// RTC Click configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcConfig {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Alarm / timer interrupt
    pub int: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            int: PinName::NC,
            speed: I2cSpeed::Standard,
            address: DEFAULT_ADDRESS,
        }
    }
}

impl ClickConfig for RtcConfig {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            scl: pins.scl,
            sda: pins.sda,
            int: pins.int,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            scl: self.scl,
            sda: self.sda,
            int: self.int,
            ..MikrobusPins::default()
        }
    }
}

/// RTC Click driver
#[derive(Debug)]
pub struct Rtc<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Rtc<I> {
    /// Open the I2C bus.
    pub fn init<B: Board<I2c = I>>(board: &mut B, config: &RtcConfig) -> Result<Self> {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, config.address))
    }

    /// Wrap an already-open bus.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Run the oscillator with alarms and the timer interrupt disabled.
    pub fn default_cfg(&mut self) -> Result<()> {
        self.i2c
            .write(self.address, &[reg::CONTROL1, 0x00, 0x00])
            .map_err(Error::i2c)
    }

    /// Set the clock; clears the voltage-low flag.
    pub fn set_time(&mut self, time: &DateTime) -> Result<()> {
        let [s, m, h, d, w, cm, y] = time.to_registers()?;
        self.i2c
            .write(self.address, &[reg::VL_SECONDS, s, m, h, d, w, cm, y])
            .map_err(Error::i2c)
    }

    /// Current time.
    pub fn time(&mut self) -> Result<DateTime> {
        self.read_registers().map(DateTime::from_registers)
    }

    /// Whether the clock ran from an insufficient supply since it was last
    /// set.
    pub fn voltage_low(&mut self) -> Result<bool> {
        let [seconds, ..] = self.read_registers()?;
        Ok(seconds & VOLTAGE_LOW != 0)
    }

    fn read_registers(&mut self) -> Result<[u8; 7]> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(self.address, &[reg::VL_SECONDS], &mut regs)
            .map_err(Error::i2c)?;
        Ok(regs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::mocks::MockBoard;
    use platform::Socket;

    fn sample() -> DateTime {
        DateTime {
            year: 2024,
            month: 2,
            day: 29,
            weekday: 4,
            hours: 23,
            minutes: 59,
            seconds: 58,
        }
    }

    #[test]
    fn bcd_codec() {
        assert_eq!(encode_bcd(0), Ok(0x00));
        assert_eq!(encode_bcd(59), Ok(0x59));
        assert_eq!(encode_bcd(99), Ok(0x99));
        assert_eq!(encode_bcd(100), Err(Error::InvalidArgument));
        assert_eq!(decode_bcd(0x47), 47);
    }

    #[test]
    fn set_time_is_one_burst() {
        let mut i2c = I2cMock::new(&[Transaction::write(
            DEFAULT_ADDRESS,
            vec![0x02, 0x58, 0x59, 0x23, 0x29, 0x04, 0x02, 0x24],
        )]);
        let mut rtc = Rtc::new(i2c.clone(), DEFAULT_ADDRESS);
        rtc.set_time(&sample()).unwrap();
        i2c.done();
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let mut i2c = I2cMock::new(&[]);
        let mut rtc = Rtc::new(i2c.clone(), DEFAULT_ADDRESS);
        let bad = [
            DateTime { hours: 24, ..sample() },
            DateTime { month: 13, ..sample() },
            DateTime { day: 0, ..sample() },
            DateTime { weekday: 7, ..sample() },
            DateTime { year: 1999, ..sample() },
        ];
        for time in &bad {
            assert_eq!(rtc.set_time(time), Err(Error::InvalidArgument));
        }
        i2c.done();
    }

    #[test]
    fn flags_are_masked_on_read() {
        let regs = [0x80 | 0x30, 0x15, 0x08, 0x01, 0x06, 0x80 | 0x12, 0x05];
        let time = DateTime::from_registers(regs);
        assert_eq!(
            time,
            DateTime {
                year: 2105,
                month: 12,
                day: 1,
                weekday: 6,
                hours: 8,
                minutes: 15,
                seconds: 30,
            }
        );
        assert_eq!(time.to_registers().map(|r| r[5]), Ok(0x92));
    }

    #[test]
    fn time_and_voltage_flag_through_board() {
        let mut board = MockBoard::new();
        let mut rtc = Rtc::init(&mut board, &RtcConfig::mikrobus(Socket::Mikrobus1)).unwrap();
        rtc.default_cfg().unwrap();
        rtc.set_time(&sample()).unwrap();
        assert_eq!(rtc.time(), Ok(sample()));
        assert_eq!(rtc.voltage_low(), Ok(false));

        board
            .i2c()
            .set_register(DEFAULT_ADDRESS, reg::VL_SECONDS, &[0x80, 0, 0, 1, 0, 1, 0]);
        assert_eq!(rtc.voltage_low(), Ok(true));
    }
}
