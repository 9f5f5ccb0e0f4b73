//! Positioning receivers
//!
//! Both receivers stream NMEA 0183. The drivers only move bytes; fields are
//! pulled out of the caller's buffer with [`crate::scan::nmea`]. [`GgaFix`]
//! decodes the one sentence most applications need.

pub mod gnss;
pub mod gps4;

use crate::scan::nmea::{coordinate, parse_element, NmeaError};

/// Field indices of a `GGA` sentence
#[allow(missing_docs)]
pub mod gga {
    pub const TIME: usize = 1;
    pub const LATITUDE: usize = 2;
    pub const LATITUDE_SIDE: usize = 3;
    pub const LONGITUDE: usize = 4;
    pub const LONGITUDE_SIDE: usize = 5;
    pub const QUALITY: usize = 6;
    pub const SATELLITES: usize = 7;
    pub const HDOP: usize = 8;
    pub const ALTITUDE: usize = 9;
    pub const ALTITUDE_UNIT: usize = 10;
    pub const GEOID_SEPARATION: usize = 11;
    pub const GEOID_UNIT: usize = 12;
    pub const DGPS_AGE: usize = 13;
    pub const DGPS_REFERENCE: usize = 14;
}

/// Position fix decoded from a `GGA` sentence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GgaFix {
    /// UTC time of day as `hhmmss`, fraction dropped
    pub utc_time: u32,
    /// Decimal degrees, north positive
    pub latitude: f64,
    /// Decimal degrees, east positive
    pub longitude: f64,
    /// Fix quality indicator (1 = GPS, 2 = DGPS, ...)
    pub quality: u8,
    /// Satellites in use
    pub satellites: u8,
    /// Horizontal dilution of precision
    pub hdop: f32,
    /// Antenna altitude above mean sea level (m)
    pub altitude: f32,
}

impl GgaFix {
    /// Decode the first `command` sentence (`GPGGA`, `GNGGA`, ...) of
    /// `buffer`.
    ///
    /// Returns `Ok(None)` while the receiver reports quality 0 (no fix),
    /// when the position fields are empty.
    ///
    /// ```
    /// use clicks::location::GgaFix;
    ///
    /// let gga = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
    /// let fix = GgaFix::parse(gga, "GPGGA").unwrap().unwrap();
    /// assert_eq!(fix.satellites, 8);
    /// ```
    pub fn parse(buffer: &[u8], command: &str) -> Result<Option<Self>, NmeaError> {
        let field = |index| parse_element(buffer, command, index);
        let quality: u8 = number(field(gga::QUALITY)?)?;
        if quality == 0 {
            return Ok(None);
        }
        let time = field(gga::TIME)?;
        let whole = time.split('.').next().unwrap_or(time);
        Ok(Some(Self {
            utc_time: number(whole)?,
            latitude: coordinate(field(gga::LATITUDE)?, field(gga::LATITUDE_SIDE)?)?,
            longitude: coordinate(field(gga::LONGITUDE)?, field(gga::LONGITUDE_SIDE)?)?,
            quality,
            satellites: number(field(gga::SATELLITES)?)?,
            hdop: number(field(gga::HDOP)?)?,
            altitude: number(field(gga::ALTITUDE)?)?,
        }))
    }
}

fn number<T: core::str::FromStr>(field: &str) -> Result<T, NmeaError> {
    field.parse().map_err(|_| NmeaError::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    #[test]
    fn decodes_fix() {
        let fix = GgaFix::parse(GGA, "GPGGA").unwrap().unwrap();
        assert_eq!(fix.utc_time, 123_519);
        assert!((fix.latitude - 48.1173).abs() < 1e-4);
        assert!((fix.longitude - 11.516_666).abs() < 1e-4);
        assert_eq!(fix.quality, 1);
        assert_eq!(fix.satellites, 8);
        assert!((fix.hdop - 0.9).abs() < 1e-6);
        assert!((fix.altitude - 545.4).abs() < 1e-3);
    }

    #[test]
    fn no_fix_is_none() {
        let buffer = b"$GNGGA,235947.000,,,,,0,00,,,M,,M,,*4C\r\n";
        assert_eq!(GgaFix::parse(buffer, "GNGGA"), Ok(None));
    }

    #[test]
    fn fractional_time_and_bad_numbers() {
        let buffer = b"$GNGGA,101010.250,0130.0,S,00030.0,W,2,1x,1.0,5.0,M,,M,,*00";
        assert_eq!(GgaFix::parse(buffer, "GNGGA"), Err(NmeaError::Number));
        let buffer = b"$GNGGA,101010.250,0130.0,S,00030.0,W,2,11,1.0,5.0,M,,M,,*00";
        let fix = GgaFix::parse(buffer, "GNGGA").unwrap().unwrap();
        assert_eq!(fix.utc_time, 101_010);
        assert!((fix.latitude + 1.5).abs() < 1e-9);
        assert!((fix.longitude + 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_sentence() {
        assert_eq!(GgaFix::parse(GGA, "GNGGA"), Err(NmeaError::CommandNotFound));
    }
}
