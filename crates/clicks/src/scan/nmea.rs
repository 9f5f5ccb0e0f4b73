//! NMEA 0183 field extraction
//!
//! A sentence is `$<identifier>,<field>,...*<checksum>\r\n`. Field 0 is the
//! identifier itself, so for `GPGGA` field 2 is the latitude. The scanner
//! works on raw receive buffers: leading noise, several sentences and a
//! truncated trailing sentence are all fine.

use thiserror_no_std::Error;

/// NMEA extraction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NmeaError {
    /// No sentence with the requested identifier in the buffer.
    #[error("command not found")]
    CommandNotFound,
    /// The sentence has fewer fields than the requested index.
    #[error("element index past end of sentence")]
    NextElement,
    /// The field is not valid ASCII text.
    #[error("field is not ASCII")]
    NotAscii,
    /// The field does not hold a `ddmm.mmmm` coordinate.
    #[error("malformed coordinate")]
    Coordinate,
    /// The field does not hold a number.
    #[error("malformed numeric field")]
    Number,
}

/// Body of every sentence in `buffer`: the bytes after `$` up to the
/// checksum marker or line end.
fn sentences(buffer: &[u8]) -> impl Iterator<Item = &[u8]> {
    buffer
        .split(|&b| b == b'$')
        .skip(1)
        .map(|rest| {
            let end = rest
                .iter()
                .position(|&b| matches!(b, b'*' | b'\r' | b'\n'))
                .unwrap_or(rest.len());
            rest.get(..end).unwrap_or(rest)
        })
}

/// Return field `element` of the first sentence whose identifier is
/// `command` (with or without the leading `$`).
///
/// ```
/// use clicks::scan::nmea::parse_element;
///
/// let gga = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
/// assert_eq!(parse_element(gga, "GPGGA", 2), Ok("4807.038"));
/// ```
pub fn parse_element<'a>(
    buffer: &'a [u8],
    command: &str,
    element: usize,
) -> Result<&'a str, NmeaError> {
    let identifier = command.strip_prefix('$').unwrap_or(command).as_bytes();
    let sentence = sentences(buffer)
        .find(|body| body.split(|&b| b == b',').next() == Some(identifier))
        .ok_or(NmeaError::CommandNotFound)?;
    let field = sentence
        .split(|&b| b == b',')
        .nth(element)
        .ok_or(NmeaError::NextElement)?;
    if !field.is_ascii() {
        return Err(NmeaError::NotAscii);
    }
    core::str::from_utf8(field).map_err(|_| NmeaError::NotAscii)
}

/// `true` when the sentence starting at the first `$` of `sentence` carries a
/// `*hh` checksum equal to the XOR of the bytes between `$` and `*`.
pub fn checksum_valid(sentence: &[u8]) -> bool {
    let Some(start) = sentence.iter().position(|&b| b == b'$') else {
        return false;
    };
    let Some(body) = sentence.get(start + 1..) else {
        return false;
    };
    let Some(star) = body.iter().position(|&b| b == b'*') else {
        return false;
    };
    let (payload, tail) = body.split_at(star);
    let expected = tail
        .get(1..3)
        .and_then(|hex| core::str::from_utf8(hex).ok())
        .and_then(|hex| u8::from_str_radix(hex, 16).ok());
    let actual = payload.iter().fold(0u8, |acc, &b| acc ^ b);
    expected == Some(actual)
}

/// Convert a `ddmm.mmmm` / `dddmm.mmmm` field and its hemisphere (`N`, `S`,
/// `E`, `W`) to signed decimal degrees.
pub fn coordinate(value: &str, hemisphere: &str) -> Result<f64, NmeaError> {
    let dot = value.find('.').unwrap_or(value.len());
    let split = dot.checked_sub(2).ok_or(NmeaError::Coordinate)?;
    let (Some(degrees), Some(minutes)) = (value.get(..split), value.get(split..)) else {
        return Err(NmeaError::Coordinate);
    };
    let degrees: f64 = if degrees.is_empty() {
        0.0
    } else {
        degrees.parse().map_err(|_| NmeaError::Coordinate)?
    };
    let minutes: f64 = minutes.parse().map_err(|_| NmeaError::Coordinate)?;
    if minutes >= 60.0 {
        return Err(NmeaError::Coordinate);
    }
    let magnitude = degrees + minutes / 60.0;
    match hemisphere {
        "N" | "E" => Ok(magnitude),
        "S" | "W" => Ok(-magnitude),
        _ => Err(NmeaError::Coordinate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    #[test]
    fn extracts_fields_by_index() {
        assert_eq!(parse_element(GGA, "GPGGA", 0), Ok("GPGGA"));
        assert_eq!(parse_element(GGA, "GPGGA", 1), Ok("123519"));
        assert_eq!(parse_element(GGA, "$GPGGA", 4), Ok("01131.000"));
        assert_eq!(parse_element(GGA, "GPGGA", 13), Ok(""));
    }

    #[test]
    fn index_past_end_is_next_element() {
        assert_eq!(parse_element(GGA, "GPGGA", 14), Ok(""));
        assert_eq!(parse_element(GGA, "GPGGA", 15), Err(NmeaError::NextElement));
    }

    #[test]
    fn missing_sentence_is_command_not_found() {
        assert_eq!(
            parse_element(GGA, "GPRMC", 1),
            Err(NmeaError::CommandNotFound)
        );
        assert_eq!(parse_element(b"", "GPGGA", 1), Err(NmeaError::CommandNotFound));
    }

    #[test]
    fn skips_noise_and_other_sentences() {
        let buffer = b"\x00\xFFgarbage\r\n$GPGSA,A,3,04*3D\r\n$GPGGA,000001,1234.5,S,*00\r\n$GPGGA,9";
        assert_eq!(parse_element(buffer, "GPGGA", 2), Ok("1234.5"));
        assert_eq!(parse_element(buffer, "GPGSA", 2), Ok("3"));
    }

    #[test]
    fn identifier_must_match_exactly() {
        assert_eq!(
            parse_element(b"$GPGGAX,1,2*00", "GPGGA", 1),
            Err(NmeaError::CommandNotFound)
        );
    }

    #[test]
    fn checksum_matches_xor() {
        assert!(checksum_valid(GGA));
        assert!(!checksum_valid(
            b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*48"
        ));
        assert!(!checksum_valid(b"$GPGGA,123519"));
        assert!(!checksum_valid(b"no sentence"));
    }

    #[test]
    fn coordinates_convert_to_degrees() {
        let lat = coordinate("4807.038", "N").unwrap();
        assert!((lat - 48.1173).abs() < 1e-4);
        let lon = coordinate("01131.000", "W").unwrap();
        assert!((lon + 11.516_666).abs() < 1e-4);
        assert_eq!(coordinate("07.5", "X"), Err(NmeaError::Coordinate));
        assert_eq!(coordinate("4", "N"), Err(NmeaError::Coordinate));
        assert_eq!(coordinate("4875.0", "N"), Err(NmeaError::Coordinate));
    }

    #[test]
    fn non_ascii_coordinate_is_rejected() {
        assert_eq!(coordinate("é1.5", "N"), Err(NmeaError::Coordinate));
        assert_eq!(coordinate("48é.5", "N"), Err(NmeaError::Coordinate));
        assert_eq!(coordinate("4807.038", "Ñ"), Err(NmeaError::Coordinate));
    }
}
