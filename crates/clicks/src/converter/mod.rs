//! Data converters and digital potentiometers
//!
//! The DAC and ADC boards share one linear code/voltage mapping:
//! `voltage = code * vref / 2^bits`. Conversions are exact to within one
//! LSB in both directions.

pub mod adc;
pub mod dac;
pub mod dac3;
pub mod digipot;
pub mod pwm;

use crate::error::{Error, Result};

/// Widest supported converter; codes are `u16`.
pub const MAX_BITS: u8 = 16;

/// `2^bits` for a width in `1..=MAX_BITS`.
fn full_scale(bits: u8) -> Result<u32> {
    if (1..=MAX_BITS).contains(&bits) {
        Ok(1u32 << bits)
    } else {
        Err(Error::InvalidArgument)
    }
}

/// Voltage represented by `code` on a `bits`-wide converter.
#[allow(clippy::cast_precision_loss)]
pub fn code_to_voltage(code: u16, vref: f32, bits: u8) -> Result<f32> {
    Ok(f32::from(code) * vref / full_scale(bits)? as f32)
}

/// Nearest code for `voltage` on a `bits`-wide converter.
///
/// Voltages outside `0.0..=vref` (NaN included) and widths outside
/// `1..=MAX_BITS` are rejected; `vref` itself maps to the top code.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn voltage_to_code(voltage: f32, vref: f32, bits: u8) -> Result<u16> {
    let full_scale = full_scale(bits)?;
    if !(vref > 0.0 && (0.0..=vref).contains(&voltage)) {
        return Err(Error::InvalidArgument);
    }
    let scaled = voltage * full_scale as f32 / vref + 0.5;
    let code = (scaled as u32).min(full_scale - 1);
    u16::try_from(code).map_err(|_| Error::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_and_full_scale() {
        assert_eq!(voltage_to_code(1.65, 3.3, 12), Ok(2048));
        assert_eq!(voltage_to_code(3.3, 3.3, 12), Ok(4095));
        assert_eq!(voltage_to_code(0.0, 3.3, 12), Ok(0));
        assert!((code_to_voltage(4096 / 4, 2.048, 12).unwrap() - 0.512).abs() < 1e-6);
    }

    #[test]
    fn width_outside_u16_codes_is_rejected() {
        for bits in [0u8, 17, 32, 255] {
            assert_eq!(voltage_to_code(1.0, 3.3, bits), Err(Error::InvalidArgument));
            assert_eq!(code_to_voltage(1, 3.3, bits), Err(Error::InvalidArgument));
        }
        assert_eq!(voltage_to_code(3.3, 3.3, 16), Ok(0xFFFF));
        assert_eq!(voltage_to_code(3.3, 3.3, 1), Ok(1));
        assert!((code_to_voltage(1, 2.0, 1).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_voltage_is_rejected() {
        assert_eq!(voltage_to_code(-0.01, 3.3, 12), Err(Error::InvalidArgument));
        assert_eq!(voltage_to_code(3.4, 3.3, 12), Err(Error::InvalidArgument));
        assert_eq!(voltage_to_code(f32::NAN, 3.3, 12), Err(Error::InvalidArgument));
        assert_eq!(voltage_to_code(1.0, 0.0, 12), Err(Error::InvalidArgument));
    }
}
