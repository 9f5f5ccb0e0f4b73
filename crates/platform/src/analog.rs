//! Analog input abstraction
//!
//! embedded-hal 1.0 dropped its ADC trait, so the seam is declared here.

use crate::error::HalError;

/// ADC conversion resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcResolution {
    /// 8-bit
    Bits8,
    /// 10-bit
    Bits10,
    /// 12-bit
    Bits12,
    /// 14-bit
    Bits14,
    /// 16-bit
    Bits16,
}

impl AdcResolution {
    /// Number of result bits.
    pub const fn bits(self) -> u8 {
        match self {
            AdcResolution::Bits8 => 8,
            AdcResolution::Bits10 => 10,
            AdcResolution::Bits12 => 12,
            AdcResolution::Bits14 => 14,
            AdcResolution::Bits16 => 16,
        }
    }

    /// Number of codes (`2^bits`).
    pub const fn full_scale(self) -> u32 {
        1 << self.bits()
    }
}

/// Single analog input channel.
pub trait AnalogIn {
    /// Take one raw sample.
    fn read(&mut self) -> Result<u16, HalError>;

    /// Resolution the channel was opened with.
    fn resolution(&self) -> AdcResolution;

    /// Reference voltage (V).
    fn vref(&self) -> f32;

    /// Take one sample scaled to volts.
    #[allow(clippy::cast_precision_loss)]
    fn read_voltage(&mut self) -> Result<f32, HalError> {
        let raw = self.read()?;
        Ok(f32::from(raw) * self.vref() / self.resolution().full_scale() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u16);

    impl AnalogIn for Fixed {
        fn read(&mut self) -> Result<u16, HalError> {
            Ok(self.0)
        }
        fn resolution(&self) -> AdcResolution {
            AdcResolution::Bits12
        }
        fn vref(&self) -> f32 {
            3.3
        }
    }

    #[test]
    fn full_scale_codes() {
        assert_eq!(AdcResolution::Bits10.full_scale(), 1024);
        assert_eq!(AdcResolution::Bits12.full_scale(), 4096);
        assert_eq!(AdcResolution::Bits16.full_scale(), 65_536);
    }

    #[test]
    fn voltage_scales_by_vref() {
        let v = Fixed(2048).read_voltage().unwrap();
        assert!((v - 1.65).abs() < 1e-4);
        assert_eq!(Fixed(0).read_voltage().unwrap(), 0.0);
    }
}
