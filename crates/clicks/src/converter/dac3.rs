//! DAC 3 Click
//!
//! MCP4726 12-bit I2C DAC. Codes are written with the two-byte fast-write
//! command (`C2:C1 = 00`, power-down bits clear); the configuration byte
//! selects the reference and gain through the write-volatile-configuration
//! command.

use embedded_hal::i2c::I2c;
use platform::{Board, I2cSpeed, MikrobusPins, PinName};

use crate::config::{i2c_bus, ClickConfig};
use crate::converter::{code_to_voltage, voltage_to_code};
use crate::error::{Error, Result};

/// Default 7-bit address (MCP4726A0).
pub const DEFAULT_ADDRESS: u8 = 0x60;
/// Resolution in bits.
pub const RESOLUTION_BITS: u8 = 12;
/// Highest code.
pub const MAX_CODE: u16 = 0x0FFF;
/// Write volatile configuration command (`C2:C0 = 100`).
pub const CMD_WRITE_VOLATILE_CONFIG: u8 = 0x80;

/// Reference selection (VREF1:VREF0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference {
    /// VDD, unbuffered
    Vdd,
    /// VREF pin, unbuffered
    VrefPin,
    /// VREF pin, buffered
    VrefPinBuffered,
}

impl Reference {
    const fn bits(self) -> u8 {
        match self {
            Reference::Vdd => 0b00,
            Reference::VrefPin => 0b10,
            Reference::VrefPinBuffered => 0b11,
        }
    }
}

/// Output gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// 1x
    X1,
    /// 2x (VREF pin only)
    X2,
}

/// DAC 3 Click configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dac3Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Bus speed
    pub speed: I2cSpeed,
    /// Slave address
    pub address: u8,
    /// Reference voltage (V)
    pub vref: f32,
}

impl Default for Dac3Config {
    fn default() -> Self {
        Self {
            scl: PinName::NC,
            sda: PinName::NC,
            speed: I2cSpeed::Standard,
            address: DEFAULT_ADDRESS,
            vref: platform::config::ADC_DEFAULT_VREF,
        }
    }
}

impl ClickConfig for Dac3Config {
    fn with_pins(self, pins: &MikrobusPins) -> Self {
        Self {
            scl: pins.scl,
            sda: pins.sda,
            ..self
        }
    }

    fn pins(&self) -> MikrobusPins {
        MikrobusPins {
            scl: self.scl,
            sda: self.sda,
            ..MikrobusPins::default()
        }
    }
}

/// DAC 3 Click driver
#[derive(Debug)]
pub struct Dac3<I> {
    i2c: I,
    address: u8,
    vref: f32,
}

impl<I: I2c> Dac3<I> {
    /// Open the I2C bus.
    pub fn init<B: Board<I2c = I>>(board: &mut B, config: &Dac3Config) -> Result<Self> {
        let i2c = board.open_i2c(&i2c_bus(config.scl, config.sda, config.speed, config.address))?;
        Ok(Self::new(i2c, config.address, config.vref))
    }

    /// Wrap an already-open bus.
    pub fn new(i2c: I, address: u8, vref: f32) -> Self {
        Self { i2c, address, vref }
    }

    /// Select the reference and gain (VDD reference, 1x gain after reset).
    pub fn configure(&mut self, reference: Reference, gain: Gain) -> Result<()> {
        if reference == Reference::Vdd && gain == Gain::X2 {
            return Err(Error::InvalidArgument);
        }
        let gain_bit = u8::from(gain == Gain::X2);
        let byte = CMD_WRITE_VOLATILE_CONFIG | (reference.bits() << 3) | gain_bit;
        self.i2c.write(self.address, &[byte]).map_err(Error::i2c)
    }

    /// Write a raw 12-bit code.
    pub fn set_code(&mut self, code: u16) -> Result<()> {
        if code > MAX_CODE {
            return Err(Error::InvalidArgument);
        }
        self.i2c
            .write(self.address, &code.to_be_bytes())
            .map_err(Error::i2c)
    }

    /// Write the code nearest to `voltage` (V).
    pub fn set_voltage(&mut self, voltage: f32) -> Result<()> {
        let code = voltage_to_code(voltage, self.vref, RESOLUTION_BITS)?;
        self.set_code(code)
    }

    /// Output voltage a code produces with this board's reference.
    pub fn code_to_voltage(&self, code: u16) -> Result<f32> {
        code_to_voltage(code, self.vref, RESOLUTION_BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    #[test]
    fn fast_write_is_two_bytes() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(DEFAULT_ADDRESS, vec![0x0A, 0xBC]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x08, 0x00]),
        ]);
        let mut dac = Dac3::new(i2c.clone(), DEFAULT_ADDRESS, 3.3);
        dac.set_code(0x0ABC).unwrap();
        dac.set_voltage(1.65).unwrap();
        i2c.done();
    }

    #[test]
    fn configuration_byte() {
        let mut i2c = I2cMock::new(&[Transaction::write(DEFAULT_ADDRESS, vec![0x99])]);
        let mut dac = Dac3::new(i2c.clone(), DEFAULT_ADDRESS, 2.048);
        dac.configure(Reference::VrefPinBuffered, Gain::X2).unwrap();
        assert_eq!(
            dac.configure(Reference::Vdd, Gain::X2),
            Err(Error::InvalidArgument)
        );
        i2c.done();
    }

    #[test]
    fn voltage_of_code() {
        let dac = Dac3::new(I2cMock::new(&[]), DEFAULT_ADDRESS, 4.096);
        assert!((dac.code_to_voltage(1000).unwrap() - 1.0).abs() < 1e-6);
        let mut i2c = dac.i2c;
        i2c.done();
    }
}
