//! Property-based tests for value encoders.
//! Encoding then decoding must land within one LSB of the input.

use clicks::adc::{Adc, AdcConfig, Channel, InputMode};
use clicks::converter::{code_to_voltage, voltage_to_code};
use clicks::dac::{Dac, DacConfig, CONTROL_BITS, MAX_CODE};
use clicks::rtc::{decode_bcd, encode_bcd};
use clicks::thermo4::{decode_limit, encode_limit};
use clicks::ClickConfig;
use platform::mocks::MockBoard;
use platform::Socket;
use proptest::prelude::*;

#[allow(clippy::cast_precision_loss)]
fn lsb(vref: f32, bits: u8) -> f32 {
    vref / (1u32 << bits) as f32
}

proptest! {
    /// voltage -> code -> voltage stays within one LSB.
    #[test]
    fn voltage_round_trip(fraction in 0.0f32..=1.0, vref in 1.0f32..5.0, bits in prop::sample::select(vec![8u8, 10, 12, 16])) {
        let voltage = vref * fraction;
        let code = voltage_to_code(voltage, vref, bits).unwrap();
        let back = code_to_voltage(code, vref, bits).unwrap();
        prop_assert!((back - voltage).abs() <= lsb(vref, bits) * 1.001,
            "{voltage} V -> {code} -> {back} V");
    }

    /// code -> voltage -> code is exact below full scale.
    #[test]
    fn code_round_trip(code in 0u16..4096, vref in 1.0f32..5.0) {
        let voltage = code_to_voltage(code, vref, 12).unwrap();
        prop_assert_eq!(voltage_to_code(voltage, vref, 12), Ok(code));
    }

    /// The DAC Click emits the nearest code with its control bits.
    #[test]
    fn dac_word_matches_voltage(fraction in 0.0f32..=1.0) {
        let mut board = MockBoard::new();
        let config = DacConfig::mikrobus(Socket::Mikrobus1);
        let mut dac = Dac::init(&mut board, &config).unwrap();
        let voltage = config.vref * fraction;
        dac.set_voltage(voltage).unwrap();

        let word = board.spi(config.cs).last_transaction().unwrap();
        let word = u16::from_be_bytes([word[0], word[1]]);
        prop_assert_eq!(word & !MAX_CODE, CONTROL_BITS);
        let out = dac.code_to_voltage(word & MAX_CODE).unwrap();
        prop_assert!((out - voltage).abs() <= lsb(config.vref, 12) * 1.001);
    }

    /// The ADC Click scales any 12-bit result back to the voltage that
    /// produced it.
    #[test]
    fn adc_reading_within_one_lsb(fraction in 0.0f32..1.0) {
        let mut board = MockBoard::new();
        let config = AdcConfig::mikrobus(Socket::Mikrobus2);
        let voltage = config.vref * fraction;
        let code = voltage_to_code(voltage, config.vref, 12).unwrap();
        let [high, low] = code.to_be_bytes();
        board.spi(config.cs).queue_response(&[0x00, high, low]);

        let mut adc = Adc::init(&mut board, &config).unwrap();
        let read = adc.read_voltage(Channel::Ch0, InputMode::SingleEnded).unwrap();
        prop_assert!((read - voltage).abs() <= lsb(config.vref, 12) * 1.001);
    }

    /// LM75A limits quantize to 0.5 °C.
    #[test]
    fn thermo4_limit_round_trip(celsius in -55.0f32..=125.0) {
        let back = decode_limit(encode_limit(celsius).unwrap());
        prop_assert!((back - celsius).abs() <= 0.25 + 1e-4, "{celsius} -> {back}");
    }

    /// BCD is exact for two digits.
    #[test]
    fn bcd_round_trip(value in 0u8..100) {
        prop_assert_eq!(decode_bcd(encode_bcd(value).unwrap()), value);
    }
}
