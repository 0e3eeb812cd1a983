//! ADC readout formatting for a 16x2 character LCD
//!
//! Conversions are integer-only. The full layout prints the voltage
//! truncated to two decimals; the compact layout rounds half-up like `%1.2f`.

use core::fmt::Write;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference voltage of the lab board ADC, in mV
pub const DEFAULT_VREF_MV: u32 = 5000;

/// Delay between readout refreshes
pub const REFRESH_MS: u32 = 500;

/// How long the title screen stays up
pub const TITLE_MS: u32 = 2000;

/// Title screen, first line
pub const TITLE_LINE_1: &str = " ADC  Reading  ";

/// Title screen, second line
pub const TITLE_LINE_2: &str = "  PIC18F4550   ";

/// Formatted LCD line, long enough for the widest readout text
pub type LcdLine = String<20>;

/// Readout layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReadoutLayout {
    /// `Analog: X.XXV` over `Digital: XXXX`
    #[default]
    Full,
    /// `ADC: XXXX` over `Volt: X.XXV`
    Compact,
}

/// One ADC conversion result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcReading {
    raw: u16,
    bits: u8,
}

impl AdcReading {
    /// Wrap a raw result, clamping it to the converter's full scale
    pub fn new(raw: u16, bits: u8) -> Self {
        let bits = bits.clamp(1, 16);
        let full_scale = Self::full_scale_for(bits);
        Self {
            raw: raw.min(full_scale),
            bits,
        }
    }

    /// A 10-bit reading, as on the PIC18 board
    pub fn ten_bit(raw: u16) -> Self {
        Self::new(raw, 10)
    }

    fn full_scale_for(bits: u8) -> u16 {
        if bits >= 16 {
            u16::MAX
        } else {
            (1u16 << bits) - 1
        }
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    pub fn full_scale(&self) -> u16 {
        Self::full_scale_for(self.bits)
    }

    /// Input voltage in mV, truncated
    pub fn millivolts(&self, vref_mv: u32) -> u32 {
        (self.raw as u64 * vref_mv as u64 / self.full_scale() as u64) as u32
    }

    /// Voltage as `X.XX`, truncated to two decimals
    pub fn format_voltage(&self, vref_mv: u32) -> LcdLine {
        Self::centivolt_text(self.millivolts(vref_mv) / 10)
    }

    /// Voltage as `X.XX`, rounded half-up to two decimals
    pub fn format_voltage_rounded(&self, vref_mv: u32) -> LcdLine {
        let full = self.full_scale() as u64 * 10;
        let centivolts = (self.raw as u64 * vref_mv as u64 + full / 2) / full;
        Self::centivolt_text(centivolts as u32)
    }

    fn centivolt_text(centivolts: u32) -> LcdLine {
        let mut text = LcdLine::new();
        // 20 bytes always hold a u32 split as volts.centivolts
        let _ = write!(text, "{}.{:02}", centivolts / 100, centivolts % 100);
        text
    }

    /// Both LCD lines for the chosen layout
    pub fn lines(&self, layout: ReadoutLayout, vref_mv: u32) -> [LcdLine; 2] {
        match layout {
            ReadoutLayout::Full => self.readout_lines(vref_mv),
            ReadoutLayout::Compact => self.compact_lines(vref_mv),
        }
    }

    /// `Analog: X.XXV  ` and `Digital: XXXX    `
    ///
    /// Trailing spaces blank out digits left over from a longer previous
    /// value; the display clips the second line to its width.
    pub fn readout_lines(&self, vref_mv: u32) -> [LcdLine; 2] {
        let mut analog = LcdLine::new();
        let mut digital = LcdLine::new();
        let _ = write!(analog, "Analog: {}V  ", self.format_voltage(vref_mv));
        let _ = write!(digital, "Digital: {:4}    ", self.raw);
        [analog, digital]
    }

    /// `ADC: XXXX` and `Volt: X.XXV`
    pub fn compact_lines(&self, vref_mv: u32) -> [LcdLine; 2] {
        let mut adc = LcdLine::new();
        let mut volt = LcdLine::new();
        let _ = write!(adc, "ADC: {:4}", self.raw);
        let _ = write!(volt, "Volt: {}V", self.format_voltage_rounded(vref_mv));
        [adc, volt]
    }
}

/// Title screen lines
pub fn title_lines() -> [&'static str; 2] {
    [TITLE_LINE_1, TITLE_LINE_2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_millivolts_10bit() {
        assert_eq!(AdcReading::ten_bit(0).millivolts(5000), 0);
        assert_eq!(AdcReading::ten_bit(512).millivolts(5000), 2502);
        assert_eq!(AdcReading::ten_bit(1023).millivolts(5000), 5000);
    }

    #[test]
    fn test_reading_clamps_to_full_scale() {
        let r = AdcReading::ten_bit(4000);
        assert_eq!(r.raw(), 1023);
        assert_eq!(r.full_scale(), 1023);
    }

    #[test]
    fn test_format_voltage_truncates() {
        assert_eq!(AdcReading::ten_bit(256).format_voltage(5000).as_str(), "1.25");
        assert_eq!(AdcReading::ten_bit(768).format_voltage(5000).as_str(), "3.75");
        assert_eq!(AdcReading::ten_bit(1023).format_voltage(5000).as_str(), "5.00");
        assert_eq!(AdcReading::ten_bit(1).format_voltage(5000).as_str(), "0.00");
    }

    #[test]
    fn test_readout_lines() {
        let [analog, digital] = AdcReading::ten_bit(512).readout_lines(5000);
        assert_eq!(analog.as_str(), "Analog: 2.50V  ");
        assert_eq!(digital.as_str(), "Digital:  512    ");
    }

    #[test]
    fn test_compact_lines() {
        let [adc, volt] = AdcReading::ten_bit(7).lines(ReadoutLayout::Compact, 5000);
        assert_eq!(adc.as_str(), "ADC:    7");
        assert_eq!(volt.as_str(), "Volt: 0.03V");
    }

    #[test]
    fn test_compact_voltage_rounds() {
        // 1022 counts is 4.995 V
        let [_, volt] = AdcReading::ten_bit(1022).compact_lines(5000);
        assert_eq!(volt.as_str(), "Volt: 5.00V");
        let [analog, _] = AdcReading::ten_bit(1022).readout_lines(5000);
        assert_eq!(analog.as_str(), "Analog: 4.99V  ");
        assert_eq!(AdcReading::ten_bit(1023).format_voltage_rounded(5000).as_str(), "5.00");
        assert_eq!(AdcReading::ten_bit(0).format_voltage_rounded(5000).as_str(), "0.00");
    }

    #[test]
    fn test_title_fits_display() {
        for line in title_lines() {
            assert!(line.len() <= 16);
        }
    }

    proptest! {
        #[test]
        fn voltage_never_exceeds_reference(raw in 0u16..=u16::MAX) {
            let reading = AdcReading::ten_bit(raw);
            prop_assert!(reading.millivolts(5000) <= 5000);
            prop_assert_eq!(reading.format_voltage(5000).len(), 4);
            prop_assert_eq!(reading.format_voltage_rounded(5000).len(), 4);
        }

        #[test]
        fn analog_line_fits_display(raw in 0u16..=1023) {
            let [analog, _] = AdcReading::ten_bit(raw).readout_lines(5000);
            prop_assert!(analog.len() <= 16);
        }
    }
}
