//! Lab configuration type definitions
//!
//! One image runs one exercise. The selected exercise and its parameters
//! are written in `lab.toml`, checked at build time and decoded at boot.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::{PinMap, UartSettings, MAX_GPIO};
use crate::adc::ReadoutLayout;
use crate::buzzer::BuzzerMode;
use crate::led::COUNTER_HOLD_MS;
use crate::timing::Clock;
use crate::waveform::{Waveform, WaveformKind};

/// Maximum LCD line length
pub const MAX_LINE_LEN: usize = 16;

/// Maximum device name length
pub const MAX_NAME_LEN: usize = 16;

/// Fastest rate the RP2040 UART reaches from its 125 MHz peripheral clock
pub const MAX_BAUD_RATE: u32 = 7_812_500;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Exercise name not recognised
    UnknownExercise,
    /// Pin number outside 0-29, or not usable for its role
    InvalidPin(u8),
    /// Same pin used twice by the selected exercise
    DuplicatePin(u8),
    /// Waveform frequency zero or unreachable
    InvalidFrequency,
    /// A period, hold time or baud rate is zero or unreachable
    InvalidTiming,
}

/// The lab exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Exercise {
    /// All eight LEDs on and off
    #[default]
    LedBlink,
    /// One active-low LED on and off
    LedSingleBlink,
    /// 8-bit binary count on the LEDs
    LedCounter,
    /// Constant pattern on the LEDs
    LedFixed,
    /// Seven-segment hex digits 0..F
    LedHexDigits,
    /// Blink, odd/even alternation and chase in sequence
    LedPatternShow,
    DacSquare,
    DacSawtooth,
    DacTriangular,
    /// Two lines of text on the LCD
    Lcd,
    /// Buttons driving relay, buzzer and LED chase
    ButtonControl,
    /// Timer tick toggling the buzzer
    BuzzerTimer,
    /// Echo each received byte
    UartEcho,
    /// LED_ON / LED_OFF / STATUS console
    UartConsole,
    /// ADC reading shown on the LCD
    AdcLcd,
}

impl Exercise {
    pub const ALL: [Exercise; 15] = [
        Exercise::LedBlink,
        Exercise::LedSingleBlink,
        Exercise::LedCounter,
        Exercise::LedFixed,
        Exercise::LedHexDigits,
        Exercise::LedPatternShow,
        Exercise::DacSquare,
        Exercise::DacSawtooth,
        Exercise::DacTriangular,
        Exercise::Lcd,
        Exercise::ButtonControl,
        Exercise::BuzzerTimer,
        Exercise::UartEcho,
        Exercise::UartConsole,
        Exercise::AdcLcd,
    ];

    /// Name as written in `lab.toml`
    pub const fn name(self) -> &'static str {
        match self {
            Exercise::LedBlink => "led_blink",
            Exercise::LedSingleBlink => "led_single_blink",
            Exercise::LedCounter => "led_counter",
            Exercise::LedFixed => "led_fixed",
            Exercise::LedHexDigits => "led_hex_digits",
            Exercise::LedPatternShow => "led_pattern_show",
            Exercise::DacSquare => "dac_square",
            Exercise::DacSawtooth => "dac_sawtooth",
            Exercise::DacTriangular => "dac_triangular",
            Exercise::Lcd => "lcd",
            Exercise::ButtonControl => "button_control",
            Exercise::BuzzerTimer => "buzzer_timer",
            Exercise::UartEcho => "uart_echo",
            Exercise::UartConsole => "uart_console",
            Exercise::AdcLcd => "adc_lcd",
        }
    }

    /// Parse a `lab.toml` exercise name
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name() == name)
            .ok_or(ConfigError::UnknownExercise)
    }

    /// Waveform shape for the DAC exercises
    pub fn waveform(self) -> Option<WaveformKind> {
        match self {
            Exercise::DacSquare => Some(WaveformKind::Square),
            Exercise::DacSawtooth => Some(WaveformKind::Sawtooth),
            Exercise::DacTriangular => Some(WaveformKind::Triangular),
            _ => None,
        }
    }

    pub fn uses_lcd(self) -> bool {
        matches!(self, Exercise::Lcd | Exercise::AdcLcd)
    }

    pub fn uses_uart(self) -> bool {
        matches!(self, Exercise::UartEcho | Exercise::UartConsole)
    }
}

/// LCD data bus width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LcdBusWidth {
    /// D4-D7 only, bytes sent as two nibbles
    #[default]
    Four,
    /// D0-D7
    Eight,
}

impl LcdBusWidth {
    pub const fn data_pins(self) -> u8 {
        match self {
            LcdBusWidth::Four => 4,
            LcdBusWidth::Eight => 8,
        }
    }
}

/// Complete lab configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LabConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Exercise this image runs
    pub exercise: Exercise,
    /// CPU clock the timing maths assume
    pub clock: Clock,
    pub uart: UartSettings,
    pub pins: PinMap,
    /// DAC frequency; `None` keeps the board's default step timing
    pub waveform_hz: Option<u32>,
    pub lcd_bus: LcdBusWidth,
    /// Text for the LCD exercise
    pub lcd_lines: [String<MAX_LINE_LEN>; 2],
    /// Hold time of each binary count
    pub counter_hold_ms: u32,
    /// Flash all LEDs between counts
    pub counter_flash: bool,
    /// Pattern for the fixed-pattern exercise
    pub fixed_pattern: u8,
    /// Rotate one step per loop instead of full sweeps
    pub button_rotate: bool,
    pub buzzer_mode: BuzzerMode,
    pub adc_layout: ReadoutLayout,
    /// ADC reference voltage in mV
    pub adc_vref_mv: u32,
    /// Name reported by the console STATUS command
    pub device_name: String<MAX_NAME_LEN>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exercise: Exercise::default(),
            clock: Clock::default(),
            uart: UartSettings::default(),
            pins: PinMap::default(),
            waveform_hz: None,
            lcd_bus: LcdBusWidth::default(),
            lcd_lines: [text("MMCOE"), text("Laboratory")],
            counter_hold_ms: COUNTER_HOLD_MS,
            counter_flash: false,
            fixed_pattern: 0x3F,
            button_rotate: false,
            buzzer_mode: BuzzerMode::default(),
            adc_layout: ReadoutLayout::default(),
            adc_vref_mv: crate::adc::DEFAULT_VREF_MV,
            device_name: text("RP2040"),
        }
    }
}

fn text<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

impl LabConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration running a given exercise with default parameters
    pub fn for_exercise(exercise: Exercise) -> Self {
        Self {
            exercise,
            ..Self::default()
        }
    }

    /// DAC generator for the selected exercise, if it is a DAC exercise
    pub fn waveform(&self) -> Result<Option<Waveform>, ConfigError> {
        let Some(kind) = self.exercise.waveform() else {
            return Ok(None);
        };
        match self.waveform_hz {
            None => Ok(Some(Waveform::new(kind))),
            Some(hz) => Waveform::with_frequency(kind, hz)
                .map(Some)
                .map_err(|_| ConfigError::InvalidFrequency),
        }
    }

    /// Check the selected exercise can run as configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = self.pins.pins_for(self.exercise, self.lcd_bus);
        for (i, &pin) in pins.iter().enumerate() {
            if pin > MAX_GPIO {
                return Err(ConfigError::InvalidPin(pin));
            }
            if pins[..i].contains(&pin) {
                return Err(ConfigError::DuplicatePin(pin));
            }
        }

        if self.pins.single_led_bit > 7 {
            return Err(ConfigError::InvalidPin(self.pins.single_led_bit));
        }

        if self.exercise == Exercise::AdcLcd && !(26..=MAX_GPIO).contains(&self.pins.adc) {
            return Err(ConfigError::InvalidPin(self.pins.adc));
        }

        if self.waveform_hz == Some(0) {
            return Err(ConfigError::InvalidFrequency);
        }
        self.waveform()?;

        if self.counter_hold_ms == 0 || self.adc_vref_mv == 0 {
            return Err(ConfigError::InvalidTiming);
        }

        // The clock preset feeds the lab board maths only; the UART runs
        // from the RP2040 peripheral clock
        let baud = self.uart.baud_rate;
        if self.exercise.uses_uart() && (baud == 0 || baud > MAX_BAUD_RATE) {
            return Err(ConfigError::InvalidTiming);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LabConfig::new();
        assert_eq!(config.exercise, Exercise::LedBlink);
        assert_eq!(config.uart.baud_rate, 9600);
        assert_eq!(config.lcd_lines[0].as_str(), "MMCOE");
        assert_eq!(config.lcd_lines[1].as_str(), "Laboratory");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_every_exercise_validates_by_default() {
        for exercise in Exercise::ALL {
            let config = LabConfig::for_exercise(exercise);
            assert_eq!(config.validate(), Ok(()), "{}", exercise.name());
        }
    }

    #[test]
    fn test_exercise_names_round_trip() {
        for exercise in Exercise::ALL {
            assert_eq!(Exercise::from_name(exercise.name()), Ok(exercise));
        }
        assert_eq!(
            Exercise::from_name("led_party"),
            Err(ConfigError::UnknownExercise)
        );
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut config = LabConfig::for_exercise(Exercise::ButtonControl);
        config.pins.relay.pin = config.pins.button1.pin;
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin(20)));
    }

    #[test]
    fn test_pins_only_checked_for_selected_exercise() {
        let mut config = LabConfig::for_exercise(Exercise::LedBlink);
        // Relay is not part of the LED exercise
        config.pins.relay.pin = 40;
        assert_eq!(config.validate(), Ok(()));
        config.exercise = Exercise::ButtonControl;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(40)));
    }

    #[test]
    fn test_port_past_last_gpio() {
        let mut config = LabConfig::new();
        config.pins.port_base = 25;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(30)));
    }

    #[test]
    fn test_adc_pin_must_be_analog() {
        let mut config = LabConfig::for_exercise(Exercise::AdcLcd);
        config.pins.adc = 5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(5)));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let mut config = LabConfig::for_exercise(Exercise::DacSquare);
        config.waveform_hz = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidFrequency));
        config.waveform_hz = Some(1000);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.waveform().unwrap().unwrap().period_us(), 1000);
    }

    #[test]
    fn test_unreachable_baud_rejected() {
        let mut config = LabConfig::for_exercise(Exercise::UartConsole);
        config.uart.baud_rate = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTiming));
        config.uart.baud_rate = MAX_BAUD_RATE + 1;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTiming));
    }

    #[test]
    fn test_fast_baud_independent_of_clock_preset() {
        // No PIC18 SPBRG value gives 460800 baud at 8 MHz
        let mut config = LabConfig::for_exercise(Exercise::UartEcho);
        config.clock = Clock::Internal8MHz;
        config.uart.baud_rate = 460_800;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_counter_hold_rejected() {
        let mut config = LabConfig::for_exercise(Exercise::LedCounter);
        config.counter_hold_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTiming));
    }
}
