//! Hardware configuration types
//!
//! Pin assignments and serial settings for the lab board. Only one
//! exercise runs per image, so pins are unique per exercise rather than
//! across the whole map.

use heapless::Vec;
use mculab_hal::uart::{DataBits, Parity, StopBits};
use mculab_hal::UartConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{Exercise, LcdBusWidth};

/// Highest GPIO number on the RP2040
pub const MAX_GPIO: u8 = 29;

/// Pins any single exercise claims, at most
pub const MAX_EXERCISE_PINS: usize = 16;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Active-high output or floating input
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Active-low output (LED sunk into the pin)
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Active-low push button to ground with the internal pull-up
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Pin assignments for every exercise
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinMap {
    /// First of eight consecutive pins forming the LED / DAC data port
    pub port_base: u8,
    /// Bit of the port used by the single-LED blink
    pub single_led_bit: u8,
    /// LCD register select
    pub lcd_rs: u8,
    /// LCD enable strobe
    pub lcd_en: u8,
    /// First LCD data pin (D4 on a 4-bit bus, D0 on an 8-bit bus)
    pub lcd_data_base: u8,
    pub button1: PinConfig,
    pub button2: PinConfig,
    pub relay: PinConfig,
    pub buzzer: PinConfig,
    /// LED switched by the serial console
    pub status_led: PinConfig,
    pub uart_tx: u8,
    pub uart_rx: u8,
    /// Analog input (26-29 on the RP2040)
    pub adc: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            port_base: 2,
            single_led_bit: 0,
            lcd_rs: 18,
            lcd_en: 19,
            lcd_data_base: 10,
            button1: PinConfig::button(20),
            button2: PinConfig::button(21),
            relay: PinConfig::new(22),
            buzzer: PinConfig::new(27),
            status_led: PinConfig::new(25),
            uart_tx: 0,
            uart_rx: 1,
            adc: 26,
        }
    }
}

impl PinMap {
    /// Eight port pins, bit 0 first
    pub fn port_pins(&self) -> impl Iterator<Item = u8> {
        let base = self.port_base;
        (0..8).map(move |i| base.saturating_add(i))
    }

    /// LCD data pins for a bus width, lowest data bit first
    pub fn lcd_data_pins(&self, width: LcdBusWidth) -> impl Iterator<Item = u8> {
        let base = self.lcd_data_base;
        (0..width.data_pins()).map(move |i| base.saturating_add(i))
    }

    /// Every GPIO an exercise claims
    pub fn pins_for(&self, exercise: Exercise, lcd_bus: LcdBusWidth) -> Vec<u8, MAX_EXERCISE_PINS> {
        let mut pins: Vec<u8, MAX_EXERCISE_PINS> = Vec::new();
        let mut add = |pin: u8| {
            // Largest set is 8 port pins + 4 others, well under capacity
            let _ = pins.push(pin);
        };

        match exercise {
            Exercise::LedSingleBlink => add(self.port_base.saturating_add(self.single_led_bit)),
            Exercise::LedBlink
            | Exercise::LedCounter
            | Exercise::LedFixed
            | Exercise::LedHexDigits
            | Exercise::LedPatternShow
            | Exercise::DacSquare
            | Exercise::DacSawtooth
            | Exercise::DacTriangular => self.port_pins().for_each(&mut add),
            Exercise::Lcd | Exercise::AdcLcd => {
                add(self.lcd_rs);
                add(self.lcd_en);
                self.lcd_data_pins(lcd_bus).for_each(&mut add);
                if exercise == Exercise::AdcLcd {
                    add(self.adc);
                }
            }
            Exercise::ButtonControl => {
                add(self.button1.pin);
                add(self.button2.pin);
                add(self.relay.pin);
                add(self.buzzer.pin);
                self.port_pins().for_each(&mut add);
            }
            Exercise::BuzzerTimer => add(self.buzzer.pin),
            Exercise::UartEcho => {
                add(self.uart_tx);
                add(self.uart_rx);
                self.port_pins().for_each(&mut add);
            }
            Exercise::UartConsole => {
                add(self.uart_tx);
                add(self.uart_rx);
                add(self.status_led.pin);
            }
        }
        pins
    }
}

/// Serial line settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UartSettings {
    pub baud_rate: u32,
    /// Use the x16 baud generator when computing the divisor
    pub high_speed: bool,
}

impl Default for UartSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            high_speed: false,
        }
    }
}

impl UartSettings {
    /// 8-N-1 frame at the configured baud rate
    pub fn to_uart_config(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_config() {
        let pin = PinConfig::new(10);
        assert_eq!(pin.pin, 10);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

        let led = PinConfig::inverted(12);
        assert!(led.inverted);

        let button = PinConfig::button(4);
        assert!(button.inverted);
        assert!(button.pull_up);
    }

    #[test]
    fn test_port_pins() {
        let map = PinMap::default();
        let pins: Vec<u8, 8> = map.port_pins().collect();
        assert_eq!(&pins[..], &[2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_pins_for_lcd_bus_widths() {
        let map = PinMap::default();
        assert_eq!(map.pins_for(Exercise::Lcd, LcdBusWidth::Four).len(), 6);
        assert_eq!(map.pins_for(Exercise::Lcd, LcdBusWidth::Eight).len(), 10);
        let adc = map.pins_for(Exercise::AdcLcd, LcdBusWidth::Four);
        assert!(adc.contains(&26));
    }

    #[test]
    fn test_pins_for_button_control() {
        let map = PinMap::default();
        let pins = map.pins_for(Exercise::ButtonControl, LcdBusWidth::Four);
        assert_eq!(pins.len(), 12);
        assert!(pins.contains(&20));
        assert!(pins.contains(&27));
    }

    #[test]
    fn test_uart_settings_default() {
        let cfg = UartSettings::default().to_uart_config();
        assert_eq!(cfg, UartConfig::default());
    }
}
