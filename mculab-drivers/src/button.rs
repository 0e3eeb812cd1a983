//! Push buttons
//!
//! The lab wiring pulls the pin to ground against a pull-up, so "pressed"
//! normally reads low. A button wired to VCC is configured non-inverted.

use mculab_core::button::DEBOUNCE_MS;
use mculab_core::config::PinConfig;
use mculab_hal::{DelayMs, InputPin};

pub struct PushButton<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> PushButton<P> {
    /// Button to ground, pressed when the pin reads low
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Button with the polarity from its pin entry
    pub fn from_config(pin: P, config: &PinConfig) -> Self {
        Self {
            pin,
            active_low: config.inverted,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pin.is_low() == self.active_low
    }

    /// Pressed now and still pressed after the debounce delay
    pub fn debounced<D: DelayMs>(&self, delay: &mut D) -> bool {
        if !self.is_pressed() {
            return false;
        }
        delay.delay_ms(DEBOUNCE_MS);
        self.is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockInput};

    #[test]
    fn test_pressed_reads_low() {
        assert!(PushButton::active_low(MockInput::new(&[false])).is_pressed());
        assert!(!PushButton::active_low(MockInput::new(&[true])).is_pressed());
    }

    #[test]
    fn test_polarity_from_config() {
        let to_ground = PushButton::from_config(MockInput::new(&[false]), &PinConfig::button(20));
        assert!(to_ground.is_pressed());

        // Wired to VCC with a pull-down: pressed reads high
        let to_vcc = PushButton::from_config(MockInput::new(&[true]), &PinConfig::new(20));
        assert!(to_vcc.is_pressed());
        let released = PushButton::from_config(MockInput::new(&[false]), &PinConfig::new(20));
        assert!(!released.is_pressed());
    }

    #[test]
    fn test_debounce_confirms_held_press() {
        let button = PushButton::active_low(MockInput::new(&[false, false]));
        let mut delay = MockDelay::default();
        assert!(button.debounced(&mut delay));
        assert_eq!(delay.total_us, 20_000);
    }

    #[test]
    fn test_debounce_rejects_bounce() {
        let button = PushButton::active_low(MockInput::new(&[false, true]));
        let mut delay = MockDelay::default();
        assert!(!button.debounced(&mut delay));
    }

    #[test]
    fn test_released_button_skips_delay() {
        let button = PushButton::active_low(MockInput::new(&[true]));
        let mut delay = MockDelay::default();
        assert!(!button.debounced(&mut delay));
        assert_eq!(delay.total_us, 0);
    }
}
