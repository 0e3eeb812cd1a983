//! GPIO on/off outputs
//!
//! Relay, buzzer and status LED are all a single pin that is either on or
//! off, through a transistor stage or sunk directly into the pin.

use mculab_core::buzzer::PinAction;
use mculab_core::config::PinConfig;
use mculab_hal::OutputPin;

/// On/off load on one pin
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioSwitch<P> {
    pin: P,
    /// If true, ON = pin LOW
    inverted: bool,
}

impl<P: OutputPin> GpioSwitch<P> {
    /// Create a switch and turn it off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut switch = Self { pin, inverted };
        switch.set_on(false);
        switch
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Switch wired as a configured pin describes
    pub fn from_config(pin: P, config: &PinConfig) -> Self {
        Self::new(pin, config.inverted)
    }

    pub fn set_on(&mut self, on: bool) {
        // on != inverted: active-high on, or active-low off
        self.pin.set_state(on != self.inverted);
    }

    /// Logical state, read back from the pin latch
    pub fn is_on(&self) -> bool {
        self.pin.is_set_high() != self.inverted
    }

    pub fn toggle(&mut self) {
        self.pin.toggle();
    }

    /// Carry out a timer tick decision
    pub fn apply(&mut self, action: PinAction) {
        match action {
            PinAction::Toggle => self.toggle(),
            PinAction::ForceLow => self.set_on(false),
            PinAction::Hold => {}
        }
    }
}

/// Logical levels: high means on, whatever the wiring
///
/// Lets a switch stand in wherever an active-high pin is expected, such as
/// the console's status LED.
impl<P: OutputPin> OutputPin for GpioSwitch<P> {
    fn set_high(&mut self) {
        self.set_on(true);
    }

    fn set_low(&mut self) {
        self.set_on(false);
    }

    fn is_set_high(&self) -> bool {
        self.is_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;

    #[test]
    fn test_active_high_switch() {
        let mut relay = GpioSwitch::new_active_high(MockPin::default());

        // Initially off
        assert!(!relay.is_on());
        assert!(!relay.pin.high);

        relay.set_on(true);
        assert!(relay.is_on());
        assert!(relay.pin.high);

        relay.set_on(false);
        assert!(!relay.is_on());
        assert!(!relay.pin.high);
    }

    #[test]
    fn test_active_low_switch() {
        let mut led = GpioSwitch::new_active_low(MockPin::default());

        // Off means the pin sits high
        assert!(!led.is_on());
        assert!(led.pin.high);

        led.set_on(true);
        assert!(led.is_on());
        assert!(!led.pin.high);
    }

    #[test]
    fn test_tick_actions() {
        let mut buzzer = GpioSwitch::new_active_high(MockPin::default());
        buzzer.apply(PinAction::Toggle);
        assert!(buzzer.is_on());
        buzzer.apply(PinAction::Hold);
        assert!(buzzer.is_on());
        buzzer.apply(PinAction::Toggle);
        assert!(!buzzer.is_on());
        buzzer.apply(PinAction::Toggle);
        buzzer.apply(PinAction::ForceLow);
        assert!(!buzzer.is_on());
    }

    #[test]
    fn test_logical_pin_view() {
        let mut led = GpioSwitch::new_active_low(MockPin::default());
        OutputPin::set_high(&mut led);
        assert!(led.is_on());
        assert!(!led.pin.high);
        assert!(OutputPin::is_set_high(&led));
    }

    #[test]
    fn test_from_config() {
        let led = GpioSwitch::from_config(MockPin::default(), &PinConfig::inverted(3));
        assert!(led.pin.high);
    }
}
