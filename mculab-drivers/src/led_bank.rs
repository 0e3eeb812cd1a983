//! Eight LEDs on a port

use embedded_hal_async::delay::DelayNs;
use mculab_core::led::LedStep;
use mculab_hal::{DelayMs, ParallelPort};

/// LED bank driven from an 8-bit port
pub struct LedBank<P> {
    port: P,
}

impl<P: ParallelPort> LedBank<P> {
    /// Take the port with every LED off
    pub fn new(mut port: P) -> Self {
        port.write(0x00);
        Self { port }
    }

    /// Latch a step's pattern without waiting
    ///
    /// Only the pins in the step's mask change.
    pub fn apply(&mut self, step: &LedStep) {
        self.port.modify(step.mask, step.pattern);
    }

    /// Latch a step and hold it
    pub fn show<D: DelayMs>(&mut self, step: &LedStep, delay: &mut D) {
        self.apply(step);
        if step.hold_ms > 0 {
            delay.delay_ms(step.hold_ms);
        }
    }

    /// Run every step of a pattern, returning how many were shown
    pub fn run<I, D>(&mut self, steps: I, delay: &mut D) -> usize
    where
        I: IntoIterator<Item = LedStep>,
        D: DelayMs,
    {
        let mut shown = 0;
        for step in steps {
            self.show(&step, delay);
            shown += 1;
        }
        shown
    }

    /// Latch a step and hold it, yielding to the executor
    pub async fn show_async<D: DelayNs>(&mut self, step: &LedStep, delay: &mut D) {
        self.apply(step);
        if step.hold_ms > 0 {
            delay.delay_ms(step.hold_ms).await;
        }
    }

    /// Current port value
    pub fn pattern(&self) -> u8 {
        self.port.latched()
    }

    pub fn release(self) -> P {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockPort};
    use mculab_core::led::{BinaryCounter, Blink, FixedPattern, PatternShow, SingleBlink};

    #[test]
    fn test_blink_timing() {
        let mut bank = LedBank::new(MockPort::default());
        let mut delay = MockDelay::default();
        let shown = bank.run(Blink::default().take(4), &mut delay);
        assert_eq!(shown, 4);
        assert_eq!(delay.total_us, 2_000_000);
        assert_eq!(bank.release().writes, vec![0x00, 0xFF, 0x00, 0xFF, 0x00]);
    }

    #[test]
    fn test_single_blink_leaves_other_pins() {
        let mut bank = LedBank::new(MockPort::default());
        bank.apply(&LedStep::port(0xF0, 0));
        let mut delay = MockDelay::default();
        let mut blink = SingleBlink::new(0, true, 500);
        bank.show(&blink.off_step(), &mut delay);
        assert_eq!(bank.pattern(), 0xF1);
        bank.show(&blink.next().unwrap(), &mut delay);
        assert_eq!(bank.pattern(), 0xF0);
    }

    #[test]
    fn test_counter_shows_binary() {
        let mut bank = LedBank::new(MockPort::default());
        let mut delay = MockDelay::default();
        bank.run(BinaryCounter::new(500).take(6), &mut delay);
        assert_eq!(bank.pattern(), 5);
        assert_eq!(delay.total_us, 3_000_000);
    }

    #[test]
    fn test_fixed_pattern_needs_no_delay() {
        let mut bank = LedBank::new(MockPort::default());
        let mut delay = MockDelay::default();
        bank.run(FixedPattern::new(0x3F), &mut delay);
        assert_eq!(bank.pattern(), 0x3F);
        assert!(delay.calls.is_empty());
    }

    #[test]
    fn test_pattern_show_writes() {
        let mut bank = LedBank::new(MockPort::default());
        let mut delay = MockDelay::default();
        let shown = bank.run(PatternShow::new().take(36), &mut delay);
        assert_eq!(shown, 36);
        assert_eq!(delay.total_us, 13_200_000);
        assert_eq!(u64::from(PatternShow::cycle_ms()) * 1000, delay.total_us);

        let mut expected = vec![0x00];
        for _ in 0..5 {
            expected.extend([0xFF, 0x00]);
        }
        for _ in 0..5 {
            expected.extend([0x55, 0xAA]);
        }
        for _ in 0..2 {
            expected.extend([0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80]);
        }
        assert_eq!(bank.release().writes, expected);
    }
}
