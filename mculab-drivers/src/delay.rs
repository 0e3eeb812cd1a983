//! Delay adapter for `embedded-hal` providers
//!
//! `embassy_time::Delay` and most chip HALs implement
//! [`embedded_hal::delay::DelayNs`]; wrapping one in [`HalDelay`] lets the
//! blocking drivers in this crate use it as their [`DelayMs`].

use embedded_hal::delay::DelayNs;
use mculab_hal::DelayMs;

/// [`DelayMs`] over any `embedded-hal` delay
pub struct HalDelay<D>(pub D);

impl<D: DelayNs> DelayMs for HalDelay<D> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }
}
