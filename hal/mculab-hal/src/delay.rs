//! Blocking delay abstraction
//!
//! The exercises time everything with busy-wait loops. Chip HALs back this
//! trait with a calibrated spin or a hardware timer; tests back it with a
//! recorder that only adds up the requested time.

/// Blocking delay provider
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: DelayMs + ?Sized> DelayMs for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
