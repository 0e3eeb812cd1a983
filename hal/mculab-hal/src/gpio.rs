//! GPIO pin and port abstractions
//!
//! Provides traits for digital input and output pins, and for whole 8-bit
//! ports, that can be implemented by chip-specific HALs.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// An 8-bit output port
///
/// Models a port latch register such as `P1` on the 8051 or `LATB` on the
/// PIC18: one write sets all eight pins at once, and the last written
/// value can be read back from the latch.
pub trait ParallelPort {
    /// Drive all eight pins from `value` (bit 0 = pin 0)
    fn write(&mut self, value: u8);

    /// Value currently held in the output latch
    fn latched(&self) -> u8;

    /// Read-modify-write: replace the bits selected by `mask` with the
    /// corresponding bits of `value`, keeping every other pin as it is.
    fn modify(&mut self, mask: u8, value: u8) {
        let next = (self.latched() & !mask) | (value & mask);
        self.write(next);
    }

    /// Set or clear a single pin
    fn set_bit(&mut self, bit: u8, high: bool) {
        let mask = 1u8 << (bit & 0x07);
        self.modify(mask, if high { mask } else { 0 });
    }
}
