//! Peripheral drivers for the lab exercises
//!
//! Drivers are written against the `mculab-hal` traits, so each one runs
//! unchanged on the lab board and against host mocks:
//!
//! - DAC0808 on an 8-bit data port
//! - HD44780 16x2 character LCD (4-bit and 8-bit bus)
//! - GPIO on/off outputs (relay, buzzer, status LED)
//! - 8-LED bank
//! - Active-low push buttons
//! - `embedded-hal` delay adapter

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod button;
pub mod dac;
pub mod delay;
pub mod lcd;
pub mod led_bank;
pub mod switch;

#[cfg(test)]
mod mock;
