//! Board-agnostic core logic for the microcontroller lab exercises
//!
//! This crate contains all exercise logic that does not depend on
//! specific hardware implementations:
//!
//! - Clock presets, busy-wait calibration and timer/baud divisors
//! - LED patterns (blink, counter, hex digits, chase)
//! - DAC waveform generators (square, sawtooth, triangular)
//! - Button/relay/buzzer control decisions
//! - Timer-interrupt buzzer state shared with the main loop
//! - ADC readout formatting for a 16x2 LCD
//! - Character display trait
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod button;
pub mod buzzer;
pub mod config;
pub mod display;
pub mod led;
pub mod timing;
pub mod waveform;
