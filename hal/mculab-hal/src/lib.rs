//! mculab Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040 today, anything with an 8-bit port tomorrow).
//! The exercises only ever touch hardware through these traits, so the same
//! LED, DAC, LCD, UART and ADC logic runs on target and against host mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (mculab-firmware, tests)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mculab-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  mculab-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::ParallelPort`] - 8-bit port register (LED banks, DAC data, LCD bus)
//! - [`uart::UartTx`] - Serial transmit
//! - [`adc::AnalogInput`] - Analog sampling
//! - [`delay::DelayMs`] - Blocking delays

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod delay;
pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogInput};
pub use delay::DelayMs;
pub use gpio::{InputPin, OutputPin, ParallelPort};
pub use uart::{UartConfig, UartError, UartTx};
