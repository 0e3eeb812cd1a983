//! RP2040 implementation of the mculab HAL
//!
//! Wraps embassy-rp peripherals in the `mculab-hal` traits so the drivers
//! and exercise logic run unchanged on the lab board:
//!
//! - Pin bank for taking GPIOs by number from `lab.toml`
//! - Output/input pins and eight-pin ports
//! - ADC channels on GPIO26-29, scaled to a 10-bit result
//! - Buffered UART on any valid TX/RX pair

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pins;
pub mod uart;

pub use adc::{AdcChannel, RpAdc};
pub use gpio::{GpioPort, RpInput, RpOutput};
pub use pins::{PinBank, PinBankPeripherals, PinError, RemainingPeripherals};
pub use uart::{gpio_to_uart, RpUartTx, UartId};
