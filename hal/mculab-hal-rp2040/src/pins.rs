//! Take GPIO pins by number
//!
//! Pin numbers come from `lab.toml`, so the firmware cannot name
//! `p.PIN_n` fields directly. Peripherals are split into typed pin slots
//! (needed where embassy-rp wants a concrete pin, such as the ADC and UART)
//! and a [`PinBank`] that hands out the rest as `AnyPin` by number.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals;
use embassy_rp::{Peri, Peripherals};

/// Number of GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin cannot serve the requested function (ADC input, UART TX/RX)
    WrongFunction,
}

macro_rules! pin_slots {
    ($($field:ident: $pin:ident),* $(,)?) => {
        /// Every GPIO as an individually takeable typed slot
        pub struct PinBankPeripherals {
            $(pub $field: Option<Peri<'static, peripherals::$pin>>,)*
        }

        impl PinBankPeripherals {
            /// Split the GPIOs from the rest of the chip
            pub fn from_peripherals(p: Peripherals) -> (Self, RemainingPeripherals) {
                let pins = Self {
                    $($field: Some(p.$pin),)*
                };
                let remaining = RemainingPeripherals {
                    uart0: p.UART0,
                    uart1: p.UART1,
                    adc: p.ADC,
                };
                (pins, remaining)
            }

            /// Move every pin still in a slot out as `AnyPin`
            fn drain(&mut self) -> [Option<Peri<'static, AnyPin>>; GPIO_COUNT] {
                [$(self.$field.take().map(|p| p.into()),)*]
            }
        }
    };
}

pin_slots! {
    pin0: PIN_0, pin1: PIN_1, pin2: PIN_2, pin3: PIN_3, pin4: PIN_4,
    pin5: PIN_5, pin6: PIN_6, pin7: PIN_7, pin8: PIN_8, pin9: PIN_9,
    pin10: PIN_10, pin11: PIN_11, pin12: PIN_12, pin13: PIN_13, pin14: PIN_14,
    pin15: PIN_15, pin16: PIN_16, pin17: PIN_17, pin18: PIN_18, pin19: PIN_19,
    pin20: PIN_20, pin21: PIN_21, pin22: PIN_22, pin23: PIN_23, pin24: PIN_24,
    pin25: PIN_25, pin26: PIN_26, pin27: PIN_27, pin28: PIN_28, pin29: PIN_29,
}

/// Non-GPIO peripherals the exercises use
pub struct RemainingPeripherals {
    pub uart0: Peri<'static, peripherals::UART0>,
    pub uart1: Peri<'static, peripherals::UART1>,
    pub adc: Peri<'static, peripherals::ADC>,
}

/// GPIOs available by number
///
/// Build it after the typed pins (ADC, UART) have been taken from the
/// [`PinBankPeripherals`]; those numbers then report
/// [`PinError::AlreadyTaken`].
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Take every pin still left in `p`
    pub fn new(p: &mut PinBankPeripherals) -> Self {
        Self { pins: p.drain() }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}
