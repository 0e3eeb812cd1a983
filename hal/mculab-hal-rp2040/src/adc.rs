//! ADC input
//!
//! RP2040 has a single 12-bit ADC with four external channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//!
//! Readings are shifted down to 10 bits so the readout matches the
//! PIC18F4550 exercise (0-1023).

use embassy_rp::adc::{Adc, Blocking, Channel, Config};
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::ADC;
use embassy_rp::Peri;
use mculab_hal::{AdcError, AnalogInput};

use crate::pins::{PinBankPeripherals, PinError};

/// Result width reported to the exercises
pub const RESOLUTION_BITS: u8 = 10;

/// Native converter width
const NATIVE_BITS: u8 = 12;

/// External ADC channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    Adc0,
    Adc1,
    Adc2,
    Adc3,
}

impl AdcChannel {
    /// Channel wired to a GPIO, if any
    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            29 => Some(AdcChannel::Adc3),
            _ => None,
        }
    }

    /// Take this channel's pin out of its typed slot
    fn take_pin(self, pins: &mut PinBankPeripherals) -> Result<Channel<'static>, PinError> {
        let channel = match self {
            AdcChannel::Adc0 => pins.pin26.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc1 => pins.pin27.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc2 => pins.pin28.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc3 => pins.pin29.take().map(|p| Channel::new_pin(p, Pull::None)),
        };
        channel.ok_or(PinError::AlreadyTaken)
    }
}

/// One ADC channel in blocking mode
pub struct RpAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RpAdc {
    /// Claim the ADC and the channel on `gpio`
    pub fn new(
        adc: Peri<'static, ADC>,
        pins: &mut PinBankPeripherals,
        gpio: u8,
    ) -> Result<Self, PinError> {
        let channel = AdcChannel::from_gpio(gpio)
            .ok_or(PinError::WrongFunction)?
            .take_pin(pins)?;
        Ok(Self {
            adc: Adc::new_blocking(adc, Config::default()),
            channel,
        })
    }
}

impl AnalogInput for RpAdc {
    fn read_raw(&mut self) -> Result<u16, AdcError> {
        let raw = self
            .adc
            .blocking_read(&mut self.channel)
            .map_err(|_| AdcError::ConversionFailed)?;
        Ok(raw >> (NATIVE_BITS - RESOLUTION_BITS))
    }

    fn resolution_bits(&self) -> u8 {
        RESOLUTION_BITS
    }
}
