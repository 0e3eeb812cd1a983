//! GPIO pins and eight-pin ports
//!
//! The lab programs were written against 8-bit port registers. Here a port
//! is up to eight arbitrary GPIOs, each mapped to one bit, with a software
//! latch standing in for the register's read-back.

use embassy_rp::gpio::{Input, Level, Output, Pull};
use mculab_hal::{InputPin, OutputPin, ParallelPort};

use crate::pins::{PinBank, PinError};

/// Push-pull output
pub struct RpOutput(Output<'static>);

impl RpOutput {
    /// Take `pin` from the bank as an output at `level`
    pub fn take(bank: &mut PinBank, pin: u8, level: Level) -> Result<Self, PinError> {
        Ok(Self(Output::new(bank.take(pin)?, level)))
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn toggle(&mut self) {
        self.0.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Digital input
pub struct RpInput(Input<'static>);

impl RpInput {
    /// Take `pin` from the bank as an input, with the pull-up if asked
    pub fn take(bank: &mut PinBank, pin: u8, pull_up: bool) -> Result<Self, PinError> {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        Ok(Self(Input::new(bank.take(pin)?, pull)))
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Up to eight outputs behaving as one port register
///
/// Bits without a pin are kept in the latch only. Pins change one after
/// another, not in a single register write.
pub struct GpioPort {
    pins: [Option<Output<'static>>; 8],
    latch: u8,
}

impl GpioPort {
    /// Port on consecutive bits starting at `first_bit`, all pins low
    ///
    /// An 8-LED bank starts at bit 0; the D4-D7 lines of a 4-bit LCD bus
    /// start at bit 4.
    pub fn take<I>(bank: &mut PinBank, first_bit: u8, pins: I) -> Result<Self, PinError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut port = Self {
            pins: [None, None, None, None, None, None, None, None],
            latch: 0,
        };
        for (bit, pin) in (first_bit as usize..8).zip(pins) {
            port.pins[bit] = Some(Output::new(bank.take(pin)?, Level::Low));
        }
        Ok(port)
    }
}

impl ParallelPort for GpioPort {
    fn write(&mut self, value: u8) {
        for (bit, slot) in self.pins.iter_mut().enumerate() {
            if let Some(pin) = slot {
                pin.set_level(Level::from(value & (1 << bit) != 0));
            }
        }
        self.latch = value;
    }

    fn latched(&self) -> u8 {
        self.latch
    }
}
