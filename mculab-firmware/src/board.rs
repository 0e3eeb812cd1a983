//! Lab board assembly
//!
//! Turns the pin numbers in [`PinMap`] into the drivers each exercise runs
//! on. Every exercise claims only its own pins, so two exercises may share
//! a GPIO in `lab.toml`.

use embassy_rp::gpio::Level;
use embassy_time::Delay;

use mculab_core::config::{LcdBusWidth, PinConfig, PinMap};
use mculab_core::display::{CharacterDisplay, DisplayError};
use mculab_drivers::button::PushButton;
use mculab_drivers::delay::HalDelay;
use mculab_drivers::lcd::{EightBitBus, FourBitBus, Hd44780, LcdError};
use mculab_drivers::switch::GpioSwitch;
use mculab_hal_rp2040::{GpioPort, PinBank, PinError, RpInput, RpOutput};

/// Why an exercise could not be set up
#[derive(Debug, Clone, Copy, defmt::Format)]
pub enum SetupError {
    Pin(PinError),
    Lcd(LcdError),
    /// Frame format or baud rate the UART cannot produce
    Uart,
    /// Configuration rejected at boot
    Config,
    Spawn,
}

impl From<PinError> for SetupError {
    fn from(e: PinError) -> Self {
        SetupError::Pin(e)
    }
}

impl From<LcdError> for SetupError {
    fn from(e: LcdError) -> Self {
        SetupError::Lcd(e)
    }
}

impl From<embassy_executor::SpawnError> for SetupError {
    fn from(_: embassy_executor::SpawnError) -> Self {
        SetupError::Spawn
    }
}

/// The eight-pin LED / DAC data port
pub fn data_port(bank: &mut PinBank, pins: &PinMap) -> Result<GpioPort, PinError> {
    GpioPort::take(bank, 0, pins.port_pins())
}

/// A port holding only the single-blink LED, at its bit position
pub fn single_led_port(bank: &mut PinBank, pins: &PinMap) -> Result<GpioPort, PinError> {
    let bit = pins.single_led_bit;
    GpioPort::take(bank, bit, [pins.port_base.saturating_add(bit)])
}

/// On/off output from a pin entry, starting off
pub fn switch(bank: &mut PinBank, config: &PinConfig) -> Result<GpioSwitch<RpOutput>, PinError> {
    let off = if config.inverted { Level::High } else { Level::Low };
    let pin = RpOutput::take(bank, config.pin, off)?;
    Ok(GpioSwitch::from_config(pin, config))
}

pub fn button(bank: &mut PinBank, config: &PinConfig) -> Result<PushButton<RpInput>, PinError> {
    let pin = RpInput::take(bank, config.pin, config.pull_up)?;
    Ok(PushButton::from_config(pin, config))
}

type LcdDelay = HalDelay<Delay>;

/// HD44780 on either bus width
pub enum Lcd {
    Four(Hd44780<FourBitBus<RpOutput, RpOutput, GpioPort>, LcdDelay>),
    Eight(Hd44780<EightBitBus<RpOutput, RpOutput, GpioPort>, LcdDelay>),
}

impl Lcd {
    /// Claim the LCD pins and run the controller's power-on sequence
    pub fn take(bank: &mut PinBank, pins: &PinMap, width: LcdBusWidth) -> Result<Self, SetupError> {
        let rs = RpOutput::take(bank, pins.lcd_rs, Level::Low)?;
        let en = RpOutput::take(bank, pins.lcd_en, Level::Low)?;
        let data = pins.lcd_data_pins(width);

        let lcd = match width {
            LcdBusWidth::Four => {
                // D4-D7 sit on the upper nibble of the port
                let port = GpioPort::take(bank, 4, data)?;
                Lcd::Four(Hd44780::new(FourBitBus::new(rs, en, port), HalDelay(Delay))?)
            }
            LcdBusWidth::Eight => {
                let port = GpioPort::take(bank, 0, data)?;
                Lcd::Eight(Hd44780::new(EightBitBus::new(rs, en, port), HalDelay(Delay))?)
            }
        };
        Ok(lcd)
    }
}

impl CharacterDisplay for Lcd {
    fn clear(&mut self) -> Result<(), DisplayError> {
        match self {
            Lcd::Four(lcd) => CharacterDisplay::clear(lcd),
            Lcd::Eight(lcd) => CharacterDisplay::clear(lcd),
        }
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        match self {
            Lcd::Four(lcd) => lcd.set_cursor(row, col),
            Lcd::Eight(lcd) => lcd.set_cursor(row, col),
        }
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        match self {
            Lcd::Four(lcd) => CharacterDisplay::write_str(lcd, text),
            Lcd::Eight(lcd) => CharacterDisplay::write_str(lcd, text),
        }
    }

    fn dimensions(&self) -> (u8, u8) {
        match self {
            Lcd::Four(lcd) => lcd.dimensions(),
            Lcd::Eight(lcd) => lcd.dimensions(),
        }
    }
}
