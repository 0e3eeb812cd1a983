//! HD44780 16x2 character LCD
//!
//! The controller is driven write-only: RS selects command or data, the
//! data lines are set up, and a high-to-low pulse on EN latches them.
//! Busy-flag polling is replaced by fixed delays after every transfer.
//!
//! Two bus wirings are supported:
//!
//! - [`FourBitBus`]: D4-D7 on the upper half of a port. Each byte goes out
//!   as two nibbles, high first, and the lower half of the port is left
//!   untouched so it stays free for other uses.
//! - [`EightBitBus`]: D0-D7 on a whole port.

use mculab_core::config::LcdBusWidth;
use mculab_core::display::{CharacterDisplay, DisplayError};
use mculab_hal::{DelayMs, OutputPin, ParallelPort};

/// Clear display
pub const CMD_CLEAR: u8 = 0x01;
/// Return home
pub const CMD_HOME: u8 = 0x02;
/// Entry mode: increment, no shift
pub const CMD_ENTRY_INCREMENT: u8 = 0x06;
/// Display off
pub const CMD_DISPLAY_OFF: u8 = 0x08;
/// Display on, cursor off
pub const CMD_DISPLAY_ON: u8 = 0x0C;
/// Function set: 4-bit, 2 lines, 5x7
pub const CMD_FUNCTION_4BIT: u8 = 0x28;
/// Function set: 8-bit, 2 lines, 5x7
pub const CMD_FUNCTION_8BIT: u8 = 0x38;
/// Set DDRAM address, first line
pub const LINE1_ADDR: u8 = 0x80;
/// Set DDRAM address, second line
pub const LINE2_ADDR: u8 = 0xC0;

/// Display width in characters
pub const COLUMNS: u8 = 16;
/// Display height in lines
pub const ROWS: u8 = 2;

const POWER_ON_MS: u32 = 20;
const ENABLE_PULSE_MS: u32 = 1;
const COMMAND_SETTLE_MS: u32 = 2;

/// LCD errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// Row or column outside the display
    InvalidPosition,
}

impl From<LcdError> for DisplayError {
    fn from(e: LcdError) -> Self {
        match e {
            LcdError::InvalidPosition => DisplayError::InvalidPosition,
        }
    }
}

/// Register selected by RS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Command,
    Data,
}

/// Physical connection to the controller
pub trait LcdBus {
    /// Bus width, decides the init sequence
    fn width(&self) -> LcdBusWidth;

    /// Put the low four bits of `nibble` on D4-D7 and strobe EN
    ///
    /// Used during 4-bit initialisation, before the controller accepts
    /// split bytes.
    fn write_nibble<D: DelayMs>(
        &mut self,
        reg: Register,
        nibble: u8,
        delay: &mut D,
    ) -> Result<(), LcdError>;

    /// Transfer a full byte
    fn write_byte<D: DelayMs>(
        &mut self,
        reg: Register,
        byte: u8,
        delay: &mut D,
    ) -> Result<(), LcdError>;
}

fn strobe<EN: OutputPin, D: DelayMs>(en: &mut EN, delay: &mut D) {
    en.set_high();
    delay.delay_ms(ENABLE_PULSE_MS);
    en.set_low();
    delay.delay_ms(ENABLE_PULSE_MS);
}

/// D4-D7 on bits 4-7 of a port
pub struct FourBitBus<RS, EN, P> {
    rs: RS,
    en: EN,
    port: P,
}

impl<RS: OutputPin, EN: OutputPin, P: ParallelPort> FourBitBus<RS, EN, P> {
    pub fn new(rs: RS, mut en: EN, port: P) -> Self {
        en.set_low();
        Self { rs, en, port }
    }

    pub fn release(self) -> (RS, EN, P) {
        (self.rs, self.en, self.port)
    }
}

impl<RS: OutputPin, EN: OutputPin, P: ParallelPort> LcdBus for FourBitBus<RS, EN, P> {
    fn width(&self) -> LcdBusWidth {
        LcdBusWidth::Four
    }

    fn write_nibble<D: DelayMs>(
        &mut self,
        reg: Register,
        nibble: u8,
        delay: &mut D,
    ) -> Result<(), LcdError> {
        self.rs.set_state(reg == Register::Data);
        self.port.modify(0xF0, (nibble & 0x0F) << 4);
        strobe(&mut self.en, delay);
        Ok(())
    }

    fn write_byte<D: DelayMs>(
        &mut self,
        reg: Register,
        byte: u8,
        delay: &mut D,
    ) -> Result<(), LcdError> {
        self.write_nibble(reg, byte >> 4, delay)?;
        self.write_nibble(reg, byte & 0x0F, delay)
    }
}

/// D0-D7 on a whole port
pub struct EightBitBus<RS, EN, P> {
    rs: RS,
    en: EN,
    port: P,
}

impl<RS: OutputPin, EN: OutputPin, P: ParallelPort> EightBitBus<RS, EN, P> {
    pub fn new(rs: RS, mut en: EN, port: P) -> Self {
        en.set_low();
        Self { rs, en, port }
    }

    pub fn release(self) -> (RS, EN, P) {
        (self.rs, self.en, self.port)
    }
}

impl<RS: OutputPin, EN: OutputPin, P: ParallelPort> LcdBus for EightBitBus<RS, EN, P> {
    fn width(&self) -> LcdBusWidth {
        LcdBusWidth::Eight
    }

    fn write_nibble<D: DelayMs>(
        &mut self,
        reg: Register,
        nibble: u8,
        delay: &mut D,
    ) -> Result<(), LcdError> {
        self.write_byte(reg, (nibble & 0x0F) << 4, delay)
    }

    fn write_byte<D: DelayMs>(
        &mut self,
        reg: Register,
        byte: u8,
        delay: &mut D,
    ) -> Result<(), LcdError> {
        self.rs.set_state(reg == Register::Data);
        self.port.write(byte);
        strobe(&mut self.en, delay);
        Ok(())
    }
}

/// HD44780 controller
pub struct Hd44780<B, D> {
    bus: B,
    delay: D,
}

impl<B: LcdBus, D: DelayMs> Hd44780<B, D> {
    /// Power-on wait and initialisation for the bus width
    pub fn new(bus: B, delay: D) -> Result<Self, LcdError> {
        let mut lcd = Self { bus, delay };
        lcd.init()?;
        Ok(lcd)
    }

    fn init(&mut self) -> Result<(), LcdError> {
        self.delay.delay_ms(POWER_ON_MS);

        match self.bus.width() {
            LcdBusWidth::Four => {
                // Force 8-bit mode three times, then switch to 4-bit
                for (nibble, wait_ms) in [(0x3, 5), (0x3, 1), (0x3, 1), (0x2, 1)] {
                    self.bus
                        .write_nibble(Register::Command, nibble, &mut self.delay)?;
                    self.delay.delay_ms(wait_ms);
                }
                self.command(CMD_FUNCTION_4BIT)?;
                self.command(CMD_DISPLAY_OFF)?;
                self.command(CMD_CLEAR)?;
                self.command(CMD_ENTRY_INCREMENT)?;
                self.command(CMD_DISPLAY_ON)?;
            }
            LcdBusWidth::Eight => {
                self.command(CMD_FUNCTION_8BIT)?;
                self.command(CMD_DISPLAY_ON)?;
                self.command(CMD_ENTRY_INCREMENT)?;
                self.command(CMD_CLEAR)?;
            }
        }
        Ok(())
    }

    /// Send an instruction
    pub fn command(&mut self, cmd: u8) -> Result<(), LcdError> {
        self.bus.write_byte(Register::Command, cmd, &mut self.delay)?;
        self.delay.delay_ms(COMMAND_SETTLE_MS);
        Ok(())
    }

    /// Write one character code at the cursor
    pub fn data(&mut self, byte: u8) -> Result<(), LcdError> {
        self.bus.write_byte(Register::Data, byte, &mut self.delay)?;
        self.delay.delay_ms(COMMAND_SETTLE_MS);
        Ok(())
    }

    /// DDRAM address command for a 0-based position
    pub fn address(row: u8, col: u8) -> Result<u8, LcdError> {
        if col >= COLUMNS {
            return Err(LcdError::InvalidPosition);
        }
        match row {
            0 => Ok(LINE1_ADDR + col),
            1 => Ok(LINE2_ADDR + col),
            _ => Err(LcdError::InvalidPosition),
        }
    }

    /// Move the cursor
    pub fn goto(&mut self, row: u8, col: u8) -> Result<(), LcdError> {
        let addr = Self::address(row, col)?;
        self.command(addr)
    }

    /// Write ASCII text at the cursor
    ///
    /// Bytes outside printable ASCII are shown as `?`.
    pub fn print(&mut self, text: &str) -> Result<(), LcdError> {
        for b in text.bytes() {
            let code = if (0x20..0x7F).contains(&b) { b } else { b'?' };
            self.data(code)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), LcdError> {
        self.command(CMD_CLEAR)
    }

    pub fn home(&mut self) -> Result<(), LcdError> {
        self.command(CMD_HOME)
    }

    /// Release the bus and delay
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

impl<B: LcdBus, D: DelayMs> CharacterDisplay for Hd44780<B, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        Hd44780::clear(self).map_err(Into::into)
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        self.goto(row, col).map_err(Into::into)
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        self.print(text).map_err(Into::into)
    }

    fn dimensions(&self) -> (u8, u8) {
        (COLUMNS, ROWS)
    }
}
