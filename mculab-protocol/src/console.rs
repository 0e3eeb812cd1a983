//! Three-command LED console
//!
//! The receive side (an interrupt handler or RX task) calls
//! [`Console::feed`] for every byte and echoes it straight back; completed
//! lines are handed to the main loop, which runs them with
//! [`Console::execute`] and writes the reply.

use core::fmt::Write;

use heapless::String;
use mculab_hal::{OutputPin, UartError, UartTx};

use crate::command::Command;
use crate::line::{LineBuffer, LineEvent, BUFFER_SIZE};

/// Prompt written after the banner and after every reply
pub const PROMPT: &str = "\r\nEnter command: ";

/// Longest reply text
pub const MAX_RESPONSE_LEN: usize = 96;

/// Maximum device name length
pub const MAX_DEVICE_NAME_LEN: usize = 16;

const RULE: &str = "=============================\r\n";

/// Reply text for one command
pub type Response = String<MAX_RESPONSE_LEN>;

/// What feeding one byte produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Byte to echo back, always the byte received
    pub echo: u8,
    /// Command completed by this byte
    pub command: Option<Command>,
}

/// How the receiver should react to a line error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorAction {
    /// Drop the bad byte and carry on
    Discard,
    /// Restart the receiver to clear the overrun
    ResetReceiver,
}

/// Receive-side counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleStats {
    pub bytes: u32,
    pub lines: u32,
    /// Lines dropped because they outgrew the buffer
    pub overflows: u32,
    pub framing_errors: u32,
    pub overruns: u32,
    pub unknown_commands: u32,
}

/// Console state
pub struct Console {
    line: LineBuffer<BUFFER_SIZE>,
    device: String<MAX_DEVICE_NAME_LEN>,
    stats: ConsoleStats,
}

impl Console {
    /// Console reporting `device` in STATUS replies
    pub fn new(device: &str) -> Self {
        let mut name = String::new();
        for c in device.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        Self {
            line: LineBuffer::new(),
            device: name,
            stats: ConsoleStats::default(),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn stats(&self) -> ConsoleStats {
        self.stats
    }

    /// Write the start-up banner followed by the first prompt
    pub fn write_banner<T: UartTx>(&self, tx: &mut T) -> Result<(), UartError> {
        tx.write_str("\r\n")?;
        tx.write_str(RULE)?;
        tx.write_str(&self.device)?;
        tx.write_str(" UART Ready\r\n")?;
        tx.write_str("Microcontroller Lab Experiment\r\n")?;
        tx.write_str(RULE)?;
        tx.write_str("Commands:\r\n")?;
        tx.write_str("  LED_ON  - Turn on LED\r\n")?;
        tx.write_str("  LED_OFF - Turn off LED\r\n")?;
        tx.write_str("  STATUS  - Check system status\r\n")?;
        tx.write_str(RULE)?;
        tx.write_str("\r\nEnter command: ")
    }

    /// Take one received byte
    ///
    /// Empty lines (such as the LF of a CR LF pair) complete no command.
    pub fn feed(&mut self, byte: u8) -> Feed {
        self.stats.bytes = self.stats.bytes.wrapping_add(1);

        let command = match self.line.feed(byte) {
            LineEvent::Pending => None,
            LineEvent::Overflow => {
                self.stats.overflows += 1;
                None
            }
            LineEvent::Line(line) if line.is_empty() => None,
            LineEvent::Line(line) => {
                self.stats.lines += 1;
                Some(Command::parse(&line))
            }
        };

        Feed {
            echo: byte,
            command,
        }
    }

    /// React to a receive error
    pub fn on_error(&mut self, error: UartError) -> ErrorAction {
        match error {
            UartError::Overrun => {
                self.stats.overruns += 1;
                ErrorAction::ResetReceiver
            }
            UartError::Framing => {
                self.stats.framing_errors += 1;
                ErrorAction::Discard
            }
            _ => ErrorAction::Discard,
        }
    }

    /// Run a command against the status LED and build the reply
    pub fn execute<L: OutputPin>(&mut self, command: &Command, led: &mut L) -> Response {
        let mut reply = Response::new();
        // Replies are bounded: fixed text plus a 16-byte name or 31-byte line
        let _ = match command {
            Command::LedOn => {
                led.set_high();
                reply.push_str("LED turned ON\r\n")
            }
            Command::LedOff => {
                led.set_low();
                reply.push_str("LED turned OFF\r\n")
            }
            Command::Status => {
                let state = if led.is_set_high() { "ON" } else { "OFF" };
                write!(
                    reply,
                    "System: OK\r\nDevice: {}\r\nLED: {}\r\n",
                    self.device, state
                )
                .map_err(|_| ())
            }
            Command::Unknown(text) => {
                self.stats.unknown_commands += 1;
                write!(reply, "Unknown command: {}\r\n", text).map_err(|_| ())
            }
        };
        reply
    }

    /// Execute a command and send the reply and the next prompt
    pub fn reply<L: OutputPin, T: UartTx>(
        &mut self,
        command: &Command,
        led: &mut L,
        tx: &mut T,
    ) -> Result<(), UartError> {
        let response = self.execute(command, led);
        tx.write_str("\r\n")?;
        tx.write_str(&response)?;
        tx.write_str(PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Led(bool);

    impl OutputPin for Led {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct Terminal(Vec<u8>);

    impl UartTx for Terminal {
        fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartError> {
            self.0.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), UartError> {
            Ok(())
        }
    }

    impl Terminal {
        fn text(&self) -> &str {
            core::str::from_utf8(&self.0).unwrap()
        }
    }

    fn type_line(console: &mut Console, text: &[u8]) -> Option<Command> {
        let mut cmd = None;
        for &b in text {
            let feed = console.feed(b);
            assert_eq!(feed.echo, b);
            if feed.command.is_some() {
                cmd = feed.command;
            }
        }
        cmd
    }

    #[test]
    fn test_led_on_off() {
        let mut console = Console::new("RP2040");
        let mut led = Led::default();

        let cmd = type_line(&mut console, b"LED_ON\r").unwrap();
        assert_eq!(console.execute(&cmd, &mut led).as_str(), "LED turned ON\r\n");
        assert!(led.0);

        let cmd = type_line(&mut console, b"LED_OFF\r").unwrap();
        assert_eq!(console.execute(&cmd, &mut led).as_str(), "LED turned OFF\r\n");
        assert!(!led.0);
    }

    #[test]
    fn test_status_reports_device_and_led() {
        let mut console = Console::new("PIC18F4550");
        let mut led = Led(true);
        let reply = console.execute(&Command::Status, &mut led);
        assert_eq!(
            reply.as_str(),
            "System: OK\r\nDevice: PIC18F4550\r\nLED: ON\r\n"
        );
        assert!(led.0);
    }

    #[test]
    fn test_unknown_command_reply() {
        let mut console = Console::new("RP2040");
        let mut led = Led::default();
        let cmd = type_line(&mut console, b"BLINK\n").unwrap();
        assert_eq!(
            console.execute(&cmd, &mut led).as_str(),
            "Unknown command: BLINK\r\n"
        );
        assert_eq!(console.stats().unknown_commands, 1);
    }

    #[test]
    fn test_crlf_runs_one_command() {
        let mut console = Console::new("RP2040");
        let first = console.feed(b'S');
        assert!(first.command.is_none());
        assert!(type_line(&mut console, b"TATUS\r").is_some());
        assert!(console.feed(b'\n').command.is_none());
        assert_eq!(console.stats().lines, 1);
    }

    #[test]
    fn test_full_line_is_dropped_at_terminator() {
        let mut console = Console::new("RP2040");
        let mut line = [b'A'; BUFFER_SIZE];
        line[BUFFER_SIZE - 1] = b'\r';
        assert!(type_line(&mut console, &line).is_none());
        assert_eq!(console.stats().overflows, 1);
        assert_eq!(console.stats().lines, 0);
    }

    #[test]
    fn test_overflow_counted() {
        let mut console = Console::new("RP2040");
        let long = [b'A'; BUFFER_SIZE];
        assert!(type_line(&mut console, &long).is_none());
        assert_eq!(console.stats().overflows, 1);
        // A fresh line still works afterwards
        assert_eq!(type_line(&mut console, b"STATUS\r"), Some(Command::Status));
    }

    #[test]
    fn test_line_errors() {
        let mut console = Console::new("RP2040");
        assert_eq!(console.on_error(UartError::Framing), ErrorAction::Discard);
        assert_eq!(console.on_error(UartError::Overrun), ErrorAction::ResetReceiver);
        assert_eq!(console.on_error(UartError::Parity), ErrorAction::Discard);
        let stats = console.stats();
        assert_eq!(stats.framing_errors, 1);
        assert_eq!(stats.overruns, 1);
    }

    #[test]
    fn test_banner_and_reply_framing() {
        let mut console = Console::new("RP2040");
        let mut term = Terminal::default();
        console.write_banner(&mut term).unwrap();
        assert!(term.text().contains("RP2040 UART Ready\r\n"));
        assert!(term.text().ends_with("\r\nEnter command: "));

        let mut term = Terminal::default();
        let mut led = Led::default();
        console.reply(&Command::LedOn, &mut led, &mut term).unwrap();
        assert_eq!(term.text(), "\r\nLED turned ON\r\n\r\nEnter command: ");
    }

    #[test]
    fn test_long_device_name_truncated() {
        let console = Console::new("A-VERY-LONG-DEVICE-NAME");
        assert_eq!(console.device().len(), MAX_DEVICE_NAME_LEN);
    }

    proptest! {
        #[test]
        fn every_byte_is_echoed(bytes in proptest::collection::vec(any::<u8>(), 0..300)) {
            let mut console = Console::new("RP2040");
            for b in bytes {
                prop_assert_eq!(console.feed(b).echo, b);
            }
        }

        #[test]
        fn unknown_reply_always_fits(line in "[ -~]{1,31}") {
            let mut console = Console::new("ABCDEFGHIJKLMNOP");
            let mut led = Led::default();
            let cmd = Command::parse(line.as_bytes());
            let reply = console.execute(&cmd, &mut led);
            prop_assert!(reply.ends_with("\r\n"));
        }
    }
}
