//! Console commands

use heapless::String;

use crate::line::BUFFER_SIZE;

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    LedOn,
    LedOff,
    Status,
    /// Anything else, kept for the error reply
    Unknown(String<BUFFER_SIZE>),
}

impl Command {
    /// Match a line exactly; commands are case-sensitive and untrimmed
    pub fn parse(line: &[u8]) -> Self {
        match line {
            b"LED_ON" => Command::LedOn,
            b"LED_OFF" => Command::LedOff,
            b"STATUS" => Command::Status,
            other => Command::Unknown(printable(other)),
        }
    }

    /// Name as typed
    pub fn as_str(&self) -> &str {
        match self {
            Command::LedOn => "LED_ON",
            Command::LedOff => "LED_OFF",
            Command::Status => "STATUS",
            Command::Unknown(text) => text.as_str(),
        }
    }
}

/// Copy a line for display, replacing bytes outside printable ASCII
fn printable(bytes: &[u8]) -> String<BUFFER_SIZE> {
    let mut text = String::new();
    for &b in bytes {
        let c = if (0x20..0x7F).contains(&b) { b as char } else { '?' };
        if text.push(c).is_err() {
            break;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_commands() {
        assert_eq!(Command::parse(b"LED_ON"), Command::LedOn);
        assert_eq!(Command::parse(b"LED_OFF"), Command::LedOff);
        assert_eq!(Command::parse(b"STATUS"), Command::Status);
    }

    #[test]
    fn test_exact_match_only() {
        assert!(matches!(Command::parse(b"led_on"), Command::Unknown(_)));
        assert!(matches!(Command::parse(b"LED_ON "), Command::Unknown(_)));
        assert!(matches!(Command::parse(b" STATUS"), Command::Unknown(_)));
    }

    #[test]
    fn test_unknown_keeps_text() {
        let cmd = Command::parse(b"HELLO");
        assert_eq!(cmd.as_str(), "HELLO");
    }

    #[test]
    fn test_unknown_masks_control_bytes() {
        let cmd = Command::parse(&[b'A', 0x1B, b'B', 0xC3]);
        assert_eq!(cmd.as_str(), "A?B?");
    }
}
