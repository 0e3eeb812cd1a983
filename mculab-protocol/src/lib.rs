//! UART console protocol
//!
//! Two serial programs run over a 9600 8-N-1 link to a terminal:
//!
//! - The **echo** program greets, then echoes each received byte followed
//!   by a confirmation line and mirrors the byte on an 8-bit port.
//! - The **console** echoes every byte as it is typed, assembles lines and
//!   runs three commands:
//!
//! ```text
//! Enter command: LED_ON⏎
//! LED turned ON
//!
//! Enter command: STATUS⏎
//! System: OK
//! Device: RP2040
//! LED: ON
//! ```
//!
//! Lines end at CR or LF. Bytes past the line buffer discard the line.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod console;
pub mod echo;
pub mod line;

pub use command::Command;
pub use console::{Console, ConsoleStats, ErrorAction, Feed, Response, PROMPT};
pub use echo::{EchoSession, CONFIRMATION, GREETING};
pub use line::{LineBuffer, LineEvent, BUFFER_SIZE};
