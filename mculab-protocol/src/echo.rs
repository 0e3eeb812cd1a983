//! Serial echo program
//!
//! Greets the terminal once, then for every byte received: shows it on the
//! port, sends it back, and follows it with a confirmation line.

use mculab_hal::{ParallelPort, UartError, UartTx};

/// Sent once at start-up
pub const GREETING: &str = "\n\r Press any key\n\r";

/// Sent after every echoed byte
pub const CONFIRMATION: &str = "\n\r UART Tested \n\r";

/// Echo program state
pub struct EchoSession<P> {
    port: P,
    echoed: u32,
    discarded: u32,
}

impl<P: ParallelPort> EchoSession<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            echoed: 0,
            discarded: 0,
        }
    }

    pub fn greet<T: UartTx>(&self, tx: &mut T) -> Result<(), UartError> {
        tx.write_str(GREETING)
    }

    /// Handle one received byte
    pub fn on_byte<T: UartTx>(&mut self, byte: u8, tx: &mut T) -> Result<(), UartError> {
        self.port.write(byte);
        tx.write_byte(byte)?;
        tx.write_str(CONFIRMATION)?;
        self.echoed = self.echoed.wrapping_add(1);
        Ok(())
    }

    /// A byte with a framing error is read and dropped
    pub fn on_error(&mut self, _error: UartError) {
        self.discarded = self.discarded.wrapping_add(1);
    }

    /// Last byte shown on the port
    pub fn last_byte(&self) -> u8 {
        self.port.latched()
    }

    pub fn echoed(&self) -> u32 {
        self.echoed
    }

    pub fn discarded(&self) -> u32 {
        self.discarded
    }
}
