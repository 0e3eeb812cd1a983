//! Line assembly from received bytes

use heapless::Vec;

/// Receive buffer size, terminator slot included
pub const BUFFER_SIZE: usize = 32;

/// Result of feeding one byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<const N: usize> {
    /// Byte stored, line not finished
    Pending,
    /// Terminator received; the completed line, without terminator
    Line(Vec<u8, N>),
    /// Buffer was full; the partial line was dropped
    Overflow,
}

/// Accumulates bytes until CR or LF
///
/// At most `N - 1` bytes are kept, matching a C buffer that reserves the
/// last slot for the NUL. Any byte arriving when the buffer is full, a
/// terminator included, throws the partial line away and assembly starts
/// again from empty.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Most bytes a line can hold
    pub const fn capacity() -> usize {
        N.saturating_sub(1)
    }

    pub fn feed(&mut self, byte: u8) -> LineEvent<N> {
        if self.buf.len() >= Self::capacity() {
            self.buf.clear();
            return LineEvent::Overflow;
        }

        if byte == b'\r' || byte == b'\n' {
            let line = core::mem::take(&mut self.buf);
            return LineEvent::Line(line);
        }

        // Capacity checked above
        let _ = self.buf.push(byte);
        LineEvent::Pending
    }

    /// Bytes of the unfinished line
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
