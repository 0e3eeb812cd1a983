//! Host mocks shared by the driver tests

use mculab_hal::{DelayMs, InputPin, OutputPin, ParallelPort};

/// Port latch that records every write
#[derive(Default)]
pub struct MockPort {
    pub value: u8,
    pub writes: Vec<u8>,
}

impl ParallelPort for MockPort {
    fn write(&mut self, value: u8) {
        self.value = value;
        self.writes.push(value);
    }

    fn latched(&self) -> u8 {
        self.value
    }
}

/// Output pin that counts rising edges
#[derive(Default)]
pub struct MockPin {
    pub high: bool,
    pub rising_edges: u32,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input pin fed from a script of levels; the last level repeats
pub struct MockInput {
    levels: Vec<bool>,
    reads: core::cell::Cell<usize>,
}

impl MockInput {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.to_vec(),
            reads: core::cell::Cell::new(0),
        }
    }
}

impl InputPin for MockInput {
    fn is_high(&self) -> bool {
        let i = self.reads.get();
        self.reads.set(i + 1);
        let last = self.levels.len().saturating_sub(1);
        self.levels.get(i.min(last)).copied().unwrap_or(true)
    }
}

/// Delay that only adds up the requested time
#[derive(Default)]
pub struct MockDelay {
    pub total_us: u64,
    pub calls: Vec<u32>,
}

impl DelayMs for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_us += ms as u64 * 1000;
        self.calls.push(ms * 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_us += us as u64;
        self.calls.push(us);
    }
}
