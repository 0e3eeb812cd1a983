//! LED patterns for an 8-LED port
//!
//! Each pattern is an iterator of [`LedStep`]s: the value to latch on the
//! port and how long to hold it. The LED bank driver writes each step and
//! waits; patterns that end (such as [`FixedPattern`]) leave the last value
//! latched.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Every pin of the port
pub const ALL_PINS: u8 = 0xFF;

/// Default on/off time for the blink exercises
pub const BLINK_HOLD_MS: u32 = 500;

/// Default time each count is shown
pub const COUNTER_HOLD_MS: u32 = 1000;

/// Seven-segment codes (gfedcba) for hex digits 0..F
pub const SEVEN_SEGMENT: [u8; 16] = [
    0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, // 0-7
    0x7F, 0x6F, 0x77, 0x7C, 0x39, 0x5E, 0x79, 0x71, // 8-F
];

/// Seven-segment code for a hex digit, `None` above 0xF
pub fn seven_segment(digit: u8) -> Option<u8> {
    SEVEN_SEGMENT.get(digit as usize).copied()
}

/// One latched port value and how long it stays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedStep {
    /// Pin levels to drive
    pub pattern: u8,
    /// Pins this step owns; the rest keep their latched level
    pub mask: u8,
    /// Hold time before the next step
    pub hold_ms: u32,
}

impl LedStep {
    /// A step that drives the whole port
    pub const fn port(pattern: u8, hold_ms: u32) -> Self {
        Self {
            pattern,
            mask: ALL_PINS,
            hold_ms,
        }
    }
}

/// All LEDs on, then all off, forever
#[derive(Debug, Clone)]
pub struct Blink {
    hold_ms: u32,
    lit: bool,
}

impl Blink {
    pub fn new(hold_ms: u32) -> Self {
        Self { hold_ms, lit: false }
    }
}

impl Default for Blink {
    fn default() -> Self {
        Self::new(BLINK_HOLD_MS)
    }
}

impl Iterator for Blink {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        self.lit = !self.lit;
        let pattern = if self.lit { ALL_PINS } else { 0x00 };
        Some(LedStep::port(pattern, self.hold_ms))
    }
}

/// One LED on a single pin, blinking
///
/// The lab wiring sinks the LED into the pin, so "on" drives the pin low.
#[derive(Debug, Clone)]
pub struct SingleBlink {
    mask: u8,
    active_low: bool,
    hold_ms: u32,
    lit: bool,
}

impl SingleBlink {
    /// Blink the LED on `bit` (0-7)
    pub fn new(bit: u8, active_low: bool, hold_ms: u32) -> Self {
        Self {
            mask: 1 << (bit & 0x07),
            active_low,
            hold_ms,
            lit: false,
        }
    }

    /// Step that turns the LED off, written once before blinking starts
    pub fn off_step(&self) -> LedStep {
        self.step(false)
    }

    fn step(&self, lit: bool) -> LedStep {
        let high = lit != self.active_low;
        LedStep {
            pattern: if high { self.mask } else { 0 },
            mask: self.mask,
            hold_ms: self.hold_ms,
        }
    }
}

impl Iterator for SingleBlink {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        self.lit = !self.lit;
        Some(self.step(self.lit))
    }
}

/// 8-bit binary counter, wrapping from 255 to 0
#[derive(Debug, Clone)]
pub struct BinaryCounter {
    count: u8,
    hold_ms: u32,
    flash: bool,
    phase: u8,
}

impl BinaryCounter {
    /// Show each count for `hold_ms`
    pub fn new(hold_ms: u32) -> Self {
        Self {
            count: 0,
            hold_ms,
            flash: false,
            phase: 0,
        }
    }

    /// Show each count for 800 ms, then flash all LEDs on and off (100 ms
    /// each) to mark the transition.
    pub fn with_flash() -> Self {
        Self {
            count: 0,
            hold_ms: 800,
            flash: true,
            phase: 0,
        }
    }

    /// Count that the next step will show
    pub fn count(&self) -> u8 {
        self.count
    }
}

impl Default for BinaryCounter {
    fn default() -> Self {
        Self::new(COUNTER_HOLD_MS)
    }
}

impl Iterator for BinaryCounter {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        if !self.flash {
            let step = LedStep::port(self.count, self.hold_ms);
            self.count = self.count.wrapping_add(1);
            return Some(step);
        }

        let step = match self.phase {
            0 => LedStep::port(self.count, self.hold_ms),
            1 => LedStep::port(ALL_PINS, 100),
            _ => {
                self.count = self.count.wrapping_add(1);
                LedStep::port(0x00, 100)
            }
        };
        self.phase = (self.phase + 1) % 3;
        Some(step)
    }
}

/// A constant pattern, written once
#[derive(Debug, Clone)]
pub struct FixedPattern {
    pattern: Option<u8>,
}

impl FixedPattern {
    pub fn new(pattern: u8) -> Self {
        Self {
            pattern: Some(pattern),
        }
    }
}

impl Iterator for FixedPattern {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        self.pattern.take().map(|p| LedStep::port(p, 0))
    }
}

/// Hex digits 0..F in seven-segment form, then a completion flash
///
/// One cycle is 16 digits at 1 s each, three 200 ms all-on/all-off
/// flashes, and an 800 ms dark pause.
#[derive(Debug, Clone, Default)]
pub struct HexDigits {
    index: u8,
}

impl HexDigits {
    const FLASHES: u8 = 3;
    const CYCLE_LEN: u8 = 16 + 2 * Self::FLASHES + 1;

    pub fn new() -> Self {
        Self { index: 0 }
    }
}

impl Iterator for HexDigits {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        let i = self.index;
        self.index = (self.index + 1) % Self::CYCLE_LEN;

        let step = match i {
            0..=15 => LedStep::port(SEVEN_SEGMENT[i as usize], 1000),
            16..=21 => {
                let pattern = if (i - 16) % 2 == 0 { ALL_PINS } else { 0x00 };
                LedStep::port(pattern, 200)
            }
            _ => LedStep::port(0x00, 800),
        };
        Some(step)
    }
}

/// Chase direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChaseDirection {
    /// Bit 0 towards bit 7
    Left,
    /// Bit 7 towards bit 0
    Right,
}

impl ChaseDirection {
    /// Rotate a pattern one position in this direction
    pub fn rotate(self, pattern: u8) -> u8 {
        match self {
            ChaseDirection::Left => pattern.rotate_left(1),
            ChaseDirection::Right => pattern.rotate_right(1),
        }
    }
}

/// A single lit LED making one pass across the port
#[derive(Debug, Clone)]
pub struct Chase {
    direction: ChaseDirection,
    hold_ms: u32,
    position: u8,
    remaining: u8,
}

impl Chase {
    /// One pass across all eight LEDs
    pub fn sweep(direction: ChaseDirection, hold_ms: u32) -> Self {
        let position = match direction {
            ChaseDirection::Left => 0,
            ChaseDirection::Right => 7,
        };
        Self {
            direction,
            hold_ms,
            position,
            remaining: 8,
        }
    }
}

impl Iterator for Chase {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let step = LedStep::port(1 << self.position, self.hold_ms);
        self.position = match self.direction {
            ChaseDirection::Left => (self.position + 1) % 8,
            ChaseDirection::Right => (self.position + 7) % 8,
        };
        Some(step)
    }
}

/// The 8051 pattern show, repeated forever
///
/// Five all-on/all-off blinks, five 0x55/0xAA alternations (500 ms per
/// step), then two left chases at 200 ms per LED.
#[derive(Debug, Clone, Default)]
pub struct PatternShow {
    index: u8,
}

impl PatternShow {
    const REPEATS: u8 = 5;
    const CHASES: u8 = 2;
    const CHASE_MS: u32 = 200;
    const BLINK_END: u8 = 2 * Self::REPEATS;
    const ALTERNATE_END: u8 = Self::BLINK_END + 2 * Self::REPEATS;
    const CYCLE_LEN: u8 = Self::ALTERNATE_END + 8 * Self::CHASES;

    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Total hold time of one full show, in ms
    pub const fn cycle_ms() -> u32 {
        Self::ALTERNATE_END as u32 * BLINK_HOLD_MS + 8 * Self::CHASES as u32 * Self::CHASE_MS
    }
}

impl Iterator for PatternShow {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        let i = self.index;
        self.index = (self.index + 1) % Self::CYCLE_LEN;

        let step = if i < Self::BLINK_END {
            let pattern = if i % 2 == 0 { ALL_PINS } else { 0x00 };
            LedStep::port(pattern, BLINK_HOLD_MS)
        } else if i < Self::ALTERNATE_END {
            let pattern = if i % 2 == 0 { 0x55 } else { 0xAA };
            LedStep::port(pattern, BLINK_HOLD_MS)
        } else {
            LedStep::port(1 << ((i - Self::ALTERNATE_END) % 8), Self::CHASE_MS)
        };
        Some(step)
    }
}

/// Any LED exercise pattern, chosen at runtime
#[derive(Debug, Clone)]
pub enum LedProgram {
    Blink(Blink),
    SingleBlink(SingleBlink),
    Counter(BinaryCounter),
    Fixed(FixedPattern),
    HexDigits(HexDigits),
    PatternShow(PatternShow),
}

impl Iterator for LedProgram {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        match self {
            LedProgram::Blink(p) => p.next(),
            LedProgram::SingleBlink(p) => p.next(),
            LedProgram::Counter(p) => p.next(),
            LedProgram::Fixed(p) => p.next(),
            LedProgram::HexDigits(p) => p.next(),
            LedProgram::PatternShow(p) => p.next(),
        }
    }
}
