//! DAC waveform generators
//!
//! Each generator yields [`Sample`]s for an 8-bit DAC: the code to latch on
//! the data port and how long to hold it before the next one. Generators are
//! endless; the DAC driver decides how many samples to play.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::timing::TimingError;

/// Highest DAC code
pub const FULL_SCALE: u8 = 0xFF;

/// One DAC code and its hold time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub code: u8,
    pub hold_us: u32,
}

impl Sample {
    pub const fn new(code: u8, hold_us: u32) -> Self {
        Self { code, hold_us }
    }
}

/// Square wave alternating between full scale and zero
#[derive(Debug, Clone)]
pub struct Square {
    half_period_us: u32,
    high: bool,
}

impl Square {
    /// Half period used by the lab board (1 kHz)
    pub const DEFAULT_HALF_PERIOD_US: u32 = 500;

    pub fn new(half_period_us: u32) -> Self {
        Self {
            half_period_us,
            high: false,
        }
    }

    /// Square wave of the given frequency
    pub fn from_frequency(hz: u32) -> Result<Self, TimingError> {
        if hz == 0 || hz > 500_000 {
            return Err(TimingError::InvalidFrequency);
        }
        Ok(Self::new(500_000 / hz))
    }

    pub fn half_period_us(&self) -> u32 {
        self.half_period_us
    }

    /// Full period in microseconds, saturating
    pub fn period_us(&self) -> u32 {
        self.half_period_us.saturating_mul(2)
    }
}

impl Default for Square {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HALF_PERIOD_US)
    }
}

impl Iterator for Square {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.high = !self.high;
        let code = if self.high { FULL_SCALE } else { 0x00 };
        Some(Sample::new(code, self.half_period_us))
    }
}

/// Rising ramp with a hard reset to zero
///
/// Codes 0 through 254 are held for one step each, the ramp tops out at
/// 0xFF for one more step, then the output drops to 0x00 and rests for the
/// reset pause before the next ramp.
#[derive(Debug, Clone)]
pub struct Sawtooth {
    step_us: u32,
    reset_us: u32,
    index: u16,
}

impl Sawtooth {
    pub const DEFAULT_STEP_US: u32 = 4;
    pub const DEFAULT_RESET_US: u32 = 10;

    // 0..=254, the 0xFF top and the reset sample
    const CYCLE_LEN: u16 = 257;

    pub fn new(step_us: u32, reset_us: u32) -> Self {
        Self {
            step_us,
            reset_us,
            index: 0,
        }
    }

    /// Sawtooth whose ramp spans one period of `hz`
    pub fn from_frequency(hz: u32) -> Result<Self, TimingError> {
        if hz == 0 {
            return Err(TimingError::InvalidFrequency);
        }
        let step_us = 1_000_000 / hz / 256;
        if step_us == 0 {
            return Err(TimingError::InvalidFrequency);
        }
        Ok(Self::new(step_us, Self::DEFAULT_RESET_US))
    }

    pub fn step_us(&self) -> u32 {
        self.step_us
    }

    /// Ramp plus reset pause in microseconds
    pub fn period_us(&self) -> u32 {
        self.step_us.saturating_mul(256).saturating_add(self.reset_us)
    }
}

impl Default for Sawtooth {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_US, Self::DEFAULT_RESET_US)
    }
}

impl Iterator for Sawtooth {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let i = self.index;
        self.index = (self.index + 1) % Self::CYCLE_LEN;

        let sample = match i {
            0..=255 => Sample::new(i as u8, self.step_us),
            _ => Sample::new(0x00, self.reset_us),
        };
        Some(sample)
    }
}

/// Symmetric ramp up to full scale and back down
///
/// The peaks are not repeated: 0, 1, .., 255, 254, .., 1, then 0 again,
/// 510 samples per period.
#[derive(Debug, Clone)]
pub struct Triangular {
    step_us: u32,
    index: u16,
}

impl Triangular {
    pub const DEFAULT_STEP_US: u32 = 1;
    pub const STEPS_PER_PERIOD: u32 = 510;

    pub fn new(step_us: u32) -> Self {
        Self { step_us, index: 0 }
    }

    /// Triangle wave of the given frequency
    pub fn from_frequency(hz: u32) -> Result<Self, TimingError> {
        if hz == 0 {
            return Err(TimingError::InvalidFrequency);
        }
        let step_us = 1_000_000 / hz / Self::STEPS_PER_PERIOD;
        if step_us == 0 {
            return Err(TimingError::InvalidFrequency);
        }
        Ok(Self::new(step_us))
    }

    pub fn period_us(&self) -> u32 {
        self.step_us.saturating_mul(Self::STEPS_PER_PERIOD)
    }
}

impl Default for Triangular {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_US)
    }
}

impl Iterator for Triangular {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let i = self.index;
        self.index = (self.index + 1) % Self::STEPS_PER_PERIOD as u16;

        let code = if i <= 255 { i as u8 } else { (510 - i) as u8 };
        Some(Sample::new(code, self.step_us))
    }
}

/// Waveform shape selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaveformKind {
    #[default]
    Square,
    Sawtooth,
    Triangular,
}

/// Any of the three generators
#[derive(Debug, Clone)]
pub enum Waveform {
    Square(Square),
    Sawtooth(Sawtooth),
    Triangular(Triangular),
}

impl Waveform {
    /// Default generator for a shape, at the lab board's timing
    pub fn new(kind: WaveformKind) -> Self {
        match kind {
            WaveformKind::Square => Waveform::Square(Square::default()),
            WaveformKind::Sawtooth => Waveform::Sawtooth(Sawtooth::default()),
            WaveformKind::Triangular => Waveform::Triangular(Triangular::default()),
        }
    }

    /// Generator for a shape at a target frequency
    pub fn with_frequency(kind: WaveformKind, hz: u32) -> Result<Self, TimingError> {
        Ok(match kind {
            WaveformKind::Square => Waveform::Square(Square::from_frequency(hz)?),
            WaveformKind::Sawtooth => Waveform::Sawtooth(Sawtooth::from_frequency(hz)?),
            WaveformKind::Triangular => Waveform::Triangular(Triangular::from_frequency(hz)?),
        })
    }

    pub fn kind(&self) -> WaveformKind {
        match self {
            Waveform::Square(_) => WaveformKind::Square,
            Waveform::Sawtooth(_) => WaveformKind::Sawtooth,
            Waveform::Triangular(_) => WaveformKind::Triangular,
        }
    }

    pub fn period_us(&self) -> u32 {
        match self {
            Waveform::Square(w) => w.period_us(),
            Waveform::Sawtooth(w) => w.period_us(),
            Waveform::Triangular(w) => w.period_us(),
        }
    }

    /// Samples in one period
    pub fn samples_per_period(&self) -> usize {
        match self {
            Waveform::Square(_) => 2,
            Waveform::Sawtooth(_) => Sawtooth::CYCLE_LEN as usize,
            Waveform::Triangular(_) => Triangular::STEPS_PER_PERIOD as usize,
        }
    }
}

impl Iterator for Waveform {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        match self {
            Waveform::Square(w) => w.next(),
            Waveform::Sawtooth(w) => w.next(),
            Waveform::Triangular(w) => w.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_square_equal_halves() {
        let mut sq = Square::default();
        let high = sq.next().unwrap();
        let low = sq.next().unwrap();
        assert_eq!(high, Sample::new(0xFF, 500));
        assert_eq!(low, Sample::new(0x00, 500));
        assert_eq!(sq.period_us(), 1000);
    }

    #[test]
    fn test_square_from_frequency() {
        let sq = Square::from_frequency(100).unwrap();
        assert_eq!(sq.half_period_us(), 5000);
        assert_eq!(Square::from_frequency(0).err(), Some(TimingError::InvalidFrequency));
    }

    #[test]
    fn test_sawtooth_ramp_and_reset() {
        let samples: Vec<Sample> = Sawtooth::default().take(258).collect();
        for (i, s) in samples[..255].iter().enumerate() {
            assert_eq!(s.code as usize, i);
            assert_eq!(s.hold_us, 4);
        }
        assert_eq!(samples[255], Sample::new(0xFF, 4));
        assert_eq!(samples[256], Sample::new(0x00, 10));
        // Next ramp starts from 0
        assert_eq!(samples[257].code, 0);
    }

    #[test]
    fn test_sawtooth_from_frequency() {
        let saw = Sawtooth::from_frequency(100).unwrap();
        assert_eq!(saw.step_us(), 39);
        assert!(Sawtooth::from_frequency(10_000).is_err());
    }

    #[test]
    fn test_triangular_peaks_not_repeated() {
        let samples: Vec<u8> = Triangular::default().take(511).map(|s| s.code).collect();
        assert_eq!(samples[0], 0);
        assert_eq!(samples[255], 255);
        assert_eq!(samples[256], 254);
        assert_eq!(samples[509], 1);
        assert_eq!(samples[510], 0);
        assert_eq!(samples.iter().filter(|&&c| c == 255).count(), 1);
    }

    #[test]
    fn test_waveform_dispatch() {
        let wave = Waveform::new(WaveformKind::Triangular);
        assert_eq!(wave.kind(), WaveformKind::Triangular);
        assert_eq!(wave.period_us(), 510);
        assert_eq!(wave.samples_per_period(), 510);

        let wave = Waveform::with_frequency(WaveformKind::Square, 1000).unwrap();
        assert_eq!(wave.period_us(), 1000);
    }

    #[test]
    fn test_long_periods_saturate() {
        assert_eq!(Square::new(u32::MAX).period_us(), u32::MAX);
        assert_eq!(Sawtooth::new(u32::MAX / 2, 10).period_us(), u32::MAX);
        assert_eq!(Sawtooth::new(1000, u32::MAX).period_us(), u32::MAX);
        assert_eq!(Triangular::new(u32::MAX).period_us(), u32::MAX);
    }

    proptest! {
        #[test]
        fn square_halves_always_match(hz in 1u32..=500_000) {
            let sq = Square::from_frequency(hz).unwrap();
            let samples: Vec<Sample> = sq.take(4).collect();
            prop_assert_eq!(samples[0].hold_us, samples[1].hold_us);
            prop_assert_eq!(samples[0].code, 0xFF);
            prop_assert_eq!(samples[1].code, 0x00);
        }

        #[test]
        fn generator_hold_times_sum_to_period(kind in 0u8..3) {
            let kind = match kind {
                0 => WaveformKind::Square,
                1 => WaveformKind::Sawtooth,
                _ => WaveformKind::Triangular,
            };
            let wave = Waveform::new(kind);
            let n = wave.samples_per_period();
            let period = wave.period_us();
            let total: u32 = wave.take(n).map(|s| s.hold_us).sum();
            prop_assert_eq!(total, period);
        }

        #[test]
        fn triangle_moves_one_code_per_step(n in 0usize..2000) {
            let mut tri = Triangular::default().skip(n);
            let a = tri.next().unwrap().code as i16;
            let b = tri.next().unwrap().code as i16;
            prop_assert_eq!((a - b).abs(), 1);
        }
    }
}
