//! Clock presets and timing maths
//!
//! Every exercise times itself from the CPU clock: busy-wait loops are
//! calibrated per board, timer preloads are derived from the instruction
//! clock, and the UART baud divisor comes from the oscillator frequency.

use mculab_hal::DelayMs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors from timing calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Requested period needs zero counts or more than a 16-bit timer holds
    PeriodOutOfRange,
    /// Prescaler must be non-zero
    InvalidPrescaler,
    /// Baud rate cannot be reached with an 8-bit divisor
    BaudOutOfRange,
    /// Frequency must be non-zero and reachable
    InvalidFrequency,
}

/// CPU clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Clock {
    /// 11.0592 MHz crystal on the 8051 board (12 clocks per machine cycle)
    #[cfg_attr(feature = "serde", serde(rename = "crystal_11_0592mhz"))]
    Crystal11_0592MHz,
    /// 8 MHz internal oscillator on the PIC18 board (4 clocks per instruction)
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "internal_8mhz"))]
    Internal8MHz,
    /// 48 MHz PLL clock on the PIC18 board
    #[cfg_attr(feature = "serde", serde(rename = "pll_48mhz"))]
    Pll48MHz,
    /// Any other oscillator
    Custom {
        /// Oscillator frequency in Hz
        hz: u32,
        /// Oscillator clocks per instruction cycle
        clocks_per_cycle: u8,
    },
}

impl Clock {
    /// Oscillator frequency in Hz
    pub const fn hz(&self) -> u32 {
        match self {
            Clock::Crystal11_0592MHz => 11_059_200,
            Clock::Internal8MHz => 8_000_000,
            Clock::Pll48MHz => 48_000_000,
            Clock::Custom { hz, .. } => *hz,
        }
    }

    /// Oscillator clocks per instruction (machine) cycle
    pub const fn clocks_per_cycle(&self) -> u8 {
        match self {
            Clock::Crystal11_0592MHz => 12,
            Clock::Internal8MHz | Clock::Pll48MHz => 4,
            Clock::Custom {
                clocks_per_cycle, ..
            } => *clocks_per_cycle,
        }
    }

    /// Instruction clock in Hz (what the timers count)
    pub const fn instruction_hz(&self) -> u32 {
        let cpc = self.clocks_per_cycle();
        if cpc == 0 {
            return self.hz();
        }
        self.hz() / cpc as u32
    }
}

/// Instruction cycles spent per iteration of the empty inner delay loop
/// for clocks without a bench-calibrated constant.
const CYCLES_PER_LOOP_ITERATION: u32 = 10;

/// Inner-loop iterations that make up one millisecond of busy-wait
///
/// The two lab boards carry constants measured on the bench; other clocks
/// are estimated from the instruction rate.
pub const fn busy_wait_iterations_per_ms(clock: Clock) -> u32 {
    match clock {
        Clock::Crystal11_0592MHz => 123,
        Clock::Internal8MHz => 200,
        Clock::Pll48MHz => 1200,
        _ => {
            let per_ms = clock.instruction_hz() / 1000 / CYCLES_PER_LOOP_ITERATION;
            if per_ms == 0 {
                1
            } else {
                per_ms
            }
        }
    }
}

/// Calibrated busy-wait delay
///
/// Spins the calibrated number of iterations, calling `spin` once per
/// iteration. On target `spin` is `core::hint::spin_loop`; tests pass a
/// counter.
pub struct BusyWait<S> {
    iterations_per_ms: u32,
    spin: S,
}

impl<S: FnMut()> BusyWait<S> {
    /// Create a delay calibrated for `clock`
    pub fn new(clock: Clock, spin: S) -> Self {
        Self {
            iterations_per_ms: busy_wait_iterations_per_ms(clock),
            spin,
        }
    }

    /// Iterations spun per millisecond
    pub fn iterations_per_ms(&self) -> u32 {
        self.iterations_per_ms
    }

    fn spin_for(&mut self, iterations: u64) {
        for _ in 0..iterations {
            (self.spin)();
        }
    }
}

impl<S: FnMut()> DelayMs for BusyWait<S> {
    fn delay_ms(&mut self, ms: u32) {
        let iterations = ms as u64 * self.iterations_per_ms as u64;
        self.spin_for(iterations);
    }

    fn delay_us(&mut self, us: u32) {
        let iterations = (us as u64 * self.iterations_per_ms as u64).div_ceil(1000);
        self.spin_for(iterations);
    }
}

/// 16-bit timer preload so the timer overflows after `period_us`
///
/// The timer counts instruction cycles divided by `prescaler` and
/// interrupts on the 0xFFFF -> 0x0000 rollover, so the preload is
/// `65536 - counts`.
pub fn timer_reload(clock: Clock, prescaler: u16, period_us: u32) -> Result<u16, TimingError> {
    if prescaler == 0 {
        return Err(TimingError::InvalidPrescaler);
    }
    let counts =
        clock.instruction_hz() as u64 * period_us as u64 / 1_000_000 / prescaler as u64;
    if counts == 0 || counts > 65_536 {
        return Err(TimingError::PeriodOutOfRange);
    }
    Ok((65_536 - counts) as u16)
}

/// Overflow period in microseconds for a given timer preload
pub fn timer_period_us(clock: Clock, prescaler: u16, reload: u16) -> u32 {
    let counts = 65_536 - reload as u64;
    let hz = clock.instruction_hz().max(1) as u64;
    (counts * prescaler.max(1) as u64 * 1_000_000 / hz) as u32
}

/// Baud-rate generator divisor (PIC18 SPBRG)
///
/// `Fosc / (k * baud) - 1`, rounded to the nearest integer, with k = 16 for
/// the high-speed generator and 64 otherwise.
pub fn uart_divisor(clock: Clock, baud: u32, high_speed: bool) -> Result<u8, TimingError> {
    if baud == 0 {
        return Err(TimingError::BaudOutOfRange);
    }
    let k: u64 = if high_speed { 16 } else { 64 };
    let denom = k * baud as u64;
    let n = (clock.hz() as u64 + denom / 2) / denom;
    if n == 0 || n > 256 {
        return Err(TimingError::BaudOutOfRange);
    }
    Ok((n - 1) as u8)
}

/// Baud rate actually produced by a divisor
pub fn actual_baud(clock: Clock, divisor: u8, high_speed: bool) -> u32 {
    let k: u32 = if high_speed { 16 } else { 64 };
    clock.hz() / (k * (divisor as u32 + 1))
}

/// Baud error in parts per thousand (absolute)
pub fn baud_error_permille(clock: Clock, baud: u32, high_speed: bool) -> Result<u32, TimingError> {
    let divisor = uart_divisor(clock, baud, high_speed)?;
    let actual = actual_baud(clock, divisor, high_speed);
    Ok(actual.abs_diff(baud) * 1000 / baud)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_rates() {
        assert_eq!(Clock::Crystal11_0592MHz.instruction_hz(), 921_600);
        assert_eq!(Clock::Internal8MHz.instruction_hz(), 2_000_000);
        assert_eq!(Clock::Pll48MHz.instruction_hz(), 12_000_000);
    }

    #[test]
    fn test_calibration_constants() {
        assert_eq!(busy_wait_iterations_per_ms(Clock::Crystal11_0592MHz), 123);
        assert_eq!(busy_wait_iterations_per_ms(Clock::Internal8MHz), 200);
        let custom = Clock::Custom {
            hz: 4_000_000,
            clocks_per_cycle: 4,
        };
        assert_eq!(busy_wait_iterations_per_ms(custom), 100);
    }

    #[test]
    fn test_busy_wait_spins_calibrated_count() {
        let mut spins = 0u32;
        {
            let mut delay = BusyWait::new(Clock::Crystal11_0592MHz, || spins += 1);
            delay.delay_ms(500);
        }
        assert_eq!(spins, 500 * 123);

        let mut spins = 0u32;
        {
            let mut delay = BusyWait::new(Clock::Internal8MHz, || spins += 1);
            delay.delay_us(20);
        }
        // 20us * 200 / 1000 = 4
        assert_eq!(spins, 4);
    }

    #[test]
    fn test_timer0_one_millisecond_reload() {
        // 65536 - 2000
        assert_eq!(timer_reload(Clock::Internal8MHz, 1, 1000), Ok(0xF830));
    }

    #[test]
    fn test_timer1_preload_period() {
        // 0xD11B leaves 12005 counts; at 1:2 prescale that is ~12 ms
        assert_eq!(timer_period_us(Clock::Internal8MHz, 2, 0xD11B), 12_005);
        assert_eq!(timer_reload(Clock::Internal8MHz, 2, 12_005), Ok(0xD11B));
    }

    #[test]
    fn test_timer_reload_out_of_range() {
        assert_eq!(
            timer_reload(Clock::Internal8MHz, 1, 100_000),
            Err(TimingError::PeriodOutOfRange)
        );
        assert_eq!(
            timer_reload(Clock::Internal8MHz, 1, 0),
            Err(TimingError::PeriodOutOfRange)
        );
        assert_eq!(
            timer_reload(Clock::Internal8MHz, 0, 1000),
            Err(TimingError::InvalidPrescaler)
        );
    }

    #[test]
    fn test_uart_divisor_9600() {
        assert_eq!(uart_divisor(Clock::Internal8MHz, 9600, false), Ok(12));
        assert_eq!(uart_divisor(Clock::Internal8MHz, 9600, true), Ok(51));
        assert_eq!(uart_divisor(Clock::Pll48MHz, 9600, false), Ok(77));
    }

    #[test]
    fn test_baud_error_is_small_for_lab_settings() {
        let err = baud_error_permille(Clock::Internal8MHz, 9600, true).unwrap();
        assert!(err < 5, "error {} permille", err);
        let err = baud_error_permille(Clock::Internal8MHz, 9600, false).unwrap();
        assert!(err < 20, "error {} permille", err);
    }

    #[test]
    fn test_uart_divisor_out_of_range() {
        assert_eq!(
            uart_divisor(Clock::Internal8MHz, 300, true),
            Err(TimingError::BaudOutOfRange)
        );
        assert_eq!(
            uart_divisor(Clock::Internal8MHz, 0, true),
            Err(TimingError::BaudOutOfRange)
        );
    }
}
