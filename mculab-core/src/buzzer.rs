//! Timer-interrupt buzzer logic
//!
//! A periodic timer tick decides what happens to the buzzer pin. The enable
//! flag and tick counters are shared between the tick handler and the main
//! loop, so they are atomics and every method takes `&self`. Each type is
//! const-constructible and can live in a `static`.
//!
//! ```text
//!  main loop                      tick handler
//!  ─────────                      ────────────
//!  set_enabled(true) ──────────►  on_tick() -> PinAction
//!  delay 2 s                          │
//!  set_enabled(false) ─────────►      ▼
//!  delay 2 s                      buzzer pin
//! ```

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timer1 preload giving roughly 12 ms per overflow at 8 MHz, 1:2 prescale
pub const TIMER1_PRELOAD: u16 = 0xD11B;

/// Timer0 preload for a 1 ms tick at 8 MHz, 1:1 prescale
pub const TIMER0_PRELOAD: u16 = 0xF830;

/// Overflows between buzzer toggles in divider mode
pub const DIVIDER_OVERFLOWS: u32 = 1000;

/// Enable phase length for the gated buzzer, in ms
pub const GATE_PERIOD_MS: u32 = 2000;

/// Ticks between enable flips for the self-gating buzzer (1 ms ticks)
pub const AUTO_GATE_TICKS: u32 = 2000;

/// What the tick handler does with the buzzer pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinAction {
    Toggle,
    ForceLow,
    Hold,
}

/// Buzzer timer variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BuzzerMode {
    /// Toggle every 1000 Timer1 overflows
    Divider,
    /// Main loop gates a toggling buzzer on and off every 2 s
    #[default]
    Gated,
    /// Tick handler gates itself every 2000 ticks
    AutoGated,
}

impl BuzzerMode {
    /// Timer preload for this mode's tick
    pub fn preload(self) -> u16 {
        match self {
            BuzzerMode::Divider | BuzzerMode::Gated => TIMER1_PRELOAD,
            BuzzerMode::AutoGated => TIMER0_PRELOAD,
        }
    }

    /// Timer prescaler for this mode's tick
    pub fn prescaler(self) -> u16 {
        match self {
            BuzzerMode::Divider | BuzzerMode::Gated => 2,
            BuzzerMode::AutoGated => 1,
        }
    }
}

/// Toggles the buzzer once every `overflows` ticks
pub struct Timer1Divider {
    overflows: u32,
    count: AtomicU32,
}

impl Timer1Divider {
    pub const fn new(overflows: u32) -> Self {
        Self {
            overflows,
            count: AtomicU32::new(0),
        }
    }

    /// Timer reload value to write back on every overflow
    pub const fn reload(&self) -> u16 {
        TIMER1_PRELOAD
    }

    pub fn on_tick(&self) -> PinAction {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if count >= self.overflows {
            self.count.store(0, Ordering::Relaxed);
            PinAction::Toggle
        } else {
            PinAction::Hold
        }
    }

    /// Overflows since the last toggle
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for Timer1Divider {
    fn default() -> Self {
        Self::new(DIVIDER_OVERFLOWS)
    }
}

/// Buzzer toggled on every tick while the main loop enables it
pub struct GatedBuzzer {
    enabled: AtomicBool,
    ticks: AtomicU32,
}

impl GatedBuzzer {
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            ticks: AtomicU32::new(0),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn on_tick(&self) -> PinAction {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        if self.is_enabled() {
            PinAction::Toggle
        } else {
            PinAction::ForceLow
        }
    }

    /// Ticks handled so far
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Default for GatedBuzzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Buzzer that gates itself every `period_ticks` ticks
///
/// While disabled the pin is left where it was.
pub struct AutoGatedBuzzer {
    period_ticks: u32,
    enabled: AtomicBool,
    ticks: AtomicU32,
}

impl AutoGatedBuzzer {
    pub const fn new(period_ticks: u32) -> Self {
        Self {
            period_ticks,
            enabled: AtomicBool::new(false),
            ticks: AtomicU32::new(0),
        }
    }

    pub fn on_tick(&self) -> PinAction {
        let action = if self.enabled.load(Ordering::Acquire) {
            PinAction::Toggle
        } else {
            PinAction::Hold
        };

        let ticks = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if ticks >= self.period_ticks {
            self.ticks.store(0, Ordering::Relaxed);
            self.enabled.fetch_xor(true, Ordering::AcqRel);
        }
        action
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Ticks into the current phase
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Default for AutoGatedBuzzer {
    fn default() -> Self {
        Self::new(AUTO_GATE_TICKS)
    }
}
