//! Push-button control of a relay, a buzzer and an LED chase
//!
//! Two active-low buttons are polled every loop iteration. Button 1 wins
//! when both are held. A press only takes effect if it is still held after
//! the debounce delay; otherwise the iteration is skipped and the buttons
//! are polled again.

use crate::led::{Chase, ChaseDirection, LedStep};

/// Debounce delay between the first sample and the confirming one
pub const DEBOUNCE_MS: u32 = 20;

/// Chase step while a button is held
pub const FAST_CHASE_MS: u32 = 100;

/// Chase step with no button held
pub const SLOW_CHASE_MS: u32 = 200;

/// Idle step for the rotating variant
pub const ROTATE_IDLE_MS: u32 = 500;

/// Which input drives this iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    Button1,
    Button2,
    Idle,
}

/// Outputs for one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decision {
    pub selection: Selection,
    pub relay_on: bool,
    pub buzzer_on: bool,
    pub direction: ChaseDirection,
    pub step_ms: u32,
}

impl Decision {
    /// True when the selection came from a button and must be debounced
    pub fn needs_debounce(&self) -> bool {
        self.selection != Selection::Idle
    }
}

/// How the LEDs follow the decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChaseMode {
    /// Every iteration runs a full 8-step sweep
    Sweep,
    /// One lit pattern rotates one position per iteration
    Rotate,
}

/// Button polling state machine
#[derive(Debug, Clone)]
pub struct ButtonController {
    mode: ChaseMode,
    pattern: u8,
}

impl ButtonController {
    /// Full sweeps per iteration, 200 ms idle steps
    pub fn sweep() -> Self {
        Self {
            mode: ChaseMode::Sweep,
            pattern: 0x01,
        }
    }

    /// Single rotation per iteration, 500 ms idle steps
    pub fn rotating() -> Self {
        Self {
            mode: ChaseMode::Rotate,
            pattern: 0x01,
        }
    }

    pub fn mode(&self) -> ChaseMode {
        self.mode
    }

    /// Decide the outputs from the raw "pressed" levels
    pub fn decide(&self, btn1_pressed: bool, btn2_pressed: bool) -> Decision {
        let idle_ms = match self.mode {
            ChaseMode::Sweep => SLOW_CHASE_MS,
            ChaseMode::Rotate => ROTATE_IDLE_MS,
        };

        if btn1_pressed {
            Decision {
                selection: Selection::Button1,
                relay_on: true,
                buzzer_on: true,
                direction: ChaseDirection::Left,
                step_ms: FAST_CHASE_MS,
            }
        } else if btn2_pressed {
            Decision {
                selection: Selection::Button2,
                relay_on: false,
                buzzer_on: false,
                direction: ChaseDirection::Right,
                step_ms: FAST_CHASE_MS,
            }
        } else {
            Decision {
                selection: Selection::Idle,
                relay_on: false,
                buzzer_on: false,
                direction: ChaseDirection::Left,
                step_ms: idle_ms,
            }
        }
    }

    /// Whether a decision survives the debounce re-sample
    ///
    /// Only the button that made the decision is looked at again.
    pub fn confirm(&self, decision: &Decision, btn1_pressed: bool, btn2_pressed: bool) -> bool {
        match decision.selection {
            Selection::Button1 => btn1_pressed,
            Selection::Button2 => btn2_pressed,
            Selection::Idle => true,
        }
    }

    /// LED steps for an accepted decision
    pub fn chase(&mut self, decision: &Decision) -> ChaseRun {
        match self.mode {
            ChaseMode::Sweep => ChaseRun::Sweep(Chase::sweep(decision.direction, decision.step_ms)),
            ChaseMode::Rotate => ChaseRun::Single(Some(self.next_rotate(decision))),
        }
    }

    /// Show the current pattern and rotate it for the next iteration
    pub fn next_rotate(&mut self, decision: &Decision) -> LedStep {
        let step = LedStep::port(self.pattern, decision.step_ms);
        self.pattern = decision.direction.rotate(self.pattern);
        step
    }
}

/// LED steps produced by one accepted decision
#[derive(Debug, Clone)]
pub enum ChaseRun {
    Sweep(Chase),
    Single(Option<LedStep>),
}

impl Iterator for ChaseRun {
    type Item = LedStep;

    fn next(&mut self) -> Option<LedStep> {
        match self {
            ChaseRun::Sweep(chase) => chase.next(),
            ChaseRun::Single(step) => step.take(),
        }
    }
}
