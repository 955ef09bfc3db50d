//! Actuator sequencer — walks a static step table against the timer driver.
//!
//! The sequencer is split in two:
//!
//! * [`Sequencer::advance`] is pure: it consumes no time and touches no
//!   hardware, it only decides what the next step is.  All of the walk
//!   logic (wraparound, repeat counting, rest insertion) is testable on
//!   the host without a device.
//! * [`Sequencer::apply`] performs the single hardware write for a
//!   decision through an [`ActuatorPort`] and reports how long to hold it.
//!
//! The driving loop in `main` is nothing but `advance` / `apply` / sleep.

use crate::config::ActuatorMode;
use crate::melody;

// ── Step tables ───────────────────────────────────────────────

/// One entry of a step table: a raw parameter value held for a duration.
///
/// What `value` means is decided by the owning [`Sequence`]: a counter top
/// value for tone tables, a duty percentage for ramp tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub value: u32,
    pub duration_ms: u32,
}

/// Which timer parameter the table's step values are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteppedParam {
    /// Step values are counter top values (pitch modulation).
    TopValue,
    /// Step values are duty percentages, scaled against the fixed top
    /// value before being written to the compare register.
    DutyPercent,
}

/// How the walk behaves at the end of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceMode {
    /// Wrap from the last step straight back to the first, forever.
    Cyclic,
    /// Walk the table `repeats` times, silence the output for `rest_ms`,
    /// then start over from the first step.
    FiniteWithRest { repeats: u32, rest_ms: u32 },
}

/// A complete actuator program: a static step table plus its
/// interpretation.
///
/// Tables are authored at compile time (see [`melody`]) and must be
/// non-empty; authoring invariants are enforced by tests, not at runtime.
#[derive(Debug, Clone, Copy)]
pub struct Sequence {
    /// Program name, for logs only.
    pub label: &'static str,
    pub param: SteppedParam,
    pub mode: SequenceMode,
    pub steps: &'static [Step],
}

impl Sequence {
    /// Program for the given actuator mode.
    pub fn for_mode(mode: ActuatorMode) -> Self {
        match mode {
            ActuatorMode::ToneSequence => melody::STARTUP_TUNE,
            ActuatorMode::DutyRamp => melody::MOTOR_RAMP,
        }
    }
}

// ── Hardware seam ─────────────────────────────────────────────

/// The two timer writes the sequencer is allowed to make.
///
/// The live driver implements this; tests substitute a recorder.
pub trait ActuatorPort {
    /// Write a new counter top value (0 = silence).
    fn set_top_value(&mut self, top: u32);
    /// Write a new compare value, in counter ticks.
    fn set_compare_value(&mut self, ticks: u32);
}

// ── Walk state ────────────────────────────────────────────────

/// Decision produced by one [`Sequencer::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Write this step's value, hold for the step duration.
    Apply { step: usize, value: u32, hold_ms: u32 },
    /// Silence the output, hold for the rest interval.
    Rest { hold_ms: u32 },
}

impl StepAction {
    pub fn hold_ms(self) -> u32 {
        match self {
            Self::Apply { hold_ms, .. } | Self::Rest { hold_ms } => hold_ms,
        }
    }
}

/// Duty percentage → compare ticks against a fixed top value.
///
/// `pct` is kept in `0..=100` by the table author; 0 maps to 0 ticks
/// (always off) and 100 maps to the full period.
pub fn duty_compare_ticks(top: u32, pct: u32) -> u32 {
    ((top as u64 * pct as u64) / 100) as u32
}

/// Walks one [`Sequence`], one decision per call.
///
/// Owns only walk state (position, traversal count, pending rest); the
/// hardware write happens in [`apply`](Self::apply), nowhere else.
#[derive(Debug)]
pub struct Sequencer {
    seq: Sequence,
    /// Fixed top value duty percentages are scaled against.
    base_top: u32,
    index: usize,
    traversals: u32,
    pending_rest: bool,
}

impl Sequencer {
    pub fn new(seq: Sequence, base_top: u32) -> Self {
        Self {
            seq,
            base_top,
            index: 0,
            traversals: 0,
            pending_rest: false,
        }
    }

    /// Decide the next action and move the walk forward.  Pure: no I/O,
    /// no sleeping, no hardware.
    pub fn advance(&mut self) -> StepAction {
        if self.pending_rest {
            self.pending_rest = false;
            self.index = 0;
            self.traversals = 0;
            let rest_ms = match self.seq.mode {
                SequenceMode::FiniteWithRest { rest_ms, .. } => rest_ms,
                SequenceMode::Cyclic => 0,
            };
            return StepAction::Rest { hold_ms: rest_ms };
        }

        let step = self.seq.steps[self.index];
        let action = StepAction::Apply {
            step: self.index,
            value: step.value,
            hold_ms: step.duration_ms,
        };

        self.index += 1;
        if self.index == self.seq.steps.len() {
            self.index = 0;
            if let SequenceMode::FiniteWithRest { repeats, .. } = self.seq.mode {
                self.traversals += 1;
                if self.traversals >= repeats {
                    self.pending_rest = true;
                }
            }
        }
        action
    }

    /// Perform the single timer write for `action`; returns the hold time
    /// in milliseconds.  Rest silences the output: top 0 for tone tables,
    /// compare 0 for duty tables.
    pub fn apply<P: ActuatorPort>(&self, port: &mut P, action: StepAction) -> u32 {
        match (action, self.seq.param) {
            (StepAction::Apply { value, .. }, SteppedParam::TopValue) => {
                port.set_top_value(value);
            }
            (StepAction::Apply { value, .. }, SteppedParam::DutyPercent) => {
                port.set_compare_value(duty_compare_ticks(self.base_top, value));
            }
            (StepAction::Rest { .. }, SteppedParam::TopValue) => {
                port.set_top_value(0);
            }
            (StepAction::Rest { .. }, SteppedParam::DutyPercent) => {
                port.set_compare_value(0);
            }
        }
        action.hold_ms()
    }
}
