//! GPIO / peripheral assignments for the BuzzBox main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin or channel numbers.  Change an assignment here and it
//! propagates everywhere.

// ---------------------------------------------------------------------------
// Buzzer output (piezo disc or motor driver input, depending on build)
// ---------------------------------------------------------------------------

/// GPIO driven by the MCPWM generator output.
pub const BUZZER_GPIO: i32 = 4;

/// MCPWM group owning the tone timer.
pub const MCPWM_GROUP: i32 = 0;

/// Compare channel used for the output waveform.  The driver rejects
/// indices outside the operator range of the group at init time.
pub const BUZZER_CC_CHANNEL: u8 = 0;

/// Compare channels available per MCPWM group (one operator each).
pub const MAX_CC_CHANNELS: u8 = 3;

/// Highest GPIO number the MCPWM output matrix can route to (ESP32-S3).
pub const MAX_ROUTE_GPIO: i32 = 48;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Heartbeat log period, seconds.
pub const HEARTBEAT_PERIOD_SECS: u64 = 10;

/// Thread stack size for the heartbeat and sequencer tasks, KB.
pub const TASK_STACK_KB: usize = 8;
