//! Unified error types for the BuzzBox firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level error handling uniform.  All variants are `Copy` so they can be
//! passed between tasks without allocation.
//!
//! Timer misconfiguration is a build-time mismatch, not a transient fault:
//! it is reported once and the owning task parks.  Caller-contract
//! violations (a compare value above the current top value, an out-of-range
//! step target) are deliberately *not* detected at runtime — sequences are
//! authored statically and validated by tests.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Timer peripheral initialisation failed.
    Timer(InitError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(e) => write!(f, "timer: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

/// Timer init failures — the only runtime-detected error class.
///
/// Detected once during [`BuzzerTimer::init`](crate::drivers::buzzer::BuzzerTimer::init);
/// fatal to the actuator subsystem (fail-safe-off, no retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// Compare channel index outside the group's operator range.
    UnsupportedChannel(u8),
    /// Channel mode / output action combination the timer cannot produce.
    UnsupportedMode,
    /// Route GPIO outside the output matrix range.
    UnsupportedRoute(i32),
    /// Nonzero esp_err_t from the MCPWM driver.
    Hardware(i32),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedChannel(ch) => write!(f, "unsupported compare channel {ch}"),
            Self::UnsupportedMode => write!(f, "unsupported mode/action combination"),
            Self::UnsupportedRoute(gpio) => write!(f, "unroutable output GPIO {gpio}"),
            Self::Hardware(rc) => write!(f, "MCPWM setup failed (rc={rc})"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Timer(e)
    }
}

impl std::error::Error for Error {}
impl std::error::Error for InitError {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
