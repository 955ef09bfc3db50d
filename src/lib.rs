//! BuzzBox — timer-driven buzzer/motor actuator firmware.
//!
//! A compare timer generates the output waveform in hardware; software
//! only decides *which* waveform, by stepping the timer's top value
//! (pitch) or compare value (duty) through static tables on a schedule.
//!
//! Layout mirrors the runtime split:
//!
//! * [`drivers`] — the timer driver and platform glue (device-only
//!   hardware access behind `cfg(target_os = "espidf")`, logged no-ops
//!   on the host).
//! * [`sequencer`] — the pure step-table walker and its hardware seam.
//! * [`melody`] — the compiled-in step tables.
//!
//! Everything outside `drivers::hw_init` builds and tests on the host.

pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod melody;
pub mod pins;
pub mod sequencer;

pub use error::{Error, Result};
