//! Hardware drivers and platform glue.

pub mod buzzer;
pub mod hw_init;
pub mod task;
