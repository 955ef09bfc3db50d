//! BuzzBox firmware — main entry point.
//!
//! Two cooperative tasks on top of the ESP-IDF std runtime:
//!
//! * `heartbeat` — owns bring-up.  Configures the buzzer pin, initializes
//!   the compare timer, spawns the sequencer with the realized tick rate,
//!   then logs a liveness beat forever.
//! * `sequencer` — walks the selected step table against the timer
//!   driver, one buffered register write per step.
//!
//! No locks anywhere: the timer is handed to the sequencer task after
//! init and has exactly one writer from then on.

use std::time::Duration;

use anyhow::Result;
use log::{error, info};

use buzzbox::config::SystemConfig;
use buzzbox::drivers::buzzer::{tone_centi_hz, BuzzerTimer};
use buzzbox::drivers::{hw_init, task};
use buzzbox::sequencer::{Sequence, Sequencer, StepAction, SteppedParam};
use buzzbox::{diagnostics, pins};

fn main() -> Result<()> {
    // ── ESP-IDF bootstrap ─────────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    diagnostics::banner();
    diagnostics::install_panic_handler();

    let config = SystemConfig::default();
    config.validate()?;
    info!(
        "actuator mode: {:?}, heartbeat every {} s",
        config.mode, config.heartbeat_period_secs
    );

    let heartbeat = task::spawn_named("heartbeat", pins::TASK_STACK_KB, move || {
        heartbeat_task(config);
    })?;

    // The heartbeat never returns; park main on it.
    let _ = heartbeat.join();
    Ok(())
}

// ── Heartbeat task ────────────────────────────────────────────

fn heartbeat_task(config: SystemConfig) {
    hw_init::init_buzzer_pin();

    let mut timer = BuzzerTimer::new(config.timer.clone());
    let tick_hz = match timer.init() {
        Ok(hz) => hz,
        Err(e) => {
            // Misconfiguration is a build defect, not a transient fault:
            // report once, keep the actuator off, keep beating.
            error!("timer init failed: {e} — actuator disabled");
            heartbeat_loop(config.heartbeat_period_secs);
        }
    };
    info!("timer tick rate: {tick_hz} Hz");

    let seq = Sequence::for_mode(config.mode);
    if let Err(e) = task::spawn_named("sequencer", pins::TASK_STACK_KB, move || {
        sequencer_task(timer, seq, tick_hz);
    }) {
        error!("sequencer spawn failed: {e} — actuator disabled");
    }

    heartbeat_loop(config.heartbeat_period_secs);
}

fn heartbeat_loop(period_secs: u64) -> ! {
    let period = Duration::from_secs(period_secs);
    let mut beats: u64 = 0;
    loop {
        std::thread::sleep(period);
        beats += 1;
        info!("heartbeat #{beats}");
    }
}

// ── Sequencer task ────────────────────────────────────────────

fn sequencer_task(mut timer: BuzzerTimer, seq: Sequence, tick_hz: u32) {
    info!("sequencer: program '{}', {} steps", seq.label, seq.steps.len());
    let mut walker = Sequencer::new(seq, timer.top_value());
    loop {
        let action = walker.advance();
        match action {
            StepAction::Apply { step, value, .. } => match seq.param {
                SteppedParam::TopValue => {
                    let chz = tone_centi_hz(tick_hz, value);
                    info!("step {step}: top {value} → {}.{:02} Hz", chz / 100, chz % 100);
                }
                SteppedParam::DutyPercent => {
                    info!("step {step}: duty {value}%");
                }
            },
            StepAction::Rest { hold_ms } => {
                info!("rest for {hold_ms} ms");
            }
        }
        let hold_ms = walker.apply(&mut timer, action);
        std::thread::sleep(Duration::from_millis(u64::from(hold_ms)));
    }
}
