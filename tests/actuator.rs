//! Integration tests: the sequencer driving the real timer driver, with
//! the hardware layer running as host no-ops and the driver's shadow
//! registers standing in for the device.

#![cfg(not(target_os = "espidf"))]

use buzzbox::config::{ActuatorMode, ChannelMode, OutputAction, Prescale, TimerConfig};
use buzzbox::drivers::buzzer::{tone_centi_hz, BuzzerTimer, TimerState};
use buzzbox::error::InitError;
use buzzbox::melody;
use buzzbox::sequencer::{Sequence, Sequencer, StepAction};

fn running_timer(cfg: TimerConfig) -> BuzzerTimer {
    let mut t = BuzzerTimer::new(cfg);
    t.init().unwrap();
    t
}

#[test]
fn startup_tune_reaches_the_top_register() {
    let mut timer = running_timer(TimerConfig::default());
    let seq = Sequence::for_mode(ActuatorMode::ToneSequence);
    let mut walker = Sequencer::new(seq, timer.top_value());

    for expected in seq.steps {
        let action = walker.advance();
        let hold = walker.apply(&mut timer, action);
        assert_eq!(timer.top_value(), expected.value);
        assert_eq!(hold, expected.duration_ms);
    }
}

#[test]
fn tune_pitch_is_audible_at_the_default_tick() {
    let timer = running_timer(TimerConfig::default());
    let tick = timer.tick_hz();
    assert_eq!(tick, melody::TONE_TICK_HZ);
    for step in melody::STARTUP_TUNE.steps {
        let chz = tone_centi_hz(tick, step.value);
        assert!((30_000..=120_000).contains(&chz), "{chz} cHz out of range");
    }
}

#[test]
fn duty_ramp_holds_fifty_percent_at_four_seconds() {
    let cfg = TimerConfig {
        mode: ChannelMode::Pwm,
        action: OutputAction::Clear,
        ..TimerConfig::default()
    };
    let mut timer = running_timer(cfg);
    let seq = Sequence::for_mode(ActuatorMode::DutyRamp);
    let mut walker = Sequencer::new(seq, timer.top_value());

    let mut now_ms = 0u32;
    loop {
        let action = walker.advance();
        let hold = walker.apply(&mut timer, action);
        if now_ms == 4000 {
            // Step table [50, 25, 0, 75] at one second each wraps back to
            // 50% of the 100-tick period.
            assert_eq!(timer.compare_value(), 50);
            break;
        }
        now_ms += hold;
    }
}

#[test]
fn finite_tune_silences_between_plays() {
    let mut timer = running_timer(TimerConfig::default());
    let seq = melody::STARTUP_TUNE;
    let mut walker = Sequencer::new(seq, timer.top_value());

    loop {
        let action = walker.advance();
        walker.apply(&mut timer, action);
        if let StepAction::Rest { hold_ms } = action {
            assert_eq!(hold_ms, 2000);
            assert_eq!(timer.top_value(), 0, "rest must silence the output");
            break;
        }
    }

    // After the rest, playback starts over from the first note.
    let action = walker.advance();
    walker.apply(&mut timer, action);
    assert_eq!(timer.top_value(), seq.steps[0].value);
}

#[test]
fn misconfigured_timer_never_starts() {
    let cfg = TimerConfig {
        prescale: Prescale::Div1024,
        channel: 9,
        ..TimerConfig::default()
    };
    let mut t = BuzzerTimer::new(cfg);
    assert_eq!(t.init().unwrap_err(), InitError::UnsupportedChannel(9));
    assert_eq!(t.state(), TimerState::Uninitialized);
    assert_eq!(t.tick_hz(), 0);
}
