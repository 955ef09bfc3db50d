//! Buzzer timer driver — compare-timer waveform generation.
//!
//! Owns the MCPWM channel that drives the buzzer (or motor) pin.  Init is
//! one-shot: validate the static configuration, bring up the peripheral,
//! report the realized counter tick rate.  After init exactly two knobs
//! exist, the top value (pitch / period) and the compare value (duty),
//! and both writes are hardware-buffered so they land on a period
//! boundary, never mid-waveform.
//!
//! Single-writer: only the sequencer task calls the mutators.  The driver
//! keeps a shadow of the live registers so host tests (where the hardware
//! layer is a no-op) can read back what was applied.

use log::info;

use crate::config::{ChannelMode, OutputAction, TimerConfig};
use crate::drivers::hw_init;
use crate::error::InitError;
use crate::pins;
use crate::sequencer::ActuatorPort;

// ── Pure rate math ────────────────────────────────────────────

/// Counter tick rate: source clock through the power-of-two prescaler.
pub const fn timer_tick_hz(clock_hz: u32, prescale_exp: u32) -> u32 {
    clock_hz >> prescale_exp
}

/// Realized output frequency for a top value, in centi-hertz.
///
/// The counter wraps every `top + 1` ticks; centi-hertz keeps the two
/// fractional digits integer math would otherwise truncate.
pub const fn tone_centi_hz(tick_hz: u32, top: u32) -> u32 {
    ((tick_hz as u64 * 100) / (top as u64 + 1)) as u32
}

// ── Driver ────────────────────────────────────────────────────

/// Driver lifecycle.  There is no teardown: the timer runs until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Uninitialized,
    Running,
}

/// The buzzer compare timer.
pub struct BuzzerTimer {
    cfg: TimerConfig,
    state: TimerState,
    tick_hz: u32,
    top: u32,
    compare: u32,
}

impl BuzzerTimer {
    pub fn new(cfg: TimerConfig) -> Self {
        Self {
            cfg,
            state: TimerState::Uninitialized,
            tick_hz: 0,
            top: 0,
            compare: 0,
        }
    }

    /// Validate the configuration, bring up the peripheral and start the
    /// counter.  Returns the realized counter tick rate in Hz.
    ///
    /// Configuration errors are fatal to the actuator subsystem: the
    /// caller logs them once and parks, it does not retry.
    pub fn init(&mut self) -> Result<u32, InitError> {
        if self.cfg.channel >= pins::MAX_CC_CHANNELS {
            return Err(InitError::UnsupportedChannel(self.cfg.channel));
        }
        if self.cfg.route_gpio < 0 || self.cfg.route_gpio > pins::MAX_ROUTE_GPIO {
            return Err(InitError::UnsupportedRoute(self.cfg.route_gpio));
        }
        let mode_ok = match self.cfg.mode {
            // Tone generation needs the toggle action; a set/clear output
            // would pin the level after the first match.
            ChannelMode::Compare => self.cfg.action == OutputAction::Toggle,
            // PWM defines the pulse edge with set/clear; toggling would
            // invert the waveform every period.
            ChannelMode::Pwm => self.cfg.action != OutputAction::Toggle,
        };
        if !mode_ok {
            return Err(InitError::UnsupportedMode);
        }

        hw_init::mcpwm_init(&self.cfg)?;

        self.tick_hz = timer_tick_hz(
            hw_init::clock_hz(self.cfg.clock),
            self.cfg.prescale.exponent(),
        );
        self.top = self.cfg.top_value;
        // Safe startup state: the channel comes up with compare 0
        // (actuator off) regardless of the configured initial value,
        // matching the hardware bring-up.
        self.compare = 0;
        self.state = TimerState::Running;

        info!(
            "buzzer timer up: {} Hz tick, top {}, compare {}",
            self.tick_hz, self.top, self.compare
        );
        Ok(self.tick_hz)
    }

    /// Write a new top value.  0 silences the output.  Buffered: the
    /// hardware latches it at the next period boundary.
    pub fn set_top_value(&mut self, top: u32) {
        debug_assert_eq!(self.state, TimerState::Running);
        self.top = top;
        hw_init::mcpwm_set_period(top);
    }

    /// Write a new compare value, in counter ticks.  Buffered like
    /// [`set_top_value`](Self::set_top_value).  The caller keeps
    /// `ticks <= top_value()`; the driver does not clamp.
    pub fn set_compare_value(&mut self, ticks: u32) {
        debug_assert_eq!(self.state, TimerState::Running);
        self.compare = ticks;
        hw_init::mcpwm_set_compare(ticks);
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Realized counter tick rate (0 before init).
    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    /// Shadow of the live top register.
    pub fn top_value(&self) -> u32 {
        self.top
    }

    /// Shadow of the live compare register.
    pub fn compare_value(&self) -> u32 {
        self.compare
    }
}

impl ActuatorPort for BuzzerTimer {
    fn set_top_value(&mut self, top: u32) {
        BuzzerTimer::set_top_value(self, top);
    }
    fn set_compare_value(&mut self, ticks: u32) {
        BuzzerTimer::set_compare_value(self, ticks);
    }
}

// PWM-mode builds can hand the driver to anything generic over the
// embedded-hal duty-cycle contract.
impl embedded_hal::pwm::ErrorType for BuzzerTimer {
    type Error = core::convert::Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for BuzzerTimer {
    fn max_duty_cycle(&self) -> u16 {
        self.top.min(u16::MAX as u32) as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.set_compare_value(duty as u32);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClockSource, Prescale};
    use embedded_hal::pwm::SetDutyCycle;

    #[test]
    fn tick_rate_follows_the_prescaler() {
        assert_eq!(timer_tick_hz(160_000_000, Prescale::Div1024.exponent()), 156_250);
        assert_eq!(timer_tick_hz(38_400_000, 10), 37_500);
        assert_eq!(timer_tick_hz(40_000_000, 0), 40_000_000);
    }

    #[test]
    fn tone_frequency_at_known_point() {
        // 37.5 kHz tick with top 71 wraps every 72 ticks: 520.83 Hz.
        assert_eq!(tone_centi_hz(37_500, 71), 52_083);
        // Top 0 runs at the full tick rate.
        assert_eq!(tone_centi_hz(37_500, 0), 3_750_000);
    }

    #[test]
    fn init_reports_the_realized_tick_rate() {
        let mut t = BuzzerTimer::new(TimerConfig::default());
        assert_eq!(t.state(), TimerState::Uninitialized);
        let hz = t.init().unwrap();
        assert_eq!(hz, 156_250);
        assert_eq!(t.state(), TimerState::Running);
        assert_eq!(t.top_value(), 100);
        assert_eq!(t.compare_value(), 0);
    }

    #[test]
    fn init_starts_with_the_actuator_off() {
        // Even a config carrying a nonzero initial compare comes up
        // silent; the shadow must agree with the hardware write.
        let cfg = TimerConfig { compare_value: 42, ..TimerConfig::default() };
        let mut t = BuzzerTimer::new(cfg);
        t.init().unwrap();
        assert_eq!(t.compare_value(), 0);
    }

    #[test]
    fn init_rejects_bad_channel() {
        let cfg = TimerConfig { channel: 7, ..TimerConfig::default() };
        let err = BuzzerTimer::new(cfg).init().unwrap_err();
        assert_eq!(err, InitError::UnsupportedChannel(7));
    }

    #[test]
    fn init_rejects_unroutable_gpio() {
        let cfg = TimerConfig { route_gpio: 99, ..TimerConfig::default() };
        let err = BuzzerTimer::new(cfg).init().unwrap_err();
        assert_eq!(err, InitError::UnsupportedRoute(99));

        let cfg = TimerConfig { route_gpio: -1, ..TimerConfig::default() };
        let err = BuzzerTimer::new(cfg).init().unwrap_err();
        assert_eq!(err, InitError::UnsupportedRoute(-1));
    }

    #[test]
    fn init_rejects_mismatched_mode_and_action() {
        let cfg = TimerConfig {
            mode: ChannelMode::Compare,
            action: OutputAction::Set,
            ..TimerConfig::default()
        };
        assert_eq!(BuzzerTimer::new(cfg).init().unwrap_err(), InitError::UnsupportedMode);

        let cfg = TimerConfig {
            mode: ChannelMode::Pwm,
            action: OutputAction::Toggle,
            ..TimerConfig::default()
        };
        assert_eq!(BuzzerTimer::new(cfg).init().unwrap_err(), InitError::UnsupportedMode);
    }

    #[test]
    fn mutators_update_the_shadow_registers() {
        let mut t = BuzzerTimer::new(TimerConfig::default());
        t.init().unwrap();
        t.set_top_value(236);
        assert_eq!(t.top_value(), 236);
        t.set_compare_value(118);
        assert_eq!(t.compare_value(), 118);
        t.set_top_value(0);
        assert_eq!(t.top_value(), 0);
    }

    #[test]
    fn xtal_clock_scales_the_tick() {
        let cfg = TimerConfig {
            clock: ClockSource::Xtal40M,
            prescale: Prescale::Div64,
            ..TimerConfig::default()
        };
        let mut t = BuzzerTimer::new(cfg);
        assert_eq!(t.init().unwrap(), 625_000);
    }

    #[test]
    fn duty_cycle_contract_maps_onto_compare() {
        let cfg = TimerConfig {
            mode: ChannelMode::Pwm,
            action: OutputAction::Clear,
            ..TimerConfig::default()
        };
        let mut t = BuzzerTimer::new(cfg);
        t.init().unwrap();
        assert_eq!(t.max_duty_cycle(), 100);
        t.set_duty_cycle(25).unwrap();
        assert_eq!(t.compare_value(), 25);
    }
}
