//! System configuration parameters.
//!
//! All tunable parameters for the BuzzBox firmware.  Configuration is
//! compiled-in (no persistence); the serde derives exist for diagnostic
//! dumps and future provisioning and are exercised by the tests below.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;

// ---------------------------------------------------------------------------
// Timer configuration
// ---------------------------------------------------------------------------

/// Clock source feeding the MCPWM group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockSource {
    /// 160 MHz PLL output (default MCPWM source).
    Pll160M,
    /// 40 MHz crystal, for low-power builds.
    Xtal40M,
}

/// Power-of-two clock divider applied before the counter increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prescale {
    Div1,
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
    Div512,
    Div1024,
}

impl Prescale {
    /// Divider exponent (`divisor == 1 << exponent`).
    pub const fn exponent(self) -> u32 {
        match self {
            Self::Div1 => 0,
            Self::Div2 => 1,
            Self::Div4 => 2,
            Self::Div8 => 3,
            Self::Div16 => 4,
            Self::Div32 => 5,
            Self::Div64 => 6,
            Self::Div128 => 7,
            Self::Div256 => 8,
            Self::Div512 => 9,
            Self::Div1024 => 10,
        }
    }

    /// Clock divisor.
    pub const fn divisor(self) -> u32 {
        1 << self.exponent()
    }
}

/// What the compare channel does when the counter matches the compare
/// register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputAction {
    /// Flip the output level — a 50%-style square wave keyed to period.
    Toggle,
    /// Drive the output high.
    Set,
    /// Drive the output low.
    Clear,
}

/// Compare-channel operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Output-compare: toggle on match, pitch set by the top value.
    Compare,
    /// Pulse-width modulation: duty set by the compare value.
    Pwm,
}

/// One-shot timer setup, immutable after [`init`](crate::drivers::buzzer::BuzzerTimer::init).
///
/// The two live fields (`top_value`, `compare_value`) seed the hardware at
/// init; afterwards they are owned by the driver and written only through
/// its mutators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Clock source for the timer group.
    pub clock: ClockSource,
    /// Power-of-two divider between clock and counter.
    pub prescale: Prescale,
    /// Compare channel index (0-based).
    pub channel: u8,
    /// Action taken on compare match.
    pub action: OutputAction,
    /// Compare vs. PWM operation.
    pub mode: ChannelMode,
    /// GPIO the channel output is routed to.
    pub route_gpio: i32,
    /// Counter wrap value — defines the waveform period.
    pub top_value: u32,
    /// Authored initial compare value (PWM mode only).  Checked against
    /// `top_value` by [`SystemConfig::validate`]; the driver always brings
    /// the channel up at compare 0 (actuator off).
    pub compare_value: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            clock: ClockSource::Pll160M,
            prescale: Prescale::Div1024,
            channel: pins::BUZZER_CC_CHANNEL,
            action: OutputAction::Toggle,
            mode: ChannelMode::Compare,
            route_gpio: pins::BUZZER_GPIO,
            top_value: 100,
            compare_value: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// System configuration
// ---------------------------------------------------------------------------

/// Which actuator program the sequencer task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorMode {
    /// Play the startup tune on the buzzer (top-value modulation).
    ToneSequence,
    /// Walk the motor duty ramp (compare-value modulation).
    DutyRamp,
}

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Actuator program selection.
    pub mode: ActuatorMode,
    /// Heartbeat log period (seconds).
    pub heartbeat_period_secs: u64,
    /// Hardware timer setup.
    pub timer: TimerConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            mode: ActuatorMode::ToneSequence,
            heartbeat_period_secs: pins::HEARTBEAT_PERIOD_SECS,
            timer: TimerConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Check the cross-field invariants the type system cannot express.
    ///
    /// Runs once at boot, before any task is spawned; a failure is fatal
    /// (the config is compiled in, so it cannot heal at runtime).
    pub fn validate(&self) -> Result<()> {
        if self.heartbeat_period_secs == 0 {
            return Err(Error::Config("heartbeat period must be nonzero"));
        }
        if self.timer.top_value == 0 {
            return Err(Error::Config("initial top value must be nonzero"));
        }
        if self.timer.compare_value > self.timer.top_value {
            return Err(Error::Config("initial compare value exceeds top value"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        c.validate().unwrap();
        assert!(c.timer.channel < pins::MAX_CC_CHANNELS);
        assert!(c.timer.route_gpio <= pins::MAX_ROUTE_GPIO);
    }

    #[test]
    fn validate_rejects_compare_above_top() {
        let mut c = SystemConfig::default();
        c.timer.compare_value = c.timer.top_value + 1;
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        c.timer.compare_value = 0;
        c.heartbeat_period_secs = 0;
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn prescale_divisors_are_powers_of_two() {
        let all = [
            Prescale::Div1,
            Prescale::Div2,
            Prescale::Div4,
            Prescale::Div8,
            Prescale::Div16,
            Prescale::Div32,
            Prescale::Div64,
            Prescale::Div128,
            Prescale::Div256,
            Prescale::Div512,
            Prescale::Div1024,
        ];
        for p in all {
            assert_eq!(p.divisor(), 1 << p.exponent());
            assert!(p.divisor().is_power_of_two());
        }
        assert_eq!(Prescale::Div1024.divisor(), 1024);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.mode, c2.mode);
        assert_eq!(c.timer.top_value, c2.timer.top_value);
        assert_eq!(c.timer.prescale, c2.timer.prescale);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = SystemConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: SystemConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.heartbeat_period_secs, c2.heartbeat_period_secs);
        assert_eq!(c.timer.channel, c2.timer.channel);
    }
}
