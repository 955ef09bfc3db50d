//! One-shot MCPWM / GPIO peripheral initialization.
//!
//! Configures the buzzer GPIO and the MCPWM timer/operator/comparator/
//! generator chain using raw ESP-IDF sys calls.  Called once from the
//! heartbeat task before the sequencer task exists.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real MCPWM block.
//! On host/test: logged no-ops; the driver keeps a shadow of the live
//! state so tests can read back what was applied.

use crate::config::{ClockSource, TimerConfig};
use crate::error::InitError;
use crate::pins;

#[cfg(target_os = "espidf")]
use crate::config::{ChannelMode, OutputAction};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── Clock tree ────────────────────────────────────────────────

/// Configured source clock frequency for the MCPWM group.
///
/// Nominal values from the ESP32-S3 clock tree; the MCPWM driver divides
/// this down to the requested counter resolution.
pub fn clock_hz(source: ClockSource) -> u32 {
    match source {
        ClockSource::Pll160M => 160_000_000,
        ClockSource::Xtal40M => 40_000_000,
    }
}

// ── Buzzer GPIO ───────────────────────────────────────────────

/// Configure the buzzer pin as push-pull output, driven low.
///
/// Idempotent; after init the pin is driven only by the MCPWM generator,
/// never by direct software writes.
#[cfg(target_os = "espidf")]
pub fn init_buzzer_pin() {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUZZER_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: gpio_config/gpio_set_level are register writes on a pin this
    // firmware owns exclusively; called once from the heartbeat task.
    unsafe {
        gpio_config(&cfg);
        gpio_set_level(pins::BUZZER_GPIO, 0);
    }
    info!("hw_init: buzzer pin GPIO{} configured (push-pull, low)", pins::BUZZER_GPIO);
}

#[cfg(not(target_os = "espidf"))]
pub fn init_buzzer_pin() {
    log::info!("hw_init(sim): buzzer pin GPIO{} configured", pins::BUZZER_GPIO);
}

// ── MCPWM tone timer ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut TONE_TIMER: mcpwm_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut TONE_OPER: mcpwm_oper_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut TONE_CMPR: mcpwm_cmpr_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut TONE_GEN: mcpwm_gen_handle_t = core::ptr::null_mut();

/// SAFETY: TONE_TIMER is written once in `mcpwm_init()` before the
/// sequencer task exists; afterwards only read from that single task.
#[cfg(target_os = "espidf")]
unsafe fn tone_timer() -> mcpwm_timer_handle_t {
    unsafe { TONE_TIMER }
}

/// SAFETY: Same invariants as `tone_timer()`.
#[cfg(target_os = "espidf")]
unsafe fn tone_cmpr() -> mcpwm_cmpr_handle_t {
    unsafe { TONE_CMPR }
}

#[cfg(target_os = "espidf")]
fn generator_action(action: OutputAction) -> mcpwm_generator_action_t {
    match action {
        OutputAction::Toggle => mcpwm_generator_action_t_MCPWM_GEN_ACTION_TOGGLE,
        OutputAction::Set => mcpwm_generator_action_t_MCPWM_GEN_ACTION_HIGH,
        OutputAction::Clear => mcpwm_generator_action_t_MCPWM_GEN_ACTION_LOW,
    }
}

/// Bring up the MCPWM chain for the configured channel.
///
/// Period and compare registers are shadowed: the hardware latches new
/// values at the next counter-empty point, never mid-period.
#[cfg(target_os = "espidf")]
pub fn mcpwm_init(cfg: &TimerConfig) -> Result<(), InitError> {
    let tick_hz = clock_hz(cfg.clock) / cfg.prescale.divisor();

    // SAFETY: The four handles are written here once, from the heartbeat
    // task, before any mutator can run.  The MCPWM driver calls are the
    // documented IDF bring-up sequence.
    unsafe {
        let mut timer_cfg = mcpwm_timer_config_t {
            group_id: pins::MCPWM_GROUP,
            clk_src: soc_periph_mcpwm_timer_clk_src_t_MCPWM_TIMER_CLK_SRC_DEFAULT,
            resolution_hz: tick_hz,
            count_mode: mcpwm_timer_count_mode_t_MCPWM_TIMER_COUNT_MODE_UP,
            period_ticks: cfg.top_value + 1,
            ..Default::default()
        };
        timer_cfg.flags.set_update_period_on_empty(1);
        let ret = mcpwm_new_timer(&timer_cfg, &raw mut TONE_TIMER);
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }

        let oper_cfg = mcpwm_operator_config_t {
            group_id: pins::MCPWM_GROUP,
            ..Default::default()
        };
        let ret = mcpwm_new_operator(&oper_cfg, &raw mut TONE_OPER);
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }
        let ret = mcpwm_operator_connect_timer(TONE_OPER, TONE_TIMER);
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }

        let mut cmpr_cfg = mcpwm_comparator_config_t::default();
        cmpr_cfg.flags.set_update_cmp_on_tez(1);
        let ret = mcpwm_new_comparator(TONE_OPER, &cmpr_cfg, &raw mut TONE_CMPR);
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }

        let gen_cfg = mcpwm_generator_config_t {
            gen_gpio_num: cfg.route_gpio,
            ..Default::default()
        };
        let ret = mcpwm_new_generator(TONE_OPER, &gen_cfg, &raw mut TONE_GEN);
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }

        let ret = mcpwm_generator_set_action_on_compare_event(
            TONE_GEN,
            mcpwm_gen_compare_event_action_t {
                direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                comparator: TONE_CMPR,
                action: generator_action(cfg.action),
            },
        );
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }

        if cfg.mode == ChannelMode::Pwm {
            // PWM: drive the opposite level at counter-empty so the compare
            // match defines the pulse width.
            let empty_action = match cfg.action {
                OutputAction::Clear => mcpwm_generator_action_t_MCPWM_GEN_ACTION_HIGH,
                _ => mcpwm_generator_action_t_MCPWM_GEN_ACTION_LOW,
            };
            let ret = mcpwm_generator_set_action_on_timer_event(
                TONE_GEN,
                mcpwm_gen_timer_event_action_t {
                    direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                    event: mcpwm_timer_event_t_MCPWM_TIMER_EVENT_EMPTY,
                    action: empty_action,
                },
            );
            if ret != ESP_OK {
                return Err(InitError::Hardware(ret));
            }
        }

        // Safe startup state: actuator off until the sequencer writes.
        let ret = mcpwm_comparator_set_compare_value(TONE_CMPR, 0);
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }

        let ret = mcpwm_timer_enable(TONE_TIMER);
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }
        let ret = mcpwm_timer_start_stop(
            TONE_TIMER,
            mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_START_NO_STOP,
        );
        if ret != ESP_OK {
            return Err(InitError::Hardware(ret));
        }
    }

    info!(
        "hw_init: MCPWM group {} ch{} → GPIO{} @ {} Hz tick",
        pins::MCPWM_GROUP,
        cfg.channel,
        cfg.route_gpio,
        tick_hz
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn mcpwm_init(cfg: &TimerConfig) -> Result<(), InitError> {
    log::info!(
        "hw_init(sim): MCPWM ch{} → GPIO{} configured",
        cfg.channel,
        cfg.route_gpio
    );
    Ok(())
}

/// Buffered period write — latched at the next counter-empty point.
///
/// A top value of 0 is the silence/off state: the counter is halted at
/// empty so the pin stays at its initial level.
#[cfg(target_os = "espidf")]
pub fn mcpwm_set_period(top: u32) {
    // SAFETY: tone_timer() contract — handle written once at init,
    // mutators called only from the sequencer task.
    unsafe {
        let timer = tone_timer();
        if top == 0 {
            mcpwm_timer_start_stop(timer, mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_STOP_EMPTY);
        } else {
            mcpwm_timer_set_period(timer, top + 1);
            mcpwm_timer_start_stop(timer, mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_START_NO_STOP);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn mcpwm_set_period(_top: u32) {}

/// Buffered compare write — latched at the next counter-empty point.
/// The caller keeps `v <= top`; the hardware is not asked to clamp.
#[cfg(target_os = "espidf")]
pub fn mcpwm_set_compare(v: u32) {
    // SAFETY: tone_cmpr() contract — handle written once at init,
    // mutators called only from the sequencer task.
    unsafe {
        mcpwm_comparator_set_compare_value(tone_cmpr(), v);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn mcpwm_set_compare(_v: u32) {}
