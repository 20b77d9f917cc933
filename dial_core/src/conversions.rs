//! `From` implementations bridging `dial_config` types to `dial_core` types.

use std::time::Duration;

use crate::config::{MotorCfg, RunnerCfg, TimingCfg};
use crate::util::{millis_f64, secs_f64};

// ── MotorCfg ─────────────────────────────────────────────────────────────────

impl From<&dial_config::Motor> for MotorCfg {
    fn from(c: &dial_config::Motor) -> Self {
        Self {
            steps: c.steps,
            scale: c.scale,
            normal_delay: millis_f64(c.normal_delay_ms),
            slow_delay: millis_f64(c.slow_delay_ms),
        }
    }
}

// ── TimingCfg ────────────────────────────────────────────────────────────────

impl From<&dial_config::Config> for TimingCfg {
    fn from(c: &dial_config::Config) -> Self {
        Self {
            indicator_mode_wait: secs_f64(c.wait.indicator_mode_s),
            slow_mode_wait: secs_f64(c.wait.slow_mode_s),
            observation_wait: Duration::from_secs(c.wait.observation_s),
            setting_poll: Duration::from_secs(c.setting.poll_s),
        }
    }
}

// ── RunnerCfg ────────────────────────────────────────────────────────────────

impl From<&dial_config::Runner> for RunnerCfg {
    fn from(c: &dial_config::Runner) -> Self {
        Self {
            idle: Duration::from_millis(c.idle_ms),
            pending_poll: Duration::from_millis(c.pending_poll_ms),
            backoff: Duration::from_secs(c.backoff_s),
        }
    }
}
