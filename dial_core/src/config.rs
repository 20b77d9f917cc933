//! Runtime configuration used by the controller.
//!
//! Separate from the TOML-deserialized config in `dial_config`; see
//! `conversions` for the mapping.

use std::time::Duration;

use crate::position::StepMapper;

/// Motor geometry and step pacing.
#[derive(Debug, Clone)]
pub struct MotorCfg {
    /// Steps in a full revolution.
    pub steps: u32,
    /// Dial points in a full revolution.
    pub scale: f64,
    /// Inter-step delay for indication and sustained jogging.
    pub normal_delay: Duration,
    /// Inter-step delay for the first `slow_mode_wait` of a jog.
    pub slow_delay: Duration,
}

impl Default for MotorCfg {
    fn default() -> Self {
        Self {
            steps: 512,
            scale: 133.3333,
            normal_delay: Duration::from_millis(7),
            slow_delay: Duration::from_millis(45),
        }
    }
}

impl MotorCfg {
    pub fn mapper(&self) -> StepMapper {
        StepMapper::new(self.steps, self.scale)
    }
}

/// Mode-switching thresholds.
#[derive(Debug, Clone)]
pub struct TimingCfg {
    /// Quiet time after the last button activity before indicating again.
    pub indicator_mode_wait: Duration,
    /// Hold time before jogging switches from slow to normal speed.
    pub slow_mode_wait: Duration,
    /// Minimum time between observation fetches.
    pub observation_wait: Duration,
    /// Minimum time between metric-setting reads.
    pub setting_poll: Duration,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            indicator_mode_wait: Duration::from_secs(4),
            slow_mode_wait: Duration::from_secs(1),
            observation_wait: Duration::from_secs(240),
            setting_poll: Duration::from_secs(8),
        }
    }
}

/// Loop pacing.
#[derive(Debug, Clone)]
pub struct RunnerCfg {
    /// Pause after an indicating tick.
    pub idle: Duration,
    /// Pause while waiting out the quiet period.
    pub pending_poll: Duration,
    /// Pause after a failed tick.
    pub backoff: Duration,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            idle: Duration::from_millis(250),
            pending_poll: Duration::from_millis(5),
            backoff: Duration::from_secs(30),
        }
    }
}
