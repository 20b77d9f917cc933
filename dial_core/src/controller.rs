//! The dial's mode state machine.
//!
//! One `Controller` owns all mutable state and every hardware handle. Each
//! call to [`Controller::tick`] samples the buttons once and then either jogs
//! one step (Manual), waits out the quiet period (ReturnPending) or tracks the
//! observed metric (Auto).

use std::sync::Arc;
use std::time::{Duration, Instant};

use dial_traits::clock::{Clock, MonotonicClock};
use dial_traits::{ButtonPanel, ButtonState, CoilDriver, MetricSetting, ObservationSource};
use tracing::{debug, info, warn};

use crate::coil::Direction;
use crate::config::{MotorCfg, TimingCfg};
use crate::error::{BuildError, Result};
use crate::hw_error::map_hw_error;
use crate::logger::{Logger, NullLogger};
use crate::motion::MotionExecutor;
use crate::observation::{Observation, ObservationPoller, resolve};
use crate::position::StepMapper;
use crate::status::{JogSpeed, TickStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Buttons drive the needle.
    Manual,
    /// Buttons released; waiting for the quiet period.
    ReturnPending,
    /// Needle tracks the observed metric.
    Auto,
}

#[derive(Debug, Clone, Copy)]
pub struct ButtonTimers {
    /// Start of the current (or last) continuous press.
    pub first_press: Instant,
    /// Last tick on which any button was down.
    pub last_activity: Instant,
    /// Whether a button was down on the previous tick.
    pub pressed_last_tick: bool,
}

impl ButtonTimers {
    /// Timers that look like the last press ended long ago.
    fn seeded(clock: &dyn Clock, indicator_mode_wait: Duration) -> Self {
        Self {
            first_press: clock.ago(indicator_mode_wait.saturating_mul(4)),
            last_activity: clock.ago(indicator_mode_wait.saturating_mul(3)),
            pressed_last_tick: false,
        }
    }

    #[inline]
    pub fn held(&self) -> Duration {
        self.last_activity.saturating_duration_since(self.first_press)
    }
}

/// Everything the state machine remembers between ticks.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub mode: Mode,
    pub timers: ButtonTimers,
    /// Metric currently indicated.
    pub metric: String,
    /// Most recent successful fetch; `None` until the first one.
    pub last_fetch: Option<Instant>,
    pub last_setting_poll: Option<Instant>,
    /// Payload of the most recent successful fetch.
    pub observation: Option<Observation>,
    /// Dial value the needle is believed to show.
    pub indicated: f64,
    /// Most recently resolved metric value.
    pub target: f64,
    /// Rotor position treated as dial value 0 after the last manual jog;
    /// `None` means the start position.
    pub zero_reference: Option<u32>,
    pub parked: bool,
}

pub struct Controller {
    state: ControllerState,
    executor: MotionExecutor<Box<dyn CoilDriver>>,
    buttons: Box<dyn ButtonPanel>,
    poller: ObservationPoller<Box<dyn ObservationSource>>,
    setting: Option<Box<dyn MetricSetting>>,
    logger: Box<dyn Logger>,
    clock: Arc<dyn Clock + Send + Sync>,
    mapper: StepMapper,
    motor: MotorCfg,
    timing: TimingCfg,
}

impl core::fmt::Debug for Controller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("mode", &self.state.mode)
            .field("metric", &self.state.metric)
            .field("indicated", &self.state.indicated)
            .field("position", &self.executor.position())
            .finish()
    }
}

impl Controller {
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Logical rotor position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.executor.position()
    }

    pub fn mapper(&self) -> StepMapper {
        self.mapper
    }

    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        self.clock.clone()
    }

    /// Write a line to the operator journal.
    pub fn journal(&self, message: &str) {
        self.logger.log(message);
    }

    /// One pass of the control loop.
    pub fn tick(&mut self) -> Result<TickStatus> {
        if self.state.parked {
            return Ok(TickStatus::Parked);
        }
        let buttons = self
            .buttons
            .read()
            .map_err(|e| map_hw_error(e.as_ref()))?;
        let now = self.clock.now();
        if buttons.any() {
            self.jog(buttons, now)
        } else {
            self.released(now)
        }
    }

    fn jog(&mut self, buttons: ButtonState, now: Instant) -> Result<TickStatus> {
        if self.state.mode != Mode::Manual {
            info!(from = ?self.state.mode, "manual mode");
            self.state.mode = Mode::Manual;
        }
        let timers = &mut self.state.timers;
        if !timers.pressed_last_tick {
            timers.first_press = now;
            timers.pressed_last_tick = true;
        }
        timers.last_activity = now;

        let (speed, delay) = if timers.held() >= self.timing.slow_mode_wait {
            (JogSpeed::Normal, self.motor.normal_delay)
        } else {
            (JogSpeed::Slow, self.motor.slow_delay)
        };
        let direction = if buttons.left {
            Direction::Forward
        } else {
            Direction::Backward
        };

        self.executor.step_once(direction, delay)?;
        // Wherever the needle ends up is dial value 0 from now on.
        self.state.indicated = 0.0;
        self.state.zero_reference = Some(self.executor.position());

        Ok(TickStatus::Jogged { direction, speed })
    }

    fn released(&mut self, now: Instant) -> Result<TickStatus> {
        self.state.timers.pressed_last_tick = false;
        match self.state.mode {
            Mode::Manual | Mode::ReturnPending => {
                let quiet = now.saturating_duration_since(self.state.timers.last_activity);
                if quiet < self.timing.indicator_mode_wait {
                    self.state.mode = Mode::ReturnPending;
                    return Ok(TickStatus::Pending);
                }
                self.state.mode = Mode::Auto;
                let target = self.state.target;
                let steps = self.steps_to(target);
                info!(
                    target,
                    steps,
                    zero_reference = ?self.state.zero_reference,
                    "auto mode"
                );
                self.executor.move_steps(steps, self.motor.normal_delay)?;
                self.state.indicated = target;
                Ok(TickStatus::Reindicated { steps })
            }
            Mode::Auto => self.indicate(now),
        }
    }

    fn indicate(&mut self, now: Instant) -> Result<TickStatus> {
        let due = self
            .state
            .last_fetch
            .is_none_or(|t| now.saturating_duration_since(t) >= self.timing.observation_wait);
        let mut fetched = false;
        if due {
            match self.poller.poll(&self.state.metric) {
                Ok(reading) => {
                    self.state.last_fetch = Some(now);
                    if let Some(at) = reading.observation.observed_at() {
                        self.logger.log(at);
                    }
                    self.logger.log(&reading.raw);
                    self.state.observation = Some(reading.observation);
                    fetched = true;
                }
                Err(e) => {
                    warn!(error = %e, "observation failed");
                    self.logger.log(&e.to_string());
                    return Ok(TickStatus::BackOff(e));
                }
            }
        }

        self.refresh_metric(now);

        let Some(observation) = self.state.observation.as_ref() else {
            return Ok(TickStatus::Idle);
        };
        // A metric switch re-reads the cached payload instead of fetching again.
        let target = match resolve(observation, &self.state.metric) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, metric = %self.state.metric, "cannot resolve metric");
                self.logger.log(&e.to_string());
                return Ok(TickStatus::BackOff(e));
            }
        };
        self.state.target = target;

        let steps = self.steps_to(target);
        self.executor.move_steps(steps, self.motor.normal_delay)?;
        self.state.indicated = target;
        Ok(TickStatus::Indicated { steps, fetched })
    }

    /// Step index the rotor actually sits at, on the dial scale anchored at the
    /// zero reference (or the start position before any jog). Counts every step
    /// written, so a move that failed partway is accounted for.
    fn current_index(&self) -> u32 {
        let n = u64::from(self.mapper.motor_steps.max(1));
        let origin = u64::from(self.state.zero_reference.unwrap_or(0));
        let position = u64::from(self.executor.position());
        // Dial value 0 maps to index n - 1.
        ((position + 2 * n - origin - 1) % n) as u32
    }

    fn steps_to(&self, dial_value: f64) -> i64 {
        self.mapper
            .delta(self.current_index(), self.mapper.step_index(dial_value))
    }

    fn refresh_metric(&mut self, now: Instant) {
        let due = self
            .state
            .last_setting_poll
            .is_none_or(|t| now.saturating_duration_since(t) >= self.timing.setting_poll);
        if !due {
            return;
        }
        self.state.last_setting_poll = Some(now);
        let Some(setting) = self.setting.as_mut() else {
            return;
        };
        match setting.read() {
            Ok(metric) if metric != self.state.metric => {
                info!(from = %self.state.metric, to = %metric, "metric selected");
                self.state.metric = metric;
            }
            Ok(_) => {}
            // Unreadable setting: keep the current metric.
            Err(e) => tracing::trace!(error = %e, "metric setting unavailable"),
        }
    }

    /// Return the needle to dial value 0 and release the coils. Runs once;
    /// later calls do nothing and report zero steps.
    pub fn park(&mut self) -> Result<i64> {
        if self.state.parked {
            return Ok(0);
        }
        self.state.parked = true;
        let steps = self.steps_to(0.0);
        info!(from = self.state.indicated, steps, mode = ?self.state.mode, "parking");
        let moved = self.executor.move_steps(steps, self.motor.normal_delay);
        if moved.is_ok() {
            self.state.indicated = 0.0;
        }
        let released = self.executor.release();
        debug!(position = self.executor.position(), "coils released");
        moved?;
        released?;
        Ok(steps)
    }
}

/// Builder for `Controller`. Coils, buttons and an observation source are required.
#[derive(Default)]
pub struct ControllerBuilder {
    coils: Option<Box<dyn CoilDriver>>,
    buttons: Option<Box<dyn ButtonPanel>>,
    source: Option<Box<dyn ObservationSource>>,
    setting: Option<Box<dyn MetricSetting>>,
    logger: Option<Box<dyn Logger>>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    motor: Option<MotorCfg>,
    timing: Option<TimingCfg>,
    metric: Option<String>,
}

impl ControllerBuilder {
    pub fn with_coils(mut self, coils: impl CoilDriver + 'static) -> Self {
        self.coils = Some(Box::new(coils));
        self
    }

    pub fn with_buttons(mut self, buttons: impl ButtonPanel + 'static) -> Self {
        self.buttons = Some(Box::new(buttons));
        self
    }

    pub fn with_source(mut self, source: impl ObservationSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_setting(mut self, setting: impl MetricSetting + 'static) -> Self {
        self.setting = Some(Box::new(setting));
        self
    }

    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn with_motor(mut self, motor: MotorCfg) -> Self {
        self.motor = Some(motor);
        self
    }

    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Metric indicated until the setting source names another.
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    pub fn build(self) -> std::result::Result<Controller, BuildError> {
        let coils = self.coils.ok_or(BuildError::MissingCoils)?;
        let buttons = self.buttons.ok_or(BuildError::MissingButtons)?;
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let motor = self.motor.unwrap_or_default();
        let timing = self.timing.unwrap_or_default();
        if motor.steps < 2 {
            return Err(BuildError::InvalidConfig("motor steps must be >= 2"));
        }
        if !(motor.scale.is_finite() && motor.scale > 0.0) {
            return Err(BuildError::InvalidConfig("motor scale must be > 0"));
        }
        let metric = self
            .metric
            .unwrap_or_else(|| "relative_humidity".to_string());
        if metric.trim().is_empty() {
            return Err(BuildError::InvalidConfig("metric must not be empty"));
        }
        let clock: Arc<dyn Clock + Send + Sync> = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));

        let state = ControllerState {
            mode: Mode::Auto,
            timers: ButtonTimers::seeded(&*clock, timing.indicator_mode_wait),
            metric,
            last_fetch: None,
            last_setting_poll: None,
            observation: None,
            indicated: 0.0,
            target: 0.0,
            zero_reference: None,
            parked: false,
        };

        Ok(Controller {
            state,
            executor: MotionExecutor::new(coils, motor.steps, clock.clone()),
            buttons,
            poller: ObservationPoller::new(source),
            setting: self.setting,
            logger: self.logger.unwrap_or_else(|| Box::new(NullLogger)),
            clock,
            mapper: motor.mapper(),
            motor,
            timing,
        })
    }
}
