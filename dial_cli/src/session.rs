//! Config mapping, device assembly and command execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dial_config::Config;
use dial_core::error::{DialError, Result};
use dial_core::{
    Controller, MotionExecutor, MotorCfg, ObservationPoller, Reading, RotatingFileLogger,
    RunSummary, RunnerCfg, TimingCfg,
};
use dial_hardware::FileMetricSetting;
use dial_traits::{ButtonPanel, ButtonState, CoilDriver, MonotonicClock, ObservationSource};

/// First line of every fresh journal.
pub const JOURNAL_BANNER: &str = "weather dial log started";

type Devices = (Box<dyn CoilDriver>, Box<dyn ButtonPanel>);

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn open_devices(cfg: &Config) -> Result<Devices> {
    let p = &cfg.pins;
    let coils = dial_hardware::gpio::GpioCoils::new(p.coil_a1, p.coil_a2, p.coil_b1, p.coil_b2)
        .map_err(|e| eyre::eyre!("open coil pins: {e}"))?;
    let buttons = dial_hardware::gpio::GpioButtons::new(p.left, p.right)
        .map_err(|e| eyre::eyre!("open button pins: {e}"))?;
    tracing::info!(
        a1 = p.coil_a1,
        a2 = p.coil_a2,
        b1 = p.coil_b1,
        b2 = p.coil_b2,
        left = p.left,
        right = p.right,
        "gpio ready"
    );
    Ok((Box::new(coils), Box::new(buttons)))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn open_devices(_cfg: &Config) -> Result<Devices> {
    use dial_hardware::{SimulatedButtons, SimulatedCoils};

    let buttons = match std::env::var("DIAL_SIM_BUTTONS") {
        Ok(script) => SimulatedButtons::from_script(&script)
            .map_err(|e| eyre::eyre!("DIAL_SIM_BUTTONS: {e}"))?,
        Err(_) => SimulatedButtons::new(),
    };
    tracing::info!("simulated coils and buttons");
    Ok((Box::new(SimulatedCoils::new()), Box::new(buttons)))
}

#[cfg(feature = "hardware")]
fn open_source(cfg: &Config) -> Box<dyn ObservationSource> {
    let o = &cfg.observation;
    Box::new(dial_hardware::HttpObservationSource::new(
        &o.base_url,
        &o.api_key,
        &o.location,
        Duration::from_secs(o.request_timeout_s),
    ))
}

#[cfg(not(feature = "hardware"))]
fn open_source(_cfg: &Config) -> Box<dyn ObservationSource> {
    use dial_hardware::SimulatedObservation;

    match std::env::var("DIAL_SIM_PAYLOAD") {
        Ok(payload) => Box::new(SimulatedObservation::new(payload)),
        Err(_) => Box::new(SimulatedObservation::default()),
    }
}

/// Button panel that raises the shutdown flag once it has been sampled
/// `remaining` times. The controller samples once per tick.
struct TickLimit {
    inner: Box<dyn ButtonPanel>,
    remaining: u64,
    shutdown: Arc<AtomicBool>,
}

impl ButtonPanel for TickLimit {
    fn read(&mut self) -> std::result::Result<ButtonState, Box<dyn std::error::Error + Send + Sync>> {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.shutdown.store(true, Ordering::Relaxed);
        }
        self.inner.read()
    }
}

/// Run the control loop until `shutdown` is raised (or `max_ticks` elapse).
pub fn run_dial(
    cfg: &Config,
    max_ticks: Option<u64>,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let journal = RotatingFileLogger::new(
        cfg.log.path(),
        Duration::from_secs(cfg.log.rotate_wait_s),
        Arc::new(MonotonicClock::new()),
    );
    journal.start(JOURNAL_BANNER);
    tracing::info!(journal = %journal.path().display(), "journal started");

    let (coils, buttons) = open_devices(cfg)?;
    let buttons: Box<dyn ButtonPanel> = match max_ticks {
        Some(0) => {
            shutdown.store(true, Ordering::Relaxed);
            buttons
        }
        Some(n) => Box::new(TickLimit {
            inner: buttons,
            remaining: n,
            shutdown: shutdown.clone(),
        }),
        None => buttons,
    };

    let mut controller = Controller::builder()
        .with_coils(coils)
        .with_buttons(buttons)
        .with_source(open_source(cfg))
        .with_setting(FileMetricSetting::new(&cfg.setting.file))
        .with_logger(journal)
        .with_clock(MonotonicClock::new())
        .with_motor(MotorCfg::from(&cfg.motor))
        .with_timing(TimingCfg::from(cfg))
        .with_metric(cfg.observation.default_metric.clone())
        .build()?;

    dial_core::run(&mut controller, &RunnerCfg::from(&cfg.runner), &shutdown)
}

/// One fetch of the configured default metric.
pub fn self_check(cfg: &Config) -> Result<Reading> {
    let mut poller = ObservationPoller::new(open_source(cfg));
    let reading = poller
        .poll(&cfg.observation.default_metric)
        .map_err(DialError::from)?;
    Ok(reading)
}

/// Move `steps` (signed) at normal speed, then release the coils. Returns the
/// resulting logical position relative to where the needle started.
pub fn jog(cfg: &Config, steps: i64) -> Result<u32> {
    let (coils, _buttons) = open_devices(cfg)?;
    let motor = MotorCfg::from(&cfg.motor);
    let mut executor = MotionExecutor::new(coils, motor.steps, Arc::new(MonotonicClock::new()));
    let moved = executor.move_steps(steps, motor.normal_delay);
    let released = executor.release();
    moved?;
    released?;
    Ok(executor.position())
}
