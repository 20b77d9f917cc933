#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the weather dial.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every value has a default except `observation.api_key`.
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Observation {
    /// Weather service API key. No default.
    pub api_key: String,
    #[serde(default = "default_location")]
    pub location: String,
    /// Metric indicated until the setting file names another one
    #[serde(default = "default_metric")]
    pub default_metric: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_s")]
    pub request_timeout_s: u64,
}

fn default_location() -> String {
    "IL/O'Fallon.json".to_string()
}
fn default_metric() -> String {
    "relative_humidity".to_string()
}
fn default_base_url() -> String {
    "http://api.wunderground.com/api".to_string()
}
const fn default_request_timeout_s() -> u64 {
    20
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Setting {
    /// Text file whose first line names the active metric
    pub file: PathBuf,
    /// Minimum seconds between reads of `file`
    pub poll_s: u64,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            file: PathBuf::from("/var/www/setting.txt"),
            poll_s: 8,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Motor {
    /// Motor steps in a full revolution
    pub steps: u32,
    /// Dial "clockpoints" in a full revolution
    pub scale: f64,
    /// Inter-step delay for indication and fast jogging
    pub normal_delay_ms: f64,
    /// Inter-step delay while a jog button has been held only briefly
    pub slow_delay_ms: f64,
}

impl Default for Motor {
    fn default() -> Self {
        Self {
            steps: 512,
            scale: 133.3333,
            normal_delay_ms: 7.0,
            slow_delay_ms: 45.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Wait {
    /// Seconds without button activity before indicating again
    pub indicator_mode_s: f64,
    /// Seconds of continuous holding before jogging at normal speed
    pub slow_mode_s: f64,
    /// Seconds between observation fetches
    pub observation_s: u64,
}

impl Default for Wait {
    fn default() -> Self {
        Self {
            indicator_mode_s: 4.0,
            slow_mode_s: 1.0,
            observation_s: 240,
        }
    }
}

/// BCM pin numbers.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pins {
    pub left: u8,
    pub right: u8,
    pub coil_a1: u8,
    pub coil_a2: u8,
    pub coil_b1: u8,
    pub coil_b2: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            left: 24,
            right: 25,
            coil_a1: 15,
            coil_a2: 23,
            coil_b1: 14,
            coil_b2: 18,
        }
    }
}

impl Pins {
    pub fn all(&self) -> [(&'static str, u8); 6] {
        [
            ("left", self.left),
            ("right", self.right),
            ("coil_a1", self.coil_a1),
            ("coil_a2", self.coil_a2),
            ("coil_b1", self.coil_b1),
            ("coil_b2", self.coil_b2),
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Log {
    pub dir: PathBuf,
    pub file: String,
    /// Age in seconds after which the journal is rotated to `<file>.backup`
    pub rotate_wait_s: u64,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file: "weather_clock.log".to_string(),
            rotate_wait_s: 10_800,
        }
    }
}

impl Log {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Runner {
    /// Pause after each indicating tick
    pub idle_ms: u64,
    /// Button polling pause while waiting to return to indication
    pub pending_poll_ms: u64,
    /// Whole-loop pause after a failed tick
    pub backoff_s: u64,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            idle_ms: 250,
            pending_poll_ms: 5,
            backoff_s: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub observation: Observation,
    #[serde(default)]
    pub setting: Setting,
    #[serde(default)]
    pub motor: Motor,
    #[serde(default)]
    pub wait: Wait,
    #[serde(default)]
    pub pins: Pins,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub runner: Runner,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    cfg.validate()?;
    Ok(cfg)
}

fn finite_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Observation
        if self.observation.api_key.trim().is_empty() {
            eyre::bail!("observation.api_key must be set");
        }
        if self.observation.location.trim().is_empty() {
            eyre::bail!("observation.location must not be empty");
        }
        if self.observation.default_metric.trim().is_empty() {
            eyre::bail!("observation.default_metric must not be empty");
        }
        if self.observation.request_timeout_s == 0 {
            eyre::bail!("observation.request_timeout_s must be >= 1");
        }

        // Motor
        if self.motor.steps < 2 {
            eyre::bail!("motor.steps must be >= 2");
        }
        if !(self.motor.scale.is_finite() && self.motor.scale > 0.0) {
            eyre::bail!("motor.scale must be > 0");
        }
        if !finite_non_negative(self.motor.normal_delay_ms) {
            eyre::bail!("motor.normal_delay_ms must be >= 0");
        }
        if !finite_non_negative(self.motor.slow_delay_ms) {
            eyre::bail!("motor.slow_delay_ms must be >= 0");
        }
        if self.motor.normal_delay_ms > 10_000.0 || self.motor.slow_delay_ms > 10_000.0 {
            eyre::bail!("motor step delays are unreasonably large (>10s)");
        }

        // Wait
        if !finite_non_negative(self.wait.indicator_mode_s) {
            eyre::bail!("wait.indicator_mode_s must be >= 0");
        }
        if !finite_non_negative(self.wait.slow_mode_s) {
            eyre::bail!("wait.slow_mode_s must be >= 0");
        }
        if self.wait.observation_s == 0 {
            eyre::bail!("wait.observation_s must be >= 1");
        }

        // Pins
        let pins = self.pins.all();
        for (i, (name, pin)) in pins.iter().enumerate() {
            if let Some((other, _)) = pins[i + 1..].iter().find(|(_, p)| p == pin) {
                eyre::bail!("pins.{name} and pins.{other} both use GPIO {pin}");
            }
        }

        // Log
        if self.log.file.trim().is_empty() {
            eyre::bail!("log.file must not be empty");
        }
        if self.log.rotate_wait_s == 0 {
            eyre::bail!("log.rotate_wait_s must be >= 1");
        }

        // Runner
        if self.runner.backoff_s == 0 {
            eyre::bail!("runner.backoff_s must be >= 1");
        }

        Ok(())
    }
}
