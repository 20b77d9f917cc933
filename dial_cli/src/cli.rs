//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "weather_dial", version, about = "Weather dial stepper controller")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/weather_dial.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Track the selected weather metric until interrupted, then park at zero
    Run {
        /// Stop after this many control ticks (testing aid)
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
    },
    /// Validate config, fetch one observation and report the selected metric
    SelfCheck,
    /// Move the needle by a signed step count and release the coils
    Jog {
        /// Steps to move: positive steps backward, negative steps forward
        #[arg(long, allow_hyphen_values = true)]
        steps: i64,
    },
}
