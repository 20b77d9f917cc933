#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `weather_dial`: drives a stepper-motor needle to show a live weather metric.

mod cli;
mod error_fmt;
mod session;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use dial_core::error::DialError;
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn init_tracing(json: bool, level: &str) {
    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn load_config(cli: &Cli) -> Result<dial_config::Config> {
    dial_config::load_file(&cli.config)
        .map_err(|e| eyre::Report::new(DialError::Config(format!("{e:#}"))))
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = load_config(&cli)?;
    let json = cli.json;

    match cli.cmd {
        Commands::Run { max_ticks } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install interrupt handler")?;

            let summary = session::run_dial(&cfg, max_ticks, shutdown)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "ticks": summary.ticks,
                        "failures": summary.failures,
                        "parked_steps": summary.parked_steps,
                    })
                );
            } else {
                println!(
                    "parked after {} ticks ({} failed, {} steps to zero)",
                    summary.ticks, summary.failures, summary.parked_steps
                );
            }
        }
        Commands::SelfCheck => {
            let reading = session::self_check(&cfg)?;
            let metric = &cfg.observation.default_metric;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "metric": metric,
                        "value": reading.value,
                        "raw": reading.raw,
                        "observed_at": reading.observation.observed_at(),
                    })
                );
            } else {
                println!("ok: {metric} = {} ({})", reading.value, reading.raw);
            }
        }
        Commands::Jog { steps } => {
            let position = session::jog(&cfg, steps)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "steps": steps, "position": position })
                );
            } else {
                println!("jogged {steps} steps; coils released");
            }
        }
    }
    Ok(())
}

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    init_tracing(cli.json, &cli.log_level);

    if let Err(e) = real_main(cli) {
        tracing::error!(error = %e, "fatal");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}
