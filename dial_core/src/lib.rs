#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core dial logic (hardware-agnostic).
//!
//! All hardware interactions go through the `dial_traits` traits.
//!
//! ## Architecture
//!
//! - **Coils**: four-phase sequencing with explicit neighbour links (`coil`)
//! - **Position**: dial value → step index and wraparound deltas (`position`)
//! - **Motion**: open-loop stepping and logical position (`motion`)
//! - **Observation**: fetch and parse of the weather metric (`observation`)
//! - **Controller**: Manual / ReturnPending / Auto state machine (`controller`)
//! - **Runner**: paced loop with back-off and park-on-shutdown (`runner`)
//! - **Journal**: age-rotated operator log (`logger`)

pub mod coil;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod hw_error;
pub mod logger;
pub mod mocks;
pub mod motion;
pub mod observation;
pub mod position;
pub mod runner;
pub mod status;
pub mod util;

pub use coil::{CoilPattern, CoilSequencer, Direction};
pub use config::{MotorCfg, RunnerCfg, TimingCfg};
pub use controller::{ButtonTimers, Controller, ControllerBuilder, ControllerState, Mode};
pub use error::{BuildError, DialError, ObservationError};
pub use logger::{Logger, MemoryLogger, NullLogger, RotatingFileLogger};
pub use motion::MotionExecutor;
pub use observation::{Observation, ObservationPoller, Reading, parse_metric, resolve};
pub use position::{StepMapper, steps_delta, to_step_index};
pub use runner::{RunSummary, run};
pub use status::{JogSpeed, TickStatus};
