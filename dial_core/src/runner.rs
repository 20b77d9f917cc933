//! The control loop: tick, pace, back off, and park on shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dial_traits::Clock;

use crate::config::RunnerCfg;
use crate::controller::Controller;
use crate::error::Result;
use crate::status::TickStatus;

/// Longest single sleep between shutdown checks while pausing.
const PAUSE_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Ticks that ended in a back-off (observation or unexpected failure).
    pub failures: u64,
    /// Steps taken by the final park move.
    pub parked_steps: i64,
}

/// Sleep `d` in slices, returning early once `shutdown` is set.
fn pause(clock: &dyn Clock, d: Duration, shutdown: &AtomicBool) {
    let mut left = d;
    while !left.is_zero() && !shutdown.load(Ordering::Relaxed) {
        let slice = left.min(PAUSE_SLICE);
        clock.sleep(slice);
        left -= slice;
    }
}

/// Run until `shutdown` is set, then park the needle and release the coils.
///
/// Failed ticks never end the loop; they are journaled and followed by
/// `cfg.backoff`. Parking runs exactly once on the way out.
pub fn run(controller: &mut Controller, cfg: &RunnerCfg, shutdown: &AtomicBool) -> Result<RunSummary> {
    let clock = controller.clock();
    let mut summary = RunSummary::default();
    tracing::info!(mode = ?controller.mode(), "control loop start");

    while !shutdown.load(Ordering::Relaxed) {
        summary.ticks += 1;
        match controller.tick() {
            Ok(TickStatus::Jogged { .. }) => {}
            Ok(TickStatus::Pending) => pause(&*clock, cfg.pending_poll, shutdown),
            Ok(TickStatus::Indicated { .. } | TickStatus::Reindicated { .. } | TickStatus::Idle) => {
                pause(&*clock, cfg.idle, shutdown)
            }
            Ok(TickStatus::BackOff(e)) => {
                summary.failures += 1;
                tracing::warn!(error = %e, backoff_s = cfg.backoff.as_secs(), "backing off");
                pause(&*clock, cfg.backoff, shutdown);
            }
            Ok(TickStatus::Parked) => break,
            Err(e) => {
                summary.failures += 1;
                tracing::error!(error = %e, "tick failed");
                controller.journal(&format!("An error occurred: {e}"));
                pause(&*clock, cfg.backoff, shutdown);
            }
        }
    }

    tracing::info!(ticks = summary.ticks, "shutdown requested");
    summary.parked_steps = controller.park()?;
    controller.journal("parked");
    Ok(summary)
}
