//! Open-loop step execution and logical position bookkeeping.

use std::sync::Arc;
use std::time::Duration;

use dial_traits::{Clock, CoilDriver};

use crate::coil::{CoilSequencer, Direction};
use crate::error::{DialError, Result};
use crate::hw_error::map_hw_error;

/// Drives the coils one step at a time and tracks where the rotor should be.
///
/// There is no feedback: `position` is only trustworthy because every step goes
/// through here. A backward step counts +1, a forward step −1, so
/// `move_steps(delta)` from `p` ends at `(p + delta) mod steps`.
pub struct MotionExecutor<D: CoilDriver> {
    driver: D,
    sequencer: CoilSequencer,
    motor_steps: u32,
    position: u32,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<D: CoilDriver> MotionExecutor<D> {
    pub fn new(driver: D, motor_steps: u32, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            driver,
            sequencer: CoilSequencer::new(),
            motor_steps: motor_steps.max(1),
            position: 0,
            clock,
        }
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub fn motor_steps(&self) -> u32 {
        self.motor_steps
    }

    pub fn sequencer(&self) -> &CoilSequencer {
        &self.sequencer
    }

    /// Issue one physical step, then wait `delay`.
    pub fn step_once(&mut self, dir: Direction, delay: Duration) -> Result<()> {
        let pattern = self.sequencer.advance(dir);
        if let Err(e) = self.driver.write_pattern(pattern.bits()) {
            // Roll the phase back so it keeps matching the last pattern actually written.
            self.sequencer.advance(match dir {
                Direction::Forward => Direction::Backward,
                Direction::Backward => Direction::Forward,
            });
            return Err(map_hw_error(e.as_ref()).into());
        }
        let (p, n) = (u64::from(self.position), u64::from(self.motor_steps));
        self.position = match dir {
            Direction::Backward => ((p + 1) % n) as u32,
            Direction::Forward => ((p + n - 1) % n) as u32,
        };
        self.clock.sleep(delay);
        Ok(())
    }

    /// Move a signed step count: `>= 0` steps backward, `< 0` steps forward.
    pub fn move_steps(&mut self, signed_steps: i64, delay: Duration) -> Result<()> {
        let dir = if signed_steps >= 0 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let count = signed_steps.unsigned_abs();
        if count > 0 {
            tracing::debug!(
                steps = signed_steps,
                delay_ms = delay.as_secs_f64() * 1000.0,
                from = self.position,
                "move"
            );
        }
        for _ in 0..count {
            self.step_once(dir, delay)?;
        }
        Ok(())
    }

    /// De-energize all coils.
    pub fn release(&mut self) -> Result<()> {
        self.driver
            .release()
            .map_err(|e| eyre::Report::new(DialError::HardwareFault(format!("release coils: {e}"))))
    }
}
