//! Outcome of one control-loop tick.

use crate::coil::Direction;
use crate::error::ObservationError;

/// Jog speed picked from how long the button has been held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JogSpeed {
    Slow,
    Normal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickStatus {
    /// A button is held; one step was taken.
    Jogged { direction: Direction, speed: JogSpeed },
    /// Buttons released, quiet period still running.
    Pending,
    /// Quiet period elapsed; needle moved from the zero reference to the last target.
    Reindicated { steps: i64 },
    /// Auto mode tick; `steps` may be zero when nothing changed.
    Indicated { steps: i64, fetched: bool },
    /// Auto mode but nothing to indicate yet.
    Idle,
    /// Observation could not be obtained; motor untouched, loop should back off.
    BackOff(ObservationError),
    /// Needle already parked and coils released.
    Parked,
}
