//! Duration helpers for config values given as floating point.

use std::time::Duration;

/// Convert fractional milliseconds to a Duration; non-finite or negative → zero.
#[inline]
pub fn millis_f64(ms: f64) -> Duration {
    secs_f64(ms / 1000.0)
}

/// Convert fractional seconds to a Duration; non-finite or negative → zero.
#[inline]
pub fn secs_f64(s: f64) -> Duration {
    if s.is_finite() && s > 0.0 {
        Duration::try_from_secs_f64(s).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
