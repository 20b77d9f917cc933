//! Dial value → motor step mapping and wraparound step deltas.

/// Map a dial value to its step index on a ring of `motor_steps`.
///
/// `round(motor_steps / scale * dial_value) - 1`, rounded half away from zero,
/// then wrapped into `[0, motor_steps)`.
pub fn to_step_index(dial_value: f64, motor_steps: u32, scale: f64) -> u32 {
    let n = i64::from(motor_steps.max(1));
    let raw = (f64::from(motor_steps) / scale * dial_value).round() as i64 - 1;
    raw.rem_euclid(n) as u32
}

/// Signed step count that moves `from` onto `to` on a ring of `motor_steps`.
///
/// Exactly half a revolution resolves differently depending on which index is
/// larger: `steps_delta(0, 256, 512) == -256` but `steps_delta(256, 0, 512) == 256`.
/// Either way `(from + delta) mod motor_steps == to`.
pub fn steps_delta(from: u32, to: u32, motor_steps: u32) -> i64 {
    let (from, to, n) = (i64::from(from), i64::from(to), i64::from(motor_steps));
    if to >= from {
        if 2 * (to - from) < n {
            to - from
        } else {
            -(n - to + from)
        }
    } else if 2 * (from - to) < n {
        to - from
    } else {
        to - from + n
    }
}

/// Fixed linear dial geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMapper {
    pub motor_steps: u32,
    pub scale: f64,
}

impl StepMapper {
    pub fn new(motor_steps: u32, scale: f64) -> Self {
        Self { motor_steps, scale }
    }

    #[inline]
    pub fn step_index(&self, dial_value: f64) -> u32 {
        to_step_index(dial_value, self.motor_steps, self.scale)
    }

    #[inline]
    pub fn delta(&self, from: u32, to: u32) -> i64 {
        steps_delta(from, to, self.motor_steps)
    }

    /// Steps needed to move the needle from dial value `from` to dial value `to`.
    pub fn delta_between(&self, from: f64, to: f64) -> i64 {
        self.delta(self.step_index(from), self.step_index(to))
    }
}

impl Default for StepMapper {
    fn default() -> Self {
        Self::new(512, 133.3333)
    }
}
