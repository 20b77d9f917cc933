//! Four-phase coil sequencing for a unipolar stepper.
//!
//! Pattern bits map to outputs as 1 = A1, 2 = A2, 4 = B1, 8 = B2. The ring is
//! 5 → 6 → 10 → 9 → 5 going forward; each entry names its neighbours, so the
//! order is never derived from the pattern values.

/// 4-bit coil drive mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilPattern(u8);

impl CoilPattern {
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Levels in output order A1, A2, B1, B2.
    pub const fn levels(self) -> [bool; 4] {
        [
            self.0 & 1 != 0,
            self.0 & 2 != 0,
            self.0 & 4 != 0,
            self.0 & 8 != 0,
        ]
    }
}

#[derive(Debug, Clone, Copy)]
struct Phase {
    pattern: CoilPattern,
    next: usize,
    previous: usize,
}

const PHASES: [Phase; 4] = [
    Phase {
        pattern: CoilPattern(5),
        next: 1,
        previous: 3,
    },
    Phase {
        pattern: CoilPattern(6),
        next: 2,
        previous: 0,
    },
    Phase {
        pattern: CoilPattern(10),
        next: 3,
        previous: 1,
    },
    Phase {
        pattern: CoilPattern(9),
        next: 0,
        previous: 2,
    },
];

/// Physical rotation sense of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Holds the current coil phase; moves only along the table's links.
#[derive(Debug, Clone, Default)]
pub struct CoilSequencer {
    phase: usize,
}

impl CoilSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> usize {
        self.phase
    }

    #[inline]
    pub fn pattern(&self) -> CoilPattern {
        PHASES[self.phase].pattern
    }

    pub fn current(&self) -> (usize, CoilPattern) {
        (self.phase, self.pattern())
    }

    pub fn advance_forward(&mut self) -> CoilPattern {
        self.phase = PHASES[self.phase].next;
        self.pattern()
    }

    pub fn advance_backward(&mut self) -> CoilPattern {
        self.phase = PHASES[self.phase].previous;
        self.pattern()
    }

    pub fn advance(&mut self, dir: Direction) -> CoilPattern {
        match dir {
            Direction::Forward => self.advance_forward(),
            Direction::Backward => self.advance_backward(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_form_a_closed_ring() {
        for (i, p) in PHASES.iter().enumerate() {
            assert_eq!(PHASES[p.next].previous, i);
            assert_eq!(PHASES[p.previous].next, i);
        }
    }

    #[test]
    fn every_pattern_energizes_one_half_of_each_winding() {
        for p in PHASES {
            let [a1, a2, b1, b2] = p.pattern.levels();
            assert!(a1 ^ a2, "pattern {} drives A1/A2 together", p.pattern.bits());
            assert!(b1 ^ b2, "pattern {} drives B1/B2 together", p.pattern.bits());
        }
    }
}
