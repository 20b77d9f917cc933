use dial_core::position::{StepMapper, steps_delta, to_step_index};
use proptest::prelude::*;
use rstest::rstest;

const STEPS: u32 = 512;
const SCALE: f64 = 133.3333;

#[rstest]
#[case(0, 256, -256)]
#[case(256, 0, 256)]
#[case(10, 265, 255)]
#[case(265, 10, -255)]
#[case(0, 511, -1)]
#[case(511, 0, 1)]
#[case(100, 40, -60)]
#[case(40, 100, 60)]
fn delta_follows_branches_exactly(#[case] from: u32, #[case] to: u32, #[case] expected: i64) {
    assert_eq!(steps_delta(from, to, STEPS), expected);
}

#[test]
fn half_circle_boundary_is_direction_dependent() {
    // Same distance, opposite signs: a larger target goes backward the full half,
    // a smaller target goes forward the full half.
    assert_eq!(steps_delta(0, 256, 512), -256);
    assert_eq!(steps_delta(256, 0, 512), 256);
    assert_eq!(steps_delta(100, 356, 512), -256);
    assert_eq!(steps_delta(356, 100, 512), 256);
}

#[test]
fn odd_ring_compares_against_fractional_half() {
    // 3 < 7/2 goes direct, 4 does not.
    assert_eq!(steps_delta(0, 3, 7), 3);
    assert_eq!(steps_delta(0, 4, 7), -3);
    assert_eq!(steps_delta(4, 0, 7), 3);
}

#[rstest]
#[case(63.0, 241)]
#[case(0.0, 511)]
#[case(100.0, 383)]
#[case(133.3333, 511)]
fn step_index_examples(#[case] value: f64, #[case] expected: u32) {
    assert_eq!(to_step_index(value, STEPS, SCALE), expected);
}

#[test]
fn step_index_of_sixty_three_percent() {
    // round(512 / 133.3333 * 63) - 1 = round(241.92) - 1
    assert_eq!(StepMapper::new(STEPS, SCALE).step_index(63.0), 241);
}

#[test]
fn delta_between_dial_values() {
    let m = StepMapper::new(STEPS, SCALE);
    assert_eq!(m.delta_between(0.0, 63.0), 242);
    assert_eq!(m.delta_between(63.0, 0.0), -242);
    assert_eq!(m.delta_between(63.0, 63.0), 0);
}

proptest! {
    #[test]
    fn delta_lands_on_target(from in 0u32..STEPS, to in 0u32..STEPS) {
        let d = steps_delta(from, to, STEPS);
        prop_assert!(d.unsigned_abs() <= u64::from(STEPS));
        prop_assert_eq!((i64::from(from) + d).rem_euclid(i64::from(STEPS)), i64::from(to));
    }

    #[test]
    fn delta_never_exceeds_half_turn(from in 0u32..STEPS, to in 0u32..STEPS) {
        prop_assert!(steps_delta(from, to, STEPS).unsigned_abs() <= u64::from(STEPS / 2));
    }

    #[test]
    fn delta_to_self_is_zero(x in 0u32..STEPS, n in 2u32..4096) {
        let x = x % n;
        prop_assert_eq!(steps_delta(x, x, n), 0);
    }

    #[test]
    fn step_index_is_periodic_in_scale(v in 0.0f64..SCALE) {
        let pos = f64::from(STEPS) / SCALE * v;
        // Stay clear of rounding ties where float error could flip the result.
        prop_assume!((pos.fract() - 0.5).abs() > 1e-6);
        prop_assert_eq!(to_step_index(v + SCALE, STEPS, SCALE), to_step_index(v, STEPS, SCALE));
    }

    #[test]
    fn step_index_is_in_range(v in -1000.0f64..1000.0) {
        prop_assert!(to_step_index(v, STEPS, SCALE) < STEPS);
    }
}
