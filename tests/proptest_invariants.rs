//! Property-based invariants for the curve and the pointer read-out.
//!
//! 1. normalized position is 0 at t=0 and exactly 1 at t=1 for curves with area.
//! 2. normalized position never decreases.
//! 3. the selected index is always in range.
//! 4. whole turns never change the selection.
//! 5. the magnifier center row always shows the selected entry.

use proptest::prelude::*;
use wheelspin::curve::{ControlPoint, SpeedCurve};
use wheelspin::magnifier::rows_for;
use wheelspin::selection::{read_pointer, selected_index};

fn interior_points(max_len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec((0.0f64..=1.0, 0.0f64..=1.0), 0..=max_len)
}

fn curve_from(start: f64, end: f64, interior: &[(f64, f64)]) -> SpeedCurve {
    let mut curve = SpeedCurve::from_points(vec![
        ControlPoint::new(0.0, start),
        ControlPoint::new(1.0, end),
    ])
    .unwrap();
    for &(t, s) in interior {
        curve.insert(ControlPoint::new(t, s));
    }
    curve
}

proptest! {
    #[test]
    fn endpoints_are_zero_and_one(
        start in 0.01f64..=1.0,
        end in 0.0f64..=1.0,
        interior in interior_points(8),
    ) {
        let curve = curve_from(start, end, &interior);
        prop_assume!(curve.total_area() > 0.0);
        prop_assert_eq!(curve.normalized_position_at(0.0), 0.0);
        prop_assert_eq!(curve.normalized_position_at(1.0), 1.0);
    }

    #[test]
    fn position_is_non_decreasing(
        start in 0.0f64..=1.0,
        end in 0.0f64..=1.0,
        interior in interior_points(8),
    ) {
        let curve = curve_from(start, end, &interior);
        let mut prev = 0.0;
        for k in 0..=400 {
            let p = curve.normalized_position_at(k as f64 / 400.0);
            prop_assert!(p >= prev, "position fell from {} to {} at step {}", prev, p, k);
            prop_assert!((0.0..=1.0).contains(&p));
            prev = p;
        }
    }

    #[test]
    fn selection_stays_in_range(rot in -1.0e6f64..1.0e6, n in 1usize..500) {
        prop_assert!(selected_index(rot, n) < n);
    }

    #[test]
    fn whole_turns_do_not_change_selection(rot in 0.0f64..360.0, n in 1usize..64, k in -20i32..20) {
        // Stay away from slice boundaries where adding 360k can round across.
        let slice = 360.0 / n as f64;
        let within = (360.0 - rot) % slice;
        prop_assume!(within > 1e-6 && slice - within > 1e-6);
        prop_assert_eq!(selected_index(rot + 360.0 * k as f64, n), selected_index(rot, n));
    }

    #[test]
    fn magnifier_center_is_the_selection(rot in -1.0e4f64..1.0e4, n in 1usize..200) {
        let reading = read_pointer(rot, n).unwrap();
        let rows = rows_for(&reading, n, 0.0, 24.0, 4);
        let center = rows.iter().find(|r| r.offset == 0).unwrap();
        prop_assert_eq!(center.entry_index, selected_index(rot, n));
        prop_assert!(rows.iter().all(|r| r.entry_index < n));
    }
}
