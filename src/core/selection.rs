//! Pointer read-out.
//!
//! The pointer is fixed at angle 0 (east). The wheel cache is drawn with slice 0
//! starting at angle 0 and composited rotated by `rotation_deg` in the drawing
//! surface's own angle direction, so the unrotated wheel angle sitting under the
//! pointer is `360 - rotation`.
//!
//! [`read_pointer`] is the only place this is computed. The magnifier, the live
//! label and the spin outcome all go through it.

/// Normalize any angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let n = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

/// Angular width of one slice.
#[inline]
pub fn slice_width_deg(entry_count: usize) -> f64 {
    360.0 / entry_count as f64
}

/// What the pointer sees at a given rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerReading {
    /// Entry under the pointer.
    pub index: usize,
    /// Unrotated wheel angle under the pointer, in `[0, 360)`.
    pub pointer_angle_deg: f64,
    /// How far the pointer has travelled through the current slice
    /// (0 = just entered, 1 = about to leave). Only the magnifier uses this.
    pub segment_progress: f64,
}

/// Read the pointer for `entry_count` slices. `None` for an empty wheel.
pub fn read_pointer(rotation_deg: f64, entry_count: usize) -> Option<PointerReading> {
    if entry_count == 0 {
        return None;
    }
    let normalized = normalize_degrees(rotation_deg);
    let pointer_angle_deg = (360.0 - normalized) % 360.0;
    let slice = slice_width_deg(entry_count);
    let index = ((pointer_angle_deg / slice).floor() as usize) % entry_count;
    let segment_progress = 1.0 - (pointer_angle_deg % slice) / slice;
    Some(PointerReading {
        index,
        pointer_angle_deg,
        segment_progress,
    })
}

/// Index of the entry under the pointer.
///
/// Hosts never ask about an empty wheel; `0` is returned if they do.
pub fn selected_index(rotation_deg: f64, entry_count: usize) -> usize {
    read_pointer(rotation_deg, entry_count).map_or(0, |r| r.index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_selects_slice_zero() {
        for n in 1..12 {
            assert_eq!(selected_index(0.0, n), 0);
        }
    }

    #[test]
    fn quarter_turns_on_four_entries() {
        assert_eq!(selected_index(0.0, 4), 0);
        assert_eq!(selected_index(90.0, 4), 3);
        assert_eq!(selected_index(180.0, 4), 2);
        assert_eq!(selected_index(270.0, 4), 1);
    }

    #[test]
    fn just_past_a_boundary_moves_to_the_previous_slice() {
        // Rotating forward walks slice indices downward.
        assert_eq!(selected_index(0.5, 4), 3);
        assert_eq!(selected_index(89.5, 4), 3);
        assert_eq!(selected_index(90.5, 4), 2);
    }

    #[test]
    fn wraps_full_turns_and_negative_angles() {
        for k in [-3_i32, -1, 1, 2, 9] {
            let extra = 360.0 * k as f64;
            assert_eq!(selected_index(123.0 + extra, 7), selected_index(123.0, 7));
        }
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn segment_progress_runs_from_zero_to_one_inside_a_slice() {
        let start = read_pointer(0.0, 4).unwrap();
        assert_eq!(start.segment_progress, 1.0);
        let entered = read_pointer(1.0, 4).unwrap();
        assert!(entered.segment_progress < 0.02);
        let half = read_pointer(45.0, 4).unwrap();
        assert!((half.segment_progress - 0.5).abs() < 1e-12);
        assert_eq!(half.index, 3);
    }

    #[test]
    fn empty_wheel_has_no_reading() {
        assert!(read_pointer(10.0, 0).is_none());
        assert_eq!(selected_index(10.0, 0), 0);
    }

    #[test]
    fn single_entry_is_always_selected() {
        for r in [0.0, 17.0, 359.9, 1e6] {
            assert_eq!(selected_index(r, 1), 0);
        }
    }
}
