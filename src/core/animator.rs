//! Spin sessions: Idle -> Spinning -> Idle.
//!
//! The animator owns the render rotation. While a session is active each frame maps
//! elapsed time through the speed curve's normalized integral; once progress reaches
//! 1 the rotation freezes at `start + total` and the session is dropped.

use thiserror::Error;
use tracing::debug;

use crate::curve::SpeedCurve;
use crate::rng::SpinRandom;

pub const DEFAULT_MIN_TURNS: f64 = 6.0;
pub const DEFAULT_MAX_TURNS: f64 = 10.0;

/// Largest unit sample used, so an injected source returning 1.0 stays in range.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Spinning,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpinRejected {
    #[error("the wheel has no entries")]
    NoEntries,
    #[error("a spin is already in progress")]
    AlreadySpinning,
}

/// Full turns per spin, sampled uniformly from `[min_turns, max_turns)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRange {
    pub min_turns: f64,
    pub max_turns: f64,
}

impl Default for TurnRange {
    fn default() -> Self {
        Self {
            min_turns: DEFAULT_MIN_TURNS,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl TurnRange {
    /// Swaps reversed bounds and floors both at zero.
    pub fn new(min_turns: f64, max_turns: f64) -> Self {
        let a = if min_turns.is_finite() { min_turns.max(0.0) } else { 0.0 };
        let b = if max_turns.is_finite() { max_turns.max(0.0) } else { a };
        Self {
            min_turns: a.min(b),
            max_turns: a.max(b),
        }
    }

    /// Total rotation in degrees for a unit sample `u` in `[0, 1)`.
    pub fn degrees_for(&self, u: f64) -> f64 {
        let u = if u.is_finite() { u.clamp(0.0, MAX_UNIT) } else { 0.0 };
        let deg = 360.0 * (self.min_turns + (self.max_turns - self.min_turns) * u);
        let hi = 360.0 * self.max_turns;
        if self.max_turns > self.min_turns && deg >= hi {
            // u close to 1 rounds up to the bound; stay one ulp under it.
            return f64::from_bits(hi.to_bits() - 1);
        }
        deg
    }
}

/// One spin, from command to completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSession {
    pub start_rotation_deg: f64,
    pub total_rotation_deg: f64,
    pub start_time_ms: f64,
    pub duration_ms: f64,
}

impl SpinSession {
    /// Elapsed fraction, clamped to `[0, 1]`. A non-positive duration is already done.
    pub fn progress_at(&self, now_ms: f64) -> f64 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        ((now_ms - self.start_time_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn rotation_at(&self, curve: &SpeedCurve, progress: f64) -> f64 {
        self.start_rotation_deg + self.total_rotation_deg * curve.normalized_position_at(progress)
    }

    pub fn end_rotation_deg(&self) -> f64 {
        self.start_rotation_deg + self.total_rotation_deg
    }
}

/// Result of advancing an active session by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorFrame {
    pub rotation_deg: f64,
    pub progress: f64,
    /// True on the frame that ended the session.
    pub finished: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SpinAnimator {
    rotation_deg: f64,
    session: Option<SpinSession>,
    turns: TurnRange,
}

impl SpinAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turns(turns: TurnRange) -> Self {
        Self {
            turns,
            ..Self::default()
        }
    }

    pub fn set_turns(&mut self, turns: TurnRange) {
        self.turns = turns;
    }

    pub fn turns(&self) -> TurnRange {
        self.turns
    }

    pub fn state(&self) -> SpinState {
        if self.session.is_some() {
            SpinState::Spinning
        } else {
            SpinState::Idle
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_some()
    }

    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    /// Set the rotation directly. Ignored while spinning.
    pub fn set_rotation(&mut self, deg: f64) -> bool {
        if self.is_spinning() || !deg.is_finite() {
            return false;
        }
        self.rotation_deg = deg;
        true
    }

    /// Begin a session from the current rotation.
    pub fn start(
        &mut self,
        now_ms: f64,
        duration_ms: f64,
        entry_count: usize,
        rng: &mut impl SpinRandom,
    ) -> Result<SpinSession, SpinRejected> {
        if self.is_spinning() {
            debug!("spin rejected: already spinning");
            return Err(SpinRejected::AlreadySpinning);
        }
        if entry_count == 0 {
            debug!("spin rejected: no entries");
            return Err(SpinRejected::NoEntries);
        }
        let total_rotation_deg = self.turns.degrees_for(rng.next_unit());
        let session = SpinSession {
            start_rotation_deg: self.rotation_deg,
            total_rotation_deg,
            start_time_ms: now_ms,
            duration_ms,
        };
        debug!(
            turns = total_rotation_deg / 360.0,
            duration_ms, entry_count, "spin started"
        );
        self.session = Some(session);
        Ok(session)
    }

    /// Move the active session to `now_ms`. `None` while idle.
    ///
    /// The curve is read live, so edits made mid-spin show up on the next frame.
    pub fn advance(&mut self, now_ms: f64, curve: &SpeedCurve) -> Option<AnimatorFrame> {
        let session = self.session?;
        let progress = session.progress_at(now_ms);
        self.rotation_deg = session.rotation_at(curve, progress);
        let finished = progress >= 1.0;
        if finished {
            self.session = None;
        }
        Some(AnimatorFrame {
            rotation_deg: self.rotation_deg,
            progress,
            finished,
        })
    }

    /// Drop the active session without finishing it; the rotation stays where it is.
    pub fn abandon(&mut self) -> Option<SpinSession> {
        let session = self.session.take();
        if session.is_some() {
            debug!(rotation_deg = self.rotation_deg, "spin abandoned");
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::ControlPoint;
    use crate::rng::Prng;

    #[test]
    fn spin_needs_entries_and_idle_state() {
        let mut a = SpinAnimator::new();
        let mut rng = Prng::new(1);
        assert_eq!(
            a.start(0.0, 1000.0, 0, &mut rng),
            Err(SpinRejected::NoEntries)
        );
        assert_eq!(a.state(), SpinState::Idle);

        a.start(0.0, 1000.0, 3, &mut rng).unwrap();
        assert_eq!(a.state(), SpinState::Spinning);
        assert_eq!(
            a.start(10.0, 1000.0, 3, &mut rng),
            Err(SpinRejected::AlreadySpinning)
        );
    }

    #[test]
    fn total_rotation_is_six_to_ten_turns() {
        let mut rng = Prng::new(99);
        for _ in 0..500 {
            let mut a = SpinAnimator::new();
            let s = a.start(0.0, 1000.0, 2, &mut rng).unwrap();
            assert!(s.total_rotation_deg >= 2160.0 && s.total_rotation_deg < 3600.0);
        }
        let range = TurnRange::default();
        assert_eq!(range.degrees_for(0.0), 2160.0);
        assert!(range.degrees_for(1.0) < 3600.0);
        assert!(range.degrees_for(1.0 - 2f64.powi(-53)) < 3600.0);
        assert!(range.degrees_for(1.0 - 2f64.powi(-53)) > 3599.0);
        assert_eq!(TurnRange::new(4.0, 4.0).degrees_for(1.0), 1440.0);
    }

    #[test]
    fn session_samples_follow_the_curve() {
        let curve = SpeedCurve::default();
        let session = SpinSession {
            start_rotation_deg: 30.0,
            total_rotation_deg: 2880.0,
            start_time_ms: 1000.0,
            duration_ms: 2000.0,
        };
        let p0 = session.rotation_at(&curve, session.progress_at(1000.0));
        let p5 = session.rotation_at(&curve, session.progress_at(2000.0));
        let p1 = session.rotation_at(&curve, session.progress_at(3000.0));
        assert_eq!(p0, 30.0);
        assert_eq!(p5, 30.0 + 2880.0 * curve.normalized_position_at(0.5));
        assert_eq!(p1, 30.0 + 2880.0);
        assert!(p0 <= p5 && p5 <= p1);
    }

    #[test]
    fn finishing_freezes_rotation_at_the_end() {
        let curve = SpeedCurve::default();
        let mut a = SpinAnimator::new();
        a.set_rotation(45.0);
        let s = a.start(0.0, 500.0, 4, &mut || 0.5).unwrap();
        assert_eq!(s.start_rotation_deg, 45.0);

        let mid = a.advance(250.0, &curve).unwrap();
        assert!(!mid.finished);
        let end = a.advance(900.0, &curve).unwrap();
        assert!(end.finished);
        assert_eq!(end.progress, 1.0);
        assert_eq!(end.rotation_deg, s.end_rotation_deg());
        assert_eq!(a.rotation_deg(), s.end_rotation_deg());
        assert!(a.advance(1000.0, &curve).is_none());
    }

    #[test]
    fn spins_compose_from_the_previous_rotation() {
        let curve = SpeedCurve::default();
        let mut a = SpinAnimator::new();
        let first = a.start(0.0, 100.0, 3, &mut || 0.0).unwrap();
        a.advance(100.0, &curve);
        let second = a.start(200.0, 100.0, 3, &mut || 0.0).unwrap();
        assert_eq!(second.start_rotation_deg, first.end_rotation_deg());
    }

    #[test]
    fn zero_duration_finishes_on_the_first_frame() {
        let curve = SpeedCurve::default();
        let mut a = SpinAnimator::new();
        a.start(0.0, 0.0, 3, &mut || 0.3).unwrap();
        let f = a.advance(0.0, &curve).unwrap();
        assert!(f.finished);
    }

    #[test]
    fn all_zero_curve_does_not_move_but_still_finishes() {
        let curve = SpeedCurve::from_points(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(1.0, 0.0),
        ])
        .unwrap();
        let mut a = SpinAnimator::new();
        a.set_rotation(12.0);
        a.start(0.0, 100.0, 3, &mut || 0.9).unwrap();
        assert_eq!(a.advance(50.0, &curve).unwrap().rotation_deg, 12.0);
        let end = a.advance(100.0, &curve).unwrap();
        assert!(end.finished);
        assert_eq!(end.rotation_deg, 12.0);
    }

    #[test]
    fn manual_rotation_is_ignored_while_spinning() {
        let mut a = SpinAnimator::new();
        assert!(a.set_rotation(90.0));
        a.start(0.0, 100.0, 2, &mut || 0.1).unwrap();
        assert!(!a.set_rotation(10.0));
        assert_eq!(a.rotation_deg(), 90.0);
    }

    #[test]
    fn abandon_ends_the_session_without_finishing() {
        let curve = SpeedCurve::default();
        let mut a = SpinAnimator::new();
        a.start(0.0, 1000.0, 2, &mut || 0.1).unwrap();
        a.advance(300.0, &curve);
        let at = a.rotation_deg();
        assert!(a.abandon().is_some());
        assert_eq!(a.state(), SpinState::Idle);
        assert_eq!(a.rotation_deg(), at);
        assert!(a.abandon().is_none());
    }

    #[test]
    fn turn_range_normalizes_bounds() {
        let r = TurnRange::new(10.0, 6.0);
        assert_eq!((r.min_turns, r.max_turns), (6.0, 10.0));
        let r = TurnRange::new(-2.0, f64::NAN);
        assert_eq!((r.min_turns, r.max_turns), (0.0, 0.0));
    }
}
