//! Speed curve model.
//!
//! A curve is a list of `(time, speed)` control points in the unit square. Time runs
//! across the spin (0 = start, 1 = end) and speed is the relative angular speed at
//! that moment. The wheel's rotation is the normalized integral of this curve, so
//! the shape of the curve *is* the deceleration profile.
//!
//! Storage order is authoring order with one rule: the pinned `time = 0` point is
//! stored first and the pinned `time = 1` point is stored last. Interior points are
//! kept wherever they were inserted; lookups sort by `time` on read.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Midpoint quadrature steps, shared by the partial and the total integral.
pub const QUADRATURE_STEPS: usize = 100;

/// Fast start, slowing through the middle, near-stop at the end.
pub const DEFAULT_POINTS: [(f64, f64); 5] = [
    (0.0, 1.0),
    (0.15, 0.7),
    (0.5, 0.3),
    (0.85, 0.1),
    (1.0, 0.0),
];

#[inline]
fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlPoint {
    pub time: f64,
    pub speed: f64,
}

impl ControlPoint {
    /// Build a point, clamping both coordinates into `[0, 1]`.
    pub fn new(time: f64, speed: f64) -> Self {
        Self {
            time: clamp01(time),
            speed: clamp01(speed),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("curve needs at least 2 control points, got {0}")]
    TooFewPoints(usize),
    #[error("control point {index} is outside the unit square (time={time}, speed={speed})")]
    OutOfRange { index: usize, time: f64, speed: f64 },
    #[error("first control point must sit at time 0, found {0}")]
    FirstNotPinned(f64),
    #[error("last control point must sit at time 1, found {0}")]
    LastNotPinned(f64),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<ControlPoint>", into = "Vec<ControlPoint>")
)]
pub struct SpeedCurve {
    points: Vec<ControlPoint>,
}

impl Default for SpeedCurve {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS
                .iter()
                .map(|&(t, s)| ControlPoint::new(t, s))
                .collect(),
        }
    }
}

impl TryFrom<Vec<ControlPoint>> for SpeedCurve {
    type Error = CurveError;

    fn try_from(points: Vec<ControlPoint>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<SpeedCurve> for Vec<ControlPoint> {
    fn from(curve: SpeedCurve) -> Self {
        curve.points
    }
}

impl SpeedCurve {
    /// Validate a stored point list (pinned endpoints first/last, values in range).
    pub fn from_points(points: Vec<ControlPoint>) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }
        for (index, p) in points.iter().enumerate() {
            let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
            if !in_range(p.time) || !in_range(p.speed) {
                return Err(CurveError::OutOfRange {
                    index,
                    time: p.time,
                    speed: p.speed,
                });
            }
        }
        let first = points[0].time;
        if first != 0.0 {
            return Err(CurveError::FirstNotPinned(first));
        }
        let last = points[points.len() - 1].time;
        if last != 1.0 {
            return Err(CurveError::LastNotPinned(last));
        }
        Ok(Self { points })
    }

    /// Points in storage (authoring) order.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `index` addresses one of the two boundary points.
    pub fn is_pinned(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }

    /// Points sorted by `time`. The sort is stable, so the pinned endpoints stay
    /// outermost even when an interior point is dragged onto a boundary.
    pub fn sorted_points(&self) -> Vec<ControlPoint> {
        let mut sorted = self.points.clone();
        sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
        sorted
    }

    /// Linear interpolation between the two points bracketing `t`.
    ///
    /// Callers clamp `t`; outside the covered range the nearest endpoint speed holds.
    pub fn speed_at(&self, t: f64) -> f64 {
        speed_on(&self.sorted_points(), t)
    }

    /// Area under the curve over `[0, 1]` using midpoint quadrature.
    pub fn total_area(&self) -> f64 {
        let samples = quadrature_samples(&self.sorted_points());
        samples.iter().sum()
    }

    /// Fraction of the full rotation reached at normalized time `t`.
    ///
    /// `0` at `t = 0` and exactly `1` at `t = 1` whenever the curve has any area.
    /// An all-zero curve falls back to a unit denominator and never moves.
    pub fn normalized_position_at(&self, t: f64) -> f64 {
        let samples = quadrature_samples(&self.sorted_points());
        let total: f64 = samples.iter().sum();
        let denominator = if total > 0.0 { total } else { 1.0 };
        partial_area(&samples, t) / denominator
    }

    /// Insert an interior point just before the pinned last point; returns its index.
    pub fn insert(&mut self, point: ControlPoint) -> usize {
        let index = self.points.len().saturating_sub(1);
        self.points.insert(index, point);
        index
    }

    /// Move a point, keeping pinned points on their boundary.
    pub fn move_to(&mut self, index: usize, time: f64, speed: f64) -> bool {
        let last = self.points.len().saturating_sub(1);
        let Some(point) = self.points.get_mut(index) else {
            return false;
        };
        let time = if index == 0 {
            0.0
        } else if index == last {
            1.0
        } else {
            time
        };
        *point = ControlPoint::new(time, speed);
        true
    }

    /// Remove an interior point. Pinned points and bad indices are left alone.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.points.len() || self.is_pinned(index) {
            return false;
        }
        self.points.remove(index);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn speed_on(sorted: &[ControlPoint], t: f64) -> f64 {
    let Some(first) = sorted.first() else {
        return 0.0;
    };
    if t <= first.time {
        return first.speed;
    }
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.time {
            let span = b.time - a.time;
            if span <= 0.0 {
                return b.speed;
            }
            return a.speed + (b.speed - a.speed) * (t - a.time) / span;
        }
    }
    sorted[sorted.len() - 1].speed
}

/// One `speed * dt` term per quadrature step, evaluated at the step midpoint.
fn quadrature_samples(sorted: &[ControlPoint]) -> [f64; QUADRATURE_STEPS] {
    let dt = 1.0 / QUADRATURE_STEPS as f64;
    let mut samples = [0.0; QUADRATURE_STEPS];
    for (i, slot) in samples.iter_mut().enumerate() {
        let mid = (i as f64 + 0.5) * dt;
        *slot = speed_on(sorted, mid) * dt;
    }
    samples
}

/// Sum of the steps below `t`, plus the covered fraction of the step containing it.
fn partial_area(samples: &[f64; QUADRATURE_STEPS], t: f64) -> f64 {
    let scaled = t * QUADRATURE_STEPS as f64;
    // Also rejects NaN.
    if !(scaled > 0.0) {
        return 0.0;
    }
    if scaled >= QUADRATURE_STEPS as f64 {
        return samples.iter().sum();
    }
    let full = scaled.floor() as usize;
    let covered: f64 = samples[..full].iter().sum();
    covered + samples[full] * (scaled - full as f64)
}
