//! Pointer-driven speed curve authoring.
//!
//! The editor owns the [`SpeedCurve`] and a [`GraphLayout`] mapping the unit square to
//! canvas pixels (time left to right, speed bottom to top). Hit testing and drawing
//! share that one transform.

use tracing::debug;

use crate::curve::{ControlPoint, SpeedCurve};
use crate::fmt::{fmt_percent, fmt_seconds};
use crate::render::{Point, Rect, Surface, TextAlign, TextStyle};

/// Pick radius for control points, in pixels.
pub const HIT_RADIUS_PX: f64 = 12.0;
pub const GRAPH_PADDING_PX: f64 = 36.0;

const GRID_DIVISIONS: usize = 4;
const MARKER_RADIUS_PX: f64 = 5.0;

const BG: &str = "#0a0f1a";
const GRID: &str = "rgba(122, 162, 255, 0.12)";
const AXIS: &str = "rgba(229, 231, 235, 0.6)";
const RULER_TEXT: &str = "rgba(229, 231, 235, 0.75)";
const CURVE: &str = "#7aa2ff";
const MARKER: &str = "#fbbf24";
const MARKER_PINNED: &str = "#e5e7eb";
const MARKER_ACTIVE: &str = "#fb7185";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl GraphLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            padding: GRAPH_PADDING_PX,
        }
    }

    fn plot_size(&self) -> (f64, f64) {
        (
            (self.width - 2.0 * self.padding).max(1.0),
            (self.height - 2.0 * self.padding).max(1.0),
        )
    }

    /// Plot area inside the padding.
    pub fn plot_rect(&self) -> Rect {
        let (w, h) = self.plot_size();
        Rect::new(self.padding, self.padding, w, h)
    }

    pub fn to_screen(&self, time: f64, speed: f64) -> Point {
        let (w, h) = self.plot_size();
        Point::new(self.padding + time * w, self.padding + (1.0 - speed) * h)
    }

    /// Inverse of [`to_screen`](Self::to_screen), clamped into the unit square.
    pub fn to_graph(&self, x: f64, y: f64) -> (f64, f64) {
        let (w, h) = self.plot_size();
        let p = ControlPoint::new((x - self.padding) / w, 1.0 - (y - self.padding) / h);
        (p.time, p.speed)
    }
}

#[derive(Debug, Clone)]
pub struct CurveEditor {
    curve: SpeedCurve,
    layout: GraphLayout,
    duration_s: f64,
    drag: Option<usize>,
    dirty: bool,
}

impl CurveEditor {
    pub fn new(curve: SpeedCurve, layout: GraphLayout, duration_s: f64) -> Self {
        Self {
            curve,
            layout,
            duration_s,
            drag: None,
            dirty: true,
        }
    }

    pub fn curve(&self) -> &SpeedCurve {
        &self.curve
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Whether the visualization is stale.
    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn dragging(&self) -> Option<usize> {
        self.drag
    }

    pub fn set_layout(&mut self, layout: GraphLayout) {
        if layout != self.layout {
            self.layout = layout;
            self.dirty = true;
        }
    }

    /// Rescale the time ruler.
    pub fn set_duration_s(&mut self, duration_s: f64) {
        if duration_s != self.duration_s {
            self.duration_s = duration_s;
            self.dirty = true;
        }
    }

    /// Replace the whole curve (loaded settings).
    pub fn set_curve(&mut self, curve: SpeedCurve) {
        self.curve = curve;
        self.drag = None;
        self.dirty = true;
    }

    /// Closest point within [`HIT_RADIUS_PX`] of `(x, y)`.
    pub fn point_near(&self, x: f64, y: f64) -> Option<usize> {
        self.curve
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let s = self.layout.to_screen(p.time, p.speed);
                (i, (s.x - x).hypot(s.y - y))
            })
            .filter(|&(_, d)| d <= HIT_RADIUS_PX)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Add a point under the cursor unless one is already there.
    pub fn add_point(&mut self, x: f64, y: f64) -> Option<usize> {
        if self.point_near(x, y).is_some() {
            return None;
        }
        let (time, speed) = self.layout.to_graph(x, y);
        let index = self.curve.insert(ControlPoint::new(time, speed));
        self.dirty = true;
        Some(index)
    }

    pub fn move_point(&mut self, index: usize, x: f64, y: f64) -> bool {
        let (time, speed) = self.layout.to_graph(x, y);
        let moved = self.curve.move_to(index, time, speed);
        self.dirty |= moved;
        moved
    }

    /// Remove an interior point. Pinned endpoints are left alone.
    pub fn remove_point(&mut self, index: usize) -> bool {
        if !self.curve.remove(index) {
            debug!(index, points = self.curve.len(), "curve point removal rejected");
            return false;
        }
        if let Some(d) = self.drag {
            self.drag = match d.cmp(&index) {
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(d - 1),
                std::cmp::Ordering::Less => Some(d),
            };
        }
        self.dirty = true;
        true
    }

    pub fn reset(&mut self) {
        self.curve.reset();
        self.drag = None;
        self.dirty = true;
    }

    /// Primary press: grab the point under the cursor, or add one there and grab it.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> Option<usize> {
        self.drag = self.point_near(x, y).or_else(|| self.add_point(x, y));
        self.drag
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        match self.drag {
            Some(index) => self.move_point(index, x, y),
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Secondary press / double click.
    pub fn remove_near(&mut self, x: f64, y: f64) -> bool {
        match self.point_near(x, y) {
            Some(index) => self.remove_point(index),
            None => false,
        }
    }

    /// Grid, rulers, the curve through its sorted points, then the markers.
    pub fn render<S: Surface>(&mut self, surface: &mut S) {
        let layout = self.layout;
        let plot = layout.plot_rect();
        surface.clear();
        surface.fill_rect(Rect::new(0.0, 0.0, layout.width, layout.height), BG);

        let ruler = |align| TextStyle {
            color: RULER_TEXT,
            font_px: 11.0,
            bold: false,
            align,
        };
        for i in 0..=GRID_DIVISIONS {
            let f = i as f64 / GRID_DIVISIONS as f64;
            let x = plot.x + plot.width * f;
            let y = plot.y + plot.height * (1.0 - f);
            surface.line(Point::new(x, plot.y), Point::new(x, plot.y + plot.height), GRID, 1.0);
            surface.line(Point::new(plot.x, y), Point::new(plot.x + plot.width, y), GRID, 1.0);
            surface.text(
                &fmt_seconds(f * self.duration_s),
                Point::new(x, plot.y + plot.height + 14.0),
                0.0,
                &ruler(TextAlign::Center),
            );
            surface.text(
                &fmt_percent(f),
                Point::new(plot.x - 6.0, y),
                0.0,
                &ruler(TextAlign::Right),
            );
        }

        let origin = Point::new(plot.x, plot.y + plot.height);
        surface.line(origin, Point::new(plot.x + plot.width, origin.y), AXIS, 1.5);
        surface.line(origin, Point::new(plot.x, plot.y), AXIS, 1.5);

        let line: Vec<Point> = self
            .curve
            .sorted_points()
            .iter()
            .map(|p| layout.to_screen(p.time, p.speed))
            .collect();
        surface.polyline(&line, CURVE, 2.0);

        for (i, p) in self.curve.points().iter().enumerate() {
            let fill = if self.drag == Some(i) {
                MARKER_ACTIVE
            } else if self.curve.is_pinned(i) {
                MARKER_PINNED
            } else {
                MARKER
            };
            surface.circle(layout.to_screen(p.time, p.speed), MARKER_RADIUS_PX, fill, Some(BG));
        }
        self.dirty = false;
    }
}
