//! Immediate-mode drawing interface and the two-pass wheel renderer.
//!
//! Angles are in degrees and follow the surface's own convention (on a y-down
//! canvas, positive angles turn clockwise). Colors are CSS color strings.
//!
//! The renderer paints every slice once into an offscreen layer (the cache pass)
//! and then, per frame, only blits that layer rotated, draws the pointer and the
//! magnifier (the frame pass). The cache is rebuilt when the entries or the layout
//! size change, never because the rotation changed.

use thiserror::Error;
use tracing::trace;

use crate::entry::WheelEntry;
use crate::magnifier::{self, MagnifierRow};
use crate::selection::{read_pointer, slice_width_deg, PointerReading};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` along `angle_deg`.
    pub fn polar(self, radius: f64, angle_deg: f64) -> Self {
        let a = angle_deg.to_radians();
        Self::new(self.x + radius * a.cos(), self.y + radius * a.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub color: &'a str,
    pub font_px: f64,
    pub bold: bool,
    pub align: TextAlign,
}

/// Minimal immediate-mode drawing surface.
pub trait Surface {
    fn size(&self) -> (f64, f64);
    /// Reset every pixel to transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64);
    fn line(&mut self, from: Point, to: Point, color: &str, width: f64);
    fn polyline(&mut self, points: &[Point], color: &str, width: f64);
    fn polygon(&mut self, points: &[Point], fill: &str, stroke: Option<&str>);
    fn circle(&mut self, center: Point, radius: f64, fill: &str, stroke: Option<&str>);
    /// Filled, stroked pie slice from `start_deg` to `end_deg`.
    fn wedge(
        &mut self,
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        fill: &str,
        stroke: &str,
    );
    /// Text anchored at `at`, rotated about the anchor by `rotation_deg`, vertically
    /// centered on the anchor.
    fn text(&mut self, text: &str, at: Point, rotation_deg: f64, style: &TextStyle<'_>);
    fn measure_text(&self, text: &str, font_px: f64, bold: bool) -> f64;
    fn push_clip(&mut self, rect: Rect);
    fn pop_clip(&mut self);
}

/// A surface that can own offscreen layers and blit them rotated.
pub trait Compositor: Surface {
    type Layer: Surface;

    fn create_layer(&mut self, width: f64, height: f64) -> Result<Self::Layer, String>;
    /// Draw `layer` with its center at `center`, rotated by `rotation_deg`.
    fn draw_layer_rotated(&mut self, layer: &Self::Layer, center: Point, rotation_deg: f64);
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("could not allocate wheel cache layer: {0}")]
    Layer(String),
}

pub const BACKGROUND: &str = "#0a0f1a";
pub const SLICE_STROKE: &str = "#0a0f1a";
pub const LABEL_COLOR: &str = "#0a0f1a";
pub const HUB_FILL: &str = "#e5e7eb";
pub const EMPTY_FILL: &str = "rgba(122, 162, 255, 0.12)";
pub const POINTER_FILL: &str = "#ef4444";
pub const POINTER_STROKE: &str = "rgba(255, 255, 255, 0.85)";

const MARGIN: f64 = 8.0;
const POINTER_SIZE: f64 = 18.0;
const MAGNIFIER_GAP: f64 = 12.0;
const MIN_RADIUS: f64 = 16.0;
const LABEL_INSET: f64 = 10.0;
const ELLIPSIS: char = '\u{2026}';

/// Geometry derived from the observed container size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    pub radius: f64,
    pub magnifier: Rect,
    pub row_height: f64,
}

impl WheelLayout {
    pub fn from_container(width: f64, height: f64) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);

        let magnifier_w = (width * 0.28).clamp(96.0, 280.0);
        let wheel_w = (width - magnifier_w - MAGNIFIER_GAP - POINTER_SIZE).max(0.0);
        let diameter = wheel_w.min(height) - 2.0 * MARGIN;
        let radius = (diameter * 0.5).max(MIN_RADIUS);
        let center = Point::new(MARGIN + radius, height * 0.5);

        let mag_h = (radius * 1.2).min(height - 2.0 * MARGIN).max(54.0);
        let row_height = (mag_h / 5.0).clamp(18.0, 48.0);
        let magnifier = Rect::new(
            center.x + radius + POINTER_SIZE + MAGNIFIER_GAP,
            center.y - mag_h * 0.5,
            magnifier_w,
            mag_h,
        );

        Self {
            width,
            height,
            center,
            radius,
            magnifier,
            row_height,
        }
    }

    /// Side of the square cache layer.
    pub fn cache_side(&self) -> f64 {
        (self.radius * 2.0 + 4.0).ceil()
    }

    /// Pointer triangle: tip slightly inside the rim, base outside it, at 0 deg.
    pub fn pointer_triangle(&self) -> [Point; 3] {
        let rim = self.center.x + self.radius;
        let half = POINTER_SIZE * 0.55;
        [
            Point::new(rim - POINTER_SIZE * 0.45, self.center.y),
            Point::new(rim + POINTER_SIZE, self.center.y - half),
            Point::new(rim + POINTER_SIZE, self.center.y + half),
        ]
    }
}

/// Label font size: shrinks with slice count, grows with radius.
pub fn label_font_px(radius: f64, entry_count: usize) -> f64 {
    let n = entry_count.max(1) as f64;
    let arc = std::f64::consts::TAU * radius / n;
    (arc * 0.55).min(radius * 0.12).clamp(10.0, 28.0)
}

/// Truncate `label` with an ellipsis until it fits in `max_width`.
pub fn fit_label<S: Surface + ?Sized>(
    surface: &S,
    label: &str,
    font_px: f64,
    max_width: f64,
) -> String {
    if surface.measure_text(label, font_px, true) <= max_width {
        return label.to_string();
    }
    let mut chars: Vec<char> = label.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let mut candidate: String = chars.iter().collect::<String>().trim_end().to_string();
        candidate.push(ELLIPSIS);
        if surface.measure_text(&candidate, font_px, true) <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// Paint all slices at rotation 0 into `layer`.
fn paint_wheel<S: Surface>(layer: &mut S, entries: &[WheelEntry], radius: f64) {
    let (w, h) = layer.size();
    let center = Point::new(w * 0.5, h * 0.5);
    layer.clear();

    if entries.is_empty() {
        layer.circle(center, radius, EMPTY_FILL, Some(POINTER_STROKE));
        return;
    }

    let slice = slice_width_deg(entries.len());
    let font_px = label_font_px(radius, entries.len());
    let hub = radius * 0.08;
    let max_label_w = (radius - LABEL_INSET - hub * 2.0).max(0.0);
    for (i, entry) in entries.iter().enumerate() {
        let start = i as f64 * slice;
        let end = start + slice;
        layer.wedge(center, radius, start, end, entry.color(), SLICE_STROKE);

        let mid = start + slice * 0.5;
        let label = fit_label(&*layer, &entry.label, font_px, max_label_w);
        if label.is_empty() {
            continue;
        }
        let style = TextStyle {
            color: LABEL_COLOR,
            font_px,
            bold: true,
            align: TextAlign::Right,
        };
        layer.text(&label, center.polar(radius - LABEL_INSET, mid), mid, &style);
    }
    layer.circle(center, hub, HUB_FILL, Some(SLICE_STROKE));
}

/// What one frame pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub cache_rebuilt: bool,
    pub reading: Option<PointerReading>,
    pub rows: Vec<MagnifierRow>,
}

/// Owns the offscreen wheel image and draws frames from it.
pub struct WheelRenderer<L> {
    layout: WheelLayout,
    entries: Vec<WheelEntry>,
    cache: Option<L>,
    cache_builds: u64,
    magnifier_labels: Vec<String>,
}

impl<L: Surface> WheelRenderer<L> {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            layout: WheelLayout::from_container(width, height),
            entries: Vec::new(),
            cache: None,
            cache_builds: 0,
            magnifier_labels: Vec::new(),
        }
    }

    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    pub fn entries(&self) -> &[WheelEntry] {
        &self.entries
    }

    /// How many times the cache pass has run.
    pub fn cache_builds(&self) -> u64 {
        self.cache_builds
    }

    pub fn is_cache_valid(&self) -> bool {
        self.cache.is_some()
    }

    /// The offscreen wheel image, if built.
    pub fn cache_layer(&self) -> Option<&L> {
        self.cache.as_ref()
    }

    /// Replace the entry list; invalidates the cache only on an actual change.
    pub fn set_entries(&mut self, entries: &[WheelEntry]) -> bool {
        if self.entries == entries {
            return false;
        }
        self.entries = entries.to_vec();
        self.cache = None;
        true
    }

    /// Re-derive the layout from a new container size; invalidates on change.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let next = WheelLayout::from_container(width, height);
        if next == self.layout {
            return false;
        }
        self.layout = next;
        self.cache = None;
        true
    }

    /// Draw one frame at `rotation_deg`, rebuilding the cache first if needed.
    pub fn render<C>(&mut self, target: &mut C, rotation_deg: f64) -> Result<FrameStats, RenderError>
    where
        C: Compositor<Layer = L>,
    {
        let cache_rebuilt = self.ensure_cache(target)?;
        let layout = self.layout;

        target.clear();
        target.fill_rect(Rect::new(0.0, 0.0, layout.width, layout.height), BACKGROUND);
        if let Some(layer) = &self.cache {
            target.draw_layer_rotated(layer, layout.center, rotation_deg);
        }
        target.polygon(&layout.pointer_triangle(), POINTER_FILL, Some(POINTER_STROKE));

        let reading = read_pointer(rotation_deg, self.entries.len());
        let rows = match reading {
            Some(r) => magnifier::rows(&r, self.entries.len(), &layout),
            None => Vec::new(),
        };
        magnifier::draw(target, &layout, &rows, &self.entries, &self.magnifier_labels);

        Ok(FrameStats {
            cache_rebuilt,
            reading,
            rows,
        })
    }

    fn ensure_cache<C>(&mut self, target: &mut C) -> Result<bool, RenderError>
    where
        C: Compositor<Layer = L>,
    {
        if self.cache.is_some() {
            return Ok(false);
        }
        let side = self.layout.cache_side();
        let mut layer = target.create_layer(side, side).map_err(RenderError::Layer)?;
        paint_wheel(&mut layer, &self.entries, self.layout.radius);
        self.magnifier_labels = magnifier::fit_labels(&*target, &self.layout, &self.entries);
        self.cache = Some(layer);
        self.cache_builds += 1;
        trace!(
            entries = self.entries.len(),
            side,
            builds = self.cache_builds,
            "wheel cache rebuilt"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::entries_from_labels;
    use crate::recording::{DrawCommand, RecordingSurface};

    fn renderer_with(n: usize) -> (WheelRenderer<RecordingSurface>, RecordingSurface) {
        let labels: Vec<String> = (0..n).map(|i| format!("entry {i}")).collect();
        let mut r = WheelRenderer::new(800.0, 500.0);
        r.set_entries(&entries_from_labels(labels));
        (r, RecordingSurface::new(800.0, 500.0))
    }

    #[test]
    fn layout_keeps_wheel_and_magnifier_inside_container() {
        for (w, h) in [(800.0, 500.0), (320.0, 240.0), (1920.0, 1080.0)] {
            let l = WheelLayout::from_container(w, h);
            assert!(l.radius >= MIN_RADIUS);
            assert!(l.center.x - l.radius >= 0.0);
            assert!(l.magnifier.x > l.center.x + l.radius);
            assert!(l.row_height >= 18.0 && l.row_height <= 48.0);
        }
    }

    #[test]
    fn cache_is_built_once_across_rotations() {
        let (mut r, mut target) = renderer_with(6);
        let first = r.render(&mut target, 0.0).unwrap();
        assert!(first.cache_rebuilt);
        for k in 1..50 {
            let stats = r.render(&mut target, k as f64 * 13.7).unwrap();
            assert!(!stats.cache_rebuilt);
        }
        assert_eq!(r.cache_builds(), 1);
    }

    #[test]
    fn entry_change_and_resize_invalidate_the_cache() {
        let (mut r, mut target) = renderer_with(3);
        r.render(&mut target, 0.0).unwrap();

        assert!(!r.set_entries(&entries_from_labels(["entry 0", "entry 1", "entry 2"])));
        assert!(r.is_cache_valid());

        assert!(r.set_entries(&entries_from_labels(["a", "b"])));
        assert!(!r.is_cache_valid());
        r.render(&mut target, 0.0).unwrap();
        assert_eq!(r.cache_builds(), 2);

        assert!(!r.resize(800.0, 500.0));
        assert!(r.resize(640.0, 480.0));
        r.render(&mut target, 0.0).unwrap();
        assert_eq!(r.cache_builds(), 3);
    }

    #[test]
    fn cache_pass_draws_one_wedge_and_label_per_entry() {
        let (mut r, mut target) = renderer_with(5);
        r.render(&mut target, 0.0).unwrap();
        let layer = r.cache_layer().unwrap();
        let wedges: Vec<(f64, f64)> = layer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Wedge {
                    start_deg, end_deg, ..
                } => Some((*start_deg, *end_deg)),
                _ => None,
            })
            .collect();
        assert_eq!(wedges.len(), 5);
        assert_eq!(wedges[0], (0.0, 72.0));
        assert_eq!(wedges[4].1, 360.0);
        let labels = layer.count(|c| matches!(c, DrawCommand::Text { .. }));
        assert_eq!(labels, 5);
    }

    #[test]
    fn frame_pass_cost_does_not_grow_with_entry_count() {
        let (mut small, mut t_small) = renderer_with(4);
        let (mut large, mut t_large) = renderer_with(400);
        small.render(&mut t_small, 10.0).unwrap();
        large.render(&mut t_large, 10.0).unwrap();
        t_small.take_commands();
        t_large.take_commands();

        small.render(&mut t_small, 20.0).unwrap();
        large.render(&mut t_large, 20.0).unwrap();
        assert_eq!(t_small.commands().len(), t_large.commands().len());
        assert_eq!(t_large.count(|c| matches!(c, DrawCommand::Wedge { .. })), 0);
    }

    #[test]
    fn frame_reading_matches_selection() {
        let (mut r, mut target) = renderer_with(7);
        for k in 0..100 {
            let rot = k as f64 * 37.3;
            let stats = r.render(&mut target, rot).unwrap();
            let reading = stats.reading.unwrap();
            assert_eq!(reading.index, crate::selection::selected_index(rot, 7));
            let center = stats.rows.iter().find(|row| row.offset == 0).unwrap();
            assert_eq!(center.entry_index, reading.index);
        }
    }

    #[test]
    fn empty_wheel_still_draws_pointer() {
        let mut r: WheelRenderer<RecordingSurface> = WheelRenderer::new(400.0, 300.0);
        let mut target = RecordingSurface::new(400.0, 300.0);
        let stats = r.render(&mut target, 0.0).unwrap();
        assert!(stats.reading.is_none());
        assert!(stats.rows.is_empty());
        assert_eq!(target.count(|c| matches!(c, DrawCommand::Polygon { .. })), 1);
    }

    #[test]
    fn long_labels_are_truncated_with_ellipsis() {
        let s = RecordingSurface::new(10.0, 10.0);
        let fitted = fit_label(&s, "a very long label indeed", 10.0, 60.0);
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(s.measure_text(&fitted, 10.0, true) <= 60.0);
        assert_eq!(fit_label(&s, "short", 10.0, 60.0), "short");
    }

    #[test]
    fn frames_do_not_remeasure_magnifier_labels() {
        let long = "w".repeat(300);
        let mut r = WheelRenderer::new(800.0, 500.0);
        r.set_entries(&entries_from_labels([long.clone(), "b".to_string(), "c".to_string()]));
        let mut target = RecordingSurface::new(800.0, 500.0);

        r.render(&mut target, 0.0).unwrap();
        let after_build = target.measure_calls();
        assert!(after_build > 0);
        for k in 1..40 {
            target.take_commands();
            r.render(&mut target, k as f64 * 9.5).unwrap();
            assert!(target.commands().iter().any(|c| matches!(
                c,
                DrawCommand::Text { text, .. } if text.ends_with(ELLIPSIS)
            )));
        }
        assert_eq!(target.measure_calls(), after_build);

        r.resize(1200.0, 700.0);
        r.render(&mut target, 0.0).unwrap();
        assert!(target.measure_calls() > after_build);
    }

    #[test]
    fn font_size_is_clamped() {
        assert_eq!(label_font_px(1000.0, 1), 28.0);
        assert_eq!(label_font_px(50.0, 500), 10.0);
    }
}
