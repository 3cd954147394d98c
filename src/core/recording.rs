//! Headless [`Surface`] that records draw calls instead of rasterizing them.
//!
//! Used by the CLI `render` command, the benches and the tests. Text width is
//! approximated from the character count.

use std::cell::Cell;

use crate::render::{Compositor, Point, Rect, Surface, TextAlign, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    Polyline {
        points: Vec<Point>,
        color: String,
        width: f64,
    },
    Polygon {
        points: Vec<Point>,
        fill: String,
        stroke: Option<String>,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: String,
    },
    Wedge {
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        fill: String,
    },
    Text {
        text: String,
        at: Point,
        rotation_deg: f64,
        align: TextAlign,
        bold: bool,
    },
    PushClip(Rect),
    PopClip,
    Layer {
        center: Point,
        rotation_deg: f64,
        width: f64,
        height: f64,
    },
}

impl DrawCommand {
    /// Short name used in CLI summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Clear => "clear",
            DrawCommand::FillRect { .. } => "fill_rect",
            DrawCommand::StrokeRect { .. } => "stroke_rect",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Polyline { .. } => "polyline",
            DrawCommand::Polygon { .. } => "polygon",
            DrawCommand::Circle { .. } => "circle",
            DrawCommand::Wedge { .. } => "wedge",
            DrawCommand::Text { .. } => "text",
            DrawCommand::PushClip(_) => "push_clip",
            DrawCommand::PopClip => "pop_clip",
            DrawCommand::Layer { .. } => "layer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
    clip_depth: usize,
    measure_calls: Cell<u64>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            clip_depth: 0,
            measure_calls: Cell::new(0),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Currently open clip regions.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// How many times text has been measured.
    pub fn measure_calls(&self) -> u64 {
        self.measure_calls.get()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.to_string(),
            width,
        });
    }

    fn line(&mut self, from: Point, to: Point, color: &str, width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: color.to_string(),
            width,
        });
    }

    fn polyline(&mut self, points: &[Point], color: &str, width: f64) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color: color.to_string(),
            width,
        });
    }

    fn polygon(&mut self, points: &[Point], fill: &str, stroke: Option<&str>) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill: fill.to_string(),
            stroke: stroke.map(str::to_string),
        });
    }

    fn circle(&mut self, center: Point, radius: f64, fill: &str, _stroke: Option<&str>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill: fill.to_string(),
        });
    }

    fn wedge(
        &mut self,
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        fill: &str,
        _stroke: &str,
    ) {
        self.commands.push(DrawCommand::Wedge {
            center,
            radius,
            start_deg,
            end_deg,
            fill: fill.to_string(),
        });
    }

    fn text(&mut self, text: &str, at: Point, rotation_deg: f64, style: &TextStyle<'_>) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            rotation_deg,
            align: style.align,
            bold: style.bold,
        });
    }

    fn measure_text(&self, text: &str, font_px: f64, bold: bool) -> f64 {
        self.measure_calls.set(self.measure_calls.get() + 1);
        let per_char = if bold { 0.62 } else { 0.58 };
        text.chars().count() as f64 * font_px * per_char
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopClip);
    }
}

impl Compositor for RecordingSurface {
    type Layer = RecordingSurface;

    fn create_layer(&mut self, width: f64, height: f64) -> Result<Self::Layer, String> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(format!("invalid layer size {width}x{height}"));
        }
        Ok(RecordingSurface::new(width, height))
    }

    fn draw_layer_rotated(&mut self, layer: &Self::Layer, center: Point, rotation_deg: f64) {
        self.commands.push(DrawCommand::Layer {
            center,
            rotation_deg,
            width: layer.width,
            height: layer.height,
        });
    }
}
