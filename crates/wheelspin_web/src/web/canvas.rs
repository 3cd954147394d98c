use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use wheelspin::fmt::fmt_fixed;
use wheelspin::render::{Compositor, Point, Rect, Surface, TextAlign, TextStyle};

use crate::ui_model::backing_size;

const FONT_FAMILY: &str = "system-ui, -apple-system, Segoe UI, Roboto, sans-serif";

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "canvas: get_context threw".to_string())?
        .ok_or("canvas: missing 2d context".to_string())?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context is not 2d".to_string())
}

fn font(font_px: f64, bold: bool) -> String {
    let weight = if bold { "bold " } else { "" };
    format!("{weight}{}px {FONT_FAMILY}", fmt_fixed(font_px, 1))
}

/// A 2d canvas addressed in CSS pixels; the backing store is scaled by the device
/// pixel ratio.
pub(super) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    pub(super) fn new(canvas: HtmlCanvasElement, width: f64, height: f64, dpr: f64) -> Result<Self, String> {
        let ctx = context_2d(&canvas)?;
        let mut surface = Self {
            canvas,
            ctx,
            width,
            height,
            dpr,
        };
        surface.resize(width, height, dpr)?;
        Ok(surface)
    }

    /// Resize the backing store. Canvas state (transform, styles) resets with it.
    pub(super) fn resize(&mut self, width: f64, height: f64, dpr: f64) -> Result<(), String> {
        let (bw, bh) = backing_size(width, height, dpr);
        self.canvas.set_width(bw);
        self.canvas.set_height(bh);
        self.width = width;
        self.height = height;
        self.dpr = bw as f64 / width.max(1.0);
        self.ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)
            .map_err(|_| "canvas: set_transform failed".to_string())
    }

    fn path(&self, points: &[Point], close: bool) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        if close {
            self.ctx.close_path();
        }
        true
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn line(&mut self, from: Point, to: Point, color: &str, width: f64) {
        self.polyline(&[from, to], color, width);
    }

    fn polyline(&mut self, points: &[Point], color: &str, width: f64) {
        if self.path(points, false) {
            self.ctx.set_stroke_style_str(color);
            self.ctx.set_line_width(width);
            self.ctx.stroke();
        }
    }

    fn polygon(&mut self, points: &[Point], fill: &str, stroke: Option<&str>) {
        if !self.path(points, true) {
            return;
        }
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill();
        if let Some(stroke) = stroke {
            self.ctx.set_stroke_style_str(stroke);
            self.ctx.set_line_width(1.5);
            self.ctx.stroke();
        }
    }

    fn circle(&mut self, center: Point, radius: f64, fill: &str, stroke: Option<&str>) {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .ok();
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill();
        if let Some(stroke) = stroke {
            self.ctx.set_stroke_style_str(stroke);
            self.ctx.set_line_width(1.5);
            self.ctx.stroke();
        }
    }

    fn wedge(
        &mut self,
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        fill: &str,
        stroke: &str,
    ) {
        self.ctx.begin_path();
        self.ctx.move_to(center.x, center.y);
        self.ctx
            .arc(
                center.x,
                center.y,
                radius,
                start_deg.to_radians(),
                end_deg.to_radians(),
            )
            .ok();
        self.ctx.close_path();
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill();
        self.ctx.set_stroke_style_str(stroke);
        self.ctx.set_line_width(1.0);
        self.ctx.stroke();
    }

    fn text(&mut self, text: &str, at: Point, rotation_deg: f64, style: &TextStyle<'_>) {
        self.ctx.save();
        self.ctx.translate(at.x, at.y).ok();
        if rotation_deg != 0.0 {
            self.ctx.rotate(rotation_deg.to_radians()).ok();
        }
        self.ctx.set_font(&font(style.font_px, style.bold));
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(style.color);
        self.ctx.fill_text(text, 0.0, 0.0).ok();
        self.ctx.restore();
    }

    fn measure_text(&self, text: &str, font_px: f64, bold: bool) -> f64 {
        self.ctx.set_font(&font(font_px, bold));
        self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(rect.x, rect.y, rect.width, rect.height);
        self.ctx.clip();
    }

    fn pop_clip(&mut self) {
        self.ctx.restore();
    }
}

impl Compositor for CanvasSurface {
    type Layer = CanvasSurface;

    fn create_layer(&mut self, width: f64, height: f64) -> Result<Self::Layer, String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("canvas: no document".to_string())?;
        let canvas = document
            .create_element("canvas")
            .map_err(|_| "canvas: create_element threw".to_string())?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "canvas: element is not a canvas".to_string())?;
        CanvasSurface::new(canvas, width, height, self.dpr)
    }

    fn draw_layer_rotated(&mut self, layer: &Self::Layer, center: Point, rotation_deg: f64) {
        self.ctx.save();
        self.ctx.translate(center.x, center.y).ok();
        self.ctx.rotate(rotation_deg.to_radians()).ok();
        self.ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                &layer.canvas,
                -layer.width * 0.5,
                -layer.height * 0.5,
                layer.width,
                layer.height,
            )
            .ok();
        self.ctx.restore();
    }
}
