//! Scrolling read-out of the entries around the pointer.
//!
//! Rows are stacked vertically around the viewport center. Row `offset = i` shows
//! entry `current - i` (wrapping both ways) at `center_y + i*h - progress*h`, so
//! rows slide by exactly one row height per slice and the entry under the pointer
//! always passes through the center band in step with the wheel.

use crate::entry::WheelEntry;
use crate::render::{fit_label, Point, Rect, Surface, TextAlign, TextStyle, WheelLayout};
use crate::selection::PointerReading;

pub const PANEL_FILL: &str = "rgba(0, 0, 0, 0.55)";
pub const PANEL_BORDER: &str = "rgba(122, 162, 255, 0.55)";
pub const CENTER_BAND: &str = "rgba(251, 191, 36, 0.95)";
pub const ROW_TEXT: &str = "rgba(255, 255, 255, 0.92)";
pub const ROW_DIVIDER: &str = "rgba(122, 162, 255, 0.18)";

const SWATCH_W: f64 = 8.0;
const TEXT_PAD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifierRow {
    /// Offset from the center row (positive = below).
    pub offset: i32,
    pub entry_index: usize,
    /// Vertical center of the row.
    pub y: f64,
}

/// Rows needed on each side of the center to cover the viewport while scrolling.
pub fn reach(viewport_height: f64, row_height: f64) -> i32 {
    if row_height <= 0.0 {
        return 0;
    }
    (viewport_height / row_height * 0.5).ceil() as i32 + 1
}

/// Entry shown at `offset` rows from the center.
#[inline]
pub fn entry_at_offset(current: usize, offset: i32, entry_count: usize) -> usize {
    let n = entry_count as i64;
    ((current as i64 - offset as i64) % n + n) as usize % entry_count
}

/// Row positions for one frame.
pub fn rows_for(
    reading: &PointerReading,
    entry_count: usize,
    center_y: f64,
    row_height: f64,
    reach: i32,
) -> Vec<MagnifierRow> {
    if entry_count == 0 {
        return Vec::new();
    }
    (-reach..=reach)
        .map(|offset| MagnifierRow {
            offset,
            entry_index: entry_at_offset(reading.index, offset, entry_count),
            y: center_y + offset as f64 * row_height - reading.segment_progress * row_height,
        })
        .collect()
}

/// Row positions for `layout`'s magnifier viewport.
pub fn rows(reading: &PointerReading, entry_count: usize, layout: &WheelLayout) -> Vec<MagnifierRow> {
    let viewport = layout.magnifier;
    rows_for(
        reading,
        entry_count,
        viewport.center_y(),
        layout.row_height,
        reach(viewport.height, layout.row_height),
    )
}

fn row_font_px(row_height: f64) -> f64 {
    (row_height * 0.5).clamp(10.0, 22.0)
}

fn row_text_width(viewport: Rect) -> f64 {
    (viewport.width - SWATCH_W - 2.0 * TEXT_PAD).max(0.0)
}

/// Row labels truncated to the panel width, one per entry. Depends only on the
/// entries and the layout, so callers keep the result until either changes.
pub fn fit_labels<S: Surface + ?Sized>(
    surface: &S,
    layout: &WheelLayout,
    entries: &[WheelEntry],
) -> Vec<String> {
    let font_px = row_font_px(layout.row_height);
    let max_w = row_text_width(layout.magnifier);
    entries
        .iter()
        .map(|e| fit_label(surface, &e.label, font_px, max_w))
        .collect()
}

/// Draw the panel with labels from [`fit_labels`]. Cost depends on the viewport
/// size, not on the entry count or label length.
pub fn draw<S: Surface>(
    surface: &mut S,
    layout: &WheelLayout,
    rows: &[MagnifierRow],
    entries: &[WheelEntry],
    labels: &[String],
) {
    let viewport = layout.magnifier;
    let h = layout.row_height;
    surface.fill_rect(viewport, PANEL_FILL);

    surface.push_clip(viewport);
    let font_px = row_font_px(h);
    for row in rows {
        let (Some(entry), Some(label)) = (entries.get(row.entry_index), labels.get(row.entry_index))
        else {
            continue;
        };
        let top = row.y - h * 0.5;
        surface.fill_rect(Rect::new(viewport.x, top, SWATCH_W, h), entry.color());
        surface.line(
            Point::new(viewport.x, top + h),
            Point::new(viewport.x + viewport.width, top + h),
            ROW_DIVIDER,
            1.0,
        );
        let style = TextStyle {
            color: ROW_TEXT,
            font_px,
            bold: row.offset == 0,
            align: TextAlign::Left,
        };
        surface.text(
            label,
            Point::new(viewport.x + SWATCH_W + TEXT_PAD, row.y),
            0.0,
            &style,
        );
    }
    surface.pop_clip();

    // Fixed band marking the pointer row.
    let band = Rect::new(viewport.x, viewport.center_y() - h * 0.5, viewport.width, h);
    surface.stroke_rect(band, CENTER_BAND, 2.0);
    surface.stroke_rect(viewport, PANEL_BORDER, 1.0);
}
