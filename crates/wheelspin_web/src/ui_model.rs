//! UI rules that should be available on both wasm and native.
//!
//! Keeping these out of the wasm-only `web` module lets them be unit-tested on the
//! host.

use wheelspin::settings::{MAX_DURATION_S, MIN_DURATION_S};

/// Initial entry list on first load.
pub const DEFAULT_ENTRIES: &str = "Alice\nBob\nCarol\nDave\nEve\nFrank";

/// CSS size of the curve editor canvas.
pub const CURVE_CANVAS_W: f64 = 480.0;
pub const CURVE_CANVAS_H: f64 = 240.0;

/// One label per line; blank lines dropped, surrounding whitespace trimmed.
pub fn parse_entries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Spin duration from the seconds input, clamped to the allowed range.
pub fn parse_duration_s(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    if !v.is_finite() {
        return None;
    }
    Some(v.clamp(MIN_DURATION_S, MAX_DURATION_S))
}

/// Manual rotation slider value in degrees.
pub fn parse_rotation_deg(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorGesture {
    /// Grab the point under the cursor, or add one and grab it.
    Grab,
    /// Remove the point under the cursor.
    Remove,
    Ignore,
}

/// Map a pointer press on the curve canvas to an editor gesture.
///
/// `button` follows `MouseEvent.button` (0 = primary, 2 = secondary).
pub fn press_gesture(button: i16, double_click: bool, spinning: bool) -> EditorGesture {
    if spinning {
        return EditorGesture::Ignore;
    }
    match (button, double_click) {
        (0, true) | (2, _) => EditorGesture::Remove,
        (0, false) => EditorGesture::Grab,
        _ => EditorGesture::Ignore,
    }
}

pub fn can_spin(spinning: bool, entry_count: usize) -> bool {
    !spinning && entry_count > 0
}

/// Backing-store pixels for a CSS box at `dpr`.
pub fn backing_size(css_w: f64, css_h: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let px = |v: f64| (v.max(1.0) * dpr).round().min(u32::MAX as f64) as u32;
    (px(css_w), px(css_h))
}

/// Wheel container size worth re-laying out for: rounded to whole CSS pixels.
pub fn container_size(width: f64, height: f64) -> Option<(f64, f64)> {
    let w = width.round();
    let h = height.round();
    (w >= 1.0 && h >= 1.0).then_some((w, h))
}

/// What the frame loop does after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// The tick asked to stop.
    Stop,
    /// Next frame is scheduled.
    Continue,
    /// The tick wanted more frames but none could be scheduled.
    Stalled,
}

/// `rescheduled` is the frame request id, `None` when scheduling failed or was
/// not attempted.
pub fn after_frame(keep_going: bool, rescheduled: Option<i32>) -> FrameAction {
    match (keep_going, rescheduled) {
        (false, _) => FrameAction::Stop,
        (true, Some(_)) => FrameAction::Continue,
        (true, None) => FrameAction::Stalled,
    }
}
