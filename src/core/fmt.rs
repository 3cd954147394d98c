//! Number formatting for on-canvas labels.
//!
//! Float-to-decimal `format!` has panicked on wasm in some toolchain/browser
//! combinations, so ruler and read-out labels go through these helpers instead:
//! scale, round into an `i64`, then format integers.

/// `v` with exactly `decimals` fractional digits (at most 6).
pub fn fmt_fixed(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }

    let decimals = decimals.min(6);
    let scale = 10_i64.pow(decimals as u32);
    let scaled = (v * scale as f64).round();
    if scaled.abs() >= i64::MAX as f64 {
        return if v > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }

    let scaled = scaled as i64;
    let mut out = String::new();
    if scaled < 0 {
        out.push('-');
    }
    let abs = scaled.unsigned_abs();
    out.push_str(&(abs / scale as u64).to_string());
    if decimals > 0 {
        let frac = (abs % scale as u64).to_string();
        out.push('.');
        out.extend(std::iter::repeat('0').take(decimals - frac.len()));
        out.push_str(&frac);
    }
    out
}

/// Ruler label for a time in seconds: one decimal below 10 s, whole seconds above.
pub fn fmt_seconds(seconds: f64) -> String {
    let decimals = if seconds.abs() < 10.0 { 1 } else { 0 };
    let mut s = fmt_fixed(seconds, decimals);
    s.push('s');
    s
}

/// A `[0, 1]` fraction as a whole percentage.
pub fn fmt_percent(unit: f64) -> String {
    let mut s = fmt_fixed(unit * 100.0, 0);
    s.push('%');
    s
}

/// Angle label with one decimal.
pub fn fmt_degrees(deg: f64) -> String {
    let mut s = fmt_fixed(deg, 1);
    s.push('\u{b0}');
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pads_and_rounds() {
        assert_eq!(fmt_fixed(1.5, 2), "1.50");
        assert_eq!(fmt_fixed(0.05, 1), "0.1");
        assert_eq!(fmt_fixed(-2.25, 1), "-2.3");
        assert_eq!(fmt_fixed(3.0, 0), "3");
        assert_eq!(fmt_fixed(0.001, 3), "0.001");
    }

    #[test]
    fn fixed_handles_non_finite() {
        assert_eq!(fmt_fixed(f64::NAN, 2), "NaN");
        assert_eq!(fmt_fixed(f64::INFINITY, 2), "Inf");
        assert_eq!(fmt_fixed(f64::NEG_INFINITY, 2), "-Inf");
        assert_eq!(fmt_fixed(1e300, 2), "Inf");
    }

    #[test]
    fn ruler_labels() {
        assert_eq!(fmt_seconds(2.5), "2.5s");
        assert_eq!(fmt_seconds(12.0), "12s");
        assert_eq!(fmt_percent(0.7), "70%");
        assert_eq!(fmt_percent(0.0), "0%");
        assert_eq!(fmt_degrees(90.0), "90.0\u{b0}");
    }
}
