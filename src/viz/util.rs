//! Number formatting and label-area sizing for charts and popups.

use num_format::{Locale, ToFormattedString};

use super::text::estimate_text_width_px;

/// Format hectares the Brazilian way: `.` groups thousands, `,` marks
/// decimals, at most two decimals, trailing zeros dropped.
///
/// `12345.5` becomes `"12.345,5"`.
pub fn format_hectares(v: f64) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let cents = (v.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_formatted_string(&Locale::pt);
    let frac = cents % 100;
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}{whole}")
    } else {
        let digits = format!("{frac:02}");
        format!("{sign}{whole},{}", digits.trim_end_matches('0'))
    }
}

/// Pick a single axis scale and its human label based on the overall magnitude.
/// Returns (scale, label), e.g. (1e3, "mil").
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e9 {
        (1.0e9, "bilhões")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "milhões")
    } else if max_abs >= 1.0e4 {
        (1.0e3, "mil")
    } else {
        (1.0, "")
    }
}

/// Width of the category label area (pixels) so the longest label fits,
/// clamped to a sensible band.
pub fn compute_label_area_px(labels: &[String], font_px: u32, max_px: u32) -> u32 {
    let widest = labels
        .iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(12).clamp(48, max_px.max(48))
}
