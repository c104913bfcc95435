//! Log-scaled sequential color scales for choropleth and bar-chart coloring.
//!
//! Harvested-area figures span several orders of magnitude: a handful of
//! municipalities report hundreds of thousands of hectares while most report
//! a few dozen. Values are therefore placed on a logarithmic axis before being
//! mapped to a single-hue light-to-dark ramp.
//!
//! ```
//! use cropmap::scale::{ColorScale, ValueRange};
//!
//! let range = ValueRange::from_values([100.0, 10_000.0]);
//! let scale = ColorScale::new(range, "#4CAF50");
//! assert_eq!(scale.color_for_value(Some(100.0)), scale.color_at(0.0));
//! assert_eq!(scale.color_for_value(Some(0.0)), cropmap::scale::NO_DATA_COLOR);
//! ```

use crate::color::{Hsl, Rgb8, hex_to_rgb, rgb_to_hsl};
use serde::{Deserialize, Serialize};

/// Base color used when the requested one is missing or malformed.
pub const DEFAULT_BASE_COLOR: &str = "#4CAF50";

/// Neutral fill for features without a positive value. The ramp never reaches
/// it: ramp saturation stays at or above [`MIN_SATURATION`].
pub const NO_DATA_COLOR: &str = "#e0e0e0";

/// Range used when a crop has no positive value at all.
pub const FALLBACK_RANGE: ValueRange = ValueRange { min: 0.0, max: 1000.0 };

pub const LIGHTEST: f64 = 85.0;
pub const LIGHTNESS_SPAN: f64 = 70.0;
pub const SATURATION_DROP: f64 = 10.0;
pub const MIN_SATURATION: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Bounds of the values currently being colored. `max >= min` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Build a range from raw values, keeping only finite positive ones.
    /// Falls back to [`FALLBACK_RANGE`] when none remain.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut bounds: Option<(f64, f64)> = None;
        for v in values.into_iter().filter(|v| v.is_finite() && *v > 0.0) {
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        match bounds {
            Some((min, max)) => Self { min, max },
            None => FALLBACK_RANGE,
        }
    }

    /// Log-axis bounds actually used for normalization: `min` clamped up to 1,
    /// and a decade of headroom when the range is empty.
    pub fn effective(&self) -> (f64, f64) {
        effective_bounds(self.min, self.max)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        FALLBACK_RANGE
    }
}

fn effective_bounds(min: f64, max: f64) -> (f64, f64) {
    let eff_min = if min.is_nan() { 1.0 } else { min.max(1.0) };
    let eff_max = if max.is_nan() || max <= eff_min {
        eff_min * 10.0
    } else {
        max
    };
    (eff_min, eff_max)
}

/// Position of `value` on the log axis spanning `[min, max]`, in `[0, 1]`.
///
/// Never returns NaN: degenerate ranges are widened and values below the
/// effective minimum land on 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let (eff_min, eff_max) = effective_bounds(min, max);
    let log_min = eff_min.ln();
    let log_max = eff_max.ln();
    let t = (value.max(eff_min).ln() - log_min) / (log_max - log_min);
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Single-hue ramp derived from a base color: light and saturated at 0,
/// dark and slightly muted at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialPalette {
    base: Hsl,
}

impl SequentialPalette {
    /// Falls back to [`DEFAULT_BASE_COLOR`] when `base_hex` does not parse.
    pub fn new(base_hex: &str) -> Self {
        let rgb = hex_to_rgb(base_hex).unwrap_or_else(default_base_rgb);
        Self::from_rgb(rgb)
    }

    pub fn from_rgb(rgb: Rgb8) -> Self {
        Self {
            base: rgb_to_hsl(rgb.r, rgb.g, rgb.b),
        }
    }

    pub fn base(&self) -> Hsl {
        self.base
    }

    /// HSL of the ramp at `normalized` (clamped to `[0, 1]`).
    pub fn hsl_at(&self, normalized: f64) -> Hsl {
        let n = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        Hsl::new(
            self.base.h,
            (self.base.s - n * SATURATION_DROP).max(MIN_SATURATION),
            LIGHTEST - n * LIGHTNESS_SPAN,
        )
    }

    pub fn rgb_at(&self, normalized: f64) -> Rgb8 {
        self.hsl_at(normalized).to_rgb()
    }

    pub fn hex_at(&self, normalized: f64) -> String {
        self.rgb_at(normalized).to_hex()
    }
}

impl Default for SequentialPalette {
    fn default() -> Self {
        Self::from_rgb(default_base_rgb())
    }
}

fn default_base_rgb() -> Rgb8 {
    Rgb8::new(0x4C, 0xAF, 0x50)
}

/// Ramp color for an already-normalized position.
pub fn color_for(normalized: f64, base_hex: &str) -> String {
    SequentialPalette::new(base_hex).hex_at(normalized)
}

/// Color for a raw value. Absent, NaN, or non-positive values get
/// [`NO_DATA_COLOR`] and never touch the log transform.
pub fn color_for_value(value: Option<f64>, range: ValueRange, base_hex: &str) -> String {
    ColorScale::new(range, base_hex).color_for_value(value)
}

/// One legend swatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStep {
    pub value: f64,
    pub color: String,
}

/// `step_count` log-spaced values from the effective min to the effective max,
/// each with its swatch color.
pub fn sample_steps(
    min: f64,
    max: f64,
    step_count: usize,
    base_hex: &str,
) -> Result<Vec<LegendStep>, ScaleError> {
    ColorScale::new(ValueRange { min, max }, base_hex).legend(step_count)
}

/// A value range bound to a palette: everything a map layer or a chart
/// dataset needs to color its values consistently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub range: ValueRange,
    pub palette: SequentialPalette,
}

impl ColorScale {
    pub fn new(range: ValueRange, base_hex: &str) -> Self {
        Self {
            range,
            palette: SequentialPalette::new(base_hex),
        }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        normalize(value, self.range.min, self.range.max)
    }

    pub fn color_at(&self, normalized: f64) -> String {
        self.palette.hex_at(normalized)
    }

    pub fn rgb_for_value(&self, value: Option<f64>) -> Option<Rgb8> {
        match value {
            Some(v) if v > 0.0 => Some(self.palette.rgb_at(self.normalize(v))),
            _ => None,
        }
    }

    pub fn color_for_value(&self, value: Option<f64>) -> String {
        self.rgb_for_value(value)
            .map(Rgb8::to_hex)
            .unwrap_or_else(|| NO_DATA_COLOR.to_string())
    }

    pub fn legend(&self, step_count: usize) -> Result<Vec<LegendStep>, ScaleError> {
        if step_count < 2 {
            return Err(ScaleError::InvalidArgument(format!(
                "step count must be at least 2, got {step_count}"
            )));
        }
        let (eff_min, eff_max) = self.range.effective();
        let (log_min, log_max) = (eff_min.ln(), eff_max.ln());
        let last = step_count - 1;

        let steps = (0..step_count)
            .map(|i| {
                // Endpoints are pinned so exp(ln(x)) rounding never leaks out.
                let value = if i == 0 {
                    eff_min
                } else if i == last {
                    eff_max
                } else {
                    (log_min + (log_max - log_min) * i as f64 / last as f64).exp()
                };
                LegendStep {
                    value,
                    color: self.color_at(self.normalize(value)),
                }
            })
            .collect();
        Ok(steps)
    }
}
