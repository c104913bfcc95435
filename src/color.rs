//! Color space conversion between hex strings, 8-bit RGB, and HSL.
//!
//! HSL uses the CSS convention: hue in degrees `0..360`, saturation and
//! lightness in percent `0..=100`. All conversions are total over their
//! valid input ranges; only hex parsing can fail.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Strict 6-digit hex color, optional leading `#`, case-insensitive.
static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").expect("valid hex regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        rgb_to_hex(self)
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a string is not a 6-digit hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?} (expected #rrggbb)")]
pub struct ParseHexError(pub String);

impl FromStr for Rgb8 {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s).ok_or_else(|| ParseHexError(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64, // 0..360
    pub s: f64, // 0..=100
    pub l: f64, // 0..=100
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn to_rgb(self) -> Rgb8 {
        hsl_to_rgb(self.h, self.s, self.l)
    }
}

/// Parse `#rrggbb` or `rrggbb`. Anything else (3-digit shorthand, alpha,
/// whitespace) yields `None`.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb8> {
    let caps = HEX_RE.captures(hex)?;
    let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
    Some(Rgb8::new(channel(1)?, channel(2)?, channel(3)?))
}

pub fn rgb_to_hex(rgb: Rgb8) -> String {
    rgb.to_string()
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h * 60.0, s * 100.0, l * 100.0)
}

pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb8 {
    let h = if h.is_finite() { h.rem_euclid(360.0) / 360.0 } else { 0.0 };
    let s = clamp_pct(s) / 100.0;
    let l = clamp_pct(l) / 100.0;

    if s == 0.0 {
        let v = to_channel(l);
        return Rgb8::new(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    Rgb8::new(
        to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_rgb(p, q, h)),
        to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn clamp_pct(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 100.0) }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(hex_to_rgb("#4CAF50"), Some(Rgb8::new(76, 175, 80)));
        assert_eq!(hex_to_rgb("4caf50"), Some(Rgb8::new(76, 175, 80)));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#", "#fff", "#12345", "#1234567", "#gg0000", " #4CAF50", "##4CAF50"] {
            assert_eq!(hex_to_rgb(bad), None, "{bad:?} should not parse");
        }
        assert!("nope".parse::<Rgb8>().is_err());
    }

    #[test]
    fn hex_formatting_is_lowercase_and_padded() {
        assert_eq!(Rgb8::new(0, 10, 255).to_hex(), "#000aff");
    }

    #[test]
    fn primary_colors_to_hsl() {
        let red = rgb_to_hsl(255, 0, 0);
        assert_eq!((red.h, red.s, red.l), (0.0, 100.0, 50.0));
        let green = rgb_to_hsl(0, 255, 0);
        assert!((green.h - 120.0).abs() < 1e-9);
        let blue = rgb_to_hsl(0, 0, 255);
        assert!((blue.h - 240.0).abs() < 1e-9);
    }

    #[test]
    fn grays_are_achromatic() {
        let gray = rgb_to_hsl(128, 128, 128);
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 50.0), Rgb8::new(128, 128, 128));
    }

    #[test]
    fn out_of_range_hsl_is_clamped_and_wrapped() {
        assert_eq!(hsl_to_rgb(360.0, 100.0, 50.0), hsl_to_rgb(0.0, 100.0, 50.0));
        assert_eq!(hsl_to_rgb(-120.0, 100.0, 50.0), hsl_to_rgb(240.0, 100.0, 50.0));
        assert_eq!(hsl_to_rgb(10.0, 150.0, -5.0), Rgb8::new(0, 0, 0));
        assert_eq!(hsl_to_rgb(f64::NAN, 0.0, 100.0), Rgb8::new(255, 255, 255));
    }

    #[test]
    fn round_trip_within_one_per_channel() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(51) {
                    let c = Rgb8::new(r as u8, g as u8, b as u8);
                    let back = c.to_hsl().to_rgb();
                    assert!((c.r as i16 - back.r as i16).abs() <= 1, "{c} -> {back}");
                    assert!((c.g as i16 - back.g as i16).abs() <= 1, "{c} -> {back}");
                    assert!((c.b as i16 - back.b as i16).abs() <= 1, "{c} -> {back}");
                }
            }
        }
    }
}
