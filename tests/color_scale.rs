use cropmap::color::{hex_to_rgb, hsl_to_rgb};
use cropmap::scale::{
    self, ColorScale, DEFAULT_BASE_COLOR, FALLBACK_RANGE, NO_DATA_COLOR, ScaleError,
    SequentialPalette, ValueRange,
};

fn lightness(hex: &str) -> f64 {
    hex_to_rgb(hex).expect("valid hex").to_hsl().l
}

#[test]
fn normalize_stays_in_unit_interval() {
    for (v, min, max) in [
        (0.0, 0.0, 1000.0),
        (-5.0, 10.0, 100.0),
        (1e12, 10.0, 100.0),
        (50.0, 50.0, 50.0),
        (50.0, 100.0, 10.0),
        (f64::NAN, 1.0, 10.0),
        (5.0, f64::NAN, f64::NAN),
    ] {
        let n = scale::normalize(v, min, max);
        assert!(!n.is_nan(), "normalize({v}, {min}, {max}) is NaN");
        assert!((0.0..=1.0).contains(&n), "normalize({v}, {min}, {max}) = {n}");
    }
}

#[test]
fn normalize_is_logarithmic() {
    // 1000 sits halfway between 10 and 100000 on a log axis.
    let n = scale::normalize(1000.0, 10.0, 100_000.0);
    assert!((n - 0.5).abs() < 1e-9, "got {n}");
    assert_eq!(scale::normalize(10.0, 10.0, 100_000.0), 0.0);
    assert_eq!(scale::normalize(100_000.0, 10.0, 100_000.0), 1.0);
}

#[test]
fn normalize_is_monotonic() {
    let mut prev = -1.0;
    for v in [1.0, 2.0, 5.0, 40.0, 300.0, 999.0, 5000.0] {
        let n = scale::normalize(v, 1.0, 1000.0);
        assert!(n >= prev, "{v} normalized to {n} below {prev}");
        prev = n;
    }
}

#[test]
fn degenerate_range_gets_a_decade() {
    let r = ValueRange { min: 250.0, max: 250.0 };
    assert_eq!(r.effective(), (250.0, 2500.0));
    let r = ValueRange { min: 0.0, max: 0.5 };
    assert_eq!(r.effective(), (1.0, 10.0));
}

#[test]
fn darker_for_larger_values() {
    let s = ColorScale::new(ValueRange { min: 1.0, max: 1_000_000.0 }, DEFAULT_BASE_COLOR);
    let small = lightness(&s.color_for_value(Some(10.0)));
    let large = lightness(&s.color_for_value(Some(100_000.0)));
    assert!(large < small, "expected {large} < {small}");
}

#[test]
fn palette_endpoints() {
    let p = SequentialPalette::new("#4CAF50");
    let base = p.base();
    let light = p.hsl_at(0.0);
    let dark = p.hsl_at(1.0);
    assert_eq!(light.l, 85.0);
    assert_eq!(dark.l, 15.0);
    assert!((light.h - base.h).abs() < 1e-9);
    assert!((dark.s - (base.s - 10.0).max(20.0)).abs() < 1e-9);
}

#[test]
fn saturation_never_drops_below_floor() {
    let p = SequentialPalette::new("#8a9a8a");
    assert!(p.base().s < 20.0);
    for n in [0.0, 0.5, 1.0] {
        assert!(p.hsl_at(n).s >= 20.0 - 1e-9);
    }
}

#[test]
fn no_data_for_missing_and_non_positive() {
    let s = ColorScale::new(ValueRange { min: 1.0, max: 100.0 }, DEFAULT_BASE_COLOR);
    for v in [None, Some(0.0), Some(-3.0), Some(f64::NAN)] {
        assert_eq!(s.color_for_value(v), NO_DATA_COLOR, "value {v:?}");
    }
}

#[test]
fn malformed_base_falls_back_to_default() {
    let bad = scale::color_for(0.3, "not-a-color");
    let good = scale::color_for(0.3, DEFAULT_BASE_COLOR);
    assert_eq!(bad, good);
}

#[test]
fn legend_endpoints_are_exact() {
    let steps = scale::sample_steps(3.0, 7777.0, 6, DEFAULT_BASE_COLOR).unwrap();
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[0].value, 3.0);
    assert_eq!(steps[5].value, 7777.0);
    for pair in steps.windows(2) {
        assert!(pair[0].value < pair[1].value);
    }
    assert_eq!(steps[0].color, scale::color_for(0.0, DEFAULT_BASE_COLOR));
    assert_eq!(steps[5].color, scale::color_for(1.0, DEFAULT_BASE_COLOR));
}

#[test]
fn legend_rejects_fewer_than_two_steps() {
    for n in [0, 1] {
        let err = scale::sample_steps(1.0, 10.0, n, DEFAULT_BASE_COLOR).unwrap_err();
        assert!(matches!(err, ScaleError::InvalidArgument(_)));
    }
}

#[test]
fn legend_over_fallback_range() {
    let s = ColorScale::new(ValueRange::from_values(Vec::new()), DEFAULT_BASE_COLOR);
    assert_eq!(s.range, FALLBACK_RANGE);
    let steps = s.legend(4).unwrap();
    assert_eq!(steps.first().unwrap().value, 1.0);
    assert_eq!(steps.last().unwrap().value, 1000.0);
}

#[test]
fn two_municipality_crop_colors_ends_of_the_ramp() {
    let range = ValueRange::from_values([10_000.0, 100.0]);
    assert_eq!(range, ValueRange { min: 100.0, max: 10_000.0 });

    let big = scale::color_for_value(Some(10_000.0), range, "#4CAF50");
    let small = scale::color_for_value(Some(100.0), range, "#4CAF50");
    assert_eq!(big, scale::color_for(1.0, "#4CAF50"));
    assert_eq!(small, scale::color_for(0.0, "#4CAF50"));

    let p = SequentialPalette::new("#4CAF50");
    let expected_dark = hsl_to_rgb(p.base().h, (p.base().s - 10.0).max(20.0), 15.0).to_hex();
    assert_eq!(big, expected_dark);
}

#[test]
fn no_data_color_is_never_on_the_ramp() {
    for r in (0..=255u16).step_by(15) {
        for g in (0..=255u16).step_by(15) {
            for b in (0..=255u16).step_by(15) {
                let base = cropmap::color::Rgb8::new(r as u8, g as u8, b as u8);
                let p = SequentialPalette::from_rgb(base);
                for i in 0..=100 {
                    let n = i as f64 / 100.0;
                    assert_ne!(p.hex_at(n), NO_DATA_COLOR, "base {base} at {n}");
                }
            }
        }
    }
}
