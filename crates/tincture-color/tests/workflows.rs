//! End-to-end scenarios across the public API.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use tincture_color::average::AverageOptions;
use tincture_color::batch::convert_many;
use tincture_color::compositing::{BlendMode, ComposeOptions};
use tincture_color::interpolate::{Hue, InterpolateOptions, Stop};
use tincture_color::{Color, ColorData, ErrorKind, Registry};

fn srgb(r: f64, g: f64, b: f64) -> Color {
    Color::new("srgb", &[r, g, b], 1.0).unwrap()
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn white_is_white_everywhere() {
    let white = srgb(1.0, 1.0, 1.0);
    for space in ["lab-d65", "lch-d65", "oklab", "oklch", "hsl", "hwb"] {
        let c = white.convert(space).unwrap();
        assert!(c.is_achromatic().unwrap(), "{space}");
        let back = c.convert("srgb").unwrap();
        for v in back.coords_resolved() {
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn d50_spaces_adapt_white() {
    let white = srgb(1.0, 1.0, 1.0).convert("lab").unwrap();
    assert_abs_diff_eq!(white.coords()[0], 100.0, epsilon = 1e-3);
    assert_abs_diff_eq!(white.coords()[1], 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(white.coords()[2], 0.0, epsilon = 1e-3);
}

#[test]
fn batch_matches_single_conversions() {
    let colors = vec![vec![1.0, 0.0, 0.0], vec![0.2, 0.4, 0.6], vec![0.0, 0.0, 0.0]];
    let out = convert_many(Registry::global(), "srgb", "oklab", &colors).unwrap();
    for (input, got) in colors.iter().zip(&out) {
        let expected = Color::new("srgb", input, 1.0).unwrap().convert("oklab").unwrap();
        for (a, b) in got.iter().zip(expected.coords()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}

#[test]
fn serde_data_round_trip() {
    let c = Color::new("oklch", &[0.7, 0.1, f64::NAN], 0.5).unwrap();
    let json = serde_json::to_string(&c.to_data()).unwrap();
    let data: ColorData = serde_json::from_str(&json).unwrap();
    let back = Color::from_data(&data).unwrap();
    assert_eq!(back, c);
}

// ============================================================================
// Gamut and distance
// ============================================================================

#[test]
fn every_fit_method_lands_in_srgb() {
    let wide = Color::new("display-p3", &[0.0, 1.0, 0.2], 1.0).unwrap();
    for method in ["clip", "lch-chroma", "oklch-chroma", "minde-chroma", "raytrace", "oklch-raytrace", "css-color-4"] {
        let mut c = wide.convert("srgb").unwrap();
        c.fit(None, Some(method)).unwrap();
        assert!(c.in_gamut(None).unwrap(), "{method}");
    }
}

#[test]
fn unknown_fit_method_is_reported() {
    let mut c = Color::new("display-p3", &[0.0, 1.0, 0.0], 1.0).unwrap();
    let err = c.fit(Some("srgb"), Some("no-such-fit")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn delta_e_methods_agree_on_identity() {
    let a = srgb(0.3, 0.6, 0.2);
    for method in ["76", "94", "cmc", "2000", "itp", "jz", "ok", "hyab", "cam16", "hct", "99o"] {
        assert_abs_diff_eq!(a.delta_e(&a, Some(method)).unwrap(), 0.0, epsilon = 1e-6);
    }
    let b = srgb(0.3, 0.6, 0.25);
    assert!(a.delta_e(&b, Some("2000")).unwrap() > 0.5);
}

#[test]
fn closest_picks_nearest_candidate() {
    let target = srgb(0.9, 0.1, 0.1);
    let palette = [srgb(0.0, 0.0, 1.0), srgb(1.0, 0.0, 0.0), srgb(0.0, 1.0, 0.0)];
    let best = target.closest(&palette, None).unwrap();
    assert_eq!(best, &palette[1]);
}

// ============================================================================
// Interpolation
// ============================================================================

#[test]
fn gradient_ends_match_stops() {
    let red = srgb(1.0, 0.0, 0.0);
    let blue = srgb(0.0, 0.0, 1.0);
    let opts = InterpolateOptions::new().space("oklch").out_space("srgb");
    let colors = Color::steps(&[Stop::from(&red), Stop::from(&blue)], &opts, 5, 1000, 0.0).unwrap();
    assert_eq!(colors.len(), 5);
    for (a, b) in colors[0].coords().iter().zip(red.coords()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
    for (a, b) in colors[4].coords().iter().zip(blue.coords()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn refined_steps_respect_max_delta_e() {
    let black = srgb(0.0, 0.0, 0.0);
    let white = srgb(1.0, 1.0, 1.0);
    let opts = InterpolateOptions::new().space("lab-d65");
    let colors = Color::steps(&[Stop::from(&black), Stop::from(&white)], &opts, 2, 1000, 3.0).unwrap();
    assert!(colors.len() > 2);
    for pair in colors.windows(2) {
        assert!(pair[0].delta_e(&pair[1], None).unwrap() <= 3.0 + 1e-9);
    }
}

#[test]
fn hue_fixups_pick_the_arc() {
    let a = Color::new("oklch", &[0.7, 0.1, 350.0], 1.0).unwrap();
    let b = Color::new("oklch", &[0.7, 0.1, 10.0], 1.0).unwrap();
    let shorter = a.mix(&b, 0.5, &InterpolateOptions::new().space("oklch")).unwrap();
    assert_abs_diff_eq!(shorter.coords()[2], 0.0, epsilon = 1e-9);
    let longer = a.mix(&b, 0.5, &InterpolateOptions::new().space("oklch").hue(Hue::Longer)).unwrap();
    assert_abs_diff_eq!(longer.coords()[2], 180.0, epsilon = 1e-9);
}

#[test]
fn spline_methods_pass_through_stops() {
    let stops: Vec<Stop> = [srgb(1.0, 0.0, 0.0), srgb(0.0, 1.0, 0.0), srgb(0.0, 0.0, 1.0)]
        .iter()
        .map(Stop::from)
        .collect();
    for method in ["linear", "bspline", "natural", "monotone", "catrom"] {
        let opts = InterpolateOptions::new().space("srgb").method(method);
        let i = Color::interpolate(&stops, &opts).unwrap();
        let mid = i.at(0.5).unwrap();
        // B-spline only approximates its control points.
        if method != "bspline" {
            assert_abs_diff_eq!(mid.coords()[1], 1.0, epsilon = 1e-6);
        }
    }
}

// ============================================================================
// Everything else
// ============================================================================

#[test]
fn compose_then_measure_contrast() {
    let text = Color::new("srgb", &[0.0, 0.0, 0.0], 0.6).unwrap();
    let page = srgb(1.0, 1.0, 1.0);
    let seen = text.compose(&[page.clone()], &ComposeOptions::default()).unwrap();
    assert_eq!(seen.alpha(), 1.0);
    for v in seen.coords() {
        assert_abs_diff_eq!(*v, 0.4, epsilon = 1e-9);
    }
    let ratio = seen.contrast(&page, None).unwrap();
    assert!(ratio > 3.0 && ratio < 21.0);

    let screened = text.compose(&[page], &ComposeOptions::default().blend(Some(BlendMode::Screen))).unwrap();
    for v in screened.coords() {
        assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn average_of_complements_is_gray() {
    let colors = [srgb(1.0, 0.0, 0.0), srgb(0.0, 1.0, 1.0)];
    let avg = Color::average(&colors, &AverageOptions::default().space("srgb")).unwrap();
    for v in avg.coords() {
        assert_abs_diff_eq!(*v, 0.5, epsilon = 1e-12);
    }
}

#[test]
fn filters_and_temperature() {
    let red = srgb(1.0, 0.0, 0.0);
    let gray = red.filter("grayscale", None, Some("srgb"), None).unwrap();
    let g = gray.coords();
    assert_abs_diff_eq!(g[0], g[1], epsilon = 1e-12);
    assert_abs_diff_eq!(g[1], g[2], epsilon = 1e-12);

    let warm = Color::blackbody("srgb", 3000.0, 0.0, Some("srgb-linear"), None).unwrap();
    let cool = Color::blackbody("srgb", 9000.0, 0.0, Some("srgb-linear"), None).unwrap();
    assert!(warm.coords()[0] > warm.coords()[2]);
    assert!(cool.coords()[2] > cool.coords()[0]);
    let [kelvin, _] = warm.cct(None).unwrap();
    assert!((kelvin - 3000.0).abs() < 10.0, "{kelvin}");
}

#[test]
fn private_registry_is_isolated() {
    let mut custom = Registry::default();
    custom.deregister("space:oklch", false).unwrap();
    let custom = Arc::new(custom);

    let c = Color::new_in(&custom, "srgb", &[0.5, 0.5, 0.5], 1.0).unwrap();
    assert_eq!(c.convert("oklch").unwrap_err().kind(), ErrorKind::Configuration);
    assert!(Color::new("srgb", &[0.5; 3], 1.0).unwrap().convert("oklch").is_ok());
}
