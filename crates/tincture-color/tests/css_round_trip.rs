//! Serialize-then-parse stability of the CSS forms.
//!
//! Colors are drawn from a seeded generator so failures reproduce.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tincture_color::Color;
use tincture_color::css::ToStringOptions;

/// Spaces with a dedicated CSS function, plus two `color()` spaces.
const SPACES: &[&str] = &["srgb", "hsl", "hwb", "lab", "lch", "oklab", "oklch", "display-p3", "xyz-d65"];

#[test]
fn default_output_parses_back() {
    let mut rng = StdRng::seed_from_u64(11);
    let options = ToStringOptions::default();
    for _ in 0..25 {
        let base = Color::random("srgb", &[], &mut rng).unwrap();
        for space in SPACES {
            let c = base.convert(space).unwrap();
            let css = c.to_css(&options).unwrap();
            let back = Color::parse(&css).unwrap_or_else(|e| panic!("{css}: {e}"));
            assert_eq!(back.space(), c.space(), "{css}");
            let de = back.delta_e(&c, Some("2000")).unwrap();
            assert!(de < 0.05, "{css} drifted by {de}");
        }
    }
}

#[test]
fn color_function_for_every_rgb_space() {
    for space in ["srgb", "srgb-linear", "display-p3", "rec2020", "a98-rgb", "prophoto-rgb"] {
        let c = Color::new(space, &[0.25, 0.5, 0.75], 0.5).unwrap();
        let css = c.to_css(&ToStringOptions::new().color(true)).unwrap();
        assert!(css.starts_with("color("), "{css}");
        assert!(css.ends_with("/ 0.5)"), "{css}");
        let back = Color::parse(&css).unwrap();
        assert_eq!(back.space(), space);
        for (a, b) in back.coords().iter().zip(c.coords()) {
            assert!((a - b).abs() < 1e-6);
        }
        assert_eq!(back.alpha(), 0.5);
    }
}

#[test]
fn hex_and_keywords() {
    let c = Color::parse("#ff000080").unwrap();
    let hex = c.to_css(&ToStringOptions::new().hex(true)).unwrap();
    assert_eq!(hex, "#ff000080");

    let opaque = Color::parse("rebeccapurple").unwrap();
    assert_eq!(opaque.to_css(&ToStringOptions::new().hex(true)).unwrap(), "#663399");
    assert_eq!(opaque.to_css(&ToStringOptions::new().names(true)).unwrap(), "rebeccapurple");

    let white = Color::parse("#FFF").unwrap();
    let short = white.to_css(&ToStringOptions::new().hex(true).compress(true).upper(true)).unwrap();
    assert_eq!(short, "#FFF");
}

#[test]
fn legacy_commas() {
    let c = Color::parse("rgba(255, 128, 0, 0.25)").unwrap();
    let css = c.to_css(&ToStringOptions::new().comma(true)).unwrap();
    assert_eq!(css, "rgba(255, 128, 0, 0.25)");
}

#[test]
fn undefined_channels_survive_when_kept() {
    let c = Color::parse("lch(50% none 120)").unwrap();
    assert!(c.coords()[1].is_nan());
    let css = c.to_css(&ToStringOptions::new().none(true)).unwrap();
    assert!(css.contains("none"), "{css}");
    let back = Color::parse(&css).unwrap();
    assert!(back.coords()[1].is_nan());

    // Without the flag undefined values are written as zero.
    let plain = c.to_css(&ToStringOptions::default()).unwrap();
    assert!(!plain.contains("none"), "{plain}");
}

#[test]
fn fit_on_output() {
    let c = Color::parse("color(display-p3 0 1 0)").unwrap().convert("srgb").unwrap();
    let fitted = Color::parse(&c.to_css(&ToStringOptions::default()).unwrap()).unwrap();
    assert!(fitted.in_gamut(None).unwrap());

    let raw = c.to_css(&ToStringOptions::new().fit(false)).unwrap();
    assert!(!Color::parse(&raw).unwrap().in_gamut(None).unwrap());
}

#[test]
fn find_in_text() {
    let text = "border: 1px solid #08c; color: oklch(0.7 0.1 200 / 80%);";
    let first = Color::find(text, 0).unwrap();
    assert_eq!(first.color.space(), "srgb");
    let second = Color::find(text, first.end).unwrap();
    assert_eq!(second.color.space(), "oklch");
    assert_eq!(second.color.alpha(), 0.8);
    assert!(Color::find(text, second.end).is_none());
}
