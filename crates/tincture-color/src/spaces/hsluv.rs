//! HSLuv and HPLuv: LCh(uv) with chroma rescaled against the sRGB gamut.
//!
//! HSLuv saturation is a percentage of the largest in-gamut chroma for the
//! hue and lightness; HPLuv uses the largest chroma that is in gamut for
//! every hue at that lightness, so it covers only pastels.

use tincture_core::{Channel, Cylindrical, HslIsh};
use tincture_math::constrain_hue;
use tincture_primaries::{D65, XYZ_TO_SRGB};

use super::lab::{EPSILON, KAPPA};
use crate::space::{Polar, Space, Xy};

/// Chroma below which the hue is undefined.
const ACHROMATIC_THRESHOLD: f64 = 1e-4;
/// Lightness within this of 0 or 100 is black or white.
const L_EDGE: f64 = 1e-7;

/// The six sRGB gamut edges at lightness `l` as `(slope, intercept)` lines
/// in the chroma plane.
fn bounds(l: f64) -> [(f64, f64); 6] {
    let sub1 = (l + 16.0).powi(3) / 1_560_896.0;
    let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };
    let mut out = [(0.0, 0.0); 6];
    for c in 0..3 {
        let [m1, m2, m3] = XYZ_TO_SRGB.row(c);
        for t in 0..2 {
            let t = t as f64;
            let top1 = (284_517.0 * m1 - 94_839.0 * m3) * sub2;
            let top2 = (838_422.0 * m3 + 769_860.0 * m2 + 731_718.0 * m1) * l * sub2 - 769_860.0 * t * l;
            let bottom = (632_260.0 * m3 - 126_452.0 * m2) * sub2 + 126_452.0 * t;
            out[c * 2 + t as usize] = (top1 / bottom, top2 / bottom);
        }
    }
    out
}

/// Largest in-gamut chroma for lightness `l` and hue `h`.
fn max_chroma_for_lh(l: f64, h: f64) -> f64 {
    let (sin, cos) = h.to_radians().sin_cos();
    bounds(l)
        .iter()
        .map(|(slope, intercept)| intercept / (sin - slope * cos))
        .filter(|len| *len >= 0.0)
        .fold(f64::INFINITY, f64::min)
}

/// Largest chroma in gamut for every hue at lightness `l`.
fn max_safe_chroma_for_l(l: f64) -> f64 {
    bounds(l)
        .iter()
        .map(|(slope, intercept)| intercept.abs() / (slope * slope + 1.0).sqrt())
        .fold(f64::INFINITY, f64::min)
}

/// Lightness when the color is neither black nor white.
fn interior(l: f64) -> Option<f64> {
    (1e-8..=100.0 - L_EDGE).contains(&l).then_some(l)
}

/// Snaps near-black and near-white lightness to the ends.
fn pinned(l: f64) -> f64 {
    if l > 100.0 - L_EDGE {
        100.0
    } else if l < 1e-8 {
        0.0
    } else {
        l
    }
}

/// `(h, s, l)` to LCh(uv) using `max` as the chroma scale.
fn to_lch(coords: &[f64], max: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let (mut h, s, l) = (coords[0], coords[1], coords[2]);
    let mut c = 0.0;
    if let Some(l) = interior(l).filter(|_| !h.is_nan()) {
        c = max(l, h) / 100.0 * s;
        if c < ACHROMATIC_THRESHOLD {
            h = f64::NAN;
        }
    }
    vec![pinned(l), c, constrain_hue(h)]
}

/// LCh(uv) to `(h, s, l)` using `max` as the chroma scale.
fn from_lch(coords: &[f64], max: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let (l, c, mut h) = (coords[0], coords[1], coords[2]);
    let mut s = 0.0;
    if let Some(l) = interior(l).filter(|_| !h.is_nan()) {
        s = c / max(l, h) * 100.0;
    }
    if s < 1e-8 {
        h = f64::NAN;
    }
    vec![constrain_hue(h), s, pinned(l)]
}

/// HSLuv to LCh(uv).
pub fn hsluv_to_lch(hsluv: &[f64]) -> Vec<f64> {
    to_lch(hsluv, max_chroma_for_lh)
}

/// LCh(uv) to HSLuv.
pub fn lch_to_hsluv(lch: &[f64]) -> Vec<f64> {
    from_lch(lch, max_chroma_for_lh)
}

/// HPLuv to LCh(uv).
pub fn hpluv_to_lch(hpluv: &[f64]) -> Vec<f64> {
    to_lch(hpluv, |l, _| max_safe_chroma_for_l(l))
}

/// LCh(uv) to HPLuv.
pub fn lch_to_hpluv(lch: &[f64]) -> Vec<f64> {
    from_lch(lch, |l, _| max_safe_chroma_for_l(l))
}

/// HSLuv or HPLuv.
#[derive(Debug, Clone, Copy)]
pub struct Hsluv {
    name: &'static str,
    ids: &'static [&'static str],
    channels: [Channel; 3],
    aliases: &'static [(&'static str, &'static str)],
    gamut: Option<&'static str>,
    to: fn(&[f64]) -> Vec<f64>,
    from: fn(&[f64]) -> Vec<f64>,
}

/// HSLuv, bounded by sRGB.
pub const HSLUV: Hsluv = Hsluv {
    name: "hsluv",
    ids: &["--hsluv"],
    channels: [
        Channel::angle("h").bound(true),
        Channel::new("s", 0.0, 100.0).bound(true),
        Channel::new("l", 0.0, 100.0).bound(true),
    ],
    aliases: &[("hue", "h"), ("saturation", "s"), ("lightness", "l")],
    gamut: Some("srgb"),
    to: hsluv_to_lch,
    from: lch_to_hsluv,
};

/// HPLuv, the pastel subset of HSLuv.
pub const HPLUV: Hsluv = Hsluv {
    name: "hpluv",
    ids: &["--hpluv"],
    channels: [
        Channel::angle("h").bound(true),
        Channel::new("p", 0.0, 100.0).bound(true),
        Channel::new("l", 0.0, 100.0).bound(true),
    ],
    aliases: &[("hue", "h"), ("perpendiculars", "p"), ("lightness", "l")],
    gamut: None,
    to: hpluv_to_lch,
    from: lch_to_hpluv,
};

impl Space for Hsluv {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        "lchuv-d65"
    }

    fn serialize(&self) -> &[&'static str] {
        self.ids
    }

    fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        self.aliases
    }

    fn white(&self) -> Xy {
        D65
    }

    fn gamut_check(&self) -> Option<&'static str> {
        self.gamut
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        (self.to)(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        (self.from)(coords)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut c: Vec<f64> = coords.into_iter().map(|v| if v.is_nan() { 0.0 } else { v }).collect();
        if c[1] == 0.0 || interior(c[2]).is_none() {
            c[0] = f64::NAN;
        }
        c
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].abs() < 1e-4 || interior(coords[2]).is_none())
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::HSX)
    }

    fn hsl(&self) -> Option<&dyn HslIsh> {
        Some(&Polar::HSX)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::color::Color;

    #[test]
    fn test_srgb_primaries_are_full_saturation() {
        for rgb in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 0.0]] {
            let c = Color::new("srgb", &rgb, 1.0).unwrap().convert("hsluv").unwrap();
            assert_abs_diff_eq!(c.coords()[1], 100.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_known_red() {
        let c = Color::new("srgb", &[1.0, 0.0, 0.0], 1.0).unwrap().convert("hsluv").unwrap();
        assert_abs_diff_eq!(c.coords()[0], 12.177, epsilon = 1e-2);
        assert_abs_diff_eq!(c.coords()[2], 53.237, epsilon = 1e-2);
    }

    #[test]
    fn test_hpluv_is_pastel() {
        for hue in [0.0, 90.0, 200.0, 300.0] {
            let c = Color::new("hpluv", &[hue, 95.0, 60.0], 1.0).unwrap();
            assert!(c.in_gamut(Some("srgb")).unwrap(), "{hue}");
            let back = c.convert("srgb").unwrap().convert("hpluv").unwrap();
            assert_abs_diff_eq!(back.coords()[1], 95.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_white_has_no_hue() {
        let c = Color::new("srgb", &[1.0, 1.0, 1.0], 1.0).unwrap().convert("hsluv").unwrap();
        assert!(c.coords()[0].is_nan());
        assert_abs_diff_eq!(c.coords()[2], 100.0, epsilon = 1e-6);
        assert!(c.is_achromatic().unwrap());
    }
}
