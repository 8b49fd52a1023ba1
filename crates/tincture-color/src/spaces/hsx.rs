//! Cylindrical transforms of sRGB: HSL, HSV and HWB.
//!
//! The chain is `srgb -> hsl -> hsv -> hwb`. All three are bounded by the
//! sRGB gamut but clip in their own coordinates.

use tincture_core::{Channel, Cylindrical, FLG_ANGLE, FLG_OPT_PERCENT, FLG_PERCENT, HslIsh, HsvIsh, HwbIsh};
use tincture_math::constrain_hue;
use tincture_primaries::D65;

use crate::css::{CssFunction, Syntax};
use crate::space::{Polar, Space, Xy};

/// Below this, `1 - (w + b)` means HWB is a gray.
const HWB_GRAY: f64 = 2e-7;

// ============================================================================
// Transforms
// ============================================================================

/// sRGB to HSL. The hue of a gray is undefined (NaN).
pub fn srgb_to_hsl(rgb: &[f64]) -> Vec<f64> {
    let (r, g, b) = (rgb[0], rgb[1], rgb[2]);
    let mx = r.max(g).max(b);
    let mn = r.min(g).min(b);
    let l = (mn + mx) / 2.0;
    let c = mx - mn;
    let mut h = f64::NAN;
    let mut s = 0.0;

    if c != 0.0 {
        h = if mx == r {
            (g - b) / c
        } else if mx == g {
            (b - r) / c + 2.0
        } else {
            (r - g) / c + 4.0
        };
        s = if l == 0.0 || l == 1.0 { 0.0 } else { (mx - l) / l.min(1.0 - l) };
        h *= 60.0;
        if s == 0.0 {
            h = f64::NAN;
        }
    }
    vec![constrain_hue(h), s, l]
}

/// HSL to sRGB.
pub fn hsl_to_srgb(hsl: &[f64]) -> Vec<f64> {
    let h = hsl[0].rem_euclid(360.0);
    let (s, l) = (hsl[1], hsl[2]);
    let f = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let a = s * l.min(1.0 - l);
        l - a * (-1f64).max((k - 3.0).min(9.0 - k).min(1.0))
    };
    vec![f(0.0), f(8.0), f(4.0)]
}

/// HSL to HSV.
pub fn hsl_to_hsv(hsl: &[f64]) -> Vec<f64> {
    let (h, s, l) = (hsl[0], hsl[1], hsl[2]);
    let v = l + s * l.min(1.0 - l);
    let sv = if v == 0.0 { 0.0 } else { 2.0 * (1.0 - l / v) };
    vec![h, sv, v]
}

/// HSV to HSL.
pub fn hsv_to_hsl(hsv: &[f64]) -> Vec<f64> {
    let (h, s, v) = (hsv[0], hsv[1], hsv[2]);
    let l = v * (1.0 - s / 2.0);
    let sl = if l == 0.0 || l == 1.0 { 0.0 } else { (v - l) / l.min(1.0 - l) };
    vec![h, sl, l]
}

/// HSV to HWB.
pub fn hsv_to_hwb(hsv: &[f64]) -> Vec<f64> {
    let (mut h, s, v) = (hsv[0], hsv[1], hsv[2]);
    let w = v * (1.0 - s);
    let b = 1.0 - v;
    if 1.0 - (w + b) < HWB_GRAY {
        h = 0.0;
    }
    vec![h, w, b]
}

/// HWB to HSV. Whiteness and blackness summing past 1 normalize to a gray.
pub fn hwb_to_hsv(hwb: &[f64]) -> Vec<f64> {
    let (h, w, b) = (hwb[0], hwb[1], hwb[2]);
    let wb = w + b;
    if 1.0 - wb < HWB_GRAY {
        return vec![0.0, 0.0, w / wb];
    }
    let v = 1.0 - b;
    let s = if v == 0.0 { 0.0 } else { 1.0 - w / v };
    vec![h, s, v]
}

fn no_nans(mut coords: Vec<f64>) -> Vec<f64> {
    for c in &mut coords {
        if c.is_nan() {
            *c = 0.0;
        }
    }
    coords
}

// ============================================================================
// HSL
// ============================================================================

const HSL_CHANNELS: [Channel; 3] = [
    Channel::angle("h").bound(true),
    Channel::new("s", 0.0, 1.0).bound(true).flags(FLG_PERCENT),
    Channel::new("l", 0.0, 1.0).bound(true).flags(FLG_PERCENT),
];

/// HSL over sRGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hsl;

impl Space for Hsl {
    fn name(&self) -> &'static str {
        "hsl"
    }

    fn base(&self) -> &'static str {
        "srgb"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--hsl"]
    }

    fn channels(&self) -> &[Channel] {
        &HSL_CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("hue", "h"), ("saturation", "s"), ("lightness", "l")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn gamut_check(&self) -> Option<&'static str> {
        Some("srgb")
    }

    fn clip_space(&self) -> Option<&'static str> {
        Some("hsl")
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        hsl_to_srgb(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        srgb_to_hsl(coords)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut coords = no_nans(coords);
        if coords[1] == 0.0 || coords[2] == 0.0 || coords[2] == 1.0 {
            coords[0] = f64::NAN;
        }
        coords
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        let (s, l) = (coords[1], coords[2]);
        Some(s.abs() < 1e-4 || l == 0.0 || (1.0 - l).abs() < 1e-7)
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::HSX)
    }

    fn hsl(&self) -> Option<&dyn HslIsh> {
        Some(&Polar::HSX)
    }

    fn syntax(&self) -> Option<&dyn Syntax> {
        Some(&CssFunction::Hsl)
    }
}

// ============================================================================
// HSV
// ============================================================================

const HSV_CHANNELS: [Channel; 3] = [
    Channel::angle("h").bound(true),
    Channel::new("s", 0.0, 1.0).bound(true).flags(FLG_OPT_PERCENT),
    Channel::new("v", 0.0, 1.0).bound(true).flags(FLG_OPT_PERCENT),
];

/// HSV over HSL.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hsv;

impl Space for Hsv {
    fn name(&self) -> &'static str {
        "hsv"
    }

    fn base(&self) -> &'static str {
        "hsl"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--hsv"]
    }

    fn channels(&self) -> &[Channel] {
        &HSV_CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("hue", "h"), ("saturation", "s"), ("value", "v")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn gamut_check(&self) -> Option<&'static str> {
        Some("srgb")
    }

    fn clip_space(&self) -> Option<&'static str> {
        Some("hsv")
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        hsv_to_hsl(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        hsl_to_hsv(coords)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut coords = no_nans(coords);
        if coords[1] == 0.0 || coords[2] == 0.0 {
            coords[0] = f64::NAN;
        }
        coords
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].abs() < 1e-4 || coords[2] == 0.0)
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::HSX)
    }

    fn hsv(&self) -> Option<&dyn HsvIsh> {
        Some(&Polar::HSX)
    }
}

// ============================================================================
// HWB
// ============================================================================

const HWB_CHANNELS: [Channel; 3] = [
    Channel::new("h", 0.0, 360.0).bound(true).flags(FLG_ANGLE),
    Channel::new("w", 0.0, 1.0).bound(true).flags(FLG_OPT_PERCENT),
    Channel::new("b", 0.0, 1.0).bound(true).flags(FLG_OPT_PERCENT),
];

/// HWB over HSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hwb;

impl Space for Hwb {
    fn name(&self) -> &'static str {
        "hwb"
    }

    fn base(&self) -> &'static str {
        "hsv"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--hwb"]
    }

    fn channels(&self) -> &[Channel] {
        &HWB_CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("hue", "h"), ("whiteness", "w"), ("blackness", "b")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn gamut_check(&self) -> Option<&'static str> {
        Some("srgb")
    }

    fn clip_space(&self) -> Option<&'static str> {
        Some("hwb")
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        hwb_to_hsv(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        hsv_to_hwb(coords)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut coords = no_nans(coords);
        if 1.0 - (coords[1] + coords[2]) < HWB_GRAY {
            coords[0] = f64::NAN;
        }
        coords
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        let (w, b) = (coords[1], coords[2]);
        if 1.0 - (w + b) < HWB_GRAY {
            return Some(true);
        }
        let v = 1.0 - b;
        let s = if v == 0.0 { 0.0 } else { 1.0 - w / v };
        Some(s.abs() < 1e-4)
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::HSX)
    }

    fn hwb(&self) -> Option<&dyn HwbIsh> {
        Some(&Polar::HSX)
    }

    fn syntax(&self) -> Option<&dyn Syntax> {
        Some(&CssFunction::Hwb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_red() {
        let hsl = srgb_to_hsl(&[1.0, 0.0, 0.0]);
        assert!(close(&hsl, &[0.0, 1.0, 0.5]));
        assert!(close(&hsl_to_srgb(&hsl), &[1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_gray_hue_is_undefined() {
        let hsl = srgb_to_hsl(&[0.5, 0.5, 0.5]);
        assert!(hsl[0].is_nan());
        assert_eq!(hsl[1], 0.0);
    }

    #[test]
    fn test_chain_round_trip() {
        let hsl = vec![200.0, 0.6, 0.3];
        let hsv = hsl_to_hsv(&hsl);
        let hwb = hsv_to_hwb(&hsv);
        let back = hsv_to_hsl(&hwb_to_hsv(&hwb));
        assert!(close(&back, &hsl));
    }

    #[test]
    fn test_hwb_gray_collapse() {
        let hsv = hwb_to_hsv(&[120.0, 0.6, 0.6]);
        assert!(close(&hsv, &[0.0, 0.0, 0.5]));
    }

    #[test]
    fn test_normalize_powerless() {
        let n = Hsl.normalize(vec![120.0, 0.0, 0.4]);
        assert!(n[0].is_nan());
        let n = Hwb.normalize(vec![120.0, 0.5, 0.5]);
        assert!(n[0].is_nan());
        let n = Hsv.normalize(vec![f64::NAN, 0.5, 0.5]);
        assert_eq!(n[0], 0.0);
    }

    #[test]
    fn test_achromatic() {
        assert_eq!(Hsl.is_achromatic(&[10.0, 0.5, 1.0]), Some(true));
        assert_eq!(Hsv.is_achromatic(&[10.0, 0.5, 0.5]), Some(false));
        assert_eq!(Hwb.is_achromatic(&[10.0, 0.2, 0.2]), Some(false));
    }
}
