//! CIE Luv over an XYZ base.
//!
//! Like Lab, `luv` is relative to D50 and `luv-d65` keeps the D65 white.
//! Their polar forms (`lchuv`, `lchuv-d65`) are [`Lch`](super::lch::Lch)
//! instances.

use tincture_core::{Channel, FLG_MIRROR_PERCENT, FLG_OPT_PERCENT, LabIsh};
use tincture_math::nth_root;
use tincture_primaries::{D50, D65, xy_to_xyz};

use super::lab::{ACHROMATIC_THRESHOLD, EPSILON, KAPPA, KE};
use crate::space::{ROOT, Rectangular, Space, Xy};

/// XYZ to CIE 1976 u'v'; black maps to the origin.
fn xyz_to_uv(xyz: &[f64]) -> [f64; 2] {
    let denom = xyz[0] + 15.0 * xyz[1] + 3.0 * xyz[2];
    if denom == 0.0 { [0.0, 0.0] } else { [4.0 * xyz[0] / denom, 9.0 * xyz[1] / denom] }
}

/// XYZ relative to `white` (XYZ with `Y = 1`) to Luv.
pub fn xyz_to_luv(xyz: &[f64], white: [f64; 3]) -> Vec<f64> {
    let [u, v] = xyz_to_uv(xyz);
    let [ur, vr] = xyz_to_uv(&white);
    let yr = xyz[1] / white[1];
    let l = if yr > EPSILON { 116.0 * nth_root(yr, 3.0) - 16.0 } else { KAPPA * yr };
    vec![l, 13.0 * l * (u - ur), 13.0 * l * (v - vr)]
}

/// Luv to XYZ relative to `white`.
pub fn luv_to_xyz(luv: &[f64], white: [f64; 3]) -> Vec<f64> {
    let (l, u, v) = (luv[0], luv[1], luv[2]);
    let [ur, vr] = xyz_to_uv(&white);
    let (up, vp) = if l == 0.0 { (0.0, 0.0) } else { (u / (13.0 * l) + ur, v / (13.0 * l) + vr) };
    let y = white[1] * if l > KE { ((l + 16.0) / 116.0).powi(3) } else { l / KAPPA };
    if vp == 0.0 {
        return vec![0.0, y, 0.0];
    }
    vec![y * (9.0 * up) / (4.0 * vp), y, y * (12.0 - 3.0 * up - 20.0 * vp) / (4.0 * vp)]
}

/// A CIE Luv space.
#[derive(Debug, Clone, Copy)]
pub struct Luv {
    name: &'static str,
    base: &'static str,
    ids: &'static [&'static str],
    white: Xy,
}

const CHANNELS: [Channel; 3] = [
    Channel::new("l", 0.0, 100.0).flags(FLG_OPT_PERCENT),
    Channel::new("u", -215.0, 215.0).flags(FLG_MIRROR_PERCENT | FLG_OPT_PERCENT),
    Channel::new("v", -215.0, 215.0).flags(FLG_MIRROR_PERCENT | FLG_OPT_PERCENT),
];

/// CIE Luv (D50).
pub const LUV: Luv = Luv { name: "luv", base: "xyz-d50", ids: &["--luv"], white: D50 };

/// CIE Luv relative to D65.
pub const LUV_D65: Luv = Luv { name: "luv-d65", base: ROOT, ids: &["--luv-d65"], white: D65 };

impl Space for Luv {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        self.base
    }

    fn serialize(&self) -> &[&'static str] {
        self.ids
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("lightness", "l")]
    }

    fn white(&self) -> Xy {
        self.white
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        luv_to_xyz(coords, xy_to_xyz(self.white, 1.0))
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_luv(coords, xy_to_xyz(self.white, 1.0))
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].hypot(coords[2]) < ACHROMATIC_THRESHOLD)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_white_is_neutral() {
        let luv = LUV_D65.from_base(&xy_to_xyz(D65, 1.0));
        assert_abs_diff_eq!(luv[0], 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(luv[1], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(luv[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_black() {
        assert_eq!(LUV.from_base(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
        assert_eq!(LUV.to_base(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_srgb_red() {
        // linear sRGB red in D65 XYZ
        let luv = LUV_D65.from_base(&[0.41239079926595923, 0.21263900587151022, 0.019330818715591818]);
        assert_abs_diff_eq!(luv[0], 53.2371, epsilon = 1e-3);
        assert_abs_diff_eq!(luv[1], 175.0098, epsilon = 1e-3);
        assert_abs_diff_eq!(luv[2], 37.7651, epsilon = 1e-3);
    }
}
