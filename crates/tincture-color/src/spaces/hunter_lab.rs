//! Hunter Lab, with `Ka`/`Kb` scaled from illuminant C to D65.

use tincture_core::{Channel, FLG_MIRROR_PERCENT, LabIsh};
use tincture_math::{nth_root, scale3};
use tincture_primaries::{D65, xy_to_xyz};

use super::lab::ACHROMATIC_THRESHOLD;
use crate::space::{ROOT, Rectangular, Space, Xy};

// Illuminant C reference white and coefficients of the original scale.
const CXN: f64 = 98.04;
const CZN: f64 = 118.11;
const CKA: f64 = 175.0;
const CKB: f64 = 70.0;

fn coefficients(white: Xy) -> ([f64; 3], f64, f64) {
    let n = scale3(xy_to_xyz(white, 1.0), 100.0);
    (n, CKA * nth_root(n[0] / CXN, 2.0), CKB * nth_root(n[2] / CZN, 2.0))
}

/// XYZ to Hunter Lab relative to `white`.
pub fn xyz_to_hlab(xyz: &[f64], white: Xy) -> Vec<f64> {
    let ([xn, yn, zn], ka, kb) = coefficients(white);
    let (x, y, z) = (xyz[0] * 100.0, xyz[1] * 100.0, xyz[2] * 100.0);
    let l = nth_root(y / yn, 2.0);
    if l == 0.0 {
        return vec![0.0, 0.0, 0.0];
    }
    vec![l * 100.0, ka * (x / xn - y / yn) / l, kb * (y / yn - z / zn) / l]
}

/// Hunter Lab to XYZ relative to `white`.
pub fn hlab_to_xyz(hlab: &[f64], white: Xy) -> Vec<f64> {
    let ([xn, yn, zn], ka, kb) = coefficients(white);
    let l = hlab[0] / 100.0;
    let y = l * l * yn;
    let x = (hlab[1] * l / ka + y / yn) * xn;
    let z = (hlab[2] * l / kb - y / yn) * -zn;
    vec![x / 100.0, y / 100.0, z / 100.0]
}

const CHANNELS: [Channel; 3] = [
    Channel::new("l", 0.0, 100.0),
    Channel::new("a", -210.0, 210.0).flags(FLG_MIRROR_PERCENT),
    Channel::new("b", -210.0, 210.0).flags(FLG_MIRROR_PERCENT),
];

/// Hunter Lab relative to D65.
#[derive(Debug, Clone, Copy, Default)]
pub struct HunterLab;

impl Space for HunterLab {
    fn name(&self) -> &'static str {
        "hunter-lab"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--hunter-lab"]
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("lightness", "l")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        hlab_to_xyz(coords, D65)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_hlab(coords, D65)
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].hypot(coords[2]) < ACHROMATIC_THRESHOLD)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }
}
