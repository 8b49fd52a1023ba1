//! Oklab: a perceptual space built from two matrices and a cube root.

use tincture_core::{Channel, FLG_MIRROR_PERCENT, FLG_OPT_PERCENT, LabIsh};
use tincture_math::{Mat3, cbrt};
use tincture_primaries::D65;

use crate::css::{CssFunction, Syntax};
use crate::space::{ROOT, Rectangular, Space, Xy};

const XYZ_TO_LMS: Mat3 = Mat3::from_rows([
    [0.819022437996703, 0.3619062600528904, -0.1288737815209879],
    [0.03298365393238847, 0.9292868615863434, 0.03614466635064236],
    [0.04817718935962421, 0.2642395317527308, 0.6335478284694309],
]);

const LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [1.2268798758459243, -0.5578149944602171, 0.2813910456659647],
    [-0.04057574521480085, 1.1122868032803173, -0.07171105806551636],
    [-0.07637293667466008, -0.42149333240224324, 1.5869240198367818],
]);

const LMS3_TO_OKLAB: Mat3 = Mat3::from_rows([
    [0.2104542553, 0.793617785, -0.0040720468],
    [1.9779984951, -2.428592205, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.808675766],
]);

pub(crate) const OKLAB_TO_LMS3: Mat3 = Mat3::from_rows([
    [0.9999999984505206, 0.39633779217376774, 0.21580375806075874],
    [1.0000000088817604, -0.10556134232365631, -0.06385417477170588],
    [1.0000000546724108, -0.08948418209496573, -1.2914855378640917],
]);

/// Oklab to XYZ (D65).
pub fn oklab_to_xyz(lab: &[f64]) -> Vec<f64> {
    let lms3 = OKLAB_TO_LMS3.transform_slice(lab);
    let lms: Vec<f64> = lms3.iter().map(|v| v.powi(3)).collect();
    LMS_TO_XYZ.transform_slice(&lms)
}

/// XYZ (D65) to Oklab.
pub fn xyz_to_oklab(xyz: &[f64]) -> Vec<f64> {
    let lms: Vec<f64> = XYZ_TO_LMS.transform_slice(xyz).into_iter().map(cbrt).collect();
    LMS3_TO_OKLAB.transform_slice(&lms)
}

const CHANNELS: [Channel; 3] = [
    Channel::new("l", 0.0, 1.0).flags(FLG_OPT_PERCENT),
    Channel::new("a", -0.4, 0.4).flags(FLG_MIRROR_PERCENT | FLG_OPT_PERCENT),
    Channel::new("b", -0.4, 0.4).flags(FLG_MIRROR_PERCENT | FLG_OPT_PERCENT),
];

/// Oklab.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oklab;

impl Space for Oklab {
    fn name(&self) -> &'static str {
        "oklab"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--oklab"]
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
        oklab_to_xyz(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_oklab(coords)
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].hypot(coords[2]) < 0.000002)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }

    fn syntax(&self) -> Option<&dyn Syntax> {
        Some(&CssFunction::Oklab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_primaries::xy_to_xyz;

    #[test]
    fn test_white_has_unit_lightness() {
        let lab = xyz_to_oklab(&xy_to_xyz(D65, 1.0));
        assert!((lab[0] - 1.0).abs() < 1e-6);
        assert!(lab[1].abs() < 1e-6 && lab[2].abs() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let xyz = [0.2, 0.3, 0.4];
        let back = oklab_to_xyz(&xyz_to_oklab(&xyz));
        for i in 0..3 {
            assert!((back[i] - xyz[i]).abs() < 1e-9);
        }
    }
}
