//! IPT (Ebner and Fairchild, 1998).

use tincture_core::{Channel, FLG_MIRROR_PERCENT, LabIsh};
use tincture_math::{Mat3, npow, nth_root};
use tincture_primaries::D65;

use crate::space::{ROOT, Rectangular, Space, Xy};

const XYZ_TO_LMS: Mat3 = Mat3::from_rows([
    [0.4002, 0.7075, -0.0807],
    [-0.2280, 1.1500, 0.0612],
    [0.0, 0.0, 0.9184],
]);

const LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [1.8502429449432054, -1.1383016378672328, 0.23843495850870136],
    [0.3668307751713486, 0.6438845448402355, -0.010673443584379994],
    [0.0, 0.0, 1.088850174216028],
]);

const LMS_P_TO_IPT: Mat3 = Mat3::from_rows([
    [0.4, 0.4, 0.2],
    [4.455, -4.851, 0.396],
    [0.8056, 0.3572, -1.1628],
]);

const IPT_TO_LMS_P: Mat3 = Mat3::from_rows([
    [1.0, 0.0975689305146139, 0.20522643316459155],
    [1.0, -0.11387648547314713, 0.133217158369998],
    [1.0, 0.03261510991706641, -0.6768871830691794],
]);

const EXP: f64 = 0.43;

// The model's white differs slightly from our D65, so neutrals sit on a
// line through the origin rather than on the I axis.
const NEUTRAL_P: f64 = 0.000_116_528_514_531_010_66;
const NEUTRAL_T: f64 = -0.000_108_572_121_337_443_95;

/// XYZ (D65) to IPT.
pub fn xyz_to_ipt(xyz: &[f64]) -> Vec<f64> {
    let lms_p: Vec<f64> = XYZ_TO_LMS.transform_slice(xyz).into_iter().map(|c| npow(c, EXP)).collect();
    LMS_P_TO_IPT.transform_slice(&lms_p)
}

/// IPT to XYZ (D65).
pub fn ipt_to_xyz(ipt: &[f64]) -> Vec<f64> {
    let lms: Vec<f64> = IPT_TO_LMS_P.transform_slice(ipt).into_iter().map(|c| nth_root(c, EXP)).collect();
    LMS_TO_XYZ.transform_slice(&lms)
}

const CHANNELS: [Channel; 3] = [
    Channel::new("i", 0.0, 1.0),
    Channel::new("p", -1.0, 1.0).flags(FLG_MIRROR_PERCENT),
    Channel::new("t", -1.0, 1.0).flags(FLG_MIRROR_PERCENT),
];

/// IPT over `xyz-d65`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ipt;

impl Space for Ipt {
    fn name(&self) -> &'static str {
        "ipt"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--ipt"]
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("intensity", "i"), ("protan", "p"), ("tritan", "t")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        ipt_to_xyz(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_ipt(coords)
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        let i = coords[0];
        Some((coords[1] - NEUTRAL_P * i).hypot(coords[2] - NEUTRAL_T * i) < 1e-5)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tincture_primaries::xy_to_xyz;

    use super::*;

    #[test]
    fn test_white() {
        let ipt = xyz_to_ipt(&xy_to_xyz(D65, 1.0));
        assert_abs_diff_eq!(ipt[0], 1.0, epsilon = 1e-3);
        assert!(Ipt.is_achromatic(&ipt).unwrap_or(false));
    }

    #[test]
    fn test_grays_are_achromatic() {
        for y in [0.01, 0.2, 0.5, 0.9] {
            let ipt = xyz_to_ipt(&xy_to_xyz(D65, y));
            assert!(Ipt.is_achromatic(&ipt).unwrap_or(false), "gray {y} -> {ipt:?}");
        }
        assert_eq!(Ipt.is_achromatic(&[0.5, 0.1, 0.0]), Some(false));
    }

    #[test]
    fn test_round_trip() {
        let xyz = [0.3, 0.2, 0.6];
        let back = ipt_to_xyz(&xyz_to_ipt(&xyz));
        for i in 0..3 {
            assert_abs_diff_eq!(back[i], xyz[i], epsilon = 1e-9);
        }
    }
}
