//! XYB, the opponent space used by JPEG XL.
//!
//! Lightness is the middle channel, so the Lab capability reports the
//! channels as `y x b`.

use tincture_core::{Channel, FLG_MIRROR_PERCENT, LabIsh};
use tincture_math::{Mat3, nth_root};
use tincture_primaries::D65;

use crate::space::{Space, Xy};

const BIAS: f64 = 0.003_793_073_255_275_449_33;
const BIAS_CBRT: f64 = 0.155_954_200_549_248_63;

const LRGB_TO_LMS: Mat3 = Mat3::from_rows([
    [0.3, 0.622, 0.078],
    [0.23, 0.692, 0.078],
    [0.24342268924547819, 0.20476744424496821, 0.55180986650955360],
]);

const LMS_TO_LRGB: Mat3 = Mat3::from_rows([
    [11.031566904639865, -9.866943908131564, -0.16462299650829934],
    [-3.254147381074425, 4.4187703775827245, -0.16462299650829929],
    [-3.6588512867136815, 2.712923045936092, 1.945928240777589],
]);

const LMS_TO_XYB: Mat3 = Mat3::from_rows([[0.5, -0.5, 0.0], [0.5, 0.5, 0.0], [0.0, -1.0, 1.0]]);

const XYB_TO_LMS: Mat3 = Mat3::from_rows([[1.0, 1.0, 0.0], [-1.0, 1.0, 0.0], [-1.0, 1.0, 1.0]]);

/// Linear sRGB to XYB.
pub fn rgb_to_xyb(rgb: &[f64]) -> Vec<f64> {
    let lms: Vec<f64> =
        LRGB_TO_LMS.transform_slice(rgb).into_iter().map(|c| nth_root(c + BIAS, 3.0) - BIAS_CBRT).collect();
    LMS_TO_XYB.transform_slice(&lms)
}

/// XYB to linear sRGB. All-zero input is exact black.
pub fn xyb_to_rgb(xyb: &[f64]) -> Vec<f64> {
    if xyb.iter().all(|&c| c == 0.0) {
        return vec![0.0; 3];
    }
    let lms: Vec<f64> =
        XYB_TO_LMS.transform_slice(xyb).into_iter().map(|c| (c + BIAS_CBRT).powi(3) - BIAS).collect();
    LMS_TO_LRGB.transform_slice(&lms)
}

const CHANNELS: [Channel; 3] = [
    Channel::new("x", -0.05, 0.05).flags(FLG_MIRROR_PERCENT),
    Channel::new("y", 0.0, 0.845),
    Channel::new("b", -0.45, 0.45).flags(FLG_MIRROR_PERCENT),
];

/// XYB over linear sRGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xyb;

impl LabIsh for Xyb {
    fn indexes(&self) -> [usize; 3] {
        [1, 0, 2]
    }
}

impl Space for Xyb {
    fn name(&self) -> &'static str {
        "xyb"
    }

    fn base(&self) -> &'static str {
        "srgb-linear"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--xyb"]
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        xyb_to_rgb(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        rgb_to_xyb(coords)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_black_and_white() {
        let black = rgb_to_xyb(&[0.0; 3]);
        for c in &black {
            assert_abs_diff_eq!(*c, 0.0, epsilon = 1e-12);
        }
        assert_eq!(xyb_to_rgb(&[0.0; 3]), vec![0.0; 3]);

        let white = rgb_to_xyb(&[1.0; 3]);
        assert_abs_diff_eq!(white[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(white[1], 0.845, epsilon = 1e-3);
        assert_abs_diff_eq!(white[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let rgb = [0.7, 0.1, 0.35];
        let back = xyb_to_rgb(&rgb_to_xyb(&rgb));
        for i in 0..3 {
            assert_abs_diff_eq!(back[i], rgb[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_lightness_is_middle_channel() {
        assert_eq!(Xyb.lab().map(|l| l.indexes()), Some([1, 0, 2]));
    }
}
