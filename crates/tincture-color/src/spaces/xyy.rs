//! CIE xyY over `xyz-d65`.

use tincture_core::Channel;
use tincture_math::vec3;
use tincture_primaries::{D65, xy_to_xyz, xyz_to_xyy};

use crate::space::{ROOT, Space, Xy};

const CHANNELS: [Channel; 3] = [Channel::new("x", 0.0, 1.0), Channel::new("y", 0.0, 1.0), Channel::new("Y", 0.0, 1.0)];

/// Chromaticity plus luminance. Black takes the white point's chromaticity.
#[derive(Debug, Clone, Copy, Default)]
pub struct XyY;

impl Space for XyY {
    fn name(&self) -> &'static str {
        "xyy"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--xyy"]
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        xy_to_xyz([coords[0], coords[1]], coords[2]).to_vec()
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_xyy(vec3(coords), D65).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_chromaticity() {
        let xyy = XyY.from_base(&xy_to_xyz(D65, 1.0));
        assert!((xyy[0] - D65[0]).abs() < 1e-12);
        assert!((xyy[1] - D65[1]).abs() < 1e-12);
        assert!((xyy[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_black() {
        assert_eq!(XyY.from_base(&[0.0; 3]), vec![D65[0], D65[1], 0.0]);
        assert_eq!(XyY.to_base(&[0.3, 0.0, 0.5]), vec![0.0; 3]);
    }
}
