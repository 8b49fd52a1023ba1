//! Uniform variants of the CAM16 and CIECAM02 Jab spaces (UCS, LCD, SCD).
//!
//! Colorfulness is log-compressed and lightness rescaled so Euclidean
//! distance approximates perceived difference. The three variants differ
//! only in their coefficients: UCS for general use, LCD for large
//! differences, SCD for small ones.

use tincture_core::{Channel, FLG_MIRROR_PERCENT, LabIsh};
use tincture_math::{polar_to_rect, rect_to_polar};
use tincture_primaries::D65;

use super::cam02::cam02_model;
use super::cam16::cam16_model;
use super::{ACHROMATIC_THRESHOLD, Model};
use crate::space::{Rectangular, Space, Xy};

/// Uniformity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniformity {
    /// Large color differences.
    Lcd,
    /// Small color differences.
    Scd,
    /// General purpose.
    Ucs,
}

impl Uniformity {
    /// `(K_L, c1, c2)` coefficients.
    pub fn coefficients(self) -> (f64, f64, f64) {
        match self {
            Self::Lcd => (0.77, 0.007, 0.0053),
            Self::Scd => (1.24, 0.007, 0.0363),
            Self::Ucs => (1.00, 0.007, 0.0228),
        }
    }

    const fn ab_range(self) -> f64 {
        match self {
            Self::Lcd => 70.0,
            Self::Scd => 40.0,
            Self::Ucs => 50.0,
        }
    }
}

/// `(J, M, h)` to uniform `(J', a', b')`.
pub fn jmh_to_ucs(jmh: &[f64], kind: Uniformity) -> Vec<f64> {
    let (j, m, h) = (jmh[0], jmh[1], jmh[2]);
    if j == 0.0 {
        return vec![0.0; 3];
    }
    let (_, c1, c2) = kind.coefficients();
    // Only colors far outside the visible gamut push the log argument below one.
    let m = (1.0 + c2 * m).max(1.0).ln() / c2;
    let (a, b) = polar_to_rect(m, if h.is_nan() { 0.0 } else { h });
    let abs_j = j.abs();
    vec![((1.0 + 100.0 * c1) * abs_j / (1.0 + c1 * abs_j)).copysign(j), a, b]
}

/// Uniform `(J', a', b')` back to `(J, M, h)`.
pub fn ucs_to_jmh(ucs: &[f64], kind: Uniformity) -> Vec<f64> {
    let j = ucs[0];
    if j == 0.0 {
        return vec![0.0; 3];
    }
    let (_, c1, c2) = kind.coefficients();
    let (m, h) = rect_to_polar(ucs[1], ucs[2]);
    let m = ((m * c2).exp() - 1.0) / c2;
    let abs_j = j.abs();
    vec![(abs_j / (1.0 - c1 * (abs_j - 100.0))).copysign(j), m, h]
}

/// A uniform Jab space over a CAM JMh space.
#[derive(Debug, Clone, Copy)]
pub struct CamUcs {
    name: &'static str,
    base: &'static str,
    ids: &'static [&'static str],
    kind: Uniformity,
    channels: [Channel; 3],
    model: fn() -> &'static dyn Model,
}

impl CamUcs {
    /// Uniform space `name` over the JMh space `base` of `model`.
    pub const fn new(
        name: &'static str,
        base: &'static str,
        ids: &'static [&'static str],
        kind: Uniformity,
        model: fn() -> &'static dyn Model,
    ) -> Self {
        let ab = kind.ab_range();
        Self {
            name,
            base,
            ids,
            kind,
            channels: [
                Channel::new("j", 0.0, 100.0),
                Channel::new("a", -ab, ab).flags(FLG_MIRROR_PERCENT),
                Channel::new("b", -ab, ab).flags(FLG_MIRROR_PERCENT),
            ],
            model,
        }
    }

    /// The uniformity variant.
    pub fn uniformity(&self) -> Uniformity {
        self.kind
    }
}

impl Space for CamUcs {
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
        &self.channels
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("lightness", "j")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        ucs_to_jmh(coords, self.kind)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        if coords[1] < 0.0 {
            // Negative colorfulness usually comes from numerical noise; a
            // trip through XYZ lands it back on the positive side.
            let model = (self.model)();
            let jmh = model.to_jmh(&model.from_jmh(coords));
            return jmh_to_ucs(&jmh, self.kind);
        }
        jmh_to_ucs(coords, self.kind)
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(ucs_to_jmh(coords, self.kind)[1].abs() < ACHROMATIC_THRESHOLD)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }
}

/// CAM16 UCS.
pub const CAM16_UCS: CamUcs = CamUcs::new("cam16-ucs", "cam16-jmh", &["--cam16-ucs"], Uniformity::Ucs, cam16_model);
/// CAM16 LCD.
pub const CAM16_LCD: CamUcs = CamUcs::new("cam16-lcd", "cam16-jmh", &["--cam16-lcd"], Uniformity::Lcd, cam16_model);
/// CAM16 SCD.
pub const CAM16_SCD: CamUcs = CamUcs::new("cam16-scd", "cam16-jmh", &["--cam16-scd"], Uniformity::Scd, cam16_model);
/// CIECAM02 UCS.
pub const CAM02_UCS: CamUcs = CamUcs::new("cam02-ucs", "cam02-jmh", &["--cam02-ucs"], Uniformity::Ucs, cam02_model);
/// CIECAM02 LCD.
pub const CAM02_LCD: CamUcs = CamUcs::new("cam02-lcd", "cam02-jmh", &["--cam02-lcd"], Uniformity::Lcd, cam02_model);
/// CIECAM02 SCD.
pub const CAM02_SCD: CamUcs = CamUcs::new("cam02-scd", "cam02-jmh", &["--cam02-scd"], Uniformity::Scd, cam02_model);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_pair() {
        for kind in [Uniformity::Ucs, Uniformity::Lcd, Uniformity::Scd] {
            let jmh = [42.0, 31.0, 250.0];
            let back = ucs_to_jmh(&jmh_to_ucs(&jmh, kind), kind);
            for i in 0..3 {
                assert!((back[i] - jmh[i]).abs() < 1e-9, "{kind:?}: {back:?}");
            }
        }
    }

    #[test]
    fn test_black_is_zero() {
        assert_eq!(jmh_to_ucs(&[0.0, 5.0, 10.0], Uniformity::Ucs), vec![0.0; 3]);
        assert_eq!(ucs_to_jmh(&[0.0, 5.0, 10.0], Uniformity::Ucs), vec![0.0; 3]);
    }

    #[test]
    fn test_white_lightness_preserved() {
        let ucs = jmh_to_ucs(&[100.0, 0.0, 0.0], Uniformity::Lcd);
        assert!((ucs[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_colorfulness_reconverts() {
        let ucs = CAM16_UCS.from_base(&[50.0, -10.0, 30.0]);
        assert!(ucs.iter().all(|v| v.is_finite()));
        let jmh = CAM16_UCS.to_base(&ucs);
        assert!(jmh[1] >= 0.0);
    }

    #[test]
    fn test_channel_ranges() {
        assert_eq!(CAM16_LCD.channels()[1].high, 70.0);
        assert_eq!(CAM02_SCD.channels()[2].low, -40.0);
        assert_eq!(CAM02_UCS.uniformity().ab_range(), 50.0);
    }
}
