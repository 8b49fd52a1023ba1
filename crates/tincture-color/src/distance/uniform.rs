//! Metrics in perceptually uniform and appearance spaces.

use tincture_core::Result;
use tincture_math::polar_to_rect;

use super::{DeltaE, distance_euclidean, resolved};
use crate::color::Color;
use crate::gamut::raw_in;
use crate::spaces::cam::hct::HCT_MODEL;
use crate::spaces::cam::ucs::Uniformity;

/// Delta E ITP (ITU-R BT.2124).
#[derive(Debug, Clone, Copy)]
pub struct DeItp {
    /// Scale making one unit roughly one JND.
    pub scalar: f64,
}

impl Default for DeItp {
    fn default() -> Self {
        Self { scalar: 720.0 }
    }
}

impl DeltaE for DeItp {
    fn name(&self) -> &str {
        "itp"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        let [i1, t1, p1] = resolved(color, "ictcp")?;
        let [i2, t2, p2] = resolved(sample, "ictcp")?;
        Ok(self.scalar * ((i1 - i2).powi(2) + 0.25 * (t1 - t2).powi(2) + (p1 - p2).powi(2)).sqrt())
    }
}

/// Delta E z, in Jzazbz.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeZ;

impl DeltaE for DeZ {
    fn name(&self) -> &str {
        "jz"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        let [jz1, az1, bz1] = resolved(color, "jzazbz")?;
        let [jz2, az2, bz2] = resolved(sample, "jzazbz")?;
        let cz1 = az1.hypot(bz1);
        let cz2 = az2.hypot(bz2);
        let dhz = 2.0 * (cz1 * cz2).sqrt() * ((bz1.atan2(az1) - bz2.atan2(az2)) / 2.0).sin();
        Ok(((jz1 - jz2).powi(2) + (cz1 - cz2).powi(2) + dhz * dhz).sqrt())
    }
}

/// Distance in a CAM16 or CAM02 uniform space, lightness scaled by `K_L`.
#[derive(Debug, Clone)]
pub struct CamDistance {
    name: &'static str,
    /// Uniform space, one of the `*-ucs`, `*-lcd` or `*-scd` spaces.
    pub space: &'static str,
    /// Lightness weight of that space.
    pub kl: f64,
}

impl CamDistance {
    /// CAM16 distance in the given uniform variant.
    pub fn cam16(kind: Uniformity) -> Self {
        let space = match kind {
            Uniformity::Ucs => "cam16-ucs",
            Uniformity::Lcd => "cam16-lcd",
            Uniformity::Scd => "cam16-scd",
        };
        Self { name: "cam16", space, kl: kind.coefficients().0 }
    }

    /// CAM02 distance in the given uniform variant.
    pub fn cam02(kind: Uniformity) -> Self {
        let space = match kind {
            Uniformity::Ucs => "cam02-ucs",
            Uniformity::Lcd => "cam02-lcd",
            Uniformity::Scd => "cam02-scd",
        };
        Self { name: "cam02", space, kl: kind.coefficients().0 }
    }
}

impl DeltaE for CamDistance {
    fn name(&self) -> &str {
        self.name
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        let [j1, a1, b1] = resolved(color, self.space)?;
        let [j2, a2, b2] = resolved(sample, self.space)?;
        Ok((((j1 - j2) / self.kl).powi(2) + (a1 - a2).powi(2) + (b1 - b2).powi(2)).sqrt())
    }
}

/// HCT tone with colorfulness on the CAM16 UCS scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeHct;

fn hct_ucs(color: &Color) -> Result<[f64; 3]> {
    let hct = raw_in(color, "hct")?.coords_resolved();
    let (h, c, t) = (hct[0], hct[1], hct[2]);
    let c2 = Uniformity::Ucs.coefficients().2;
    let fl_root = HCT_MODEL.environment().fl_root;
    let m = (1.0 + c2 * c * fl_root).max(1.0).ln() / c2;
    let (a, b) = polar_to_rect(m, h);
    Ok([t, a, b])
}

impl DeltaE for DeHct {
    fn name(&self) -> &str {
        "hct"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        let [t1, a1, b1] = hct_ucs(color)?;
        let [t2, a2, b2] = hct_ucs(sample)?;
        Ok(((t1 - t2).powi(2) + (a1 - a2).powi(2) + (b1 - b2).powi(2)).sqrt())
    }
}

/// Euclidean distance in DIN99o.
#[derive(Debug, Clone, Copy, Default)]
pub struct De99o;

impl DeltaE for De99o {
    fn name(&self) -> &str {
        "99o"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        distance_euclidean(color, sample, "din99o")
    }
}

/// Euclidean distance in Oklab.
#[derive(Debug, Clone, Copy)]
pub struct DeOk {
    /// Output scale.
    pub scalar: f64,
}

impl Default for DeOk {
    fn default() -> Self {
        Self { scalar: 1.0 }
    }
}

impl DeltaE for DeOk {
    fn name(&self) -> &str {
        "ok"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        Ok(self.scalar * distance_euclidean(color, sample, "oklab")?)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_ok_matches_oklab_euclid() {
        let a = Color::new("oklab", &[0.5, 0.1, 0.0], 1.0).unwrap();
        let b = Color::new("oklab", &[0.5, 0.0, 0.0], 1.0).unwrap();
        assert_abs_diff_eq!(DeOk::default().distance(&a, &b).unwrap(), 0.1, epsilon = 1e-9);
        let scaled = DeOk { scalar: 100.0 };
        assert_abs_diff_eq!(scaled.distance(&a, &b).unwrap(), 10.0, epsilon = 1e-7);
    }

    #[test]
    fn test_99o_tracks_din99o_lightness() {
        let a = Color::new("din99o", &[40.0, 10.0, -5.0], 1.0).unwrap();
        let b = Color::new("din99o", &[43.0, 14.0, -5.0], 1.0).unwrap();
        assert_abs_diff_eq!(De99o.distance(&a, &b).unwrap(), 5.0, epsilon = 1e-9);
        // the same pair measured from Lab lands on the same value
        let c = a.convert("lab").unwrap();
        assert_abs_diff_eq!(a.delta_e(&c, Some("99o")).unwrap(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cam_lightness_weight() {
        let a = Color::new("cam16-lcd", &[50.0, 0.0, 0.0], 1.0).unwrap();
        let b = Color::new("cam16-lcd", &[60.0, 0.0, 0.0], 1.0).unwrap();
        let d = CamDistance::cam16(Uniformity::Lcd).distance(&a, &b).unwrap();
        assert_abs_diff_eq!(d, 10.0 / 0.77, epsilon = 1e-9);
    }

    #[test]
    fn test_itp_scale() {
        let a = Color::new("ictcp", &[0.5, 0.0, 0.0], 1.0).unwrap();
        let b = Color::new("ictcp", &[0.5, 0.02, 0.0], 1.0).unwrap();
        assert_abs_diff_eq!(DeItp::default().distance(&a, &b).unwrap(), 720.0 * 0.01, epsilon = 1e-9);
    }

    #[test]
    fn test_hct_tone_only() {
        let a = Color::new("hct", &[120.0, 0.0, 40.0], 1.0).unwrap();
        let b = Color::new("hct", &[120.0, 0.0, 50.0], 1.0).unwrap();
        assert_abs_diff_eq!(DeHct.distance(&a, &b).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hct_drives_chroma_fit() {
        let mut c = Color::new("hct", &[140.0, 120.0, 70.0], 1.0).unwrap();
        c.fit(Some("srgb"), Some("hct-chroma")).unwrap();
        assert!(c.in_gamut_tol(Some("srgb"), 1e-4).unwrap());
    }
}
