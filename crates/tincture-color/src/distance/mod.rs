//! Color difference.
//!
//! Every metric is a [`DeltaE`] plugin that converts both colors itself;
//! callers pick one by name through [`Color::delta_e`].
//!
//! | Name | Metric |
//! |------|--------|
//! | `76` | Euclidean in CIE Lab (D65) |
//! | `94`, `cmc` | weighted CIE Lab (D50), asymmetric |
//! | `2000` | CIEDE2000 |
//! | `hyab` | L1 lightness + Euclidean chroma plane |
//! | `itp` | ICtCp, ITU-R BT.2124 |
//! | `jz` | Jzazbz DEZ |
//! | `cam16`, `cam02` | CAM UCS distance |
//! | `hct` | HCT tone with CAM16 UCS colorfulness |
//! | `ok` | Euclidean in Oklab |
//! | `99o` | Euclidean in DIN99o |

mod cie;
mod uniform;

pub use cie::{De2000, De76, De94, DeCmc, DeHyab};
pub use uniform::{CamDistance, De99o, DeHct, DeItp, DeOk, DeZ};

use std::fmt;
use std::sync::Arc;

use tincture_core::{Error, Result};
use tincture_math::{no_nan, polar_to_rect};

use crate::color::Color;
use crate::spaces::cam::ucs::Uniformity;

/// A color-difference metric.
pub trait DeltaE: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// Difference between `color` and `sample`; never negative.
    fn distance(&self, color: &Color, sample: &Color) -> Result<f64>;
}

/// Built-in metrics.
pub fn builtin() -> Vec<Arc<dyn DeltaE>> {
    vec![
        Arc::new(De76),
        Arc::new(De94::default()),
        Arc::new(DeCmc::default()),
        Arc::new(De2000::default()),
        Arc::new(DeHyab::default()),
        Arc::new(DeItp::default()),
        Arc::new(DeZ),
        Arc::new(CamDistance::cam16(Uniformity::Ucs)),
        Arc::new(CamDistance::cam02(Uniformity::Ucs)),
        Arc::new(DeHct),
        Arc::new(DeOk::default()),
        Arc::new(De99o),
    ]
}

/// Coordinates in `space`, polar channels unrolled to rectangular.
fn rectangular(color: &Color, space: &str) -> Result<Vec<f64>> {
    let c = color.convert_norm(space, false)?;
    let mut coords = c.coords_resolved();
    if let Some(cyl) = c.space_def().cylindrical() {
        let (hi, ri) = (cyl.hue_index(), cyl.radial_index());
        let (a, b) = polar_to_rect(coords[ri], coords[hi]);
        coords[hi] = a;
        coords[ri] = b;
    }
    Ok(coords)
}

/// Euclidean distance in `space`, polar spaces measured on their
/// rectangular form.
pub fn distance_euclidean(color: &Color, sample: &Color, space: &str) -> Result<f64> {
    let a = rectangular(color, space)?;
    let b = rectangular(sample, space)?;
    Ok(a.iter().zip(&b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt())
}

/// Coordinates in `space` with undefined values as zero.
pub(crate) fn resolved(color: &Color, space: &str) -> Result<[f64; 3]> {
    let c = color.convert(space)?;
    let v = c.coords();
    Ok([no_nan(v[0]), no_nan(v[1]), no_nan(v[2])])
}

impl Color {
    /// Difference from `other` with the named metric (registry default
    /// when `None`).
    pub fn delta_e(&self, other: &Color, method: Option<&str>) -> Result<f64> {
        let method = method.unwrap_or(self.registry().defaults().delta_e.as_str());
        let de = self.registry().delta_e(method)?.clone();
        de.distance(self, other)
    }

    /// Difference from `other` with an unregistered metric.
    pub fn delta_e_with(&self, other: &Color, metric: &dyn DeltaE) -> Result<f64> {
        metric.distance(self, other)
    }

    /// Euclidean distance in `space` (CIE Lab when `None`).
    pub fn distance(&self, other: &Color, space: Option<&str>) -> Result<f64> {
        distance_euclidean(self, other, space.unwrap_or("lab"))
    }

    /// The candidate with the smallest difference; the first wins ties.
    pub fn closest<'a>(&self, candidates: &'a [Color], method: Option<&str>) -> Result<&'a Color> {
        let method = method.unwrap_or(self.registry().defaults().delta_e.as_str());
        let de = self.registry().delta_e(method)?.clone();
        let mut best: Option<(f64, &Color)> = None;
        for c in candidates {
            let d = de.distance(self, c)?;
            if best.is_none_or(|(lowest, _)| d < lowest) {
                best = Some((d, c));
            }
        }
        best.map(|(_, c)| c).ok_or_else(|| Error::config("no colors to compare"))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tincture_core::ErrorKind;

    use super::*;

    #[test]
    fn test_every_builtin_zero_on_self() {
        let c = Color::new("srgb", &[0.3, 0.6, 0.2], 1.0).unwrap();
        for de in builtin() {
            assert_abs_diff_eq!(de.distance(&c, &c).unwrap(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_every_builtin_positive() {
        let a = Color::parse("red").unwrap();
        let b = Color::parse("blue").unwrap();
        for de in builtin() {
            assert!(de.distance(&a, &b).unwrap() > 0.0, "{}", de.name());
        }
    }

    #[test]
    fn test_default_method() {
        let a = Color::new("lab-d65", &[50.0, 0.0, 0.0], 1.0).unwrap();
        let b = Color::new("lab-d65", &[60.0, 0.0, 0.0], 1.0).unwrap();
        assert_abs_diff_eq!(a.delta_e(&b, None).unwrap(), 10.0, epsilon = 1e-9);
        assert_eq!(a.delta_e(&b, Some("nope")).unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_distance_polar_unrolled() {
        let a = Color::new("lch", &[50.0, 10.0, 0.0], 1.0).unwrap();
        let b = Color::new("lch", &[50.0, 10.0, 180.0], 1.0).unwrap();
        assert_abs_diff_eq!(a.distance(&b, Some("lch")).unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_closest() {
        let c = Color::parse("#f00").unwrap();
        let candidates: Vec<Color> = ["blue", "darkred", "lime"].iter().map(|s| Color::parse(s).unwrap()).collect();
        let best = c.closest(&candidates, None).unwrap();
        assert_eq!(best, &candidates[1]);
        assert!(c.closest(&[], None).is_err());
    }
}
