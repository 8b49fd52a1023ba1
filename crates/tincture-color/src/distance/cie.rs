//! CIE Lab based metrics.

use std::f64::consts::TAU;

use tincture_core::{Error, Result};

use super::{DeltaE, distance_euclidean, resolved};
use crate::color::Color;

/// Delta E 1976: Euclidean distance in Lab (D65).
#[derive(Debug, Clone, Copy, Default)]
pub struct De76;

impl DeltaE for De76 {
    fn name(&self) -> &str {
        "76"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        distance_euclidean(color, sample, "lab-d65")
    }
}

/// Delta E 1994 (graphic arts weights by default).
///
/// Chroma weights come from the first color only, so the metric is not
/// symmetric.
#[derive(Debug, Clone, Copy)]
pub struct De94 {
    /// Lightness weight.
    pub kl: f64,
    /// Chroma coefficient.
    pub k1: f64,
    /// Hue coefficient.
    pub k2: f64,
}

impl Default for De94 {
    fn default() -> Self {
        Self { kl: 1.0, k1: 0.045, k2: 0.015 }
    }
}

impl DeltaE for De94 {
    fn name(&self) -> &str {
        "94"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        let [l1, a1, b1] = resolved(color, "lab")?;
        let [l2, a2, b2] = resolved(sample, "lab")?;
        let c1 = a1.hypot(b1);
        let c2 = a2.hypot(b2);
        let dl = l1 - l2;
        let dc = c1 - c2;
        let dh = (a1 - a2).powi(2) + (b1 - b2).powi(2) - dc * dc;
        let sc = 1.0 + self.k1 * c1;
        let sh = 1.0 + self.k2 * c1;
        Ok(((dl / self.kl).powi(2) + (dc / sc).powi(2) + dh / (sh * sh)).sqrt())
    }
}

/// Delta E CMC l:c (2:1 acceptability by default).
#[derive(Debug, Clone, Copy)]
pub struct DeCmc {
    /// Lightness ratio.
    pub l: f64,
    /// Chroma ratio.
    pub c: f64,
}

impl Default for DeCmc {
    fn default() -> Self {
        Self { l: 2.0, c: 1.0 }
    }
}

impl DeltaE for DeCmc {
    fn name(&self) -> &str {
        "cmc"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        let [l1, a1, b1] = resolved(color, "lab")?;
        let [l2, a2, b2] = resolved(sample, "lab")?;
        let c1 = a1.hypot(b1);
        let c2 = a2.hypot(b2);
        let dc = c1 - c2;
        let dl = l1 - l2;
        let dh = (a1 - a2).powi(2) + (b1 - b2).powi(2) - dc * dc;

        let sl = if l1 < 16.0 { 0.511 } else { 0.040975 * l1 / (1.0 + 0.01765 * l1) };
        let sc = 0.0638 * c1 / (1.0 + 0.0131 * c1) + 0.638;
        let h = b1.atan2(a1).to_degrees();
        let h1 = if h >= 0.0 { h } else { h + 360.0 };
        let t = if (164.0..=345.0).contains(&h1) {
            0.56 + (0.2 * (h1 + 168.0).to_radians().cos()).abs()
        } else {
            0.36 + (0.4 * (h1 + 35.0).to_radians().cos()).abs()
        };
        let c1_4 = c1.powi(4);
        let f = (c1_4 / (c1_4 + 1900.0)).sqrt();
        let sh = sc * (f * t + 1.0 - f);

        Ok(((dl / (self.l * sl)).powi(2) + (dc / (self.c * sc)).powi(2) + dh / (sh * sh)).sqrt())
    }
}

const G_CONST: f64 = 6103515625.0; // 25^7

/// CIEDE2000.
#[derive(Debug, Clone)]
pub struct De2000 {
    /// Lightness weight.
    pub kl: f64,
    /// Chroma weight.
    pub kc: f64,
    /// Hue weight.
    pub kh: f64,
    /// CIE Lab space the difference is measured in.
    pub space: String,
}

impl Default for De2000 {
    fn default() -> Self {
        Self { kl: 1.0, kc: 1.0, kh: 1.0, space: "lab-d65".into() }
    }
}

impl DeltaE for De2000 {
    fn name(&self) -> &str {
        "2000"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        if !matches!(self.space.as_str(), "lab" | "lab-d65") {
            return Err(Error::config(format!("'{}' is not a CIE Lab space", self.space)));
        }
        let [l1, a1, b1] = resolved(color, &self.space)?;
        let [l2, a2, b2] = resolved(sample, &self.space)?;

        let cm = (a1.hypot(b1) + a2.hypot(b2)) / 2.0;
        let c7 = cm.powi(7);
        let g = 0.5 * (1.0 - (c7 / (c7 + G_CONST)).sqrt());

        let ap1 = (1.0 + g) * a1;
        let ap2 = (1.0 + g) * a2;
        let cp1 = ap1.hypot(b1);
        let cp2 = ap2.hypot(b2);

        let hue = |ap: f64, b: f64| {
            let h = if ap == 0.0 && b == 0.0 { 0.0 } else { b.atan2(ap) };
            (if h < 0.0 { h + TAU } else { h }).to_degrees()
        };
        let hp1 = hue(ap1, b1);
        let hp2 = hue(ap2, b2);

        let dl = l1 - l2;
        let dc = cp1 - cp2;
        let hdiff = hp1 - hp2;
        // A neutral color has no hue to differ by.
        let dh = if cp1 * cp2 == 0.0 {
            0.0
        } else if hdiff.abs() <= 180.0 {
            hdiff
        } else if hdiff > 180.0 {
            hdiff - 360.0
        } else {
            hdiff + 360.0
        };
        let dh = 2.0 * (cp2 * cp1).sqrt() * (dh / 2.0).to_radians().sin();

        let lpm = (l1 + l2) / 2.0;
        let cpm = (cp1 + cp2) / 2.0;
        let hsum = hp1 + hp2;
        let hpm = if cp1 * cp2 == 0.0 {
            hsum
        } else if hdiff.abs() > 180.0 {
            (hsum + if hsum < 360.0 { 360.0 } else { -360.0 }) / 2.0
        } else {
            hsum / 2.0
        };

        let t = 1.0 - 0.17 * (hpm - 30.0).to_radians().cos()
            + 0.24 * (2.0 * hpm).to_radians().cos()
            + 0.32 * (3.0 * hpm + 6.0).to_radians().cos()
            - 0.20 * (4.0 * hpm - 63.0).to_radians().cos();
        let dt = 30.0 * (-((hpm - 275.0) / 25.0).powi(2)).exp();
        let cpm7 = cpm.powi(7);
        let rc = 2.0 * (cpm7 / (cpm7 + G_CONST)).sqrt();
        let l_temp = (lpm - 50.0).powi(2);
        let sl = 1.0 + 0.015 * l_temp / (20.0 + l_temp).sqrt();
        let sc = 1.0 + 0.045 * cpm;
        let sh = 1.0 + 0.015 * cpm * t;
        let rt = -(2.0 * dt).to_radians().sin() * rc;

        let tl = dl / (self.kl * sl);
        let tc = dc / (self.kc * sc);
        let th = dh / (self.kh * sh);
        Ok((tl * tl + tc * tc + th * th + rt * tc * th).sqrt())
    }
}

/// HyAB: city-block lightness plus Euclidean chroma plane.
#[derive(Debug, Clone)]
pub struct DeHyab {
    /// Lab-like space to measure in.
    pub space: String,
}

impl Default for DeHyab {
    fn default() -> Self {
        Self { space: "lab-d65".into() }
    }
}

impl DeltaE for DeHyab {
    fn name(&self) -> &str {
        "hyab"
    }

    fn distance(&self, color: &Color, sample: &Color) -> Result<f64> {
        let c1 = color.convert(&self.space)?;
        let c2 = sample.convert(&self.space)?;
        let [l, a, b] = c1
            .space_def()
            .lab()
            .map(|lab| lab.indexes())
            .ok_or_else(|| Error::config(format!("'{}' is not a Lab-like space", self.space)))?;
        let v1 = c1.coords_resolved();
        let v2 = c2.coords_resolved();
        Ok((v1[l] - v2[l]).abs() + (v1[a] - v2[a]).hypot(v1[b] - v2[b]))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn lab(l: f64, a: f64, b: f64) -> Color {
        Color::new("lab-d65", &[l, a, b], 1.0).unwrap()
    }

    #[test]
    fn test_2000_reference_pairs() {
        // Sharma, Wu and Dalal test data.
        let cases = [
            ([50.0, 2.6772, -79.7751], [50.0, 0.0, -82.7485], 2.0425),
            ([50.0, 0.0, 0.0], [50.0, -1.0, 2.0], 2.3669),
            ([50.0, 2.5, 0.0], [73.0, 25.0, -18.0], 27.1492),
            ([60.2574, -34.0099, 36.2677], [60.4626, -34.1751, 39.4387], 1.2644),
        ];
        for (a, b, expected) in cases {
            let d = De2000::default().distance(&lab(a[0], a[1], a[2]), &lab(b[0], b[1], b[2])).unwrap();
            assert_abs_diff_eq!(d, expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_2000_rejects_other_spaces() {
        let de = De2000 { space: "oklab".into(), ..De2000::default() };
        assert!(de.distance(&lab(50.0, 0.0, 0.0), &lab(50.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_94_asymmetric() {
        let a = Color::new("lab", &[50.0, 2.6772, -79.7751], 1.0).unwrap();
        let b = Color::new("lab", &[50.0, 0.0, -82.7485], 1.0).unwrap();
        let de = De94::default();
        assert_abs_diff_eq!(de.distance(&a, &b).unwrap(), 1.3950, epsilon = 1e-4);
        assert_abs_diff_eq!(de.distance(&b, &a).unwrap(), 1.3653, epsilon = 1e-4);

        let a = Color::new("lab", &[50.0, 40.0, 10.0], 1.0).unwrap();
        let b = Color::new("lab", &[55.0, 10.0, 30.0], 1.0).unwrap();
        assert_abs_diff_eq!(de.distance(&a, &b).unwrap(), 22.3018, epsilon = 1e-4);
        assert_abs_diff_eq!(de.distance(&b, &a).unwrap(), 24.4196, epsilon = 1e-4);
    }

    #[test]
    fn test_cmc_dark_branch() {
        let a = Color::new("lab", &[10.0, 5.0, 5.0], 1.0).unwrap();
        let b = Color::new("lab", &[12.0, 5.0, 5.0], 1.0).unwrap();
        // sl = 0.511, l = 2
        assert_abs_diff_eq!(DeCmc::default().distance(&a, &b).unwrap(), 2.0 / (2.0 * 0.511), epsilon = 1e-9);
    }

    #[test]
    fn test_hyab() {
        let d = DeHyab::default().distance(&lab(50.0, 3.0, 0.0), &lab(40.0, 0.0, 4.0)).unwrap();
        assert_abs_diff_eq!(d, 15.0, epsilon = 1e-9);
    }
}
