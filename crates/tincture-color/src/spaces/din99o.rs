//! DIN99o, a logarithmic compression of CIE Lab (D65).
//!
//! Euclidean distance in this space is the DIN99o Delta E.

use tincture_core::{Channel, FLG_MIRROR_PERCENT, LabIsh};
use tincture_primaries::D65;

use super::lab::ACHROMATIC_THRESHOLD;
use crate::space::{Rectangular, Space, Xy};

/// Rotation of the opponent axes, 26 degrees.
const RADS: f64 = 26.0 * std::f64::consts::PI / 180.0;
const FACTOR: f64 = 0.83;
/// `100 / ln(1.39)`, so Lab white lands on exactly 100.
const C1: f64 = 303.67100547050995;
const C2: f64 = 0.0039;
const C3: f64 = 0.075;
const C4: f64 = 0.0435;

/// Lab (D65) to DIN99o.
pub fn lab_to_din99o(lab: &[f64]) -> Vec<f64> {
    let (l, a, b) = (lab[0], lab[1], lab[2]);
    let l99o = C1 * (1.0 + C2 * l).max(f64::MIN_POSITIVE).ln();
    if a == 0.0 && b == 0.0 {
        return vec![l99o, 0.0, 0.0];
    }
    let (sin, cos) = RADS.sin_cos();
    let eo = a * cos + b * sin;
    let fo = FACTOR * (b * cos - a * sin);
    let go = eo.hypot(fo);
    let c99o = (1.0 + C3 * go).max(f64::MIN_POSITIVE).ln() / C4;
    let h99o = fo.atan2(eo) + RADS;
    vec![l99o, c99o * h99o.cos(), c99o * h99o.sin()]
}

/// DIN99o to Lab (D65).
pub fn din99o_to_lab(din: &[f64]) -> Vec<f64> {
    let (l99o, a99o, b99o) = (din[0], din[1], din[2]);
    let c99o = a99o.hypot(b99o);
    let h99o = b99o.atan2(a99o);
    let g = ((C4 * c99o).exp() - 1.0) / C3;
    let e = g * (h99o - RADS).cos();
    let f = g * (h99o - RADS).sin() / FACTOR;
    let (sin, cos) = RADS.sin_cos();
    vec![((l99o / C1).exp() - 1.0) / C2, e * cos - f * sin, e * sin + f * cos]
}

const CHANNELS: [Channel; 3] = [
    Channel::new("l", 0.0, 100.0),
    Channel::new("a", -55.0, 55.0).flags(FLG_MIRROR_PERCENT),
    Channel::new("b", -55.0, 55.0).flags(FLG_MIRROR_PERCENT),
];

/// DIN99o over `lab-d65`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Din99o;

impl Space for Din99o {
    fn name(&self) -> &'static str {
        "din99o"
    }

    fn base(&self) -> &'static str {
        "lab-d65"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--din99o"]
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
        din99o_to_lab(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        lab_to_din99o(coords)
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
    fn test_white_is_100() {
        let d = Din99o.from_base(&[100.0, 0.0, 0.0]);
        assert_abs_diff_eq!(d[0], 100.0, epsilon = 1e-9);
        assert_eq!(&d[1..], &[0.0, 0.0]);
    }

    #[test]
    fn test_round_trip() {
        for lab in [[50.0, 20.0, -30.0], [10.0, -60.0, 5.0], [90.0, 0.5, 80.0]] {
            let back = din99o_to_lab(&lab_to_din99o(&lab));
            for i in 0..3 {
                assert_abs_diff_eq!(back[i], lab[i], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_chroma_is_compressed() {
        let d = Din99o.from_base(&[50.0, 100.0, 0.0]);
        assert!(d[1].hypot(d[2]) < 55.0);
    }
}
