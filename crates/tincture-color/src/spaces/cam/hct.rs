//! HCT: CAM16 hue and chroma paired with CIE L* as tone.
//!
//! Tone is exact L*, so the inverse has to search for the CAM16 lightness
//! that yields the requested luminance. A damped Newton step on `J`
//! converges in a handful of iterations for real colors.

use std::sync::LazyLock;

use tincture_core::{Channel, Cylindrical, LchIsh};
use tincture_math::nth_root;
use tincture_primaries::D65;
use tracing::trace;

use super::cam16::Ciecam;
use super::{ACHROMATIC_THRESHOLD, ChromaInput, HueInput, LightnessInput, Model, Surround, ViewingConditions, no_nans};
use crate::space::{ROOT, Space, Xy};
use crate::spaces::lab::{EPSILON, KAPPA, KE};

/// Luminance `Y` to L*.
pub fn y_to_lstar(y: f64) -> f64 {
    let fy = if y > EPSILON { nth_root(y, 3.0) } else { (KAPPA * y + 16.0) / 116.0 };
    116.0 * fy - 16.0
}

/// L* to luminance `Y`.
pub fn lstar_to_y(lstar: f64) -> f64 {
    let fy = (lstar + 16.0) / 116.0;
    if lstar > KE { fy.powi(3) } else { lstar / KAPPA }
}

/// CAM16 evaluated for a mid-gray (L* 50) background.
pub static HCT_MODEL: LazyLock<Ciecam> = LazyLock::new(|| {
    let y50 = lstar_to_y(50.0);
    Ciecam::cam16(ViewingConditions {
        white: D65,
        adapting_luminance: 200.0 / std::f64::consts::PI * y50,
        background_luminance: y50 * 100.0,
        surround: Surround::Average,
        discounting: false,
    })
});

const THRESHOLD: f64 = 2e-12;
const MAX_ATTEMPTS: usize = 15;

/// HCT `(h, c, t)` to relative XYZ.
pub fn hct_to_xyz(hct: &[f64], model: &Ciecam) -> Vec<f64> {
    let (h, c, t) = (hct[0], hct[1], hct[2]);
    if t == 0.0 {
        return vec![0.0; 3];
    }
    let y = lstar_to_y(t);
    let solve = |j: f64| model.solve(LightnessInput::J(j), ChromaInput::C(c), HueInput::Angle(h));

    // Quadratic fits of J against tone give a close first guess.
    let mut j = if t > 0.0 {
        0.00379058511492914 * t * t + 0.608983189401032 * t + 0.9155088574762233
    } else {
        9.514440756550361e-06 * t * t + 0.08693057439788597 * t - 21.928975842194614
    };

    let mut last = f64::INFINITY;
    let mut best = j;
    for _ in 0..=MAX_ATTEMPTS {
        let xyz = solve(j);
        let delta = (xyz[1] - y).abs();
        if delta < last {
            if delta <= THRESHOLD {
                return xyz;
            }
            best = j;
            last = delta;
        }
        j -= (xyz[1] - y) * j / (2.0 * xyz[1]);
    }
    trace!(t, c, h, residual = last, "HCT tone search did not converge");
    solve(best)
}

/// Relative XYZ to HCT `(h, c, t)`.
pub fn xyz_to_hct(xyz: &[f64], model: &Ciecam) -> Vec<f64> {
    let t = y_to_lstar(xyz[1]);
    if t == 0.0 {
        return vec![0.0; 3];
    }
    let cam = model.forward(xyz);
    vec![cam.h, cam.c, t]
}

/// Hue first, then chroma and tone.
#[derive(Debug, Clone, Copy)]
struct HctLayout;

impl Cylindrical for HctLayout {
    fn hue_index(&self) -> usize {
        0
    }

    fn radial_index(&self) -> usize {
        1
    }
}

impl LchIsh for HctLayout {
    fn indexes(&self) -> [usize; 3] {
        [2, 1, 0]
    }
}

const CHANNELS: [Channel; 3] = [Channel::angle("h"), Channel::new("c", 0.0, 145.0), Channel::new("t", 0.0, 100.0)];

/// The HCT space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hct;

impl Space for Hct {
    fn name(&self) -> &'static str {
        "hct"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--hct"]
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("lightness", "t"), ("tone", "t"), ("chroma", "c"), ("hue", "h")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        let h = if coords[0].is_nan() { 0.0 } else { coords[0] };
        hct_to_xyz(&[h, coords[1], coords[2]], &HCT_MODEL)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_hct(coords, &HCT_MODEL)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut coords = no_nans(&coords);
        if coords[1] < 0.0 {
            return self.from_base(&self.to_base(&coords));
        }
        coords[0] = coords[0].rem_euclid(360.0);
        coords
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[2] == 0.0 || coords[1].abs() < ACHROMATIC_THRESHOLD)
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&HctLayout)
    }

    fn lch(&self) -> Option<&dyn LchIsh> {
        Some(&HctLayout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lstar_pair() {
        for l in [0.5, 8.0, 20.0, 50.0, 99.0] {
            assert!((y_to_lstar(lstar_to_y(l)) - l).abs() < 1e-9);
        }
        assert!((lstar_to_y(50.0) - 0.18418651851244416).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        // Material's #305077 lands near (256.8, 31.8, 33.3).
        let xyz = [0.07416851047808579, 0.07697331577599505, 0.18548255518462006];
        let hct = Hct.from_base(&xyz);
        assert!((hct[2] - 33.34).abs() < 0.1, "{hct:?}");
        let back = Hct.to_base(&hct);
        for i in 0..3 {
            assert!((back[i] - xyz[i]).abs() < 1e-8, "{back:?}");
        }
    }

    #[test]
    fn test_tone_is_lstar() {
        let hct = Hct.from_base(&[0.3, 0.2, 0.1]);
        assert!((hct[2] - y_to_lstar(0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_black_and_achromatic() {
        assert_eq!(Hct.from_base(&[0.0, 0.0, 0.0]), vec![0.0; 3]);
        assert_eq!(Hct.to_base(&[120.0, 10.0, 0.0]), vec![0.0; 3]);
        assert_eq!(Hct.is_achromatic(&[120.0, 10.0, 0.0]), Some(true));
        assert_eq!(Hct.lch().map(|l| l.indexes()), Some([2, 1, 0]));
    }
}
