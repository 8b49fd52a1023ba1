//! Okhsl and Okhsv: HSL and HSV shaped over Oklab.
//!
//! Both stretch Oklab chroma against an analytic approximation of the
//! sRGB gamut so that saturation 1 sits on (or very near) the gamut
//! surface. Lightness goes through a toe that makes `l` track CIE L*.

use std::f64::consts::TAU;

use tincture_core::{Channel, Cylindrical, HslIsh, HsvIsh};
use tincture_math::{Mat3, constrain_hue, nth_root};
use tincture_primaries::D65;

use super::oklab::OKLAB_TO_LMS3;
use crate::space::{Polar, Space, Xy};

const LMS_TO_SRGBL: Mat3 = Mat3::from_rows([
    [4.076741636075959, -3.307711539258062, 0.2309699031821041],
    [-1.2684379732850313, 2.6097573492876878, -0.3413193760026569],
    [-0.004196076138675526, -0.703418617935936, 1.7076146940746113],
]);

/// Per-channel `(selector, polynomial)` fits for the maximum saturation.
const SRGBL_COEFF: [([f64; 2], [f64; 5]); 3] = [
    ([-1.8817031, -0.80936501], [1.19086277, 1.76576728, 0.59662641, 0.75515197, 0.56771245]),
    ([1.8144408, -1.19445267], [0.73956515, -0.45954404, 0.08285427, 0.12541073, -0.14503204]),
    ([0.13110758, 1.81333971], [1.35733652, -0.00915799, -1.1513021, -0.50559606, 0.00692167]),
];

const K_1: f64 = 0.206;
const K_2: f64 = 0.03;
const K_3: f64 = (1.0 + K_1) / (1.0 + K_2);

/// Oklab lightness to a lightness estimate close to L*.
pub fn toe(x: f64) -> f64 {
    let k = K_3 * x - K_1;
    0.5 * (k + (k * k + 4.0 * K_2 * K_3 * x).sqrt())
}

/// Inverse of [`toe`].
pub fn toe_inv(x: f64) -> f64 {
    (x * x + K_1 * x) / (K_3 * (x + K_2))
}

/// `(a, b)` part of each row of the Oklab to LMS matrix, dotted with the hue.
fn lms_slopes(a: f64, b: f64) -> [f64; 3] {
    [0, 1, 2].map(|i| {
        let row = OKLAB_TO_LMS3.row(i);
        row[1] * a + row[2] * b
    })
}

fn oklab_to_linear_srgb(lab: [f64; 3]) -> [f64; 3] {
    let lms = OKLAB_TO_LMS3.transform(lab).map(|v| v * v * v);
    LMS_TO_SRGBL.transform(lms)
}

/// Largest `S = C / L` inside sRGB for the unit hue `(a, b)`.
fn max_saturation(a: f64, b: f64) -> f64 {
    let pick = SRGBL_COEFF
        .iter()
        .position(|(sel, _)| sel[0] * a + sel[1] * b > 1.0)
        .unwrap_or(2);
    let [k0, k1, k2, k3, k4] = SRGBL_COEFF[pick].1;
    let [wl, wm, ws] = LMS_TO_SRGBL.row(pick);

    // polynomial estimate, then one Halley step
    let sat = k0 + k1 * a + k2 * b + k3 * a * a + k4 * a * b;
    let [k_l, k_m, k_s] = lms_slopes(a, b);
    let (l_, m_, s_) = (1.0 + sat * k_l, 1.0 + sat * k_m, 1.0 + sat * k_s);
    let f = wl * l_.powi(3) + wm * m_.powi(3) + ws * s_.powi(3);
    let f1 = 3.0 * (wl * k_l * l_ * l_ + wm * k_m * m_ * m_ + ws * k_s * s_ * s_);
    let f2 = 6.0 * (wl * k_l * k_l * l_ + wm * k_m * k_m * m_ + ws * k_s * k_s * s_);
    sat - f * f1 / (f1 * f1 - 0.5 * f * f2)
}

/// `(L, C)` of the most saturated sRGB color of the unit hue `(a, b)`.
fn find_cusp(a: f64, b: f64) -> [f64; 2] {
    let s_cusp = max_saturation(a, b);
    let [r, g, bl] = oklab_to_linear_srgb([1.0, s_cusp * a, s_cusp * b]);
    let l_cusp = nth_root(1.0 / r.max(g).max(bl), 3.0);
    [l_cusp, l_cusp * s_cusp]
}

/// Where the line from `(l0, 0)` to `(l1, c1)` leaves the sRGB gamut, as
/// a fraction of the line.
fn gamut_intersection(a: f64, b: f64, l1: f64, c1: f64, l0: f64, cusp: [f64; 2]) -> f64 {
    if (l1 - l0) * cusp[1] - (cusp[0] - l0) * c1 <= 0.0 {
        // lower half: the triangle edge is exact
        return cusp[1] * l0 / (c1 * cusp[0] + cusp[1] * (l0 - l1));
    }

    // upper half: triangle estimate refined with a Halley step per channel
    let mut t = cusp[1] * (l0 - 1.0) / (c1 * (cusp[0] - 1.0) + cusp[1] * (l0 - l1));
    let (dl, dc) = (l1 - l0, c1);
    let [k_l, k_m, k_s] = lms_slopes(a, b);
    let (l_dt, m_dt, s_dt) = (dl + dc * k_l, dl + dc * k_m, dl + dc * k_s);

    let big_l = l0 * (1.0 - t) + t * l1;
    let big_c = t * c1;
    let (l_, m_, s_) = (big_l + big_c * k_l, big_l + big_c * k_m, big_l + big_c * k_s);
    let lms = [l_.powi(3), m_.powi(3), s_.powi(3)];
    let d1 = [3.0 * l_dt * l_ * l_, 3.0 * m_dt * m_ * m_, 3.0 * s_dt * s_ * s_];
    let d2 = [6.0 * l_dt * l_dt * l_, 6.0 * m_dt * m_dt * m_, 6.0 * s_dt * s_dt * s_];

    let step = (0..3)
        .map(|i| {
            let row = LMS_TO_SRGBL.row(i);
            let dot = |v: [f64; 3]| row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
            let (f, f1, f2) = (dot(lms) - 1.0, dot(d1), dot(d2));
            let u = f1 / (f1 * f1 - 0.5 * f * f2);
            if u >= 0.0 { -f * u } else { f64::MAX }
        })
        .fold(f64::MAX, f64::min);
    t += step;
    t
}

/// Smooth estimate of the cusp's `(S, T)`.
fn st_mid(a: f64, b: f64) -> [f64; 2] {
    let s = 0.11516993
        + 1.0
            / (7.44778970
                + 4.15901240 * b
                + a * (-2.19557347
                    + 1.75198401 * b
                    + a * (-2.13704948 - 10.02301043 * b + a * (-4.24894561 + 5.38770819 * b + 4.69891013 * a))));
    let t = 0.11239642
        + 1.0
            / (1.61320320 - 0.68124379 * b
                + a * (0.40370612
                    + 0.90148123 * b
                    + a * (-0.27087943 + 0.61223990 * b + a * (0.00299215 - 0.45399568 * b - 0.14661872 * a))));
    [s, t]
}

fn to_st(cusp: [f64; 2]) -> [f64; 2] {
    let [l, c] = cusp;
    [c / l, c / (1.0 - l)]
}

/// Chroma anchors `(c0, c_mid, c_max)` for lightness `l` and unit hue.
fn chroma_anchors(l: f64, a: f64, b: f64) -> [f64; 3] {
    let cusp = find_cusp(a, b);
    let c_max = gamut_intersection(a, b, l, 1.0, l, cusp);
    let [s_max, t_max] = to_st(cusp);
    let k = c_max / (l * s_max).min((1.0 - l) * t_max);

    let [s_mid, t_mid] = st_mid(a, b);
    let (c_a, c_b) = (l * s_mid, (1.0 - l) * t_mid);
    let c_mid = 0.9 * k * (1.0 / (1.0 / c_a.powi(4) + 1.0 / c_b.powi(4))).sqrt().sqrt();

    let (c_a, c_b) = (l * 0.4, (1.0 - l) * 0.8);
    let c_0 = (1.0 / (1.0 / (c_a * c_a) + 1.0 / (c_b * c_b))).sqrt();
    [c_0, c_mid, c_max]
}

const MID: f64 = 0.8;
const MID_INV: f64 = 1.25;

/// Okhsl to Oklab.
pub fn okhsl_to_oklab(hsl: &[f64]) -> Vec<f64> {
    let (h, s, l) = (if hsl[0].is_nan() { 0.0 } else { hsl[0] }, hsl[1], hsl[2]);
    let big_l = toe_inv(l);
    if big_l == 0.0 || big_l == 1.0 || s == 0.0 {
        return vec![big_l, 0.0, 0.0];
    }
    let (b_, a_) = (TAU * h / 360.0).sin_cos();
    let [c_0, c_mid, c_max] = chroma_anchors(big_l, a_, b_);
    let c = if s < MID {
        let t = MID_INV * s;
        let k_1 = MID * c_0;
        let k_2 = 1.0 - k_1 / c_mid;
        t * k_1 / (1.0 - k_2 * t)
    } else {
        let t = 5.0 * (s - MID);
        let k_1 = 0.2 * c_mid * c_mid * MID_INV * MID_INV / c_0;
        let k_2 = 1.0 - k_1 / (c_max - c_mid);
        c_mid + t * k_1 / (1.0 - k_2 * t)
    };
    vec![big_l, c * a_, c * b_]
}

/// Oklab to Okhsl. The hue of a gray is undefined.
pub fn oklab_to_okhsl(lab: &[f64]) -> Vec<f64> {
    let big_l = lab[0];
    let l = toe(big_l);
    let c = lab[1].hypot(lab[2]);
    let mut h = 180.0 + (-lab[2]).atan2(-lab[1]).to_degrees();
    let mut s = 0.0;
    if l != 0.0 && l != 1.0 && c != 0.0 {
        let [c_0, c_mid, c_max] = chroma_anchors(big_l, lab[1] / c, lab[2] / c);
        s = if c < c_mid {
            let k_1 = MID * c_0;
            let k_2 = 1.0 - k_1 / c_mid;
            MID * c / (k_1 + k_2 * c)
        } else {
            let k_1 = 0.2 * c_mid * c_mid * MID_INV * MID_INV / c_0;
            let k_2 = 1.0 - k_1 / (c_max - c_mid);
            let t = (c - c_mid) / (k_1 + k_2 * (c - c_mid));
            MID + 0.2 * t
        };
    }
    if s.abs() < 1e-8 {
        h = f64::NAN;
    }
    vec![constrain_hue(h), s, l]
}

/// Okhsv to Oklab.
pub fn okhsv_to_oklab(hsv: &[f64]) -> Vec<f64> {
    let (h, s, v) = (if hsv[0].is_nan() { 0.0 } else { hsv[0] }, hsv[1], hsv[2]);
    let mut l = toe_inv(v);
    if l == 0.0 || s == 0.0 {
        return vec![l, 0.0, 0.0];
    }
    let (b_, a_) = (TAU * h / 360.0).sin_cos();
    let [s_max, t_max] = to_st(find_cusp(a_, b_));
    let s_0 = 0.5;
    let k = 1.0 - s_0 / s_max;
    let l_v = 1.0 - s * s_0 / (s_0 + t_max - t_max * k * s);
    let c_v = s * t_max * s_0 / (s_0 + t_max - t_max * k * s);
    l = v * l_v;
    let mut c = v * c_v;

    let l_vt = toe_inv(l_v);
    let c_vt = c_v * l_vt / l_v;
    let l_new = toe_inv(l);
    c *= l_new / l;
    l = l_new;

    let [r, g, b] = oklab_to_linear_srgb([l_vt, a_ * c_vt, b_ * c_vt]);
    let scale = nth_root(1.0 / r.max(g).max(b.max(0.0)), 3.0);
    vec![l * scale, c * scale * a_, c * scale * b_]
}

/// Oklab to Okhsv. The hue of a gray is undefined.
pub fn oklab_to_okhsv(lab: &[f64]) -> Vec<f64> {
    let c = lab[1].hypot(lab[2]);
    let mut l = lab[0];
    let mut h = f64::NAN;
    let mut s = 0.0;
    let mut v = toe(l);
    if c != 0.0 && l != 0.0 && l != 1.0 {
        let (a_, b_) = (lab[1] / c, lab[2] / c);
        h = 180.0 + (-lab[2]).atan2(-lab[1]).to_degrees();
        let [s_max, t_max] = to_st(find_cusp(a_, b_));
        let s_0 = 0.5;
        let k = 1.0 - s_0 / s_max;
        let t = t_max / (c + l * t_max);
        let l_v = t * l;
        let c_v = t * c;
        let l_vt = toe_inv(l_v);
        let c_vt = c_v * l_vt / l_v;

        let [r, g, b] = oklab_to_linear_srgb([l_vt, a_ * c_vt, b_ * c_vt]);
        let scale = nth_root(1.0 / r.max(g).max(b.max(0.0)), 3.0);
        l /= scale;
        v = toe(l) / l_v;
        s = (s_0 + t_max) * c_v / (t_max * s_0 + t_max * k * c_v);
    }
    if s.abs() < 1e-8 {
        h = f64::NAN;
    }
    vec![constrain_hue(h), s, v]
}

/// Okhsl or Okhsv.
#[derive(Debug, Clone, Copy)]
pub struct Okhsx {
    name: &'static str,
    ids: &'static [&'static str],
    channels: [Channel; 3],
    aliases: &'static [(&'static str, &'static str)],
    to: fn(&[f64]) -> Vec<f64>,
    from: fn(&[f64]) -> Vec<f64>,
    value: bool,
}

/// Okhsl.
pub const OKHSL: Okhsx = Okhsx {
    name: "okhsl",
    ids: &["--okhsl"],
    channels: [
        Channel::angle("h"),
        Channel::new("s", 0.0, 1.0).bound(true),
        Channel::new("l", 0.0, 1.0).bound(true),
    ],
    aliases: &[("hue", "h"), ("saturation", "s"), ("lightness", "l")],
    to: okhsl_to_oklab,
    from: oklab_to_okhsl,
    value: false,
};

/// Okhsv.
pub const OKHSV: Okhsx = Okhsx {
    name: "okhsv",
    ids: &["--okhsv"],
    channels: [
        Channel::angle("h"),
        Channel::new("s", 0.0, 1.0).bound(true),
        Channel::new("v", 0.0, 1.0).bound(true),
    ],
    aliases: &[("hue", "h"), ("saturation", "s"), ("value", "v")],
    to: okhsv_to_oklab,
    from: oklab_to_okhsv,
    value: true,
};

impl Space for Okhsx {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        "oklab"
    }

    fn serialize(&self) -> &[&'static str] {
        self.ids
    }

    fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        self.aliases
    }

    fn white(&self) -> Xy {
        D65
    }

    // Okhsl's bounds are only approximately the sRGB gamut, so it is
    // checked on its own channels.
    fn gamut_check(&self) -> Option<&'static str> {
        if self.value { Some("srgb") } else { None }
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        (self.to)(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        (self.from)(coords)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut c: Vec<f64> = coords.into_iter().map(|v| if v.is_nan() { 0.0 } else { v }).collect();
        if c[1] < 0.0 {
            c = self.from_base(&self.to_base(&c));
        } else {
            c[0] = constrain_hue(c[0]);
        }
        if c[1].abs() < 1e-8 {
            c[0] = f64::NAN;
        }
        c
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        let (s, l) = (coords[1], coords[2]);
        Some(s.abs() < 1e-4 || l.abs() < 1e-7 || (!self.value && (1.0 - l).abs() < 1e-7))
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::HSX)
    }

    fn hsl(&self) -> Option<&dyn HslIsh> {
        if self.value { None } else { Some(&Polar::HSX) }
    }

    fn hsv(&self) -> Option<&dyn HsvIsh> {
        if self.value { Some(&Polar::HSX) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::color::Color;

    #[test]
    fn test_toe_round_trip() {
        for x in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert_abs_diff_eq!(toe_inv(toe(x)), x, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(toe(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_primaries_near_full_saturation() {
        for rgb in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
            let c = Color::new("srgb", &rgb, 1.0).unwrap();
            let hsv = c.convert("okhsv").unwrap();
            assert_abs_diff_eq!(hsv.coords()[1], 1.0, epsilon = 5e-3);
            assert_abs_diff_eq!(hsv.coords()[2], 1.0, epsilon = 5e-3);
            let hsl = c.convert("okhsl").unwrap();
            assert_abs_diff_eq!(hsl.coords()[1], 1.0, epsilon = 5e-3);
        }
    }

    #[test]
    fn test_round_trip_through_srgb() {
        for coords in [[30.0, 0.5, 0.5], [140.0, 0.9, 0.3], [265.0, 0.2, 0.8]] {
            for space in ["okhsl", "okhsv"] {
                let c = Color::new(space, &coords, 1.0).unwrap();
                let back = c.convert("srgb").unwrap().convert(space).unwrap();
                for i in 0..3 {
                    assert_abs_diff_eq!(back.coords()[i], coords[i], epsilon = 1e-7);
                }
            }
        }
    }

    #[test]
    fn test_gray_has_no_hue() {
        let gray = Color::new("srgb", &[0.5, 0.5, 0.5], 1.0).unwrap();
        for space in ["okhsl", "okhsv"] {
            let c = gray.convert(space).unwrap();
            assert!(c.coords()[0].is_nan(), "{space}");
            assert!(c.is_achromatic().unwrap());
        }
    }
}
