//! ZCAM, an HDR appearance model built on the Izazbz opponent space.
//!
//! Works on absolute XYZ (relative input is scaled so white has `Y = 100`)
//! and adapts with the two-step CAT02 method around an equal-energy
//! baseline.

use std::sync::LazyLock;

use tincture_core::Channel;
use tincture_math::{CAT02, Mat3, constrain_hue, div3, mul3, nth_root, spow};
use tincture_primaries::{E, xy_to_xyz};
use tracing::debug;

use super::cam02::CAT02_INV;
use super::{Attributes, CamJmh, ChromaInput, HueInput, HueQuadrature, LightnessInput, Model, ViewingConditions};
use crate::spaces::jzazbz::{izazbz_to_xyz, xyz_to_izazbz};

const LMS_P_TO_IZAZBZ: Mat3 = Mat3::from_rows([
    [0.0, 1.0, 0.0],
    [3.524, -4.066708, 0.542708],
    [0.199076, 1.096799, -1.295875],
]);

const IZAZBZ_TO_LMS_P: Mat3 = Mat3::from_rows([
    [1.0, 0.2772100865430786, 0.11609463231223774],
    [1.0, 0.0, 0.0],
    [1.0, 0.042585801245220344, -0.75384457989992],
]);

/// ZCAM unique hues.
pub const HUE_TABLE: HueQuadrature = HueQuadrature {
    h: [33.44, 89.29, 146.30, 238.36, 393.44],
    e: [0.68, 0.64, 1.52, 0.77, 0.68],
};

const EPSILON: f64 = 3.7035226210190005e-11;

/// Two-step CAT02 adaptation of `xyz` from white `wb` to white `wd`.
fn adapt(xyz: [f64; 3], wb: [f64; 3], wd: [f64; 3], d: f64) -> [f64; 3] {
    let wo = xy_to_xyz(E, 100.0);
    let (yb, yd) = (wb[1] / wo[1], wd[1] / wo[1]);
    let rgb_wo = CAT02.transform(wo);
    let gain = |w: [f64; 3], y: f64| div3(rgb_wo, CAT02.transform(w)).map(|r| d * y * r + 1.0 - d);
    let d_rgb = div3(gain(wb, yb), gain(wd, yd));
    CAT02_INV.transform(mul3(d_rgb, CAT02.transform(xyz)))
}

/// ZCAM bound to an environment.
#[derive(Debug, Clone)]
pub struct Zcam {
    output_white: [f64; 3],
    ref_white: [f64; 3],
    fb: f64,
    fl: f64,
    fs: f64,
    d: f64,
    izw: f64,
    qzw: f64,
}

impl Zcam {
    /// ZCAM under `conditions`.
    pub fn new(conditions: ViewingConditions) -> Self {
        let output_white = xy_to_xyz(conditions.white, 100.0);
        let ref_white = output_white;
        let la = conditions.adapting_luminance;
        let fb = (conditions.background_luminance / ref_white[1]).sqrt();
        let fl = 0.171 * la.cbrt() * (1.0 - (-48.0 / 9.0 * la).exp());
        let (f, fs, _) = conditions.surround.factors();
        let d = conditions.degree_of_adaptation(f);

        let izw = xyz_to_izazbz(&ref_white, &LMS_P_TO_IZAZBZ)[0] - EPSILON;
        let mut zcam = Self { output_white, ref_white, fb, fl, fs, d, izw, qzw: 0.0 };
        zcam.qzw = zcam.brightness(izw);
        debug!(fl, fb, izw, qzw = zcam.qzw, "ZCAM environment");
        zcam
    }

    fn brightness_scale(&self) -> f64 {
        self.fs.powf(2.2) * self.fb.sqrt() * self.fl.powf(0.2)
    }

    fn brightness_exponent(&self) -> f64 {
        1.6 * self.fs / self.fb.powf(0.12)
    }

    fn brightness(&self, iz: f64) -> f64 {
        2700.0 * spow(iz, self.brightness_exponent()) * self.brightness_scale()
    }

    fn colorfulness_scale(&self, ez: f64) -> f64 {
        spow(ez, 0.068) * self.fl.powf(0.2) / (self.fb.powf(0.1) * spow(self.izw, 0.78))
    }
}

fn hue_eccentricity(hz: f64) -> f64 {
    let hp = if hz <= HUE_TABLE.h[0] { hz + 360.0 } else { hz };
    1.015 + (89.038 + hp).to_radians().cos()
}

impl Model for Zcam {
    fn chroma_inputs(&self) -> &'static str {
        "CMsVKW"
    }

    fn hue_table(&self) -> &HueQuadrature {
        &HUE_TABLE
    }

    fn forward(&self, xyz: &[f64]) -> Attributes {
        let abs = [xyz[0] * 100.0, xyz[1] * 100.0, xyz[2] * 100.0];
        let izazbz = xyz_to_izazbz(&adapt(abs, self.ref_white, self.output_white, self.d), &LMS_P_TO_IZAZBZ);
        let (iz, az, bz) = (izazbz[0] - EPSILON, izazbz[1], izazbz[2]);
        let hz = constrain_hue(bz.atan2(az).to_degrees());
        let ez = hue_eccentricity(hz);

        let qz = self.brightness(iz);
        let jz = 100.0 * qz / self.qzw;
        let mz = 100.0 * (az * az + bz * bz).powf(0.37) * self.colorfulness_scale(ez);
        let cz = 100.0 * mz / self.qzw;
        let sz = if qz != 0.0 { 100.0 * self.fl.powf(0.6) * nth_root(mz / qz, 2.0) } else { 0.0 };
        let vz = ((jz - 58.0).powi(2) + 3.4 * cz * cz).sqrt();
        let kz = 100.0 - 0.8 * (jz * jz + 8.0 * cz * cz).sqrt();
        let wz = 100.0 - ((100.0 - jz).powi(2) + cz * cz).sqrt();

        Attributes { j: jz, c: cz, h: hz, s: sz, q: qz, m: mz, v: vz, k: kz, w: wz, ..Default::default() }
    }

    fn solve(&self, lightness: LightnessInput, chroma: ChromaInput, hue: HueInput) -> Vec<f64> {
        let zero_lightness = matches!(lightness, LightnessInput::J(v) | LightnessInput::Q(v) if v == 0.0);
        if zero_lightness && chroma.value() == 0.0 {
            return vec![0.0; 3];
        }

        let hz = match hue {
            HueInput::Angle(h) => h,
            HueInput::Quadrature(q) => HUE_TABLE.hue(q),
        };
        let (sin_h, cos_h) = hz.rem_euclid(360.0).to_radians().sin_cos();
        let ez = hue_eccentricity(hz);

        let (jz, qz) = match lightness {
            LightnessInput::J(jz) => (jz, jz * 0.01 * self.qzw),
            LightnessInput::Q(qz) => (100.0 * qz / self.qzw, qz),
        };
        let iz = nth_root(qz / (self.brightness_scale() * 2700.0), self.brightness_exponent());

        let cz = match chroma {
            ChromaInput::S(sz) => Some(qz * sz * sz / (100.0 * self.qzw * self.fl.powf(1.2))),
            ChromaInput::V(vz) => Some(nth_root((vz * vz - (jz - 58.0).powi(2)) / 3.4, 2.0)),
            ChromaInput::K(kz) => Some(nth_root((((kz - 100.0) / -0.8).powi(2) - jz * jz) / 8.0, 2.0)),
            ChromaInput::W(wz) => Some(nth_root((wz - 100.0).powi(2) - (100.0 - jz).powi(2), 2.0)),
            ChromaInput::C(cz) => Some(cz),
            ChromaInput::M(_) | ChromaInput::D(_) => None,
        };
        let mz = cz.map_or(chroma.value(), |cz| cz / 100.0 * self.qzw);

        let czp = spow(mz / (100.0 * self.colorfulness_scale(ez)), 1.0 / 0.37 / 2.0);
        let xyz = izazbz_to_xyz(&[iz + EPSILON, cos_h * czp, sin_h * czp], &IZAZBZ_TO_LMS_P);
        adapt([xyz[0], xyz[1], xyz[2]], self.output_white, self.ref_white, self.d).iter().map(|v| v / 100.0).collect()
    }
}

/// ZCAM under sRGB viewing conditions.
pub static ZCAM_MODEL: LazyLock<Zcam> = LazyLock::new(|| Zcam::new(ViewingConditions::srgb()));

fn zcam_model() -> &'static dyn Model {
    &*ZCAM_MODEL
}

const ALIASES: &[(&str, &str)] = &[
    ("lightness", "jz"),
    ("colorfulness", "mz"),
    ("hue", "hz"),
    ("j", "jz"),
    ("m", "mz"),
    ("h", "hz"),
];

/// ZCAM JMh.
pub const ZCAM_JMH: CamJmh = CamJmh::new("zcam-jmh", &["--zcam-jmh"], 100.0, 60.0, zcam_model)
    .with_channels(
        [
            Channel::new("jz", 0.0, 100.0),
            Channel::new("mz", 0.0, 60.0),
            Channel::angle("hz"),
        ],
        ALIASES,
    )
    .hdr();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Space;
    use crate::spaces::cam::CamQuery;
    use tincture_primaries::D65;

    fn close(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn test_white() {
        let cam = ZCAM_MODEL.forward(&xy_to_xyz(D65, 1.0));
        assert!((cam.j - 100.0).abs() < 1e-6, "{cam:?}");
        assert!(cam.m >= 0.0 && cam.m < 5.0);
    }

    #[test]
    fn test_round_trip_every_chroma_input() {
        let xyz = [0.35, 0.28, 0.12];
        let cam = ZCAM_MODEL.attributes(&xyz);
        let chroma = [
            CamQuery { c: Some(cam.c), ..Default::default() },
            CamQuery { m: Some(cam.m), ..Default::default() },
            CamQuery { s: Some(cam.s), ..Default::default() },
            CamQuery { v: Some(cam.v), ..Default::default() },
            CamQuery { k: Some(cam.k), ..Default::default() },
            CamQuery { w: Some(cam.w), ..Default::default() },
        ];
        for q in chroma {
            let q = CamQuery { j: Some(cam.j), h: Some(cam.h), ..q };
            let back = ZCAM_MODEL.inverse(&q).unwrap();
            assert!(close(&back, &xyz, 1e-7), "{q:?} -> {back:?}");
        }
    }

    #[test]
    fn test_depth_rejected() {
        let q = CamQuery { j: Some(50.0), d: Some(10.0), h: Some(30.0), ..Default::default() };
        assert!(ZCAM_MODEL.inverse(&q).is_err());
    }

    #[test]
    fn test_space() {
        assert_eq!(ZCAM_JMH.channel_index("lightness"), Some(0));
        assert_eq!(ZCAM_JMH.channel_index("h"), Some(2));
        assert_eq!(ZCAM_JMH.dynamic_range(), tincture_core::DynamicRange::Hdr);
        let jmh = ZCAM_JMH.from_base(&[0.2, 0.3, 0.4]);
        assert!(close(&ZCAM_JMH.to_base(&jmh), &[0.2, 0.3, 0.4], 1e-9));
    }
}
