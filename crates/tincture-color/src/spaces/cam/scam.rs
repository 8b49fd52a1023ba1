//! sCAM, the simple appearance model, and the sUCS space it is built on.

use std::sync::LazyLock;

use tincture_core::{Channel, Cylindrical, LchIsh};
use tincture_math::{CAT16, Mat3, constrain_hue, div3, nth_root, spow, zdiv};
use tincture_primaries::{D65, xy_to_xyz};
use tracing::debug;

use super::cam16::CAT16_INV;
use super::{
    ACHROMATIC_THRESHOLD, Attributes, CamJmh, ChromaInput, HueInput, HueQuadrature, LightnessInput, Model, Surround,
    ViewingConditions, no_nans,
};
use crate::space::{Polar, ROOT, Space, Xy};

// ============================================================================
// sUCS
// ============================================================================

const XYZ_TO_LMS: Mat3 = Mat3::from_rows([
    [0.4002, 0.7075, -0.0807],
    [-0.2280, 1.1500, 0.0612],
    [0.0, 0.0, 0.9184],
]);

const LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [1.8502429449432054, -1.1383016378672328, 0.23843495850870136],
    [0.3668307751713486, 0.6438845448402355, -0.010673443584379994],
    [0.0, 0.0, 1.088850174216028],
]);

const TO_IAB: Mat3 = Mat3::from_rows([
    [200.0 / 3.05, 100.0 / 3.05, 5.0 / 3.05],
    [430.0, -470.0, 40.0],
    [49.0, 49.0, -98.0],
]);

const FROM_IAB: Mat3 = Mat3::from_rows([
    [0.009999999999999998, 0.0007468123861566485, 0.00047210140886955876],
    [0.009999999999999998, -0.0014754098360655738, -0.00043492806958849117],
    [0.009999999999999998, -0.00036429872495446266, -0.010185494963012527],
]);

/// Relative XYZ to sUCS `(I, C, h)`.
pub fn xyz_to_sucs(xyz: &[f64]) -> Vec<f64> {
    let lms = XYZ_TO_LMS.transform_slice(xyz).into_iter().map(|v| spow(v, 0.43)).collect::<Vec<_>>();
    let iab = TO_IAB.transform_slice(&lms);
    let c = (1.0 + 0.0447 * iab[1].hypot(iab[2])).ln() / 0.0252;
    let h = iab[2].atan2(iab[1]).rem_euclid(std::f64::consts::TAU);
    vec![iab[0], c, h.to_degrees()]
}

/// sUCS `(I, C, h)` to relative XYZ.
pub fn sucs_to_xyz(ich: &[f64]) -> Vec<f64> {
    let c = ((0.0252 * ich[1]).exp() - 1.0) / 0.0447;
    let (sin_h, cos_h) = ich[2].to_radians().sin_cos();
    let lms: Vec<f64> =
        FROM_IAB.transform_slice(&[ich[0], c * cos_h, c * sin_h]).into_iter().map(|v| nth_root(v, 0.43)).collect();
    LMS_TO_XYZ.transform_slice(&lms)
}

const SUCS_CHANNELS: [Channel; 3] = [Channel::new("i", 0.0, 100.0), Channel::new("c", 0.0, 65.0), Channel::angle("h")];

/// The sUCS space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sucs;

impl Space for Sucs {
    fn name(&self) -> &'static str {
        "sucs"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--sucs"]
    }

    fn channels(&self) -> &[Channel] {
        &SUCS_CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("intensity", "i"), ("chroma", "c"), ("hue", "h")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        let h = if coords[2].is_nan() { 0.0 } else { coords[2] };
        sucs_to_xyz(&[coords[0], coords[1], h])
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_sucs(coords)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut coords = no_nans(&coords);
        if coords[1] < 0.0 {
            return self.from_base(&self.to_base(&coords));
        }
        coords[2] = coords[2].rem_euclid(360.0);
        coords
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].abs() < ACHROMATIC_THRESHOLD)
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::LCH)
    }

    fn lch(&self) -> Option<&dyn LchIsh> {
        Some(&Polar::LCH)
    }
}

// ============================================================================
// sCAM
// ============================================================================

/// sCAM unique hues.
pub const HUE_TABLE: HueQuadrature = HueQuadrature {
    h: [15.6, 80.3, 157.8, 219.7, 376.6],
    e: [0.7, 0.6, 1.2, 0.9, 0.7],
};

/// `(c, F_M)` surround factors.
fn surround_factors(surround: Surround) -> (f64, f64) {
    match surround {
        Surround::Dark => (0.39, 0.85),
        Surround::Dim => (0.5, 0.95),
        Surround::Average => (0.52, 1.0),
    }
}

/// Eccentricity for a hue in degrees.
pub fn eccentricity(h: f64) -> f64 {
    1.0 + 0.06 * (110.0 + h).to_radians().cos()
}

/// CAT16 cone space with a CAM02-style degree of adaptation.
fn adapt(xyz: &[f64], ws: [f64; 3], wd: [f64; 3], d: f64) -> Vec<f64> {
    let lms = CAT16.transform_slice(xyz);
    let ratio = div3(CAT16.transform(wd), CAT16.transform(ws));
    let y_ratio = ws[1] / wd[1];
    let adapted: Vec<f64> = (0..3).map(|i| lms[i] * (d * y_ratio * ratio[i] + 1.0 - d)).collect();
    CAT16_INV.transform_slice(&adapted)
}

/// sCAM bound to an environment.
#[derive(Debug, Clone)]
pub struct Scam {
    input_white: [f64; 3],
    output_white: [f64; 3],
    c: f64,
    fm: f64,
    fl: f64,
    cz: f64,
    d: f64,
}

impl Scam {
    /// sCAM under `conditions`.
    pub fn new(conditions: ViewingConditions) -> Self {
        let la = conditions.adapting_luminance;
        let yb = conditions.background_luminance;
        let input_white = xy_to_xyz(conditions.white, 100.0);
        let output_white = xy_to_xyz(D65, la * 100.0 / yb);
        let (c, fm) = surround_factors(conditions.surround);
        let fl = 0.1710 * la.cbrt() / (1.0 - 0.4934 * (-0.9934 * la).exp());
        let z = 1.48 + (yb / input_white[1]).sqrt();
        let d = if conditions.discounting {
            1.0
        } else {
            (fm * (1.0 - 1.0 / 3.6 * ((-la - 42.0) / 92.0).exp())).clamp(0.0, 1.0)
        };
        debug!(fl, d, "sCAM environment");
        Self { input_white, output_white, c, fm, fl, cz: c * z, d }
    }

    fn brightness_factor(&self) -> f64 {
        2.0 * self.fl.powf(0.1) / self.c
    }
}

impl Model for Scam {
    fn chroma_inputs(&self) -> &'static str {
        "CMVKWD"
    }

    fn hue_table(&self) -> &HueQuadrature {
        &HUE_TABLE
    }

    fn forward(&self, xyz: &[f64]) -> Attributes {
        let adapted = adapt(xyz, self.input_white, self.output_white, self.d);
        let ich = xyz_to_sucs(&adapted);
        let (i, c, h) = (ich[0], ich[1], ich[2]);

        let ia = 100.0 * spow(i * 0.01, self.cz);
        let m = c * self.fl.powf(0.1) * eccentricity(h) * zdiv(1.0, spow(ia, 0.27)) * self.fm;
        let d = 1.3 * ((100.0 - ia).powi(2) + 1.6 * c * c).sqrt();
        let v = (ia * ia + 3.0 * c * c).sqrt();

        Attributes {
            j: ia,
            c,
            h: constrain_hue(h),
            q: ia * self.brightness_factor(),
            m,
            d,
            v,
            w: 100.0 - d,
            k: 100.0 - v,
            ..Default::default()
        }
    }

    fn solve(&self, lightness: LightnessInput, chroma: ChromaInput, hue: HueInput) -> Vec<f64> {
        let h = match hue {
            HueInput::Angle(h) => h.rem_euclid(360.0),
            HueInput::Quadrature(q) => HUE_TABLE.hue(q),
        };
        let ia = match lightness {
            LightnessInput::J(j) => j,
            LightnessInput::Q(q) => q / self.brightness_factor(),
        };
        let i = nth_root(ia * 0.01, self.cz) * 100.0;

        let chroma = match chroma {
            ChromaInput::W(w) => ChromaInput::D(100.0 - w),
            ChromaInput::K(k) => ChromaInput::V(100.0 - k),
            other => other,
        };
        let c = match chroma {
            ChromaInput::D(d) => nth_root(((d / 1.3).powi(2) - (100.0 - ia).powi(2)) / 1.6, 2.0),
            ChromaInput::V(v) => nth_root((v * v - ia * ia) / 3.0, 2.0),
            ChromaInput::M(m) => m * spow(ia, 0.27) / (self.fl.powf(0.1) * eccentricity(h) * self.fm),
            other => other.value(),
        };

        adapt(&sucs_to_xyz(&[i, c, h]), self.output_white, self.input_white, self.d)
    }
}

/// sCAM under sRGB viewing conditions.
pub static SCAM_MODEL: LazyLock<Scam> = LazyLock::new(|| Scam::new(ViewingConditions::srgb()));

fn scam_model() -> &'static dyn Model {
    &*SCAM_MODEL
}

/// sCAM JMh.
pub const SCAM_JMH: CamJmh = CamJmh::new("scam-jmh", &["--scam-jmh"], 100.0, 25.0, scam_model);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces::cam::CamQuery;

    fn close(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn test_sucs_white() {
        let ich = xyz_to_sucs(&xy_to_xyz(D65, 1.0));
        assert!((ich[0] - 100.0).abs() < 0.5, "{ich:?}");
        assert!(ich[1] < 1.0);
    }

    #[test]
    fn test_sucs_round_trip() {
        let xyz = [0.2, 0.15, 0.4];
        assert!(close(&sucs_to_xyz(&xyz_to_sucs(&xyz)), &xyz, 1e-9));
        assert!(close(&Sucs.to_base(&Sucs.from_base(&xyz)), &xyz, 1e-9));
    }

    #[test]
    fn test_sucs_normalize_negative_chroma() {
        let n = Sucs.normalize(vec![50.0, -5.0, 30.0]);
        assert!(n[1] >= 0.0);
        assert_eq!(Sucs.normalize(vec![50.0, 5.0, f64::NAN])[2], 0.0);
    }

    #[test]
    fn test_scam_round_trip() {
        for xyz in [[0.2, 0.15, 0.4], [0.6, 0.7, 0.1]] {
            let back = SCAM_MODEL.from_jmh(&SCAM_MODEL.to_jmh(&xyz));
            assert!(close(&back, &xyz, 1e-9), "{back:?}");
        }
    }

    #[test]
    fn test_scam_chroma_family() {
        let xyz = [0.3, 0.25, 0.2];
        let cam = SCAM_MODEL.attributes(&xyz);
        for q in [
            CamQuery { d: Some(cam.d), ..Default::default() },
            CamQuery { v: Some(cam.v), ..Default::default() },
            CamQuery { w: Some(cam.w), ..Default::default() },
            CamQuery { k: Some(cam.k), ..Default::default() },
        ] {
            let q = CamQuery { q: Some(cam.q), hq: Some(cam.hq), ..q };
            let back = SCAM_MODEL.inverse(&q).unwrap();
            assert!(close(&back, &xyz, 1e-7), "{q:?} -> {back:?}");
        }
        let s = CamQuery { j: Some(cam.j), s: Some(10.0), h: Some(cam.h), ..Default::default() };
        assert!(SCAM_MODEL.inverse(&s).is_err());
    }
}
