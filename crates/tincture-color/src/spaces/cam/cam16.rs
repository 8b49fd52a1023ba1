//! CAM16 and the CIECAM02-family environment it shares.
//!
//! [`Ciecam`] implements both CAM16 and CIECAM02: they differ only in the
//! cone space used for adaptation and in the extra Hunt-Pointer-Estevez
//! step CIECAM02 takes before compression.

use std::sync::LazyLock;

use tincture_math::{CAT16, Mat3, nth_root, spow, zdiv};
use tincture_primaries::xy_to_xyz;
use tracing::debug;

use super::{
    Attributes, CamJab, CamJmh, ChromaInput, HueInput, HueQuadrature, LightnessInput, M1, Model,
    ViewingConditions, compress, decompress, hue_radians,
};

/// Inverse of the CAT16 cone matrix.
pub const CAT16_INV: Mat3 = Mat3::from_rows([
    [1.8620678550872327, -1.0112546305316843, 0.14918677544445175],
    [0.38752654323613717, 0.6214474419314753, -0.008973985167612518],
    [-0.015841498849333856, -0.03412293802851556, 1.0499644368778496],
]);

/// CAM16 unique hues.
pub const HUE_TABLE: HueQuadrature = HueQuadrature {
    h: [20.14, 90.00, 164.25, 237.53, 380.14],
    e: [0.8, 0.7, 1.0, 1.2, 0.8],
};

/// Eccentricity factor for a hue in radians.
pub fn eccentricity(h: f64) -> f64 {
    0.25 * ((h + 2.0).cos() + 3.8)
}

// ============================================================================
// Environment
// ============================================================================

/// Derived viewing-condition constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Conditions this environment was built from.
    pub conditions: ViewingConditions,
    /// Luminance of the white (100).
    pub yw: f64,
    /// Luminance-level adaptation factor.
    pub fl: f64,
    /// `fl^0.25`
    pub fl_root: f64,
    /// Background induction ratio `Yb / Yw`.
    pub n: f64,
    /// Base exponential non-linearity.
    pub z: f64,
    /// Brightness background factor.
    pub nbb: f64,
    /// Chromatic background factor.
    pub ncb: f64,
    /// Surround exponent.
    pub c: f64,
    /// Chromatic induction factor.
    pub nc: f64,
    /// Degree of adaptation.
    pub d: f64,
    /// White cone response in the adaptation space.
    pub rgb_w: [f64; 3],
    /// Per-channel adaptation gains.
    pub d_rgb: [f64; 3],
    /// Reciprocal of `d_rgb`.
    pub d_rgb_inv: [f64; 3],
}

impl Environment {
    /// Derives the constants for `conditions`, with `cone` as the
    /// adaptation space.
    pub fn new(conditions: ViewingConditions, cone: &Mat3) -> Self {
        let xyz_w = xy_to_xyz(conditions.white, 100.0);
        let yw = xyz_w[1];
        let la = conditions.adapting_luminance;
        let (f, c, nc) = conditions.surround.factors();

        let k = 1.0 / (5.0 * la + 1.0);
        let k4 = k.powi(4);
        let fl = k4 * la + 0.1 * (1.0 - k4).powi(2) * (5.0 * la).cbrt();
        let n = conditions.background_luminance / yw;
        let nbb = 0.725 * n.powf(-0.2);
        let d = conditions.degree_of_adaptation(f);

        let rgb_w = cone.transform(xyz_w);
        let d_rgb = rgb_w.map(|w| 1.0 + (yw / w - 1.0) * d);
        Self {
            conditions,
            yw,
            fl,
            fl_root: nth_root(fl, 4.0),
            n,
            z: 1.48 + n.sqrt(),
            nbb,
            ncb: nbb,
            c,
            nc,
            d,
            rgb_w,
            d_rgb,
            d_rgb_inv: d_rgb.map(|v| 1.0 / v),
        }
    }

    /// Adapted white cone response.
    pub fn rgb_cw(&self) -> [f64; 3] {
        [self.rgb_w[0] * self.d_rgb[0], self.rgb_w[1] * self.d_rgb[1], self.rgb_w[2] * self.d_rgb[2]]
    }
}

fn achromatic_signal(rgb_a: &[f64]) -> f64 {
    2.0 * rgb_a[0] + rgb_a[1] + 0.05 * rgb_a[2]
}

// ============================================================================
// Model
// ============================================================================

/// CAM16 or CIECAM02 bound to an environment.
#[derive(Debug, Clone)]
pub struct Ciecam {
    env: Environment,
    cone_inv: Mat3,
    cone: Mat3,
    /// Cone space to the compression space (identity for CAM16).
    post: Mat3,
    /// Compression space back to the cone space.
    post_inv: Mat3,
    a_w: f64,
}

impl Ciecam {
    /// CAM16 under `conditions`.
    pub fn cam16(conditions: ViewingConditions) -> Self {
        Self::build(conditions, CAT16, CAT16_INV, Mat3::IDENTITY, Mat3::IDENTITY)
    }

    pub(crate) fn build(conditions: ViewingConditions, cone: Mat3, cone_inv: Mat3, post: Mat3, post_inv: Mat3) -> Self {
        let env = Environment::new(conditions, &cone);
        let rgb_pw = post.transform(env.rgb_cw());
        let a_w = env.nbb * achromatic_signal(&compress(&rgb_pw, env.fl));
        debug!(la = conditions.adapting_luminance, fl = env.fl, d = env.d, a_w, "CIECAM environment");
        Self { env, cone_inv, cone, post, post_inv, a_w }
    }

    /// Environment constants.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Achromatic response of the white.
    pub fn a_w(&self) -> f64 {
        self.a_w
    }
}

impl Model for Ciecam {
    fn hue_table(&self) -> &HueQuadrature {
        &HUE_TABLE
    }

    fn forward(&self, xyz: &[f64]) -> Attributes {
        let env = &self.env;
        let cone = self.cone.transform([xyz[0] * 100.0, xyz[1] * 100.0, xyz[2] * 100.0]);
        let rgb_c = [cone[0] * env.d_rgb[0], cone[1] * env.d_rgb[1], cone[2] * env.d_rgb[2]];
        let rgb_a = compress(&self.post.transform(rgb_c), env.fl);

        let p2 = achromatic_signal(&rgb_a);
        let a = rgb_a[0] + (-12.0 * rgb_a[1] + rgb_a[2]) / 11.0;
        let b = (rgb_a[0] + rgb_a[1] - 2.0 * rgb_a[2]) / 9.0;
        let u = rgb_a[0] + rgb_a[1] + 1.05 * rgb_a[2];
        let h_rad = b.atan2(a).rem_euclid(std::f64::consts::TAU);

        let et = eccentricity(h_rad);
        let p1 = 5e4 / 13.0 * env.nc * env.ncb * et;
        let t = zdiv(p1 * a.hypot(b), u + 0.305);
        let alpha = spow(t, 0.9) * (1.64 - 0.29f64.powf(env.n)).powf(0.73);

        let big_a = env.nbb * p2;
        let j = 100.0 * spow(big_a / self.a_w, env.c * env.z);
        let j_root = nth_root(j / 100.0, 2.0);
        let q = 4.0 / env.c * j_root * (self.a_w + 4.0) * env.fl_root;
        let c = alpha * j_root;
        let m = c * env.fl_root;
        let s = 50.0 * nth_root(env.c * alpha / (self.a_w + 4.0), 2.0);

        Attributes { j, c, h: tincture_math::constrain_hue(h_rad.to_degrees()), s, q, m, ..Default::default() }
    }

    fn solve(&self, lightness: LightnessInput, chroma: ChromaInput, hue: HueInput) -> Vec<f64> {
        let env = &self.env;
        let lightness = match lightness {
            LightnessInput::J(j) | LightnessInput::Q(j) if j == 0.0 => {
                if chroma.value() == 0.0 {
                    return vec![0.0; 3];
                }
                match lightness {
                    LightnessInput::J(_) => LightnessInput::J(f64::EPSILON),
                    LightnessInput::Q(_) => LightnessInput::Q(f64::EPSILON),
                }
            }
            other => other,
        };

        let h_rad = hue_radians(self, hue);
        let j_root = match lightness {
            LightnessInput::J(j) => nth_root(j, 2.0) * 0.1,
            LightnessInput::Q(q) => 0.25 * env.c * q / ((self.a_w + 4.0) * env.fl_root),
        };
        let alpha = match chroma {
            ChromaInput::M(m) => (m / env.fl_root) / j_root,
            ChromaInput::S(s) => 0.0004 * s * s * (self.a_w + 4.0) / env.c,
            other => other.value() / j_root,
        };
        let t = spow(alpha * (1.64 - 0.29f64.powf(env.n)).powf(-0.73), 10.0 / 9.0);

        let et = eccentricity(h_rad);
        let big_a = self.a_w * spow(j_root, 2.0 / env.c / env.z);

        let (sin_h, cos_h) = h_rad.sin_cos();
        let p1 = 5e4 / 13.0 * env.nc * env.ncb * et;
        let p2 = big_a / env.nbb;
        let r = 23.0 * (p2 + 0.305) * zdiv(t, 23.0 * p1 + t * (11.0 * cos_h + 108.0 * sin_h));
        let (a, b) = (r * cos_h, r * sin_h);

        let rgb_a = M1.transform([p2, a, b]).map(|v| v / 1403.0);
        let rgb_c = self.post_inv.transform_slice(&decompress(&rgb_a, env.fl));
        let unadapted = [rgb_c[0] * env.d_rgb_inv[0], rgb_c[1] * env.d_rgb_inv[1], rgb_c[2] * env.d_rgb_inv[2]];
        self.cone_inv.transform(unadapted).iter().map(|v| v / 100.0).collect()
    }
}

/// CAM16 under sRGB viewing conditions.
pub static CAM16_MODEL: LazyLock<Ciecam> = LazyLock::new(|| Ciecam::cam16(ViewingConditions::srgb()));

pub(crate) fn cam16_model() -> &'static dyn Model {
    &*CAM16_MODEL
}

/// CAM16 JMh.
pub const CAM16_JMH: CamJmh = CamJmh::new("cam16-jmh", &["--cam16-jmh"], 100.0, 105.0, cam16_model);

/// CAM16 Jab.
pub const CAM16_JAB: CamJab = CamJab::new("cam16", "cam16-jmh", &["--cam16"], 90.0);

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
    fn test_white_lightness() {
        let jmh = CAM16_MODEL.to_jmh(&xy_to_xyz(D65, 1.0));
        assert!((jmh[0] - 100.0).abs() < 1e-6);
        // Incomplete adaptation leaves some colorfulness on white.
        assert!(jmh[1] > 0.0 && jmh[1] < 5.0);
    }

    #[test]
    fn test_round_trip_jmh() {
        for xyz in [[0.2, 0.3, 0.4], [0.41, 0.21, 0.02], [0.05, 0.04, 0.2]] {
            let back = CAM16_MODEL.from_jmh(&CAM16_MODEL.to_jmh(&xyz));
            assert!(close(&back, &xyz, 1e-9), "{xyz:?} -> {back:?}");
        }
    }

    #[test]
    fn test_black() {
        assert_eq!(CAM16_MODEL.from_jmh(&[0.0, 0.0, 120.0]), vec![0.0; 3]);
    }

    #[test]
    fn test_every_family_member_inverts() {
        let xyz = [0.3, 0.2, 0.1];
        let cam = CAM16_MODEL.attributes(&xyz);
        let queries = [
            CamQuery { j: Some(cam.j), c: Some(cam.c), h: Some(cam.h), ..Default::default() },
            CamQuery { q: Some(cam.q), m: Some(cam.m), hq: Some(cam.hq), ..Default::default() },
            CamQuery { j: Some(cam.j), s: Some(cam.s), h: Some(cam.h), ..Default::default() },
        ];
        for q in queries {
            let back = CAM16_MODEL.inverse(&q).unwrap();
            assert!(close(&back, &xyz, 1e-8), "{q:?} -> {back:?}");
        }
    }

    #[test]
    fn test_inverse_rejects_bad_queries() {
        let q = CamQuery { j: Some(50.0), c: Some(10.0), ..Default::default() };
        assert!(CAM16_MODEL.inverse(&q).is_err());
        let q = CamQuery { j: Some(50.0), v: Some(10.0), h: Some(1.0), ..Default::default() };
        assert!(CAM16_MODEL.inverse(&q).is_err());
    }

    #[test]
    fn test_jab_space() {
        let jmh = [60.0, 20.0, 45.0];
        let jab = CAM16_JAB.from_base(&jmh);
        assert!(close(&CAM16_JAB.to_base(&jab), &jmh, 1e-9));
        assert_eq!(CAM16_JMH.base(), "xyz-d65");
    }
}
