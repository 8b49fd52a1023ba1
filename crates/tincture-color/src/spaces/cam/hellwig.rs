//! Hellwig-Fairchild revision of CAM16, with an optional
//! Helmholtz-Kohlrausch lightness correction.

use std::sync::LazyLock;

use tincture_math::{CAT16, constrain_hue, nth_root, spow};
use tracing::debug;

use super::cam16::{CAT16_INV, Environment, HUE_TABLE};
use super::{
    Attributes, CamJmh, ChromaInput, HueInput, HueQuadrature, LightnessInput, M1, Model, ViewingConditions, compress,
    decompress, hue_radians,
};

/// Hue-angle dependency of the Helmholtz-Kohlrausch correction.
pub fn hue_angle_dependency(h: f64) -> f64 {
    -0.160 * h.cos() + 0.132 * (2.0 * h).cos() - 0.405 * h.sin() + 0.080 * (2.0 * h).sin() + 0.792
}

/// Fourier-fitted eccentricity for a hue in radians.
pub fn eccentricity(h: f64) -> f64 {
    let (h2, h3, h4) = (2.0 * h, 3.0 * h, 4.0 * h);
    -0.0582 * h.cos() - 0.0258 * h2.cos() - 0.1347 * h3.cos() + 0.0289 * h4.cos() - 0.1475 * h.sin()
        - 0.0308 * h2.sin()
        + 0.0385 * h3.sin()
        + 0.0096 * h4.sin()
        + 1.0
}

/// Hellwig 2022 model.
#[derive(Debug, Clone)]
pub struct Hellwig {
    env: Environment,
    a_w: f64,
    hk: bool,
}

impl Hellwig {
    /// Model under `conditions`; `hk` enables the Helmholtz-Kohlrausch term.
    pub fn new(conditions: ViewingConditions, hk: bool) -> Self {
        let env = Environment::new(conditions, &CAT16);
        let rgb_aw = compress(&env.rgb_cw(), env.fl);
        let a_w = 2.0 * rgb_aw[0] + rgb_aw[1] + 0.05 * rgb_aw[2];
        debug!(fl = env.fl, a_w, hk, "Hellwig environment");
        Self { env, a_w, hk }
    }

    fn brightness(&self, j: f64) -> f64 {
        (2.0 / self.env.c) * (j / 100.0) * self.a_w
    }
}

impl Model for Hellwig {
    fn chroma_inputs(&self) -> &'static str {
        // Undoing the lightness correction needs chroma up front.
        if self.hk { "CM" } else { "CMs" }
    }

    fn hue_table(&self) -> &HueQuadrature {
        &HUE_TABLE
    }

    fn forward(&self, xyz: &[f64]) -> Attributes {
        let env = &self.env;
        let cone = CAT16.transform([xyz[0] * 100.0, xyz[1] * 100.0, xyz[2] * 100.0]);
        let rgb_a = compress(&[cone[0] * env.d_rgb[0], cone[1] * env.d_rgb[1], cone[2] * env.d_rgb[2]], env.fl);

        let p2 = 2.0 * rgb_a[0] + rgb_a[1] + 0.05 * rgb_a[2];
        let a = rgb_a[0] + (-12.0 * rgb_a[1] + rgb_a[2]) / 11.0;
        let b = (rgb_a[0] + rgb_a[1] - 2.0 * rgb_a[2]) / 9.0;
        let h_rad = b.atan2(a).rem_euclid(std::f64::consts::TAU);

        let mut j = 100.0 * spow(p2 / self.a_w, env.c * env.z);
        let mut q = self.brightness(j);
        let m = 43.0 * env.nc * eccentricity(h_rad) * a.hypot(b);
        let c = 35.0 * m / self.a_w;
        let s = 100.0 * tincture_math::zdiv(m, q);

        if self.hk {
            j += hue_angle_dependency(h_rad) * spow(c, 0.587);
            q = self.brightness(j);
        }

        Attributes { j, c, h: constrain_hue(h_rad.to_degrees()), s, q, m, ..Default::default() }
    }

    fn solve(&self, lightness: LightnessInput, chroma: ChromaInput, hue: HueInput) -> Vec<f64> {
        let env = &self.env;
        let zero_lightness = matches!(lightness, LightnessInput::J(v) | LightnessInput::Q(v) if v == 0.0);
        if zero_lightness && chroma.value() == 0.0 {
            return vec![0.0; 3];
        }

        let h_rad = hue_radians(self, hue);
        let (c, mut m) = match chroma {
            ChromaInput::M(m) => (Some(m * 35.0 / self.a_w), Some(m)),
            ChromaInput::C(c) => (Some(c), Some(c * self.a_w / 35.0)),
            _ => (None, None),
        };

        let mut j = match lightness {
            LightnessInput::J(j) => j,
            LightnessInput::Q(q) => 50.0 * env.c * q / self.a_w,
        };
        if self.hk {
            // Chroma-family inputs are restricted to C and M here.
            j -= hue_angle_dependency(h_rad) * spow(c.unwrap_or(0.0), 0.587);
        }
        let q = self.brightness(j);

        if let ChromaInput::S(s) = chroma {
            m = Some(q * s / 100.0);
        }
        let m = m.unwrap_or(0.0);

        let big_a = self.a_w * nth_root(j / 100.0, env.c * env.z);
        let r = m / (43.0 * env.nc * eccentricity(h_rad));
        let (sin_h, cos_h) = h_rad.sin_cos();

        let rgb_a = M1.transform([big_a, r * cos_h, r * sin_h]).map(|v| v / 1403.0);
        let rgb_c = decompress(&rgb_a, env.fl);
        let unadapted = [rgb_c[0] * env.d_rgb_inv[0], rgb_c[1] * env.d_rgb_inv[1], rgb_c[2] * env.d_rgb_inv[2]];
        CAT16_INV.transform(unadapted).iter().map(|v| v / 100.0).collect()
    }
}

/// Hellwig 2022 under sRGB viewing conditions.
pub static HELLWIG_MODEL: LazyLock<Hellwig> = LazyLock::new(|| Hellwig::new(ViewingConditions::srgb(), false));

/// Hellwig 2022 with the Helmholtz-Kohlrausch correction.
pub static HELLWIG_HK_MODEL: LazyLock<Hellwig> = LazyLock::new(|| Hellwig::new(ViewingConditions::srgb(), true));

fn hellwig_model() -> &'static dyn Model {
    &*HELLWIG_MODEL
}

fn hellwig_hk_model() -> &'static dyn Model {
    &*HELLWIG_HK_MODEL
}

/// Hellwig JMh.
pub const HELLWIG_JMH: CamJmh = CamJmh::new("hellwig-jmh", &["--hellwig-jmh"], 100.0, 70.0, hellwig_model);

/// Hellwig JMh with Helmholtz-Kohlrausch lightness.
pub const HELLWIG_HK_JMH: CamJmh =
    CamJmh::new("hellwig-hk-jmh", &["--hellwig-hk-jmh"], 101.56018891418564, 70.0, hellwig_hk_model);
