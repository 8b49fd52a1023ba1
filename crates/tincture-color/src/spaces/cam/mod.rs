//! Color appearance models.
//!
//! Every model here maps absolute XYZ to a set of appearance correlates
//! under fixed viewing conditions, and back. The conditions are folded into
//! an environment once (cone response of the white, luminance adaptation,
//! induction factors) and reused for every color.
//!
//! # Inverse contract
//!
//! An inverse takes exactly one correlate from each family:
//!
//! | Family    | Members                                   |
//! |-----------|-------------------------------------------|
//! | lightness | `J`, `Q`                                  |
//! | chroma    | `C`, `M`, `s`, and `V`/`K`/`W`/`D` where the model has them |
//! | hue       | `h`, `H` (quadrature)                     |
//!
//! Zero or several members of a family is a configuration error.
//!
//! ```rust
//! use tincture_color::spaces::cam::{CamQuery, Model, cam16::CAM16_MODEL};
//!
//! let xyz = [0.2, 0.25, 0.3];
//! let cam = CAM16_MODEL.attributes(&xyz);
//! let back = CAM16_MODEL
//!     .inverse(&CamQuery { j: Some(cam.j), c: Some(cam.c), h: Some(cam.h), ..Default::default() })
//!     .unwrap();
//! assert!((back[1] - 0.25).abs() < 1e-9);
//!
//! let both = CamQuery { j: Some(50.0), q: Some(40.0), m: Some(10.0), h: Some(120.0), ..Default::default() };
//! assert!(CAM16_MODEL.inverse(&both).is_err());
//! ```

pub mod cam02;
pub mod cam16;
pub mod hct;
pub mod hellwig;
pub mod scam;
pub mod ucs;
pub mod zcam;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tincture_core::{Channel, Cylindrical, DynamicRange, Error, FLG_MIRROR_PERCENT, LabIsh, LchIsh, Result};
use tincture_math::{Mat3, constrain_hue, polar_to_rect, rect_to_polar};
use tincture_primaries::D65;

use crate::space::{Polar, ROOT, Rectangular, Space, Xy};

/// Colorfulness below which a JMh color is treated as achromatic.
pub const ACHROMATIC_THRESHOLD: f64 = 1e-4;

// ============================================================================
// Viewing conditions
// ============================================================================

/// Relative luminance of the surround.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surround {
    /// Film projected in a dark room.
    Dark,
    /// Television viewing.
    Dim,
    /// Surface colors.
    #[default]
    Average,
}

impl Surround {
    /// `(F, c, Nc)` of CIECAM02 / CAM16.
    pub fn factors(self) -> (f64, f64, f64) {
        match self {
            Self::Dark => (0.8, 0.525, 0.8),
            Self::Dim => (0.9, 0.59, 0.9),
            Self::Average => (1.0, 0.69, 1.0),
        }
    }
}

impl FromStr for Surround {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Self::Dark),
            "dim" => Ok(Self::Dim),
            "average" => Ok(Self::Average),
            _ => Err(Error::config(format!("unknown surround '{s}'"))),
        }
    }
}

/// Viewing conditions an appearance model is evaluated under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewingConditions {
    /// Adopted white chromaticity.
    pub white: Xy,
    /// Luminance of the adapting field in cd/m².
    pub adapting_luminance: f64,
    /// Relative luminance of the background (white is 100).
    pub background_luminance: f64,
    /// Surround category.
    pub surround: Surround,
    /// Whether the illuminant is discounted (full adaptation).
    pub discounting: bool,
}

impl ViewingConditions {
    /// sRGB viewing: 64 lux under a gray-world assumption, 20% background,
    /// average surround, no discounting.
    pub fn srgb() -> Self {
        Self {
            white: D65,
            adapting_luminance: 64.0 / std::f64::consts::PI * 0.2,
            background_luminance: 20.0,
            surround: Surround::Average,
            discounting: false,
        }
    }

    /// Degree of adaptation `D` for a surround factor `f`.
    pub fn degree_of_adaptation(&self, f: f64) -> f64 {
        if self.discounting {
            return 1.0;
        }
        (f * (1.0 - 1.0 / 3.6 * ((-self.adapting_luminance - 42.0) / 92.0).exp())).clamp(0.0, 1.0)
    }
}

impl Default for ViewingConditions {
    fn default() -> Self {
        Self::srgb()
    }
}

// ============================================================================
// Hue quadrature
// ============================================================================

/// Unique-hue anchors (red, yellow, green, blue, red again) of a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueQuadrature {
    /// Hue angles of the anchors.
    pub h: [f64; 5],
    /// Eccentricity at each anchor.
    pub e: [f64; 5],
}

impl HueQuadrature {
    /// Hue angle to quadrature `H` in `[0, 400)`.
    pub fn quadrature(&self, h: f64) -> f64 {
        let mut hp = constrain_hue(h);
        if hp <= self.h[0] {
            hp += 360.0;
        }
        let i = self.h.partition_point(|&a| a < hp).saturating_sub(1).min(3);
        let (hi, hii) = (self.h[i], self.h[i + 1]);
        let (ei, eii) = (self.e[i], self.e[i + 1]);
        let t = (hp - hi) / ei;
        100.0 * i as f64 + 100.0 * t / (t + (hii - hp) / eii)
    }

    /// Quadrature `H` back to a hue angle.
    pub fn hue(&self, quadrature: f64) -> f64 {
        let hp = quadrature.rem_euclid(400.0);
        let i = ((0.01 * hp).floor() as usize).min(3);
        let hp = hp % 100.0;
        let (hi, hii) = (self.h[i], self.h[i + 1]);
        let (ei, eii) = (self.e[i], self.e[i + 1]);
        constrain_hue((hp * (eii * hi - ei * hii) - 100.0 * hi * eii) / (hp * (eii - ei) - 100.0 * eii))
    }
}

// ============================================================================
// Correlates
// ============================================================================

/// Appearance correlates of one color. Correlates a model does not define
/// are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes {
    /// Lightness.
    pub j: f64,
    /// Chroma.
    pub c: f64,
    /// Hue angle.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Brightness.
    pub q: f64,
    /// Colorfulness.
    pub m: f64,
    /// Vividness.
    pub v: f64,
    /// Blackness.
    pub k: f64,
    /// Whiteness.
    pub w: f64,
    /// Depth.
    pub d: f64,
    /// Hue quadrature.
    pub hq: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        let n = f64::NAN;
        Self { j: n, c: n, h: n, s: n, q: n, m: n, v: n, k: n, w: n, d: n, hq: n }
    }
}

/// Inverse request; set exactly one field of each family.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CamQuery {
    /// Lightness.
    pub j: Option<f64>,
    /// Brightness.
    pub q: Option<f64>,
    /// Chroma.
    pub c: Option<f64>,
    /// Colorfulness.
    pub m: Option<f64>,
    /// Saturation.
    pub s: Option<f64>,
    /// Vividness.
    pub v: Option<f64>,
    /// Blackness.
    pub k: Option<f64>,
    /// Whiteness.
    pub w: Option<f64>,
    /// Depth.
    pub d: Option<f64>,
    /// Hue angle.
    pub h: Option<f64>,
    /// Hue quadrature.
    pub hq: Option<f64>,
}

/// Resolved lightness-family input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightnessInput {
    /// `J`
    J(f64),
    /// `Q`
    Q(f64),
}

/// Resolved chroma-family input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChromaInput {
    /// `C`
    C(f64),
    /// `M`
    M(f64),
    /// `s`
    S(f64),
    /// `V`
    V(f64),
    /// `K`
    K(f64),
    /// `W`
    W(f64),
    /// `D`
    D(f64),
}

impl ChromaInput {
    fn letter(self) -> char {
        match self {
            Self::C(_) => 'C',
            Self::M(_) => 'M',
            Self::S(_) => 's',
            Self::V(_) => 'V',
            Self::K(_) => 'K',
            Self::W(_) => 'W',
            Self::D(_) => 'D',
        }
    }

    /// The carried value.
    pub fn value(self) -> f64 {
        match self {
            Self::C(v) | Self::M(v) | Self::S(v) | Self::V(v) | Self::K(v) | Self::W(v) | Self::D(v) => v,
        }
    }
}

/// Resolved hue-family input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HueInput {
    /// Hue angle in degrees.
    Angle(f64),
    /// Hue quadrature.
    Quadrature(f64),
}

fn exactly_one(family: &str, values: &[Option<f64>]) -> Result<(usize, f64)> {
    let mut given = values.iter().enumerate().filter_map(|(i, v)| v.map(|v| (i, v)));
    match (given.next(), given.next()) {
        (Some(one), None) => Ok(one),
        (None, _) => Err(Error::config(format!("inverse requires one {family} correlate, none given"))),
        (Some(_), Some(_)) => Err(Error::config(format!("inverse requires exactly one {family} correlate"))),
    }
}

impl CamQuery {
    /// Checks the one-per-family contract against the chroma correlates a
    /// model accepts (given as letters, e.g. `"CMs"`).
    pub fn resolve(&self, accepted: &str) -> Result<(LightnessInput, ChromaInput, HueInput)> {
        let lightness = match exactly_one("lightness (J, Q)", &[self.j, self.q])? {
            (0, v) => LightnessInput::J(v),
            (_, v) => LightnessInput::Q(v),
        };
        let chroma = match exactly_one("chroma", &[self.c, self.m, self.s, self.v, self.k, self.w, self.d])? {
            (0, v) => ChromaInput::C(v),
            (1, v) => ChromaInput::M(v),
            (2, v) => ChromaInput::S(v),
            (3, v) => ChromaInput::V(v),
            (4, v) => ChromaInput::K(v),
            (5, v) => ChromaInput::W(v),
            (_, v) => ChromaInput::D(v),
        };
        if !accepted.contains(chroma.letter()) {
            return Err(Error::config(format!(
                "correlate '{}' is not supported here; use one of {accepted}",
                chroma.letter()
            )));
        }
        let hue = match exactly_one("hue (h, H)", &[self.h, self.hq])? {
            (0, v) => HueInput::Angle(v),
            (_, v) => HueInput::Quadrature(v),
        };
        Ok((lightness, chroma, hue))
    }
}

// ============================================================================
// Model trait
// ============================================================================

/// A color appearance model bound to one environment.
pub trait Model: Send + Sync + fmt::Debug {
    /// Chroma-family letters the inverse accepts.
    fn chroma_inputs(&self) -> &'static str {
        "CMs"
    }

    /// Unique-hue table.
    fn hue_table(&self) -> &HueQuadrature;

    /// Relative XYZ (`Y = 1` white) to correlates, quadrature left NaN.
    fn forward(&self, xyz: &[f64]) -> Attributes;

    /// Correlates to relative XYZ from already validated inputs.
    fn solve(&self, lightness: LightnessInput, chroma: ChromaInput, hue: HueInput) -> Vec<f64>;

    /// Forward transform including hue quadrature.
    fn attributes(&self, xyz: &[f64]) -> Attributes {
        let mut cam = self.forward(xyz);
        cam.hq = self.hue_table().quadrature(cam.h);
        cam
    }

    /// Inverse transform with the one-per-family contract enforced.
    fn inverse(&self, query: &CamQuery) -> Result<Vec<f64>> {
        let (l, c, h) = query.resolve(self.chroma_inputs())?;
        Ok(self.solve(l, c, h))
    }

    /// Relative XYZ to `(J, M, h)`.
    fn to_jmh(&self, xyz: &[f64]) -> Vec<f64> {
        let cam = self.forward(xyz);
        vec![cam.j, cam.m, cam.h]
    }

    /// `(J, M, h)` to relative XYZ.
    fn from_jmh(&self, jmh: &[f64]) -> Vec<f64> {
        self.solve(LightnessInput::J(jmh[0]), ChromaInput::M(jmh[1]), HueInput::Angle(jmh[2]))
    }
}

// ============================================================================
// Shared math
// ============================================================================

/// `[460, 451, 288; 460, -891, -261; 460, -220, -6300]`, from `(p2, a, b)`
/// back to post-adaptation cone responses (before the `1/1403` scale).
pub(crate) const M1: Mat3 = Mat3::from_rows([
    [460.0, 451.0, 288.0],
    [460.0, -891.0, -261.0],
    [460.0, -220.0, -6300.0],
]);

/// Post-adaptation non-linear compression.
pub(crate) fn compress(coords: &[f64], fl: f64) -> Vec<f64> {
    coords
        .iter()
        .map(|&c| {
            let x = (fl * c.abs() * 0.01).powf(0.42);
            400.0 * x.copysign(c) / (x + 27.13)
        })
        .collect()
}

/// Inverse of [`compress`].
pub(crate) fn decompress(coords: &[f64], fl: f64) -> Vec<f64> {
    coords
        .iter()
        .map(|&c| {
            let a = c.abs();
            (100.0 / fl * (27.13 * a / (400.0 - a)).powf(1.0 / 0.42)).copysign(c)
        })
        .collect()
}

fn hue_radians(model: &dyn Model, hue: HueInput) -> f64 {
    match hue {
        HueInput::Angle(h) => h.rem_euclid(360.0).to_radians(),
        HueInput::Quadrature(q) => model.hue_table().hue(q).to_radians(),
    }
}

fn no_nans(coords: &[f64]) -> Vec<f64> {
    coords.iter().map(|&v| if v.is_nan() { 0.0 } else { v }).collect()
}

// ============================================================================
// Spaces
// ============================================================================

const JMH_ALIASES: &[(&str, &str)] = &[("lightness", "j"), ("colorfulness", "m"), ("hue", "h")];

/// `(J, M, h)` form of an appearance model, based directly on XYZ.
#[derive(Debug, Clone, Copy)]
pub struct CamJmh {
    name: &'static str,
    ids: &'static [&'static str],
    channels: [Channel; 3],
    aliases: &'static [(&'static str, &'static str)],
    range: DynamicRange,
    model: fn() -> &'static dyn Model,
}

impl CamJmh {
    /// JMh space `name` with nominal ranges `J in [0, j_max]`, `M in [0, m_max]`.
    pub const fn new(
        name: &'static str,
        ids: &'static [&'static str],
        j_max: f64,
        m_max: f64,
        model: fn() -> &'static dyn Model,
    ) -> Self {
        Self {
            name,
            ids,
            channels: [Channel::new("j", 0.0, j_max), Channel::new("m", 0.0, m_max), Channel::angle("h")],
            aliases: JMH_ALIASES,
            range: DynamicRange::Sdr,
            model,
        }
    }

    /// Replaces channels and aliases.
    pub const fn with_channels(
        mut self,
        channels: [Channel; 3],
        aliases: &'static [(&'static str, &'static str)],
    ) -> Self {
        self.channels = channels;
        self.aliases = aliases;
        self
    }

    /// Marks the space as HDR.
    pub const fn hdr(mut self) -> Self {
        self.range = DynamicRange::Hdr;
        self
    }

    /// The bound appearance model.
    pub fn model(&self) -> &'static dyn Model {
        (self.model)()
    }
}

impl Space for CamJmh {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        ROOT
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

    fn dynamic_range(&self) -> DynamicRange {
        self.range
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        self.model().from_jmh(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        self.model().to_jmh(coords)
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
        Some(coords[0] == 0.0 || coords[1].abs() < ACHROMATIC_THRESHOLD)
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::LCH)
    }

    fn lch(&self) -> Option<&dyn LchIsh> {
        Some(&Polar::LCH)
    }
}

/// Rectangular `(J, a, b)` form of a JMh space.
#[derive(Debug, Clone, Copy)]
pub struct CamJab {
    name: &'static str,
    base: &'static str,
    ids: &'static [&'static str],
    channels: [Channel; 3],
}

impl CamJab {
    /// Jab space `name` over the JMh space `base`.
    pub const fn new(name: &'static str, base: &'static str, ids: &'static [&'static str], ab: f64) -> Self {
        Self {
            name,
            base,
            ids,
            channels: [
                Channel::new("j", 0.0, 100.0).limit(Some(0.0), None),
                Channel::new("a", -ab, ab).flags(FLG_MIRROR_PERCENT),
                Channel::new("b", -ab, ab).flags(FLG_MIRROR_PERCENT),
            ],
        }
    }
}

impl Space for CamJab {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        self.base
    }

    fn serialize(&self) -> &[&'static str] {
        self.ids
    }

    fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("lightness", "j")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        let (m, h) = rect_to_polar(coords[1], coords[2]);
        vec![coords[0], m, h]
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        let h = if coords[2].is_nan() { 0.0 } else { coords[2] };
        let (a, b) = polar_to_rect(coords[1], h);
        vec![coords[0], a, b]
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[0] == 0.0 || coords[1].hypot(coords[2]) < ACHROMATIC_THRESHOLD)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAM16_TABLE: HueQuadrature = HueQuadrature {
        h: [20.14, 90.00, 164.25, 237.53, 380.14],
        e: [0.8, 0.7, 1.0, 1.2, 0.8],
    };

    #[test]
    fn test_quadrature_anchors() {
        assert!((CAM16_TABLE.quadrature(20.14) - 400.0).abs() < 1e-9);
        assert!((CAM16_TABLE.quadrature(90.0) - 100.0).abs() < 1e-9);
        assert!((CAM16_TABLE.quadrature(164.25) - 200.0).abs() < 1e-9);
        assert!((CAM16_TABLE.quadrature(237.53) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_quadrature_inverse() {
        for h in [0.0, 15.0, 45.0, 120.0, 200.0, 300.0, 359.0] {
            let back = CAM16_TABLE.hue(CAM16_TABLE.quadrature(h));
            assert!((back - h).abs() < 1e-9, "{h} -> {back}");
        }
    }

    #[test]
    fn test_compress_inverse() {
        let v = [12.0, -3.0, 80.0];
        let back = decompress(&compress(&v, 0.79), 0.79);
        for i in 0..3 {
            assert!((back[i] - v[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_query_contract() {
        let ok = CamQuery { j: Some(50.0), m: Some(10.0), h: Some(20.0), ..Default::default() };
        assert!(ok.resolve("CMs").is_ok());

        let no_hue = CamQuery { j: Some(50.0), m: Some(10.0), ..Default::default() };
        assert!(no_hue.resolve("CMs").is_err());

        let two_chroma = CamQuery { j: Some(50.0), c: Some(1.0), m: Some(10.0), h: Some(20.0), ..Default::default() };
        assert!(two_chroma.resolve("CMs").is_err());

        let unsupported = CamQuery { q: Some(50.0), v: Some(10.0), hq: Some(20.0), ..Default::default() };
        assert!(unsupported.resolve("CMs").is_err());
        assert!(unsupported.resolve("CMsVKW").is_ok());
    }

    #[test]
    fn test_surround_parse() {
        assert_eq!("dim".parse::<Surround>().unwrap(), Surround::Dim);
        assert!("bright".parse::<Surround>().is_err());
    }
}
