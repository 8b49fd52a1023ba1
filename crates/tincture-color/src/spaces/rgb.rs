//! RGB spaces.
//!
//! Two building blocks cover every RGB space:
//!
//! - [`LinearRgb`] - linear light, one matrix hop to XYZ
//! - [`EncodedRgb`] - a transfer curve over a linear parent
//!
//! | Space | Base | Curve |
//! |-------|------|-------|
//! | `srgb` | `srgb-linear` | sRGB |
//! | `display-p3` | `display-p3-linear` | sRGB |
//! | `rec2020` | `rec2020-linear` | BT.2020 |
//! | `rec709` | `srgb-linear` | BT.709 |
//! | `a98-rgb` | `a98-rgb-linear` | gamma 563/256 |
//! | `prophoto-rgb` | `prophoto-rgb-linear` | gamma 1.8 with toe |
//! | `rec2100-pq` | `rec2100-linear` | PQ, 203 nit white |
//! | `rec2100-hlg` | `rec2100-linear` | HLG |
//! | `acescc` | `acescg` | pure log2 |
//! | `acescct` | `acescg` | log2 with linear toe |
//!
//! ProPhoto converts through `xyz-d50`; every other space here is D65 or
//! ACES white relative to `xyz-d65`.

use tincture_core::{Channel, DynamicRange, FLG_OPT_PERCENT, Result, RgbIsh};
use tincture_math::Mat3;
use tincture_primaries::{ACES_D60, D50, D65, Primaries, rgb_xyz_matrices};
use tincture_transfer::{acescc, acescct, gamma, hlg, pq, rec709, rec2020, srgb};

use crate::css::{CssFunction, Syntax};
use crate::space::{ROOT, Space, Xy};

/// Unit cube channels shared by display RGB spaces.
pub const UNIT_RGB: [Channel; 3] = [
    Channel::new("r", 0.0, 1.0).bound(true).flags(FLG_OPT_PERCENT),
    Channel::new("g", 0.0, 1.0).bound(true).flags(FLG_OPT_PERCENT),
    Channel::new("b", 0.0, 1.0).bound(true).flags(FLG_OPT_PERCENT),
];

/// Half-float range used by the ACES spaces.
pub const ACES_RGB: [Channel; 3] = [
    Channel::new("r", 0.0, 65504.0).bound(true),
    Channel::new("g", 0.0, 65504.0).bound(true),
    Channel::new("b", 0.0, 65504.0).bound(true),
];

/// ACEScc code values.
pub const ACESCC_RGB: [Channel; 3] = [
    Channel::new("r", acescc::MIN, acescc::MAX).bound(true),
    Channel::new("g", acescc::MIN, acescc::MAX).bound(true),
    Channel::new("b", acescc::MIN, acescc::MAX).bound(true),
];

/// ACEScct code values.
pub const ACESCCT_RGB: [Channel; 3] = [
    Channel::new("r", acescct::MIN, acescct::MAX).bound(true),
    Channel::new("g", acescct::MIN, acescct::MAX).bound(true),
    Channel::new("b", acescct::MIN, acescct::MAX).bound(true),
];

const RGB_ALIASES: &[(&str, &str)] = &[("red", "r"), ("green", "g"), ("blue", "b")];

// ============================================================================
// Linear RGB
// ============================================================================

/// Linear-light RGB defined by a matrix pair to its base XYZ.
#[derive(Debug, Clone, Copy)]
pub struct LinearRgb {
    name: &'static str,
    base: &'static str,
    ids: &'static [&'static str],
    white: Xy,
    channels: [Channel; 3],
    to_xyz: Mat3,
    from_xyz: Mat3,
    range: DynamicRange,
}

impl LinearRgb {
    /// Unit-cube linear RGB over `xyz-d65`.
    pub const fn new(
        name: &'static str,
        ids: &'static [&'static str],
        white: Xy,
        to_xyz: Mat3,
        from_xyz: Mat3,
    ) -> Self {
        Self {
            name,
            base: ROOT,
            ids,
            white,
            channels: UNIT_RGB,
            to_xyz,
            from_xyz,
            range: DynamicRange::Sdr,
        }
    }

    /// Derives the matrices from chromaticities.
    pub fn from_primaries(name: &'static str, ids: &'static [&'static str], p: &Primaries) -> Result<Self> {
        let (to_xyz, from_xyz) = rgb_xyz_matrices(p)?;
        Ok(Self::new(name, ids, p.w, to_xyz, from_xyz))
    }

    /// Converts through another XYZ space (`xyz-d50` for ProPhoto).
    pub const fn with_base(mut self, base: &'static str) -> Self {
        self.base = base;
        self
    }

    /// Replaces the channel ranges.
    pub const fn with_channels(mut self, channels: [Channel; 3]) -> Self {
        self.channels = channels;
        self
    }

    /// Marks the space as HDR.
    pub const fn hdr(mut self) -> Self {
        self.range = DynamicRange::Hdr;
        self
    }
}

impl RgbIsh for LinearRgb {
    fn linear(&self) -> Option<&str> {
        Some(self.name)
    }
}

impl Space for LinearRgb {
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
        RGB_ALIASES
    }

    fn white(&self) -> Xy {
        self.white
    }

    fn dynamic_range(&self) -> DynamicRange {
        self.range
    }

    fn extended_range(&self) -> bool {
        true
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        self.to_xyz.transform_slice(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        self.from_xyz.transform_slice(coords)
    }

    fn rgb(&self) -> Option<&dyn RgbIsh> {
        Some(self)
    }
}

// ============================================================================
// Encoded RGB
// ============================================================================

/// Scalar transfer curve.
pub type Curve = fn(f64) -> f64;

/// RGB encoded with a transfer curve over a linear parent.
#[derive(Debug, Clone, Copy)]
pub struct EncodedRgb {
    name: &'static str,
    linear: &'static str,
    ids: &'static [&'static str],
    white: Xy,
    channels: [Channel; 3],
    decode: Curve,
    encode: Curve,
    range: DynamicRange,
    syntax: Option<&'static dyn Syntax>,
}

impl EncodedRgb {
    /// Encoded RGB over `linear` using `decode` (to linear) and `encode`.
    pub const fn new(name: &'static str, linear: &'static str, white: Xy, decode: Curve, encode: Curve) -> Self {
        Self {
            name,
            linear,
            ids: &[],
            white,
            channels: UNIT_RGB,
            decode,
            encode,
            range: DynamicRange::Sdr,
            syntax: None,
        }
    }

    /// Sets the `color()` identifiers.
    pub const fn with_ids(mut self, ids: &'static [&'static str]) -> Self {
        self.ids = ids;
        self
    }

    /// Replaces the channel ranges.
    pub const fn with_channels(mut self, channels: [Channel; 3]) -> Self {
        self.channels = channels;
        self
    }

    /// Marks the space as HDR.
    pub const fn hdr(mut self) -> Self {
        self.range = DynamicRange::Hdr;
        self
    }

    /// Attaches a text syntax beyond `color()`.
    pub const fn with_syntax(mut self, syntax: &'static dyn Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }
}

impl RgbIsh for EncodedRgb {
    fn linear(&self) -> Option<&str> {
        Some(self.linear)
    }
}

impl Space for EncodedRgb {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        self.linear
    }

    fn serialize(&self) -> &[&'static str] {
        self.ids
    }

    fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        RGB_ALIASES
    }

    fn white(&self) -> Xy {
        self.white
    }

    fn dynamic_range(&self) -> DynamicRange {
        self.range
    }

    fn extended_range(&self) -> bool {
        true
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        tincture_transfer::map(coords, self.decode)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        tincture_transfer::map(coords, self.encode)
    }

    fn rgb(&self) -> Option<&dyn RgbIsh> {
        Some(self)
    }

    fn syntax(&self) -> Option<&dyn Syntax> {
        self.syntax
    }
}

// ============================================================================
// Built-in spaces
// ============================================================================

/// Linear sRGB.
pub const SRGB_LINEAR: LinearRgb = LinearRgb::new(
    "srgb-linear",
    &["srgb-linear"],
    D65,
    tincture_primaries::SRGB_TO_XYZ,
    tincture_primaries::XYZ_TO_SRGB,
);

/// sRGB with the CSS `rgb()`, hex and named-color syntax.
pub const SRGB: EncodedRgb =
    EncodedRgb::new("srgb", "srgb-linear", D65, srgb::eotf, srgb::oetf).with_syntax(&CssFunction::Rgb);

/// Linear Display P3.
pub const DISPLAY_P3_LINEAR: LinearRgb = LinearRgb::new(
    "display-p3-linear",
    &["--display-p3-linear"],
    D65,
    Mat3::from_rows([
        [0.4865709486482161, 0.26566769316909306, 0.1982172852343625],
        [0.22897456406974875, 0.6917385218365063, 0.079286914093745],
        [0.0, 0.04511338185890263, 1.043944368900976],
    ]),
    Mat3::from_rows([
        [2.4934969119414254, -0.9313836179191239, -0.40271078445071684],
        [-0.8294889695615747, 1.7626640603183465, 0.02362468584194358],
        [0.03584583024378446, -0.0761723892680418, 0.9568845240076872],
    ]),
);

/// Display P3.
pub const DISPLAY_P3: EncodedRgb = EncodedRgb::new("display-p3", "display-p3-linear", D65, srgb::eotf, srgb::oetf);

const REC2020_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.6369580483012914, 0.14461690358620832, 0.16888097516417208],
    [0.2627002120112671, 0.6779980715188708, 0.05930171646986195],
    [0.0, 0.028072693049087428, 1.0609850577107909],
]);

const XYZ_TO_REC2020: Mat3 = Mat3::from_rows([
    [1.7166511879712674, -0.35567078377639233, -0.25336628137365974],
    [-0.6666843518324892, 1.6164812366349395, 0.015768545813911124],
    [0.017639857445310787, -0.04277061325780853, 0.9421031212354739],
]);

/// Linear Rec.2020.
pub const REC2020_LINEAR: LinearRgb =
    LinearRgb::new("rec2020-linear", &["--rec2020-linear"], D65, REC2020_TO_XYZ, XYZ_TO_REC2020);

/// Rec.2020.
pub const REC2020: EncodedRgb = EncodedRgb::new("rec2020", "rec2020-linear", D65, rec2020::eotf, rec2020::oetf);

/// Rec.709: sRGB primaries with the BT.709 camera curve.
pub const REC709: EncodedRgb =
    EncodedRgb::new("rec709", "srgb-linear", D65, rec709::eotf, rec709::oetf).with_ids(&["--rec709"]);

/// Linear Adobe RGB (1998).
pub const A98_RGB_LINEAR: LinearRgb = LinearRgb::new(
    "a98-rgb-linear",
    &["--a98-rgb-linear"],
    D65,
    Mat3::from_rows([
        [0.5766690429101305, 0.1855582379065463, 0.1882286462349947],
        [0.29734497525053605, 0.6273635662554661, 0.07529145849399788],
        [0.02703136138641234, 0.07068885253582723, 0.9913375368376388],
    ]),
    Mat3::from_rows([
        [2.0415879038107465, -0.5650069742788596, -0.34473135077832956],
        [-0.9692436362808795, 1.8759675015077202, 0.04155505740717558],
        [0.013444280632031142, -0.11836239223101837, 1.0151749943912054],
    ]),
);

/// Adobe RGB (1998).
pub const A98_RGB: EncodedRgb = EncodedRgb::new("a98-rgb", "a98-rgb-linear", D65, gamma::a98_eotf, gamma::a98_oetf);

/// Linear ProPhoto RGB, relative to D50.
pub const PROPHOTO_RGB_LINEAR: LinearRgb = LinearRgb::new(
    "prophoto-rgb-linear",
    &["--prophoto-rgb-linear"],
    D50,
    Mat3::from_rows([
        [0.7977604896723027, 0.13518583717574031, 0.0313493495815248],
        [0.2880711282292934, 0.7118432178101014, 8.565396060525902e-05],
        [0.0, 0.0, 0.8251046025104601],
    ]),
    Mat3::from_rows([
        [1.3457989731028281, -0.2555801000799754, -0.05110628506753401],
        [-0.5446224939028347, 1.5082327413132781, 0.02053603239147973],
        [0.0, 0.0, 1.2119675456389454],
    ]),
)
.with_base("xyz-d50");

/// ProPhoto RGB.
pub const PROPHOTO_RGB: EncodedRgb =
    EncodedRgb::new("prophoto-rgb", "prophoto-rgb-linear", D50, gamma::prophoto_eotf, gamma::prophoto_oetf);

/// ACEScg (AP1 primaries, linear).
pub const ACESCG: LinearRgb = LinearRgb::new(
    "acescg",
    &["--acescg"],
    ACES_D60,
    Mat3::from_rows([
        [0.6624541811085053, 0.13400420645643313, 0.1561876870049078],
        [0.27222871678091454, 0.6740817658111484, 0.05368951740793705],
        [-0.005574649490394108, 0.004060733528982826, 1.0103391003129971],
    ]),
    Mat3::from_rows([
        [1.6410233796943257, -0.32480329418479, -0.23642469523761225],
        [-0.6636628587229829, 1.6153315916573379, 0.016756347685530137],
        [0.011721894328375376, -0.008284441996237409, 0.9883948585390215],
    ]),
)
.with_channels(ACES_RGB);

/// ACES 2065-1 (AP0 primaries, linear).
pub const ACES2065_1: LinearRgb = LinearRgb::new(
    "aces2065-1",
    &["--aces2065-1"],
    ACES_D60,
    Mat3::from_rows([
        [0.9525523959381857, 0.0, 9.367863166046855e-05],
        [0.34396644976507507, 0.7281660966134857, -0.07213254637856079],
        [0.0, 0.0, 1.0088251843515859],
    ]),
    Mat3::from_rows([
        [1.0498110174979742, 0.0, -9.748454057925287e-05],
        [-0.49590302307731976, 1.3733130458157063, 0.09824003605730998],
        [0.0, 0.0, 0.991252018200499],
    ]),
)
.with_channels(ACES_RGB);

/// ACEScc, the log grading encoding of ACEScg.
pub const ACESCC: EncodedRgb = EncodedRgb::new("acescc", "acescg", ACES_D60, acescc::eotf, acescc::oetf)
    .with_ids(&["--acescc"])
    .with_channels(ACESCC_RGB)
    .hdr();

/// ACEScct, ACEScc with a linear toe.
pub const ACESCCT: EncodedRgb = EncodedRgb::new("acescct", "acescg", ACES_D60, acescct::eotf, acescct::oetf)
    .with_ids(&["--acescct"])
    .with_channels(ACESCCT_RGB);

/// Linear Rec.2100; the same primaries as Rec.2020.
pub const REC2100_LINEAR: LinearRgb =
    LinearRgb::new("rec2100-linear", &["rec2100-linear"], D65, REC2020_TO_XYZ, XYZ_TO_REC2020);

fn pq_decode(v: f64) -> f64 {
    pq::eotf(v) / pq::YW
}

fn pq_encode(l: f64) -> f64 {
    pq::oetf(l * pq::YW)
}

/// Rec.2100 PQ with diffuse white at 203 nits.
pub const REC2100_PQ: EncodedRgb = EncodedRgb::new("rec2100-pq", "rec2100-linear", D65, pq_decode, pq_encode)
    .with_ids(&["rec2100-pq", "--rec2100-pq"])
    .hdr();

/// Rec.2100 HLG with a 1000 nit peak.
pub const REC2100_HLG: EncodedRgb = EncodedRgb::new("rec2100-hlg", "rec2100-linear", D65, hlg::eotf, hlg::oetf)
    .with_ids(&["rec2100-hlg", "--rec2100-hlg"])
    .hdr();

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(space: &dyn Space, coords: [f64; 3]) {
        let back = space.from_base(&space.to_base(&coords));
        for i in 0..3 {
            assert!((back[i] - coords[i]).abs() < 1e-9, "{} channel {i}", space.name());
        }
    }

    #[test]
    fn test_round_trips() {
        let spaces: [&dyn Space; 13] = [
            &SRGB_LINEAR,
            &SRGB,
            &DISPLAY_P3_LINEAR,
            &DISPLAY_P3,
            &REC2020_LINEAR,
            &REC2020,
            &REC709,
            &A98_RGB_LINEAR,
            &A98_RGB,
            &PROPHOTO_RGB_LINEAR,
            &PROPHOTO_RGB,
            &ACESCG,
            &ACES2065_1,
        ];
        for s in spaces {
            round_trip(s, [0.2, 0.5, 0.8]);
            round_trip(s, [-0.1, 1.2, 0.0]);
        }
        // HDR curves are only defined for non-negative light
        for s in [&REC2100_PQ, &REC2100_HLG] {
            round_trip(s, [0.2, 0.5, 0.8]);
            round_trip(s, [0.0, 3.5, 0.01]);
        }
    }

    #[test]
    fn test_aces_log_spaces() {
        // 18% gray decodes from the same code value in both log encodings
        let cc = ACESCC.from_base(&[0.18; 3]);
        let cct = ACESCCT.from_base(&[0.18; 3]);
        assert!((cc[0] - cct[0]).abs() < 1e-12);
        assert!((ACESCC.to_base(&cc)[1] - 0.18).abs() < 1e-12);
        // black sits on the channel floor
        assert!((ACESCCT.from_base(&[0.0; 3])[2] - ACESCCT.channels()[2].low).abs() < 1e-12);
        assert_eq!(ACESCC.rgb().and_then(|r| r.linear()), Some("acescg"));
        assert_eq!(ACESCC.dynamic_range(), DynamicRange::Hdr);
    }

    #[test]
    fn test_pq_white() {
        // reference white sits near 58% signal
        let white = REC2100_PQ.from_base(&[1.0, 1.0, 1.0]);
        assert!((white[0] - 0.5806888810416109).abs() < 1e-9);
    }

    #[test]
    fn test_linear_names() {
        assert_eq!(SRGB.rgb().and_then(|r| r.linear()), Some("srgb-linear"));
        assert_eq!(ACESCG.rgb().and_then(|r| r.linear()), Some("acescg"));
        assert_eq!(PROPHOTO_RGB_LINEAR.base(), "xyz-d50");
        assert_eq!(SRGB.ids(), vec!["srgb"]);
    }

    #[test]
    fn test_derived_matches_builtin() {
        let derived = LinearRgb::from_primaries("x", &[], &tincture_primaries::SRGB).unwrap();
        let a = derived.to_base(&[0.3, 0.6, 0.9]);
        let b = SRGB_LINEAR.to_base(&[0.3, 0.6, 0.9]);
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-10);
        }
    }
}
