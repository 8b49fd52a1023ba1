//! CIE Lab over an XYZ base.
//!
//! `lab` is relative to D50 (the CSS definition); `lab-d65` keeps the D65
//! white and skips adaptation entirely.

use tincture_core::{Channel, FLG_MIRROR_PERCENT, FLG_OPT_PERCENT, LabIsh};
use tincture_math::nth_root;
use tincture_primaries::{D50, D65, xy_to_xyz};

use crate::css::{CssFunction, Syntax};
use crate::space::{ROOT, Rectangular, Space, Xy};

/// `6^3 / 29^3`
pub const EPSILON: f64 = 216.0 / 24389.0;
/// Cube root of [`EPSILON`].
pub const EPSILON3: f64 = 6.0 / 29.0;
/// `29^3 / 3^3`
pub const KAPPA: f64 = 24389.0 / 27.0;
/// `KAPPA * EPSILON`
pub const KE: f64 = 8.0;

/// Chroma below which a Lab color counts as achromatic.
pub const ACHROMATIC_THRESHOLD: f64 = 1e-4;

/// Lab to XYZ relative to `white` (XYZ with `Y = 1`).
pub fn lab_to_xyz(lab: &[f64], white: [f64; 3]) -> Vec<f64> {
    let (l, a, b) = (lab[0], lab[1], lab[2]);
    let fy = (l + 16.0) / 116.0;
    let fx = a / 500.0 + fy;
    let fz = fy - b / 200.0;
    let xyz = [
        if fx > EPSILON3 { fx.powi(3) } else { (116.0 * fx - 16.0) / KAPPA },
        if l > KE { fy.powi(3) } else { l / KAPPA },
        if fz > EPSILON3 { fz.powi(3) } else { (116.0 * fz - 16.0) / KAPPA },
    ];
    xyz.iter().zip(white).map(|(v, w)| v * w).collect()
}

/// XYZ relative to `white` to Lab.
pub fn xyz_to_lab(xyz: &[f64], white: [f64; 3]) -> Vec<f64> {
    let f = |v: f64, w: f64| {
        let i = v / w;
        if i > EPSILON { nth_root(i, 3.0) } else { (KAPPA * i + 16.0) / 116.0 }
    };
    let fx = f(xyz[0], white[0]);
    let fy = f(xyz[1], white[1]);
    let fz = f(xyz[2], white[2]);
    vec![116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// A CIE Lab space.
#[derive(Debug, Clone, Copy)]
pub struct Lab {
    name: &'static str,
    base: &'static str,
    ids: &'static [&'static str],
    white: Xy,
    channels: [Channel; 3],
    syntax: Option<&'static dyn Syntax>,
}

impl Lab {
    /// Lab named `name` relative to the XYZ space `base` with `white`.
    pub const fn new(name: &'static str, base: &'static str, white: Xy, ab: f64) -> Self {
        Self {
            name,
            base,
            ids: &[],
            white,
            channels: [
                Channel::new("l", 0.0, 100.0).flags(FLG_OPT_PERCENT),
                Channel::new("a", -ab, ab).flags(FLG_MIRROR_PERCENT | FLG_OPT_PERCENT),
                Channel::new("b", -ab, ab).flags(FLG_MIRROR_PERCENT | FLG_OPT_PERCENT),
            ],
            syntax: None,
        }
    }

    /// Sets the `color()` identifiers.
    pub const fn with_ids(mut self, ids: &'static [&'static str]) -> Self {
        self.ids = ids;
        self
    }

    const fn with_syntax(mut self, syntax: &'static dyn Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }
}

/// CIE Lab (D50).
pub const LAB: Lab = Lab::new("lab", "xyz-d50", D50, 125.0)
    .with_ids(&["--lab"])
    .with_syntax(&CssFunction::Lab);

/// CIE Lab relative to D65.
pub const LAB_D65: Lab = Lab::new("lab-d65", ROOT, D65, 130.0).with_ids(&["--lab-d65"]);

impl Space for Lab {
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
        &[("lightness", "l")]
    }

    fn white(&self) -> Xy {
        self.white
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        lab_to_xyz(coords, xy_to_xyz(self.white, 1.0))
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_lab(coords, xy_to_xyz(self.white, 1.0))
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].hypot(coords[2]) < ACHROMATIC_THRESHOLD)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }

    fn syntax(&self) -> Option<&dyn Syntax> {
        self.syntax
    }
}
