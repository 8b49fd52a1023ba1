//! Generic polar form of a Lab-like space.
//!
//! One struct covers `lch`, `lch-d65`, `lchuv`, `lch99o`, `oklch` and
//! `jzczhz`: all of them take `(l, a, b)` from their base and express the
//! opponent pair as chroma and hue. Only names, ranges and the achromatic threshold differ.

use tincture_core::{Channel, Cylindrical, DynamicRange, FLG_OPT_PERCENT, LchIsh};
use tincture_math::{constrain_hue, polar_to_rect, rect_to_polar};
use tincture_primaries::{D50, D65};

use crate::css::{CssFunction, Syntax};
use crate::space::{Polar, Space, Xy};

/// `(l, a, b)` to `(l, c, h)`, hue undefined below `threshold`.
pub fn lab_to_lch(lab: &[f64], threshold: f64) -> Vec<f64> {
    let (c, h) = rect_to_polar(lab[1], lab[2]);
    let h = if c < threshold { f64::NAN } else { constrain_hue(h) };
    vec![lab[0], c, h]
}

/// `(l, c, h)` to `(l, a, b)`. An undefined hue contributes no chroma.
pub fn lch_to_lab(lch: &[f64]) -> Vec<f64> {
    let h = if lch[2].is_nan() { 0.0 } else { lch[2] };
    let (a, b) = polar_to_rect(lch[1], h);
    vec![lch[0], a, b]
}

/// Cylindrical Lab-like space.
#[derive(Debug, Clone, Copy)]
pub struct Lch {
    name: &'static str,
    base: &'static str,
    ids: &'static [&'static str],
    white: Xy,
    channels: [Channel; 3],
    aliases: &'static [(&'static str, &'static str)],
    threshold: f64,
    range: DynamicRange,
    syntax: Option<&'static dyn Syntax>,
}

const LCH_ALIASES: &[(&str, &str)] = &[("lightness", "l"), ("chroma", "c"), ("hue", "h")];

impl Lch {
    /// Polar space `name` over `base` with a lightness range of `0..=l_max`
    /// and nominal chroma up to `c_max`.
    pub const fn new(name: &'static str, base: &'static str, white: Xy, l_max: f64, c_max: f64) -> Self {
        Self {
            name,
            base,
            ids: &[],
            white,
            channels: [
                Channel::new("l", 0.0, l_max).flags(FLG_OPT_PERCENT),
                Channel::new("c", 0.0, c_max).limit(Some(0.0), None).flags(FLG_OPT_PERCENT),
                Channel::angle("h"),
            ],
            aliases: LCH_ALIASES,
            threshold: 1e-4,
            range: DynamicRange::Sdr,
            syntax: None,
        }
    }

    /// Sets the `color()` identifiers.
    pub const fn with_ids(mut self, ids: &'static [&'static str]) -> Self {
        self.ids = ids;
        self
    }

    /// Chroma below which hue is powerless.
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replaces channels and aliases for spaces with their own naming.
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

    const fn with_syntax(mut self, syntax: &'static dyn Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    /// Achromatic threshold on chroma.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// CIE LCh (D50).
pub const LCH: Lch = Lch::new("lch", "lab", D50, 100.0, 150.0)
    .with_ids(&["--lch"])
    .with_syntax(&CssFunction::Lch);

/// CIE LCh relative to D65.
pub const LCH_D65: Lch = Lch::new("lch-d65", "lab-d65", D65, 100.0, 160.0).with_ids(&["--lch-d65"]);

/// Polar CIE Luv (D50).
pub const LCHUV: Lch = Lch::new("lchuv", "luv", D50, 100.0, 220.0).with_ids(&["--lchuv"]);

/// Polar CIE Luv relative to D65.
pub const LCHUV_D65: Lch = Lch::new("lchuv-d65", "luv-d65", D65, 100.0, 220.0).with_ids(&["--lchuv-d65"]);

/// Polar DIN99o.
pub const LCH99O: Lch = Lch::new("lch99o", "din99o", D65, 100.0, 60.0).with_ids(&["--lch99o"]);

/// Polar Oklab.
pub const OKLCH: Lch = Lch::new("oklch", "oklab", D65, 1.0, 0.4)
    .with_ids(&["--oklch"])
    .with_threshold(0.000002)
    .with_syntax(&CssFunction::Oklch);

/// Polar Jzazbz.
pub const JZCZHZ: Lch = Lch::new("jzczhz", "jzazbz", D65, 1.0, 0.5)
    .with_ids(&["--jzczhz"])
    .with_threshold(0.0003)
    .with_channels(
        [
            Channel::new("jz", 0.0, 1.0),
            Channel::new("cz", 0.0, 0.5).limit(Some(0.0), None),
            Channel::angle("hz"),
        ],
        &[("lightness", "jz"), ("chroma", "cz"), ("hue", "hz")],
    )
    .hdr();

impl Space for Lch {
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
        self.aliases
    }

    fn white(&self) -> Xy {
        self.white
    }

    fn dynamic_range(&self) -> DynamicRange {
        self.range
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        lch_to_lab(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        lab_to_lch(coords, self.threshold)
    }

    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        let mut c: Vec<f64> = coords.into_iter().map(|v| if v.is_nan() { 0.0 } else { v }).collect();
        if c[1] < 0.0 {
            c[1] = -c[1];
            c[2] += 180.0;
        }
        c[2] = constrain_hue(c[2]);
        if c[1] < self.threshold {
            c[2] = f64::NAN;
        }
        c
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].is_nan() || coords[1] < self.threshold)
    }

    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        Some(&Polar::LCH)
    }

    fn lch(&self) -> Option<&dyn LchIsh> {
        Some(&Polar::LCH)
    }

    fn syntax(&self) -> Option<&dyn Syntax> {
        self.syntax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_round_trip() {
        let lab = [50.0, 30.0, -40.0];
        let lch = LCH.from_base(&lab);
        assert!((lch[1] - 50.0).abs() < 1e-12);
        let back = LCH.to_base(&lch);
        for i in 0..3 {
            assert!((back[i] - lab[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hue_undefined_below_threshold() {
        assert!(OKLCH.from_base(&[0.5, 1e-7, 1e-7])[2].is_nan());
        assert!(!LCH.from_base(&[50.0, 1e-3, 0.0])[2].is_nan());
        assert!(JZCZHZ.from_base(&[0.1, 1e-4, 0.0])[2].is_nan());
    }

    #[test]
    fn test_normalize_negative_chroma() {
        let n = LCH.normalize(vec![50.0, -20.0, 30.0]);
        assert_eq!(n[1], 20.0);
        assert_eq!(n[2], 210.0);
        let n = OKLCH.normalize(vec![0.5, 0.0, 120.0]);
        assert!(n[2].is_nan());
    }

    #[test]
    fn test_undefined_hue_converts_as_zero() {
        assert_eq!(lch_to_lab(&[50.0, 0.0, f64::NAN]), vec![50.0, 0.0, 0.0]);
    }

    #[test]
    fn test_jzczhz_channels() {
        assert_eq!(JZCZHZ.channel_index("hue"), Some(2));
        assert_eq!(JZCZHZ.dynamic_range(), DynamicRange::Hdr);
    }
}
