//! The color value.
//!
//! A [`Color`] is a space, one value per channel and an alpha, bound to the
//! [`Registry`] it was created under. Undefined channels (CSS `none`) are
//! stored as NaN and surface as `None` through [`Color::value`] and
//! [`ColorData`]; every algorithm treats them explicitly.
//!
//! This module holds construction, channel access, conversion and
//! normalization. Gamut handling, interpolation, Delta E and the other
//! operations live in their own modules as further `impl Color` blocks.
//!
//! # Example
//!
//! ```rust
//! use tincture_color::Color;
//!
//! let red = Color::parse("#ff0000").unwrap();
//! let hsl = red.convert("hsl").unwrap();
//! assert_eq!(hsl.space(), "hsl");
//! assert!((hsl.get("lightness").unwrap() - 0.5).abs() < 1e-12);
//!
//! let gray = Color::new("srgb", &[0.5, 0.5, 0.5], 1.0).unwrap();
//! assert!(gray.convert("lch").unwrap().is_undefined("hue").unwrap());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use tincture_core::{Error, Result};
use tincture_math::no_nan;
use tincture_primaries::D65;
use tracing::debug;

use crate::css::serialize::{self, fmt_float};
use crate::css::{ToStringOptions, parse};
use crate::data::ColorData;
use crate::registry::Registry;
use crate::space::{ROOT, Space, Xy};

/// Precision of the debug representation.
const REPR_PRECISION: i32 = 5;

/// A color in a registered space.
#[derive(Clone)]
pub struct Color {
    registry: Arc<Registry>,
    space: Arc<dyn Space>,
    coords: Vec<f64>,
    alpha: f64,
}

/// A color found inside a larger string.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMatch {
    /// The parsed color.
    pub color: Color,
    /// Byte offset where the match starts.
    pub start: usize,
    /// Byte offset just past the match.
    pub end: usize,
}

fn same(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// ============================================================================
// Construction
// ============================================================================

impl Color {
    /// Creates a color in `space` under the global registry.
    ///
    /// Missing trailing channels are undefined; each value is clamped to
    /// its channel limit and alpha to `[0, 1]`.
    pub fn new(space: &str, coords: &[f64], alpha: f64) -> Result<Self> {
        Self::new_in(Registry::global(), space, coords, alpha)
    }

    /// Creates a color in `space` under `registry`.
    pub fn new_in(registry: &Arc<Registry>, space: &str, coords: &[f64], alpha: f64) -> Result<Self> {
        let space = registry.space(space)?.clone();
        Ok(Self::build(registry.clone(), space, coords, alpha))
    }

    pub(crate) fn build(registry: Arc<Registry>, space: Arc<dyn Space>, coords: &[f64], alpha: f64) -> Self {
        let channels = space.channels();
        let coords = channels
            .iter()
            .enumerate()
            .map(|(i, ch)| ch.clamp(coords.get(i).copied().unwrap_or(f64::NAN)))
            .collect();
        let alpha = space.channel(channels.len()).clamp(alpha);
        Self { registry, space, coords, alpha }
    }

    /// A new color in `space` sharing this color's registry.
    pub fn sibling(&self, space: &str, coords: &[f64], alpha: f64) -> Result<Self> {
        Self::new_in(&self.registry, space, coords, alpha)
    }

    /// Parses a CSS-like color string under the global registry.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_in(Registry::global(), text)
    }

    /// Parses a color string under `registry`; the whole string must match.
    pub fn parse_in(registry: &Arc<Registry>, text: &str) -> Result<Self> {
        match Self::find_in(registry, text, 0, true) {
            Some(m) => Ok(m.color),
            None => {
                debug!(text, "no registered space matched");
                Err(Error::Parse(text.to_string()))
            }
        }
    }

    /// Finds a color starting at byte `start` of `text` (global registry).
    pub fn find(text: &str, start: usize) -> Option<ColorMatch> {
        Self::find_in(Registry::global(), text, start, false)
    }

    /// Finds a color starting at byte `start`.
    ///
    /// A `color(` prefix is offered to every space that accepts the generic
    /// form; anything else to each space's own syntax in registration order.
    /// The first match wins. With `fullmatch` the color must end the string.
    pub fn find_in(registry: &Arc<Registry>, text: &str, start: usize, fullmatch: bool) -> Option<ColorMatch> {
        let head = text.get(start..)?;
        let generic = head.get(..6).is_some_and(|h| h.eq_ignore_ascii_case("color("));

        let found = if generic {
            registry.spaces().filter(|s| s.color_format()).find_map(|space| {
                parse::parse_css(space.as_ref(), text, start, fullmatch, true).map(|m| (space, m))
            })
        } else {
            None
        };
        let (space, m) = found.or_else(|| {
            registry.spaces().find_map(|space| {
                let syntax = space.syntax()?;
                syntax.match_color(space.as_ref(), text, start, fullmatch).map(|m| (space, m))
            })
        })?;

        Some(ColorMatch {
            color: Self::build(registry.clone(), space.clone(), &m.coords, m.alpha),
            start,
            end: m.end,
        })
    }

    /// Builds a color from its plain key-value form (global registry).
    pub fn from_data(data: &ColorData) -> Result<Self> {
        Self::from_data_in(Registry::global(), data)
    }

    /// Builds a color from its plain key-value form.
    pub fn from_data_in(registry: &Arc<Registry>, data: &ColorData) -> Result<Self> {
        let coords: Vec<f64> = data.coords.iter().map(|c| c.unwrap_or(f64::NAN)).collect();
        Self::new_in(registry, &data.space, &coords, data.alpha.unwrap_or(f64::NAN))
    }

    /// The plain key-value form; undefined values become `None`.
    pub fn to_data(&self) -> ColorData {
        ColorData {
            space: self.space().to_string(),
            coords: self.coords.iter().map(|&c| (!c.is_nan()).then_some(c)).collect(),
            alpha: (!self.alpha.is_nan()).then_some(self.alpha),
        }
    }

    /// The same color reinterpreted under another registry.
    ///
    /// Fails if the space is not registered there.
    pub fn with_registry(&self, registry: &Arc<Registry>) -> Result<Self> {
        Self::new_in(registry, self.space(), &self.coords, self.alpha)
    }

    /// `other` under this color's registry.
    pub(crate) fn adopt(&self, other: &Color) -> Result<Color> {
        if Arc::ptr_eq(&self.registry, &other.registry) {
            Ok(other.clone())
        } else {
            other.with_registry(&self.registry)
        }
    }

    /// A uniformly random color in `space`.
    ///
    /// Each channel is drawn from its nominal range unless `limits` gives a
    /// `(low, high)` override at that index. Polar results are normalized.
    pub fn random<R: Rng + ?Sized>(space: &str, limits: &[Option<(f64, f64)>], rng: &mut R) -> Result<Self> {
        Self::random_in(Registry::global(), space, limits, rng)
    }

    /// [`Color::random`] under `registry`.
    pub fn random_in<R: Rng + ?Sized>(
        registry: &Arc<Registry>,
        space: &str,
        limits: &[Option<(f64, f64)>],
        rng: &mut R,
    ) -> Result<Self> {
        let def = registry.space(space)?.clone();
        let coords: Vec<f64> = def
            .channels()
            .iter()
            .enumerate()
            .map(|(i, ch)| {
                let (lo, hi) = limits.get(i).copied().flatten().unwrap_or((ch.low, ch.high));
                lo + (hi - lo) * rng.r#gen::<f64>()
            })
            .collect();
        let mut color = Self::build(registry.clone(), def, &coords, 1.0);
        if color.space.is_polar() {
            color.normalize(true)?;
        }
        Ok(color)
    }
}

// ============================================================================
// Access
// ============================================================================

impl Color {
    /// Registry this color was created under.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Space name.
    pub fn space(&self) -> &'static str {
        self.space.name()
    }

    /// Space definition.
    pub fn space_def(&self) -> &Arc<dyn Space> {
        &self.space
    }

    /// Channel values (alpha excluded); undefined values are NaN.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Mutable channel values.
    pub fn coords_mut(&mut self) -> &mut [f64] {
        &mut self.coords
    }

    /// Channel values with undefined resolved to zero.
    pub fn coords_resolved(&self) -> Vec<f64> {
        self.coords.iter().map(|&c| no_nan(c)).collect()
    }

    /// Alpha; NaN when undefined.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Alpha with undefined resolved to zero.
    pub fn alpha_resolved(&self) -> f64 {
        no_nan(self.alpha)
    }

    /// Sets alpha (clamped to `[0, 1]`, NaN kept).
    pub fn set_alpha(&mut self, alpha: f64) -> &mut Self {
        self.alpha = self.space.channel(self.coords.len()).clamp(alpha);
        self
    }

    /// Channel `index` (alpha at `coords().len()`), `None` when undefined.
    pub fn value(&self, index: usize) -> Option<f64> {
        let v = self.raw(index);
        (!v.is_nan()).then_some(v)
    }

    /// Reference white of the space.
    pub fn white(&self) -> Xy {
        self.space.white()
    }

    pub(crate) fn raw(&self, index: usize) -> f64 {
        self.coords.get(index).copied().unwrap_or(self.alpha)
    }

    pub(crate) fn set_raw(&mut self, index: usize, value: f64) {
        match self.coords.get_mut(index) {
            Some(c) => *c = value,
            None => self.alpha = value,
        }
    }

    /// Hue channel index when the space is polar.
    pub(crate) fn hue_index(&self) -> Option<usize> {
        self.space.cylindrical().map(|c| c.hue_index())
    }

    fn index(&self, name: &str) -> Result<usize> {
        self.space
            .channel_index(name)
            .ok_or_else(|| Error::config(format!("'{name}' is not a channel of '{}'", self.space())))
    }

    /// Reads a channel by name, alias, `alpha` or `space.channel`.
    ///
    /// The dotted form reads the channel after converting to that space.
    pub fn get(&self, name: &str) -> Result<f64> {
        if let Some((space, channel)) = name.split_once('.') {
            if space != self.space() {
                return self.convert(space)?.get(channel);
            }
            return self.get(channel);
        }
        Ok(self.raw(self.index(name)?))
    }

    /// Writes a channel by name, alias, `alpha` or `space.channel`.
    ///
    /// The value is clamped to the channel's hard limit (alpha to `[0, 1]`);
    /// undefined values are stored as is. The dotted form converts to that
    /// space, writes, and converts back.
    pub fn set(&mut self, name: &str, value: f64) -> Result<&mut Self> {
        if let Some((space, channel)) = name.split_once('.') {
            if space != self.space() {
                let mut other = self.convert(space)?;
                other.set(channel, value)?;
                return self.update(&other);
            }
            return self.set(channel, value);
        }
        let i = self.index(name)?;
        let value = self.space.channel(i).clamp(value);
        self.set_raw(i, value);
        Ok(self)
    }

    /// Writes a channel computed from its current value.
    pub fn set_with(&mut self, name: &str, f: impl FnOnce(f64) -> f64) -> Result<&mut Self> {
        let value = f(self.get(name)?);
        self.set(name, value)
    }

    /// True if the channel is undefined.
    pub fn is_undefined(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.is_nan())
    }

    /// Copy with the named channels (or every other channel) undefined.
    pub fn mask(&self, channels: &[&str], invert: bool) -> Result<Color> {
        let masked = channels.iter().map(|c| self.index(c)).collect::<Result<Vec<_>>>()?;
        let mut out = self.clone();
        for i in 0..=self.coords.len() {
            if masked.contains(&i) != invert {
                out.set_raw(i, f64::NAN);
            }
        }
        Ok(out)
    }

    /// Replaces space and values with `other`'s.
    pub fn mutate(&mut self, other: &Color) -> Result<&mut Self> {
        let other = self.adopt(other)?;
        self.space = other.space;
        self.coords = other.coords;
        self.alpha = other.alpha;
        Ok(self)
    }

    /// Takes `other`'s color while keeping this color's space.
    pub fn update(&mut self, other: &Color) -> Result<&mut Self> {
        let space = self.space();
        self.mutate(other)?;
        if self.space() != space {
            self.convert_in_place(space)?;
        }
        Ok(self)
    }
}

// ============================================================================
// Conversion
// ============================================================================

impl Color {
    /// Converts to `space`; a polar result that is achromatic gets an
    /// undefined hue.
    pub fn convert(&self, space: &str) -> Result<Color> {
        self.convert_norm(space, true)
    }

    /// Converts to `space`, gamut fitting with `method` (default when
    /// `None`) if the result would be out of gamut.
    pub fn convert_fit(&self, space: &str, method: Option<&str>) -> Result<Color> {
        let mut out = self.convert(space)?;
        if !self.in_gamut_tol(Some(space), 0.0)? {
            out.fit(None, method)?;
        }
        Ok(out)
    }

    /// Converts in place.
    pub fn convert_in_place(&mut self, space: &str) -> Result<&mut Self> {
        *self = self.convert(space)?;
        Ok(self)
    }

    /// Converts, optionally leaving an achromatic hue as computed.
    pub(crate) fn convert_norm(&self, space: &str, norm: bool) -> Result<Color> {
        if self.space() == space {
            return Ok(self.clone());
        }
        let (target, coords) = self.registry.convert_coords(&self.space, &self.coords_resolved(), space)?;
        let mut out = Color { registry: self.registry.clone(), space: target, coords, alpha: self.alpha };
        if norm {
            if let Some(h) = out.hue_index() {
                if out.is_achromatic()? {
                    out.coords[h] = f64::NAN;
                }
            }
        }
        Ok(out)
    }

    /// True if the color is a shade of gray.
    ///
    /// The space answers when it can; otherwise the test runs in XYZ.
    pub fn is_achromatic(&self) -> Result<bool> {
        if let Some(v) = self.space.is_achromatic(&self.coords_resolved()) {
            return Ok(v);
        }
        let xyz = self.convert_norm(ROOT, false)?;
        Ok(xyz.space.is_achromatic(&xyz.coords).unwrap_or(false))
    }

    /// Canonicalizes the values.
    ///
    /// With `nans`, an achromatic polar color gets an undefined hue.
    /// Undefined alpha resolves to zero.
    pub fn normalize(&mut self, nans: bool) -> Result<&mut Self> {
        self.coords = self.space.normalize(self.coords_resolved());
        if nans {
            if let Some(h) = self.hue_index() {
                if self.is_achromatic()? {
                    self.coords[h] = f64::NAN;
                }
            }
        }
        self.alpha = no_nan(self.alpha);
        Ok(self)
    }

    /// Relative luminance: Y of XYZ adapted to `white` (D65 when `None`).
    pub fn luminance(&self, white: Option<Xy>) -> Result<f64> {
        let xyz = self.convert(ROOT)?.coords_resolved();
        let white = white.unwrap_or(D65);
        if white == D65 {
            return Ok(xyz[1]);
        }
        Ok(self.registry.chromatic_adaptation(D65, white, &xyz, None)?[1])
    }

    /// Serializes with the space's text syntax, or `color()` when it has none.
    pub fn to_css(&self, options: &ToStringOptions) -> Result<String> {
        match self.space.syntax() {
            Some(syntax) => syntax.to_css(self, options),
            None => serialize::color_function(self, None, options, false, 1.0),
        }
    }

    /// `color(<id> c1 c2 c3 / a)` with undefined values shown as zero.
    pub fn repr(&self) -> String {
        let values: Vec<String> =
            self.coords_resolved().into_iter().map(|c| fmt_float(c, REPR_PRECISION, 0.0, 0.0)).collect();
        format!(
            "color({} {} / {})",
            self.space.ids()[0],
            values.join(" "),
            fmt_float(self.alpha_resolved(), REPR_PRECISION, 0.0, 0.0)
        )
    }
}

impl PartialEq for Color {
    /// Same space and equal values, with undefined equal to undefined.
    fn eq(&self, other: &Self) -> bool {
        self.space() == other.space()
            && same(self.alpha, other.alpha)
            && self.coords.len() == other.coords.len()
            && self.coords.iter().zip(&other.coords).all(|(a, b)| same(*a, *b))
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_css(&ToStringOptions::default()) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str(&self.repr()),
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tincture_core::ErrorKind;

    use super::*;

    #[test]
    fn test_new_pads_and_clamps() {
        let c = Color::new("srgb", &[1.0], 2.0).unwrap();
        assert_eq!(c.coords()[0], 1.0);
        assert!(c.coords()[1].is_nan() && c.coords()[2].is_nan());
        assert_eq!(c.alpha(), 1.0);
        assert!(Color::new("nope", &[], 1.0).is_err());
    }

    #[test]
    fn test_parse_hex() {
        let c = Color::parse("#ff0000").unwrap();
        assert_eq!(c.space(), "srgb");
        assert_eq!(c.coords(), &[1.0, 0.0, 0.0]);
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn test_parse_failure_kind() {
        let err = Color::parse("not a color").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.to_string(), "'not a color' is not a recognized color");
        assert!(Color::parse("#ff0000 trailing").is_err());
    }

    #[test]
    fn test_parse_generic_form() {
        let c = Color::parse("color(display-p3 1 0.5 0 / 0.25)").unwrap();
        assert_eq!(c.space(), "display-p3");
        assert_eq!(c.coords(), &[1.0, 0.5, 0.0]);
        assert_eq!(c.alpha(), 0.25);
    }

    #[test]
    fn test_find_partial() {
        let m = Color::find("fill: red;", 6).unwrap();
        assert_eq!(m.color.coords(), &[1.0, 0.0, 0.0]);
        assert_eq!((m.start, m.end), (6, 9));
    }

    #[test]
    fn test_get_set_dotted() {
        let mut c = Color::parse("#ff0000").unwrap();
        assert_abs_diff_eq!(c.get("hsl.lightness").unwrap(), 0.5, epsilon = 1e-12);
        c.set("hsl.lightness", 0.25).unwrap();
        assert_eq!(c.space(), "srgb");
        assert_abs_diff_eq!(c.coords()[0], 0.5, epsilon = 1e-9);
        c.set_with("alpha", |a| a / 2.0).unwrap();
        assert_eq!(c.alpha(), 0.5);
        assert!(c.get("bogus").is_err());
    }

    #[test]
    fn test_set_clamps_to_limit() {
        let mut c = Color::new("oklch", &[0.5, 0.1, 40.0], 1.0).unwrap();
        c.set("alpha", 3.0).unwrap();
        assert_eq!(c.alpha(), 1.0);
        c.set_with("alpha", |a| a - 2.0).unwrap();
        assert_eq!(c.alpha(), 0.0);
        c.set("chroma", -0.2).unwrap();
        assert_eq!(c.get("chroma").unwrap(), 0.0);
        // Only hard limits apply; the nominal range does not.
        c.set("l", 1.5).unwrap();
        assert_eq!(c.get("l").unwrap(), 1.5);
        c.set("alpha", f64::NAN).unwrap();
        assert!(c.alpha().is_nan());
    }

    #[test]
    fn test_convert_round_trip() {
        let c = Color::new("srgb", &[0.2, 0.4, 0.6], 1.0).unwrap();
        for space in ["lab", "oklch", "display-p3", "hwb", "jzczhz", "ictcp", "xyz-d50", "cam16-ucs", "hct"] {
            let back = c.convert(space).unwrap().convert("srgb").unwrap();
            for i in 0..3 {
                assert_abs_diff_eq!(back.coords()[i], c.coords()[i], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_convert_same_space_is_clone() {
        let c = Color::new("srgb", &[0.2, f64::NAN, 0.6], 1.0).unwrap();
        assert_eq!(c.convert("srgb").unwrap(), c);
    }

    #[test]
    fn test_achromatic_hue_undefined() {
        let c = Color::new("srgb", &[0.5, 0.5, 0.5], 1.0).unwrap();
        let lch = c.convert("lch").unwrap();
        assert!(lch.coords()[2].is_nan());
        assert!(lch.is_achromatic().unwrap());
        let raw = c.convert_norm("lch", false).unwrap();
        assert!(!raw.coords()[2].is_nan());
    }

    #[test]
    fn test_equality_nan_aware() {
        let a = Color::new("srgb", &[0.1, f64::NAN, 0.3], 1.0).unwrap();
        let b = Color::new("srgb", &[0.1, f64::NAN, 0.3], 1.0).unwrap();
        assert_eq!(a, b);
        let c = Color::new("display-p3", &[0.1, f64::NAN, 0.3], 1.0).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_mask() {
        let c = Color::parse("#ff0000").unwrap();
        let m = c.mask(&["red", "alpha"], false).unwrap();
        assert!(m.coords()[0].is_nan() && m.alpha().is_nan());
        let inv = c.mask(&["red"], true).unwrap();
        assert_eq!(inv.coords()[0], 1.0);
        assert!(inv.coords()[1].is_nan() && inv.alpha().is_nan());
    }

    #[test]
    fn test_update_keeps_space() {
        let mut c = Color::parse("#ff0000").unwrap();
        let other = Color::new("lab", &[50.0, 0.0, 0.0], 1.0).unwrap();
        c.update(&other).unwrap();
        assert_eq!(c.space(), "srgb");
        c.mutate(&other).unwrap();
        assert_eq!(c.space(), "lab");
    }

    #[test]
    fn test_normalize() {
        let mut c = Color::new("hsl", &[f64::NAN, 0.0, 0.5], f64::NAN).unwrap();
        c.normalize(true).unwrap();
        assert!(c.coords()[0].is_nan());
        assert_eq!(c.alpha(), 0.0);
    }

    #[test]
    fn test_data_round_trip() {
        let c = Color::new("lch", &[50.0, 0.0, f64::NAN], 0.5).unwrap();
        let data = c.to_data();
        assert_eq!(data.coords, vec![Some(50.0), Some(0.0), None]);
        let json = serde_json::to_string(&data).unwrap();
        let back = Color::from_data(&serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_random_within_limits() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let c = Color::random("srgb", &[None, Some((0.25, 0.5))], &mut rng).unwrap();
            assert!((0.0..=1.0).contains(&c.coords()[0]));
            assert!((0.25..=0.5).contains(&c.coords()[1]));
        }
    }

    #[test]
    fn test_luminance() {
        let white = Color::parse("white").unwrap();
        assert_abs_diff_eq!(white.luminance(None).unwrap(), 1.0, epsilon = 1e-9);
        let black = Color::parse("black").unwrap();
        assert_abs_diff_eq!(black.luminance(None).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_repr_and_display() {
        let c = Color::parse("rgb(255 0 0 / 50%)").unwrap();
        assert_eq!(format!("{c:?}"), "color(srgb 1 0 0 / 0.5)");
        assert_eq!(c.to_string(), "rgb(255 0 0 / 0.5)");
    }
}
