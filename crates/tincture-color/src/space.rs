//! The color space abstraction.
//!
//! A [`Space`] declares its channels and exactly two conversions: to its
//! base space and back. Spaces form a tree rooted at [`ROOT`] (absolute
//! XYZ with a D65 white); the conversion graph composes the hops.
//!
//! Generic algorithms never match on concrete space types. They ask for a
//! capability instead ([`Space::cylindrical`], [`Space::rgb`], ...), and a
//! space answers with `Some(self)` for each capability it has.
//!
//! # Implementing a space
//!
//! ```rust
//! use tincture_color::space::{Space, Xy};
//! use tincture_core::Channel;
//!
//! #[derive(Debug)]
//! struct Doubled;
//!
//! const CHANNELS: [Channel; 3] = [
//!     Channel::new("x", 0.0, 2.0),
//!     Channel::new("y", 0.0, 2.0),
//!     Channel::new("z", 0.0, 2.0),
//! ];
//!
//! impl Space for Doubled {
//!     fn name(&self) -> &'static str { "doubled" }
//!     fn base(&self) -> &'static str { "xyz-d65" }
//!     fn channels(&self) -> &[Channel] { &CHANNELS }
//!     fn white(&self) -> Xy { tincture_primaries::D65 }
//!     fn to_base(&self, c: &[f64]) -> Vec<f64> { c.iter().map(|v| v / 2.0).collect() }
//!     fn from_base(&self, c: &[f64]) -> Vec<f64> { c.iter().map(|v| v * 2.0).collect() }
//! }
//! ```

use std::fmt;

use tincture_core::{
    Channel, Cylindrical, DynamicRange, HslIsh, HsvIsh, HwbIsh, LabIsh, LchIsh, RgbIsh,
};

use crate::css::Syntax;

pub use tincture_primaries::Xy;

/// Name of the absolute root every conversion chain passes through.
pub const ROOT: &str = "xyz-d65";

/// A registered color space.
pub trait Space: Send + Sync + fmt::Debug {
    /// Unique registry name.
    fn name(&self) -> &'static str;

    /// Space this one converts to and from directly. The root returns itself.
    fn base(&self) -> &'static str;

    /// Identifiers accepted in `color(<ident> ...)`; the first is used when
    /// serializing. Empty means the space name.
    fn serialize(&self) -> &[&'static str] {
        &[]
    }

    /// Color channels, alpha excluded.
    fn channels(&self) -> &[Channel];

    /// Alternate channel names as `(alias, channel)` pairs.
    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[]
    }

    /// Reference white chromaticity.
    fn white(&self) -> Xy;

    /// Dynamic range the space is designed for.
    fn dynamic_range(&self) -> DynamicRange {
        DynamicRange::Sdr
    }

    /// Space whose gamut bounds this one (HSL is bounded by sRGB).
    fn gamut_check(&self) -> Option<&'static str> {
        None
    }

    /// Space to clip in when it differs from the gamut space.
    fn clip_space(&self) -> Option<&'static str> {
        None
    }

    /// Whether values outside the nominal range are still meaningful.
    fn extended_range(&self) -> bool {
        false
    }

    /// Whether the generic `color()` form parses and serializes this space.
    fn color_format(&self) -> bool {
        true
    }

    /// Converts coordinates (alpha excluded) to the base space.
    fn to_base(&self, coords: &[f64]) -> Vec<f64>;

    /// Converts base-space coordinates to this space.
    fn from_base(&self, coords: &[f64]) -> Vec<f64>;

    /// Canonicalizes redundant representations (negative chroma, powerless hue).
    fn normalize(&self, coords: Vec<f64>) -> Vec<f64> {
        coords
    }

    /// Space-specific achromatic test; `None` defers to XYZ.
    fn is_achromatic(&self, _coords: &[f64]) -> Option<bool> {
        None
    }

    /// Hue and radial channel indexes when the space is polar.
    fn cylindrical(&self) -> Option<&dyn Cylindrical> {
        None
    }

    /// RGB capability.
    fn rgb(&self) -> Option<&dyn RgbIsh> {
        None
    }

    /// Lab capability.
    fn lab(&self) -> Option<&dyn LabIsh> {
        None
    }

    /// LCh capability.
    fn lch(&self) -> Option<&dyn LchIsh> {
        None
    }

    /// HSL capability.
    fn hsl(&self) -> Option<&dyn HslIsh> {
        None
    }

    /// HSV capability.
    fn hsv(&self) -> Option<&dyn HsvIsh> {
        None
    }

    /// HWB capability.
    fn hwb(&self) -> Option<&dyn HwbIsh> {
        None
    }

    /// Space-specific text syntax, tried when matching strings.
    fn syntax(&self) -> Option<&dyn Syntax> {
        None
    }

    // ------------------------------------------------------------------------
    // Provided
    // ------------------------------------------------------------------------

    /// True when the space has a hue channel.
    fn is_polar(&self) -> bool {
        self.cylindrical().is_some()
    }

    /// Serialized identifiers, falling back to the name.
    fn ids(&self) -> Vec<&'static str> {
        let ids = self.serialize();
        if ids.is_empty() { vec![self.name()] } else { ids.to_vec() }
    }

    /// Resolves a channel name, alias, `alpha` or numeric index.
    fn channel_index(&self, name: &str) -> Option<usize> {
        let name = self
            .aliases()
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| *target);
        let channels = self.channels();
        if name == "alpha" {
            return Some(channels.len());
        }
        if let Some(i) = channels.iter().position(|c| c.name == name) {
            return Some(i);
        }
        name.parse::<usize>().ok().filter(|&i| i <= channels.len())
    }

    /// Channel descriptor by index; `channels().len()` is alpha.
    fn channel(&self, index: usize) -> Channel {
        self.channels().get(index).copied().unwrap_or(Channel::alpha())
    }
}

/// Declares a `Cylindrical` capability with fixed indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polar {
    /// Hue channel index.
    pub hue: usize,
    /// Radial channel index.
    pub radial: usize,
}

impl Polar {
    /// `(lightness, chroma, hue)` layout.
    pub const LCH: Self = Self { hue: 2, radial: 1 };
    /// `(hue, saturation, lightness)` layout.
    pub const HSX: Self = Self { hue: 0, radial: 1 };
}

impl Cylindrical for Polar {
    fn hue_index(&self) -> usize {
        self.hue
    }

    fn radial_index(&self) -> usize {
        self.radial
    }
}

impl LchIsh for Polar {}
impl HslIsh for Polar {}
impl HsvIsh for Polar {}
impl HwbIsh for Polar {}

/// Marker for the Lab capability with the default layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangular;

impl LabIsh for Rectangular {}

/// Standard achromatic threshold for a polar space: the radial channel is
/// below `threshold` (undefined counts as zero).
#[inline]
pub fn radial_below(coords: &[f64], radial: usize, threshold: f64) -> bool {
    coords.get(radial).is_none_or(|c| c.is_nan() || c.abs() < threshold)
}
