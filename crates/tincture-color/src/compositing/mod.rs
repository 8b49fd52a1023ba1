//! Compositing and blending.
//!
//! A source color is blended onto one or more backdrops, then alpha
//! composited with a Porter-Duff operator, following the W3C Compositing
//! and Blending Level 1 model.
//!
//! # Porter-Duff Operators
//!
//! `clear`, `copy`, `destination`, `source-over` (default),
//! `destination-over`, `source-in`, `destination-in`, `source-out`,
//! `destination-out`, `source-atop`, `destination-atop`, `xor`, `lighter`.
//!
//! # Blend Modes
//!
//! Separable: `normal` (default), `multiply`, `screen`, `overlay`,
//! `darken`, `lighten`, `color-dodge`, `color-burn`, `hard-light`,
//! `soft-light`, `difference`, `exclusion`.
//! Non-separable: `hue`, `saturation`, `color`, `luminosity`. These only
//! make sense in sRGB, so they always run there.
//!
//! ```rust
//! use tincture_color::Color;
//! use tincture_color::compositing::{BlendMode, ComposeOptions};
//!
//! let red = Color::new("srgb", &[1.0, 0.0, 0.0], 0.5).unwrap();
//! let blue = Color::new("srgb", &[0.0, 0.0, 1.0], 1.0).unwrap();
//! let out = red.compose(&[blue], &ComposeOptions::default()).unwrap();
//! assert_eq!(out.coords(), &[0.5, 0.0, 0.5]);
//! assert_eq!(out.alpha(), 1.0);
//!
//! let opts = ComposeOptions::default().blend(Some(BlendMode::Multiply));
//! let white = Color::new("srgb", &[1.0, 1.0, 1.0], 1.0).unwrap();
//! let gray = Color::new("srgb", &[0.5, 0.5, 0.5], 1.0).unwrap();
//! assert_eq!(gray.compose(&[white], &opts).unwrap().coords(), &[0.5, 0.5, 0.5]);
//! ```

pub mod blend;
pub mod porter_duff;

pub use blend::BlendMode;
pub use porter_duff::Operator;

use tincture_core::{Channel, Error, Result};
use tincture_math::{no_nan, vec3};
use tracing::trace;

use crate::color::Color;

/// Alpha below which the output is treated as fully transparent.
const ALPHA_EPSILON: f64 = 1e-8;

/// Options for [`Color::compose`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    /// Blend mode; `None` skips blending.
    pub blend: Option<BlendMode>,
    /// Compositing operator; `None` skips alpha compositing.
    pub operator: Option<Operator>,
    /// RGB working space, `srgb` when unset.
    pub space: Option<String>,
    /// Output space, the source color's space when unset.
    pub out_space: Option<String>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self { blend: Some(BlendMode::Normal), operator: Some(Operator::SourceOver), space: None, out_space: None }
    }
}

impl ComposeOptions {
    /// Sets the blend mode.
    pub fn blend(mut self, blend: Option<BlendMode>) -> Self {
        self.blend = blend;
        self
    }

    /// Sets the operator.
    pub fn operator(mut self, operator: Option<Operator>) -> Self {
        self.operator = operator;
        self
    }

    /// Sets the working space.
    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    /// Sets the output space.
    pub fn out_space(mut self, space: impl Into<String>) -> Self {
        self.out_space = Some(space.into());
        self
    }
}

/// Clamps bounded channels; unbounded ones pass through.
fn clip_channel(value: f64, channel: &Channel) -> f64 {
    if channel.bound { value.clamp(channel.low, channel.high) } else { value }
}

/// Blends and composites `source` onto `backdrop`, both in the same space.
fn composite(source: &Color, backdrop: &Color, blend: Option<BlendMode>, operator: Option<Operator>) -> Result<Color> {
    let as_ = no_nan(source.alpha());
    let ab = no_nan(backdrop.alpha());
    let cs = vec3(&source.coords_resolved());
    let cb = vec3(&backdrop.coords_resolved());

    // Cs' = (1 - ab) * Cs + ab * B(Cb, Cs)
    let mixed = match blend {
        Some(mode) => {
            let b = mode.blend(cb, cs);
            std::array::from_fn(|i| (1.0 - ab) * cs[i] + ab * b[i])
        }
        None => cs,
    };

    let channels = source.space_def().channels();
    let alpha = operator.map_or(as_, |op| op.alpha(ab, as_));
    let coords: Vec<f64> = (0..3)
        .map(|i| {
            let cr = clip_channel(mixed[i], &channels[i]);
            match operator {
                Some(op) => {
                    let co = op.channel(ab, as_, cb[i], cr);
                    if alpha < ALPHA_EPSILON { 0.0 } else { co / alpha }
                }
                None => cr,
            }
        })
        .collect();
    source.sibling(source.space(), &coords, alpha)
}

impl Color {
    /// Composes this color over `backdrops`.
    ///
    /// The stack is reduced right to left: the last backdrop is the bottom
    /// layer and each earlier one is composited onto the running result
    /// before this color goes on top. With no backdrops the color is
    /// returned (in the output space) unchanged.
    pub fn compose(&self, backdrops: &[Color], options: &ComposeOptions) -> Result<Color> {
        let separable = options.blend.is_none_or(BlendMode::is_separable);
        let space = match options.space.as_deref() {
            Some(space) if separable => space,
            _ => "srgb",
        };
        if self.registry().space(space)?.rgb().is_none() {
            return Err(Error::config(format!("compositing needs an RGB space, '{space}' is not one")));
        }
        let out_space = options.out_space.as_deref().unwrap_or(self.space());
        trace!(space, out_space, layers = backdrops.len(), "compose");

        let Some((bottom, rest)) = backdrops.split_last() else {
            return self.convert(out_space);
        };
        let mut dest = self.adopt(bottom)?.convert(space)?;
        for layer in rest.iter().rev() {
            let src = self.adopt(layer)?.convert(space)?;
            dest = composite(&src, &dest, options.blend, options.operator)?;
        }
        let src = self.convert(space)?;
        composite(&src, &dest, options.blend, options.operator)?.convert(out_space)
    }
}
