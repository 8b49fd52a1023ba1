//! # tincture-color
//!
//! Color spaces and the algorithms that work across them.
//!
//! - **Spaces** - RGB families (sRGB, Display P3, Rec.2020, Rec.709, A98,
//!   ProPhoto, ACES with ACEScc/ACEScct, Rec.2100 PQ/HLG), HSL/HSV/HWB,
//!   Okhsl/Okhsv, HSLuv/HPLuv, CIE Lab/Luv and their LCh forms, xyY,
//!   Oklab/OkLCh, DIN99o, Hunter Lab, Jzazbz, ICtCp, IPT, XYB, CMY/CMYK and
//!   the appearance models (CAM16, CAM02, Hellwig, ZCAM, HCT, sCAM)
//! - **Conversion** - a tree of spaces rooted at XYZ D65 with cached
//!   conversion chains and chromatic adaptation between white points
//! - **Gamut mapping** - clipping, chroma reduction (including the CSS
//!   Color 4 search) and ray tracing
//! - **Interpolation** - piecewise linear, splines and Bezier, with easing,
//!   hue policies and premultiplied alpha
//! - **Color difference** - Delta E 76, 94, CMC, 2000, HyAB, ITP, Jz, CAM,
//!   DIN99o and Oklab metrics
//! - **Everything else** - compositing, contrast, filters, harmonies,
//!   averaging, correlated color temperature and CSS parsing/serialization
//!
//! # Architecture
//!
//! ```text
//!                  tincture-color
//!                        |
//!     +------------------+------------------+
//!     |                  |                  |
//! tincture-transfer  tincture-primaries  tincture-math
//!     |                  |                  |
//!     +------------------+------------------+
//!                        |
//!                  tincture-core
//! ```
//!
//! Every plugin (space, metric, fit method, adaptation, contrast, filter,
//! interpolator, CCT method) lives in a [`Registry`]. Colors hold the
//! registry they were made with, so derived profiles never leak into each
//! other.
//!
//! # Quick Start
//!
//! ```rust
//! use tincture_color::Color;
//! use tincture_color::css::ToStringOptions;
//!
//! let c = Color::parse("color(display-p3 1 0 0)").unwrap();
//! let mut srgb = c.convert("srgb").unwrap();
//! assert!(!srgb.in_gamut(None).unwrap());
//!
//! srgb.fit(None, None).unwrap();
//! assert!(srgb.in_gamut(None).unwrap());
//! let css = srgb.to_css(&ToStringOptions::default()).unwrap();
//! assert!(css.starts_with("rgb("));
//! ```
//!
//! # Dependencies
//!
//! - [`tincture-core`] - errors, channel descriptors, capability traits
//! - [`tincture-math`] - matrices, splines, scalar helpers
//! - [`tincture-transfer`] - transfer curves
//! - [`tincture-primaries`] - white points, primaries and chromaticities
//! - [`rayon`] - parallel batch conversion
//! - [`regex`] - CSS color syntax (`css::parse`) and subtitle colors
//! - [`serde`] - [`ColorData`] and [`registry::Defaults`]
//! - [`tracing`] - structured diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod average;
pub mod batch;
pub mod cat;
pub mod chromaticity;
pub mod color;
pub mod compositing;
pub mod contrast;
pub mod convert;
pub mod css;
pub mod data;
pub mod distance;
pub mod filters;
pub mod gamut;
pub mod harmonies;
pub mod interpolate;
pub mod registry;
pub mod space;
pub mod spaces;
pub mod temperature;

pub use color::{Color, ColorMatch};
pub use data::ColorData;
pub use registry::{Defaults, Plugin, Registry};
pub use space::Space;
pub use tincture_core::{Error, ErrorKind, Result};

/// Prelude module for convenient imports.
///
/// ```
/// use tincture_color::prelude::*;
///
/// let c = Color::parse("rebeccapurple").unwrap();
/// let mix = c.mix(&Color::parse("white").unwrap(), 0.5, &InterpolateOptions::new()).unwrap();
/// assert_eq!(mix.space(), "srgb");
/// ```
pub mod prelude {
    pub use crate::average::AverageOptions;
    pub use crate::chromaticity::Chromaticity;
    pub use crate::color::Color;
    pub use crate::compositing::{BlendMode, ComposeOptions, Operator};
    pub use crate::css::ToStringOptions;
    pub use crate::data::ColorData;
    pub use crate::harmonies::Harmony;
    pub use crate::interpolate::{Easing, Hue, InterpolateOptions, Stop};
    pub use crate::registry::{Plugin, Registry};
    pub use crate::space::Space;
    pub use tincture_core::{Error, ErrorKind, Result};
}
