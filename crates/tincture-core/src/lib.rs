//! # tincture-core
//!
//! Core types shared by every tincture crate.
//!
//! - [`Error`] / [`Result`] - the error taxonomy (configuration, parse, shape)
//! - [`Channel`] - the static descriptor of one color-space axis
//! - [`Cylindrical`], [`RgbIsh`], [`LabIsh`], [`LchIsh`], [`HslIsh`], [`HsvIsh`], [`HwbIsh`] -
//!   orthogonal capability traits a color space opts into
//! - [`DynamicRange`] - the `sdr`/`hdr` tag of a space
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. All other tincture crates depend on it:
//!
//! ```text
//! tincture-core (this crate)
//!    ^
//!    |
//!    +-- tincture-math (algebra, splines, adaptation matrices)
//!    +-- tincture-transfer (transfer curves)
//!    +-- tincture-primaries (white points, primaries)
//!    +-- tincture-color (spaces, registry, Color and the algorithms over it)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod capability;
pub mod channel;
pub mod error;

pub use capability::*;
pub use channel::*;
pub use error::*;

/// Prelude module for convenient imports.
///
/// ```
/// use tincture_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::capability::{
        Cylindrical, DynamicRange, HslIsh, HsvIsh, HwbIsh, LabIsh, LchIsh, RgbIsh,
    };
    pub use crate::channel::{Channel, FLG_ANGLE, FLG_MIRROR_PERCENT, FLG_OPT_PERCENT, FLG_PERCENT};
    pub use crate::error::{Error, ErrorKind, Result};
}
