//! # tincture-transfer
//!
//! Transfer curves between linear light and encoded values.
//!
//! - **EOTF** direction (`eotf`): encoded -> linear
//! - **OETF** direction (`oetf`): linear -> encoded
//!
//! Every SDR curve here mirrors itself on the negative axis, so extended
//! range values (negative or above 1) survive a round trip unchanged. That
//! matters for a color engine: out-of-gamut colors pass through these
//! curves all the time before they are fitted.
//!
//! | Module | Space | Notes |
//! |--------|-------|-------|
//! | [`srgb`] | sRGB, Display P3 | piecewise, ~gamma 2.2 |
//! | [`rec2020`] | Rec.2020 | BT.2020 12-bit constants |
//! | [`rec709`] | Rec.709 | same shape, 10-bit constants |
//! | [`gamma`] | A98 RGB, ProPhoto RGB | pure power, power with toe |
//! | [`pq`] | Rec.2100 PQ, Jzazbz, ICtCp | SMPTE ST 2084, absolute nits |
//! | [`hlg`] | Rec.2100 HLG | BT.2100 with black level lift |
//! | [`acescc`], [`acescct`] | ACEScc, ACEScct | log2 grading curves over ACEScg |
//!
//! # Usage
//!
//! ```rust
//! use tincture_transfer::{pq, srgb};
//!
//! let linear = srgb::eotf(0.5);
//! assert!((srgb::oetf(linear) - 0.5).abs() < 1e-12);
//!
//! // PQ works in absolute luminance
//! let signal = pq::oetf(203.0);
//! assert!((pq::eotf(signal) - 203.0).abs() < 1e-9);
//! ```
//!
//! # Dependencies
//!
//! - `tincture-math` - sign-preserving powers
//!
//! # Used By
//!
//! - `tincture-color` - RGB and HDR spaces

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod acescc;
pub mod acescct;
pub mod gamma;
pub mod hlg;
pub mod pq;
pub mod rec2020;
pub mod rec709;
pub mod srgb;

/// Applies a scalar curve to each value of a slice.
#[inline]
pub fn map(values: &[f64], f: impl Fn(f64) -> f64) -> Vec<f64> {
    values.iter().map(|&v| f(v)).collect()
}
