//! # tincture-math
//!
//! The algebra layer of the tincture color engine. It knows nothing about
//! color; everything above it does.
//!
//! - [`scalar`] - sign-preserving powers, half-up rounding, hue wrapping, polar helpers
//! - [`Mat3`] - fixed 3x3 matrices for the per-color hot path
//! - [`Array`] - N-D arrays with strides and NumPy-style broadcasting
//! - [`linalg`] - `dot`, Gauss-Jordan `inv`, `solve`, `det`, stacking utilities
//! - [`spline`] - B-spline, natural B-spline, Catmull-Rom and monotone splines
//! - [`adapt`] - von Kries style chromatic adaptation matrices
//!
//! # Design
//!
//! Matrices are **row-major** and multiply **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Hot paths use statically ranked types (`[f64; 3]`, [`Vector`], [`Matrix`])
//! and never inspect a shape. The generic N-D routines operate on flat storage
//! with explicit strides and report [`tincture_core::Error::ShapeMismatch`] or
//! [`tincture_core::Error::NotInvertible`] instead of panicking.
//!
//! # Usage
//!
//! ```rust
//! use tincture_math::{dot, inv, Array, Mat3};
//!
//! let m = Array::from_rows(&[vec![2.0, 0.0], vec![0.0, 4.0]]).unwrap();
//! let i = inv(&m).unwrap();
//! assert_eq!(dot(&m, &i).unwrap().data(), &[1.0, 0.0, 0.0, 1.0]);
//!
//! let xyz = Mat3::IDENTITY * [0.25, 0.5, 0.75];
//! assert_eq!(xyz[1], 0.5);
//! ```
//!
//! # Dependencies
//!
//! - `tincture-core` - error types
//!
//! # Used By
//!
//! - `tincture-primaries` - RGB/XYZ matrix generation
//! - `tincture-color` - every space conversion and algorithm

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adapt;
pub mod array;
pub mod linalg;
pub mod mat3;
pub mod scalar;
pub mod spline;

pub use adapt::*;
pub use array::*;
pub use linalg::*;
pub use mat3::*;
pub use scalar::*;
pub use spline::*;
