//! Error types for tincture operations.
//!
//! One error enum serves every crate of the engine. Variants fall into three
//! kinds, reported by [`Error::kind`]:
//!
//! - **Configuration** - duplicate or reserved plugin names, unknown methods,
//!   cycles in the space graph, bad appearance-model inputs
//! - **Parse** - a string that no registered space recognizes
//! - **Shape** - ragged or mismatched arrays, singular matrices
//!
//! Numeric edge cases (zero alpha, undefined channels, zero colorfulness)
//! are handled where they occur and never surface as errors.
//!
//! # Usage
//!
//! ```rust
//! use tincture_core::{Error, ErrorKind, Result};
//!
//! fn lookup(name: &str) -> Result<()> {
//!     Err(Error::UnknownPlugin { kind: "space", name: name.to_string() })
//! }
//!
//! let err = lookup("nope").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Configuration);
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - `tincture-math` - shape and inversion failures
//! - `tincture-color` - registry, conversion and parsing failures

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Programmer or configuration mistake; never retried.
    Configuration,
    /// Input text did not match any known color syntax.
    Parse,
    /// Array shape or matrix invertibility problem.
    Shape,
}

/// Errors that can occur in the color engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid engine configuration or call-time options.
    ///
    /// Covers duplicate registrations, removal of reserved plugins, cycles in
    /// the space graph and appearance-model inverse calls that do not supply
    /// exactly one member of each input family.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A plugin name that is not registered was requested.
    #[error("unknown {kind} '{name}'")]
    UnknownPlugin {
        /// Plugin category (`space`, `fit`, `delta-e`, ...)
        kind: &'static str,
        /// Requested name
        name: String,
    },

    /// The string could not be parsed as a color.
    #[error("'{0}' is not a recognized color")]
    Parse(String),

    /// Arrays with incompatible or ragged shapes.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A matrix with a zero pivot was inverted.
    #[error("matrix is not invertible")]
    NotInvertible,
}

impl Error {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::UnknownPlugin { .. } => ErrorKind::Configuration,
            Self::Parse(_) => ErrorKind::Parse,
            Self::ShapeMismatch(_) | Self::NotInvertible => ErrorKind::Shape,
        }
    }

    /// Shorthand for a [`Error::Configuration`] error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Shorthand for a [`Error::UnknownPlugin`] error.
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownPlugin { kind, name: name.into() }
    }

    /// Shorthand for a [`Error::ShapeMismatch`] error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}
