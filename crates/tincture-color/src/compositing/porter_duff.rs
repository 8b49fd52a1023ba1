//! Porter-Duff alpha compositing operators.

use std::fmt;
use std::str::FromStr;

use tincture_core::{Error, Result};

/// A Porter-Duff operator, defined by its source and backdrop fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// Nothing survives.
    Clear,
    /// Source only.
    Copy,
    /// Backdrop only.
    Destination,
    /// Source over backdrop.
    #[default]
    SourceOver,
    /// Backdrop over source.
    DestinationOver,
    /// Source where the backdrop is.
    SourceIn,
    /// Backdrop where the source is.
    DestinationIn,
    /// Source where the backdrop is not.
    SourceOut,
    /// Backdrop where the source is not.
    DestinationOut,
    /// Source over backdrop, kept inside the backdrop.
    SourceAtop,
    /// Backdrop over source, kept inside the source.
    DestinationAtop,
    /// Non-overlapping regions of both.
    Xor,
    /// Sum of both.
    Lighter,
}

impl Operator {
    /// Every operator.
    pub const ALL: [Operator; 13] = [
        Self::Clear,
        Self::Copy,
        Self::Destination,
        Self::SourceOver,
        Self::DestinationOver,
        Self::SourceIn,
        Self::DestinationIn,
        Self::SourceOut,
        Self::DestinationOut,
        Self::SourceAtop,
        Self::DestinationAtop,
        Self::Xor,
        Self::Lighter,
    ];

    /// CSS name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Copy => "copy",
            Self::Destination => "destination",
            Self::SourceOver => "source-over",
            Self::DestinationOver => "destination-over",
            Self::SourceIn => "source-in",
            Self::DestinationIn => "destination-in",
            Self::SourceOut => "source-out",
            Self::DestinationOut => "destination-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationAtop => "destination-atop",
            Self::Xor => "xor",
            Self::Lighter => "lighter",
        }
    }

    /// `(Fa, Fb)` for backdrop alpha `ab` and source alpha `as_`.
    #[inline]
    pub fn fractions(self, ab: f64, as_: f64) -> (f64, f64) {
        match self {
            Self::Clear => (0.0, 0.0),
            Self::Copy => (1.0, 0.0),
            Self::Destination => (0.0, 1.0),
            Self::SourceOver => (1.0, 1.0 - as_),
            Self::DestinationOver => (1.0 - ab, 1.0),
            Self::SourceIn => (ab, 0.0),
            Self::DestinationIn => (0.0, as_),
            Self::SourceOut => (1.0 - ab, 0.0),
            Self::DestinationOut => (0.0, 1.0 - as_),
            Self::SourceAtop => (ab, 1.0 - as_),
            Self::DestinationAtop => (1.0 - ab, as_),
            Self::Xor => (1.0 - ab, 1.0 - as_),
            Self::Lighter => (1.0, 1.0),
        }
    }

    /// Output alpha.
    #[inline]
    pub fn alpha(self, ab: f64, as_: f64) -> f64 {
        let (fa, fb) = self.fractions(ab, as_);
        as_ * fa + ab * fb
    }

    /// Premultiplied output channel for backdrop `cb` and source `cs`.
    #[inline]
    pub fn channel(self, ab: f64, as_: f64, cb: f64, cs: f64) -> f64 {
        let (fa, fb) = self.fractions(ab, as_);
        as_ * fa * cs + ab * fb * cb
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL.into_iter().find(|op| op.name() == s).ok_or_else(|| Error::unknown("operator", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_over_alpha() {
        assert_eq!(Operator::SourceOver.alpha(1.0, 0.5), 1.0);
        assert_eq!(Operator::SourceOver.alpha(0.5, 0.5), 0.75);
        assert_eq!(Operator::SourceOver.channel(1.0, 0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(Operator::Clear.alpha(1.0, 1.0), 0.0);
        assert_eq!(Operator::Xor.alpha(1.0, 1.0), 0.0);
        assert_eq!(Operator::Lighter.alpha(0.5, 0.5), 1.0);
        assert_eq!(Operator::DestinationIn.fractions(0.3, 0.6), (0.0, 0.6));
        assert_eq!(Operator::SourceAtop.channel(1.0, 1.0, 0.2, 0.8), 0.8);
    }

    #[test]
    fn test_names() {
        for op in Operator::ALL {
            assert_eq!(op.to_string().parse::<Operator>().unwrap(), op);
        }
        assert!("plus-darker".parse::<Operator>().is_err());
    }
}
