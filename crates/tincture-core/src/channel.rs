//! Channel descriptors.
//!
//! A [`Channel`] names one axis of a color space and carries the numeric
//! facts generic algorithms need: the nominal range (what gamut checks and
//! percentages are measured against), whether that range is a hard gamut
//! boundary, the clamp limit applied when a color is built, and whether the
//! axis is an angle.
//!
//! # Usage
//!
//! ```rust
//! use tincture_core::{Channel, FLG_MIRROR_PERCENT};
//!
//! let a = Channel::new("a", -125.0, 125.0).flags(FLG_MIRROR_PERCENT);
//! assert_eq!(a.span(), 125.0);
//! assert_eq!(a.offset(), 0.0);
//!
//! let h = Channel::angle("hue");
//! assert!(h.is_angle());
//! ```

/// Channel is an angle in degrees; wraps instead of clamping.
pub const FLG_ANGLE: u8 = 0x01;
/// Channel is natively a percentage in CSS.
pub const FLG_PERCENT: u8 = 0x02;
/// Channel may optionally be written as a percentage in CSS.
pub const FLG_OPT_PERCENT: u8 = 0x04;
/// Percentages map onto a range mirrored about zero.
pub const FLG_MIRROR_PERCENT: u8 = 0x08;

/// Static description of one color-space axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    /// Channel name, unique within a space.
    pub name: &'static str,
    /// Nominal lower bound.
    pub low: f64,
    /// Nominal upper bound.
    pub high: f64,
    /// Whether leaving `[low, high]` is a gamut violation.
    pub bound: bool,
    /// `FLG_*` bits.
    pub flags: u8,
    /// Hard limits applied when a color is constructed or mutated.
    pub limit: (Option<f64>, Option<f64>),
}

impl Channel {
    /// Creates an unbound channel over `[low, high]` with no flags and no limit.
    pub const fn new(name: &'static str, low: f64, high: f64) -> Self {
        Self {
            name,
            low,
            high,
            bound: false,
            flags: 0,
            limit: (None, None),
        }
    }

    /// Creates a hue channel over `[0, 360)`.
    pub const fn angle(name: &'static str) -> Self {
        Self::new(name, 0.0, 360.0).flags(FLG_ANGLE)
    }

    /// The implicit alpha channel every space carries last.
    pub const fn alpha() -> Self {
        Self::new("alpha", 0.0, 1.0)
            .bound(true)
            .flags(FLG_PERCENT)
            .limit(Some(0.0), Some(1.0))
    }

    /// Marks the nominal range as a hard gamut boundary.
    pub const fn bound(mut self, bound: bool) -> Self {
        self.bound = bound;
        self
    }

    /// Replaces the flag bits.
    pub const fn flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the construction-time clamp limits.
    pub const fn limit(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.limit = (low, high);
        self
    }

    /// Is this an angular (hue) channel?
    #[inline]
    pub fn is_angle(&self) -> bool {
        self.flags & FLG_ANGLE != 0
    }

    /// Is this channel a native CSS percentage?
    #[inline]
    pub fn is_percent(&self) -> bool {
        self.flags & FLG_PERCENT != 0
    }

    /// Does this channel accept an optional CSS percentage?
    #[inline]
    pub fn is_opt_percent(&self) -> bool {
        self.flags & FLG_OPT_PERCENT != 0
    }

    /// True when the range is mirrored about zero and flagged as such.
    #[inline]
    pub fn is_mirrored(&self) -> bool {
        self.flags & FLG_MIRROR_PERCENT != 0 && self.low == -self.high
    }

    /// Width used to scale percentages onto this channel.
    #[inline]
    pub fn span(&self) -> f64 {
        if self.is_mirrored() { self.high } else { self.high - self.low }
    }

    /// Offset subtracted after percentage scaling.
    #[inline]
    pub fn offset(&self) -> f64 {
        if self.is_mirrored() { 0.0 } else { -self.low }
    }

    /// Applies the hard limit. Undefined (NaN) values pass through untouched.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        let mut v = value;
        if let Some(lo) = self.limit.0 {
            v = v.max(lo);
        }
        if let Some(hi) = self.limit.1 {
            v = v.min(hi);
        }
        v
    }

    /// True if `value` is inside the nominal range widened by `tolerance`.
    ///
    /// Angles and unbound channels are always in range; NaN counts as zero.
    pub fn in_range(&self, value: f64, tolerance: f64) -> bool {
        if self.is_angle() || !self.bound {
            return true;
        }
        let v = if value.is_nan() { 0.0 } else { value };
        v >= self.low - tolerance && v <= self.high + tolerance
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_span_offset() {
        let l = Channel::new("lightness", 0.0, 100.0);
        assert_eq!(l.span(), 100.0);
        assert_eq!(l.offset(), 0.0);

        let j = Channel::new("j", -0.5, 0.5);
        assert_eq!(j.span(), 1.0);
        assert_eq!(j.offset(), 0.5);

        let m = Channel::new("b", -0.4, 0.4).flags(FLG_MIRROR_PERCENT);
        assert_eq!(m.span(), 0.4);
        assert_eq!(m.offset(), 0.0);
    }

    #[test]
    fn test_percent_scaling() {
        // 0% lands on `low` for offset channels and on 0 for mirrored ones.
        let j = Channel::new("j", -0.5, 0.5);
        assert_abs_diff_eq!(0.37 * j.span() - j.offset(), -0.13, epsilon = 1e-12);
        assert_abs_diff_eq!(0.0 * j.span() - j.offset(), j.low, epsilon = 1e-12);

        let m = Channel::new("b", -0.4, 0.4).flags(FLG_MIRROR_PERCENT);
        assert_abs_diff_eq!(0.37 * m.span() - m.offset(), 0.148, epsilon = 1e-12);
        assert_abs_diff_eq!(-1.0 * m.span() - m.offset(), m.low, epsilon = 1e-12);
    }

    #[test]
    fn test_clamp_limits() {
        let c = Channel::new("chroma", 0.0, 150.0).limit(Some(0.0), None);
        assert_eq!(c.clamp(-3.0), 0.0);
        assert_eq!(c.clamp(400.0), 400.0);
        assert!(c.clamp(f64::NAN).is_nan());
        assert_eq!(Channel::alpha().clamp(1.5), 1.0);
    }

    #[test]
    fn test_in_range() {
        let r = Channel::new("red", 0.0, 1.0).bound(true);
        assert!(r.in_range(1.0, 0.0));
        assert!(!r.in_range(1.01, 0.0));
        assert!(r.in_range(1.01, 0.02));
        assert!(Channel::angle("hue").in_range(700.0, 0.0));
    }
}
