//! SMPTE ST 2084 Perceptual Quantizer (PQ).
//!
//! Linear values are **absolute luminance** in cd/m² (0 to 10000). The
//! color spaces built on PQ scale their relative values into nits first:
//! Rec.2100 PQ and ICtCp by the 203 nit reference white, Jzazbz by its own
//! constants (see [`eotf_with`] / [`oetf_with`]).
//!
//! Both directions are sign-preserving.
//!
//! # Reference
//!
//! SMPTE ST 2084:2014, ITU-R BT.2100-2

use tincture_math::spow;

/// Peak luminance in cd/m².
pub const L_MAX: f64 = 10000.0;

/// Reference white for HDR content in cd/m² (ITU-R BT.2408).
pub const YW: f64 = 203.0;

/// `m1` exponent.
pub const M1: f64 = 2610.0 / 16384.0;
/// `m2` exponent.
pub const M2: f64 = 2523.0 / 32.0;
/// `c1` offset.
pub const C1: f64 = 3424.0 / 4096.0;
/// `c2` gain.
pub const C2: f64 = 2413.0 / 128.0;
/// `c3` gain.
pub const C3: f64 = 2392.0 / 128.0;

/// Curve parameters; Jzazbz uses a variant with a different `m2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PqParams {
    /// `c1`
    pub c1: f64,
    /// `c2`
    pub c2: f64,
    /// `c3`
    pub c3: f64,
    /// `m1`
    pub m1: f64,
    /// `m2`
    pub m2: f64,
}

impl PqParams {
    /// The ST 2084 constants.
    pub const ST2084: Self = Self { c1: C1, c2: C2, c3: C3, m1: M1, m2: M2 };
}

impl Default for PqParams {
    fn default() -> Self {
        Self::ST2084
    }
}

/// PQ EOTF with explicit parameters: signal -> nits.
#[inline]
pub fn eotf_with(v: f64, p: &PqParams) -> f64 {
    let c = spow(v, 1.0 / p.m2);
    L_MAX * spow((c - p.c1).max(0.0) / (p.c2 - p.c3 * c), 1.0 / p.m1)
}

/// PQ inverse EOTF with explicit parameters: nits -> signal.
#[inline]
pub fn oetf_with(l: f64, p: &PqParams) -> f64 {
    let c = spow(l / L_MAX, p.m1);
    spow((p.c1 + p.c2 * c) / (1.0 + p.c3 * c), p.m2)
}

/// PQ EOTF: signal -> nits.
///
/// ```rust
/// use tincture_transfer::pq::eotf;
///
/// assert!((eotf(0.508) - 100.0).abs() < 1.0);
/// ```
#[inline]
pub fn eotf(v: f64) -> f64 {
    eotf_with(v, &PqParams::ST2084)
}

/// PQ inverse EOTF: nits -> signal.
#[inline]
pub fn oetf(l: f64) -> f64 {
    oetf_with(l, &PqParams::ST2084)
}

/// Decodes a slice of signals to nits.
pub fn eotf_slice(v: &[f64]) -> Vec<f64> {
    crate::map(v, eotf)
}

/// Encodes a slice of nits to signals.
pub fn oetf_slice(v: &[f64]) -> Vec<f64> {
    crate::map(v, oetf)
}
