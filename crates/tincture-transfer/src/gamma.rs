//! Power-law transfer functions.
//!
//! - [`a98_eotf`] / [`a98_oetf`]: Adobe RGB (1998), exponent `563/256`
//! - [`prophoto_eotf`] / [`prophoto_oetf`]: ROMM RGB, gamma 1.8 with a
//!   linear toe of slope 16
//! - [`gamma_eotf`] / [`gamma_oetf`]: arbitrary exponent
//!
//! All of them mirror negatives.

use tincture_math::{nth_root, spow};

/// Adobe RGB (1998) exponent.
pub const A98_GAMMA: f64 = 563.0 / 256.0;

/// ProPhoto toe threshold in linear light.
pub const PROPHOTO_ET: f64 = 1.0 / 512.0;
/// ProPhoto toe threshold in encoded values.
pub const PROPHOTO_ET2: f64 = 16.0 / 512.0;

/// Arbitrary-gamma EOTF: `sign(v)·|v|^gamma`.
///
/// ```rust
/// use tincture_transfer::gamma::gamma_eotf;
///
/// assert_eq!(gamma_eotf(-0.5, 2.0), -0.25);
/// ```
#[inline]
pub fn gamma_eotf(v: f64, gamma: f64) -> f64 {
    spow(v, gamma)
}

/// Arbitrary-gamma OETF: `sign(l)·|l|^(1/gamma)`.
#[inline]
pub fn gamma_oetf(l: f64, gamma: f64) -> f64 {
    nth_root(l, gamma)
}

/// Adobe RGB (1998) decode.
#[inline]
pub fn a98_eotf(v: f64) -> f64 {
    spow(v, A98_GAMMA)
}

/// Adobe RGB (1998) encode.
#[inline]
pub fn a98_oetf(l: f64) -> f64 {
    spow(l, 1.0 / A98_GAMMA)
}

/// ProPhoto RGB decode.
#[inline]
pub fn prophoto_eotf(v: f64) -> f64 {
    if v.abs() < PROPHOTO_ET2 {
        v / 16.0
    } else {
        spow(v, 1.8)
    }
}

/// ProPhoto RGB encode.
#[inline]
pub fn prophoto_oetf(l: f64) -> f64 {
    if l.abs() < PROPHOTO_ET {
        16.0 * l
    } else {
        nth_root(l, 1.8)
    }
}
