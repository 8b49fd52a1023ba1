//! Rec.709 (BT.709) transfer function.
//!
//! The BT.2020 curve at 10-bit precision. Like the other SDR curves it is
//! mirrored on the negative axis.

use tincture_math::nth_root;

/// `α` from BT.709.
pub const ALPHA: f64 = 1.099;
/// `β` from BT.709: the linear/power break in linear light.
pub const BETA: f64 = 0.018;
const BETA45: f64 = BETA * 4.5;

/// Rec.709 inverse OETF: encoded -> linear.
#[inline]
pub fn eotf(v: f64) -> f64 {
    let a = v.abs();
    if a < BETA45 {
        v / 4.5
    } else {
        nth_root((a + ALPHA - 1.0) / ALPHA, 0.45).copysign(v)
    }
}

/// Rec.709 OETF: linear -> encoded.
#[inline]
pub fn oetf(l: f64) -> f64 {
    let a = l.abs();
    if a < BETA {
        4.5 * l
    } else {
        (ALPHA * a.powf(0.45) - (ALPHA - 1.0)).copysign(l)
    }
}
