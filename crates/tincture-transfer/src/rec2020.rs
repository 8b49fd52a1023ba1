//! Rec.2020 (BT.2020) transfer function.
//!
//! Same shape as BT.709 but with the 12-bit precision constants.

use tincture_math::nth_root;

/// `α` from BT.2020.
pub const ALPHA: f64 = 1.09929682680944;
/// `β` from BT.2020: the linear/power break in linear light.
pub const BETA: f64 = 0.018053968510807;
const BETA45: f64 = BETA * 4.5;

/// Rec.2020 inverse OETF: encoded -> linear.
#[inline]
pub fn eotf(v: f64) -> f64 {
    let a = v.abs();
    if a < BETA45 {
        v / 4.5
    } else {
        nth_root((a + ALPHA - 1.0) / ALPHA, 0.45).copysign(v)
    }
}

/// Rec.2020 OETF: linear -> encoded.
#[inline]
pub fn oetf(l: f64) -> f64 {
    let a = l.abs();
    if a < BETA {
        4.5 * l
    } else {
        (ALPHA * a.powf(0.45) - (ALPHA - 1.0)).copysign(l)
    }
}

/// Decodes a slice of channels.
pub fn eotf_slice(v: &[f64]) -> Vec<f64> {
    crate::map(v, eotf)
}

/// Encodes a slice of channels.
pub fn oetf_slice(v: &[f64]) -> Vec<f64> {
    crate::map(v, oetf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_is_continuous() {
        let below = 4.5 * BETA;
        let above = ALPHA * BETA.powf(0.45) - (ALPHA - 1.0);
        assert!((below - above).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip() {
        for v in [-1.0, -0.05, 0.0, 0.01, 0.081, 0.5, 1.0, 1.3] {
            assert!((eotf(oetf(v)) - v).abs() < 1e-12, "v={v}");
        }
    }
}
