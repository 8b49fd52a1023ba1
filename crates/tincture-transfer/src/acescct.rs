//! ACEScct transfer function.
//!
//! ACEScc with a linear toe below `2^-7`, which keeps shadows invertible.

use crate::acescc;

/// Linear break point.
const X_BRK: f64 = 0.0078125;
/// Encoded value at [`X_BRK`].
const Y_BRK: f64 = 0.155251141552511;
const A: f64 = 10.5402377416545;
const B: f64 = 0.0729055341958355;

/// Encoding of zero light.
pub const MIN: f64 = B;
/// Encoding of the largest half-float value.
pub const MAX: f64 = acescc::MAX;

/// ACEScct to linear ACEScg.
#[inline]
pub fn eotf(cct: f64) -> f64 {
    if cct <= Y_BRK {
        (cct - B) / A
    } else if cct < MAX {
        (cct * 17.52 - 9.72).exp2()
    } else {
        acescc::HALF_MAX
    }
}

/// Linear ACEScg to ACEScct.
#[inline]
pub fn oetf(l: f64) -> f64 {
    if l <= X_BRK { A * l + B } else { (l.log2() + 9.72) / 17.52 }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_roundtrip() {
        for v in [-0.001, 0.0, 0.005, 0.18, 1.0, 100.0] {
            assert_abs_diff_eq!(eotf(oetf(v)), v, epsilon = 1e-9 * v.abs().max(1.0));
        }
    }

    #[test]
    fn test_toe_is_continuous() {
        let log = (X_BRK.log2() + 9.72) / 17.52;
        assert_abs_diff_eq!(A * X_BRK + B, log, epsilon = 1e-9);
        assert_abs_diff_eq!(Y_BRK, log, epsilon = 1e-9);
    }

    #[test]
    fn test_midgray() {
        assert_abs_diff_eq!(oetf(0.18), acescc::oetf(0.18), epsilon = 1e-12);
    }
}
