//! ACEScc transfer function.
//!
//! Pure log2 encoding of ACEScg for grading. Values at or below zero
//! collapse to the encoding of `2^-16`, so the curve is not invertible
//! there.
//!
//! # Range
//!
//! - Linear input: scene-referred, `[0, 65504]`
//! - Encoded output: [`MIN`] to [`MAX`], roughly `[-0.358, 1.468]`

const FLOOR: f64 = 1.0 / 65536.0;
const TOE: f64 = 1.0 / 32768.0;

/// Largest half-float value.
pub const HALF_MAX: f64 = 65504.0;
/// Encoding of zero light.
pub const MIN: f64 = (-16.0 + 9.72) / 17.52;
/// Encoding of [`HALF_MAX`].
pub const MAX: f64 = (15.999_295_387_023_41 + 9.72) / 17.52;

/// Encoded value below which the toe applies.
const DECODE_TOE: f64 = (9.72 - 15.0) / 17.52;

/// ACEScc to linear ACEScg.
#[inline]
pub fn eotf(cc: f64) -> f64 {
    if cc <= DECODE_TOE {
        ((cc * 17.52 - 9.72).exp2() - FLOOR) * 2.0
    } else if cc < MAX {
        (cc * 17.52 - 9.72).exp2()
    } else {
        HALF_MAX
    }
}

/// Linear ACEScg to ACEScc.
#[inline]
pub fn oetf(l: f64) -> f64 {
    let log = if l <= 0.0 {
        FLOOR.log2()
    } else if l < TOE {
        (FLOOR + l * 0.5).log2()
    } else {
        l.log2()
    };
    (log + 9.72) / 17.52
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_roundtrip() {
        for v in [1e-5, 0.001, 0.18, 1.0, 100.0, 60000.0] {
            assert_abs_diff_eq!(eotf(oetf(v)), v, epsilon = 1e-9 * v.max(1.0));
        }
    }

    #[test]
    fn test_midgray() {
        assert_abs_diff_eq!(oetf(0.18), 0.4135, epsilon = 1e-3);
    }

    #[test]
    fn test_range() {
        assert_abs_diff_eq!(oetf(0.0), MIN, epsilon = 1e-12);
        assert_abs_diff_eq!(oetf(-1.0), MIN, epsilon = 1e-12);
        assert_abs_diff_eq!(oetf(HALF_MAX), MAX, epsilon = 1e-9);
        assert_eq!(eotf(MAX + 0.1), HALF_MAX);
    }
}
