//! sRGB transfer function.
//!
//! Piecewise: a linear segment near black and a 2.4 power curve above it.
//! Display P3 shares this curve.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

use tincture_math::nth_root;

/// sRGB EOTF: encoded -> linear.
///
/// ```text
/// if |V| <= 0.04045:
///     L = V / 12.92
/// else:
///     L = sign(V) * ((|V| + 0.055) / 1.055)^2.4
/// ```
///
/// ```rust
/// use tincture_transfer::srgb::eotf;
///
/// assert!((eotf(0.5) - 0.214).abs() < 0.001);
/// assert!((eotf(-0.5) + 0.214).abs() < 0.001);
/// ```
#[inline]
pub fn eotf(v: f64) -> f64 {
    let a = v.abs();
    if a > 0.04045 {
        ((a + 0.055) / 1.055).powf(2.4).copysign(v)
    } else {
        v / 12.92
    }
}

/// sRGB OETF: linear -> encoded.
///
/// ```text
/// if |L| <= 0.0031308:
///     V = 12.92 * L
/// else:
///     V = sign(L) * (1.055 * |L|^(1/2.4) - 0.055)
/// ```
#[inline]
pub fn oetf(l: f64) -> f64 {
    let a = l.abs();
    if a > 0.0031308 {
        (1.055 * nth_root(a, 2.4) - 0.055).copysign(l)
    } else {
        12.92 * l
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
    fn test_roundtrip() {
        for v in [-1.5, -0.5, -0.01, 0.0, 0.02, 0.04045, 0.5, 1.0, 2.0] {
            assert!((oetf(eotf(v)) - v).abs() < 1e-12, "v={v}");
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(eotf(0.0), 0.0);
        assert!((eotf(1.0) - 1.0).abs() < 1e-12);
        assert!((oetf(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirrored() {
        assert_eq!(eotf(-0.7), -eotf(0.7));
        assert_eq!(oetf(-0.3), -oetf(0.3));
    }
}
