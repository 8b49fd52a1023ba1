//! Cone-response matrices for von Kries style chromatic adaptation.
//!
//! Every transform here has the same shape: move both white points into a
//! cone-like space with `M`, scale each cone channel by the ratio of the
//! destination to the source white, and move back with `M⁻¹`:
//!
//! ```text
//! A = M⁻¹ · diag(M·w_dst / M·w_src) · M
//! ```
//!
//! Only the choice of `M` differs between methods. Caching and the choice
//! of method by name live with the CAT plugins in `tincture-color`.
//!
//! # Usage
//!
//! ```rust
//! use tincture_math::{adapt_matrix, BRADFORD};
//!
//! let d65 = [0.95047, 1.0, 1.08883];
//! let d50 = [0.96422, 1.0, 0.82521];
//! let m = adapt_matrix(&BRADFORD, d65, d50).unwrap();
//! let out = m * d65;
//! assert!((out[2] - d50[2]).abs() < 1e-9);
//! ```

use crate::mat3::{Mat3, Vec3, div3};
use tincture_core::Result;

// ============================================================================
// Cone response matrices
// ============================================================================

/// Bradford (Lam 1985), the sharpened cone space most tools default to.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951000, 0.2664000, -0.1614000],
    [-0.7502000, 1.7135000, 0.0367000],
    [0.0389000, -0.0685000, 1.0296000],
]);

/// Von Kries with the Hunt-Pointer-Estevez cone fundamentals.
pub const VON_KRIES: Mat3 = Mat3::from_rows([
    [0.4002400, 0.7076000, -0.0808100],
    [-0.2263000, 1.1653200, 0.0457000],
    [0.0000000, 0.0000000, 0.9182200],
]);

/// CAT02 from CIECAM02.
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328000, 0.4296000, -0.1624000],
    [-0.7036000, 1.6975000, 0.0061000],
    [0.0030000, 0.0136000, 0.9834000],
]);

/// CAT16 (M16) from CAM16.
pub const CAT16: Mat3 = Mat3::from_rows([
    [0.401288, 0.650173, -0.051461],
    [-0.250268, 1.204414, 0.045854],
    [-0.002079, 0.048952, 0.953127],
]);

/// Sharp (Finlayson and Süsstrunk).
pub const SHARP: Mat3 = Mat3::from_rows([
    [1.2694000, -0.0988000, -0.1706000],
    [-0.8364000, 1.8006000, 0.0357000],
    [0.0297000, -0.0315000, 1.0018000],
]);

/// CMCCAT97, laid out as published.
pub const CMCCAT97: Mat3 = Mat3::from_rows([
    [0.8951000, -0.7502000, 0.0389000],
    [0.2664000, 1.7135000, 0.0685000],
    [-0.1614000, 0.0367000, 1.0296000],
]);

/// CMCCAT2000.
pub const CMCCAT2000: Mat3 = Mat3::from_rows([
    [0.7982000, 0.3389000, -0.1371000],
    [-0.5918000, 1.5512000, 0.0406000],
    [0.0008000, 0.0239000, 0.9753000],
]);

/// Plain XYZ scaling; adapts in XYZ itself.
pub const XYZ_SCALING: Mat3 = Mat3::IDENTITY;

// ============================================================================
// Adaptation
// ============================================================================

/// Adaptation matrix taking XYZ relative to `src_white` to `dst_white`.
///
/// White points are absolute XYZ triplets (usually with `Y = 1`). Fails
/// only if the cone matrix is singular.
pub fn adapt_matrix(method: &Mat3, src_white: Vec3, dst_white: Vec3) -> Result<Mat3> {
    let method_inv = method.try_inverse()?;
    let src_cone = *method * src_white;
    let dst_cone = *method * dst_white;
    let scale = Mat3::diagonal(div3(dst_cone, src_cone));
    Ok(method_inv * scale * *method)
}

/// Forward and inverse adaptation between two whites, computed together.
pub fn adapt_matrices(method: &Mat3, src_white: Vec3, dst_white: Vec3) -> Result<(Mat3, Mat3)> {
    let forward = adapt_matrix(method, src_white, dst_white)?;
    Ok((forward, forward.try_inverse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const D65: Vec3 = [0.95047, 1.0, 1.08883];
    const D50: Vec3 = [0.96422, 1.0, 0.82521];

    #[test]
    fn test_white_maps_to_white() {
        for m in [BRADFORD, VON_KRIES, CAT02, CAT16, SHARP, CMCCAT97, CMCCAT2000, XYZ_SCALING] {
            let a = adapt_matrix(&m, D65, D50).unwrap();
            let out = a * D65;
            for i in 0..3 {
                assert!((out[i] - D50[i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_same_white_is_identity() {
        let a = adapt_matrix(&BRADFORD, D65, D65).unwrap();
        let v = a * [0.2, 0.3, 0.4];
        assert!((v[0] - 0.2).abs() < 1e-12);
        assert!((v[2] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_pair() {
        let (fwd, inv) = adapt_matrices(&CAT16, D65, D50).unwrap();
        let v = inv * (fwd * [0.5, 0.4, 0.3]);
        assert!((v[0] - 0.5).abs() < 1e-12);
        assert!((v[1] - 0.4).abs() < 1e-12);
    }
}
