//! # tincture-primaries
//!
//! White points, RGB primaries, RGB<->XYZ matrix derivation and the
//! chromaticity conversions that sit between them.
//!
//! # What are Color Primaries?
//!
//! An RGB space is fixed by the CIE xy chromaticities of its three primaries
//! and of its white point. From those four points the 3x3 matrix to CIE XYZ
//! follows: put the primaries in the columns, then scale each column so that
//! RGB `(1, 1, 1)` lands exactly on the white point.
//!
//! # Included Primaries
//!
//! | Primaries | White | Used by |
//! |-----------|-------|---------|
//! | [`SRGB`] | D65 | sRGB, HSL, HSV, HWB |
//! | [`DISPLAY_P3`] | D65 | Display P3 |
//! | [`REC2020`] | D65 | Rec.2020, Rec.2100 |
//! | [`ADOBE_RGB`] | D65 | A98 RGB |
//! | [`PROPHOTO_RGB`] | D50 | ProPhoto RGB |
//! | [`ACES_AP0`] | ACES D60 | ACES2065-1 |
//! | [`ACES_AP1`] | ACES D60 | ACEScg |
//!
//! # Usage
//!
//! ```rust
//! use tincture_primaries::{rgb_to_xyz_matrix, xy_to_xyz, SRGB};
//!
//! let m = rgb_to_xyz_matrix(&SRGB).unwrap();
//! let white = m * [1.0, 1.0, 1.0];
//! let d65 = xy_to_xyz(SRGB.w, 1.0);
//! assert!((white[0] - d65[0]).abs() < 1e-12);
//! ```
//!
//! # Dependencies
//!
//! - `tincture-math` - matrix operations
//! - `tincture-core` - error types
//!
//! # Used By
//!
//! - `tincture-color` - RGB spaces, chromatic adaptation, CCT

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use tincture_core::Result;
use tincture_math::{Mat3, Vec3};

/// xy chromaticity pair.
pub type Xy = [f64; 2];

// ============================================================================
// White Points (CIE 1931 2° observer)
// ============================================================================

/// CIE Standard Illuminant D65 (daylight, ~6504K), 4-digit convention.
pub const D65: Xy = [0.31270, 0.32900];
/// CIE Standard Illuminant D50 (horizon light, ~5003K), 4-digit convention.
pub const D50: Xy = [0.34570, 0.35850];
/// CIE Standard Illuminant D55.
pub const D55: Xy = [0.33243, 0.34744];
/// CIE Standard Illuminant D75.
pub const D75: Xy = [0.29903, 0.31488];
/// CIE Standard Illuminant A (tungsten, ~2856K).
pub const A: Xy = [0.44758, 0.40745];
/// CIE Standard Illuminant B.
pub const B: Xy = [0.34842, 0.35161];
/// CIE Standard Illuminant C.
pub const C: Xy = [0.31006, 0.31616];
/// Equal-energy illuminant.
pub const E: Xy = [1.0 / 3.0, 1.0 / 3.0];
/// CIE F2 (cool white fluorescent).
pub const F2: Xy = [0.37210, 0.37510];
/// CIE F7 (broadband daylight fluorescent).
pub const F7: Xy = [0.31290, 0.32920];
/// CIE F11 (narrow tri-band fluorescent).
pub const F11: Xy = [0.38050, 0.37690];
/// ACES white (~D60).
pub const ACES_D60: Xy = [0.32168, 0.33767];

/// Looks up a named 2° white point.
///
/// ```rust
/// use tincture_primaries::{white_by_name, D65};
///
/// assert_eq!(white_by_name("D65"), Some(D65));
/// assert_eq!(white_by_name("d65"), Some(D65));
/// assert!(white_by_name("D93").is_none());
/// ```
pub fn white_by_name(name: &str) -> Option<Xy> {
    let upper = name.to_ascii_uppercase();
    Some(match upper.as_str() {
        "A" => A,
        "B" => B,
        "C" => C,
        "D50" => D50,
        "D55" => D55,
        "D65" => D65,
        "D75" => D75,
        "E" => E,
        "F2" => F2,
        "F7" => F7,
        "F11" => F11,
        "ACES-D60" | "D60" => ACES_D60,
        _ => return None,
    })
}

// ============================================================================
// Primaries
// ============================================================================

/// RGB primaries and white point as xy chromaticities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red primary.
    pub r: Xy,
    /// Green primary.
    pub g: Xy,
    /// Blue primary.
    pub b: Xy,
    /// White point.
    pub w: Xy,
    /// Display name.
    pub name: &'static str,
}

impl Primaries {
    /// White point as XYZ with `Y = 1`.
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        xy_to_xyz(self.w, 1.0)
    }
}

/// sRGB / Rec.709 primaries.
pub const SRGB: Primaries = Primaries {
    r: [0.640, 0.330],
    g: [0.300, 0.600],
    b: [0.150, 0.060],
    w: D65,
    name: "sRGB",
};

/// Display P3 (DCI-P3 primaries, D65 white).
pub const DISPLAY_P3: Primaries = Primaries {
    r: [0.680, 0.320],
    g: [0.265, 0.690],
    b: [0.150, 0.060],
    w: D65,
    name: "Display P3",
};

/// ITU-R BT.2020 primaries.
pub const REC2020: Primaries = Primaries {
    r: [0.708, 0.292],
    g: [0.170, 0.797],
    b: [0.131, 0.046],
    w: D65,
    name: "Rec.2020",
};

/// Adobe RGB (1998) primaries.
pub const ADOBE_RGB: Primaries = Primaries {
    r: [0.640, 0.330],
    g: [0.210, 0.710],
    b: [0.150, 0.060],
    w: D65,
    name: "Adobe RGB (1998)",
};

/// ProPhoto (ROMM) RGB primaries.
pub const PROPHOTO_RGB: Primaries = Primaries {
    r: [0.734699, 0.265301],
    g: [0.159597, 0.840403],
    b: [0.036598, 0.000105],
    w: D50,
    name: "ProPhoto RGB",
};

/// ACES AP0 primaries (ACES2065-1).
pub const ACES_AP0: Primaries = Primaries {
    r: [0.7347, 0.2653],
    g: [0.0000, 1.0000],
    b: [0.0001, -0.0770],
    w: ACES_D60,
    name: "ACES AP0",
};

/// ACES AP1 primaries (ACEScg).
pub const ACES_AP1: Primaries = Primaries {
    r: [0.713, 0.293],
    g: [0.165, 0.830],
    b: [0.128, 0.044],
    w: ACES_D60,
    name: "ACES AP1",
};

// ============================================================================
// Chromaticity conversions
// ============================================================================

/// xyY to XYZ. A zero `y` yields black.
///
/// ```rust
/// use tincture_primaries::xy_to_xyz;
///
/// let xyz = xy_to_xyz([0.3127, 0.3290], 1.0);
/// assert!((xyz[0] - 0.9504559270516716).abs() < 1e-12);
/// ```
#[inline]
pub fn xy_to_xyz(xy: Xy, big_y: f64) -> Vec3 {
    let [x, y] = xy;
    if y == 0.0 {
        [0.0, 0.0, 0.0]
    } else {
        [x * big_y / y, big_y, (1.0 - x - y) * big_y / y]
    }
}

/// XYZ to xyY. Black takes the chromaticity of `white`.
#[inline]
pub fn xyz_to_xyy(xyz: Vec3, white: Xy) -> Vec3 {
    let d = xyz[0] + xyz[1] + xyz[2];
    if d == 0.0 {
        [white[0], white[1], xyz[1]]
    } else {
        [xyz[0] / d, xyz[1] / d, xyz[1]]
    }
}

/// xy to CIE 1960 UCS uv.
#[inline]
pub fn xy_to_uv_1960(xy: Xy) -> [f64; 2] {
    let [x, y] = xy;
    let denom = 12.0 * y - 2.0 * x + 3.0;
    if denom == 0.0 { [0.0, 0.0] } else { [4.0 * x / denom, 6.0 * y / denom] }
}

/// CIE 1960 UCS uv to xy.
#[inline]
pub fn uv_1960_to_xy(uv: [f64; 2]) -> Xy {
    let [u, v] = uv;
    let denom = 2.0 * u - 8.0 * v + 4.0;
    if denom == 0.0 { [0.0, 0.0] } else { [3.0 * u / denom, 2.0 * v / denom] }
}

/// xy to CIE 1976 UCS u'v'.
#[inline]
pub fn xy_to_uv(xy: Xy) -> [f64; 2] {
    let [u, v] = xy_to_uv_1960(xy);
    [u, v * 1.5]
}

/// CIE 1976 UCS u'v' to xy.
#[inline]
pub fn uv_to_xy(uv: [f64; 2]) -> Xy {
    uv_1960_to_xy([uv[0], uv[1] / 1.5])
}

// ============================================================================
// Matrix Generation
// ============================================================================

/// Derives the RGB to XYZ matrix (white at `Y = 1`) from primaries.
///
/// 1. Convert each primary's xy to XYZ with `Y = 1`
/// 2. Solve `P · S = W` for the per-primary scale `S`
/// 3. Scale each column of `P` by `S`
///
/// Fails if the primaries are collinear.
pub fn rgb_to_xyz_matrix(p: &Primaries) -> Result<Mat3> {
    let r = xy_to_xyz(p.r, 1.0);
    let g = xy_to_xyz(p.g, 1.0);
    let b = xy_to_xyz(p.b, 1.0);
    let cols = Mat3::from_cols([r, g, b]);
    let s = cols.try_inverse()? * p.white_xyz();
    Ok(Mat3::from_cols([
        tincture_math::scale3(r, s[0]),
        tincture_math::scale3(g, s[1]),
        tincture_math::scale3(b, s[2]),
    ]))
}

/// The XYZ to RGB matrix; inverse of [`rgb_to_xyz_matrix`].
pub fn xyz_to_rgb_matrix(p: &Primaries) -> Result<Mat3> {
    rgb_to_xyz_matrix(p)?.try_inverse()
}

/// Both directions at once.
pub fn rgb_xyz_matrices(p: &Primaries) -> Result<(Mat3, Mat3)> {
    let fwd = rgb_to_xyz_matrix(p)?;
    Ok((fwd, fwd.try_inverse()?))
}

// ============================================================================
// Pre-computed matrices
// ============================================================================

/// Linear sRGB to XYZ (D65).
pub const SRGB_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.41239079926595923, 0.35758433938387807, 0.1804807884018343],
    [0.21263900587151022, 0.7151686787677561, 0.07219231536073371],
    [0.019330818715591818, 0.11919477979462599, 0.9505321522496607],
]);

/// XYZ (D65) to linear sRGB.
pub const XYZ_TO_SRGB: Mat3 = Mat3::from_rows([
    [3.240969941904524, -1.5373831775700946, -0.4986107602930036],
    [-0.9692436362808795, 1.8759675015077202, 0.04155505740717561],
    [0.05563007969699365, -0.20397695888897652, 1.0569715142428784],
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_srgb_matches_constant() {
        let m = rgb_to_xyz_matrix(&SRGB).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!((m.m[i][j] - SRGB_TO_XYZ.m[i][j]).abs() < 1e-10);
            }
        }
        let inv = xyz_to_rgb_matrix(&SRGB).unwrap();
        assert!((inv.m[0][0] - XYZ_TO_SRGB.m[0][0]).abs() < 1e-9);
    }

    #[test]
    fn test_white_maps_to_white() {
        for p in [SRGB, DISPLAY_P3, REC2020, ADOBE_RGB, PROPHOTO_RGB, ACES_AP0, ACES_AP1] {
            let m = rgb_to_xyz_matrix(&p).unwrap();
            let w = m * [1.0, 1.0, 1.0];
            let expected = p.white_xyz();
            for i in 0..3 {
                assert!((w[i] - expected[i]).abs() < 1e-12, "{}", p.name);
            }
        }
    }

    #[test]
    fn test_uv_roundtrip() {
        let uv = xy_to_uv(D65);
        let xy = uv_to_xy(uv);
        assert!((xy[0] - D65[0]).abs() < 1e-15);
        assert!((xy[1] - D65[1]).abs() < 1e-15);
        let uv60 = xy_to_uv_1960(D65);
        assert!((uv60[1] * 1.5 - uv[1]).abs() < 1e-15);
    }

    #[test]
    fn test_xyy_black_uses_white() {
        let xyy = xyz_to_xyy([0.0, 0.0, 0.0], D65);
        assert_eq!(xyy, [D65[0], D65[1], 0.0]);
    }

    #[test]
    fn test_collinear_primaries_fail() {
        let bad = Primaries { r: [0.1, 0.1], g: [0.2, 0.2], b: [0.3, 0.3], w: D65, name: "bad" };
        assert!(rgb_to_xyz_matrix(&bad).is_err());
    }
}
