//! Jzazbz, an HDR-capable perceptual space on absolute luminance.
//!
//! Relative XYZ is scaled so that diffuse white sits at 203 cd/m².

use tincture_core::{Channel, DynamicRange, FLG_MIRROR_PERCENT, LabIsh};
use tincture_math::{Mat3, zdiv};
use tincture_primaries::D65;
use tincture_transfer::pq::{self, PqParams};

use crate::space::{ROOT, Rectangular, Space, Xy};

const B: f64 = 1.15;
const G: f64 = 0.66;
const D: f64 = -0.56;
const D0: f64 = 1.6295499532821566e-11;

/// PQ curve with the steeper `m2` this space uses.
const PQ: PqParams = PqParams { m2: 1.7 * 2523.0 / 32.0, ..PqParams::ST2084 };

const XYZ_TO_LMS: Mat3 = Mat3::from_rows([
    [0.41478972, 0.579999, 0.014648],
    [-0.20151, 1.120649, 0.0531008],
    [-0.0166008, 0.2648, 0.6684799],
]);

const LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [1.9242264357876069, -1.0047923125953657, 0.037651404030617994],
    [0.35031676209499907, 0.7264811939316552, -0.06538442294808501],
    [-0.09098281098284755, -0.31272829052307394, 1.5227665613052603],
]);

const LMS_P_TO_IZAZBZ: Mat3 = Mat3::from_rows([
    [0.5, 0.5, 0.0],
    [3.524, -4.066708, 0.542708],
    [0.199076, 1.096799, -1.295875],
]);

const IZAZBZ_TO_LMS_P: Mat3 = Mat3::from_rows([
    [1.0, 0.13860504327153927, 0.05804731615611883],
    [1.0, -0.1386050432715393, -0.058047316156118904],
    [1.0, -0.09601924202631895, -0.811891896056039],
]);

/// Absolute XYZ to `(Iz, az, bz)` through the given LMS' matrix.
///
/// ZCAM shares everything here but the first row of that matrix.
pub fn xyz_to_izazbz(xyz: &[f64], lms_p_to_izazbz: &Mat3) -> Vec<f64> {
    let (xa, ya, za) = (xyz[0], xyz[1], xyz[2]);
    let xm = B * xa - (B - 1.0) * za;
    let ym = G * ya - (G - 1.0) * xa;
    let lms = XYZ_TO_LMS.transform_slice(&[xm, ym, za]);
    let pqlms: Vec<f64> = lms.into_iter().map(|v| pq::oetf_with(v, &PQ)).collect();
    lms_p_to_izazbz.transform_slice(&pqlms)
}

/// `(Iz, az, bz)` to absolute XYZ; the inverse of [`xyz_to_izazbz`].
pub fn izazbz_to_xyz(izazbz: &[f64], izazbz_to_lms_p: &Mat3) -> Vec<f64> {
    let pqlms = izazbz_to_lms_p.transform_slice(izazbz);
    let lms: Vec<f64> = pqlms.into_iter().map(|v| pq::eotf_with(v, &PQ)).collect();
    let m = LMS_TO_XYZ.transform_slice(&lms);
    let (xm, ym, za) = (m[0], m[1], m[2]);
    let xa = (xm + (B - 1.0) * za) / B;
    let ya = (ym + (G - 1.0) * xa) / G;
    vec![xa, ya, za]
}

/// Relative XYZ (D65) to Jzazbz.
pub fn xyz_to_jzazbz(xyz: &[f64]) -> Vec<f64> {
    let abs: Vec<f64> = xyz.iter().map(|v| v * pq::YW).collect();
    let iz = xyz_to_izazbz(&abs, &LMS_P_TO_IZAZBZ);
    let jz = (1.0 + D) * iz[0] / (1.0 + D * iz[0]) - D0;
    vec![jz, iz[1], iz[2]]
}

/// Jzazbz to relative XYZ (D65).
pub fn jzazbz_to_xyz(jab: &[f64]) -> Vec<f64> {
    let iz = zdiv(jab[0] + D0, 1.0 + D - D * (jab[0] + D0));
    izazbz_to_xyz(&[iz, jab[1], jab[2]], &IZAZBZ_TO_LMS_P)
        .into_iter()
        .map(|v| v / pq::YW)
        .collect()
}

const CHANNELS: [Channel; 3] = [
    Channel::new("jz", 0.0, 1.0),
    Channel::new("az", -0.21, 0.21).flags(FLG_MIRROR_PERCENT),
    Channel::new("bz", -0.21, 0.21).flags(FLG_MIRROR_PERCENT),
];

/// Jzazbz.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jzazbz;

impl Space for Jzazbz {
    fn name(&self) -> &'static str {
        "jzazbz"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--jzazbz", "jzazbz"]
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("lightness", "jz"), ("a", "az"), ("b", "bz"), ("j", "jz")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn dynamic_range(&self) -> DynamicRange {
        DynamicRange::Hdr
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        jzazbz_to_xyz(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_jzazbz(coords)
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        Some(coords[1].hypot(coords[2]) < 0.0003)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_primaries::xy_to_xyz;

    #[test]
    fn test_round_trip() {
        for xyz in [[0.2, 0.3, 0.4], [0.95, 1.0, 1.09], [0.01, 0.02, 0.005]] {
            let back = jzazbz_to_xyz(&xyz_to_jzazbz(&xyz));
            for i in 0..3 {
                assert!((back[i] - xyz[i]).abs() < 1e-8, "{xyz:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn test_white_is_nearly_neutral() {
        let jab = xyz_to_jzazbz(&xy_to_xyz(D65, 1.0));
        assert!(jab[0] > 0.2 && jab[0] < 0.25);
        assert!(jab[1].hypot(jab[2]) < 0.0003);
    }

    #[test]
    fn test_black_is_zero() {
        let jab = xyz_to_jzazbz(&[0.0, 0.0, 0.0]);
        assert!(jab.iter().all(|v| v.abs() < 1e-9));
    }
}
