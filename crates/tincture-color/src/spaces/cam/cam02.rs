//! CIECAM02.
//!
//! Same pipeline as CAM16 with the CAT02 adaptation space, followed by a
//! move into Hunt-Pointer-Estevez cone space before compression.

use std::sync::LazyLock;

use tincture_math::{CAT02, Mat3};

use super::cam16::Ciecam;
use super::{CamJab, CamJmh, Model, ViewingConditions};

/// Inverse of the CAT02 cone matrix.
pub const CAT02_INV: Mat3 = Mat3::from_rows([
    [1.0961238208355142, -0.27886900021828726, 0.18274517938277304],
    [0.45436904197535916, 0.4735331543074118, 0.07209780371722913],
    [-0.009627608738429355, -0.00569803121611342, 1.0153256399545427],
]);

/// XYZ to Hunt-Pointer-Estevez cone space.
pub const XYZ_TO_HPE: Mat3 = Mat3::from_rows([
    [0.38971, 0.68898, -0.07868],
    [-0.22981, 1.18340, 0.04641],
    [0.0, 0.0, 1.0],
]);

/// Hunt-Pointer-Estevez cone space to XYZ.
pub const HPE_TO_XYZ: Mat3 = Mat3::from_rows([
    [1.910196834052035, -1.1121238927878747, 0.20190795676749937],
    [0.3709500882486886, 0.6290542573926132, -8.055142184361326e-06],
    [0.0, 0.0, 1.0],
]);

impl Ciecam {
    /// CIECAM02 under `conditions`.
    pub fn cam02(conditions: ViewingConditions) -> Self {
        let post = XYZ_TO_HPE.mul_mat(&CAT02_INV);
        let post_inv = CAT02.mul_mat(&HPE_TO_XYZ);
        Self::build(conditions, CAT02, CAT02_INV, post, post_inv)
    }
}

/// CIECAM02 under sRGB viewing conditions.
pub static CAM02_MODEL: LazyLock<Ciecam> = LazyLock::new(|| Ciecam::cam02(ViewingConditions::srgb()));

pub(crate) fn cam02_model() -> &'static dyn Model {
    &*CAM02_MODEL
}

/// CIECAM02 JMh.
pub const CAM02_JMH: CamJmh = CamJmh::new("cam02-jmh", &["--cam02-jmh"], 100.0, 120.0, cam02_model);

/// CIECAM02 Jab.
pub const CAM02_JAB: CamJab = CamJab::new("cam02", "cam02-jmh", &["--cam02"], 90.0);
