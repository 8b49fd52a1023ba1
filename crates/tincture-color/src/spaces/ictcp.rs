//! ICtCp (BT.2100), using the PQ curve on absolute luminance.

use tincture_core::{Channel, DynamicRange, FLG_MIRROR_PERCENT, LabIsh};
use tincture_math::Mat3;
use tincture_primaries::D65;
use tincture_transfer::pq;

use crate::space::{ROOT, Rectangular, Space, Xy};

const XYZ_TO_LMS: Mat3 = Mat3::from_rows([
    [0.3592832590121218, 0.6976051147779497, -0.0358915932320289],
    [-0.19208084637049927, 1.1004767970374318, 0.07537486585191187],
    [0.0070797844607477164, 0.07483966621863658, 0.8433265453898765],
]);

const LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [2.0701522183894223, -1.3263473389671556, 0.20665104762940512],
    [0.36473852097480713, 0.6805660249472276, -0.04530454592203474],
    [-0.04974720753581203, -0.04926096669661379, 1.1880659249923042],
]);

const LMS_P_TO_ICTCP: Mat3 = Mat3::from_rows([
    [0.5, 0.5, 0.0],
    [1.61376953125, -3.323486328125, 1.709716796875],
    [4.378173828125, -4.24560546875, -0.132568359375],
]);

const ICTCP_TO_LMS_P: Mat3 = Mat3::from_rows([
    [1.0, 0.008609037037932761, 0.11102962500302593],
    [1.0, -0.00860903703793275, -0.11102962500302599],
    [1.0, 0.5600313357106791, -0.32062717498731885],
]);

/// Relative XYZ (D65) to ICtCp.
pub fn xyz_to_ictcp(xyz: &[f64]) -> Vec<f64> {
    let lms = XYZ_TO_LMS.transform_slice(&[xyz[0] * pq::YW, xyz[1] * pq::YW, xyz[2] * pq::YW]);
    let pqlms: Vec<f64> = lms.into_iter().map(pq::oetf).collect();
    LMS_P_TO_ICTCP.transform_slice(&pqlms)
}

/// ICtCp to relative XYZ (D65).
pub fn ictcp_to_xyz(ictcp: &[f64]) -> Vec<f64> {
    let pqlms = ICTCP_TO_LMS_P.transform_slice(ictcp);
    let lms: Vec<f64> = pqlms.into_iter().map(pq::eotf).collect();
    LMS_TO_XYZ.transform_slice(&lms).into_iter().map(|v| v / pq::YW).collect()
}

const CHANNELS: [Channel; 3] = [
    Channel::new("i", 0.0, 1.0),
    Channel::new("ct", -0.5, 0.5).flags(FLG_MIRROR_PERCENT),
    Channel::new("cp", -0.5, 0.5).flags(FLG_MIRROR_PERCENT),
];

/// ICtCp.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ictcp;

impl Space for Ictcp {
    fn name(&self) -> &'static str {
        "ictcp"
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        &["--ictcp", "ictcp"]
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("intensity", "i"), ("tritan", "ct"), ("protan", "cp")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn dynamic_range(&self) -> DynamicRange {
        DynamicRange::Hdr
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        ictcp_to_xyz(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        xyz_to_ictcp(coords)
    }

    fn lab(&self) -> Option<&dyn LabIsh> {
        Some(&Rectangular)
    }
}
