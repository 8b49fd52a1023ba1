//! Reference values for the transfer curves.
//!
//! Values come from the published formulas evaluated at full precision.

use approx::assert_relative_eq;
use tincture_transfer::{gamma, hlg, pq, rec2020, srgb};

// ============================================================================
// sRGB
// ============================================================================

/// (encoded, linear)
const SRGB_REFERENCE: &[(f64, f64)] = &[
    (0.0, 0.0),
    (0.04045, 0.0031308049535603713),
    (0.2, 0.033104766570885055),
    (0.5, 0.21404114048223255),
    (0.8, 0.6038273388553378),
    (1.0, 1.0),
];

#[test]
fn srgb_reference_values() {
    for &(enc, lin) in SRGB_REFERENCE {
        assert_relative_eq!(srgb::eotf(enc), lin, max_relative = 1e-9, epsilon = 1e-15);
        assert_relative_eq!(srgb::oetf(lin), enc, max_relative = 1e-9, epsilon = 1e-15);
    }
}

#[test]
fn srgb_slices_match_scalars() {
    let enc = [0.1, 0.5, -0.3];
    let lin = srgb::eotf_slice(&enc);
    for (l, e) in lin.iter().zip(enc) {
        assert_eq!(*l, srgb::eotf(e));
    }
    assert_eq!(srgb::oetf_slice(&lin).len(), 3);
}

// ============================================================================
// HDR
// ============================================================================

#[test]
fn pq_reference_white() {
    // 203 nits encodes to roughly 58% signal
    assert_relative_eq!(pq::oetf(pq::YW), 0.5806888810416109, max_relative = 1e-9);
}

#[test]
fn hlg_is_monotonic() {
    let mut prev = f64::NEG_INFINITY;
    for i in 0..=100 {
        let v = hlg::oetf(i as f64 / 25.0);
        assert!(v > prev);
        prev = v;
    }
}

// ============================================================================
// Mirrored curves
// ============================================================================

#[test]
fn all_sdr_curves_mirror_negatives() {
    let curves: &[(fn(f64) -> f64, fn(f64) -> f64)] = &[
        (srgb::eotf, srgb::oetf),
        (rec2020::eotf, rec2020::oetf),
        (gamma::a98_eotf, gamma::a98_oetf),
        (gamma::prophoto_eotf, gamma::prophoto_oetf),
    ];
    for &(dec, enc) in curves {
        for v in [0.001, 0.3, 0.9, 1.4] {
            assert_eq!(dec(-v), -dec(v));
            assert_eq!(enc(-v), -enc(v));
            assert_relative_eq!(enc(dec(-v)), -v, max_relative = 1e-12);
        }
    }
}
