//! Hybrid Log-Gamma (ITU-R BT.2100).
//!
//! A square-root segment for shadows and a log segment for highlights. The
//! display side adds a black level lift `β` derived from the nominal peak
//! (`lw`) and black (`lb`) luminance. Linear values are scaled so an 18%
//! grey card lands near a 38% signal, placing diffuse white at 75%.
//!
//! # Reference
//!
//! ITU-R BT.2100-2, ITU-R BT.2408

use tincture_math::nth_root;

const A: f64 = 0.17883277;
const B: f64 = 0.28466892; // 1 - 4*A
const C: f64 = 0.55991073; // 0.5 - A*ln(4*A)

/// Scale that puts diffuse white at a 75% signal.
pub const SCALE: f64 = 0.26496256042100724;

/// Reference system gamma for a display of peak luminance `lw` (cd/m²).
#[inline]
pub fn system_gamma(lw: f64) -> f64 {
    1.2 + 0.42 * (lw / 1000.0).ln()
}

/// Black level lift `β` for peak `lw` and black `lb` luminance.
#[inline]
pub fn black_level_lift(lw: f64, lb: f64) -> f64 {
    (3.0 * (lb / lw).powf(1.0 / system_gamma(lw))).sqrt()
}

/// Viewing setup for HLG decode and encode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HlgEnv {
    /// Black level lift.
    pub beta: f64,
    /// Linear scale applied before encoding.
    pub scale: f64,
}

impl HlgEnv {
    /// Builds the setup from peak and black luminance.
    pub fn new(lw: f64, lb: f64, scale: f64) -> Self {
        Self { beta: black_level_lift(lw, lb), scale }
    }
}

impl Default for HlgEnv {
    /// 1000 nit peak, zero black, 75% diffuse white.
    fn default() -> Self {
        Self::new(1000.0, 0.0, SCALE)
    }
}

/// HLG OETF: scene linear -> signal (before scaling).
#[inline]
pub fn oetf_with(e: f64, env: &HlgEnv) -> f64 {
    let s = if e <= 1.0 / 12.0 {
        nth_root(3.0 * e, 2.0)
    } else {
        A * (12.0 * e - B).ln() + C
    };
    (s - env.beta) / (1.0 - env.beta)
}

/// HLG inverse OETF: signal -> scene linear (before scaling).
#[inline]
pub fn eotf_with(v: f64, env: &HlgEnv) -> f64 {
    let e = (1.0 - env.beta) * v + env.beta;
    if e <= 0.5 {
        e * e / 3.0
    } else {
        (((e - C) / A).exp() + B) / 12.0
    }
}

/// Relative linear -> signal using the default setup and scale.
///
/// ```rust
/// use tincture_transfer::hlg;
///
/// // Diffuse white lands at 75%
/// assert!((hlg::oetf(1.0) - 0.75).abs() < 0.001);
/// ```
#[inline]
pub fn oetf(l: f64) -> f64 {
    let env = HlgEnv::default();
    oetf_with(l * env.scale, &env)
}

/// Signal -> relative linear using the default setup and scale.
#[inline]
pub fn eotf(v: f64) -> f64 {
    let env = HlgEnv::default();
    eotf_with(v, &env) / env.scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for l in [0.0, 0.05, 0.2, 1.0, 2.5, 3.7] {
            assert!((eotf(oetf(l)) - l).abs() < 1e-9, "l={l}");
        }
    }

    #[test]
    fn test_segments_meet() {
        let env = HlgEnv::default();
        let below = oetf_with(1.0 / 12.0, &env);
        let above = oetf_with(1.0 / 12.0 + 1e-12, &env);
        assert!((below - 0.5).abs() < 1e-9);
        assert!((above - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_black_has_no_lift() {
        assert_eq!(HlgEnv::default().beta, 0.0);
        assert!(black_level_lift(1000.0, 0.005) > 0.0);
    }
}
