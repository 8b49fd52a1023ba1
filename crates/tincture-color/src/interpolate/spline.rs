//! Interpolation over the whole stop sequence.
//!
//! Unlike the piecewise method, undefined values are bridged across stops
//! and hues unwrapped along the sequence, so a cubic's 4-point window sees
//! a continuous path.

use tincture_core::Result;
use tincture_math::{Spline, SplineKind, Vector, interpolate};

use super::{Curve, Interpolate, Layout, backfill_undefined, fix_hue_sequence};

/// Alpha this close to opaque snaps to 1; cubic bases rarely land on it.
const ALPHA_SNAP: f64 = 1e-6;

/// A curve family evaluated across all stops.
///
/// `SplineKind::Linear` registers as `continuous`; the cubic kinds under
/// their own names.
#[derive(Debug, Clone, Copy)]
pub struct Continuous {
    kind: SplineKind,
}

impl Continuous {
    /// Method for the given curve family.
    pub fn new(kind: SplineKind) -> Self {
        Self { kind }
    }

    /// Curve family.
    pub fn kind(&self) -> SplineKind {
        self.kind
    }
}

#[derive(Debug)]
struct SplineCurve {
    spline: Spline,
    legs: usize,
    alpha: usize,
    snap: bool,
}

/// Hue fix-up, bridging of undefined values and premultiplication, in
/// that order.
fn prepare(points: &mut [Vector], layout: &Layout) {
    if let Some(h) = layout.hue {
        fix_hue_sequence(points, h, layout.policy);
    }
    backfill_undefined(points);
    let alpha = layout.alpha();
    for p in points.iter_mut() {
        let a = p[alpha];
        layout.premultiply(p, a);
    }
}

impl Interpolate for Continuous {
    fn name(&self) -> &str {
        match self.kind {
            SplineKind::Linear => "continuous",
            kind => kind.name(),
        }
    }

    fn curve(&self, mut points: Vec<Vector>, layout: &Layout) -> Result<Box<dyn Curve>> {
        prepare(&mut points, layout);
        let legs = points.len().saturating_sub(1).max(1);
        let spline = interpolate(&points, self.kind)?;
        Ok(Box::new(SplineCurve {
            spline,
            legs,
            alpha: layout.alpha(),
            snap: self.kind != SplineKind::Linear,
        }))
    }
}

impl Curve for SplineCurve {
    fn value(&self, leg: usize, channel: usize, t: f64) -> f64 {
        let v = self.spline.at((leg as f64 + t) / self.legs as f64)[channel];
        if self.snap && channel == self.alpha && 1.0 - v < ALPHA_SNAP { 1.0 } else { v }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::interpolate::Hue;

    fn layout() -> Layout {
        Layout { hue: Some(0), policy: Hue::Shorter, angles: vec![true, false], premultiplied: true }
    }

    #[test]
    fn test_names() {
        assert_eq!(Continuous::new(SplineKind::Linear).name(), "continuous");
        assert_eq!(Continuous::new(SplineKind::CatmullRom).name(), "catrom");
    }

    #[test]
    fn test_undefined_bridged() {
        let pts = vec![vec![0.0, 0.0, 1.0], vec![f64::NAN, f64::NAN, 1.0], vec![40.0, 1.0, 1.0]];
        let c = Continuous::new(SplineKind::Linear).curve(pts, &layout()).unwrap();
        // the middle stop gets the midpoint, so the legs form one line
        assert_abs_diff_eq!(c.value(0, 1, 1.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.value(1, 0, 0.0), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hue_unwrapped_across_stops() {
        let pts = vec![vec![300.0, 1.0, 1.0], vec![350.0, 1.0, 1.0], vec![20.0, 1.0, 1.0]];
        let c = Continuous::new(SplineKind::Linear).curve(pts, &layout()).unwrap();
        assert_abs_diff_eq!(c.value(1, 0, 0.5), 365.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alpha_snaps_to_opaque() {
        let pts = vec![vec![0.0, 0.0, 1.0], vec![10.0, 0.5, 1.0], vec![20.0, 1.0, 1.0]];
        let c = Continuous::new(SplineKind::BSpline).curve(pts, &layout()).unwrap();
        assert_eq!(c.value(0, 2, 0.37), 1.0);
    }
}
