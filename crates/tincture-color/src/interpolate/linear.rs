//! Piecewise linear interpolation (CSS `color-mix()` semantics).

use tincture_core::Result;
use tincture_math::{Vector, lerp};

use super::{Curve, Interpolate, Layout};

/// Straight legs between adjacent stops.
///
/// Each leg is prepared on its own: hues are fixed up per pair, and an
/// undefined value takes the other end's value for the whole leg.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

#[derive(Debug)]
struct Legs(Vec<(Vector, Vector)>);

impl Interpolate for Linear {
    fn name(&self) -> &str {
        "linear"
    }

    fn curve(&self, points: Vec<Vector>, layout: &Layout) -> Result<Box<dyn Curve>> {
        let alpha = layout.alpha();
        let legs = points
            .windows(2)
            .map(|pair| {
                let (mut a, mut b) = (pair[0].clone(), pair[1].clone());
                if let Some(h) = layout.hue {
                    (a[h], b[h]) = layout.policy.adjust(a[h], b[h]);
                }
                // An undefined alpha borrows the other end's for premultiplying.
                let (aa, ba) = (a[alpha], b[alpha]);
                layout.premultiply(&mut a, if aa.is_nan() { ba } else { aa });
                layout.premultiply(&mut b, if ba.is_nan() { aa } else { ba });
                (a, b)
            })
            .collect();
        Ok(Box::new(Legs(legs)))
    }
}

impl Curve for Legs {
    fn value(&self, leg: usize, channel: usize, t: f64) -> f64 {
        let (a, b) = &self.0[leg];
        let (x, y) = (a[channel], b[channel]);
        match (x.is_nan(), y.is_nan()) {
            (true, true) => f64::NAN,
            (true, false) => y,
            (false, true) => x,
            (false, false) => lerp(x, y, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::Hue;

    fn layout(hue: Option<usize>) -> Layout {
        Layout { hue, policy: Hue::Shorter, angles: vec![false, false, hue == Some(2)], premultiplied: true }
    }

    #[test]
    fn test_undefined_per_leg() {
        let pts = vec![vec![0.0, f64::NAN, f64::NAN, 1.0], vec![1.0, 0.4, f64::NAN, 1.0]];
        let c = Linear.curve(pts, &layout(None)).unwrap();
        assert_eq!(c.value(0, 0, 0.5), 0.5);
        assert_eq!(c.value(0, 1, 0.1), 0.4);
        assert!(c.value(0, 2, 0.5).is_nan());
    }

    #[test]
    fn test_hue_fixed_per_leg() {
        let pts = vec![vec![50.0, 20.0, 350.0, 1.0], vec![50.0, 20.0, 10.0, 1.0], vec![50.0, 20.0, 100.0, 1.0]];
        let c = Linear.curve(pts, &layout(Some(2))).unwrap();
        assert_eq!(c.value(0, 2, 0.5), 360.0);
        // the second leg starts from the wrapped hue, not from 370
        assert_eq!(c.value(1, 2, 0.0), 10.0);
    }

    #[test]
    fn test_undefined_alpha_mirrors() {
        let pts = vec![vec![1.0, 1.0, 1.0, f64::NAN], vec![0.0, 0.0, 0.0, 0.5]];
        let c = Linear.curve(pts, &layout(None)).unwrap();
        assert_eq!(c.value(0, 0, 0.0), 0.5);
        assert_eq!(c.value(0, 3, 0.0), 0.5);
    }
}
