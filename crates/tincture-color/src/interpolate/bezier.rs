//! Bezier interpolation: the stops are the control polygon of one curve.

use tincture_core::Result;
use tincture_math::Vector;

use super::{Curve, Interpolate, Layout, fix_hue_sequence};

/// One Bezier curve of degree `n - 1` over `n` stops.
///
/// Only the end stops lie on the curve. Stop positions still map progress
/// onto the curve parameter leg by leg.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bezier;

#[derive(Debug)]
struct BezierCurve {
    points: Vec<Vector>,
    row: Vec<f64>,
    legs: usize,
}

/// Row `n` of Pascal's triangle.
fn binomial_row(n: usize) -> Vec<f64> {
    let mut row = vec![1.0];
    for _ in 0..n {
        let mut next = Vec::with_capacity(row.len() + 1);
        next.push(1.0);
        next.extend(row.windows(2).map(|w| w[0] + w[1]));
        next.push(1.0);
        row = next;
    }
    row
}

/// Undefined control values copy the next defined one, or the previous at
/// the tail.
fn fill_nearest(points: &mut [Vector]) {
    let Some(width) = points.first().map(Vec::len) else { return };
    for ch in 0..width {
        let mut next = f64::NAN;
        for i in (0..points.len()).rev() {
            if points[i][ch].is_nan() {
                points[i][ch] = next;
            } else {
                next = points[i][ch];
            }
        }
        let mut prev = f64::NAN;
        for p in points.iter_mut() {
            if p[ch].is_nan() {
                p[ch] = prev;
            } else {
                prev = p[ch];
            }
        }
    }
}

impl Interpolate for Bezier {
    fn name(&self) -> &str {
        "bezier"
    }

    fn curve(&self, mut points: Vec<Vector>, layout: &Layout) -> Result<Box<dyn Curve>> {
        if let Some(h) = layout.hue {
            fix_hue_sequence(&mut points, h, layout.policy);
        }
        fill_nearest(&mut points);
        let alpha = layout.alpha();
        for p in points.iter_mut() {
            let a = p[alpha];
            layout.premultiply(p, a);
        }
        let n = points.len().saturating_sub(1);
        Ok(Box::new(BezierCurve { row: binomial_row(n), legs: n.max(1), points }))
    }
}

impl Curve for BezierCurve {
    fn value(&self, leg: usize, channel: usize, t: f64) -> f64 {
        let g = (leg as f64 + t) / self.legs as f64;
        let n = self.points.len() - 1;
        let u = 1.0 - g;
        self.points
            .iter()
            .zip(&self.row)
            .enumerate()
            .map(|(j, (p, k))| k * u.powi((n - j) as i32) * g.powi(j as i32) * p[channel])
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::interpolate::Hue;

    #[test]
    fn test_binomial_row() {
        assert_eq!(binomial_row(0), vec![1.0]);
        assert_eq!(binomial_row(4), vec![1.0, 4.0, 6.0, 4.0, 1.0]);
    }

    #[test]
    fn test_quadratic_midpoint() {
        let layout = Layout { hue: None, policy: Hue::Shorter, angles: vec![false], premultiplied: false };
        let pts = vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![0.0, 1.0]];
        let c = Bezier.curve(pts, &layout).unwrap();
        // B(0.5) = 0.25·0 + 0.5·1 + 0.25·0; leg 0 ends at the curve midpoint
        assert_abs_diff_eq!(c.value(0, 0, 1.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.value(1, 0, 1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fill_nearest() {
        let mut pts = vec![vec![f64::NAN], vec![3.0], vec![f64::NAN], vec![5.0], vec![f64::NAN]];
        fill_nearest(&mut pts);
        let got: Vec<f64> = pts.iter().map(|p| p[0]).collect();
        assert_eq!(got, vec![3.0, 3.0, 5.0, 5.0, 5.0]);
    }
}
