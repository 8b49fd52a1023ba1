//! Piecewise cubic splines over sequences of points.
//!
//! [`interpolate`] builds a [`Spline`] through N-dimensional points. Cubic
//! methods need a 4-point neighborhood per segment, so the point list is
//! padded with reflected end points (`2·p0 - p1` and `2·pn - pn-1`). The
//! natural B-spline first solves the `[1 4 1]` tridiagonal system so that the
//! curve passes through the data rather than merely being pulled toward it.
//!
//! Outside `[0, 1]` every method extrapolates linearly along the end segment.

use std::fmt;
use std::str::FromStr;

use crate::linalg::{Matrix, Vector, inv_matrix, matmul};
use crate::scalar::{isclose, lerp};
use tincture_core::{Error, Result};

/// Curve family used between points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplineKind {
    /// Straight segments.
    #[default]
    Linear,
    /// Uniform cubic B-spline (approximating).
    BSpline,
    /// B-spline with control points solved to pass through the data.
    Natural,
    /// Catmull-Rom (interpolating).
    CatmullRom,
    /// Monotone cubic Hermite; never overshoots its segment.
    Monotone,
}

impl SplineKind {
    /// Registered method name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::BSpline => "bspline",
            Self::Natural => "natural",
            Self::CatmullRom => "catrom",
            Self::Monotone => "monotone",
        }
    }

    /// Evaluates one segment from its 4-point neighborhood.
    #[inline]
    pub fn eval(self, p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
        match self {
            Self::Linear => lerp(p1, p2, t),
            Self::BSpline | Self::Natural => bspline(p0, p1, p2, p3, t),
            Self::CatmullRom => catrom(p0, p1, p2, p3, t),
            Self::Monotone => monotone(p0, p1, p2, p3, t),
        }
    }
}

impl fmt::Display for SplineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SplineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "linear" => Self::Linear,
            "bspline" => Self::BSpline,
            "natural" => Self::Natural,
            "catrom" => Self::CatmullRom,
            "monotone" => Self::Monotone,
            other => return Err(Error::unknown("spline", other)),
        })
    }
}

/// Uniform cubic B-spline basis.
#[inline]
pub fn bspline(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    ((1.0 - t).powi(3) * p0
        + (3.0 * t3 - 6.0 * t2 + 4.0) * p1
        + (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) * p2
        + t3 * p3)
        / 6.0
}

/// Catmull-Rom basis.
#[inline]
pub fn catrom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    ((-t3 + 2.0 * t2 - t) * p0
        + (3.0 * t3 - 5.0 * t2 + 2.0) * p1
        + (-3.0 * t3 + 4.0 * t2 + t) * p2
        + (t3 - t2) * p3)
        / 2.0
}

/// Monotone cubic Hermite segment between `p1` and `p2`.
///
/// Tangents start as the mean of adjacent secants, are zeroed at flat
/// segments and local extrema, and are limited to three times the adjacent
/// secants. The result is clamped to `[min(p1,p2), max(p1,p2)]`.
pub fn monotone(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    let s0 = p1 - p0;
    let s1 = p2 - p1;
    let s2 = p3 - p2;

    let mut m1 = (s0 + s1) * 0.5;
    let mut m2 = (s1 + s2) * 0.5;

    let close = |a: f64, b: f64| isclose(a, b, 1e-9, 0.0);
    let same_sign = |a: f64, b: f64| 1f64.copysign(a) == 1f64.copysign(b);

    if close(p1, p2) {
        m1 = 0.0;
        m2 = 0.0;
    } else {
        if close(p0, p1) || !same_sign(s0, s1) {
            m1 = 0.0;
        } else {
            m1 *= (3.0 * s0 / m1).min((3.0 * s1 / m1).min(1.0));
        }
        if close(p2, p3) || !same_sign(s1, s2) {
            m2 = 0.0;
        } else {
            m2 *= (3.0 * s1 / m2).min((3.0 * s2 / m2).min(1.0));
        }
    }

    let result = (m1 + m2 - 2.0 * s1) * t3 + (3.0 * s1 - 2.0 * m1 - m2) * t2 + m1 * t + p1;
    result.clamp(p1.min(p2), p1.max(p2))
}

fn matrix_141(n: usize) -> Result<Matrix> {
    let mut m = vec![vec![0.0; n]; n];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 4.0;
        if i > 0 {
            row[i - 1] = 1.0;
        }
        if i + 1 < n {
            row[i + 1] = 1.0;
        }
    }
    inv_matrix(&m)
}

/// Replaces interior points with B-spline controls that reproduce them.
///
/// Two points are already linear, so nothing changes.
pub fn naturalize_bspline_controls(points: &mut [Vector]) -> Result<()> {
    if points.len() < 3 {
        return Ok(());
    }
    let n = points.len() - 2;

    if n == 1 {
        points[1] = points[1]
            .iter()
            .zip(&points[0])
            .zip(&points[2])
            .map(|((a, b), c)| (a * 6.0 - (b + c)) / 4.0)
            .collect();
        return Ok(());
    }

    let m = matrix_141(n)?;
    let c: Matrix = (1..=n)
        .map(|r| {
            let row = points[r].iter().map(|a| a * 6.0);
            if r == 1 {
                row.zip(&points[0]).map(|(a, b)| a - b).collect()
            } else if r == n {
                row.zip(&points[n + 1]).map(|(a, b)| a - b).collect()
            } else {
                row.collect()
            }
        })
        .collect();

    let controls = matmul(&m, &c)?;
    for (r, ctrl) in controls.into_iter().enumerate() {
        points[r + 1] = ctrl;
    }
    Ok(())
}

/// Spline through a fixed list of N-dimensional points.
#[derive(Debug, Clone)]
pub struct Spline {
    kind: SplineKind,
    /// Channel-major copy of the (padded) points.
    channels: Vec<Vector>,
    length: usize,
}

impl Spline {
    /// Number of data points the spline passes through (or approximates).
    pub fn len(&self) -> usize {
        self.length
    }

    /// True when built from no points.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Curve family.
    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    /// Evaluates the curve at `t`. `t` in `[0, 1]` spans all points.
    pub fn at(&self, t: f64) -> Vector {
        if self.length < 2 {
            return self.channels.iter().map(|c| c.first().copied().unwrap_or(f64::NAN)).collect();
        }
        let n = (self.length - 1) as f64;
        let i = (t * n).floor().clamp(0.0, n - 1.0);
        let local = (t - i / n) * n;
        let linear = self.kind == SplineKind::Linear;
        let i = i as usize + if linear { 0 } else { 1 };

        self.channels
            .iter()
            .map(|c| {
                if linear || !(0.0..=1.0).contains(&t) {
                    lerp(c[i], c[i + 1], local)
                } else {
                    self.kind.eval(c[i - 1], c[i], c[i + 1], c[i + 2], local)
                }
            })
            .collect()
    }

    /// `count` evenly spaced samples over `[0, 1]`.
    pub fn steps(&self, count: usize) -> Vec<Vector> {
        match count {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            n => (0..n).map(|r| self.at(r as f64 / (n - 1) as f64)).collect(),
        }
    }
}

/// Builds a spline of `kind` through `points` (all the same length).
pub fn interpolate(points: &[Vector], kind: SplineKind) -> Result<Spline> {
    let width = points.first().map_or(0, Vec::len);
    if points.iter().any(|p| p.len() != width) {
        return Err(Error::shape("spline points must share one dimension"));
    }

    let mut pts = points.to_vec();
    let length = pts.len();

    if kind == SplineKind::Natural {
        naturalize_bspline_controls(&mut pts)?;
    }

    if kind != SplineKind::Linear && length >= 2 {
        let start = pts[0].iter().zip(&pts[1]).map(|(a, b)| 2.0 * a - b).collect();
        let end = pts[length - 1].iter().zip(&pts[length - 2]).map(|(a, b)| 2.0 * a - b).collect();
        pts.insert(0, start);
        pts.push(end);
    }

    let channels = (0..width).map(|c| pts.iter().map(|p| p[c]).collect()).collect();
    Ok(Spline { kind, channels, length })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts() -> Vec<Vector> {
        vec![vec![0.0, 0.0], vec![1.0, 2.0], vec![2.0, 1.0], vec![3.0, 3.0]]
    }

    #[test]
    fn test_interpolating_methods_hit_points() {
        for kind in [SplineKind::Linear, SplineKind::Natural, SplineKind::CatmullRom, SplineKind::Monotone] {
            let s = interpolate(&pts(), kind).unwrap();
            for (i, p) in pts().iter().enumerate() {
                let v = s.at(i as f64 / 3.0);
                assert!((v[0] - p[0]).abs() < 1e-9, "{kind} x at {i}");
                assert!((v[1] - p[1]).abs() < 1e-9, "{kind} y at {i}");
            }
        }
    }

    #[test]
    fn test_bspline_ends_pinned() {
        let s = interpolate(&pts(), SplineKind::BSpline).unwrap();
        let start = s.at(0.0);
        let end = s.at(1.0);
        assert!((start[1] - 0.0).abs() < 1e-9);
        assert!((end[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotone_no_overshoot() {
        let s = interpolate(&[vec![0.0], vec![1.0], vec![1.0], vec![5.0]], SplineKind::Monotone).unwrap();
        for v in s.steps(31) {
            assert!(v[0] >= 0.0 && v[0] <= 5.0);
        }
        // flat middle segment stays flat
        let mid = s.at(0.5)[0];
        assert!((mid - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extrapolates_linearly() {
        let s = interpolate(&[vec![0.0], vec![10.0]], SplineKind::CatmullRom).unwrap();
        assert!((s.at(1.5)[0] - 15.0).abs() < 1e-9);
        assert!((s.at(-0.5)[0] + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!("catrom".parse::<SplineKind>().unwrap(), SplineKind::CatmullRom);
        assert!("cubic".parse::<SplineKind>().is_err());
        assert_eq!(SplineKind::Natural.to_string(), "natural");
    }
}
