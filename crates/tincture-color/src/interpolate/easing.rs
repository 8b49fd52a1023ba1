//! Easing functions that reshape interpolation progress.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tincture_core::{Error, Result};

/// Solver tolerance for cubic Bezier timing curves.
const EPSILON: f64 = 1e-6;
/// Newton iterations before falling back to bisection.
const NEWTON_STEPS: usize = 8;

/// Progress mapping `[0, 1] -> [0, 1]`.
#[derive(Clone, Default)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)` timing curve.
    CubicBezier(f64, f64, f64, f64),
    /// Midpoint hint: progress at the given fraction maps to `0.5`.
    Hint(f64),
    /// Arbitrary user function.
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

/// `ease`
pub const EASE: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);
/// `ease-in`
pub const EASE_IN: Easing = Easing::CubicBezier(0.42, 0.0, 1.0, 1.0);
/// `ease-out`
pub const EASE_OUT: Easing = Easing::CubicBezier(0.0, 0.0, 0.58, 1.0);
/// `ease-in-out`
pub const EASE_IN_OUT: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);

impl Easing {
    /// Wraps a closure.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Applies the easing to `t`.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(*x1, *y1, *x2, *y2, t),
            Self::Hint(h) => midpoint(t, *h),
            Self::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::CubicBezier(a, b, c, d) => write!(f, "CubicBezier({a}, {b}, {c}, {d})"),
            Self::Hint(h) => write!(f, "Hint({h})"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Easing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "linear" => Self::Linear,
            "ease" => EASE,
            "ease-in" => EASE_IN,
            "ease-out" => EASE_OUT,
            "ease-in-out" => EASE_IN_OUT,
            other => return Err(Error::unknown("easing", other)),
        })
    }
}

/// Midpoint easing. A hint at or beyond either end collapses to zero.
pub fn midpoint(t: f64, h: f64) -> f64 {
    if h <= 0.0 || h >= 1.0 { 0.0 } else { t.powf(0.5f64.ln() / h.ln()) }
}

fn bezier(t: f64, a: f64, b: f64) -> f64 {
    // One axis of a cubic Bezier with fixed end points (0,0) and (1,1).
    let u = 1.0 - t;
    3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
}

fn bezier_slope(t: f64, a: f64, b: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * a + 6.0 * u * t * (b - a) + 3.0 * t * t * (1.0 - b)
}

/// Evaluates a CSS timing curve at `x` in `[0, 1]`.
pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x == 0.0 || x == 1.0 {
        return x;
    }

    let mut t = x;
    for _ in 0..NEWTON_STEPS {
        let err = bezier(t, x1, x2) - x;
        if err.abs() < EPSILON {
            return bezier(t, y1, y2);
        }
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        t -= err / slope;
    }

    let (mut low, mut high) = (0.0, 1.0);
    t = x;
    while high - low > EPSILON {
        let v = bezier(t, x1, x2);
        if (v - x).abs() < EPSILON {
            break;
        }
        if v < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) * 0.5;
    }
    bezier(t, y1, y2)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_linear_curve_is_identity() {
        for x in [0.1, 0.37, 0.5, 0.93] {
            assert_abs_diff_eq!(cubic_bezier(0.0, 0.0, 1.0, 1.0, x), x, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_named_curves() {
        // ease-in starts slow, ease-out starts fast
        assert!(EASE_IN.apply(0.25) < 0.25);
        assert!(EASE_OUT.apply(0.25) > 0.25);
        assert_abs_diff_eq!(EASE_IN_OUT.apply(0.5), 0.5, epsilon = 1e-5);
        assert_eq!("ease".parse::<Easing>().unwrap().apply(1.0), 1.0);
        assert!("bounce".parse::<Easing>().is_err());
    }

    #[test]
    fn test_hint() {
        assert_abs_diff_eq!(midpoint(0.25, 0.25), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(midpoint(0.5, 0.5), 0.5, epsilon = 1e-12);
        assert_eq!(midpoint(0.5, 1.0), 0.0);
    }

    #[test]
    fn test_custom() {
        let square = Easing::custom(|t| t * t);
        assert_eq!(square.apply(0.5), 0.25);
        assert_eq!(format!("{square:?}"), "Custom(..)");
    }
}
