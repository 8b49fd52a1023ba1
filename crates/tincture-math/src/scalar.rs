//! Scalar helpers for color math.
//!
//! Several perceptual formulas are odd-symmetric: they raise a signed value
//! to a fractional power and expect the sign to survive. [`spow`] and
//! [`nth_root`] implement that as `copysign(|x|^p, x)`.
//!
//! # Usage
//!
//! ```rust
//! use tincture_math::{lerp, nth_root, round_half_up, spow};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert!((nth_root(-8.0, 3.0) + 2.0).abs() < 1e-12);
//! assert!((spow(-4.0, 0.5) + 2.0).abs() < 1e-12);
//! assert_eq!(round_half_up(2.5, 0), 3.0);
//! ```

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
///
/// # Example
///
/// ```rust
/// use tincture_math::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
/// assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
/// ```
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse linear interpolation. Returns 0 for an empty interval.
///
/// ```rust
/// use tincture_math::ilerp;
///
/// assert_eq!(ilerp(0.0, 10.0, 5.0), 0.5);
/// assert_eq!(ilerp(3.0, 3.0, 5.0), 0.0);
/// ```
#[inline]
pub fn ilerp(a: f64, b: f64, value: f64) -> f64 {
    zdiv(value - a, b - a)
}

/// Division that yields 0 when the divisor is 0.
#[inline]
pub fn zdiv(a: f64, b: f64) -> f64 {
    if b == 0.0 { 0.0 } else { a / b }
}

/// Clamps to optional bounds. NaN is returned unchanged.
///
/// ```rust
/// use tincture_math::clamp;
///
/// assert_eq!(clamp(-0.5, Some(0.0), Some(1.0)), 0.0);
/// assert_eq!(clamp(7.0, Some(0.0), None), 7.0);
/// ```
#[inline]
pub fn clamp(value: f64, low: Option<f64>, high: Option<f64>) -> f64 {
    let mut v = value;
    if let Some(lo) = low {
        if v < lo {
            v = lo;
        }
    }
    if let Some(hi) = high {
        if v > hi {
            v = hi;
        }
    }
    v
}

/// Sign function: -1, 0 or 1. NaN stays NaN.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x.is_nan() {
        x
    } else if x < 0.0 {
        -1.0
    } else if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Sign-preserving power: `copysign(|base|^exp, base)`.
#[inline]
pub fn spow(base: f64, exp: f64) -> f64 {
    base.abs().powf(exp).copysign(base)
}

/// Alias of [`spow`], named after the array routine it mirrors.
#[inline]
pub fn npow(base: f64, exp: f64) -> f64 {
    spow(base, exp)
}

/// Sign-preserving `p`th root. `nth_root(0, p) == 0`.
#[inline]
pub fn nth_root(n: f64, p: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    n.abs().powf(1.0 / p).copysign(n)
}

/// Sign-preserving cube root.
#[inline]
pub fn cbrt(n: f64) -> f64 {
    n.cbrt()
}

/// Order of magnitude: `floor(log10(|x|))`, 0 for 0.
#[inline]
pub fn order(x: f64) -> i32 {
    if x == 0.0 {
        return 0;
    }
    x.abs().log10().floor() as i32
}

/// Rounds halves toward positive infinity at `scale` decimal places.
///
/// This is not banker's rounding: `2.5 -> 3`, `3.5 -> 4`, `-2.5 -> -2`.
#[inline]
pub fn round_half_up(n: f64, scale: i32) -> f64 {
    if scale >= 0 {
        let mult = 10f64.powi(scale);
        (n * mult + 0.5).floor() / mult
    } else {
        let div = 10f64.powi(-scale);
        (n / div + 0.5).floor() * div
    }
}

/// Rounds to `precision` significant places the way serialization expects.
///
/// `None` keeps full precision. Otherwise the whole-number digits consume
/// part of the precision budget; a value with more whole digits than the
/// budget is truncated to its integer part first.
pub fn round_to(f: f64, precision: Option<i32>) -> f64 {
    let Some(p) = precision else {
        return f;
    };
    if p == 0 {
        return round_half_up(f, 0);
    }
    if !f.is_finite() {
        return f;
    }
    let whole = f.trunc();
    let digits = if whole == 0.0 {
        0
    } else {
        whole.abs().log10() as i32 + 1
    };
    round_half_up(if digits > p { whole } else { f }, p - digits)
}

/// Approximate equality with relative and absolute tolerance.
///
/// NaN equals NaN here, matching how undefined channels compare.
#[inline]
pub fn isclose(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return true;
    }
    (a - b).abs() <= (rel_tol * a.abs().max(b.abs())).max(abs_tol)
}

/// Replaces NaN with 0.
#[inline]
pub fn no_nan(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x }
}

/// Wraps a hue into `[0, 360)`. NaN is preserved.
#[inline]
pub fn constrain_hue(h: f64) -> f64 {
    let v = h.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if v >= 360.0 { 0.0 } else { v }
}

/// Rectangular `(a, b)` to polar `(chroma, hue in degrees)`.
#[inline]
pub fn rect_to_polar(a: f64, b: f64) -> (f64, f64) {
    let c = a.hypot(b);
    let h = constrain_hue(b.atan2(a).to_degrees());
    (c, h)
}

/// Polar `(chroma, hue in degrees)` to rectangular `(a, b)`.
#[inline]
pub fn polar_to_rect(c: f64, h: f64) -> (f64, f64) {
    let r = h.to_radians();
    (c * r.cos(), c * r.sin())
}

/// `count` evenly spaced values over `[start, stop]`.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Values from `start` (inclusive) to `stop` (exclusive) by `step`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if step == 0.0 {
        return out;
    }
    let count = ((stop - start) / step).ceil();
    if count <= 0.0 {
        return out;
    }
    for i in 0..count as usize {
        out.push(start + step * i as f64);
    }
    out
}
