//! Contrast between two colors.
//!
//! | Name | Measure |
//! |------|---------|
//! | `wcag21` | WCAG 2.1 relative-luminance ratio, 1 to 21 |
//! | `lstar` | CIE L* difference, as used by HCT tonal palettes |

use std::fmt;
use std::sync::Arc;

use tincture_core::Result;
use tincture_math::no_nan;

use crate::color::Color;

/// A contrast method.
pub trait Contrast: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// Contrast between the two colors; symmetric in its arguments.
    fn contrast(&self, color1: &Color, color2: &Color) -> Result<f64>;
}

/// Built-in contrast methods.
pub fn builtin() -> Vec<Arc<dyn Contrast>> {
    vec![Arc::new(Wcag21), Arc::new(Lstar)]
}

/// WCAG 2.1 contrast ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wcag21;

impl Contrast for Wcag21 {
    fn name(&self) -> &str {
        "wcag21"
    }

    fn contrast(&self, color1: &Color, color2: &Color) -> Result<f64> {
        let a = color1.luminance(None)?.max(0.0);
        let b = color2.luminance(None)?.max(0.0);
        let (dark, light) = if a > b { (b, a) } else { (a, b) };
        Ok((light + 0.05) / (dark + 0.05))
    }
}

/// Difference in CIE L* (D65).
#[derive(Debug, Clone, Copy, Default)]
pub struct Lstar;

impl Contrast for Lstar {
    fn name(&self) -> &str {
        "lstar"
    }

    fn contrast(&self, color1: &Color, color2: &Color) -> Result<f64> {
        let l1 = no_nan(color1.get("lch-d65.lightness")?);
        let l2 = no_nan(color2.get("lch-d65.lightness")?);
        Ok((l1 - l2).abs())
    }
}

impl Color {
    /// Contrast against `other` with the named method (registry default
    /// when `None`).
    pub fn contrast(&self, other: &Color, method: Option<&str>) -> Result<f64> {
        let method = method.unwrap_or(self.registry().defaults().contrast.as_str());
        let c = self.registry().contrast(method)?.clone();
        c.contrast(self, other)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_wcag_black_white() {
        let white = Color::parse("white").unwrap();
        let black = Color::parse("black").unwrap();
        assert_abs_diff_eq!(white.contrast(&black, None).unwrap(), 21.0, epsilon = 1e-6);
        assert_abs_diff_eq!(black.contrast(&white, Some("wcag21")).unwrap(), 21.0, epsilon = 1e-6);
        assert_abs_diff_eq!(white.contrast(&white, None).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lstar_symmetric() {
        let a = Color::new("lch-d65", &[30.0, 20.0, 40.0], 1.0).unwrap();
        let b = Color::new("lch-d65", &[75.0, 0.0, f64::NAN], 1.0).unwrap();
        assert_abs_diff_eq!(a.contrast(&b, Some("lstar")).unwrap(), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.contrast(&a, Some("lstar")).unwrap(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_method() {
        let a = Color::parse("red").unwrap();
        assert!(a.contrast(&a, Some("apca")).is_err());
    }
}
