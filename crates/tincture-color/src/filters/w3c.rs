//! W3C Filter Effects Level 1 shorthand filters.

use tincture_core::Result;
use tincture_math::{Mat3, lerp};

use super::{Filter, apply_matrix};
use crate::color::Color;

const SPACES: &[&str] = &["srgb-linear", "srgb"];

/// Which filter effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum W3cKind {
    /// Linear multiplier on every channel.
    Brightness,
    /// Scales around mid gray.
    Contrast,
    /// Desaturates with Rec. 709 weights.
    Grayscale,
    /// Rotates hue by an angle in degrees.
    HueRotate,
    /// Inverts each channel.
    Invert,
    /// Scales alpha.
    Opacity,
    /// Saturation matrix.
    Saturate,
    /// Sepia tone.
    Sepia,
}

impl W3cKind {
    /// Every filter effect.
    pub const ALL: [W3cKind; 8] = [
        Self::Brightness,
        Self::Contrast,
        Self::Grayscale,
        Self::HueRotate,
        Self::Invert,
        Self::Opacity,
        Self::Saturate,
        Self::Sepia,
    ];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Grayscale => "grayscale",
            Self::HueRotate => "hue-rotate",
            Self::Invert => "invert",
            Self::Opacity => "opacity",
            Self::Saturate => "saturate",
            Self::Sepia => "sepia",
        }
    }
}

/// A W3C filter effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct W3cFilter(pub W3cKind);

fn sepia(amount: f64) -> Mat3 {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    Mat3::from_rows([
        [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
        [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
        [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
    ])
}

fn grayscale(amount: f64) -> Mat3 {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    Mat3::from_rows([
        [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
    ])
}

fn saturate(amount: f64) -> Mat3 {
    let a = amount.max(0.0);
    Mat3::from_rows([
        [0.213 + 0.787 * a, 0.715 - 0.715 * a, 0.072 - 0.072 * a],
        [0.213 - 0.213 * a, 0.715 + 0.285 * a, 0.072 - 0.072 * a],
        [0.213 - 0.213 * a, 0.715 - 0.715 * a, 0.072 + 0.928 * a],
    ])
}

fn hue_rotate(degrees: f64) -> Mat3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Mat3::from_rows([
        [0.213 + cos * 0.787 - sin * 0.213, 0.715 - cos * 0.715 - sin * 0.715, 0.072 - cos * 0.072 + sin * 0.928],
        [0.213 - cos * 0.213 + sin * 0.143, 0.715 + cos * 0.285 + sin * 0.140, 0.072 - cos * 0.072 - sin * 0.283],
        [0.213 - cos * 0.213 - sin * 0.787, 0.715 - cos * 0.715 + sin * 0.715, 0.072 + cos * 0.928 + sin * 0.072],
    ])
}

impl Filter for W3cFilter {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn allowed_spaces(&self) -> &[&'static str] {
        SPACES
    }

    fn filter(&self, color: &mut Color, amount: Option<f64>) -> Result<()> {
        match self.0 {
            W3cKind::Sepia => apply_matrix(color, &sepia(amount.unwrap_or(1.0))),
            W3cKind::Grayscale => apply_matrix(color, &grayscale(amount.unwrap_or(1.0))),
            W3cKind::Saturate => apply_matrix(color, &saturate(amount.unwrap_or(1.0))),
            W3cKind::HueRotate => apply_matrix(color, &hue_rotate(amount.unwrap_or(0.0))),
            W3cKind::Invert => {
                let a = amount.unwrap_or(1.0).clamp(0.0, 1.0);
                for v in &mut color.coords_mut()[..3] {
                    *v = lerp(a, 1.0 - a, *v);
                }
            }
            W3cKind::Opacity => {
                let a = amount.unwrap_or(1.0).clamp(0.0, 1.0);
                let alpha = color.alpha();
                color.set_alpha(lerp(0.0, a, alpha));
            }
            W3cKind::Brightness => {
                let a = amount.unwrap_or(1.0).max(0.0);
                for v in &mut color.coords_mut()[..3] {
                    *v *= a;
                }
            }
            W3cKind::Contrast => {
                let a = amount.unwrap_or(1.0).max(0.0);
                let intercept = (1.0 - a) * 0.5;
                for v in &mut color.coords_mut()[..3] {
                    *v = *v * a + intercept;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn run(kind: W3cKind, coords: [f64; 3], amount: Option<f64>) -> Vec<f64> {
        let mut c = Color::new("srgb", &coords, 1.0).unwrap();
        W3cFilter(kind).filter(&mut c, amount).unwrap();
        c.coords().to_vec()
    }

    #[test]
    fn test_zero_amount_is_identity() {
        let src = [0.3, 0.6, 0.9];
        for kind in [W3cKind::Sepia, W3cKind::Grayscale, W3cKind::Invert] {
            let out = run(kind, src, Some(0.0));
            for (a, b) in out.iter().zip(src) {
                assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
            }
        }
        let out = run(W3cKind::HueRotate, src, None);
        for (a, b) in out.iter().zip(src) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invert_and_contrast() {
        assert_eq!(run(W3cKind::Invert, [0.25, 0.5, 1.0], None), vec![0.75, 0.5, 0.0]);
        assert_eq!(run(W3cKind::Invert, [0.2, 0.8, 0.0], Some(0.5)), vec![0.5, 0.5, 0.5]);
        assert_eq!(run(W3cKind::Contrast, [0.2, 0.5, 1.0], Some(0.0)), vec![0.5, 0.5, 0.5]);
        assert_eq!(run(W3cKind::Brightness, [0.2, 0.4, 0.5], Some(2.0)), vec![0.4, 0.8, 1.0]);
    }

    #[test]
    fn test_opacity() {
        let mut c = Color::new("srgb", &[1.0, 0.0, 0.0], 0.8).unwrap();
        W3cFilter(W3cKind::Opacity).filter(&mut c, Some(0.5)).unwrap();
        assert_abs_diff_eq!(c.alpha(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_grayscale_rows_equal() {
        let out = run(W3cKind::Grayscale, [0.1, 0.7, 0.4], None);
        assert_abs_diff_eq!(out[0], out[1], epsilon = 1e-12);
        assert_abs_diff_eq!(out[1], out[2], epsilon = 1e-12);
    }
}
