//! Luminance/chromaticity splitting.
//!
//! Colors can be taken apart into a chromaticity pair plus luminance in
//! CIE 1931 xy, CIE 1960 uv or CIE 1976 u'v', and rebuilt from one.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tincture_core::{Error, Result};
use tincture_math::vec3;
use tincture_primaries::{uv_1960_to_xy, uv_to_xy, xy_to_uv, xy_to_uv_1960, xy_to_xyz, xyz_to_xyy};

use crate::color::Color;
use crate::registry::Registry;
use crate::space::{ROOT, Xy};

/// A chromaticity diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chromaticity {
    /// CIE 1931 xy.
    Xy1931,
    /// CIE 1960 UCS uv.
    Uv1960,
    /// CIE 1976 UCS u'v'.
    #[default]
    Uv1976,
}

impl Chromaticity {
    /// Diagram name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Xy1931 => "xy-1931",
            Self::Uv1960 => "uv-1960",
            Self::Uv1976 => "uv-1976",
        }
    }

    /// xy to this diagram.
    pub fn from_xy(self, xy: Xy) -> [f64; 2] {
        match self {
            Self::Xy1931 => xy,
            Self::Uv1960 => xy_to_uv_1960(xy),
            Self::Uv1976 => xy_to_uv(xy),
        }
    }

    /// This diagram to xy.
    pub fn to_xy(self, pair: [f64; 2]) -> Xy {
        match self {
            Self::Xy1931 => pair,
            Self::Uv1960 => uv_1960_to_xy(pair),
            Self::Uv1976 => uv_to_xy(pair),
        }
    }
}

impl fmt::Display for Chromaticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chromaticity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xy-1931" => Ok(Self::Xy1931),
            "uv-1960" => Ok(Self::Uv1960),
            "uv-1976" => Ok(Self::Uv1976),
            "xyz" => Err(Error::config("XYZ is not a luminance-chromaticity space")),
            other => Err(Error::unknown("chromaticity", other)),
        }
    }
}

/// Max normalization; with a negative minimum, min/max normalization.
pub fn rgb_scale(rgb: &[f64]) -> Vec<f64> {
    let low = rgb.iter().copied().fold(f64::INFINITY, f64::min);
    let shifted: Vec<f64> = if low < 0.0 { rgb.iter().map(|v| v - low).collect() } else { rgb.to_vec() };
    let high = shifted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if high == 0.0 { shifted } else { shifted.iter().map(|v| v / high).collect() }
}

impl Color {
    /// Chromaticity pair and luminance `[a, b, Y]`, relative to `white`
    /// (the color space's white when `None`).
    pub fn split_chromaticity(&self, kind: Chromaticity, white: Option<Xy>) -> Result<[f64; 3]> {
        let white = white.unwrap_or(self.white());
        let xyz = self.convert(ROOT)?;
        let adapted = self.registry().chromatic_adaptation(xyz.white(), white, &xyz.coords_resolved(), None)?;
        let [x, y, big_y] = xyz_to_xyy(adapted, white);
        let [a, b] = kind.from_xy([x, y]);
        Ok([a, b, big_y])
    }

    /// Builds a color in `space` from `[a, b]` or `[a, b, Y]` (Y defaults
    /// to 1), relative to the white of `space`.
    ///
    /// With `scale`, the result is max-normalized in that RGB space first,
    /// which gives a viewable color when the luminance is only nominal.
    pub fn from_chromaticity(space: &str, coords: &[f64], kind: Chromaticity, scale: Option<&str>) -> Result<Color> {
        Self::from_chromaticity_in(Registry::global(), space, coords, kind, scale)
    }

    /// [`Color::from_chromaticity`] under `registry`.
    pub fn from_chromaticity_in(
        registry: &Arc<Registry>,
        space: &str,
        coords: &[f64],
        kind: Chromaticity,
        scale: Option<&str>,
    ) -> Result<Color> {
        let (pair, big_y) = match *coords {
            [a, b] => ([a, b], 1.0),
            [a, b, y] => ([a, b], y),
            _ => return Err(Error::shape(format!("expected 2 or 3 chromaticity values, got {}", coords.len()))),
        };
        let white = registry.space(space)?.white();
        let root = registry.space(ROOT)?.white();
        let xyz = xy_to_xyz(kind.to_xy(pair), big_y);
        let adapted = registry.chromatic_adaptation(white, root, &xyz, None)?;
        let mut color = Color::new_in(registry, ROOT, &adapted, 1.0)?;

        if let Some(rgb) = scale {
            if registry.space(rgb)?.rgb().is_some() {
                color = color.convert(rgb)?;
                let scaled = rgb_scale(&vec3(color.coords()));
                color.coords_mut().copy_from_slice(&scaled);
            }
        }
        if color.space() != space {
            color = color.convert(space)?;
        }
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tincture_primaries::D65;

    use super::*;

    #[test]
    fn test_white_is_d65() {
        let white = Color::parse("white").unwrap();
        let [x, y, big_y] = white.split_chromaticity(Chromaticity::Xy1931, None).unwrap();
        assert_abs_diff_eq!(x, D65[0], epsilon = 1e-6);
        assert_abs_diff_eq!(y, D65[1], epsilon = 1e-6);
        assert_abs_diff_eq!(big_y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let c = Color::new("srgb", &[0.8, 0.3, 0.1], 1.0).unwrap();
        for kind in [Chromaticity::Xy1931, Chromaticity::Uv1960, Chromaticity::Uv1976] {
            let split = c.split_chromaticity(kind, None).unwrap();
            let back = Color::from_chromaticity("srgb", &split, kind, None).unwrap();
            for (a, b) in back.coords().iter().zip(c.coords()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_scaled() {
        let d65 = Chromaticity::Uv1976.from_xy(D65);
        let c = Color::from_chromaticity("srgb-linear", &[d65[0], d65[1], 0.2], Chromaticity::Uv1976, Some("srgb-linear"))
            .unwrap();
        for v in c.coords() {
            assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_rgb_scale() {
        assert_eq!(rgb_scale(&[0.5, 0.25, 0.0]), vec![1.0, 0.5, 0.0]);
        assert_eq!(rgb_scale(&[-1.0, 0.0, 1.0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(rgb_scale(&[0.0; 3]), vec![0.0; 3]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("uv-1960".parse::<Chromaticity>().unwrap(), Chromaticity::Uv1960);
        assert!("xyz".parse::<Chromaticity>().is_err());
        assert!(Color::from_chromaticity("srgb", &[0.3], Chromaticity::Xy1931, None).is_err());
    }
}
