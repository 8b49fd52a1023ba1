//! Color harmonies.
//!
//! Harmonies rotate hue in a cylindrical space (`oklch` unless told
//! otherwise), except `mono`, which builds tints and shades by
//! interpolating toward white and black.
//!
//! ```rust
//! use tincture_color::Color;
//!
//! let c = Color::new("oklch", &[0.7, 0.1, 40.0], 1.0).unwrap();
//! let triad = c.harmony("triad", None).unwrap();
//! assert_eq!(triad.len(), 3);
//! assert!((triad[1].coords()[2] - 160.0).abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use tincture_core::{Error, Result};
use tincture_math::{constrain_hue, round_half_up};

use crate::color::Color;
use crate::interpolate::{InterpolateOptions, Stop};

/// Tints plus shades generated from black through the color to white.
const MONO_RANGE: usize = 12;
/// Colors a monochromatic harmony returns.
const MONO_STEPS: usize = 5;
/// Metric deciding how the range splits into tints and shades.
const MONO_DELTA_E: &str = "2000";

/// A harmony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Harmony {
    /// Color and its opposite.
    Complement,
    /// Color plus the two neighbours of its complement.
    Split,
    /// Color plus its 30 degree neighbours.
    Analogous,
    /// Three evenly spaced hues.
    Triad,
    /// Four evenly spaced hues.
    Square,
    /// Two complementary pairs 30 degrees apart.
    Rectangle,
    /// Tints and shades of one hue.
    Mono,
}

impl Harmony {
    /// Every harmony.
    pub const ALL: [Harmony; 7] =
        [Self::Complement, Self::Split, Self::Analogous, Self::Triad, Self::Square, Self::Rectangle, Self::Mono];

    /// Harmony name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Complement => "complement",
            Self::Split => "split",
            Self::Analogous => "analogous",
            Self::Triad => "triad",
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Mono => "mono",
        }
    }

    /// Hue offsets after the original color, for the rotating harmonies.
    fn offsets(self) -> &'static [f64] {
        match self {
            Self::Complement => &[180.0],
            Self::Split => &[210.0, -210.0],
            Self::Analogous => &[30.0, -30.0],
            Self::Triad => &[120.0, 240.0],
            Self::Square => &[90.0, 180.0, 270.0],
            Self::Rectangle => &[30.0, 180.0, 210.0],
            Self::Mono => &[],
        }
    }
}

impl fmt::Display for Harmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Harmony {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL.into_iter().find(|h| h.name() == s).ok_or_else(|| Error::unknown("harmony", s))
    }
}

fn hue_index(color: &Color) -> Result<usize> {
    color
        .space_def()
        .cylindrical()
        .map(|c| c.hue_index())
        .ok_or_else(|| Error::config(format!("harmonies need a cylindrical space, '{}' is not one", color.space())))
}

fn rotate(color: &Color, space: &str, offsets: &[f64]) -> Result<Vec<Color>> {
    let base = color.convert(space)?;
    let h = hue_index(&base)?;
    let mut out = vec![color.clone()];
    for offset in offsets {
        let mut c = base.clone();
        c.set_raw(h, constrain_hue(base.raw(h) + offset));
        out.push(c.convert(color.space())?);
    }
    Ok(out)
}

/// Achromatic white or black in `space` with hue and alpha undefined, so
/// they take both from the other end of an interpolation.
fn anchor(color: &Color, space: &str, value: f64, h: usize) -> Result<Color> {
    let mut c = color.sibling("srgb", &[value; 3], 1.0)?.convert(space)?;
    let alpha = c.coords().len();
    c.set_raw(h, f64::NAN);
    c.set_raw(alpha, f64::NAN);
    Ok(c)
}

fn mono(color: &Color, space: &str) -> Result<Vec<Color>> {
    let mut color0 = color.convert(space)?;
    color0.normalize(true)?;
    let h = hue_index(&color0)?;
    let achromatic = color0.raw(h).is_nan();

    let white = anchor(color, space, 1.0, h)?;
    let black = anchor(color, space, 0.0, h)?;
    let db = black.delta_e(&color0, Some(MONO_DELTA_E))?;
    let dw = white.delta_e(&color0, Some(MONO_DELTA_E))?;
    let steps_w = round_half_up(dw / (db + dw) * MONO_RANGE as f64, 0) as usize;
    let steps_b = MONO_RANGE - steps_w;

    let options = InterpolateOptions::new().space(space).out_space(color.space());
    let steps = |a: &Color, b: &Color, n: usize| Color::steps(&[Stop::from(a), Stop::from(b)], &options, n, 1000, 0.0);
    // Shades drop black (unless achromatic) and the repeated color; tints
    // drop white unless achromatic.
    let shades = |v: Vec<Color>| -> Vec<Color> {
        let end = v.len().saturating_sub(1);
        let start = usize::from(!achromatic).min(end);
        v[start..end].to_vec()
    };
    let tints = |mut v: Vec<Color>| -> Vec<Color> {
        if !achromatic {
            v.pop();
        }
        v
    };

    let (left, right) = if steps_b <= 1 {
        let left = if steps_b == 1 { steps(&black, color, 1)? } else { Vec::new() };
        let n = (MONO_RANGE - (1 + steps_b)).min(steps_w);
        (left, tints(steps(&color0, &white, n)?))
    } else if steps_w <= 1 {
        let mut right = if steps_w == 1 { steps(&color0, &white, 1)? } else { Vec::new() };
        right.insert(0, color.clone());
        let n = (MONO_RANGE - (1 + steps_w)).min(steps_b);
        (shades(steps(&black, color, n)?), right)
    } else {
        (shades(steps(&black, color, steps_b)?), tints(steps(&color0, &white, steps_w)?))
    };

    let l = MONO_STEPS / 2;
    let r = l + MONO_STEPS % 2;
    let (len_l, len_r) = (left.len(), right.len());
    let picked = if len_r < r {
        left[len_l.saturating_sub(MONO_STEPS - len_r)..].iter().chain(&right).cloned().collect()
    } else if len_l < l {
        left.iter().chain(&right[..(MONO_STEPS - len_l).min(len_r)]).cloned().collect()
    } else {
        left[len_l - l..].iter().chain(&right[..r]).cloned().collect()
    };
    Ok(picked)
}

impl Color {
    /// The named harmony in `space` (registry default when `None`); the
    /// results are in this color's space.
    pub fn harmony(&self, name: &str, space: Option<&str>) -> Result<Vec<Color>> {
        let harmony: Harmony = name.parse()?;
        let space = space.unwrap_or(self.registry().defaults().harmony_space.as_str());
        match harmony {
            Harmony::Mono => mono(self, space),
            other => rotate(self, space, other.offsets()),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn hues(colors: &[Color]) -> Vec<f64> {
        colors.iter().map(|c| c.convert("oklch").unwrap().coords()[2]).collect()
    }

    #[test]
    fn test_rotations() {
        let c = Color::new("oklch", &[0.6, 0.12, 20.0], 1.0).unwrap();
        let cases: [(&str, &[f64]); 6] = [
            ("complement", &[20.0, 200.0]),
            ("split", &[20.0, 230.0, 170.0]),
            ("analogous", &[20.0, 50.0, 350.0]),
            ("triad", &[20.0, 140.0, 260.0]),
            ("square", &[20.0, 110.0, 200.0, 290.0]),
            ("rectangle", &[20.0, 50.0, 200.0, 230.0]),
        ];
        for (name, expected) in cases {
            let got = hues(&c.harmony(name, None).unwrap());
            assert_eq!(got.len(), expected.len(), "{name}");
            for (a, b) in got.iter().zip(expected) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_results_in_source_space() {
        let c = Color::parse("rebeccapurple").unwrap();
        for h in c.harmony("triad", Some("hsl")).unwrap() {
            assert_eq!(h.space(), "srgb");
        }
    }

    #[test]
    fn test_requires_cylindrical_space() {
        let c = Color::parse("red").unwrap();
        assert!(c.harmony("triad", Some("lab")).is_err());
        assert!(c.harmony("mono", Some("oklab")).is_err());
        assert!(c.harmony("pentad", None).is_err());
    }

    #[test]
    fn test_mono_tints_and_shades() {
        let c = Color::new("oklch", &[0.55, 0.15, 250.0], 1.0).unwrap();
        let mono = c.harmony("mono", None).unwrap();
        assert_eq!(mono.len(), 5);
        let lightness: Vec<f64> = mono.iter().map(|m| m.coords()[0]).collect();
        assert!(lightness.windows(2).all(|w| w[0] < w[1]), "{lightness:?}");
        assert!(mono.iter().any(|m| m.delta_e(&c, Some("2000")).unwrap() < 1e-6));
    }

    #[test]
    fn test_mono_near_white() {
        let c = Color::new("oklch", &[0.98, 0.01, 90.0], 1.0).unwrap();
        let mono = c.harmony("mono", None).unwrap();
        assert_eq!(mono.len(), 5);
        assert!(mono.iter().any(|m| m.delta_e(&c, Some("2000")).unwrap() < 1e-6));
    }
}
