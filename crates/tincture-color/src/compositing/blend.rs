//! W3C blend modes.
//!
//! Separable modes blend each channel independently. The four
//! non-separable modes (`hue`, `saturation`, `color`, `luminosity`) work on
//! the whole RGB triple through luminosity and saturation helpers.

use std::fmt;
use std::str::FromStr;

use tincture_core::{Error, Result};

/// A blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// The source color.
    #[default]
    Normal,
    /// `cb * cs`
    Multiply,
    /// `cb + cs - cb * cs`
    Screen,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Brightens the backdrop toward the source.
    ColorDodge,
    /// Darkens the backdrop toward the source.
    ColorBurn,
    /// Multiply or screen depending on the backdrop.
    Overlay,
    /// `|cb - cs|`
    Difference,
    /// `cb + cs - 2 * cb * cs`
    Exclusion,
    /// Multiply or screen depending on the source.
    HardLight,
    /// Soft version of hard light.
    SoftLight,
    /// Source hue with backdrop saturation and luminosity.
    Hue,
    /// Source saturation with backdrop hue and luminosity.
    Saturation,
    /// Backdrop hue and saturation with source luminosity.
    Luminosity,
    /// Source hue and saturation with backdrop luminosity.
    Color,
}

impl BlendMode {
    /// Every mode.
    pub const ALL: [BlendMode; 16] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::Overlay,
        Self::Difference,
        Self::Exclusion,
        Self::HardLight,
        Self::SoftLight,
        Self::Hue,
        Self::Saturation,
        Self::Luminosity,
        Self::Color,
    ];

    /// CSS name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::Overlay => "overlay",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Luminosity => "luminosity",
            Self::Color => "color",
        }
    }

    /// True for the modes that blend each channel on its own.
    pub fn is_separable(self) -> bool {
        !matches!(self, Self::Hue | Self::Saturation | Self::Luminosity | Self::Color)
    }

    /// Blends backdrop `cb` with source `cs`.
    pub fn blend(self, cb: [f64; 3], cs: [f64; 3]) -> [f64; 3] {
        match self {
            Self::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
            Self::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
            Self::Luminosity => set_lum(cb, lum(cs)),
            Self::Color => set_lum(cs, lum(cb)),
            _ => std::array::from_fn(|i| self.channel(cb[i], cs[i])),
        }
    }

    /// One channel of a separable mode; non-separable modes return `cs`.
    pub fn channel(self, cb: f64, cs: f64) -> f64 {
        match self {
            Self::Multiply => cb * cs,
            Self::Screen => screen(cb, cs),
            Self::Darken => cb.min(cs),
            Self::Lighten => cb.max(cs),
            Self::ColorDodge => {
                if cb == 0.0 {
                    0.0
                } else if cs == 1.0 {
                    1.0
                } else {
                    (cb / (1.0 - cs)).min(1.0)
                }
            }
            Self::ColorBurn => {
                if cb == 1.0 {
                    1.0
                } else if cs == 0.0 {
                    0.0
                } else {
                    1.0 - ((1.0 - cb) / cs).min(1.0)
                }
            }
            Self::Overlay => Self::HardLight.channel(cs, cb),
            Self::Difference => (cb - cs).abs(),
            Self::Exclusion => cb + cs - 2.0 * cb * cs,
            Self::HardLight => {
                if cs <= 0.5 {
                    cb * cs * 2.0
                } else {
                    screen(cb, 2.0 * cs - 1.0)
                }
            }
            Self::SoftLight => {
                if cs <= 0.5 {
                    cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
                } else {
                    let d = if cb <= 0.25 { ((16.0 * cb - 12.0) * cb + 4.0) * cb } else { cb.sqrt() };
                    cb + (2.0 * cs - 1.0) * (d - cb)
                }
            }
            _ => cs,
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL.into_iter().find(|m| m.name() == s).ok_or_else(|| Error::unknown("blend mode", s))
    }
}

fn screen(cb: f64, cs: f64) -> f64 {
    cb + cs - cb * cs
}

/// Luminosity with the W3C (Rec. 601) weights.
pub fn lum(rgb: [f64; 3]) -> f64 {
    0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2]
}

/// Pulls out-of-range channels toward the luminosity until all fit.
pub fn clip_color(rgb: [f64; 3]) -> [f64; 3] {
    let l = lum(rgb);
    let n = rgb[0].min(rgb[1]).min(rgb[2]);
    let x = rgb[0].max(rgb[1]).max(rgb[2]);
    let mut out = rgb;
    if n < 0.0 {
        out = out.map(|c| l + (c - l) * l / (l - n));
    }
    if x > 1.0 {
        out = out.map(|c| l + (c - l) * (1.0 - l) / (x - l));
    }
    out
}

/// Shifts every channel so the luminosity becomes `l`, then clips.
pub fn set_lum(rgb: [f64; 3], l: f64) -> [f64; 3] {
    let d = l - lum(rgb);
    clip_color(rgb.map(|c| c + d))
}

/// Saturation: max minus min.
pub fn sat(rgb: [f64; 3]) -> f64 {
    rgb[0].max(rgb[1]).max(rgb[2]) - rgb[0].min(rgb[1]).min(rgb[2])
}

/// Rescales so the saturation becomes `s`, keeping channel order.
pub fn set_sat(rgb: [f64; 3], s: f64) -> [f64; 3] {
    let mut idx = [0usize, 1, 2];
    idx.sort_by(|&a, &b| rgb[a].total_cmp(&rgb[b]));
    let [lo, mid, hi] = idx;
    let mut out = [0.0; 3];
    if rgb[hi] > rgb[lo] {
        out[mid] = (rgb[mid] - rgb[lo]) * s / (rgb[hi] - rgb[lo]);
        out[hi] = s;
    }
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_separable_channels() {
        assert_eq!(BlendMode::Multiply.channel(0.5, 0.5), 0.25);
        assert_eq!(BlendMode::Screen.channel(0.5, 0.5), 0.75);
        assert_eq!(BlendMode::ColorDodge.channel(0.0, 0.7), 0.0);
        assert_eq!(BlendMode::ColorDodge.channel(0.5, 1.0), 1.0);
        assert_eq!(BlendMode::ColorBurn.channel(0.5, 0.0), 0.0);
        // overlay is hard light with the layers swapped
        assert_eq!(BlendMode::Overlay.channel(0.2, 0.9), BlendMode::HardLight.channel(0.9, 0.2));
        assert_abs_diff_eq!(BlendMode::SoftLight.channel(0.16, 1.0), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_set_sat_keeps_order() {
        let out = set_sat([0.2, 0.8, 0.5], 0.3);
        assert_eq!(out[0], 0.0);
        assert_abs_diff_eq!(out[1], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(out[2], 0.15, epsilon = 1e-12);
        assert_eq!(set_sat([0.4, 0.4, 0.4], 0.5), [0.0; 3]);
    }

    #[test]
    fn test_set_lum_clips_into_range() {
        let out = set_lum([1.0, 0.0, 0.0], 0.9);
        assert!(out.iter().all(|c| (-1e-12..=1.0 + 1e-12).contains(c)));
        assert_abs_diff_eq!(lum(out), 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_luminosity_mode() {
        let out = BlendMode::Luminosity.blend([0.5, 0.5, 0.5], [1.0, 1.0, 1.0]);
        for c in out {
            assert_abs_diff_eq!(c, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for mode in BlendMode::ALL {
            assert_eq!(mode.name().parse::<BlendMode>().unwrap(), mode);
        }
        assert!("dissolve".parse::<BlendMode>().is_err());
    }
}
