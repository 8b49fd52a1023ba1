//! Space capabilities.
//!
//! Generic algorithms ask a space what it *can do* rather than what it *is*.
//! Each trait here is one orthogonal capability; a space implements as many
//! as apply (HSL is both [`Cylindrical`] and [`HslIsh`], CAM16 JMh is both
//! [`Cylindrical`] and [`LchIsh`], and so on).

use serde::{Deserialize, Serialize};

/// Dynamic range a space is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicRange {
    /// Standard dynamic range, reference white at 1.0 / 100.
    #[default]
    Sdr,
    /// High dynamic range (PQ, Jzazbz, ICtCp, ZCAM).
    Hdr,
}

/// Space with a hue angle and a radial (chroma-like) channel.
pub trait Cylindrical {
    /// Index of the hue channel.
    fn hue_index(&self) -> usize;
    /// Index of the radial channel (chroma, colorfulness, saturation).
    fn radial_index(&self) -> usize;
}

/// Space with three rectangular channels in red, green, blue order.
pub trait RgbIsh {
    /// Channel indexes in RGB order.
    fn indexes(&self) -> [usize; 3] {
        [0, 1, 2]
    }
    /// Name of the linear-light variant of this space, if any.
    fn linear(&self) -> Option<&str> {
        None
    }
}

/// Space with lightness and two opponent axes.
pub trait LabIsh {
    /// Channel indexes in (lightness, a, b) order.
    fn indexes(&self) -> [usize; 3] {
        [0, 1, 2]
    }
}

/// Polar form of a Lab-ish space: lightness, chroma, hue.
pub trait LchIsh: Cylindrical {
    /// Channel indexes in (lightness, chroma, hue) order.
    fn indexes(&self) -> [usize; 3] {
        [0, 1, 2]
    }
}

/// Hue, saturation, lightness.
pub trait HslIsh: Cylindrical {
    /// Channel indexes in (hue, saturation, lightness) order.
    fn indexes(&self) -> [usize; 3] {
        [0, 1, 2]
    }
}

/// Hue, saturation, value.
pub trait HsvIsh: Cylindrical {
    /// Channel indexes in (hue, saturation, value) order.
    fn indexes(&self) -> [usize; 3] {
        [0, 1, 2]
    }
}

/// Hue, whiteness, blackness.
pub trait HwbIsh: Cylindrical {
    /// Channel indexes in (hue, whiteness, blackness) order.
    fn indexes(&self) -> [usize; 3] {
        [0, 1, 2]
    }
}
