//! Absolute XYZ, the root of the conversion tree, and its D50 sibling.
//!
//! Both share the same coordinates; the D50 variant only differs in its
//! reference white, so its hop to the root is an identity and the chain
//! applies chromatic adaptation around it.

use tincture_core::Channel;
use tincture_primaries::{D50, D65, xy_to_xyz};

use crate::space::{ROOT, Space, Xy};

const CHANNELS: [Channel; 3] = [
    Channel::new("x", 0.0, 1.0),
    Channel::new("y", 0.0, 1.0),
    Channel::new("z", 0.0, 1.0),
];

/// Cross product magnitude below which XYZ is treated as a tint of white.
const ACHROMATIC_TOLERANCE: f64 = 1e-5;

/// CIE XYZ relative to a fixed white.
#[derive(Debug, Clone, Copy)]
pub struct Xyz {
    name: &'static str,
    ids: &'static [&'static str],
    white: Xy,
}

/// XYZ with a D65 white; the absolute root.
pub const XYZ_D65: Xyz = Xyz {
    name: ROOT,
    ids: &["xyz-d65", "xyz"],
    white: D65,
};

/// XYZ with a D50 white.
pub const XYZ_D50: Xyz = Xyz {
    name: "xyz-d50",
    ids: &["xyz-d50"],
    white: D50,
};

impl Xyz {
    /// XYZ under a custom white, converting through the root.
    pub const fn new(name: &'static str, ids: &'static [&'static str], white: Xy) -> Self {
        Self { name, ids, white }
    }
}

impl Space for Xyz {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        ROOT
    }

    fn serialize(&self) -> &[&'static str] {
        self.ids
    }

    fn channels(&self) -> &[Channel] {
        &CHANNELS
    }

    fn white(&self) -> Xy {
        self.white
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        coords.to_vec()
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        coords.to_vec()
    }

    fn is_achromatic(&self, coords: &[f64]) -> Option<bool> {
        // parallel to the white vector means a scaled white
        let w = xy_to_xyz(self.white, 1.0);
        let (x, y, z) = (coords[0], coords[1], coords[2]);
        let cross = [y * w[2] - z * w[1], z * w[0] - x * w[2], x * w[1] - y * w[0]];
        Some(cross.iter().all(|c| c.abs() <= ACHROMATIC_TOLERANCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_its_own_base() {
        assert_eq!(XYZ_D65.base(), XYZ_D65.name());
        assert_eq!(XYZ_D50.base(), ROOT);
        assert_eq!(XYZ_D65.ids(), vec!["xyz-d65", "xyz"]);
    }

    #[test]
    fn test_achromatic() {
        let white = xy_to_xyz(D65, 0.5);
        assert_eq!(XYZ_D65.is_achromatic(&white), Some(true));
        assert_eq!(XYZ_D65.is_achromatic(&[0.4, 0.2, 0.1]), Some(false));
    }
}
