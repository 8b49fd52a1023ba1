//! Naive CMY and CMYK over sRGB.
//!
//! These are the device-independent textbook forms, not a print profile.

use tincture_core::Channel;
use tincture_primaries::D65;

use crate::space::{Space, Xy};

/// sRGB to CMY.
pub fn srgb_to_cmy(rgb: &[f64]) -> Vec<f64> {
    rgb.iter().map(|c| 1.0 - c).collect()
}

/// sRGB to CMYK. Black gets no ink beyond `k`.
pub fn srgb_to_cmyk(rgb: &[f64]) -> Vec<f64> {
    let k = 1.0 - rgb[0].max(rgb[1]).max(rgb[2]);
    if k == 1.0 {
        return vec![0.0, 0.0, 0.0, 1.0];
    }
    let mut out: Vec<f64> = rgb.iter().map(|c| (1.0 - c - k) / (1.0 - k)).collect();
    out.push(k);
    out
}

/// CMYK to sRGB.
pub fn cmyk_to_srgb(cmyk: &[f64]) -> Vec<f64> {
    let k = cmyk[3];
    cmyk[..3].iter().map(|c| 1.0 - (c * (1.0 - k) + k).min(1.0)).collect()
}

const CMY_CHANNELS: [Channel; 3] = [
    Channel::new("c", 0.0, 1.0).bound(true),
    Channel::new("m", 0.0, 1.0).bound(true),
    Channel::new("y", 0.0, 1.0).bound(true),
];

const CMYK_CHANNELS: [Channel; 4] = [
    Channel::new("c", 0.0, 1.0).bound(true),
    Channel::new("m", 0.0, 1.0).bound(true),
    Channel::new("y", 0.0, 1.0).bound(true),
    Channel::new("k", 0.0, 1.0).bound(true),
];

/// Subtractive complement of sRGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cmy;

/// CMY with the shared gray component moved to a black channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cmyk;

impl Space for Cmy {
    fn name(&self) -> &'static str {
        "cmy"
    }

    fn base(&self) -> &'static str {
        "srgb"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--cmy"]
    }

    fn channels(&self) -> &[Channel] {
        &CMY_CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("cyan", "c"), ("magenta", "m"), ("yellow", "y")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        srgb_to_cmy(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        srgb_to_cmy(coords)
    }
}

impl Space for Cmyk {
    fn name(&self) -> &'static str {
        "cmyk"
    }

    fn base(&self) -> &'static str {
        "srgb"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--cmyk"]
    }

    fn channels(&self) -> &[Channel] {
        &CMYK_CHANNELS
    }

    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[("cyan", "c"), ("magenta", "m"), ("yellow", "y"), ("black", "k")]
    }

    fn white(&self) -> Xy {
        D65
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        cmyk_to_srgb(coords)
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        srgb_to_cmyk(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_cmy_is_inverted_rgb() {
        assert_eq!(Cmy.from_base(&[1.0, 0.25, 0.0]), vec![0.0, 0.75, 1.0]);
        assert_eq!(Cmy.to_base(&[0.0, 0.75, 1.0]), vec![1.0, 0.25, 0.0]);
    }

    #[test]
    fn test_cmyk_pulls_out_black() {
        let cmyk = Cmyk.from_base(&[0.5, 0.25, 0.0]);
        assert_eq!(cmyk, vec![0.0, 0.5, 1.0, 0.5]);
        assert_eq!(Cmyk.to_base(&cmyk), vec![0.5, 0.25, 0.0]);
        assert_eq!(Cmyk.from_base(&[0.0; 3]), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_four_channel_color() {
        let c = Color::new("cmyk", &[0.0, 1.0, 1.0, 0.0], 1.0).unwrap();
        assert_eq!(c.coords().len(), 4);
        assert_eq!(c.get("black").unwrap(), 0.0);
        let red = c.convert("srgb").unwrap();
        assert_eq!(red.coords(), &[1.0, 0.0, 0.0]);
        assert!(c.to_string().starts_with("color(--cmyk "));
    }
}
