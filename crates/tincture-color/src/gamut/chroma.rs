//! Chroma reduction by bisection (MINDE).
//!
//! Chroma is lowered in a perceptual space until the clipped candidate is
//! within one just-noticeable difference of the unclipped one. This is the
//! CSS Color 4 binary search, extended to HDR targets and to rectangular
//! perceptual spaces.

use tincture_core::{DynamicRange, Error, Result};
use tincture_math::{isclose, lerp, order, polar_to_rect, rect_to_polar, sign};
use tincture_primaries::{D65, xy_to_xyz};

use super::{Fit, clip_channels, raw_in};
use crate::color::Color;
use crate::space::{ROOT, Space};

/// Smallest chroma interval the search still splits.
const MIN_CONVERGENCE: f64 = 0.0001;

/// Two orders of magnitude below the JND.
fn calc_epsilon(jnd: f64) -> f64 {
    10f64.powi(order(jnd) - 2)
}

/// Hue-independent lightness anchor for adaptive compression.
///
/// `l` and `c` are relative to the white lightness; `alpha` controls how
/// strongly lightness is pulled toward the middle.
pub fn adaptive_hue_independent(l: f64, c: f64, alpha: f64) -> f64 {
    let ld = l - 0.5;
    let abs_ld = ld.abs();
    let e1 = 0.5 + abs_ld + alpha * c;
    0.5 * (1.0 + sign(ld) * (e1 - (e1 * e1 - 2.0 * abs_ld).sqrt()))
}

/// Whether the space is polar and its (L, C|a, h|b) channel indexes.
pub(crate) fn perceptual_layout(space: &dyn Space) -> Result<(bool, [usize; 3])> {
    if let Some(lch) = space.lch() {
        return Ok((true, lch.indexes()));
    }
    if let Some(lab) = space.lab() {
        return Ok((false, lab.indexes()));
    }
    Err(Error::config(format!("'{}' is neither Lab-like nor LCh-like", space.name())))
}

/// Chroma-reduction fit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaReduction {
    name: String,
    /// Perceptual space the search runs in (Lab- or LCh-like).
    pub pspace: String,
    /// Just-noticeable difference; zero disables the distance test.
    pub jnd: f64,
    /// Delta E method measuring the difference.
    pub delta_e: String,
    /// Adaptive lightness strength; zero keeps lightness fixed.
    pub adaptive: f64,
}

impl ChromaReduction {
    /// A chroma reduction named `name`.
    pub fn new(name: impl Into<String>, pspace: impl Into<String>, jnd: f64, delta_e: impl Into<String>) -> Self {
        Self { name: name.into(), pspace: pspace.into(), jnd, delta_e: delta_e.into(), adaptive: 0.0 }
    }

    /// `lch-chroma`: CIE LCh (D65) with Delta E 2000.
    pub fn lch() -> Self {
        Self::new("lch-chroma", "lch-d65", 2.0, "2000")
    }

    /// `oklch-chroma`: OkLCh with Delta E OK.
    pub fn oklch() -> Self {
        Self::new("oklch-chroma", "oklch", 0.02, "ok")
    }

    /// `hct-chroma`: HCT with Delta E HCT.
    pub fn hct() -> Self {
        Self::new("hct-chroma", "hct", 2.0, "hct")
    }

    /// `minde-chroma`: the generic form, OkLCh by default.
    pub fn minde() -> Self {
        Self::new("minde-chroma", "oklch", 0.02, "ok")
    }

    /// Enables adaptive lightness compression.
    pub fn with_adaptive(mut self, adaptive: f64) -> Self {
        self.adaptive = adaptive;
        self
    }

    fn set_chroma(&self, mapcolor: &mut Color, polar: bool, idx: [usize; 3], chroma: f64, hue: f64) {
        if polar {
            mapcolor.set_raw(idx[1], chroma);
        } else {
            let (a, b) = polar_to_rect(chroma, hue);
            mapcolor.set_raw(idx[1], a);
            mapcolor.set_raw(idx[2], b);
        }
    }
}

fn settle(color: &mut Color, target: &Color) -> Result<()> {
    color.update(target)?;
    clip_channels(color);
    Ok(())
}

impl Fit for ChromaReduction {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&self, color: &mut Color, space: &str) -> Result<()> {
        let pdef = color.registry().space(&self.pspace)?.clone();
        let (polar, idx) = perceptual_layout(pdef.as_ref())?;
        let [l, _, _] = idx;

        let mut mapcolor = raw_in(color, &self.pspace)?;
        let mut gamutcolor = raw_in(color, space)?;
        let sdr = gamutcolor.space_def().dynamic_range() == DynamicRange::Sdr;
        let alpha = mapcolor.alpha();
        let lightness = mapcolor.raw(l);
        let (chroma, hue) = if polar {
            (mapcolor.raw(idx[1]), mapcolor.raw(idx[2]))
        } else {
            rect_to_polar(mapcolor.raw(idx[1]), mapcolor.raw(idx[2]))
        };

        let white = color.sibling(ROOT, &xy_to_xyz(D65, 1.0), alpha)?.convert(&self.pspace)?;
        let max_light = white.raw(l);

        // Non-adaptive search keeps lightness; adaptive search walks the
        // line from an achromatic anchor to the original.
        let (mut low, mut high) = (0.0, chroma);
        let mut anchor = None;
        if self.adaptive == 0.0 {
            if sdr && (lightness >= max_light || isclose(lightness, max_light, 0.0, 1e-6)) {
                return settle(color, &white);
            }
            let black = color.sibling(ROOT, &[0.0; 3], alpha)?.convert(&self.pspace)?;
            if lightness <= black.raw(l) {
                return settle(color, &black);
            }
        } else {
            let rel = adaptive_hue_independent(lightness / max_light, chroma.max(0.0) / max_light, self.adaptive);
            anchor = Some(rel * max_light);
            high = 1.0;
        }

        clip_channels(&mut gamutcolor);
        let method = Some(self.delta_e.as_str());
        let epsilon = calc_epsilon(self.jnd);

        if self.jnd == 0.0 || mapcolor.delta_e(&gamutcolor, method)? >= self.jnd {
            let mut lower_in_gamut = true;
            while high - low > MIN_CONVERGENCE {
                let value = (high + low) * 0.5;
                match anchor {
                    None => self.set_chroma(&mut mapcolor, polar, idx, value, hue),
                    Some(al) => {
                        mapcolor.set_raw(l, lerp(al, lightness, value));
                        self.set_chroma(&mut mapcolor, polar, idx, lerp(0.0, chroma, value), hue);
                    }
                }

                let mut candidate = mapcolor.convert_norm(space, false)?;
                if lower_in_gamut && candidate.in_gamut_tol(None, 0.0)? {
                    low = value;
                    continue;
                }

                clip_channels(&mut candidate);
                let de = if self.jnd > 0.0 { mapcolor.delta_e(&candidate, method)? } else { 0.0 };
                gamutcolor = candidate;
                if de < self.jnd {
                    if self.jnd - de < epsilon {
                        break;
                    }
                    lower_in_gamut = false;
                    low = value;
                } else {
                    high = value;
                }
            }
        }

        color.update(&gamutcolor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_epsilon() {
        assert_abs_diff_eq!(calc_epsilon(2.0), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(calc_epsilon(0.02), 0.0001, epsilon = 1e-15);
    }

    #[test]
    fn test_adaptive_anchor_midpoint() {
        assert_abs_diff_eq!(adaptive_hue_independent(0.5, 0.3, 0.05), 0.5, epsilon = 1e-12);
        let dark = adaptive_hue_independent(0.2, 0.1, 0.05);
        assert!(dark > 0.2 && dark < 0.5);
    }

    #[test]
    fn test_too_light_returns_white() {
        let mut c = Color::new("lch-d65", &[104.0, 30.0, 90.0], 1.0).unwrap().convert("srgb").unwrap();
        ChromaReduction::lch().fit(&mut c, "srgb").unwrap();
        for v in c.coords() {
            assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_hue_and_lightness_preserved() {
        let mut c = Color::new("oklch", &[0.6, 0.35, 30.0], 1.0).unwrap().convert("srgb").unwrap();
        c.fit(None, Some("oklch-chroma")).unwrap();
        let ok = c.convert("oklch").unwrap();
        assert_abs_diff_eq!(ok.coords()[0], 0.6, epsilon = 0.01);
        assert_abs_diff_eq!(ok.coords()[2], 30.0, epsilon = 2.0);
        assert!(ok.coords()[1] < 0.35);
    }

    #[test]
    fn test_adaptive_lands_in_gamut() {
        let mut c = Color::new("oklch", &[0.9, 0.3, 140.0], 1.0).unwrap().convert("srgb").unwrap();
        let fit = ChromaReduction::minde().with_adaptive(0.05);
        c.fit_with(None, &fit).unwrap();
        assert!(c.in_gamut(None).unwrap());
    }

    #[test]
    fn test_rectangular_pspace() {
        let mut c = Color::new("display-p3", &[0.0, 1.0, 0.0], 1.0).unwrap().convert("srgb").unwrap();
        let fit = ChromaReduction::new("oklab-chroma", "oklab", 0.02, "ok");
        c.fit_with(None, &fit).unwrap();
        assert!(c.in_gamut(None).unwrap());
    }

    #[test]
    fn test_non_perceptual_space_rejected() {
        let mut c = Color::new("srgb", &[1.2, 0.0, 0.0], 1.0).unwrap();
        let fit = ChromaReduction::new("bad", "srgb", 0.02, "ok");
        assert!(c.fit_with(None, &fit).is_err());
    }
}
