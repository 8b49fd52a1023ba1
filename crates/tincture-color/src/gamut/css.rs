//! The CSS Color 4 gamut-mapping algorithm.
//!
//! A plain bisection on OkLCh chroma: stop as soon as the clipped
//! candidate is within the JND of the unclipped one. Unlike
//! [`ChromaReduction`](super::ChromaReduction) there is no initial
//! distance check and no refinement past the first hit.

use tincture_core::Result;

use super::{Fit, clip_channels, raw_in};
use crate::color::Color;

const SPACE: &str = "oklch";
const DELTA_E: &str = "ok";
const JND: f64 = 0.02;
const MIN_LIGHTNESS: f64 = 0.0;
const MAX_LIGHTNESS: f64 = 1.0;
const MIN_CONVERGENCE: f64 = 0.0001;

/// `css-color-4`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssColor4;

impl Fit for CssColor4 {
    fn name(&self) -> &str {
        "css-color-4"
    }

    fn fit(&self, color: &mut Color, space: &str) -> Result<()> {
        let mut mapcolor = raw_in(color, SPACE)?;
        let lightness = mapcolor.raw(0);

        if lightness >= MAX_LIGHTNESS || lightness <= MIN_LIGHTNESS {
            mapcolor.set_raw(1, 0.0);
            mapcolor.set_raw(2, f64::NAN);
            let mut gamutcolor = mapcolor.convert_norm(space, false)?;
            clip_channels(&mut gamutcolor);
            color.update(&gamutcolor)?;
            return Ok(());
        }

        let (mut low, mut high) = (0.0, mapcolor.raw(1));
        let mut gamutcolor = mapcolor.convert_norm(space, false)?;
        clip_channels(&mut gamutcolor);

        if !mapcolor.in_gamut(Some(space))? {
            let method = Some(DELTA_E);
            while high - low > MIN_CONVERGENCE {
                let chroma = (high + low) * 0.5;
                mapcolor.set_raw(1, chroma);
                let mut candidate = mapcolor.convert_norm(space, false)?;
                if candidate.in_gamut_tol(None, 0.0)? {
                    low = chroma;
                    continue;
                }
                clip_channels(&mut candidate);
                let de = mapcolor.delta_e(&candidate, method)?;
                gamutcolor = candidate;
                if de < JND {
                    break;
                }
                high = chroma;
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
    fn test_maps_into_srgb() {
        let mut c = Color::new("display-p3", &[0.0, 1.0, 0.0], 1.0).unwrap().convert("srgb").unwrap();
        c.fit(None, Some("css-color-4")).unwrap();
        assert!(c.in_gamut(None).unwrap());
        let ok = c.convert("oklch").unwrap();
        let orig = Color::new("display-p3", &[0.0, 1.0, 0.0], 1.0).unwrap().convert("oklch").unwrap();
        assert_abs_diff_eq!(ok.coords()[0], orig.coords()[0], epsilon = 0.02);
    }

    #[test]
    fn test_extreme_lightness_goes_achromatic() {
        let mut c = Color::new("oklch", &[1.2, 0.2, 40.0], 1.0).unwrap().convert("srgb").unwrap();
        CssColor4.fit(&mut c, "srgb").unwrap();
        for v in c.coords() {
            assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-9);
        }

        let mut c = Color::new("oklch", &[-0.1, 0.2, 40.0], 1.0).unwrap().convert("srgb").unwrap();
        CssColor4.fit(&mut c, "srgb").unwrap();
        for v in c.coords() {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-9);
        }
    }
}
