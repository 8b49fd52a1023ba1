//! Gamut checking and mapping.
//!
//! `clip` clamps channels; every other method is a [`Fit`] plugin looked up
//! by name. A space may delegate its gamut to another one (`hsl` is bounded
//! by `srgb`), so fitting always happens in the gamut-check space.
//!
//! ```rust
//! use tincture_color::Color;
//!
//! let mut c = Color::new("display-p3", &[1.0, 0.0, 0.0], 1.0).unwrap().convert("srgb").unwrap();
//! assert!(!c.in_gamut(None).unwrap());
//! c.fit(None, Some("lch-chroma")).unwrap();
//! assert!(c.in_gamut(None).unwrap());
//! ```

mod chroma;
mod css;
mod raytrace;

pub use chroma::ChromaReduction;
pub use css::CssColor4;
pub use raytrace::{RayTrace, raytrace_box};

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tincture_core::Result;
use tracing::debug;

use crate::color::Color;
use crate::registry::RESERVED_FIT;

/// A gamut-mapping method.
pub trait Fit: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// Moves `color` into the gamut of `space`.
    ///
    /// `color` keeps its own space; `space` is already the gamut-check
    /// space and the color is known to be outside it.
    fn fit(&self, color: &mut Color, space: &str) -> Result<()>;
}

/// Built-in fit methods (`clip` is handled by [`Color::clip`]).
pub fn builtin() -> Vec<Arc<dyn Fit>> {
    vec![
        Arc::new(ChromaReduction::lch()),
        Arc::new(ChromaReduction::oklch()),
        Arc::new(ChromaReduction::hct()),
        Arc::new(ChromaReduction::minde()),
        Arc::new(RayTrace::new("raytrace", "lch-d65")),
        Arc::new(RayTrace::new("lch-raytrace", "lch-d65")),
        Arc::new(RayTrace::new("oklch-raytrace", "oklch")),
        Arc::new(CssColor4),
    ]
}

/// Clamps bounded channels to their range in the color's own space.
///
/// Hues wrap into `[0, 360)`, unbounded channels are left alone and
/// undefined values stay undefined. Returns true when a bounded channel
/// actually moved.
pub fn clip_channels(color: &mut Color) -> bool {
    let space = color.space_def().clone();
    let mut changed = false;
    for (i, ch) in space.channels().iter().enumerate() {
        let v = color.coords()[i];
        if v.is_nan() {
            continue;
        }
        if ch.is_angle() {
            color.coords_mut()[i] = v.rem_euclid(360.0);
            continue;
        }
        if !ch.bound {
            continue;
        }
        let clamped = v.clamp(ch.low, ch.high);
        if clamped != v {
            color.coords_mut()[i] = clamped;
            changed = true;
        }
    }
    changed
}

/// `color` in `space` without hue normalization.
pub(crate) fn raw_in(color: &Color, space: &str) -> Result<Color> {
    if color.space() == space {
        let mut c = color.clone();
        c.normalize(false)?;
        Ok(c)
    } else {
        color.convert_norm(space, false)
    }
}

/// True when every bounded channel is within its range by `tolerance`.
pub fn verify(color: &Color, tolerance: f64) -> bool {
    let space = color.space_def();
    space.channels().iter().zip(color.coords()).all(|(ch, &v)| {
        if !ch.bound || ch.is_angle() || v.is_nan() {
            return true;
        }
        v >= ch.low - tolerance && v <= ch.high + tolerance
    })
}

impl Color {
    /// Clamps into the gamut of `space` (own space when `None`).
    ///
    /// Spaces that declare a separate clip or gamut space are clipped
    /// there and converted back only when something was clamped.
    pub fn clip(&mut self, space: Option<&str>) -> Result<&mut Self> {
        let orig = self.space();
        if let Some(target) = space.filter(|&s| s != orig) {
            let mut c = self.convert_norm(target, false)?;
            c.clip(None)?;
            return self.update(&c);
        }

        let def = self.space_def().clone();
        let clip_in = def.clip_space().or(def.gamut_check()).unwrap_or(orig);
        if clip_in != orig {
            let mut c = self.convert_norm(clip_in, false)?;
            if clip_channels(&mut c) {
                let back = c.convert(orig)?;
                self.mutate(&back)?;
            } else {
                clip_channels(self);
            }
            return Ok(self);
        }

        clip_channels(self);
        Ok(self)
    }

    /// Maps into the gamut of `space` with the fit method `method`
    /// (registry default when `None`).
    ///
    /// Unknown methods fail before any work is done. A color already in
    /// gamut is only clipped, which removes floating-point overshoot.
    pub fn fit(&mut self, space: Option<&str>, method: Option<&str>) -> Result<&mut Self> {
        let method = method.unwrap_or(self.registry().defaults().fit.as_str()).to_string();
        if method == RESERVED_FIT {
            return self.clip(space);
        }
        let fit = self.registry().fit(&method)?.clone();
        self.fit_with(space, fit.as_ref())
    }

    /// [`Color::fit`] with an unregistered method.
    pub fn fit_with(&mut self, space: Option<&str>, fit: &dyn Fit) -> Result<&mut Self> {
        if self.in_gamut_tol(space, 0.0)? {
            return self.clip(space);
        }
        let target = match space {
            Some(s) => {
                let def = self.registry().space(s)?;
                def.gamut_check().unwrap_or(def.name())
            }
            None => self.space_def().gamut_check().unwrap_or(self.space()),
        };
        debug!(method = fit.name(), target, from = self.space(), "gamut fit");
        fit.fit(self, target)?;
        Ok(self)
    }

    /// True when in the gamut of `space` (own space when `None`) within the
    /// registry's fit tolerance.
    pub fn in_gamut(&self, space: Option<&str>) -> Result<bool> {
        self.in_gamut_tol(space, self.registry().defaults().fit_tolerance)
    }

    /// [`Color::in_gamut`] with an explicit tolerance.
    pub fn in_gamut_tol(&self, space: Option<&str>, tolerance: f64) -> Result<bool> {
        let c = match space {
            Some(s) if s != self.space() => Cow::Owned(self.convert_norm(s, false)?),
            _ => Cow::Borrowed(self),
        };
        if let Some(check) = c.space_def().gamut_check().filter(|&g| g != c.space()) {
            if !c.convert_norm(check, false)?.in_gamut_tol(None, tolerance)? {
                return Ok(false);
            }
        }
        Ok(verify(&c, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tincture_core::ErrorKind;

    use super::*;

    #[test]
    fn test_clip_channels_wraps_hue_keeps_nan() {
        let mut c = Color::new("hsl", &[400.0, 1.5, f64::NAN], 1.0).unwrap();
        assert!(clip_channels(&mut c));
        assert_abs_diff_eq!(c.coords()[0], 40.0, epsilon = 1e-12);
        assert_eq!(c.coords()[1], 1.0);
        assert!(c.coords()[2].is_nan());
    }

    #[test]
    fn test_clip_channels_unbounded_untouched() {
        let mut c = Color::new("lab", &[50.0, 300.0, -300.0], 1.0).unwrap();
        assert!(!clip_channels(&mut c));
        assert_eq!(c.coords(), &[50.0, 300.0, -300.0]);
    }

    #[test]
    fn test_verify_tolerance() {
        let c = Color::new("srgb", &[1.00001, 0.5, 0.0], 1.0).unwrap();
        assert!(!verify(&c, 0.0));
        assert!(verify(&c, 0.0001));
    }

    #[test]
    fn test_in_gamut_through_gamut_space() {
        let c = Color::new("hsl", &[0.0, 1.0, 0.5], 1.0).unwrap();
        assert!(c.in_gamut(None).unwrap());
        let p3 = Color::new("display-p3", &[0.0, 1.0, 0.0], 1.0).unwrap();
        assert!(!p3.in_gamut(Some("srgb")).unwrap());
        assert!(p3.in_gamut(Some("rec2020")).unwrap());
    }

    #[test]
    fn test_clip_other_space() {
        let mut c = Color::new("display-p3", &[0.0, 1.0, 0.0], 1.0).unwrap();
        c.clip(Some("srgb")).unwrap();
        assert_eq!(c.space(), "display-p3");
        assert!(c.in_gamut(Some("srgb")).unwrap());
    }

    #[test]
    fn test_fit_unknown_method() {
        let mut c = Color::new("srgb", &[0.5, 0.5, 0.5], 1.0).unwrap();
        let err = c.fit(None, Some("nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_every_method_lands_in_gamut() {
        let src = Color::new("display-p3", &[1.0, 0.2, 0.9], 1.0).unwrap();
        for method in
            ["clip", "lch-chroma", "oklch-chroma", "hct-chroma", "minde-chroma", "raytrace", "oklch-raytrace", "css-color-4"]
        {
            let mut c = src.convert("srgb").unwrap();
            c.fit(None, Some(method)).unwrap();
            assert_eq!(c.space(), "srgb");
            assert!(c.in_gamut(None).unwrap(), "{method}: {c:?}");
        }
    }

    #[test]
    fn test_fit_is_idempotent() {
        let wide = Color::new("display-p3", &[1.15, -0.1, 0.5], 1.0).unwrap();
        let mut methods: Vec<String> = builtin().iter().map(|f| f.name().to_string()).collect();
        methods.push(RESERVED_FIT.to_string());
        for method in &methods {
            let mut once = wide.clone();
            once.fit(None, Some(method)).unwrap();
            let mut twice = once.clone();
            twice.fit(None, Some(method)).unwrap();
            for (a, b) in once.coords().iter().zip(twice.coords()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
            }
            assert!(twice.in_gamut_tol(None, 0.0).unwrap(), "{method}");
        }
    }

    #[test]
    fn test_fit_in_gamut_is_noop() {
        let mut c = Color::new("srgb", &[0.2, 0.4, 0.6], 1.0).unwrap();
        let before = c.clone();
        c.fit(None, None).unwrap();
        assert_eq!(c, before);
    }

    #[test]
    fn test_fit_polar_keeps_space() {
        let mut c = Color::new("oklch", &[0.7, 0.4, 150.0], 1.0).unwrap();
        c.fit(Some("srgb"), Some("oklch-chroma")).unwrap();
        assert_eq!(c.space(), "oklch");
        assert!(c.in_gamut_tol(Some("srgb"), 1e-4).unwrap());
        assert_abs_diff_eq!(c.coords()[2], 150.0, epsilon = 1.0);
    }
}
