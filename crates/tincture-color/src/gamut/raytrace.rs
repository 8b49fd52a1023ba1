//! Gamut mapping by ray tracing.
//!
//! Instead of bisecting chroma, cast a ray from the color toward its
//! achromatic point and intersect it with the RGB cube. A few correction
//! passes restore perceptual lightness and hue, which the straight line in
//! RGB does not hold constant.

use std::sync::Arc;

use tincture_core::{Channel, DynamicRange, Error, Result, RgbIsh};
use tincture_math::{no_nan, polar_to_rect, rect_to_polar, vec3};

use super::chroma::perceptual_layout;
use super::{Fit, raw_in};
use crate::color::Color;
use crate::registry::{Plugin, Registry};
use crate::space::{Space, Xy};
use crate::spaces::hsx::{hsl_to_hsv, hsl_to_srgb, hsv_to_hsl, hsv_to_hwb, hwb_to_hsv, srgb_to_hsl};
use crate::spaces::rgb::UNIT_RGB;

/// Correction passes after the first intersection.
const PASSES: usize = 4;

/// Intersects the segment `start -> end` (extended past `end`) with an
/// axis-aligned box using the slab method.
///
/// Returns `None` when the ray misses, or when `start == end`.
pub fn raytrace_box(start: &[f64], end: &[f64], bmin: [f64; 3], bmax: [f64; 3]) -> Option<[f64; 3]> {
    let mut tfar = f64::INFINITY;
    let mut tnear = f64::NEG_INFINITY;
    let mut dir = [0.0; 3];
    for i in 0..3 {
        let a = start[i];
        let d = end[i] - a;
        dir[i] = d;
        if d != 0.0 {
            let t1 = (bmin[i] - a) / d;
            let t2 = (bmax[i] - a) / d;
            tnear = tnear.max(t1.min(t2));
            tfar = tfar.min(t1.max(t2));
        } else if a < bmin[i] || a > bmax[i] {
            return None;
        }
    }

    if tnear > tfar || tfar < 0.0 {
        return None;
    }
    // Prefer the hit in the direction of travel.
    if tnear < 0.0 {
        tnear = tfar;
    }
    if tnear.is_infinite() {
        return None;
    }
    Some([start[0] + dir[0] * tnear, start[1] + dir[1] * tnear, start[2] + dir[2] * tnear])
}

/// Ray-tracing fit in a given perceptual space.
#[derive(Debug, Clone, PartialEq)]
pub struct RayTrace {
    name: String,
    /// Perceptual space used for the lightness and hue corrections.
    pub pspace: String,
}

impl RayTrace {
    /// A ray-tracing fit named `name` correcting in `pspace`.
    pub fn new(name: impl Into<String>, pspace: impl Into<String>) -> Self {
        Self { name: name.into(), pspace: pspace.into() }
    }

    /// Traces `color` into `rgb`, an RGB-like space.
    fn trace(&self, color: &mut Color, rgb: &Arc<dyn Space>) -> Result<()> {
        let registry = color.registry().clone();
        let (polar, [l, ca, hb]) = perceptual_layout(registry.space(&self.pspace)?.as_ref())?;

        // The linear form gives straighter rays; HDR targets need the
        // cube scaled to their peak in linear light.
        let mut space = rgb.name().to_string();
        let mut bmax = [1.0; 3];
        if let Some(linear) = rgb.rgb().and_then(|r| r.linear()).filter(|n| registry.has_space(n)) {
            if rgb.dynamic_range() == DynamicRange::Hdr {
                let highs: Vec<f64> = rgb.channels().iter().map(|c| c.high).collect();
                bmax = vec3(color.sibling(&space, &highs, 1.0)?.convert(linear)?.coords());
            }
            space = linear.to_string();
        }

        let mapcolor = raw_in(color, &self.pspace)?;
        let alpha = mapcolor.alpha();
        let light = mapcolor.raw(l);
        let mut achroma = mapcolor.clone();
        let hue = if polar {
            achroma.set_raw(ca, 0.0);
            mapcolor.raw(hb)
        } else {
            achroma.set_raw(ca, 0.0);
            achroma.set_raw(hb, 0.0);
            rect_to_polar(mapcolor.raw(ca), mapcolor.raw(hb)).1
        };

        // Appearance models may not map their gray to an exact RGB gray;
        // the channel mean is a stable achromatic point either way.
        let gray = achroma.convert(&space)?.coords_resolved();
        let point = gray.iter().sum::<f64>() / 3.0;
        let achromatic = [point; 3];

        let result = if point >= bmax[0] {
            color.sibling(&space, &bmax, alpha)?
        } else if point <= 0.0 {
            color.sibling(&space, &[0.0; 3], alpha)?
        } else {
            let mut current = mapcolor.convert(&space)?;
            for pass in 0..PASSES {
                if pass > 0 {
                    let mut p = current.convert(&self.pspace)?;
                    p.set_raw(l, light);
                    if polar {
                        p.set_raw(hb, hue);
                    } else {
                        let (chroma, _) = rect_to_polar(p.raw(ca), p.raw(hb));
                        let (a, b) = polar_to_rect(chroma, hue);
                        p.set_raw(ca, a);
                        p.set_raw(hb, b);
                    }
                    current = p.convert(&space)?;
                }
                match raytrace_box(&achromatic, &current.coords_resolved(), [0.0; 3], bmax) {
                    Some(hit) => current.coords_mut().copy_from_slice(&hit),
                    None => break,
                }
            }
            // Floating-point noise only.
            let clamped: Vec<f64> = current.coords_resolved().iter().map(|v| v.clamp(0.0, bmax[0])).collect();
            color.sibling(&space, &clamped, alpha)?
        };
        color.update(&result)?;
        Ok(())
    }
}

impl Fit for RayTrace {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&self, color: &mut Color, space: &str) -> Result<()> {
        let target = color.registry().space(space)?.clone();
        if target.rgb().is_some() {
            return self.trace(color, &target);
        }

        // Cylindrical RGB models without an RGB space of their own are
        // traced through a temporary RGB form registered on a private copy.
        let coerced = CoercedRgb::of(target.as_ref())?;
        let name = coerced.name;
        let mut registry = Registry::clone(color.registry());
        registry.register(Plugin::space(coerced), true, true)?;
        let registry = Arc::new(registry);

        let mut proxy = color.with_registry(&registry)?;
        let rgb = registry.space(name)?.clone();
        self.trace(&mut proxy, &rgb)?;
        let back = proxy.convert(color.space())?;
        color.update(&back)?;
        Ok(())
    }
}

// ============================================================================
// RGB form of HSL / HSV / HWB
// ============================================================================

type Transform = fn(&[f64]) -> Vec<f64>;

fn hsv_to_srgb(c: &[f64]) -> Vec<f64> {
    hsl_to_srgb(&hsv_to_hsl(c))
}

fn srgb_to_hsv(c: &[f64]) -> Vec<f64> {
    hsl_to_hsv(&srgb_to_hsl(c))
}

fn hwb_to_srgb(c: &[f64]) -> Vec<f64> {
    hsv_to_srgb(&hwb_to_hsv(c))
}

fn srgb_to_hwb(c: &[f64]) -> Vec<f64> {
    hsv_to_hwb(&srgb_to_hsv(c))
}

/// RGB cube whose base is a cylindrical model of it.
#[derive(Debug)]
struct CoercedRgb {
    name: &'static str,
    base: &'static str,
    white: Xy,
    range: DynamicRange,
    order: [usize; 3],
    scale: [f64; 2],
    to_rgb: Transform,
    from_rgb: Transform,
}

impl CoercedRgb {
    fn of(cs: &dyn Space) -> Result<Self> {
        let (name, order, to_rgb, from_rgb): (_, _, Transform, Transform) = if let Some(c) = cs.hsl() {
            ("-rgb-hsl", c.indexes(), hsl_to_srgb, srgb_to_hsl)
        } else if let Some(c) = cs.hsv() {
            ("-rgb-hsv", c.indexes(), hsv_to_srgb, srgb_to_hsv)
        } else if let Some(c) = cs.hwb() {
            ("-rgb-hwb", c.indexes(), hwb_to_srgb, srgb_to_hwb)
        } else {
            return Err(Error::config(format!("cannot coerce '{}' to an RGB space", cs.name())));
        };
        let channels = cs.channels();
        Ok(Self {
            name,
            base: cs.name(),
            white: cs.white(),
            range: cs.dynamic_range(),
            order,
            scale: [channels[order[1]].high, channels[order[2]].high],
            to_rgb,
            from_rgb,
        })
    }
}

impl RgbIsh for CoercedRgb {}

impl Space for CoercedRgb {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        self.base
    }

    fn channels(&self) -> &[Channel] {
        &UNIT_RGB
    }

    fn white(&self) -> Xy {
        self.white
    }

    fn dynamic_range(&self) -> DynamicRange {
        self.range
    }

    fn color_format(&self) -> bool {
        false
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        let mut v = (self.from_rgb)(coords);
        v[0] = no_nan(v[0]);
        v[1] *= self.scale[0];
        v[2] *= self.scale[1];
        let mut ordered = vec![0.0; 3];
        for (e, c) in v.into_iter().enumerate() {
            ordered[self.order[e]] = c;
        }
        ordered
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        let mut v: Vec<f64> = self.order.iter().map(|&i| coords[i]).collect();
        v[0] = no_nan(v[0]);
        v[1] /= self.scale[0];
        v[2] /= self.scale[1];
        (self.to_rgb)(&v)
    }

    fn rgb(&self) -> Option<&dyn RgbIsh> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_box_hit() {
        let hit = raytrace_box(&[0.5, 0.5, 0.5], &[1.5, 0.5, 0.5], [0.0; 3], [1.0; 3]).unwrap();
        assert_eq!(hit, [1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_box_end_inside_extends_ray() {
        let hit = raytrace_box(&[0.5, 0.5, 0.5], &[0.75, 0.5, 0.5], [0.0; 3], [1.0; 3]).unwrap();
        assert_abs_diff_eq!(hit[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_box_miss_and_degenerate() {
        assert!(raytrace_box(&[2.0, 2.0, 2.0], &[3.0, 2.0, 2.0], [0.0; 3], [1.0; 3]).is_none());
        assert!(raytrace_box(&[0.5; 3], &[0.5; 3], [0.0; 3], [1.0; 3]).is_none());
    }

    #[test]
    fn test_lightness_and_hue_kept() {
        let src = Color::new("lch-d65", &[60.0, 120.0, 300.0], 1.0).unwrap();
        let mut c = src.convert("srgb").unwrap();
        RayTrace::new("raytrace", "lch-d65").fit(&mut c, "srgb").unwrap();
        assert!(c.in_gamut(None).unwrap());
        let lch = c.convert("lch-d65").unwrap();
        assert_abs_diff_eq!(lch.coords()[0], 60.0, epsilon = 1.0);
        assert_abs_diff_eq!(lch.coords()[2], 300.0, epsilon = 2.0);
    }

    #[test]
    fn test_hdr_target() {
        let mut c = Color::new("rec2100-pq", &[1.2, 0.3, -0.1], 1.0).unwrap();
        c.fit(None, Some("oklch-raytrace")).unwrap();
        assert!(c.in_gamut(None).unwrap());
    }

    #[test]
    fn test_cylindrical_target_coerced() {
        let mut c = Color::new("hsl", &[0.0, 1.3, 0.5], 1.0).unwrap();
        RayTrace::new("raytrace", "lch-d65").fit(&mut c, "hsl").unwrap();
        assert_eq!(c.space(), "hsl");
        assert!(c.coords()[1] <= 1.0 + 1e-9);
        assert!(c.in_gamut(None).unwrap());
    }
}
