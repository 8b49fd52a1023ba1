//! Correlated color temperature.
//!
//! A [`Cct`] plugin maps a color to `[kelvin, duv]` and back. The only
//! built-in method is [`Robertson1968`].
//!
//! ```rust
//! use tincture_color::Color;
//!
//! let warm = Color::blackbody("srgb", 2700.0, 0.0, Some("srgb-linear"), None).unwrap();
//! let [kelvin, duv] = warm.cct(None).unwrap();
//! assert!((kelvin - 2700.0).abs() < 5.0);
//! assert!(duv.abs() < 1e-3);
//! ```

mod robertson;

pub use robertson::Robertson1968;

use std::fmt;
use std::sync::Arc;

use tincture_core::Result;

use crate::color::Color;
use crate::registry::Registry;

/// A correlated color temperature method.
pub trait Cct: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// `[kelvin, duv]` of `color`.
    fn to_cct(&self, color: &Color) -> Result<[f64; 2]>;

    /// A color in `space` at `kelvin`, offset `duv` from the Planckian
    /// locus, optionally max-normalized in the RGB space `scale`.
    fn from_cct(
        &self,
        registry: &Arc<Registry>,
        space: &str,
        kelvin: f64,
        duv: f64,
        scale: Option<&str>,
    ) -> Result<Color>;
}

/// Built-in CCT methods.
pub fn builtin() -> Vec<Arc<dyn Cct>> {
    vec![Arc::new(Robertson1968::default())]
}

impl Color {
    /// `[kelvin, duv]` with the named method (registry default when `None`).
    pub fn cct(&self, method: Option<&str>) -> Result<[f64; 2]> {
        let method = method.unwrap_or(self.registry().defaults().cct.as_str());
        let cct = self.registry().cct(method)?.clone();
        cct.to_cct(self)
    }

    /// A color on (or `duv` off) the black body curve.
    ///
    /// The luminance is nominal, so pass a linear RGB `scale` space
    /// (usually `srgb-linear`) to get a viewable color.
    pub fn blackbody(space: &str, kelvin: f64, duv: f64, scale: Option<&str>, method: Option<&str>) -> Result<Color> {
        Self::blackbody_in(Registry::global(), space, kelvin, duv, scale, method)
    }

    /// [`Color::blackbody`] under `registry`.
    pub fn blackbody_in(
        registry: &Arc<Registry>,
        space: &str,
        kelvin: f64,
        duv: f64,
        scale: Option<&str>,
        method: Option<&str>,
    ) -> Result<Color> {
        let method = method.unwrap_or(registry.defaults().cct.as_str());
        registry.cct(method)?.from_cct(registry, space, kelvin, duv, scale)
    }
}
