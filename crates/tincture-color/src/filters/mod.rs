//! Color filters.
//!
//! Two families are built in:
//!
//! - W3C filter effects (`brightness`, `contrast`, `grayscale`,
//!   `hue-rotate`, `invert`, `opacity`, `saturate`, `sepia`), usable in
//!   `srgb` or `srgb-linear`.
//! - Color vision deficiency simulation (`protan`, `deutan`, `tritan`),
//!   linear sRGB only.
//!
//! ```rust
//! use tincture_color::Color;
//!
//! let c = Color::parse("red").unwrap();
//! let gray = c.filter("grayscale", None, Some("srgb"), None).unwrap();
//! assert_eq!(gray.space(), "srgb");
//! assert!((gray.coords()[0] - 0.2126).abs() < 1e-12);
//! ```

mod cvd;
mod w3c;

pub use cvd::{Cvd, CvdMethod, Deficiency};
pub use w3c::{W3cFilter, W3cKind};

use std::fmt;
use std::sync::Arc;

use tincture_core::{Error, Result};
use tincture_math::{Mat3, vec3};
use tracing::trace;

use crate::color::Color;

/// A filter plugin.
pub trait Filter: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// Spaces the filter may run in.
    fn allowed_spaces(&self) -> &[&'static str];

    /// Space used when the caller names none.
    fn default_space(&self) -> &'static str {
        "srgb-linear"
    }

    /// Filters `color` in place. `color` is already in an allowed space.
    fn filter(&self, color: &mut Color, amount: Option<f64>) -> Result<()>;
}

/// Built-in filters.
pub fn builtin() -> Vec<Arc<dyn Filter>> {
    let mut out: Vec<Arc<dyn Filter>> = W3cKind::ALL.into_iter().map(|k| Arc::new(W3cFilter(k)) as Arc<dyn Filter>).collect();
    out.push(Arc::new(Cvd::new(Deficiency::Protan)));
    out.push(Arc::new(Cvd::new(Deficiency::Deutan)));
    out.push(Arc::new(Cvd::new(Deficiency::Tritan)));
    out
}

/// Applies `m` to the color channels.
pub(crate) fn apply_matrix(color: &mut Color, m: &Mat3) {
    let out = *m * vec3(color.coords());
    color.coords_mut()[..3].copy_from_slice(&out);
}

impl Color {
    /// Runs the named filter.
    ///
    /// The color is converted to `space` (the filter's default when
    /// `None`), filtered, then converted to `out_space` (`space` when
    /// `None`).
    pub fn filter(&self, name: &str, amount: Option<f64>, space: Option<&str>, out_space: Option<&str>) -> Result<Color> {
        let f = self.registry().filter(name)?.clone();
        self.filter_with(f.as_ref(), amount, space, out_space)
    }

    /// Runs an unregistered filter.
    pub fn filter_with(
        &self,
        filter: &dyn Filter,
        amount: Option<f64>,
        space: Option<&str>,
        out_space: Option<&str>,
    ) -> Result<Color> {
        let space = space.unwrap_or(filter.default_space());
        if !filter.allowed_spaces().contains(&space) {
            return Err(Error::config(format!(
                "'{}' filters only in {:?}, not '{space}'",
                filter.name(),
                filter.allowed_spaces()
            )));
        }
        trace!(filter = filter.name(), space, ?amount, "filter");
        let mut c = self.convert_norm(space, false)?;
        c.normalize(true)?;
        filter.filter(&mut c, amount)?;
        c.convert(out_space.unwrap_or(space))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let names: Vec<String> = builtin().iter().map(|f| f.name().to_string()).collect();
        for n in ["sepia", "hue-rotate", "protan", "tritan"] {
            assert!(names.iter().any(|x| x == n), "{n}");
        }
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn test_space_checks() {
        let c = Color::parse("orange").unwrap();
        assert!(c.filter("sepia", None, Some("lab"), None).is_err());
        assert!(c.filter("protan", None, Some("srgb"), None).is_err());
        assert!(c.filter("blur", None, None, None).is_err());

        let out = c.filter("sepia", Some(0.5), None, Some("srgb")).unwrap();
        assert_eq!(out.space(), "srgb");
        let out = c.filter("sepia", Some(0.5), None, None).unwrap();
        assert_eq!(out.space(), "srgb-linear");
    }
}
