//! Parallel batch conversion.
//!
//! Converting many values between the same two spaces reuses one chain,
//! so the chain is resolved once up front and the work is spread over the
//! rayon pool.
//!
//! ```rust
//! use tincture_color::Registry;
//! use tincture_color::batch::convert_slice;
//!
//! let mut pixels = vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! convert_slice(Registry::global(), "srgb", "srgb-linear", &mut pixels).unwrap();
//! assert_eq!(&pixels[..3], &[1.0, 0.0, 0.0]);
//! ```

use rayon::prelude::*;
use tincture_core::{Error, Result};
use tracing::debug;

use crate::color::Color;
use crate::registry::Registry;

/// Converts each coordinate vector from `from` to `to`.
///
/// Undefined (NaN) values convert as zero, like [`Color::convert`].
pub fn convert_many(registry: &Registry, from: &str, to: &str, coords: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let source = registry.space(from)?.clone();
    registry.chain(&source, to)?;
    debug!(from, to, count = coords.len(), "batch convert");
    coords
        .par_iter()
        .map(|c| {
            let resolved: Vec<f64> = c.iter().map(|v| if v.is_nan() { 0.0 } else { *v }).collect();
            registry.convert_coords(&source, &resolved, to).map(|(_, out)| out)
        })
        .collect()
}

/// Converts a flat, interleaved buffer of three-channel values in place.
pub fn convert_slice(registry: &Registry, from: &str, to: &str, data: &mut [f64]) -> Result<()> {
    let source = registry.space(from)?.clone();
    let width = source.channels().len();
    let target = registry.space(to)?.channels().len();
    if width != target || data.len() % width != 0 {
        return Err(Error::shape(format!(
            "cannot convert a buffer of {} values from {width} to {target} channels in place",
            data.len()
        )));
    }
    registry.chain(&source, to)?;
    debug!(from, to, count = data.len() / width, "batch convert in place");
    data.par_chunks_mut(width).try_for_each(|px| {
        let (_, out) = registry.convert_coords(&source, px, to)?;
        px.copy_from_slice(&out);
        Ok(())
    })
}

impl Color {
    /// Converts every color to `space` in parallel.
    pub fn convert_all(colors: &[Color], space: &str) -> Result<Vec<Color>> {
        colors.par_iter().map(|c| c.convert(space)).collect()
    }
}
