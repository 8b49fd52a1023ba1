//! Chromatic adaptation transforms.
//!
//! A CAT moves absolute XYZ from one reference white to another. Every
//! built-in method is von Kries style and differs only in its cone matrix
//! (see [`tincture_math::adapt`]); the adaptation matrices for a pair of
//! whites are computed once and cached.
//!
//! The cache is keyed by the *unordered* pair of whites: the pair is sorted
//! before lookup and the inverse matrix serves the reverse direction, so
//! D65→D50 and D50→D65 share one entry.
//!
//! ```rust
//! use tincture_color::cat::{Cat, VonKries};
//! use tincture_primaries::{D50, D65};
//!
//! let cat = VonKries::bradford();
//! let xyz = [0.2, 0.3, 0.4];
//! let there = cat.adapt(D65, D50, xyz).unwrap();
//! let back = cat.adapt(D50, D65, there).unwrap();
//! assert!((back[2] - 0.4).abs() < 1e-12);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use tincture_core::Result;
use tincture_math::{
    BRADFORD, CAT02, CAT16, CMCCAT97, CMCCAT2000, Mat3, SHARP, VON_KRIES, Vec3, XYZ_SCALING, adapt_matrices,
};
use tincture_primaries::xy_to_xyz;
use tracing::trace;

use crate::space::Xy;

/// Entries kept per method before the cache is flushed.
const CACHE_SIZE: usize = 20;

/// A chromatic adaptation transform.
pub trait Cat: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// Adapts `xyz` relative to white `w1` so it is relative to `w2`.
    ///
    /// Equal whites return `xyz` unchanged.
    fn adapt(&self, w1: Xy, w2: Xy, xyz: Vec3) -> Result<Vec3>;
}

type WhitePair = ([u64; 2], [u64; 2]);

/// Von Kries style adaptation through a cone matrix.
pub struct VonKries {
    name: &'static str,
    cone: Mat3,
    cache: RwLock<HashMap<WhitePair, (Mat3, Mat3)>>,
}

impl fmt::Debug for VonKries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VonKries").field("name", &self.name).finish()
    }
}

impl VonKries {
    /// A method named `name` adapting through `cone`.
    pub fn new(name: &'static str, cone: Mat3) -> Self {
        Self { name, cone, cache: RwLock::new(HashMap::new()) }
    }

    /// Von Kries with Hunt-Pointer-Estevez cones.
    pub fn von_kries() -> Self {
        Self::new("von-kries", VON_KRIES)
    }

    /// Bradford.
    pub fn bradford() -> Self {
        Self::new("bradford", BRADFORD)
    }

    /// CAT02.
    pub fn cat02() -> Self {
        Self::new("cat02", CAT02)
    }

    /// CAT16.
    pub fn cat16() -> Self {
        Self::new("cat16", CAT16)
    }

    /// Sharp.
    pub fn sharp() -> Self {
        Self::new("sharp", SHARP)
    }

    /// CMCCAT97.
    pub fn cmccat97() -> Self {
        Self::new("cmccat97", CMCCAT97)
    }

    /// CMCCAT2000, without its incomplete-adaptation factor.
    pub fn cmccat2000() -> Self {
        Self::new("cmccat2000", CMCCAT2000)
    }

    /// XYZ scaling.
    pub fn xyz_scaling() -> Self {
        Self::new("xyz-scaling", XYZ_SCALING)
    }

    /// Cone matrix.
    pub fn cone(&self) -> &Mat3 {
        &self.cone
    }

    /// Forward and inverse matrices for `w1 -> w2`, in that order.
    pub fn matrices(&self, w1: Xy, w2: Xy) -> Result<(Mat3, Mat3)> {
        let (key, swapped) = match cmp_white(w1, w2) {
            Ordering::Greater => ((bits(w2), bits(w1)), true),
            _ => ((bits(w1), bits(w2)), false),
        };

        let cached = self.cache.read().unwrap_or_else(PoisonError::into_inner).get(&key).copied();
        let (fwd, inv) = match cached {
            Some(m) => m,
            None => {
                let (a, b) = if swapped { (w2, w1) } else { (w1, w2) };
                trace!(method = self.name, w1 = ?a, w2 = ?b, "CAT cache miss");
                let m = adapt_matrices(&self.cone, xy_to_xyz(a, 1.0), xy_to_xyz(b, 1.0))?;
                let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
                if cache.len() >= CACHE_SIZE {
                    cache.clear();
                }
                cache.insert(key, m);
                m
            }
        };
        Ok(if swapped { (inv, fwd) } else { (fwd, inv) })
    }
}

impl Cat for VonKries {
    fn name(&self) -> &str {
        self.name
    }

    fn adapt(&self, w1: Xy, w2: Xy, xyz: Vec3) -> Result<Vec3> {
        if w1 == w2 {
            return Ok(xyz);
        }
        let (fwd, _) = self.matrices(w1, w2)?;
        Ok(fwd * xyz)
    }
}

fn bits(w: Xy) -> [u64; 2] {
    [w[0].to_bits(), w[1].to_bits()]
}

fn cmp_white(a: Xy, b: Xy) -> Ordering {
    a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1]))
}

/// The built-in methods in registration order.
pub fn builtin() -> Vec<VonKries> {
    vec![
        VonKries::von_kries(),
        VonKries::bradford(),
        VonKries::cat02(),
        VonKries::cat16(),
        VonKries::sharp(),
        VonKries::cmccat97(),
        VonKries::cmccat2000(),
        VonKries::xyz_scaling(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_primaries::{A, D50, D65};

    #[test]
    fn test_identity_for_same_white() {
        for cat in builtin() {
            let xyz = [0.25, 0.5, 0.75];
            assert_eq!(cat.adapt(D65, D65, xyz).unwrap(), xyz);
        }
    }

    #[test]
    fn test_round_trip_all_methods() {
        for cat in builtin() {
            let xyz = [0.3, 0.4, 0.5];
            let there = cat.adapt(D65, A, xyz).unwrap();
            let back = cat.adapt(A, D65, there).unwrap();
            for i in 0..3 {
                assert!((back[i] - xyz[i]).abs() < 1e-12, "{}", cat.name());
            }
        }
    }

    #[test]
    fn test_white_maps_to_white() {
        let cat = VonKries::cat16();
        let out = cat.adapt(D65, D50, xy_to_xyz(D65, 1.0)).unwrap();
        let d50 = xy_to_xyz(D50, 1.0);
        for i in 0..3 {
            assert!((out[i] - d50[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_cache_entry_per_pair() {
        let cat = VonKries::bradford();
        cat.adapt(D65, D50, [0.1, 0.2, 0.3]).unwrap();
        cat.adapt(D50, D65, [0.1, 0.2, 0.3]).unwrap();
        assert_eq!(cat.cache.read().unwrap().len(), 1);
    }
}
