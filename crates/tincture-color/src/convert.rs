//! Conversion chains.
//!
//! Spaces form a tree rooted at `xyz-d65`: every space names a base and can
//! convert to and from it. Converting between two spaces walks from the
//! source toward the root until it meets the target's path to the root,
//! then walks back out to the target. Chromatic adaptation only happens on
//! hops touching the root, where XYZ is re-referenced to the other space's
//! white.
//!
//! ```text
//!            xyz-d65
//!           /       \
//!    srgb-linear   xyz-d50
//!         |           |
//!       srgb         lab
//!         |           |
//!        hsl         lch
//! ```
//!
//! Chains are cached per `(source, target)` in the owning [`Registry`].

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError};

use tincture_core::{Error, Result};
use tracing::trace;

use crate::registry::Registry;
use crate::space::{ROOT, Space};

/// One step of a conversion chain.
#[derive(Debug, Clone)]
pub struct Hop {
    /// Space converted from.
    pub from: Arc<dyn Space>,
    /// Space converted to.
    pub to: Arc<dyn Space>,
    /// `from` is a child of `to` (use `from.to_base`), otherwise `to` is a
    /// child of `from` (use `to.from_base`).
    pub toward_root: bool,
    /// One side is the root and the whites are re-referenced.
    pub adapt: bool,
}

/// Builds the hop list from `from` to `target`.
fn build_chain(registry: &Registry, from: &Arc<dyn Space>, target: &str) -> Result<Vec<Hop>> {
    // Target's path up to the root, with each space's position on it.
    let mut path: Vec<Arc<dyn Space>> = Vec::new();
    let mut index: HashMap<&'static str, usize> = HashMap::new();
    let mut current = registry.space(target)?.clone();
    loop {
        if index.insert(current.name(), path.len()).is_some() {
            return Err(Error::config(format!("space '{}' sits on a cycle of bases", current.name())));
        }
        path.push(current.clone());
        if current.name() == ROOT {
            break;
        }
        current = registry.space(current.base())?.clone();
    }

    let mut chain = Vec::new();
    let mut current = from.clone();
    let mut seen = HashSet::new();

    // Up toward the root until the target's path is reached.
    while !index.contains_key(current.name()) {
        if !seen.insert(current.name()) {
            return Err(Error::config(format!("space '{}' sits on a cycle of bases", current.name())));
        }
        let base = registry.space(current.base())?.clone();
        let adapt = base.name() == ROOT;
        chain.push(Hop { from: current, to: base.clone(), toward_root: true, adapt });
        current = base;
    }

    // Back out along the target's path.
    let start = index[current.name()];
    for next in path[..start].iter().rev() {
        let adapt = current.name() == ROOT;
        chain.push(Hop { from: current, to: next.clone(), toward_root: false, adapt });
        current = next.clone();
    }

    Ok(chain)
}

impl Registry {
    /// The (cached) chain from `from` to `target`.
    pub fn chain(&self, from: &Arc<dyn Space>, target: &str) -> Result<Arc<[Hop]>> {
        let key = (from.name(), target.to_string());
        if let Some(chain) = self.chains.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(chain.clone());
        }

        let chain: Arc<[Hop]> = build_chain(self, from, target)?.into();
        trace!(from = from.name(), to = target, hops = chain.len(), "built conversion chain");
        self.chains.write().unwrap_or_else(PoisonError::into_inner).insert(key, chain.clone());
        Ok(chain)
    }

    /// Converts color channels (alpha excluded, no NaN) from `from` to
    /// `target`, returning the target space and its channels.
    pub fn convert_coords(
        &self,
        from: &Arc<dyn Space>,
        coords: &[f64],
        target: &str,
    ) -> Result<(Arc<dyn Space>, Vec<f64>)> {
        if from.name() == target {
            return Ok((from.clone(), coords.to_vec()));
        }

        let chain = self.chain(from, target)?;
        let mut coords = coords.to_vec();
        for hop in chain.iter() {
            if hop.toward_root {
                coords = hop.from.to_base(&coords);
                if hop.adapt {
                    coords = self.chromatic_adaptation(hop.from.white(), hop.to.white(), &coords, None)?.to_vec();
                }
            } else {
                if hop.adapt {
                    coords = self.chromatic_adaptation(hop.from.white(), hop.to.white(), &coords, None)?.to_vec();
                }
                coords = hop.to.from_base(&coords);
            }
        }

        let space = match chain.last() {
            Some(hop) => hop.to.clone(),
            None => self.space(target)?.clone(),
        };
        Ok((space, coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(chain: &[Hop]) -> Vec<(&str, &str, bool, bool)> {
        chain.iter().map(|h| (h.from.name(), h.to.name(), h.toward_root, h.adapt)).collect()
    }

    #[test]
    fn test_chain_through_root() {
        let r = Registry::default();
        let srgb = r.space("srgb").unwrap().clone();
        let chain = r.chain(&srgb, "lab").unwrap();
        assert_eq!(
            names(&chain),
            vec![
                ("srgb", "srgb-linear", true, false),
                ("srgb-linear", "xyz-d65", true, true),
                ("xyz-d65", "xyz-d50", false, true),
                ("xyz-d50", "lab", false, false),
            ]
        );
    }

    #[test]
    fn test_chain_shares_branch() {
        let r = Registry::default();
        let hsl = r.space("hsl").unwrap().clone();
        let chain = r.chain(&hsl, "hwb").unwrap();
        assert_eq!(names(&chain), vec![("hsl", "hsv", false, false), ("hsv", "hwb", false, false)]);

        let oklch = r.space("oklch").unwrap().clone();
        let chain = r.chain(&oklch, "hsl").unwrap();
        assert_eq!(chain.first().map(|h| h.to.name()), Some("oklab"));
        assert_eq!(chain.last().map(|h| h.to.name()), Some("hsl"));
    }

    #[test]
    fn test_chain_to_ancestor() {
        let r = Registry::default();
        let lch = r.space("lch").unwrap().clone();
        let chain = r.chain(&lch, "xyz-d50").unwrap();
        assert_eq!(names(&chain), vec![("lch", "lab", true, false), ("lab", "xyz-d50", true, false)]);
    }

    #[test]
    fn test_chain_cached_and_cleared() {
        let mut r = Registry::default();
        let srgb = r.space("srgb").unwrap().clone();
        r.chain(&srgb, "oklch").unwrap();
        assert_eq!(r.chains.read().unwrap().len(), 1);
        r.deregister("space:hsv", false).unwrap();
        assert!(r.chains.read().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_target() {
        let r = Registry::default();
        let srgb = r.space("srgb").unwrap().clone();
        assert!(r.chain(&srgb, "nope").is_err());
    }

    #[test]
    fn test_convert_white_to_lab() {
        let r = Registry::default();
        let srgb = r.space("srgb").unwrap().clone();
        let (space, lab) = r.convert_coords(&srgb, &[1.0, 1.0, 1.0], "lab").unwrap();
        assert_eq!(space.name(), "lab");
        assert!((lab[0] - 100.0).abs() < 1e-6);
        assert!(lab[1].abs() < 1e-6 && lab[2].abs() < 1e-6);
    }
}
