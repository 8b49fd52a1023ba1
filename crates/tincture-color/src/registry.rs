//! Plugin registry.
//!
//! A [`Registry`] owns every name→plugin map the engine consults: color
//! spaces, Delta E metrics, gamut-fit methods, chromatic adaptation
//! transforms, contrast methods, filters, interpolators and CCT methods,
//! plus the engine [`Defaults`]. It also owns the conversion-chain cache,
//! which it invalidates whenever the set of spaces changes.
//!
//! # Profiles
//!
//! Registries are plain values. Clone one to derive an independent profile:
//! registering on the clone never affects the original. Mutation needs
//! `&mut Registry`; colors share a finished registry through an [`Arc`].
//!
//! ```rust
//! use std::sync::Arc;
//! use tincture_color::{Color, Registry};
//! use tincture_color::registry::Plugin;
//! use tincture_color::spaces::rgb::SRGB;
//!
//! let mut custom = Registry::default();
//! custom.defaults_mut().precision = 3;
//!
//! // Duplicates are refused unless overwriting.
//! assert!(custom.register(Plugin::space(SRGB), false, false).is_err());
//! assert!(custom.deregister("fit:clip", false).is_err());
//!
//! let custom = Arc::new(custom);
//! let c = Color::parse_in(&custom, "red").unwrap();
//! assert_eq!(format!("{c:?}"), "color(srgb 1 0 0 / 1)");
//! assert_eq!(c.to_string(), "rgb(255 0 0)");
//! ```
//!
//! # Global registry
//!
//! [`Registry::global`] lazily builds one fully populated registry shared
//! by the convenience constructors ([`Color::parse`](crate::Color::parse),
//! [`Color::new`](crate::Color::new)).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tincture_core::{Error, Result};
use tincture_math::{Vec3, vec3};
use tracing::debug;

use crate::cat::{self, Cat};
use crate::contrast::{self, Contrast};
use crate::convert::Hop;
use crate::distance::{self, DeltaE};
use crate::filters::{self, Filter};
use crate::gamut::{self, Fit};
use crate::interpolate::{self, Hue, Interpolate};
use crate::space::{Space, Xy};
use crate::spaces;
use crate::temperature::{self, Cct};

/// Name of the fit method that can never be replaced or removed.
pub const RESERVED_FIT: &str = "clip";

// ============================================================================
// Defaults
// ============================================================================

/// Engine-wide defaults consulted when a call does not name a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Serialization precision (significant digits).
    pub precision: i32,
    /// Tolerance of the default gamut check.
    pub fit_tolerance: f64,
    /// Hue fix-up policy for interpolation.
    pub hue: Hue,
    /// Interpolation space.
    pub interpolation_space: String,
    /// Interpolation method.
    pub interpolator: String,
    /// Gamut-fit method.
    pub fit: String,
    /// Harmony space.
    pub harmony_space: String,
    /// Delta E method.
    pub delta_e: String,
    /// Averaging space.
    pub average_space: String,
    /// Chromatic adaptation transform.
    pub cat: String,
    /// Contrast method.
    pub contrast: String,
    /// Correlated color temperature method.
    pub cct: String,
    /// Carry undefined channels forward into analogous channels of the
    /// interpolation space.
    pub carryforward: bool,
    /// Treat achromatic hues as undefined before interpolating or averaging.
    pub powerless: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            precision: 5,
            fit_tolerance: 0.000075,
            hue: Hue::Shorter,
            interpolation_space: "oklab".into(),
            interpolator: "linear".into(),
            fit: "lch-chroma".into(),
            harmony_space: "oklch".into(),
            delta_e: "76".into(),
            average_space: "srgb-linear".into(),
            cat: "bradford".into(),
            contrast: "wcag21".into(),
            cct: "robertson-1968".into(),
            carryforward: false,
            powerless: false,
        }
    }
}

// ============================================================================
// Plugins
// ============================================================================

/// A plugin tagged with its category.
#[derive(Debug, Clone)]
pub enum Plugin {
    /// A color space.
    Space(Arc<dyn Space>),
    /// A color-difference metric.
    DeltaE(Arc<dyn DeltaE>),
    /// A gamut-fit method.
    Fit(Arc<dyn Fit>),
    /// A chromatic adaptation transform.
    Cat(Arc<dyn Cat>),
    /// A contrast method.
    Contrast(Arc<dyn Contrast>),
    /// A filter.
    Filter(Arc<dyn Filter>),
    /// An interpolation method.
    Interpolate(Arc<dyn Interpolate>),
    /// A correlated color temperature method.
    Cct(Arc<dyn Cct>),
}

impl Plugin {
    /// Wraps a space.
    pub fn space(space: impl Space + 'static) -> Self {
        Self::Space(Arc::new(space))
    }

    /// Wraps a Delta E metric.
    pub fn delta_e(de: impl DeltaE + 'static) -> Self {
        Self::DeltaE(Arc::new(de))
    }

    /// Wraps a fit method.
    pub fn fit(fit: impl Fit + 'static) -> Self {
        Self::Fit(Arc::new(fit))
    }

    /// Wraps a CAT.
    pub fn cat(cat: impl Cat + 'static) -> Self {
        Self::Cat(Arc::new(cat))
    }

    /// Wraps a contrast method.
    pub fn contrast(c: impl Contrast + 'static) -> Self {
        Self::Contrast(Arc::new(c))
    }

    /// Wraps a filter.
    pub fn filter(f: impl Filter + 'static) -> Self {
        Self::Filter(Arc::new(f))
    }

    /// Wraps an interpolation method.
    pub fn interpolate(i: impl Interpolate + 'static) -> Self {
        Self::Interpolate(Arc::new(i))
    }

    /// Wraps a CCT method.
    pub fn cct(c: impl Cct + 'static) -> Self {
        Self::Cct(Arc::new(c))
    }

    /// Category name used in `kind:name` deregistration strings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Space(_) => "space",
            Self::DeltaE(_) => "delta-e",
            Self::Fit(_) => "fit",
            Self::Cat(_) => "cat",
            Self::Contrast(_) => "contrast",
            Self::Filter(_) => "filter",
            Self::Interpolate(_) => "interpolate",
            Self::Cct(_) => "cct",
        }
    }

    /// Plugin name.
    pub fn name(&self) -> &str {
        match self {
            Self::Space(p) => p.name(),
            Self::DeltaE(p) => p.name(),
            Self::Fit(p) => p.name(),
            Self::Cat(p) => p.name(),
            Self::Contrast(p) => p.name(),
            Self::Filter(p) => p.name(),
            Self::Interpolate(p) => p.name(),
            Self::Cct(p) => p.name(),
        }
    }
}

/// A name→plugin map.
type Map<T> = HashMap<String, Arc<T>>;

/// Inserts unless present; `overwrite` replaces, `silent` skips quietly.
fn insert<T: ?Sized>(map: &mut Map<T>, kind: &str, name: &str, plugin: Arc<T>, overwrite: bool, silent: bool) -> Result<()> {
    if name != "*" && (overwrite || !map.contains_key(name)) {
        map.insert(name.to_string(), plugin);
        return Ok(());
    }
    if silent {
        return Ok(());
    }
    Err(Error::config(format!("a {kind} plugin named '{name}' already exists or is not allowed")))
}

/// Removes `name` (or everything for `*`).
fn remove<T: ?Sized>(map: &mut Map<T>, kind: &'static str, name: &str, silent: bool) -> Result<()> {
    if name == "*" {
        map.clear();
    } else if map.remove(name).is_none() && !silent {
        return Err(Error::unknown(kind, name));
    }
    Ok(())
}

// ============================================================================
// Registry
// ============================================================================

/// Name→plugin maps, engine defaults and the conversion-chain cache.
pub struct Registry {
    defaults: Defaults,
    spaces: Vec<Arc<dyn Space>>,
    space_index: HashMap<&'static str, usize>,
    delta_e: Map<dyn DeltaE>,
    fit: Map<dyn Fit>,
    cat: Map<dyn Cat>,
    contrast: Map<dyn Contrast>,
    filter: Map<dyn Filter>,
    interpolate: Map<dyn Interpolate>,
    cct: Map<dyn Cct>,
    pub(crate) chains: RwLock<HashMap<(&'static str, String), Arc<[Hop]>>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("spaces", &self.space_names())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            defaults: self.defaults.clone(),
            spaces: self.spaces.clone(),
            space_index: self.space_index.clone(),
            delta_e: self.delta_e.clone(),
            fit: self.fit.clone(),
            cat: self.cat.clone(),
            contrast: self.contrast.clone(),
            filter: self.filter.clone(),
            interpolate: self.interpolate.clone(),
            cct: self.cct.clone(),
            chains: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for Registry {
    /// A registry with every built-in plugin.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin();
        registry
    }
}

impl Registry {
    /// A registry with no plugins and default settings.
    pub fn empty() -> Self {
        Self {
            defaults: Defaults::default(),
            spaces: Vec::new(),
            space_index: HashMap::new(),
            delta_e: HashMap::new(),
            fit: HashMap::new(),
            cat: HashMap::new(),
            contrast: HashMap::new(),
            filter: HashMap::new(),
            interpolate: HashMap::new(),
            cct: HashMap::new(),
            chains: RwLock::new(HashMap::new()),
        }
    }

    /// The shared, fully populated registry.
    pub fn global() -> &'static Arc<Registry> {
        static INSTANCE: OnceLock<Arc<Registry>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(Registry::default()))
    }

    fn register_builtin(&mut self) {
        let mut plugins: Vec<Plugin> = spaces::builtin().into_iter().map(Plugin::Space).collect();
        plugins.extend(distance::builtin().into_iter().map(Plugin::DeltaE));
        plugins.extend(gamut::builtin().into_iter().map(Plugin::Fit));
        plugins.extend(cat::builtin().into_iter().map(Plugin::cat));
        plugins.extend(contrast::builtin().into_iter().map(Plugin::Contrast));
        plugins.extend(filters::builtin().into_iter().map(Plugin::Filter));
        plugins.extend(interpolate::builtin().into_iter().map(Plugin::Interpolate));
        plugins.extend(temperature::builtin().into_iter().map(Plugin::Cct));
        for plugin in plugins {
            // Built-in names are unique; silent keeps this infallible.
            let _ = self.register(plugin, false, true);
        }
        debug!(spaces = self.spaces.len(), "registered built-in plugins");
    }

    /// Engine defaults.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Mutable engine defaults.
    pub fn defaults_mut(&mut self) -> &mut Defaults {
        &mut self.defaults
    }

    /// Registers a plugin.
    ///
    /// A name that is already taken is an error unless `overwrite` replaces
    /// it or `silent` skips it. The reserved `clip` fit method can never be
    /// registered. Registering a space clears the conversion-chain cache.
    pub fn register(&mut self, plugin: Plugin, overwrite: bool, silent: bool) -> Result<()> {
        let kind = plugin.kind();
        let name = plugin.name().to_string();
        debug!(kind, name = %name, overwrite, "register plugin");

        match plugin {
            Plugin::Space(space) => {
                self.clear_chains();
                let taken = self.space_index.contains_key(space.name());
                if name != "*" && (!taken || overwrite) {
                    if let Some(&i) = self.space_index.get(space.name()) {
                        self.spaces[i] = space;
                    } else {
                        self.space_index.insert(space.name(), self.spaces.len());
                        self.spaces.push(space);
                    }
                    Ok(())
                } else if silent {
                    Ok(())
                } else {
                    Err(Error::config(format!("a space plugin named '{name}' already exists or is not allowed")))
                }
            }
            Plugin::Fit(fit) => {
                if name == RESERVED_FIT {
                    return if silent {
                        Ok(())
                    } else {
                        Err(Error::config(format!("'{RESERVED_FIT}' is a reserved fit method and cannot be overridden")))
                    };
                }
                insert(&mut self.fit, kind, &name, fit, overwrite, silent)
            }
            Plugin::DeltaE(p) => insert(&mut self.delta_e, kind, &name, p, overwrite, silent),
            Plugin::Cat(p) => insert(&mut self.cat, kind, &name, p, overwrite, silent),
            Plugin::Contrast(p) => insert(&mut self.contrast, kind, &name, p, overwrite, silent),
            Plugin::Filter(p) => insert(&mut self.filter, kind, &name, p, overwrite, silent),
            Plugin::Interpolate(p) => insert(&mut self.interpolate, kind, &name, p, overwrite, silent),
            Plugin::Cct(p) => insert(&mut self.cct, kind, &name, p, overwrite, silent),
        }
    }

    /// Registers several plugins, stopping at the first failure.
    pub fn register_all(&mut self, plugins: impl IntoIterator<Item = Plugin>, overwrite: bool, silent: bool) -> Result<()> {
        plugins.into_iter().try_for_each(|p| self.register(p, overwrite, silent))
    }

    /// Removes plugins by `kind:name`, `kind:*` or `*` (everything).
    ///
    /// The reserved `fit:clip` cannot be removed. Removing a name that is
    /// not registered is an error unless `silent`.
    pub fn deregister(&mut self, plugin: &str, silent: bool) -> Result<()> {
        debug!(plugin, "deregister plugin");
        if plugin == "*" {
            self.spaces.clear();
            self.space_index.clear();
            self.delta_e.clear();
            self.fit.clear();
            self.cat.clear();
            self.contrast.clear();
            self.filter.clear();
            self.interpolate.clear();
            self.cct.clear();
            self.clear_chains();
            return Ok(());
        }

        let Some((kind, name)) = plugin.split_once(':') else {
            return Err(Error::config(format!("plugin '{plugin}' must be given as 'kind:name'")));
        };
        match kind {
            "space" => {
                self.clear_chains();
                if name == "*" {
                    self.spaces.clear();
                    self.space_index.clear();
                } else if self.space_index.contains_key(name) {
                    self.spaces.retain(|s| s.name() != name);
                    self.reindex();
                } else if !silent {
                    return Err(Error::unknown("space", name));
                }
                Ok(())
            }
            "fit" => {
                if name == RESERVED_FIT {
                    return if silent {
                        Ok(())
                    } else {
                        Err(Error::config(format!("'{RESERVED_FIT}' is a reserved fit method and cannot be removed")))
                    };
                }
                remove(&mut self.fit, "fit", name, silent)
            }
            "delta-e" => remove(&mut self.delta_e, "delta-e", name, silent),
            "cat" => remove(&mut self.cat, "cat", name, silent),
            "contrast" => remove(&mut self.contrast, "contrast", name, silent),
            "filter" => remove(&mut self.filter, "filter", name, silent),
            "interpolate" => remove(&mut self.interpolate, "interpolate", name, silent),
            "cct" => remove(&mut self.cct, "cct", name, silent),
            _ => Err(Error::config(format!("plugin category '{kind}' is not recognized"))),
        }
    }

    fn reindex(&mut self) {
        self.space_index = self.spaces.iter().enumerate().map(|(i, s)| (s.name(), i)).collect();
    }

    /// Drops every cached conversion chain.
    pub fn clear_chains(&self) {
        let mut chains = self.chains.write().unwrap_or_else(PoisonError::into_inner);
        if !chains.is_empty() {
            debug!(entries = chains.len(), "conversion chain cache cleared");
            chains.clear();
        }
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// A space by name.
    pub fn space(&self, name: &str) -> Result<&Arc<dyn Space>> {
        self.space_index
            .get(name)
            .map(|&i| &self.spaces[i])
            .ok_or_else(|| Error::unknown("space", name))
    }

    /// True if a space of that name is registered.
    pub fn has_space(&self, name: &str) -> bool {
        self.space_index.contains_key(name)
    }

    /// Spaces in registration order.
    pub fn spaces(&self) -> impl Iterator<Item = &Arc<dyn Space>> {
        self.spaces.iter()
    }

    /// Space names in registration order.
    pub fn space_names(&self) -> Vec<&'static str> {
        self.spaces.iter().map(|s| s.name()).collect()
    }

    /// A Delta E metric by name.
    pub fn delta_e(&self, name: &str) -> Result<&Arc<dyn DeltaE>> {
        self.delta_e.get(name).ok_or_else(|| Error::unknown("delta-e", name))
    }

    /// A fit method by name (`clip` is built in and not looked up here).
    pub fn fit(&self, name: &str) -> Result<&Arc<dyn Fit>> {
        self.fit.get(name).ok_or_else(|| Error::unknown("fit", name))
    }

    /// A CAT by name.
    pub fn cat(&self, name: &str) -> Result<&Arc<dyn Cat>> {
        self.cat.get(name).ok_or_else(|| Error::unknown("cat", name))
    }

    /// A contrast method by name.
    pub fn contrast(&self, name: &str) -> Result<&Arc<dyn Contrast>> {
        self.contrast.get(name).ok_or_else(|| Error::unknown("contrast", name))
    }

    /// A filter by name.
    pub fn filter(&self, name: &str) -> Result<&Arc<dyn Filter>> {
        self.filter.get(name).ok_or_else(|| Error::unknown("filter", name))
    }

    /// An interpolation method by name.
    pub fn interpolate(&self, name: &str) -> Result<&Arc<dyn Interpolate>> {
        self.interpolate.get(name).ok_or_else(|| Error::unknown("interpolate", name))
    }

    /// A CCT method by name.
    pub fn cct(&self, name: &str) -> Result<&Arc<dyn Cct>> {
        self.cct.get(name).ok_or_else(|| Error::unknown("cct", name))
    }

    /// Adapts `xyz` from white `w1` to `w2` with `method` (default CAT if `None`).
    pub fn chromatic_adaptation(&self, w1: Xy, w2: Xy, xyz: &[f64], method: Option<&str>) -> Result<Vec3> {
        let cat = self.cat(method.unwrap_or(&self.defaults.cat))?;
        cat.adapt(w1, w2, vec3(xyz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_core::ErrorKind;

    use crate::spaces::rgb::SRGB;

    #[test]
    fn test_duplicate_space_refused() {
        let mut r = Registry::default();
        let err = r.register(Plugin::space(SRGB), false, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(r.register(Plugin::space(SRGB), false, true).is_ok());
        assert!(r.register(Plugin::space(SRGB), true, false).is_ok());
        assert_eq!(r.space_names().iter().filter(|n| **n == "srgb").count(), 1);
    }

    #[test]
    fn test_reserved_clip() {
        let mut r = Registry::default();
        assert!(r.deregister("fit:clip", false).is_err());
        assert!(r.deregister("fit:clip", true).is_ok());
    }

    #[test]
    fn test_deregister_unknown() {
        let mut r = Registry::default();
        let err = r.deregister("delta-e:nope", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(r.deregister("delta-e:nope", true).is_ok());
        assert!(r.deregister("bogus:thing", true).is_err());
    }

    #[test]
    fn test_deregister_space_keeps_order() {
        let mut r = Registry::default();
        r.deregister("space:hsv", false).unwrap();
        assert!(!r.has_space("hsv"));
        assert!(r.space("hwb").is_ok());
        let names = r.space_names();
        let srgb = names.iter().position(|n| *n == "srgb").unwrap();
        let hsl = names.iter().position(|n| *n == "hsl").unwrap();
        assert!(srgb < hsl);
    }

    #[test]
    fn test_clear_everything() {
        let mut r = Registry::default();
        r.deregister("*", false).unwrap();
        assert_eq!(r.spaces().count(), 0);
        assert!(r.delta_e("76").is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let base = Registry::default();
        let mut derived = base.clone();
        derived.deregister("delta-e:2000", false).unwrap();
        assert!(base.delta_e("2000").is_ok());
        assert!(derived.delta_e("2000").is_err());
    }

    #[test]
    fn test_defaults_serde() {
        let d = Defaults::default();
        let json = serde_json::to_string(&d).unwrap();
        let back: Defaults = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
        let partial: Defaults = serde_json::from_str(r#"{"precision": 3}"#).unwrap();
        assert_eq!(partial.precision, 3);
        assert_eq!(partial.fit, "lch-chroma");
    }
}
