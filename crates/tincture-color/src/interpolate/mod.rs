//! Interpolation between colors.
//!
//! A list of [`Stop`]s becomes an [`Interpolator`]: a function from progress
//! to color. Every method shares the same preparation. Each stop is
//! converted into the interpolation space and gamut fitted when that space
//! is bounded. Undefined channels are optionally carried forward and
//! achromatic hues made powerless. Only the curve through the prepared
//! points differs between methods, and that part is an [`Interpolate`]
//! plugin.
//!
//! | Name | Curve |
//! |------|-------|
//! | `linear` | straight legs, undefined values resolved per leg |
//! | `continuous` | straight legs, undefined values bridged across stops |
//! | `bspline` | uniform cubic B-spline |
//! | `natural` | B-spline through every stop |
//! | `catrom` | Catmull-Rom |
//! | `monotone` | monotone cubic Hermite |
//! | `bezier` | one Bezier curve over all stops |
//!
//! # Example
//!
//! ```rust
//! use tincture_color::Color;
//! use tincture_color::interpolate::{InterpolateOptions, Stop};
//!
//! let red = Color::parse("red").unwrap();
//! let blue = Color::parse("blue").unwrap();
//! let opts = InterpolateOptions::new().space("srgb");
//! let mid = red.mix(&blue, 0.5, &opts).unwrap();
//! assert!((mid.coords()[0] - 0.5).abs() < 1e-9);
//!
//! let ramp = Color::steps(&[Stop::from(&red), Stop::from(&blue)], &opts, 5, 1000, 0.0).unwrap();
//! assert_eq!(ramp.len(), 5);
//! ```

mod bezier;
pub mod easing;
mod linear;
mod spline;

pub use bezier::Bezier;
pub use easing::Easing;
pub use linear::Linear;
pub use spline::Continuous;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tincture_core::{Error, Result};
use tincture_math::{SplineKind, Vector, constrain_hue, ilerp, lerp};
use tracing::debug;

use crate::color::Color;
use crate::registry::Registry;
use crate::space::Space;

// ============================================================================
// Hue policy
// ============================================================================

/// How the hue travels between two stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hue {
    /// The arc of at most 180 degrees.
    #[default]
    Shorter,
    /// The arc of at least 180 degrees.
    Longer,
    /// Always counter-clockwise (hue grows).
    Increasing,
    /// Always clockwise (hue shrinks).
    Decreasing,
    /// Hues are used exactly as given.
    Specified,
}

impl Hue {
    /// Adjusts a pair of hues so a straight interpolation follows the arc.
    ///
    /// Except under `Specified`, both hues are first wrapped into
    /// `[0, 360)`. Undefined hues are returned wrapped but unadjusted.
    pub fn adjust(self, h1: f64, h2: f64) -> (f64, f64) {
        if self == Self::Specified {
            return (h1, h2);
        }
        let (mut c1, mut c2) = (constrain_hue(h1), constrain_hue(h2));
        if c1.is_nan() || c2.is_nan() {
            return (c1, c2);
        }
        let d = c2 - c1;
        match self {
            Self::Shorter => {
                if d > 180.0 {
                    c1 += 360.0;
                } else if d < -180.0 {
                    c2 += 360.0;
                }
            }
            Self::Longer => {
                if 0.0 < d && d < 180.0 {
                    c1 += 360.0;
                } else if -180.0 < d && d <= 0.0 {
                    c2 += 360.0;
                }
            }
            Self::Increasing => {
                if c2 < c1 {
                    c2 += 360.0;
                }
            }
            Self::Decreasing => {
                if c1 < c2 {
                    c1 += 360.0;
                }
            }
            Self::Specified => {}
        }
        (c1, c2)
    }

    /// Policy name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Shorter => "shorter",
            Self::Longer => "longer",
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Specified => "specified",
        }
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "shorter" => Self::Shorter,
            "longer" => Self::Longer,
            "increasing" => Self::Increasing,
            "decreasing" => Self::Decreasing,
            "specified" => Self::Specified,
            other => return Err(Error::unknown("hue", other)),
        })
    }
}

// ============================================================================
// Plugin interface
// ============================================================================

/// Channel layout of the interpolation space.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Hue channel, when the space is polar.
    pub hue: Option<usize>,
    /// Hue policy.
    pub policy: Hue,
    /// Per channel (alpha excluded): true for angles, which are never
    /// premultiplied.
    pub angles: Vec<bool>,
    /// Whether channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl Layout {
    /// Multiplies the non-angle channels of `point` by `alpha`.
    pub fn premultiply(&self, point: &mut [f64], alpha: f64) {
        if !self.premultiplied || alpha.is_nan() || alpha == 1.0 {
            return;
        }
        for (v, angle) in point.iter_mut().zip(&self.angles) {
            if !angle {
                *v *= alpha;
            }
        }
    }

    /// Divides premultiplied channels by the trailing alpha.
    pub fn postdivide(&self, point: &mut [f64]) {
        let Some(&alpha) = point.last() else { return };
        if !self.premultiplied || alpha.is_nan() || alpha == 0.0 || alpha == 1.0 {
            return;
        }
        for (v, angle) in point.iter_mut().zip(&self.angles) {
            if !angle {
                *v /= alpha;
            }
        }
    }

    /// Index of alpha within a point.
    pub fn alpha(&self) -> usize {
        self.angles.len()
    }
}

/// Values along a prepared curve.
pub trait Curve: Send + Sync + fmt::Debug {
    /// Value of `channel` on leg `leg` at local progress `t`.
    ///
    /// `t` leaves `[0, 1]` only on the first and last legs, when
    /// extrapolating.
    fn value(&self, leg: usize, channel: usize, t: f64) -> f64;
}

/// An interpolation method.
pub trait Interpolate: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// Builds the curve through `points`.
    ///
    /// Each point is the channels of one stop followed by its alpha, in
    /// the interpolation space. Undefined values are NaN. The method owns
    /// hue fix-ups, undefined handling and premultiplication.
    fn curve(&self, points: Vec<Vector>, layout: &Layout) -> Result<Box<dyn Curve>>;
}

/// Built-in methods.
pub fn builtin() -> Vec<Arc<dyn Interpolate>> {
    vec![
        Arc::new(Linear),
        Arc::new(Continuous::new(SplineKind::Linear)),
        Arc::new(Continuous::new(SplineKind::BSpline)),
        Arc::new(Continuous::new(SplineKind::Natural)),
        Arc::new(Continuous::new(SplineKind::CatmullRom)),
        Arc::new(Continuous::new(SplineKind::Monotone)),
        Arc::new(Bezier),
    ]
}

// ============================================================================
// Shared preparation
// ============================================================================

/// Unwraps the hue of each point relative to the previous defined one.
pub(crate) fn fix_hue_sequence(points: &mut [Vector], hue: usize, policy: Hue) {
    if policy == Hue::Specified {
        return;
    }
    let mut last: Option<f64> = None;
    for p in points.iter_mut() {
        let h = p[hue];
        if h.is_nan() {
            continue;
        }
        p[hue] = match last {
            None => constrain_hue(h),
            Some(prev) => {
                let (a, b) = policy.adjust(prev, h);
                prev + (b - a)
            }
        };
        last = Some(p[hue]);
    }
}

/// Fills undefined values by linear interpolation between the nearest
/// defined neighbours; runs at either end take the nearest defined value.
pub(crate) fn backfill_undefined(points: &mut [Vector]) {
    let Some(width) = points.first().map(Vec::len) else { return };
    for ch in 0..width {
        let defined: Vec<usize> = (0..points.len()).filter(|&i| !points[i][ch].is_nan()).collect();
        let (Some(&first), Some(&last)) = (defined.first(), defined.last()) else { continue };
        for i in 0..first {
            points[i][ch] = points[first][ch];
        }
        for i in last + 1..points.len() {
            points[i][ch] = points[last][ch];
        }
        for pair in defined.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let span = (b - a) as f64;
            let (va, vb) = (points[a][ch], points[b][ch]);
            for i in a + 1..b {
                points[i][ch] = lerp(va, vb, (i - a) as f64 / span);
            }
        }
    }
}

/// Normalizes stop positions.
///
/// The first stop defaults to 0 and the last to 1. A position below an
/// earlier one is raised to it. Gaps are filled by even subdivision; a
/// trailing gap after a position past 1 repeats that position.
pub fn calc_stops(positions: &[Option<f64>]) -> Vec<f64> {
    let count = positions.len();
    let mut out = vec![0.0; count];
    if count == 0 {
        return out;
    }
    let mut last = positions[0].unwrap_or(0.0);
    let mut highest = last;
    let mut empty: Option<usize> = None;
    out[0] = last;

    for i in 1..count {
        let Some(mut value) = positions[i] else {
            if empty.is_none() {
                empty = Some(i - 1);
            }
            continue;
        };
        value = value.max(last);
        highest = highest.max(value);
        if let Some(start) = empty.take() {
            let increment = (value - last) / (i - start) as f64;
            for slot in out.iter_mut().take(i).skip(start + 1) {
                last += increment;
                *slot = last;
            }
        }
        last = value;
        out[i] = last;
    }

    if let Some(start) = empty {
        let increment = if highest > 1.0 { 0.0 } else { (1.0 - last) / (count - 1 - start) as f64 };
        for slot in out.iter_mut().skip(start + 1) {
            last += increment;
            *slot = last;
        }
    }
    out
}

/// Channel families that CSS treats as analogous across spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Analog {
    Red,
    Green,
    Blue,
    Lightness,
    Colorfulness,
    Hue,
    OpponentA,
    OpponentB,
}

fn analogs(space: &dyn Space) -> Vec<Option<Analog>> {
    let mut out = vec![None; space.channels().len()];
    let mut tag = |indexes: [usize; 3], kinds: [Option<Analog>; 3]| {
        for (i, k) in indexes.into_iter().zip(kinds) {
            if let Some(slot) = out.get_mut(i) {
                *slot = k;
            }
        }
    };
    use Analog::*;
    if let Some(c) = space.rgb() {
        tag(c.indexes(), [Some(Red), Some(Green), Some(Blue)]);
    } else if let Some(c) = space.lch() {
        tag(c.indexes(), [Some(Lightness), Some(Colorfulness), Some(Hue)]);
    } else if let Some(c) = space.lab() {
        tag(c.indexes(), [Some(Lightness), Some(OpponentA), Some(OpponentB)]);
    } else if let Some(c) = space.hsl() {
        tag(c.indexes(), [Some(Hue), Some(Colorfulness), Some(Lightness)]);
    } else if let Some(c) = space.hsv() {
        tag(c.indexes(), [Some(Hue), Some(Colorfulness), None]);
    } else if let Some(c) = space.hwb() {
        tag(c.indexes(), [Some(Hue), None, None]);
    }
    out
}

/// Marks channels of `converted` undefined where the analogous channel of
/// `source` was undefined.
fn carry_forward(source: &Color, converted: &mut Color) {
    let missing: Vec<Analog> = analogs(source.space_def().as_ref())
        .into_iter()
        .zip(source.coords())
        .filter_map(|(a, v)| a.filter(|_| v.is_nan()))
        .collect();
    if missing.is_empty() {
        return;
    }
    let targets = analogs(converted.space_def().as_ref());
    for (i, a) in targets.into_iter().enumerate() {
        if a.is_some_and(|a| missing.contains(&a)) {
            converted.set_raw(i, f64::NAN);
        }
    }
}

// ============================================================================
// Options and stops
// ============================================================================

/// A color with an optional position and easing.
#[derive(Debug, Clone)]
pub struct Stop {
    /// The color.
    pub color: Color,
    /// Position along the interpolation; `None` is spaced evenly.
    pub position: Option<f64>,
    /// Easing for the leg that starts at this stop; overrides the
    /// interpolation-wide progress.
    pub easing: Option<Easing>,
}

impl Stop {
    /// A stop without position or easing.
    pub fn new(color: Color) -> Self {
        Self { color, position: None, easing: None }
    }

    /// Places the stop.
    pub fn at(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    /// Eases the leg leaving this stop.
    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

impl From<Color> for Stop {
    fn from(color: Color) -> Self {
        Self::new(color)
    }
}

impl From<&Color> for Stop {
    fn from(color: &Color) -> Self {
        Self::new(color.clone())
    }
}

/// Options for [`Color::interpolate`] and friends.
#[derive(Debug, Clone)]
pub struct InterpolateOptions {
    /// Interpolation space; `None` uses the registry default.
    pub space: Option<String>,
    /// Output space; `None` uses the first stop's space.
    pub out_space: Option<String>,
    /// Method; `None` uses the registry default.
    pub method: Option<String>,
    /// Hue policy; `None` uses the registry default.
    pub hue: Option<Hue>,
    /// Interpolate premultiplied by alpha.
    pub premultiplied: bool,
    /// Continue the end legs beyond the first and last stops.
    pub extrapolate: bool,
    /// Input values mapped onto `[0, 1]`; empty means `[0, 1]` itself.
    pub domain: Vec<f64>,
    /// Progress trimmed from the start and the end.
    pub padding: (f64, f64),
    /// Easing per channel name, with `all` as the fallback.
    pub progress: HashMap<String, Easing>,
    /// Carry undefined channels into analogous channels; `None` uses the
    /// registry default.
    pub carryforward: Option<bool>,
    /// Make achromatic hues undefined; `None` uses the registry default.
    pub powerless: Option<bool>,
}

impl Default for InterpolateOptions {
    fn default() -> Self {
        Self {
            space: None,
            out_space: None,
            method: None,
            hue: None,
            premultiplied: true,
            extrapolate: false,
            domain: Vec::new(),
            padding: (0.0, 0.0),
            progress: HashMap::new(),
            carryforward: None,
            powerless: None,
        }
    }
}

impl InterpolateOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interpolation space.
    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    /// Sets the output space.
    pub fn out_space(mut self, space: impl Into<String>) -> Self {
        self.out_space = Some(space.into());
        self
    }

    /// Sets the method.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the hue policy.
    pub fn hue(mut self, hue: Hue) -> Self {
        self.hue = Some(hue);
        self
    }

    /// Enables or disables premultiplication.
    pub fn premultiplied(mut self, on: bool) -> Self {
        self.premultiplied = on;
        self
    }

    /// Enables or disables extrapolation.
    pub fn extrapolate(mut self, on: bool) -> Self {
        self.extrapolate = on;
        self
    }

    /// Sets the input domain.
    pub fn domain(mut self, domain: &[f64]) -> Self {
        self.domain = domain.to_vec();
        self
    }

    /// Trims progress at both ends.
    pub fn padding(mut self, start: f64, end: f64) -> Self {
        self.padding = (start, end);
        self
    }

    /// Eases every channel.
    pub fn progress(mut self, easing: Easing) -> Self {
        self.progress.insert("all".into(), easing);
        self
    }

    /// Eases one channel (by name or alias, or `alpha`).
    pub fn channel_progress(mut self, channel: impl Into<String>, easing: Easing) -> Self {
        self.progress.insert(channel.into(), easing);
        self
    }

    /// Sets carry-forward.
    pub fn carryforward(mut self, on: bool) -> Self {
        self.carryforward = Some(on);
        self
    }

    /// Sets powerless-hue handling.
    pub fn powerless(mut self, on: bool) -> Self {
        self.powerless = Some(on);
        self
    }
}

// ============================================================================
// Interpolator
// ============================================================================

/// Piecewise mapping of an input domain onto `[0, 1]`.
#[derive(Debug, Clone, Default)]
struct Domain(Vec<f64>);

impl Domain {
    fn new(values: &[f64]) -> Self {
        let mut out = Vec::with_capacity(values.len());
        for &v in values {
            let floor = out.last().copied().unwrap_or(f64::NEG_INFINITY);
            out.push(v.max(floor));
        }
        Self(out)
    }

    fn scale(&self, p: f64) -> f64 {
        let d = &self.0;
        if d.len() < 2 {
            return p;
        }
        let segments = d.len() - 1;
        let i = (0..segments).find(|&k| p <= d[k + 1]).unwrap_or(segments - 1);
        (i as f64 + ilerp(d[i], d[i + 1], p)) / segments as f64
    }
}

/// A function from progress to color.
#[derive(Debug, Clone)]
pub struct Interpolator {
    registry: Arc<Registry>,
    space: Arc<dyn Space>,
    out_space: String,
    curve: Arc<dyn Curve>,
    stops: Vec<f64>,
    /// Per leg, per channel (alpha last).
    easings: Vec<Vec<Option<Easing>>>,
    layout: Layout,
    extrapolate: bool,
    domain: Domain,
    padding: (f64, f64),
}

impl Interpolator {
    /// Builds an interpolator through `stops`.
    pub fn new(stops: &[Stop], options: &InterpolateOptions) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::config("need at least two colors to interpolate"));
        }
        let first = &stops[0].color;
        let registry = first.registry().clone();
        let defaults = registry.defaults();
        let space_name = options.space.as_deref().unwrap_or(defaults.interpolation_space.as_str());
        let space = registry.space(space_name)?.clone();
        let method = registry.interpolate(options.method.as_deref().unwrap_or(defaults.interpolator.as_str()))?.clone();
        let carry = options.carryforward.unwrap_or(defaults.carryforward);
        let powerless = options.powerless.unwrap_or(defaults.powerless);

        let layout = Layout {
            hue: space.cylindrical().map(|c| c.hue_index()),
            policy: options.hue.unwrap_or(defaults.hue),
            angles: space.channels().iter().map(|c| c.is_angle()).collect(),
            premultiplied: options.premultiplied,
        };

        let mut points = Vec::with_capacity(stops.len());
        for stop in stops {
            let source = first.adopt(&stop.color)?;
            let mut c = source.convert(space.name())?;
            if !space.extended_range() && !c.in_gamut(None)? {
                c.fit(None, None)?;
            }
            if carry {
                carry_forward(&source, &mut c);
            }
            if powerless {
                if let Some(h) = layout.hue {
                    if !c.raw(h).is_nan() && c.is_achromatic()? {
                        c.set_raw(h, f64::NAN);
                    }
                }
            }
            let mut point = c.coords().to_vec();
            point.push(c.alpha());
            points.push(point);
        }

        let positions: Vec<Option<f64>> = stops.iter().map(|s| s.position).collect();
        let easings = Self::easings(space.as_ref(), stops, &options.progress)?;
        debug!(method = method.name(), space = space.name(), stops = stops.len(), "build interpolator");
        let curve = Arc::from(method.curve(points, &layout)?);

        Ok(Self {
            out_space: options.out_space.clone().unwrap_or_else(|| first.space().to_string()),
            registry,
            space,
            curve,
            stops: calc_stops(&positions),
            easings,
            layout,
            extrapolate: options.extrapolate,
            domain: Domain::new(&options.domain),
            padding: options.padding,
        })
    }

    fn easings(
        space: &dyn Space,
        stops: &[Stop],
        progress: &HashMap<String, Easing>,
    ) -> Result<Vec<Vec<Option<Easing>>>> {
        let width = space.channels().len() + 1;
        let mut per_channel: Vec<Option<Easing>> = vec![progress.get("all").cloned(); width];
        for (name, easing) in progress {
            if name == "all" {
                continue;
            }
            let i = space
                .channel_index(name)
                .ok_or_else(|| Error::config(format!("'{name}' is not a channel of '{}'", space.name())))?;
            per_channel[i] = Some(easing.clone());
        }
        Ok(stops[..stops.len() - 1]
            .iter()
            .map(|s| match &s.easing {
                Some(e) => vec![Some(e.clone()); width],
                None => per_channel.clone(),
            })
            .collect())
    }

    /// Color at `p` in the input domain.
    pub fn at(&self, p: f64) -> Result<Color> {
        self.sample(self.domain.scale(p))
    }

    /// Changes the input domain.
    pub fn set_domain(&mut self, domain: &[f64]) -> &mut Self {
        self.domain = Domain::new(domain);
        self
    }

    /// Changes the output space.
    pub fn set_out_space(&mut self, space: impl Into<String>) -> &mut Self {
        self.out_space = space.into();
        self
    }

    /// Normalized stop positions.
    pub fn stops(&self) -> &[f64] {
        &self.stops
    }

    /// Leg and local progress for normalized progress `p`.
    fn locate(&self, p: f64) -> (usize, f64) {
        let legs = self.stops.len() - 1;
        let first = self.stops[0];
        let last = self.stops[legs];
        if p < first {
            let r = self.stops[1] - first;
            let t = if self.extrapolate && r != 0.0 { (p - first) / r } else { 0.0 };
            return (0, t);
        }
        if p > last {
            let r = last - self.stops[legs - 1];
            let t = if self.extrapolate && r != 0.0 { 1.0 + (p - last) / r } else { 1.0 };
            return (legs - 1, t);
        }
        for i in 0..legs {
            if p <= self.stops[i + 1] {
                let r = self.stops[i + 1] - self.stops[i];
                return (i, if r != 0.0 { (p - self.stops[i]) / r } else { 1.0 });
            }
        }
        (legs - 1, 1.0)
    }

    /// Color at normalized progress `p`, before the domain mapping.
    fn sample(&self, p: f64) -> Result<Color> {
        let mut p = lerp(self.padding.0, 1.0 - self.padding.1, p);
        if !self.extrapolate {
            p = p.clamp(0.0, 1.0);
        }
        let (leg, t) = self.locate(p);

        let mut values: Vec<f64> = self.easings[leg]
            .iter()
            .enumerate()
            .map(|(ch, easing)| {
                let t = match easing {
                    Some(e) if (0.0..=1.0).contains(&t) => e.apply(t).clamp(0.0, 1.0),
                    _ => t,
                };
                self.curve.value(leg, ch, t)
            })
            .collect();
        self.layout.postdivide(&mut values);
        if let Some(h) = self.layout.hue {
            values[h] = constrain_hue(values[h]);
        }
        let alpha = values.pop().unwrap_or(1.0);
        let color = Color::build(self.registry.clone(), self.space.clone(), &values, alpha);
        color.convert(&self.out_space)
    }

    /// `count` evenly spaced colors.
    ///
    /// With `max_delta_e > 0`, midpoints are inserted between every pair
    /// until no neighbours differ by more than `max_delta_e` (measured with
    /// `delta_e`, the registry default when `None`), or until doubling
    /// would exceed `max_steps`.
    pub fn steps(&self, count: usize, max_steps: usize, max_delta_e: f64, delta_e: Option<&str>) -> Result<Vec<Color>> {
        let mut actual = count;
        if max_delta_e != 0.0 && actual < 2 {
            actual = 2;
        }
        actual = actual.min(max_steps);

        let mut ret: Vec<(f64, Color)> = match actual {
            0 => Vec::new(),
            1 => vec![(0.5, self.sample(0.5)?)],
            n => (0..n)
                .map(|i| {
                    let p = i as f64 / (n - 1) as f64;
                    Ok((p, self.sample(p)?))
                })
                .collect::<Result<_>>()?,
        };

        if max_delta_e > 0.0 {
            let mut worst = 0.0f64;
            for w in ret.windows(2) {
                worst = worst.max(w[0].1.delta_e(&w[1].1, delta_e)?);
            }
            while worst > max_delta_e && ret.len() * 2 <= max_steps + 1 {
                worst = 0.0;
                let mut refined = Vec::with_capacity(ret.len() * 2);
                let mut iter = ret.into_iter();
                if let Some(mut prev) = iter.next() {
                    for cur in iter {
                        let p = (prev.0 + cur.0) / 2.0;
                        let color = self.sample(p)?;
                        worst = worst.max(color.delta_e(&prev.1, delta_e)?).max(color.delta_e(&cur.1, delta_e)?);
                        refined.push(prev);
                        refined.push((p, color));
                        prev = cur;
                    }
                    refined.push(prev);
                }
                ret = refined;
            }
        }
        Ok(ret.into_iter().map(|(_, c)| c).collect())
    }

    /// Quantizes into `count` flat bands (see [`Interpolator::steps`]).
    pub fn discretize(
        &self,
        count: usize,
        max_steps: usize,
        max_delta_e: f64,
        delta_e: Option<&str>,
    ) -> Result<Discrete> {
        let colors = self.steps(count, max_steps, max_delta_e, delta_e)?;
        if colors.is_empty() {
            return Err(Error::config("a discrete interpolation needs at least one step"));
        }
        Ok(Discrete { colors, domain: self.domain.clone(), out_space: self.out_space.clone() })
    }
}

/// Interpolation snapped to a fixed set of colors.
#[derive(Debug, Clone)]
pub struct Discrete {
    colors: Vec<Color>,
    domain: Domain,
    out_space: String,
}

impl Discrete {
    /// The color of the band containing `p`.
    pub fn at(&self, p: f64) -> Result<Color> {
        let n = self.colors.len();
        let p = self.domain.scale(p);
        let i = ((p * n as f64).floor().max(0.0) as usize).min(n - 1);
        self.colors[i].convert(&self.out_space)
    }

    /// The band colors.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Changes the input domain.
    pub fn set_domain(&mut self, domain: &[f64]) -> &mut Self {
        self.domain = Domain::new(domain);
        self
    }

    /// Changes the output space.
    pub fn set_out_space(&mut self, space: impl Into<String>) -> &mut Self {
        self.out_space = space.into();
        self
    }
}

// ============================================================================
// Color operations
// ============================================================================

impl Color {
    /// An interpolator through `stops`.
    pub fn interpolate(stops: &[Stop], options: &InterpolateOptions) -> Result<Interpolator> {
        Interpolator::new(stops, options)
    }

    /// The color `fraction` of the way from this color to `other`.
    ///
    /// Any domain in `options` is ignored; `fraction` is always in `[0, 1]`
    /// terms.
    pub fn mix(&self, other: &Color, fraction: f64, options: &InterpolateOptions) -> Result<Color> {
        Interpolator::new(&[Stop::from(self), Stop::from(other)], options)?.sample(fraction)
    }

    /// `count` colors evenly spaced through `stops`, refined until
    /// neighbours differ by at most `max_delta_e` when it is positive.
    pub fn steps(
        stops: &[Stop],
        options: &InterpolateOptions,
        count: usize,
        max_steps: usize,
        max_delta_e: f64,
    ) -> Result<Vec<Color>> {
        Interpolator::new(stops, options)?.steps(count, max_steps, max_delta_e, None)
    }

    /// A banded interpolation with `count` bands (one per stop when `None`).
    pub fn discrete(stops: &[Stop], options: &InterpolateOptions, count: Option<usize>) -> Result<Discrete> {
        Interpolator::new(stops, options)?.discretize(count.unwrap_or(stops.len()), 1000, 0.0, None)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tincture_core::ErrorKind;

    use super::*;

    fn srgb(r: f64, g: f64, b: f64) -> Color {
        Color::new("srgb", &[r, g, b], 1.0).unwrap()
    }

    fn stops(colors: &[Color]) -> Vec<Stop> {
        colors.iter().map(Stop::from).collect()
    }

    #[test]
    fn test_calc_stops() {
        assert_eq!(calc_stops(&[None, None, None]), vec![0.0, 0.5, 1.0]);
        assert_eq!(calc_stops(&[Some(0.2), None, Some(0.1)]), vec![0.2, 0.2, 0.2]);
        let filled = calc_stops(&[None, Some(0.8), None, None]);
        assert_abs_diff_eq!(filled[2], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(filled[3], 1.0, epsilon = 1e-12);
        assert_eq!(calc_stops(&[None, Some(1.5), None]), vec![0.0, 1.5, 1.5]);
    }

    #[test]
    fn test_hue_policies() {
        assert_eq!(Hue::Shorter.adjust(350.0, 10.0), (350.0, 370.0));
        assert_eq!(Hue::Longer.adjust(10.0, 20.0), (370.0, 20.0));
        assert_eq!(Hue::Increasing.adjust(20.0, 10.0), (20.0, 370.0));
        assert_eq!(Hue::Decreasing.adjust(10.0, 20.0), (370.0, 20.0));
        assert_eq!(Hue::Specified.adjust(400.0, 10.0), (400.0, 10.0));
        let (a, b) = Hue::Shorter.adjust(f64::NAN, 370.0);
        assert!(a.is_nan());
        assert_eq!(b, 10.0);
        assert_eq!("longer".parse::<Hue>().unwrap(), Hue::Longer);
        assert_eq!(serde_json::to_string(&Hue::Increasing).unwrap(), "\"increasing\"");
    }

    #[test]
    fn test_fix_hue_sequence_unwraps() {
        let mut pts = vec![vec![340.0], vec![f64::NAN], vec![20.0], vec![60.0]];
        fix_hue_sequence(&mut pts, 0, Hue::Shorter);
        assert_eq!(pts[2][0], 380.0);
        assert_eq!(pts[3][0], 420.0);
        assert!(pts[1][0].is_nan());
    }

    #[test]
    fn test_backfill() {
        let mut pts = vec![vec![f64::NAN], vec![2.0], vec![f64::NAN], vec![f64::NAN], vec![8.0], vec![f64::NAN]];
        backfill_undefined(&mut pts);
        let got: Vec<f64> = pts.iter().map(|p| p[0]).collect();
        assert_eq!(got, vec![2.0, 2.0, 4.0, 6.0, 8.0, 8.0]);
    }

    #[test]
    fn test_mix_midpoint() {
        let opts = InterpolateOptions::new().space("srgb");
        let mid = srgb(1.0, 0.0, 0.0).mix(&srgb(0.0, 0.0, 1.0), 0.5, &opts).unwrap();
        assert_eq!(mid.space(), "srgb");
        assert_abs_diff_eq!(mid.coords()[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.coords()[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_channel_carried() {
        let opts = InterpolateOptions::new().space("srgb");
        let a = Color::new("srgb", &[1.0, f64::NAN, 0.0], 1.0).unwrap();
        let mid = a.mix(&srgb(0.0, 1.0, 1.0), 0.25, &opts).unwrap();
        assert_abs_diff_eq!(mid.coords()[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.coords()[0], 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_premultiplied_alpha() {
        let clear_red = Color::new("srgb", &[1.0, 0.0, 0.0], 0.0).unwrap();
        let blue = srgb(0.0, 0.0, 1.0);
        let pre = clear_red.mix(&blue, 0.5, &InterpolateOptions::new().space("srgb")).unwrap();
        assert_abs_diff_eq!(pre.coords()[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pre.coords()[2], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pre.alpha(), 0.5, epsilon = 1e-12);

        let straight = clear_red.mix(&blue, 0.5, &InterpolateOptions::new().space("srgb").premultiplied(false)).unwrap();
        assert_abs_diff_eq!(straight.coords()[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_hue_arcs() {
        let a = Color::new("hsl", &[350.0, 1.0, 0.5], 1.0).unwrap();
        let b = Color::new("hsl", &[10.0, 1.0, 0.5], 1.0).unwrap();
        let shorter = a.mix(&b, 0.5, &InterpolateOptions::new().space("hsl")).unwrap();
        assert_abs_diff_eq!(shorter.coords()[0], 0.0, epsilon = 1e-9);
        let longer = a.mix(&b, 0.5, &InterpolateOptions::new().space("hsl").hue(Hue::Longer)).unwrap();
        assert_abs_diff_eq!(longer.coords()[0], 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_powerless_hue() {
        let gray = Color::new("lch", &[50.0, 0.0, 120.0], 1.0).unwrap();
        let purple = Color::new("lch", &[50.0, 50.0, 300.0], 1.0).unwrap();
        let base = InterpolateOptions::new().space("lch");
        let kept = gray.mix(&purple, 0.5, &base).unwrap();
        assert_abs_diff_eq!(kept.coords()[2], 210.0, epsilon = 1e-9);
        let powerless = gray.mix(&purple, 0.5, &base.clone().powerless(true)).unwrap();
        assert_abs_diff_eq!(powerless.coords()[2], 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_carryforward() {
        let a = Color::new("srgb", &[f64::NAN, 0.5, 0.5], 1.0).unwrap();
        let b = srgb(1.0, 0.0, 0.0);
        let opts = InterpolateOptions::new().space("srgb-linear").carryforward(true);
        let mid = a.mix(&b, 0.5, &opts).unwrap();
        assert_abs_diff_eq!(mid.coords()[0], 1.0, epsilon = 1e-9);
        let plain = a.mix(&b, 0.5, &InterpolateOptions::new().space("srgb-linear")).unwrap();
        assert!(plain.coords()[0] < 0.9);
    }

    #[test]
    fn test_steps_and_refinement() {
        let opts = InterpolateOptions::new().space("srgb");
        let ramp = Color::steps(&stops(&[srgb(0.0, 0.0, 0.0), srgb(1.0, 1.0, 1.0)]), &opts, 5, 1000, 0.0).unwrap();
        let reds: Vec<f64> = ramp.iter().map(|c| c.coords()[0]).collect();
        for (got, want) in reds.iter().zip([0.0, 0.25, 0.5, 0.75, 1.0]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }

        let lab = InterpolateOptions::new().space("lab-d65");
        let fine = Color::steps(&stops(&[srgb(0.0, 0.0, 0.0), srgb(1.0, 1.0, 1.0)]), &lab, 2, 1000, 10.0).unwrap();
        assert!(fine.len() > 2);
        for w in fine.windows(2) {
            assert!(w[0].delta_e(&w[1], Some("76")).unwrap() <= 10.0 + 1e-9);
        }

        let capped = Color::steps(&stops(&[srgb(0.0, 0.0, 0.0), srgb(1.0, 1.0, 1.0)]), &lab, 2, 4, 1.0).unwrap();
        assert!(capped.len() <= 4);
    }

    #[test]
    fn test_extrapolation() {
        let a = Color::new("oklab", &[0.2, 0.0, 0.0], 1.0).unwrap();
        let b = Color::new("oklab", &[0.4, 0.0, 0.0], 1.0).unwrap();
        let s = stops(&[a, b]);
        let clamped = Color::interpolate(&s, &InterpolateOptions::new()).unwrap();
        assert_abs_diff_eq!(clamped.at(1.5).unwrap().coords()[0], 0.4, epsilon = 1e-12);
        let free = Color::interpolate(&s, &InterpolateOptions::new().extrapolate(true)).unwrap();
        assert_abs_diff_eq!(free.at(1.5).unwrap().coords()[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(free.at(-0.5).unwrap().coords()[0], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_domain_and_positions() {
        let s = vec![
            Stop::from(srgb(0.0, 0.0, 0.0)),
            Stop::from(srgb(1.0, 1.0, 1.0)).at(0.8),
            Stop::from(srgb(1.0, 0.0, 0.0)),
        ];
        let mut i = Color::interpolate(&s, &InterpolateOptions::new().space("srgb")).unwrap();
        assert_eq!(i.stops(), &[0.0, 0.8, 1.0]);
        assert_abs_diff_eq!(i.at(0.4).unwrap().coords()[1], 0.5, epsilon = 1e-12);
        i.set_domain(&[0.0, 100.0]);
        assert_abs_diff_eq!(i.at(40.0).unwrap().coords()[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_easing() {
        let s = vec![Stop::from(srgb(0.0, 0.0, 0.0)).eased(Easing::custom(|t| t * t)), Stop::from(srgb(1.0, 1.0, 1.0))];
        let i = Color::interpolate(&s, &InterpolateOptions::new().space("srgb")).unwrap();
        assert_abs_diff_eq!(i.at(0.5).unwrap().coords()[0], 0.25, epsilon = 1e-12);

        let opts = InterpolateOptions::new()
            .space("srgb")
            .progress(Easing::custom(|t| t * t))
            .channel_progress("green", Easing::Linear);
        let mid = srgb(0.0, 0.0, 0.0).mix(&srgb(1.0, 1.0, 1.0), 0.5, &opts).unwrap();
        assert_abs_diff_eq!(mid.coords()[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.coords()[1], 0.5, epsilon = 1e-12);

        let bad = InterpolateOptions::new().space("srgb").channel_progress("nope", Easing::Linear);
        assert!(srgb(0.0, 0.0, 0.0).mix(&srgb(1.0, 1.0, 1.0), 0.5, &bad).is_err());
    }

    #[test]
    fn test_every_method_hits_end_stops() {
        let colors = stops(&[srgb(0.1, 0.2, 0.3), srgb(0.9, 0.1, 0.4), srgb(0.3, 0.8, 0.2), srgb(0.6, 0.6, 0.9)]);
        for method in builtin() {
            let opts = InterpolateOptions::new().space("srgb").method(method.name());
            let i = Color::interpolate(&colors, &opts).unwrap();
            let start = i.at(0.0).unwrap();
            let end = i.at(1.0).unwrap();
            assert_abs_diff_eq!(start.coords()[0], 0.1, epsilon = 1e-9);
            assert_abs_diff_eq!(end.coords()[2], 0.9, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_errors() {
        let one = stops(&[srgb(0.0, 0.0, 0.0)]);
        assert_eq!(Color::interpolate(&one, &InterpolateOptions::new()).unwrap_err().kind(), ErrorKind::Configuration);
        let two = stops(&[srgb(0.0, 0.0, 0.0), srgb(1.0, 1.0, 1.0)]);
        assert!(Color::interpolate(&two, &InterpolateOptions::new().method("cosine")).is_err());
    }

    #[test]
    fn test_discrete() {
        let s = stops(&[srgb(1.0, 0.0, 0.0), srgb(0.0, 1.0, 0.0), srgb(0.0, 0.0, 1.0)]);
        let d = Color::discrete(&s, &InterpolateOptions::new().space("srgb"), None).unwrap();
        assert_eq!(d.colors().len(), 3);
        assert_abs_diff_eq!(d.at(0.1).unwrap().coords()[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.at(0.5).unwrap().coords()[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.at(0.99).unwrap().coords()[2], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.at(7.0).unwrap().coords()[2], 1.0, epsilon = 1e-12);
    }
}
