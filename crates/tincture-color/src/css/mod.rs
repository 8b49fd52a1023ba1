//! CSS color syntax.
//!
//! The boundary format between text and [`Color`]. Matching walks the
//! registered spaces in order: a `color(<ident> ...)` string is offered to
//! every space that accepts the generic form, anything else to each space's
//! own [`Syntax`]. Serialization is the inverse, chosen per space.
//!
//! | Form | Spaces |
//! |------|--------|
//! | `#rgb`, `#rrggbbaa`, named colors, `rgb()`/`rgba()` | `srgb` |
//! | `hsl()`/`hsla()`, `hwb()` | `hsl`, `hwb` |
//! | `lab()`, `lch()`, `oklab()`, `oklch()` | `lab`, `lch`, `oklab`, `oklch` |
//! | `color(<ident> <values>+ [/ alpha])` | every space with `color_format()` |
//!
//! # Example
//!
//! ```rust
//! use tincture_color::Color;
//! use tincture_color::css::ToStringOptions;
//!
//! let c = Color::parse("rgb(255 0 0 / 50%)").unwrap();
//! let s = c.to_css(&ToStringOptions::new().comma(true).alpha(true)).unwrap();
//! assert_eq!(s, "rgba(255, 0, 0, 0.5)");
//! ```

pub mod names;
pub mod parse;
pub mod serialize;

use std::fmt;

use tincture_core::Result;

use crate::color::Color;
use crate::space::Space;

pub use names::{from_name, has_name, to_name};

/// A color found in text.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched {
    /// Channel values in the matching space (alpha excluded).
    pub coords: Vec<f64>,
    /// Alpha, already clamped to `[0, 1]`.
    pub alpha: f64,
    /// Byte offset just past the match.
    pub end: usize,
}

/// Space-specific text syntax.
///
/// A space that has one answers [`Space::syntax`]; the generic
/// `color()` form needs no syntax object.
pub trait Syntax: Send + Sync + fmt::Debug {
    /// Matches a color of `space` starting at byte `start`.
    ///
    /// With `fullmatch` the color must extend to the end of `text`.
    fn match_color(&self, space: &dyn Space, text: &str, start: usize, fullmatch: bool) -> Option<Matched>;

    /// Serializes `color`, which is in the space owning this syntax.
    fn to_css(&self, color: &Color, options: &ToStringOptions) -> Result<String>;
}

/// Which channels are written as percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Percent {
    /// Numbers only (native percent channels excepted).
    #[default]
    Off,
    /// Every non-angle color channel.
    All,
    /// Per channel; missing trailing entries are `false`.
    Channels(Vec<bool>),
}

impl Percent {
    /// Whether channel `index` of `count` color channels is a percentage.
    pub fn get(&self, index: usize, count: usize) -> bool {
        match self {
            Self::Off => false,
            Self::All => index < count,
            Self::Channels(v) => v.get(index).copied().unwrap_or(false),
        }
    }
}

/// Options for [`Color::to_css`].
#[derive(Debug, Clone, PartialEq)]
pub struct ToStringOptions {
    /// Significant digits; `None` uses the registry default, `-1` keeps
    /// full precision and `0` rounds to integers.
    pub precision: Option<i32>,
    /// `Some(true)` forces alpha, `Some(false)` suppresses it, `None`
    /// writes it only when it is below one or undefined.
    pub alpha: Option<bool>,
    /// Gamut-fit before writing.
    pub fit: bool,
    /// Fit method; `None` uses the registry default.
    pub fit_method: Option<String>,
    /// Write undefined channels as `none` instead of zero.
    pub none: bool,
    /// Percentage output.
    pub percent: Percent,
    /// Use the generic `color()` form.
    pub color: bool,
    /// Hex output (sRGB).
    pub hex: bool,
    /// Upper-case hex digits.
    pub upper: bool,
    /// Compress `#aabbcc` to `#abc` when possible.
    pub compress: bool,
    /// Prefer a CSS color keyword when one matches exactly.
    pub names: bool,
    /// Legacy comma-separated syntax (`rgba(r, g, b, a)`).
    pub comma: bool,
}

impl Default for ToStringOptions {
    fn default() -> Self {
        Self {
            precision: None,
            alpha: None,
            fit: true,
            fit_method: None,
            none: false,
            percent: Percent::Off,
            color: false,
            hex: false,
            upper: false,
            compress: false,
            names: false,
            comma: false,
        }
    }
}

impl ToStringOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the precision.
    pub fn precision(mut self, precision: i32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Forces (`true`) or suppresses (`false`) alpha.
    pub fn alpha(mut self, alpha: bool) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Enables or disables gamut fitting.
    pub fn fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    /// Fits with a specific method.
    pub fn fit_method(mut self, method: impl Into<String>) -> Self {
        self.fit = true;
        self.fit_method = Some(method.into());
        self
    }

    /// Writes undefined channels as `none`.
    pub fn none(mut self, none: bool) -> Self {
        self.none = none;
        self
    }

    /// Writes every color channel as a percentage.
    pub fn percent(mut self, percent: bool) -> Self {
        self.percent = if percent { Percent::All } else { Percent::Off };
        self
    }

    /// Uses the generic `color()` form.
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Uses hex output.
    pub fn hex(mut self, hex: bool) -> Self {
        self.hex = hex;
        self
    }

    /// Upper-case hex.
    pub fn upper(mut self, upper: bool) -> Self {
        self.upper = upper;
        self
    }

    /// Compresses hex where possible.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Prefers color keywords.
    pub fn names(mut self, names: bool) -> Self {
        self.names = names;
        self
    }

    /// Legacy comma syntax.
    pub fn comma(mut self, comma: bool) -> Self {
        self.comma = comma;
        self
    }
}

// ============================================================================
// Built-in CSS functions
// ============================================================================

/// The CSS Color 4 functional syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CssFunction {
    /// Hex, keywords, `rgb()` and `rgba()`.
    Rgb,
    /// `hsl()` and `hsla()`.
    Hsl,
    /// `hwb()`.
    Hwb,
    /// `lab()`.
    Lab,
    /// `lch()`.
    Lch,
    /// `oklab()`.
    Oklab,
    /// `oklch()`.
    Oklch,
}

impl CssFunction {
    /// Function name written on output.
    pub fn function(self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::Hsl => "hsl",
            Self::Hwb => "hwb",
            Self::Lab => "lab",
            Self::Lch => "lch",
            Self::Oklab => "oklab",
            Self::Oklch => "oklch",
        }
    }
}

impl Syntax for CssFunction {
    fn match_color(&self, space: &dyn Space, text: &str, start: usize, fullmatch: bool) -> Option<Matched> {
        parse::parse_css(space, text, start, fullmatch, false)
    }

    fn to_css(&self, color: &Color, options: &ToStringOptions) -> Result<String> {
        if options.color {
            return serialize::color_function(color, None, options, false, 1.0);
        }
        match self {
            Self::Rgb => {
                if options.names {
                    if let Some(name) = serialize::named_color(color, options)? {
                        return Ok(name);
                    }
                }
                if options.hex {
                    return serialize::hexadecimal(color, options);
                }
                serialize::color_function(color, Some("rgb"), options, options.comma, 255.0)
            }
            Self::Hsl => {
                // Saturation and lightness are percentages in both forms.
                let opts = ToStringOptions { percent: Percent::All, ..options.clone() };
                serialize::color_function(color, Some("hsl"), &opts, options.comma, 1.0)
            }
            Self::Hwb => serialize::color_function(color, Some("hwb"), options, false, 100.0),
            Self::Lab | Self::Lch | Self::Oklab | Self::Oklch => {
                serialize::color_function(color, Some(self.function()), options, false, 1.0)
            }
        }
    }
}
