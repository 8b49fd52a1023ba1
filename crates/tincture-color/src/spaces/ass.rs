//! Advanced SubStation Alpha colors.
//!
//! Subtitle files write colors as `&HAABBGGRR`: hex digits in reverse
//! channel order with an *inverted* alpha (`00` is opaque). Leading zeros
//! may be dropped, so `&HFF` is pure red. The space itself is plain sRGB;
//! only the text form differs.
//!
//! ```rust
//! use tincture_color::Color;
//!
//! let c = Color::parse("&H800000FF").unwrap();
//! assert_eq!(c.space(), "ass-abgr");
//! assert_eq!(c.coords(), &[1.0, 0.0, 0.0]);
//! assert!((c.alpha() - 0.498).abs() < 1e-3);
//! assert_eq!(c.to_string(), "&H800000ff");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tincture_core::{Channel, Result, RgbIsh};
use tincture_math::{no_nan, round_half_up};
use tincture_primaries::D65;

use super::rgb::UNIT_RGB;
use crate::color::Color;
use crate::css::{Matched, Syntax, ToStringOptions};
use crate::space::{Space, Xy};

static RE_ASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(&H)?([0-9a-fA-F]{1,8})(?:&|\b)").expect("valid regex"));

/// The `&HAABBGGRR` syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssSyntax {
    /// Accept bare hex digits without `&H`.
    pub prefix_optional: bool,
}

fn byte(hex: &str) -> f64 {
    u8::from_str_radix(hex, 16).map_or(f64::NAN, |b| f64::from(b) / 255.0)
}

impl Syntax for AssSyntax {
    fn match_color(&self, _space: &dyn Space, text: &str, start: usize, fullmatch: bool) -> Option<Matched> {
        let caps = RE_ASS.captures_at(text, start)?;
        let whole = caps.get(0)?;
        if whole.start() != start || (!self.prefix_optional && caps.get(1).is_none()) {
            return None;
        }
        if fullmatch && whole.end() != text.len() {
            return None;
        }

        let digits = format!("{:0>8}", caps.get(2)?.as_str());
        Some(Matched {
            coords: vec![byte(&digits[6..8]), byte(&digits[4..6]), byte(&digits[2..4])],
            alpha: 1.0 - byte(&digits[0..2]),
            end: whole.end(),
        })
    }

    fn to_css(&self, color: &Color, options: &ToStringOptions) -> Result<String> {
        let a = no_nan(color.alpha());
        let show_alpha = options.alpha != Some(false) && (options.alpha == Some(true) || a < 1.0);

        // Always fitted; the format has no out-of-range values.
        let mut fitted = color.clone();
        fitted.fit(None, options.fit_method.as_deref())?;
        let c = fitted.coords_resolved();
        let to_byte = |v: f64| round_half_up(v * 255.0, 0).clamp(0.0, 255.0) as u8;

        let mut out = String::from("&H");
        if show_alpha {
            out.push_str(&format!("{:02x}", to_byte(1.0 - a)));
        }
        out.push_str(&format!("{:02x}{:02x}{:02x}", to_byte(c[2]), to_byte(c[1]), to_byte(c[0])));
        if options.upper {
            out = out.to_uppercase();
        }
        Ok(out)
    }
}

/// sRGB written as subtitle colors.
#[derive(Debug, Clone, Copy)]
pub struct AssAbgr {
    name: &'static str,
    syntax: AssSyntax,
}

/// The registered `ass-abgr` space; the `&H` prefix is required so plain
/// numbers are never read as colors.
pub const ASS_ABGR: AssAbgr = AssAbgr::new("ass-abgr", false);

impl AssAbgr {
    /// A subtitle-color space called `name`.
    pub const fn new(name: &'static str, prefix_optional: bool) -> Self {
        Self { name, syntax: AssSyntax { prefix_optional } }
    }
}

impl RgbIsh for AssAbgr {
    fn linear(&self) -> Option<&str> {
        Some("srgb-linear")
    }
}

impl Space for AssAbgr {
    fn name(&self) -> &'static str {
        self.name
    }

    fn base(&self) -> &'static str {
        "srgb"
    }

    fn serialize(&self) -> &[&'static str] {
        &["--ass-abgr"]
    }

    fn channels(&self) -> &[Channel] {
        &UNIT_RGB
    }

    fn white(&self) -> Xy {
        D65
    }

    fn gamut_check(&self) -> Option<&'static str> {
        Some("srgb")
    }

    fn color_format(&self) -> bool {
        false
    }

    fn to_base(&self, coords: &[f64]) -> Vec<f64> {
        coords.to_vec()
    }

    fn from_base(&self, coords: &[f64]) -> Vec<f64> {
        coords.to_vec()
    }

    fn rgb(&self) -> Option<&dyn RgbIsh> {
        Some(self)
    }

    fn syntax(&self) -> Option<&dyn Syntax> {
        Some(&self.syntax)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::css::ToStringOptions;
    use crate::registry::{Plugin, Registry};

    #[test]
    fn test_match_full() {
        let m = ASS_ABGR.syntax.match_color(&ASS_ABGR, "&H00FF8000", 0, true).unwrap();
        assert_eq!(m.coords, vec![0.0, 128.0 / 255.0, 1.0]);
        assert_eq!(m.alpha, 1.0);
        assert_eq!(m.end, 10);
    }

    #[test]
    fn test_short_forms_zero_filled() {
        let m = ASS_ABGR.syntax.match_color(&ASS_ABGR, "&HFF", 0, true).unwrap();
        assert_eq!(m.coords, vec![1.0, 0.0, 0.0]);
        assert_eq!(m.alpha, 1.0);
    }

    #[test]
    fn test_trailing_ampersand() {
        let m = ASS_ABGR.syntax.match_color(&ASS_ABGR, "&HFF0000&", 0, true).unwrap();
        assert_eq!(m.coords, vec![0.0, 0.0, 1.0]);
        assert_eq!(m.end, 9);
    }

    #[test]
    fn test_prefix_required() {
        assert!(ASS_ABGR.syntax.match_color(&ASS_ABGR, "FF0000", 0, true).is_none());
        let loose = AssAbgr::new("ass-loose", true);
        assert!(loose.syntax.match_color(&loose, "FF0000", 0, true).is_some());
    }

    #[test]
    fn test_serialize() {
        let c = Color::parse("&H00FF8000").unwrap();
        assert_eq!(c.to_string(), "&Hff8000");
        let opts = ToStringOptions::new().alpha(true).upper(true);
        assert_eq!(c.to_css(&opts).unwrap(), "&H00FF8000");
    }

    #[test]
    fn test_loose_profile() {
        let mut reg = Registry::default();
        reg.deregister("space:ass-abgr", false).unwrap();
        reg.register(Plugin::space(AssAbgr::new("ass-abgr", true)), false, false).unwrap();
        let reg = Arc::new(reg);
        // sRGB still claims CSS forms first.
        assert_eq!(Color::parse_in(&reg, "#ff0000").unwrap().space(), "srgb");
        assert_eq!(Color::parse_in(&reg, "ff").unwrap().space(), "ass-abgr");
    }
}
