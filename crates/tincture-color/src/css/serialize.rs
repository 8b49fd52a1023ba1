//! CSS serialization.

use tincture_core::Result;
use tincture_math::{round_half_up, round_to};

use super::{ToStringOptions, names};
use crate::color::Color;

/// Formats a float with `precision` significant digits, trimming zeros.
///
/// NaN prints as `none`. A non-zero `percent` span writes the value as a
/// percentage of that span after adding `offset`. Precision `-1` keeps
/// full precision, `0` rounds to an integer.
pub fn fmt_float(f: f64, precision: i32, percent: f64, offset: f64) -> String {
    if f.is_nan() {
        return "none".to_string();
    }

    let raw = if percent != 0.0 { (f + offset) / (percent * 0.01) } else { f };
    let value = round_to(raw, if precision == -1 { None } else { Some(precision) });
    let mut p = if precision == -1 { 17 } else { precision };

    let whole = value.trunc();
    if whole != 0.0 {
        let digits = whole.abs().log10() as i32 + 1;
        if p != 0 {
            p = (p - digits).max(0);
        }
    }

    let mut s = if p > 0 { format!("{value:.*}", p as usize) } else { format!("{value:.6}") };
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".into();
    }
    if percent != 0.0 {
        s.push('%');
    }
    s
}

/// The color after the requested fit, still in its own space.
fn fitted(color: &Color, options: &ToStringOptions) -> Result<Color> {
    let mut out = color.clone();
    if options.fit {
        out.fit(None, options.fit_method.as_deref())?;
    }
    Ok(out)
}

/// Alpha to write, or `None` when it is omitted.
fn alpha_value(color: &Color, options: &ToStringOptions, none: bool) -> Option<f64> {
    let a = if none { color.alpha() } else { color.alpha_resolved() };
    let show = options.alpha != Some(false) && (options.alpha == Some(true) || a < 1.0 || a.is_nan());
    show.then_some(a)
}

/// A CSS keyword for the color, if one matches exactly.
pub fn named_color(color: &Color, options: &ToStringOptions) -> Result<Option<String>> {
    let a = alpha_value(color, options, false).unwrap_or(1.0);
    let c = fitted(color, options)?.coords_resolved();
    Ok(names::to_name([c[0], c[1], c[2], a]).map(str::to_string))
}

/// `#rrggbb[aa]` with optional upper case and compression.
pub fn hexadecimal(color: &Color, options: &ToStringOptions) -> Result<String> {
    let c = fitted(color, options)?.coords_resolved();
    let a = alpha_value(color, options, false);

    let byte = |v: f64| round_half_up(v * 255.0, 0).clamp(0.0, 255.0) as u8;
    let mut bytes = vec![byte(c[0]), byte(c[1]), byte(c[2])];
    if let Some(a) = a {
        bytes.push(byte(a));
    }

    let compressible = options.compress && bytes.iter().all(|b| b >> 4 == b & 0x0f);
    let mut out = String::from("#");
    for b in bytes {
        if compressible {
            out.push_str(&format!("{:x}", b & 0x0f));
        } else {
            out.push_str(&format!("{b:02x}"));
        }
    }
    if options.upper {
        out = out.to_uppercase();
    }
    Ok(out)
}

/// `func(...)` or, with `func == None`, `color(<id> ...)`.
///
/// Non-angle color channels are multiplied by `scale` unless written as
/// percentages. `legacy` selects the comma form and `<func>a(` when alpha
/// is present.
pub fn color_function(
    color: &Color,
    func: Option<&str>,
    options: &ToStringOptions,
    legacy: bool,
    scale: f64,
) -> Result<String> {
    let precision = options.precision.unwrap_or(color.registry().defaults().precision);
    let keep_none = options.none && !legacy;

    let fit = fitted(color, options)?;
    let mut values = if keep_none { fit.coords().to_vec() } else { fit.coords_resolved() };
    let alpha = alpha_value(color, options, keep_none);
    let has_alpha = alpha.is_some();
    values.extend(alpha);

    let space = color.space_def();
    let channels = space.channels();
    let count = channels.len();

    let mut out = match func {
        None => format!("color({} ", space.ids()[0]),
        Some(f) => format!("{f}{}(", if legacy && has_alpha { "a" } else { "" }),
    };

    for (i, value) in values.into_iter().enumerate() {
        let is_alpha = i == count;
        if is_alpha {
            out.push_str(if legacy { ", " } else { " / " });
        } else if i != 0 {
            out.push_str(if legacy { ", " } else { " " });
        }

        let channel = space.channel(i);
        let (span, offset, v) = if !channel.is_angle() && !is_alpha && options.percent.get(i, count) {
            (channel.span(), channel.offset(), value)
        } else if !channel.is_angle() && !is_alpha {
            (0.0, 0.0, value * scale)
        } else {
            (0.0, 0.0, value)
        };
        out.push_str(&fmt_float(v, precision, span, offset));
    }
    out.push(')');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_float_precision() {
        assert_eq!(fmt_float(0.123456789, 5, 0.0, 0.0), "0.12346");
        assert_eq!(fmt_float(123.456789, 5, 0.0, 0.0), "123.46");
        assert_eq!(fmt_float(255.0, 5, 0.0, 0.0), "255");
        assert_eq!(fmt_float(0.5, 0, 0.0, 0.0), "1");
        assert_eq!(fmt_float(-0.0000001, 5, 0.0, 0.0), "0");
        assert_eq!(fmt_float(f64::NAN, 5, 0.0, 0.0), "none");
    }

    #[test]
    fn test_fmt_float_percent() {
        assert_eq!(fmt_float(0.5, 5, 1.0, 0.0), "50%");
        assert_eq!(fmt_float(62.5, 5, 125.0, 0.0), "50%");
    }

    #[test]
    fn test_fmt_float_large_whole() {
        assert_eq!(fmt_float(123456.7, 5, 0.0, 0.0), "123460");
    }

    #[test]
    fn test_fmt_float_full_precision() {
        assert_eq!(fmt_float(0.5, -1, 0.0, 0.0), "0.5");
        assert_eq!(fmt_float(0.1, -1, 0.0, 0.0), "0.10000000000000001");
    }
}
