//! CSS color tokenizer and channel normalization.
//!
//! A string is tokenized once into one of three shapes (hex, keyword or
//! function call), the function syntax is validated per function family,
//! and only then are channel strings scaled into the target space.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tincture_core::Channel;

use super::Matched;
use super::names;
use crate::space::Space;

/// Most values a function body may hold.
const MAX_CHANNELS: usize = 16;

static RE_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(#)((?:[a-f0-9]{6}(?:[a-f0-9]{2})?|[a-f0-9]{3}(?:[a-f0-9])?))\b").expect("valid regex")
});
static RE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b([a-z]{3,})\b").expect("valid regex"));
static RE_IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(-{0,2}[a-z][-a-z0-9_]*)").expect("valid regex"));
static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static RE_LOOSE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*").expect("valid regex"));
static RE_CHANNEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)((?:[+\-]?(?:[0-9]*\.)?[0-9]+(?:e[-+]?[0-9]+)?))(?:(%)|(deg|rad|turn|grad))?|(none)")
        .expect("valid regex")
});
static RE_FUNC_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*").expect("valid regex"));
static RE_FUNC_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\)").expect("valid regex"));
static RE_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").expect("valid regex"));
static RE_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*/\s*").expect("valid regex"));
static RE_CSS_FUNC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:color|rgba?|hsla?|hwb|(?:ok)?lab|(?:ok)?lch)$").expect("valid regex"));

/// Captures of `re` anchored at byte `pos`.
fn match_at<'t>(re: &Regex, text: &'t str, pos: usize) -> Option<Captures<'t>> {
    if pos > text.len() {
        return None;
    }
    re.captures_at(text, pos)
        .filter(|c| c.get(0).is_some_and(|m| m.start() == pos))
}

/// End of the match of `re` anchored at `pos`.
fn end_at(re: &Regex, text: &str, pos: usize) -> Option<usize> {
    match_at(re, text, pos).and_then(|c| c.get(0)).map(|m| m.end())
}

// ============================================================================
// Tokens
// ============================================================================

/// Syntactic kind of one function argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Bare number.
    Number,
    /// Number with `%`.
    Percent,
    /// Number with an angle unit.
    Degree,
    /// The `none` keyword.
    None,
}

/// One function argument as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Value<'a> {
    /// Syntactic kind.
    pub kind: ValueKind,
    /// Raw text including any unit.
    pub text: &'a str,
}

/// How function arguments are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Not yet known (fewer than two values).
    Unknown,
    /// Legacy commas.
    Comma,
    /// Whitespace with an optional slash before alpha.
    Space,
}

/// A tokenized function call.
#[derive(Debug, Clone, PartialEq)]
pub struct Function<'a> {
    /// Lower-cased function name.
    pub name: String,
    /// Arguments in order.
    pub values: Vec<Value<'a>>,
    /// Argument separator.
    pub delimiter: Delimiter,
    /// Whether the last value followed a slash.
    pub slash: bool,
}

/// Body of a tokenized color.
#[derive(Debug, Clone, PartialEq)]
pub enum Body<'a> {
    /// `#...`, the full hex text.
    Hex(&'a str),
    /// A color keyword.
    Name(&'a str),
    /// A function call.
    Function(Function<'a>),
}

/// A tokenized color with the serialization id it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Tokens<'a> {
    /// Space identifier (`srgb`, `--hsl`, or the `color()` ident).
    pub id: String,
    /// Byte offset just past the color.
    pub end: usize,
    /// Parsed body.
    pub body: Body<'a>,
}

/// Tokenizes the color starting at `start`, validating function syntax.
pub fn tokenize(css: &str, start: usize) -> Option<Tokens<'_>> {
    if let Some(c) = match_at(&RE_HEX, css, start) {
        let m = c.get(0)?;
        return Some(Tokens { id: "srgb".into(), end: m.end(), body: Body::Hex(m.as_str()) });
    }

    let c = match_at(&RE_NAME, css, start)?;
    let word = c.get(1)?;
    if names::has_name(word.as_str()) {
        return Some(Tokens { id: "srgb".into(), end: word.end(), body: Body::Name(word.as_str()) });
    }

    let name = word.as_str().to_ascii_lowercase();
    if !RE_CSS_FUNC.is_match(&name) {
        return None;
    }
    let mut pos = end_at(&RE_FUNC_START, css, word.end())?;

    let mut id = String::new();
    let mut delimiter = Delimiter::Unknown;
    if name == "color" {
        let ident = match_at(&RE_IDENT, css, pos)?.get(1)?;
        id = ident.as_str().to_string();
        delimiter = Delimiter::Space;
        pos = end_at(&RE_SPACE, css, ident.end())?;
    }

    let mut values = Vec::new();
    let mut slash = false;
    for _ in 0..MAX_CHANNELS {
        let Some(v) = match_at(&RE_CHANNEL, css, pos) else {
            if slash {
                return None;
            }
            break;
        };
        let whole = v.get(0)?;
        let kind = if v.get(2).is_some() {
            ValueKind::Percent
        } else if v.get(3).is_some() {
            ValueKind::Degree
        } else if v.get(4).is_some() {
            ValueKind::None
        } else {
            ValueKind::Number
        };
        values.push(Value { kind, text: whole.as_str() });
        pos = whole.end();

        if slash {
            break;
        }

        match delimiter {
            Delimiter::Unknown => {
                if let Some(end) = end_at(&RE_COMMA, css, pos) {
                    delimiter = Delimiter::Comma;
                    pos = end;
                } else {
                    delimiter = Delimiter::Space;
                    pos = end_at(&RE_LOOSE_SPACE, css, pos).unwrap_or(pos);
                }
            }
            Delimiter::Comma => match end_at(&RE_COMMA, css, pos) {
                Some(end) => pos = end,
                None => break,
            },
            Delimiter::Space => {
                if let Some(end) = end_at(&RE_SLASH, css, pos) {
                    slash = true;
                    pos = end;
                } else {
                    pos = end_at(&RE_LOOSE_SPACE, css, pos).unwrap_or(pos);
                }
            }
        }
    }

    let end = end_at(&RE_FUNC_END, css, pos)?;
    let func = Function { name, values, delimiter, slash };

    let valid = match func.name.as_str() {
        "color" => true,
        "rgb" | "rgba" => {
            id = "srgb".into();
            validate_srgb(&func)
        }
        "hsl" | "hsla" | "hwb" => {
            id = if func.name == "hwb" { "--hwb" } else { "--hsl" }.into();
            validate_cylindrical_srgb(&func)
        }
        "lab" | "oklab" => {
            id = format!("--{}", func.name);
            validate_lab(&func)
        }
        _ => {
            id = format!("--{}", func.name);
            validate_lch(&func)
        }
    };

    valid.then_some(Tokens { id, end, body: Body::Function(func) })
}

// ============================================================================
// Validation
// ============================================================================

fn kind(func: &Function<'_>, i: usize) -> ValueKind {
    func.values[i].kind
}

fn validate_srgb(func: &Function<'_>) -> bool {
    let n = func.values.len();
    if !(3..=4).contains(&n) {
        return false;
    }
    let first = kind(func, 0);
    if func.delimiter == Delimiter::Comma {
        if matches!(first, ValueKind::None | ValueKind::Degree) || func.values[..3].iter().any(|v| v.kind != first) {
            return false;
        }
        if n == 4 && matches!(kind(func, 3), ValueKind::None | ValueKind::Degree) {
            return false;
        }
    } else {
        if func.values.iter().any(|v| v.kind == ValueKind::Degree) {
            return false;
        }
        if n == 4 && !func.slash {
            return false;
        }
    }
    true
}

fn validate_cylindrical_srgb(func: &Function<'_>) -> bool {
    let n = func.values.len();
    if !(3..=4).contains(&n) {
        return false;
    }
    if func.delimiter == Delimiter::Comma {
        if func.name == "hwb" {
            return false;
        }
        if !matches!(kind(func, 0), ValueKind::Degree | ValueKind::Number) {
            return false;
        }
        if func.values[1..3].iter().any(|v| v.kind != ValueKind::Percent) {
            return false;
        }
        if n == 4 && matches!(kind(func, 3), ValueKind::None | ValueKind::Degree) {
            return false;
        }
    } else {
        if kind(func, 0) == ValueKind::Percent {
            return false;
        }
        if func.values[1..].iter().any(|v| v.kind == ValueKind::Degree) {
            return false;
        }
        if n == 4 && !func.slash {
            return false;
        }
    }
    true
}

fn validate_lab(func: &Function<'_>) -> bool {
    let n = func.values.len();
    func.delimiter != Delimiter::Comma
        && (3..=4).contains(&n)
        && !func.values.iter().any(|v| v.kind == ValueKind::Degree)
        && (n != 4 || func.slash)
}

fn validate_lch(func: &Function<'_>) -> bool {
    let n = func.values.len();
    if func.delimiter == Delimiter::Comma || !(3..=4).contains(&n) {
        return false;
    }
    if kind(func, 2) == ValueKind::Percent {
        return false;
    }
    if func.values[..2].iter().any(|v| v.kind == ValueKind::Degree) {
        return false;
    }
    !(n == 4 && (!func.slash || kind(func, 3) == ValueKind::Degree))
}

// ============================================================================
// Channel normalization
// ============================================================================

fn norm_float(s: &str) -> f64 {
    if s.eq_ignore_ascii_case("none") {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn norm_hex_channel(s: &str) -> f64 {
    u8::from_str_radix(s, 16).map_or(0.0, |v| f64::from(v) / 255.0)
}

fn norm_percent(s: &str, scale: f64, offset: f64) -> f64 {
    let value = norm_float(s.trim_end_matches('%'));
    if scale != 100.0 { value * scale * 0.01 - offset } else { value }
}

/// Percent scaled onto the channel, numbers taken as-is.
fn norm_color_channel(s: &str, scale: f64, offset: f64) -> f64 {
    if s.ends_with('%') { norm_percent(s, scale, offset) } else { norm_float(s) }
}

/// Numbers and percents both read on a 0-100 scale.
fn norm_scaled_channel(s: &str, scale: f64) -> f64 {
    if s.ends_with('%') {
        norm_percent(s, scale, 0.0)
    } else {
        let value = norm_float(s);
        if scale != 100.0 { value * scale * 0.01 } else { value }
    }
}

fn norm_rgb_channel(s: &str, scale: f64) -> f64 {
    if s.ends_with('%') { norm_percent(s, scale, 0.0) } else { norm_float(s) / 255.0 }
}

/// Alpha as a number or percentage, clamped to `[0, 1]`.
pub fn norm_alpha(s: &str) -> f64 {
    let value = if s.ends_with('%') { norm_percent(s, 1.0, 0.0) } else { norm_float(s) };
    if value.is_nan() { value } else { value.clamp(0.0, 1.0) }
}

/// Angle in degrees from `deg`, `grad`, `rad`, `turn` or a bare number.
pub fn norm_angle(s: &str) -> f64 {
    let lower = s.to_ascii_lowercase();
    if let Some(v) = lower.strip_suffix("turn") {
        norm_float(v) * 360.0
    } else if let Some(v) = lower.strip_suffix("grad") {
        norm_float(v) * 0.9
    } else if let Some(v) = lower.strip_suffix("rad") {
        norm_float(v).to_degrees()
    } else if let Some(v) = lower.strip_suffix("deg") {
        norm_float(v)
    } else {
        norm_float(&lower)
    }
}

fn parse_hex(hex: &str) -> (Vec<f64>, f64) {
    let digits = &hex[1..];
    if digits.len() >= 6 {
        let coords = (0..3).map(|i| norm_hex_channel(&digits[i * 2..i * 2 + 2])).collect();
        let alpha = if digits.len() == 8 { norm_hex_channel(&digits[6..8]) } else { 1.0 };
        (coords, alpha)
    } else {
        let doubled = |i: usize| norm_hex_channel(&digits[i..=i].repeat(2));
        let coords = (0..3).map(doubled).collect();
        let alpha = if digits.len() == 4 { doubled(3) } else { 1.0 };
        (coords, alpha)
    }
}

fn parse_rgb_channels(values: &[Value<'_>], channels: &[Channel]) -> (Vec<f64>, f64) {
    let mut coords = Vec::with_capacity(3);
    let mut alpha = 1.0;
    for (i, v) in values.iter().enumerate() {
        let text = v.text.to_ascii_lowercase();
        if i < 3 {
            coords.push(norm_rgb_channel(&text, channels[i].high));
        } else if i == 3 {
            alpha = norm_alpha(&text);
        }
    }
    (coords, alpha)
}

fn parse_channels(values: &[Value<'_>], channels: &[Channel], scaled: bool) -> (Vec<f64>, f64) {
    let mut coords = Vec::with_capacity(channels.len());
    let mut alpha = 1.0;
    for (i, v) in values.iter().enumerate() {
        let text = v.text.to_ascii_lowercase();
        match channels.get(i) {
            Some(ch) if ch.is_angle() => coords.push(norm_angle(&text)),
            Some(ch) if scaled => coords.push(norm_scaled_channel(&text, ch.high)),
            Some(ch) => coords.push(norm_color_channel(&text, ch.high, 0.0)),
            None if i == channels.len() => alpha = norm_alpha(&text),
            None => {}
        }
    }
    (coords, alpha)
}

/// Reads a generic `color()` body, which must hold exactly one value per channel.
fn parse_color_function(func: &Function<'_>, channels: &[Channel]) -> Option<(Vec<f64>, f64)> {
    let count = func.values.len() - usize::from(func.slash);
    if count != channels.len() {
        return None;
    }
    let alpha = if func.slash { norm_alpha(&func.values[count].text.to_ascii_lowercase()) } else { 1.0 };
    let coords = channels
        .iter()
        .zip(&func.values)
        .map(|(ch, v)| {
            if ch.is_angle() {
                norm_angle(v.text)
            } else {
                norm_color_channel(&v.text.to_ascii_lowercase(), ch.span(), ch.offset())
            }
        })
        .collect();
    Some((coords, alpha))
}

/// Matches a CSS color for `space`.
///
/// `color_form` admits the generic `color()` syntax; the space-specific
/// syntaxes never accept it.
pub fn parse_css(space: &dyn Space, css: &str, start: usize, fullmatch: bool, color_form: bool) -> Option<Matched> {
    let tokens = tokenize(css, start)?;
    if !space.ids().contains(&tokens.id.as_str()) {
        return None;
    }
    if fullmatch && tokens.end < css.len() {
        return None;
    }

    let channels = space.channels();
    let (coords, alpha) = match &tokens.body {
        Body::Function(f) if f.name == "color" => {
            if !color_form {
                return None;
            }
            parse_color_function(f, channels)?
        }
        Body::Hex(h) => parse_hex(h),
        Body::Name(n) => {
            let rgba = names::from_name(n)?;
            (rgba[..3].to_vec(), rgba[3])
        }
        Body::Function(f) if tokens.id == "srgb" => parse_rgb_channels(&f.values, channels),
        Body::Function(f) if tokens.id == "--hsl" || tokens.id == "--hwb" => {
            parse_channels(&f.values, channels, true)
        }
        Body::Function(f) => parse_channels(&f.values, channels, false),
    };
    Some(Matched { coords, alpha, end: tokens.end })
}
