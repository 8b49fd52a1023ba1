//! Plain key-value form of a color.

use serde::{Deserialize, Serialize};

/// A color as `space`, `coords` and `alpha`, for UI state and storage.
///
/// `None` marks an undefined value; missing trailing coordinates are
/// undefined too.
///
/// ```rust
/// use tincture_color::{Color, ColorData};
///
/// let data: ColorData = serde_json::from_str(r#"{"space": "srgb", "coords": [1, 0.5, null]}"#).unwrap();
/// let c = Color::from_data(&data).unwrap();
/// assert!(c.coords()[2].is_nan());
/// assert_eq!(c.alpha(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorData {
    /// Registered space name.
    pub space: String,
    /// Channel values.
    #[serde(default)]
    pub coords: Vec<Option<f64>>,
    /// Alpha; opaque when the key is absent.
    #[serde(default = "opaque")]
    pub alpha: Option<f64>,
}

fn opaque() -> Option<f64> {
    Some(1.0)
}

impl ColorData {
    /// A fully defined opaque color description.
    pub fn new(space: impl Into<String>, coords: &[f64]) -> Self {
        Self { space: space.into(), coords: coords.iter().copied().map(Some).collect(), alpha: Some(1.0) }
    }
}
