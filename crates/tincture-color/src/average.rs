//! Averaging colors.

use tincture_core::{Error, Result};

use crate::color::Color;

/// Options for [`Color::average`].
#[derive(Debug, Clone, PartialEq)]
pub struct AverageOptions {
    /// Averaging space (registry default when `None`).
    pub space: Option<String>,
    /// Output space, the averaging space when `None`.
    pub out_space: Option<String>,
    /// Weight channels by alpha.
    pub premultiplied: bool,
    /// Treat achromatic hues as undefined (registry default when `None`).
    pub powerless: Option<bool>,
}

impl Default for AverageOptions {
    fn default() -> Self {
        Self { space: None, out_space: None, premultiplied: true, powerless: None }
    }
}

impl AverageOptions {
    /// Sets the averaging space.
    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    /// Sets the output space.
    pub fn out_space(mut self, space: impl Into<String>) -> Self {
        self.out_space = Some(space.into());
        self
    }

    /// Enables or disables premultiplication.
    pub fn premultiplied(mut self, on: bool) -> Self {
        self.premultiplied = on;
        self
    }

    /// Enables or disables powerless hue handling.
    pub fn powerless(mut self, on: bool) -> Self {
        self.powerless = Some(on);
        self
    }
}

impl Color {
    /// Mean of `colors`.
    ///
    /// Undefined channels are left out of their channel's mean; a channel
    /// undefined in every color stays undefined. Hues are averaged on the
    /// circle, so 350 and 10 average to 0.
    pub fn average(colors: &[Color], options: &AverageOptions) -> Result<Color> {
        let first = colors.first().ok_or_else(|| Error::config("at least one color is needed to average"))?;
        let registry = first.registry();
        let space = options.space.as_deref().unwrap_or(registry.defaults().average_space.as_str());
        let powerless = options.powerless.unwrap_or(registry.defaults().powerless);
        let premultiplied = options.premultiplied;

        let def = registry.space(space)?.clone();
        let n = def.channels().len();
        let hue = def.cylindrical().map(|c| c.hue_index());
        let mut sums = vec![0.0; n + 1];
        let mut totals = vec![0.0; n + 1];
        let (mut sin, mut cos) = (0.0, 0.0);

        for color in colors {
            let mut c = first.adopt(color)?.convert(space)?;
            if let Some(h) = hue {
                if powerless && !c.raw(h).is_nan() && c.is_achromatic()? {
                    c.set_raw(h, f64::NAN);
                }
            }
            let alpha = if c.alpha().is_nan() { 1.0 } else { c.alpha() };
            for i in 0..=n {
                let v = c.raw(i);
                if v.is_nan() {
                    continue;
                }
                totals[i] += 1.0;
                if Some(i) == hue {
                    let (s, co) = v.to_radians().sin_cos();
                    sin += s;
                    cos += co;
                } else if premultiplied && i != n {
                    sums[i] += v * alpha;
                } else {
                    sums[i] += v;
                }
            }
        }

        let mean_alpha = if totals[n] == 0.0 { f64::NAN } else { sums[n] / totals[n] };
        let weight = if mean_alpha.is_nan() || mean_alpha == 0.0 || mean_alpha == 1.0 { 1.0 } else { mean_alpha };
        let coords: Vec<f64> = (0..n)
            .map(|i| {
                let total = totals[i];
                if total == 0.0 {
                    f64::NAN
                } else if Some(i) == hue {
                    let theta = (sin / total).atan2(cos / total).to_degrees();
                    if theta < 0.0 { theta + 360.0 } else { theta }
                } else if premultiplied {
                    sums[i] / (total * weight)
                } else {
                    sums[i] / total
                }
            })
            .collect();

        let out = first.sibling(space, &coords, mean_alpha)?;
        match options.out_space.as_deref() {
            Some(out_space) => out.convert(out_space),
            None => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_plain_mean() {
        let colors = [Color::parse("red").unwrap(), Color::parse("blue").unwrap()];
        let avg = Color::average(&colors, &AverageOptions::default().space("srgb")).unwrap();
        assert_eq!(avg.space(), "srgb");
        assert_abs_diff_eq!(avg.coords()[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.coords()[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.coords()[2], 0.5, epsilon = 1e-12);
        assert_eq!(avg.alpha(), 1.0);
    }

    #[test]
    fn test_circular_hue() {
        let colors = [
            Color::new("hsl", &[350.0, 0.5, 0.5], 1.0).unwrap(),
            Color::new("hsl", &[10.0, 0.5, 0.5], 1.0).unwrap(),
        ];
        let avg = Color::average(&colors, &AverageOptions::default().space("hsl")).unwrap();
        let h = avg.coords()[0];
        assert!(h < 1e-9 || h > 360.0 - 1e-9, "{h}");
    }

    #[test]
    fn test_undefined_channels_skipped() {
        let colors = [
            Color::new("srgb", &[f64::NAN, 0.2, 0.4], 1.0).unwrap(),
            Color::new("srgb", &[0.6, 0.4, f64::NAN], 1.0).unwrap(),
        ];
        let avg = Color::average(&colors, &AverageOptions::default().space("srgb")).unwrap();
        assert_abs_diff_eq!(avg.coords()[0], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.coords()[1], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.coords()[2], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_premultiplied() {
        let colors = [Color::new("srgb", &[1.0, 0.0, 0.0], 0.25).unwrap(), Color::new("srgb", &[0.0, 0.0, 1.0], 0.75).unwrap()];
        let avg = Color::average(&colors, &AverageOptions::default().space("srgb")).unwrap();
        assert_abs_diff_eq!(avg.alpha(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.coords()[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.coords()[2], 0.75, epsilon = 1e-12);

        let straight = Color::average(&colors, &AverageOptions::default().space("srgb").premultiplied(false)).unwrap();
        assert_abs_diff_eq!(straight.coords()[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_powerless_gray_hue() {
        let colors = [Color::new("hsl", &[0.0, 0.0, 0.5], 1.0).unwrap(), Color::new("hsl", &[120.0, 1.0, 0.5], 1.0).unwrap()];
        let kept = Color::average(&colors, &AverageOptions::default().space("hsl")).unwrap();
        assert_abs_diff_eq!(kept.coords()[0], 60.0, epsilon = 1e-9);
        let powerless = Color::average(&colors, &AverageOptions::default().space("hsl").powerless(true)).unwrap();
        assert_abs_diff_eq!(powerless.coords()[0], 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_space_and_empty() {
        let colors = [Color::parse("white").unwrap()];
        let avg = Color::average(&colors, &AverageOptions::default()).unwrap();
        assert_eq!(avg.space(), "srgb-linear");
        let out = Color::average(&colors, &AverageOptions::default().out_space("srgb")).unwrap();
        assert_eq!(out.space(), "srgb");
        assert!(Color::average(&[], &AverageOptions::default()).is_err());
    }
}
