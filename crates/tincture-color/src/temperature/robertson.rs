//! Robertson (1968) isotemperature-line interpolation.
//!
//! The published table has 31 lines between 0 and 600 mired, each giving
//! a locus point in CIE 1960 uv and the slope of the isotemperature line
//! through it. Temperatures below roughly 1667 K extrapolate along the
//! last segment.

use std::sync::Arc;

use tincture_core::{Error, Result};
use tincture_math::lerp;

use super::Cct;
use crate::chromaticity::Chromaticity;
use crate::color::Color;
use crate::registry::Registry;

/// `[mired, u, v, slope]`
type Line = [f64; 4];

const TABLE: [Line; 31] = [
    [0.0, 0.18006, 0.26352, -0.24341],
    [10.0, 0.18066, 0.26589, -0.25479],
    [20.0, 0.18133, 0.26846, -0.26876],
    [30.0, 0.18208, 0.27119, -0.28539],
    [40.0, 0.18293, 0.27407, -0.30470],
    [50.0, 0.18388, 0.27709, -0.32675],
    [60.0, 0.18494, 0.28021, -0.35156],
    [70.0, 0.18611, 0.28342, -0.37915],
    [80.0, 0.18740, 0.28668, -0.40955],
    [90.0, 0.18880, 0.28997, -0.44278],
    [100.0, 0.19032, 0.29326, -0.47888],
    [125.0, 0.19462, 0.30141, -0.58204],
    [150.0, 0.19962, 0.30921, -0.70471],
    [175.0, 0.20525, 0.31647, -0.84901],
    [200.0, 0.21142, 0.32312, -1.0182],
    [225.0, 0.21807, 0.32909, -1.2168],
    [250.0, 0.22511, 0.33439, -1.4512],
    [275.0, 0.23247, 0.33904, -1.7298],
    [300.0, 0.24010, 0.34308, -2.0637],
    [325.0, 0.24792, 0.34655, -2.4681],
    [350.0, 0.25591, 0.34951, -2.9641],
    [375.0, 0.26400, 0.35200, -3.5814],
    [400.0, 0.27218, 0.35407, -4.3633],
    [425.0, 0.28039, 0.35577, -5.3762],
    [450.0, 0.28863, 0.35714, -6.7262],
    [475.0, 0.29685, 0.35823, -8.5955],
    [500.0, 0.30505, 0.35907, -11.324],
    [525.0, 0.31320, 0.35968, -15.628],
    [550.0, 0.32129, 0.36011, -23.325],
    [575.0, 0.32931, 0.36038, -40.770],
    [600.0, 0.33724, 0.36051, -116.45],
];

/// Robertson 1968 CCT.
#[derive(Debug, Clone, PartialEq)]
pub struct Robertson1968 {
    table: Vec<Line>,
}

impl Default for Robertson1968 {
    fn default() -> Self {
        Self { table: TABLE.to_vec() }
    }
}

impl Robertson1968 {
    /// A method over a custom table of `[mired, u, v, slope]` lines,
    /// sorted by mired.
    pub fn with_table(table: Vec<[f64; 4]>) -> Result<Self> {
        if table.len() < 2 {
            return Err(Error::config("a Robertson table needs at least two lines"));
        }
        Ok(Self { table })
    }

    /// Unit vector along the isotemperature line with the given slope.
    fn direction(slope: f64) -> (f64, f64) {
        let len = (1.0 + slope * slope).sqrt();
        (1.0 / len, slope / len)
    }
}

impl Cct for Robertson1968 {
    fn name(&self) -> &str {
        "robertson-1968"
    }

    fn to_cct(&self, color: &Color) -> Result<[f64; 2]> {
        let [u, v, _] = color.split_chromaticity(Chromaticity::Uv1960, None)?;
        let end = self.table.len() - 1;
        let mut inverted = false;
        let mut previous_di = 0.0;

        for (index, current) in self.table.iter().enumerate() {
            // Keep "negative means past the line" for either slope sign.
            let di = if current[3] < 0.0 {
                (v - current[2]) - current[3] * (u - current[1])
            } else {
                inverted = true;
                (current[2] - v) - current[3] * (current[1] - u)
            };
            if index > 0 && (di <= 0.0 || index == end) {
                let previous = &self.table[index - 1];
                let denom = (1.0 + current[3] * current[3]).sqrt();
                let previous_denom = (1.0 + previous[3] * previous[3]).sqrt();
                let dip = previous_di / previous_denom;
                let factor = dip / (dip - di / denom);

                let mired = lerp(previous[0], current[0], factor);
                let kelvin = if mired > 0.0 { 1e6 / mired } else { f64::INFINITY };

                let (dup, dvp) = Self::direction(previous[3]);
                let (dun, dvn) = Self::direction(current[3]);
                let (du, dv) = (lerp(dup, dun, factor), lerp(dvp, dvn, factor));
                let len = du.hypot(dv);
                let duv = (du / len) * (u - lerp(previous[1], current[1], factor))
                    + (dv / len) * (v - lerp(previous[2], current[2], factor));
                return Ok([kelvin, if inverted { duv } else { -duv }]);
            }
            previous_di = di;
        }
        Ok([0.0, 0.0])
    }

    fn from_cct(
        &self,
        registry: &Arc<Registry>,
        space: &str,
        kelvin: f64,
        duv: f64,
        scale: Option<&str>,
    ) -> Result<Color> {
        let r = 1e6 / kelvin;
        let end = self.table.len() - 2;
        let (mut u, mut v) = (0.0, 0.0);

        for (index, pair) in self.table.windows(2).enumerate() {
            let (current, future) = (&pair[0], &pair[1]);
            if r < future[0] || index == end {
                let f = (future[0] - r) / (future[0] - current[0]);
                u = lerp(future[1], current[1], f);
                v = lerp(future[2], current[2], f);

                if duv != 0.0 {
                    let inverted = current[3] >= 0.0;
                    let (u1, v1) = Self::direction(current[3]);
                    let (u2, v2) = Self::direction(future[3]);
                    let (du, dv) = (lerp(u2, u1, f), lerp(v2, v1, f));
                    let len = du.hypot(dv);
                    let offset = if inverted { duv } else { -duv };
                    u += du / len * offset;
                    v += dv / len * offset;
                }
                break;
            }
        }
        Color::from_chromaticity_in(registry, space, &[u, v, 1.0], Chromaticity::Uv1960, scale)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_d65_white() {
        let [kelvin, duv] = Color::parse("white").unwrap().cct(None).unwrap();
        assert_abs_diff_eq!(kelvin, 6504.0, epsilon = 10.0);
        assert_abs_diff_eq!(duv, 0.0032, epsilon = 5e-4);
    }

    #[test]
    fn test_round_trip_with_duv() {
        for kelvin in [2000.0, 3500.0, 5000.0, 9000.0] {
            for duv in [-0.01, 0.0, 0.015] {
                let c = Color::blackbody("xyz-d65", kelvin, duv, None, None).unwrap();
                let [k, d] = c.cct(Some("robertson-1968")).unwrap();
                assert_abs_diff_eq!(k, kelvin, epsilon = kelvin * 2e-3);
                assert_abs_diff_eq!(d, duv, epsilon = 5e-4);
            }
        }
    }

    #[test]
    fn test_positive_duv_is_above_locus() {
        let on = Color::blackbody("xyz-d65", 4000.0, 0.0, None, None).unwrap();
        let above = Color::blackbody("xyz-d65", 4000.0, 0.01, None, None).unwrap();
        let [_, v_on, _] = on.split_chromaticity(Chromaticity::Uv1960, None).unwrap();
        let [_, v_above, _] = above.split_chromaticity(Chromaticity::Uv1960, None).unwrap();
        assert!(v_above > v_on);
    }

    #[test]
    fn test_scaled_output() {
        let c = Color::blackbody("srgb-linear", 6500.0, 0.0, Some("srgb-linear"), None).unwrap();
        let max = c.coords().iter().copied().fold(f64::MIN, f64::max);
        assert_abs_diff_eq!(max, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_custom_table_rejected() {
        assert!(Robertson1968::with_table(vec![[0.0, 0.18, 0.26, -0.24]]).is_err());
    }
}
