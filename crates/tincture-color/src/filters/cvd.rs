//! Color vision deficiency simulation.
//!
//! Three published models are available:
//!
//! - Brettel 1997: two half-planes in LMS, the only good choice for
//!   tritanopia.
//! - Vienot 1999: one precomputed matrix per deficiency, fast and accurate
//!   for full protanopia and deuteranopia.
//! - Machado 2009: eleven severity matrices, interpolated in between,
//!   which models anomalous trichromacy.
//!
//! Without an explicit method, protan and deutan use Vienot at full
//! severity and Machado otherwise; tritan always uses Brettel.

use std::fmt;
use std::str::FromStr;

use tincture_core::{Error, Result};
use tincture_math::{Mat3, Vec3, dot3, lerp, vec3};

use super::Filter;
use crate::color::Color;

const LRGB_TO_LMS: Mat3 = Mat3::from_rows([
    [0.1788315947640612, 0.4399813067603072, 0.03597439330845842],
    [0.033798905547214174, 0.27515876526029825, 0.03621503435966088],
    [0.00031083956494671645, 0.001916652059097586, 0.015284557008174545],
]);

/// Two half-plane projections and the separating plane normal, each
/// projection mapping LMS straight back to linear RGB.
struct Wings(Mat3, Mat3, Vec3);

static BRETTEL_PROTAN: Wings = Wings(
    Mat3::from_rows([
        [0.0, 4.601963481151596, -33.603845913662],
        [0.0, 3.1330128106441544, -4.649970365182458],
        [0.0, -0.48646275957526675, 66.69200681278052],
    ]),
    Mat3::from_rows([
        [0.0, 4.459087290426133, -30.787672758115008],
        [0.0, 3.150468559474495, -4.994033368376835],
        [0.0, -0.4857460246367451, 66.67787954858585],
    ]),
    [0.0, 0.01751204863221885, -0.3451727051671733],
);

static BRETTEL_DEUTAN: Wings = Wings(
    Mat3::from_rows([
        [2.0585800667377834, 0.0, -19.868153658269534],
        [1.4544437807582153, 0.0, 2.720909033066217],
        [-0.2242492731553509, 0.0, 65.48837312087291],
    ]),
    Mat3::from_rows([
        [2.107180806727998, 0.0, -21.685368064956243],
        [1.4345668949485586, 0.0, 3.464119182966142],
        [-0.22274513788806224, 0.0, 65.4321324900127],
    ]),
    [-0.01751204863221885, 0.0, 0.6547872948328268],
);

static BRETTEL_TRITAN: Wings = Wings(
    Mat3::from_rows([
        [7.282866078566971, -10.918384106846926, 0.0],
        [-0.347368547887983, 3.5560532261295186, 0.0],
        [-4.157704241835348, 10.784201234635589, 0.0],
    ]),
    Mat3::from_rows([
        [7.981703886196052, -12.244068643121977, 0.0],
        [-0.9564937840814959, 4.711554398878355, 0.0],
        [-0.18183628056123033, 3.2420410695833217, 0.0],
    ]),
    [0.3451727051671733, -0.6547872948328268, 0.0],
);

static VIENOT_PROTAN: Mat3 = Mat3::from_rows([
    [0.10887256075552479, 0.8911274392444744, -8.326672684688674e-17],
    [0.10887256075552504, 0.8911274392444752, 0.0],
    [0.004470319142320402, -0.004470319142320406, 1.0000000000000002],
]);

static VIENOT_DEUTAN: Mat3 = Mat3::from_rows([
    [0.2902683260039952, 0.7097316739960047, 2.7755575615628914e-17],
    [0.29026832600399544, 0.709731673996005, 0.0],
    [-0.021965353642437093, 0.021965353642437083, 1.0000000000000002],
]);

static VIENOT_TRITAN: Mat3 = Mat3::from_rows([
    [1.0000000000000002, 0.15241850478972624, -0.15241850478972596],
    [-3.0357660829594124e-18, 0.8671480610854684, 0.1328519389145317],
    [-3.469446951953614e-18, 0.8671480610854685, 0.13285193891453168],
]);

type Severities = [[[f64; 3]; 3]; 11];

static MACHADO_PROTAN: Severities = [
    [[1.000000, 0.000000, -0.000000], [0.000000, 1.000000, 0.000000], [-0.000000, -0.000000, 1.000000]],
    [[0.856167, 0.182038, -0.038205], [0.029342, 0.955115, 0.015544], [-0.002880, -0.001563, 1.004443]],
    [[0.734766, 0.334872, -0.069637], [0.051840, 0.919198, 0.028963], [-0.004928, -0.004209, 1.009137]],
    [[0.630323, 0.465641, -0.095964], [0.069181, 0.890046, 0.040773], [-0.006308, -0.007724, 1.014032]],
    [[0.539009, 0.579343, -0.118352], [0.082546, 0.866121, 0.051332], [-0.007136, -0.011959, 1.019095]],
    [[0.458064, 0.679578, -0.137642], [0.092785, 0.846313, 0.060902], [-0.007494, -0.016807, 1.024301]],
    [[0.385450, 0.769005, -0.154455], [0.100526, 0.829802, 0.069673], [-0.007442, -0.022190, 1.029632]],
    [[0.319627, 0.849633, -0.169261], [0.106241, 0.815969, 0.077790], [-0.007025, -0.028051, 1.035076]],
    [[0.259411, 0.923008, -0.182420], [0.110296, 0.804340, 0.085364], [-0.006276, -0.034346, 1.040622]],
    [[0.203876, 0.990338, -0.194214], [0.112975, 0.794542, 0.092483], [-0.005222, -0.041043, 1.046265]],
    [[0.152286, 1.052583, -0.204868], [0.114503, 0.786281, 0.099216], [-0.003882, -0.048116, 1.051998]],
];

static MACHADO_DEUTAN: Severities = [
    [[1.000000, 0.000000, -0.000000], [0.000000, 1.000000, 0.000000], [-0.000000, -0.000000, 1.000000]],
    [[0.866435, 0.177704, -0.044139], [0.049567, 0.939063, 0.011370], [-0.003453, 0.007233, 0.996220]],
    [[0.760729, 0.319078, -0.079807], [0.090568, 0.889315, 0.020117], [-0.006027, 0.013325, 0.992702]],
    [[0.675425, 0.433850, -0.109275], [0.125303, 0.847755, 0.026942], [-0.007950, 0.018572, 0.989378]],
    [[0.605511, 0.528560, -0.134071], [0.155318, 0.812366, 0.032316], [-0.009376, 0.023176, 0.986200]],
    [[0.547494, 0.607765, -0.155259], [0.181692, 0.781742, 0.036566], [-0.010410, 0.027275, 0.983136]],
    [[0.498864, 0.674741, -0.173604], [0.205199, 0.754872, 0.039929], [-0.011131, 0.030969, 0.980162]],
    [[0.457771, 0.731899, -0.189670], [0.226409, 0.731012, 0.042579], [-0.011595, 0.034333, 0.977261]],
    [[0.422823, 0.781057, -0.203881], [0.245752, 0.709602, 0.044646], [-0.011843, 0.037423, 0.974421]],
    [[0.392952, 0.823610, -0.216562], [0.263559, 0.690210, 0.046232], [-0.011910, 0.040281, 0.971630]],
    [[0.367322, 0.860646, -0.227968], [0.280085, 0.672501, 0.047413], [-0.011820, 0.042940, 0.968881]],
];

static MACHADO_TRITAN: Severities = [
    [[1.000000, 0.000000, -0.000000], [0.000000, 1.000000, 0.000000], [-0.000000, -0.000000, 1.000000]],
    [[0.926670, 0.092514, -0.019184], [0.021191, 0.964503, 0.014306], [0.008437, 0.054813, 0.936750]],
    [[0.895720, 0.133330, -0.029050], [0.029997, 0.945400, 0.024603], [0.013027, 0.104707, 0.882266]],
    [[0.905871, 0.127791, -0.033662], [0.026856, 0.941251, 0.031893], [0.013410, 0.148296, 0.838294]],
    [[0.948035, 0.089490, -0.037526], [0.014364, 0.946792, 0.038844], [0.010853, 0.193991, 0.795156]],
    [[1.017277, 0.027029, -0.044306], [-0.006113, 0.958479, 0.047634], [0.006379, 0.248708, 0.744913]],
    [[1.104996, -0.046633, -0.058363], [-0.032137, 0.971635, 0.060503], [0.001336, 0.317922, 0.680742]],
    [[1.193214, -0.109812, -0.083402], [-0.058496, 0.979410, 0.079086], [-0.002346, 0.403492, 0.598854]],
    [[1.257728, -0.139648, -0.118081], [-0.078003, 0.975409, 0.102594], [-0.003316, 0.501214, 0.502102]],
    [[1.278864, -0.125333, -0.153531], [-0.084748, 0.957674, 0.127074], [-0.000989, 0.601151, 0.399838]],
    [[1.255528, -0.076749, -0.178779], [-0.078411, 0.930809, 0.147602], [0.004733, 0.691367, 0.303900]],
];

/// Simulation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CvdMethod {
    /// Brettel, Vienot and Mollon 1997.
    Brettel,
    /// Vienot, Brettel and Mollon 1999.
    Vienot,
    /// Machado, Oliveira and Fernandes 2009.
    Machado,
}

impl FromStr for CvdMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "brettel" => Ok(Self::Brettel),
            "vienot" => Ok(Self::Vienot),
            "machado" => Ok(Self::Machado),
            other => Err(Error::unknown("cvd method", other)),
        }
    }
}

/// Missing cone type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deficiency {
    /// Long-wavelength (red) cones.
    Protan,
    /// Medium-wavelength (green) cones.
    Deutan,
    /// Short-wavelength (blue) cones.
    Tritan,
}

impl Deficiency {
    fn name(self) -> &'static str {
        match self {
            Self::Protan => "protan",
            Self::Deutan => "deutan",
            Self::Tritan => "tritan",
        }
    }

    fn wings(self) -> &'static Wings {
        match self {
            Self::Protan => &BRETTEL_PROTAN,
            Self::Deutan => &BRETTEL_DEUTAN,
            Self::Tritan => &BRETTEL_TRITAN,
        }
    }

    fn vienot(self) -> &'static Mat3 {
        match self {
            Self::Protan => &VIENOT_PROTAN,
            Self::Deutan => &VIENOT_DEUTAN,
            Self::Tritan => &VIENOT_TRITAN,
        }
    }

    fn machado(self) -> &'static Severities {
        match self {
            Self::Protan => &MACHADO_PROTAN,
            Self::Deutan => &MACHADO_DEUTAN,
            Self::Tritan => &MACHADO_TRITAN,
        }
    }
}

/// A CVD simulation filter.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cvd {
    /// Deficiency simulated.
    pub deficiency: Deficiency,
    /// Model; chosen from the severity when `None`.
    pub method: Option<CvdMethod>,
}

impl fmt::Debug for Cvd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cvd({}, {:?})", self.deficiency.name(), self.method)
    }
}

impl Cvd {
    /// Filter for `deficiency` with automatic model selection.
    pub fn new(deficiency: Deficiency) -> Self {
        Self { deficiency, method: None }
    }

    /// Forces a model.
    pub fn with_method(mut self, method: CvdMethod) -> Self {
        self.method = Some(method);
        self
    }

    fn pick(&self, severity: f64) -> CvdMethod {
        match (self.method, self.deficiency) {
            (Some(m), _) => m,
            (None, Deficiency::Tritan) => CvdMethod::Brettel,
            (None, _) if severity >= 1.0 => CvdMethod::Vienot,
            (None, _) => CvdMethod::Machado,
        }
    }
}

fn blend(rgb: Vec3, out: Vec3, severity: f64) -> Vec3 {
    if severity < 1.0 { std::array::from_fn(|i| lerp(rgb[i], out[i], severity)) } else { out }
}

fn brettel(rgb: Vec3, severity: f64, wings: &Wings) -> Vec3 {
    let lms = LRGB_TO_LMS * rgb;
    let side = if dot3(lms, wings.2) > 0.0 { &wings.1 } else { &wings.0 };
    blend(rgb, *side * lms, severity)
}

fn machado(rgb: Vec3, severity: f64, table: &Severities) -> Vec3 {
    let scaled = severity * 10.0;
    let low = (scaled as usize).min(10);
    let out = Mat3::from_rows(table[low]) * rgb;
    if low < 10 && scaled != low as f64 {
        let next = Mat3::from_rows(table[low + 1]) * rgb;
        let w = scaled - low as f64;
        return std::array::from_fn(|i| lerp(out[i], next[i], w));
    }
    out
}

impl Filter for Cvd {
    fn name(&self) -> &str {
        self.deficiency.name()
    }

    fn allowed_spaces(&self) -> &[&'static str] {
        &["srgb-linear"]
    }

    fn filter(&self, color: &mut Color, amount: Option<f64>) -> Result<()> {
        let severity = amount.unwrap_or(1.0).clamp(0.0, 1.0);
        let rgb = vec3(color.coords());
        let out = match self.pick(severity) {
            CvdMethod::Brettel => brettel(rgb, severity, self.deficiency.wings()),
            CvdMethod::Vienot => blend(rgb, *self.deficiency.vienot() * rgb, severity),
            CvdMethod::Machado => machado(rgb, severity, self.deficiency.machado()),
        };
        color.coords_mut()[..3].copy_from_slice(&out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn simulate(cvd: Cvd, rgb: [f64; 3], amount: Option<f64>) -> Vec<f64> {
        let mut c = Color::new("srgb-linear", &rgb, 1.0).unwrap();
        cvd.filter(&mut c, amount).unwrap();
        c.coords().to_vec()
    }

    #[test]
    fn test_method_selection() {
        let protan = Cvd::new(Deficiency::Protan);
        assert_eq!(protan.pick(1.0), CvdMethod::Vienot);
        assert_eq!(protan.pick(0.5), CvdMethod::Machado);
        assert_eq!(Cvd::new(Deficiency::Tritan).pick(0.5), CvdMethod::Brettel);
        assert_eq!(protan.with_method(CvdMethod::Brettel).pick(1.0), CvdMethod::Brettel);
        assert_eq!("machado".parse::<CvdMethod>().unwrap(), CvdMethod::Machado);
        assert!("daltonize".parse::<CvdMethod>().is_err());
    }

    #[test]
    fn test_white_preserved() {
        for d in [Deficiency::Protan, Deficiency::Deutan, Deficiency::Tritan] {
            for m in [CvdMethod::Brettel, CvdMethod::Vienot, CvdMethod::Machado] {
                let out = simulate(Cvd::new(d).with_method(m), [1.0, 1.0, 1.0], None);
                for v in out {
                    assert_abs_diff_eq!(v, 1.0, epsilon = 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_zero_severity_is_identity() {
        let src = [0.8, 0.2, 0.1];
        for m in [CvdMethod::Brettel, CvdMethod::Vienot, CvdMethod::Machado] {
            let out = simulate(Cvd::new(Deficiency::Deutan).with_method(m), src, Some(0.0));
            for (a, b) in out.iter().zip(src) {
                assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_machado_interpolates() {
        let src = [0.9, 0.1, 0.3];
        let lo = simulate(Cvd::new(Deficiency::Protan).with_method(CvdMethod::Machado), src, Some(0.2));
        let hi = simulate(Cvd::new(Deficiency::Protan).with_method(CvdMethod::Machado), src, Some(0.3));
        let mid = simulate(Cvd::new(Deficiency::Protan).with_method(CvdMethod::Machado), src, Some(0.25));
        for i in 0..3 {
            assert_abs_diff_eq!(mid[i], (lo[i] + hi[i]) / 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_protan_collapses_red_green() {
        let red = simulate(Cvd::new(Deficiency::Protan), [1.0, 0.0, 0.0], None);
        // Vienot protanopia maps red onto the yellow-blue axis: r == g.
        assert_abs_diff_eq!(red[0], red[1], epsilon = 1e-12);
    }
}
