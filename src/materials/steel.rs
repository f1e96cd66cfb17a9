//! Steel section and grade tables (EN 10025, DK NA partial factors)
//!
//! Section properties for the IPE, HE and UNP hot-rolled families and a set
//! of cold-formed RHS profiles. All values are stored in SI base units
//! (m, m², m³, m⁴, kg/m).

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Modulus of elasticity for structural steel [Pa]
pub const ELASTIC_MODULUS: f64 = 210e9;
/// Shear modulus for structural steel [Pa]
pub const SHEAR_MODULUS: f64 = 81e9;
/// Density of structural steel [kg/m³]
pub const DENSITY: f64 = 7850.0;

/// Partial factor for cross-section resistance (DK NA)
pub const GAMMA_M0: f64 = 1.1;
/// Partial factor for member stability (DK NA)
pub const GAMMA_M1: f64 = 1.2;

/// Profile family classification, drives shear area, buckling curve and
/// cross-section class rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileFamily {
    /// Hot-rolled I and H sections (IPE, HE-A/B)
    IpeHe,
    /// Channel sections (UNP)
    Un,
    /// Rectangular hollow sections
    Rh,
    /// Anything else
    Other,
}

impl ProfileFamily {
    /// Classify a profile name by its prefix
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("IPE") || name.starts_with("HE") {
            ProfileFamily::IpeHe
        } else if name.starts_with("UN") {
            ProfileFamily::Un
        } else if name.starts_with("RH") {
            ProfileFamily::Rh
        } else {
            ProfileFamily::Other
        }
    }
}

/// Cross-section properties for one steel profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SteelSection {
    pub name: &'static str,
    pub family: ProfileFamily,
    /// Section height [m]
    pub h: f64,
    /// Flange width [m]
    pub b: f64,
    /// Flange thickness [m]
    pub t_f: f64,
    /// Web thickness [m]
    pub t_w: f64,
    /// Root radius [m]
    pub r: f64,
    /// Area [m²]
    pub a: f64,
    /// Second moment of area, strong axis [m⁴]
    pub i_y: f64,
    /// Second moment of area, weak axis [m⁴]
    pub i_z: f64,
    /// Elastic section modulus, strong axis [m³]
    pub w_el_y: f64,
    /// Plastic section modulus, strong axis [m³]
    pub w_pl_y: f64,
    /// Mass per metre [kg/m]
    pub weight: f64,
}

macro_rules! section {
    ($name:literal, $fam:ident, $h:expr, $b:expr, $tw:expr, $tf:expr, $r:expr,
     $a:expr, $iy:expr, $iz:expr, $wel:expr, $wpl:expr, $g:expr) => {
        SteelSection {
            name: $name,
            family: ProfileFamily::$fam,
            // mm, cm2, cm4, cm3 catalogue units scaled to SI
            h: $h * 1e-3,
            b: $b * 1e-3,
            t_w: $tw * 1e-3,
            t_f: $tf * 1e-3,
            r: $r * 1e-3,
            a: $a * 1e-4,
            i_y: $iy * 1e-8,
            i_z: $iz * 1e-8,
            w_el_y: $wel * 1e-6,
            w_pl_y: $wpl * 1e-6,
            weight: $g,
        }
    };
}

#[rustfmt::skip]
static SECTIONS: &[SteelSection] = &[
    // name, family, h, b, t_w, t_f, r [mm], A [cm2], I_y, I_z [cm4], W_el,y, W_pl,y [cm3], g [kg/m]
    section!("IPE80",  IpeHe,  80.0,  46.0,  3.8,  5.2,  5.0,   7.64,    80.1,    8.49,   20.0,   23.2,   6.0),
    section!("IPE100", IpeHe, 100.0,  55.0,  4.1,  5.7,  7.0,  10.3,    171.0,   15.9,    34.2,   39.4,   8.1),
    section!("IPE120", IpeHe, 120.0,  64.0,  4.4,  6.3,  7.0,  13.2,    318.0,   27.7,    53.0,   60.7,  10.4),
    section!("IPE140", IpeHe, 140.0,  73.0,  4.7,  6.9,  7.0,  16.4,    541.0,   44.9,    77.3,   88.3,  12.9),
    section!("IPE160", IpeHe, 160.0,  82.0,  5.0,  7.4,  9.0,  20.1,    869.0,   68.3,   109.0,  124.0,  15.8),
    section!("IPE180", IpeHe, 180.0,  91.0,  5.3,  8.0,  9.0,  23.9,   1317.0,  101.0,   146.0,  166.0,  18.8),
    section!("IPE200", IpeHe, 200.0, 100.0,  5.6,  8.5, 12.0,  28.5,   1943.0,  142.0,   194.3,  220.6,  22.4),
    section!("IPE220", IpeHe, 220.0, 110.0,  5.9,  9.2, 12.0,  33.4,   2772.0,  205.0,   252.0,  285.4,  26.2),
    section!("IPE240", IpeHe, 240.0, 120.0,  6.2,  9.8, 15.0,  39.1,   3892.0,  284.0,   324.3,  366.6,  30.7),
    section!("IPE270", IpeHe, 270.0, 135.0,  6.6, 10.2, 15.0,  45.9,   5790.0,  420.0,   428.9,  484.0,  36.1),
    section!("IPE300", IpeHe, 300.0, 150.0,  7.1, 10.7, 15.0,  53.8,   8356.0,  604.0,   557.1,  628.4,  42.2),
    section!("IPE330", IpeHe, 330.0, 160.0,  7.5, 11.5, 18.0,  62.6,  11770.0,  788.0,   713.1,  804.3,  49.1),
    section!("IPE360", IpeHe, 360.0, 170.0,  8.0, 12.7, 18.0,  72.7,  16270.0, 1043.0,   903.6, 1019.0,  57.1),
    section!("IPE400", IpeHe, 400.0, 180.0,  8.6, 13.5, 21.0,  84.5,  23130.0, 1318.0,  1156.0, 1307.0,  66.3),
    section!("IPE450", IpeHe, 450.0, 190.0,  9.4, 14.6, 21.0,  98.8,  33740.0, 1676.0,  1500.0, 1702.0,  77.6),
    section!("IPE500", IpeHe, 500.0, 200.0, 10.2, 16.0, 21.0, 116.0,  48200.0, 2142.0,  1928.0, 2194.0,  90.7),
    section!("IPE550", IpeHe, 550.0, 210.0, 11.1, 17.2, 24.0, 134.0,  67120.0, 2668.0,  2441.0, 2787.0, 106.0),
    section!("IPE600", IpeHe, 600.0, 220.0, 12.0, 19.0, 24.0, 156.0,  92080.0, 3387.0,  3069.0, 3512.0, 122.0),
    section!("HE100A", IpeHe,  96.0, 100.0,  5.0,  8.0, 12.0,  21.2,    349.2,  133.8,    72.8,   83.0,  16.7),
    section!("HE140A", IpeHe, 133.0, 140.0,  5.5,  8.5, 12.0,  31.4,   1033.0,  389.3,   155.4,  173.5,  24.7),
    section!("HE200A", IpeHe, 190.0, 200.0,  6.5, 10.0, 18.0,  53.8,   3692.0, 1336.0,   388.6,  429.5,  42.3),
    section!("HE100B", IpeHe, 100.0, 100.0,  6.0, 10.0, 12.0,  26.0,    449.5,  167.3,    89.9,  104.2,  20.4),
    section!("HE120B", IpeHe, 120.0, 120.0,  6.5, 11.0, 12.0,  34.0,    864.4,  317.5,   144.1,  165.2,  26.7),
    section!("HE140B", IpeHe, 140.0, 140.0,  7.0, 12.0, 12.0,  43.0,   1509.0,  549.7,   215.6,  245.4,  33.7),
    section!("HE160B", IpeHe, 160.0, 160.0,  8.0, 13.0, 15.0,  54.3,   2492.0,  889.2,   311.5,  354.0,  42.6),
    section!("HE180B", IpeHe, 180.0, 180.0,  8.5, 14.0, 15.0,  65.3,   3831.0, 1363.0,   425.7,  481.4,  51.2),
    section!("HE200B", IpeHe, 200.0, 200.0,  9.0, 15.0, 18.0,  78.1,   5696.0, 2003.0,   569.6,  642.5,  61.3),
    section!("HE220B", IpeHe, 220.0, 220.0,  9.5, 16.0, 18.0,  91.0,   8091.0, 2843.0,   735.5,  827.0,  71.5),
    section!("HE240B", IpeHe, 240.0, 240.0, 10.0, 17.0, 21.0, 106.0,  11260.0, 3923.0,   938.3, 1053.0,  83.2),
    section!("HE280B", IpeHe, 280.0, 280.0, 10.5, 18.0, 24.0, 131.0,  19270.0, 6595.0,  1376.0, 1534.0, 103.0),
    section!("HE320B", IpeHe, 320.0, 300.0, 11.5, 20.5, 27.0, 161.0,  30820.0, 9239.0,  1926.0, 2149.0, 127.0),
    section!("UNP80",  Un,     80.0,  45.0,  6.0,  8.0,  8.0,  11.0,    106.0,   19.4,    26.5,   31.8,   8.6),
    section!("UNP100", Un,    100.0,  50.0,  6.0,  8.5,  8.5,  13.5,    206.0,   29.3,    41.2,   49.0,  10.6),
    section!("UNP120", Un,    120.0,  55.0,  7.0,  9.0,  9.0,  17.0,    364.0,   43.2,    60.7,   72.6,  13.4),
    section!("UNP140", Un,    140.0,  60.0,  7.0, 10.0, 10.0,  20.4,    605.0,   62.7,    86.4,  103.0,  16.0),
    section!("UNP160", Un,    160.0,  65.0,  7.5, 10.5, 10.5,  24.0,    925.0,   85.3,   116.0,  138.0,  18.8),
    section!("UNP200", Un,    200.0,  75.0,  8.5, 11.5, 11.5,  32.2,   1910.0,  148.0,   191.0,  228.0,  25.3),
    section!("RHS100x50x4",   Rh, 100.0,  50.0, 4.0, 4.0,  6.0, 10.9,   140.0,   46.2,    28.1,   34.6,   8.6),
    section!("RHS120x80x5",   Rh, 120.0,  80.0, 5.0, 5.0,  7.5, 18.4,   370.0,  196.0,    61.7,   74.6,  14.4),
    section!("RHS150x100x6.3", Rh, 150.0, 100.0, 6.3, 6.3,  9.5, 29.5,   898.0,  474.0,   120.0,  145.0,  23.1),
];

/// Look up a steel profile by catalogue name
pub fn steel_section(name: &str) -> FrameResult<&'static SteelSection> {
    SECTIONS
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| FrameError::Unsupported(format!("steel profile '{name}' not in section table")))
}

/// Yield strength by grade and plate thickness per EN 10025-2 [Pa]
///
/// `t` is the governing plate thickness in metres.
pub fn yield_strength(grade: &str, t: f64) -> FrameResult<f64> {
    // (upper thickness bound [m], f_y [MPa]) bands per grade
    let bands: &[(f64, f64)] = match grade {
        "S235" => &[
            (0.016, 235.0),
            (0.040, 225.0),
            (0.063, 215.0),
            (0.080, 215.0),
            (0.100, 215.0),
            (0.150, 195.0),
        ],
        "S275" => &[
            (0.016, 275.0),
            (0.040, 265.0),
            (0.063, 255.0),
            (0.080, 245.0),
            (0.100, 235.0),
            (0.150, 225.0),
        ],
        "S355" => &[
            (0.016, 355.0),
            (0.040, 345.0),
            (0.063, 335.0),
            (0.080, 325.0),
            (0.100, 315.0),
            (0.150, 295.0),
        ],
        "S420" => &[
            (0.016, 420.0),
            (0.040, 400.0),
            (0.063, 390.0),
            (0.080, 390.0),
        ],
        "S460" => &[
            (0.016, 460.0),
            (0.040, 440.0),
            (0.063, 410.0),
            (0.080, 410.0),
            (0.100, 400.0),
            (0.150, 380.0),
        ],
        _ => {
            return Err(FrameError::Unsupported(format!(
                "steel grade '{grade}' not in yield-strength table"
            )))
        }
    };

    bands
        .iter()
        .find(|(t_max, _)| t <= *t_max)
        .map(|(_, fy)| fy * 1e6)
        .ok_or_else(|| {
            FrameError::Unsupported(format!(
                "no yield strength for grade '{grade}' at thickness {:.0} mm",
                t * 1e3
            ))
        })
}

/// Fire reduction of the yield strength, EN 1993-1-2 table 3.1
///
/// (steel temperature [°C], k_y factor)
#[rustfmt::skip]
static FIRE_KY: &[(f64, f64)] = &[
    (20.0, 1.000), (100.0, 1.000), (200.0, 1.000), (300.0, 1.000),
    (400.0, 1.000), (500.0, 0.780), (600.0, 0.470), (700.0, 0.230),
    (800.0, 0.110), (900.0, 0.060), (1000.0, 0.040), (1100.0, 0.020),
    (1200.0, 0.000),
];

/// Critical steel temperature for a required k_y, by inverse linear
/// interpolation of the fire reduction table [°C]
///
/// A required k_y at or above 1 maps to 400 °C (end of the plateau); zero or
/// negative demand maps to 1200 °C.
pub fn critical_temperature(ky: f64) -> f64 {
    if ky >= 1.0 {
        // last plateau point
        return 400.0;
    }
    if ky <= 0.0 {
        return 1200.0;
    }
    for w in FIRE_KY.windows(2) {
        let (t0, k0) = w[0];
        let (t1, k1) = w[1];
        if ky <= k0 && ky >= k1 {
            if (k0 - k1).abs() < 1e-12 {
                continue;
            }
            return t0 + (ky - k0) / (k1 - k0) * (t1 - t0);
        }
    }
    1200.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ipe200_properties() {
        let s = steel_section("IPE200").unwrap();
        assert_relative_eq!(s.w_pl_y, 220.6e-6, epsilon = 1e-9);
        assert_relative_eq!(s.a, 28.5e-4, epsilon = 1e-9);
        assert_relative_eq!(s.h, 0.200, epsilon = 1e-9);
        assert_eq!(s.family, ProfileFamily::IpeHe);
    }

    #[test]
    fn test_unknown_profile_is_error() {
        assert!(steel_section("IPE75").is_err());
    }

    #[test]
    fn test_yield_strength_bands() {
        assert_relative_eq!(yield_strength("S235", 0.0085).unwrap(), 235e6);
        assert_relative_eq!(yield_strength("S355", 0.020).unwrap(), 345e6);
        assert!(yield_strength("S999", 0.01).is_err());
    }

    #[test]
    fn test_critical_temperature_interpolation() {
        // Halfway between 400C (1.0) and 500C (0.78)
        assert_relative_eq!(critical_temperature(0.89), 450.0, epsilon = 1e-9);
        assert_relative_eq!(critical_temperature(1.2), 400.0);
        assert_relative_eq!(critical_temperature(0.0), 1200.0);
    }
}
