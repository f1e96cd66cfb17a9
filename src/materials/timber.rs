//! Timber strength classes and modification factors (EN 338, EN 14080, EC5)
//!
//! Solid classes (C/D/T) and glulam classes (GL) with characteristic
//! strengths in Pa and stiffness in Pa; modification factors per
//! (service class x load duration).

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Solid vs glued-laminated timber; drives k_mod/k_def/k_h/γ_M selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimberCategory {
    Solid,
    Glulam,
}

/// EC5 service class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceClass {
    One,
    Two,
    Three,
}

/// EC5 load-duration class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadDuration {
    Permanent,
    LongTerm,
    MediumTerm,
    ShortTerm,
    Instantaneous,
}

/// Characteristic properties of one strength class
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimberClass {
    pub name: &'static str,
    pub category: TimberCategory,
    /// Bending strength [Pa]
    pub f_mk: f64,
    /// Tension parallel [Pa]
    pub f_t0k: f64,
    /// Tension perpendicular [Pa]
    pub f_t90k: f64,
    /// Compression parallel [Pa]
    pub f_c0k: f64,
    /// Compression perpendicular [Pa]
    pub f_c90k: f64,
    /// Shear [Pa]
    pub f_vk: f64,
    /// Mean modulus of elasticity [Pa]
    pub e_mean: f64,
    /// 5th-percentile modulus of elasticity [Pa]
    pub e_005: f64,
    /// Mean shear modulus [Pa]
    pub g_mean: f64,
    /// Characteristic density [kg/m³]
    pub rho_k: f64,
    /// Mean density [kg/m³]
    pub rho_mean: f64,
}

macro_rules! class {
    ($name:literal, $cat:ident, $fmk:expr, $ft0:expr, $ft90:expr, $fc0:expr,
     $fc90:expr, $fvk:expr, $e:expr, $e005:expr, $g:expr, $rhok:expr, $rhom:expr) => {
        TimberClass {
            name: $name,
            category: TimberCategory::$cat,
            // MPa / GPa catalogue values scaled to Pa
            f_mk: $fmk * 1e6,
            f_t0k: $ft0 * 1e6,
            f_t90k: $ft90 * 1e6,
            f_c0k: $fc0 * 1e6,
            f_c90k: $fc90 * 1e6,
            f_vk: $fvk * 1e6,
            e_mean: $e * 1e9,
            e_005: $e005 * 1e9,
            g_mean: $g * 1e9,
            rho_k: $rhok,
            rho_mean: $rhom,
        }
    };
}

#[rustfmt::skip]
static CLASSES: &[TimberClass] = &[
    // name, category, f_mk, f_t0k, f_t90k, f_c0k, f_c90k, f_vk [MPa], E_mean, E_005, G_mean [GPa], rho_k, rho_mean
    class!("C14",    Solid, 14.0,  8.0, 0.4, 16.0, 2.0,  3.0,  7.0,  4.7, 0.44, 290.0, 350.0),
    class!("C16",    Solid, 16.0, 10.0, 0.4, 17.0, 2.2,  3.2,  8.0,  5.4, 0.50, 310.0, 370.0),
    class!("C18",    Solid, 18.0, 11.0, 0.4, 18.0, 2.2,  3.4,  9.0,  6.0, 0.56, 320.0, 380.0),
    class!("C20",    Solid, 20.0, 12.0, 0.4, 19.0, 2.3,  3.6,  9.5,  6.4, 0.59, 330.0, 390.0),
    class!("C22",    Solid, 22.0, 13.0, 0.4, 20.0, 2.4,  3.8, 10.0,  6.7, 0.63, 340.0, 410.0),
    class!("C24",    Solid, 24.0, 14.0, 0.4, 21.0, 2.5,  4.0, 11.0,  7.4, 0.69, 350.0, 420.0),
    class!("C27",    Solid, 27.0, 16.0, 0.4, 22.0, 2.6,  4.0, 11.5,  7.7, 0.72, 370.0, 450.0),
    class!("C30",    Solid, 30.0, 18.0, 0.4, 23.0, 2.7,  4.0, 12.0,  8.0, 0.75, 380.0, 460.0),
    class!("C35",    Solid, 35.0, 21.0, 0.4, 25.0, 2.8,  4.0, 13.0,  8.7, 0.81, 400.0, 480.0),
    class!("C40",    Solid, 40.0, 24.0, 0.4, 26.0, 2.9,  4.0, 14.0,  9.4, 0.88, 420.0, 500.0),
    class!("C45",    Solid, 45.0, 27.0, 0.4, 27.0, 3.1,  4.0, 15.0, 10.0, 0.94, 440.0, 520.0),
    class!("C50",    Solid, 50.0, 30.0, 0.4, 29.0, 3.2,  4.0, 16.0, 10.7, 1.00, 460.0, 550.0),
    class!("D18",    Solid, 18.0, 11.0, 0.6, 18.0, 7.5,  3.4,  9.5,  8.0, 0.59, 475.0, 570.0),
    class!("D24",    Solid, 24.0, 14.0, 0.6, 21.0, 7.8,  4.0, 10.0,  8.5, 0.62, 485.0, 580.0),
    class!("D30",    Solid, 30.0, 18.0, 0.6, 23.0, 8.0,  4.0, 11.0,  9.2, 0.69, 530.0, 640.0),
    class!("D35",    Solid, 35.0, 21.0, 0.6, 25.0, 8.1,  4.0, 12.0, 10.1, 0.75, 540.0, 650.0),
    class!("D40",    Solid, 40.0, 24.0, 0.6, 26.0, 8.3,  4.0, 13.0, 10.9, 0.81, 550.0, 660.0),
    class!("D50",    Solid, 50.0, 30.0, 0.6, 29.0, 9.3,  4.0, 14.0, 11.8, 0.88, 620.0, 750.0),
    class!("D60",    Solid, 60.0, 36.0, 0.6, 32.0, 10.5, 4.5, 17.0, 14.3, 1.06, 700.0, 840.0),
    class!("D70",    Solid, 70.0, 42.0, 0.6, 34.0, 13.5, 5.0, 20.0, 16.8, 1.25, 900.0, 1080.0),
    class!("T200",   Solid, 11.0,  8.5, 0.4, 10.0, 2.8, 0.85,  7.0,  2.8, 0.60, 290.0, 350.0),
    class!("T300",   Solid, 14.5, 12.5, 0.4, 12.5, 2.8, 1.4,   9.0,  3.5, 0.60, 290.0, 350.0),
    class!("T400",   Solid, 18.0, 16.5, 0.4, 15.0, 2.8, 1.4,  10.5,  4.2, 0.60, 290.0, 350.0),
    class!("GL24h", Glulam, 24.0, 16.5, 0.4,  24.0, 2.7, 2.7, 11.6,  9.4, 0.72, 380.0, 380.0),
    class!("GL28h", Glulam, 28.0, 19.5, 0.45, 26.5, 3.0, 3.2, 12.6, 10.2, 0.78, 410.0, 410.0),
    class!("GL32h", Glulam, 32.0, 22.5, 0.5,  29.0, 3.3, 3.8, 13.7, 11.1, 0.85, 430.0, 430.0),
    class!("GL24c", Glulam, 24.0, 14.0, 0.35, 21.0, 2.4, 2.2, 11.6,  9.4, 0.59, 350.0, 350.0),
    class!("GL28c", Glulam, 28.0, 16.5, 0.4,  24.0, 2.7, 2.7, 12.6, 10.2, 0.72, 380.0, 380.0),
    class!("GL30c", Glulam, 30.0, 19.5, 0.5,  24.5, 2.5, 3.5, 13.0, 10.8, 0.65, 430.0, 430.0),
    class!("GL32c", Glulam, 32.0, 19.5, 0.45, 26.5, 3.0, 3.2, 13.7, 11.1, 0.78, 410.0, 410.0),
];

/// Look up a strength class by name ("C24", "GL28h", ...). The glulam names
/// also accept the spaced form "GL 28h".
pub fn timber_class(name: &str) -> FrameResult<&'static TimberClass> {
    let key: String = name.split_whitespace().collect();
    CLASSES
        .iter()
        .find(|c| c.name == key)
        .ok_or_else(|| {
            FrameError::Unsupported(format!("timber strength class '{name}' not in table"))
        })
}

/// Modification factor k_mod for solid and glued-laminated timber
/// (EC5 table 3.1; identical rows for the two materials)
pub fn k_mod(service_class: ServiceClass, duration: LoadDuration) -> f64 {
    // Service classes 1 and 2 share a row; class 3 is reduced
    match (service_class, duration) {
        (ServiceClass::Three, LoadDuration::Permanent) => 0.5,
        (ServiceClass::Three, LoadDuration::LongTerm) => 0.55,
        (ServiceClass::Three, LoadDuration::MediumTerm) => 0.65,
        (ServiceClass::Three, LoadDuration::ShortTerm) => 0.7,
        (ServiceClass::Three, LoadDuration::Instantaneous) => 0.9,
        (_, LoadDuration::Permanent) => 0.6,
        (_, LoadDuration::LongTerm) => 0.7,
        (_, LoadDuration::MediumTerm) => 0.8,
        (_, LoadDuration::ShortTerm) => 0.9,
        (_, LoadDuration::Instantaneous) => 1.1,
    }
}

/// Deformation factor k_def (EC5 table 3.2)
pub fn k_def(service_class: ServiceClass) -> f64 {
    match service_class {
        ServiceClass::One => 0.6,
        ServiceClass::Two => 0.8,
        ServiceClass::Three => 2.0,
    }
}

/// Straightness imperfection factor β_c (EC5 6.3.2)
pub fn beta_c(category: TimberCategory) -> f64 {
    match category {
        TimberCategory::Solid => 0.2,
        TimberCategory::Glulam => 0.1,
    }
}

/// Partial factor γ_M (DK NA: individually grade-stamped solid timber 1.35,
/// glulam 1.3)
pub fn gamma_m(category: TimberCategory) -> f64 {
    match category {
        TimberCategory::Solid => 1.35,
        TimberCategory::Glulam => 1.3,
    }
}

/// Size-effect factor k_h for bending/tension on the governing dimension
/// (EC5 3.2/3.3; `h` in metres)
pub fn k_h(category: TimberCategory, h: f64) -> f64 {
    let h_mm = h * 1e3;
    match category {
        TimberCategory::Solid => {
            if h_mm < 150.0 {
                ((150.0 / h_mm).powf(0.2)).min(1.3)
            } else {
                1.0
            }
        }
        TimberCategory::Glulam => {
            if h_mm < 600.0 {
                ((600.0 / h_mm).powf(0.1)).min(1.1)
            } else {
                1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_c24_properties() {
        let c = timber_class("C24").unwrap();
        assert_relative_eq!(c.f_mk, 24e6);
        assert_relative_eq!(c.e_mean, 11e9);
        assert_relative_eq!(c.rho_mean, 420.0);
        assert_eq!(c.category, TimberCategory::Solid);
    }

    #[test]
    fn test_glulam_spaced_name() {
        let g = timber_class("GL 28h").unwrap();
        assert_eq!(g.name, "GL28h");
        assert_eq!(g.category, TimberCategory::Glulam);
    }

    #[test]
    fn test_modification_factors() {
        assert_relative_eq!(k_mod(ServiceClass::Two, LoadDuration::MediumTerm), 0.8);
        assert_relative_eq!(k_def(ServiceClass::Two), 0.8);
    }

    #[test]
    fn test_size_factor() {
        // 45 mm wide solid timber: (150/45)^0.2 capped at 1.3
        assert_relative_eq!(k_h(TimberCategory::Solid, 0.045), 1.2725, epsilon = 1e-3);
        assert_relative_eq!(k_h(TimberCategory::Solid, 0.195), 1.0);
        assert_relative_eq!(k_h(TimberCategory::Glulam, 0.600), 1.0);
    }
}
