//! Standard masonry parameter table (DS/INF 167, mur-tag strength values)
//!
//! Strengths in Pa, densities in kg/m³. The Ritter constant `ke` is the
//! dimensionless stiffness ratio E/f_k used in the column interaction check.

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Parameters for one standard masonry build
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MasonryType {
    pub name: &'static str,
    /// Unit (byggesten) compressive strength [Pa]
    pub f_b: f64,
    /// Mortar compressive strength [Pa]
    pub f_m: f64,
    /// Characteristic masonry compressive strength [Pa]
    pub f_k: f64,
    /// Partial factor for compression
    pub gamma_c: f64,
    /// Course (shift) height [m]
    pub shift_height: f64,
    /// Ritter constant, E/f_k
    pub ke: f64,
    /// Characteristic modulus of elasticity [Pa], zero when not tabulated
    pub e_0k: f64,
    /// Density [kg/m³]
    pub density: f64,
}

impl MasonryType {
    /// Design compressive strength f_d = f_k / γ_c [Pa]
    pub fn f_d(&self) -> f64 {
        self.f_k / self.gamma_c
    }

    /// Modulus of elasticity [Pa]; falls back to ke·f_k when no tabulated E_0k
    pub fn elasticity(&self) -> f64 {
        if self.e_0k > 0.0 {
            self.e_0k
        } else {
            self.ke * self.f_k
        }
    }
}

macro_rules! masonry {
    ($name:literal, $fb:expr, $fm:expr, $fk:expr, $gc:expr, $shift:expr, $ke:expr, $e0k:expr, $rho:expr) => {
        MasonryType {
            name: $name,
            f_b: $fb * 1e6,
            f_m: $fm * 1e6,
            f_k: $fk * 1e6,
            gamma_c: $gc,
            shift_height: $shift,
            ke: $ke,
            e_0k: $e0k * 1e6,
            density: $rho,
        }
    };
}

#[rustfmt::skip]
static TYPES: &[MasonryType] = &[
    // name, fb, fm, fk [MPa], gamma_c, shift height [m], ke, E0k [MPa], density
    masonry!("Gammelt murværk",            15.0, 1.0, 2.4,  1.84, 0.066, 300.0, 355.0,  2000.0),
    masonry!("Standard murværk",           15.0, 0.9, 3.55, 1.7,  0.066, 300.0, 0.0,    2000.0),
    masonry!("Stenklasse 15 - 20/80/550",  15.0, 4.5, 5.75, 1.7,  0.066, 300.0, 0.0,    2000.0),
    masonry!("Stenklasse 20 - 20/80/550",  20.0, 4.5, 7.1,  1.7,  0.066, 400.0, 0.0,    2000.0),
    masonry!("Stenklasse 25 - 20/80/550",  25.0, 0.9, 8.7,  1.7,  0.066, 500.0, 0.0,    2000.0),
    masonry!("Stenklasse 30 - 20/80/550",  30.0, 0.9, 9.3,  1.7,  0.066, 600.0, 0.0,    2000.0),
    masonry!("Porebeton",                   4.5, 0.9, 3.4,  1.7,  0.2,   596.0, 2025.0,  600.0),
];

/// Look up a standard masonry build by name
pub fn masonry_type(name: &str) -> FrameResult<&'static MasonryType> {
    TYPES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| FrameError::Unsupported(format!("masonry type '{name}' has no defined parameters")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gammelt_murvaerk() {
        let m = masonry_type("Gammelt murværk").unwrap();
        assert_relative_eq!(m.f_k, 2.4e6);
        assert_relative_eq!(m.gamma_c, 1.84);
        assert_relative_eq!(m.f_d(), 2.4e6 / 1.84);
        assert_relative_eq!(m.elasticity(), 355e6);
    }

    #[test]
    fn test_fallback_elasticity() {
        let m = masonry_type("Standard murværk").unwrap();
        assert_relative_eq!(m.elasticity(), 300.0 * 3.55e6);
    }

    #[test]
    fn test_unknown_type_is_error() {
        assert!(masonry_type("Mystery brick").is_err());
    }
}
