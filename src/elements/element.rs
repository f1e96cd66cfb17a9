//! Element - one refined sub-element of a member

use serde::{Deserialize, Serialize};

/// A 2-node Euler-Bernoulli beam-column element
///
/// Each node carries 3 DOFs (u_x, u_y, θ_z); a hinged end replaces its
/// rotational DOF with an extra independent one during DOF numbering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Start node index
    pub n1: usize,
    /// End node index
    pub n2: usize,
    /// Modulus of elasticity [Pa]
    pub e: f64,
    /// Cross-sectional area [m²]
    pub a: f64,
    /// Second moment of area [m⁴]
    pub i: f64,
    /// Density [kg/m³]
    pub rho: f64,
    /// Moment release at the start node
    pub hinge_start: bool,
    /// Moment release at the end node
    pub hinge_end: bool,
}

impl Element {
    pub fn new(n1: usize, n2: usize, e: f64, a: f64, i: f64, rho: f64) -> Self {
        Self {
            n1,
            n2,
            e,
            a,
            i,
            rho,
            hinge_start: false,
            hinge_end: false,
        }
    }
}
