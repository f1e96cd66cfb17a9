//! Wire-format entity set and project settings
//!
//! The declarative input consumed by [`crate::analysis::Analysis`]. Field
//! names follow the front-end JSON keys. Load magnitudes arrive in kN, kN/m
//! and kNm and are converted to SI base units at the model boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Assembly condition of a declared node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assembly {
    Rigid,
    Hinge,
}

impl Default for Assembly {
    fn default() -> Self {
        Self::Rigid
    }
}

/// A declared node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntity {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub assembly: Assembly,
}

/// A coordinate pair as sent by the front end
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Material kind of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    Steel,
    Wood,
    Masonry,
}

/// Cross-section size for timber members [mm]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WoodSize {
    pub width: f64,
    pub height: f64,
}

/// Member properties as declared by the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProp {
    #[serde(rename = "type")]
    pub kind: MemberKind,
    #[serde(default)]
    pub name: Option<String>,

    // Steel
    #[serde(default)]
    pub steel_profile: Option<String>,
    #[serde(default)]
    pub steel_strength: Option<String>,

    // Timber
    #[serde(default)]
    pub wood_type: Option<String>,
    #[serde(default)]
    pub wood_size: Option<WoodSize>,

    // Masonry
    #[serde(default)]
    pub murtype: Option<String>,
    /// Wall thickness [m]
    #[serde(default)]
    pub t: Option<f64>,
    /// Wall length [m]
    #[serde(default)]
    pub l: Option<f64>,
    /// Eccentricity at the foot [m]
    #[serde(default)]
    pub efod: Option<f64>,
    /// Out-of-plane bow at mid-height [m]
    #[serde(default)]
    pub e5: Option<f64>,
    /// Eccentricity at the top [m]
    #[serde(default)]
    pub et: Option<f64>,
    /// Vertical line load on the wall [kN/m]
    #[serde(default)]
    pub ned: Option<f64>,
    /// Wind pressure on the wall [kN/m²]
    #[serde(default)]
    pub vind: Option<f64>,
    /// Bearing plate thickness [m]
    #[serde(default)]
    pub t_plade: Option<f64>,
    /// Bearing plate length [m]
    #[serde(default)]
    pub l_plade: Option<f64>,
    /// Bearing plate width [m]
    #[serde(default)]
    pub b_plade: Option<f64>,
    /// Stabilising wall 1: length [m]
    #[serde(default)]
    pub l1: Option<f64>,
    /// Stabilising wall 1: thickness [m]
    #[serde(default)]
    pub t1: Option<f64>,
    /// Stabilising wall 2: length [m]
    #[serde(default)]
    pub l2: Option<f64>,
    /// Stabilising wall 2: thickness [m]
    #[serde(default)]
    pub t2: Option<f64>,
    /// Distance from the wall end to the concentrated load [m]
    #[serde(default)]
    pub afstand_kraft: Option<f64>,

    // Deflection policy
    #[serde(default)]
    pub deflection_requirement: Option<f64>,
    #[serde(default)]
    pub deflection_is_local: Option<bool>,
    #[serde(default)]
    pub deflection_requirement_finished: Option<f64>,
    #[serde(default)]
    pub deflection_requirement_instant_snow: Option<f64>,
    #[serde(default)]
    pub deflection_requirement_instant_wind: Option<f64>,
    #[serde(default)]
    pub deflection_requirement_instant_live: Option<f64>,

    #[serde(default)]
    pub self_weight_enabled: Option<bool>,
}

/// A declared member referencing two node ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEntity {
    pub node1: String,
    pub node2: String,
    /// Entity ids whose coordinates must become nodes on this member
    #[serde(default)]
    pub dependants: Vec<String>,
    pub memberprop: MemberProp,
}

/// Support type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportKind {
    Fixed,
    Pinned,
    Roller,
}

/// A declared support
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportEntity {
    pub resolved: Point,
    #[serde(rename = "type")]
    pub kind: SupportKind,
    /// Roller orientation in degrees (0/90/180/270)
    #[serde(default)]
    pub angle: Option<f64>,
}

/// Load category as declared on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireLoadKind {
    Standard,
    Dead,
    Live,
    Snow,
    Wind,
    Temperature,
}

impl Default for WireLoadKind {
    fn default() -> Self {
        Self::Standard
    }
}

/// A declared point load; magnitude in kN
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLoadEntity {
    pub resolved: Point,
    pub magnitude: f64,
    /// Direction in degrees; 90 (straight down) when absent
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: WireLoadKind,
}

/// Endpoints of a distributed load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanPoints {
    pub point1: Point,
    pub point2: Point,
}

/// A declared line load; magnitudes in kN/m
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedLoadEntity {
    pub resolved: SpanPoints,
    pub magnitude1: f64,
    pub magnitude2: f64,
    #[serde(default)]
    pub angle: Option<f64>,
    /// Reverse the wind pressure direction
    #[serde(default)]
    pub wind_flip: Option<bool>,
    #[serde(rename = "type", default)]
    pub kind: WireLoadKind,
}

/// A declared moment load; magnitude in kNm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentLoadEntity {
    pub resolved: Point,
    pub magnitude: f64,
    #[serde(rename = "type", default)]
    pub kind: WireLoadKind,
}

/// The complete declarative input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySet {
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeEntity>,
    #[serde(default)]
    pub members: BTreeMap<String, MemberEntity>,
    #[serde(default)]
    pub supports: BTreeMap<String, SupportEntity>,
    #[serde(default)]
    pub point_loads: BTreeMap<String, PointLoadEntity>,
    #[serde(default)]
    pub distributed_loads: BTreeMap<String, DistributedLoadEntity>,
    #[serde(default)]
    pub moment_loads: BTreeMap<String, MomentLoadEntity>,
}

/// Consequence class per EN 1990 DK NA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsequenceClass {
    CC1,
    CC2,
    CC3,
}

impl ConsequenceClass {
    /// The K_Fi factor applied to variable actions
    pub fn k_fi(&self) -> f64 {
        match self {
            ConsequenceClass::CC1 => 0.9,
            ConsequenceClass::CC2 => 1.0,
            ConsequenceClass::CC3 => 1.1,
        }
    }
}

/// Project-level analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub project_number: String,
    #[serde(rename = "CC")]
    pub consequence_class: ConsequenceClass,
    pub selfweight_on_off: bool,
    /// Number of storeys above the loaded structure (α_n reduction)
    pub n_levels_above: u32,
    pub robust_factor_on_off: bool,
    /// Steel deflection criterion denominator (L/x)
    pub def_crit_steel: u32,
    /// Primary timber deflection criterion denominator (DK NA: 400)
    pub def_crit_wood1: u32,
    /// Secondary timber deflection criterion denominator (DK NA: 250)
    pub def_crit_wood2: u32,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            project_number: String::new(),
            consequence_class: ConsequenceClass::CC2,
            selfweight_on_off: true,
            n_levels_above: 1,
            robust_factor_on_off: false,
            def_crit_steel: 400,
            def_crit_wood1: 400,
            def_crit_wood2: 250,
        }
    }
}

impl ProjectSettings {
    /// The robustness multiplier on material partial factors
    pub fn robust_factor(&self) -> f64 {
        if self.robust_factor_on_off {
            1.2
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_set_from_json() {
        let json = r#"{
            "nodes": {
                "n1": {"x": 0.0, "y": 0.0},
                "n2": {"x": 4.0, "y": 0.0, "assembly": "Hinge"}
            },
            "members": {
                "m1": {
                    "node1": "n1",
                    "node2": "n2",
                    "dependants": ["pl1"],
                    "memberprop": {
                        "type": "Steel",
                        "steelProfile": "IPE200",
                        "steelStrength": "S235",
                        "deflectionRequirement": 400,
                        "selfWeightEnabled": false
                    }
                }
            },
            "supports": {
                "s1": {"resolved": {"x": 0.0, "y": 0.0}, "type": "Pinned"}
            },
            "pointLoads": {
                "pl1": {"resolved": {"x": 2.0, "y": 0.0}, "magnitude": 10.0, "type": "Live"}
            }
        }"#;

        let set: EntitySet = serde_json::from_str(json).unwrap();
        assert_eq!(set.nodes.len(), 2);
        assert_eq!(set.nodes["n2"].assembly, Assembly::Hinge);
        let m = &set.members["m1"];
        assert_eq!(m.memberprop.kind, MemberKind::Steel);
        assert_eq!(m.memberprop.steel_profile.as_deref(), Some("IPE200"));
        assert_eq!(set.point_loads["pl1"].kind, WireLoadKind::Live);
    }

    #[test]
    fn test_kfi_values() {
        assert_eq!(ConsequenceClass::CC1.k_fi(), 0.9);
        assert_eq!(ConsequenceClass::CC2.k_fi(), 1.0);
        assert_eq!(ConsequenceClass::CC3.k_fi(), 1.1);
    }

    #[test]
    fn test_default_settings() {
        let p = ProjectSettings::default();
        assert_eq!(p.def_crit_wood1, 400);
        assert_eq!(p.def_crit_wood2, 250);
        assert_eq!(p.robust_factor(), 1.0);
    }
}
