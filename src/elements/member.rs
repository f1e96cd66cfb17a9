//! Member - a logical structural element grouping a run of refined elements

use serde::{Deserialize, Serialize};

use crate::entities::{MemberKind, MemberProp};
use crate::error::{FrameError, FrameResult};
use crate::materials::{masonry, steel, timber};

/// Material kind of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberType {
    Steel,
    Timber,
    Masonry,
}

/// Steel member material data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteelProps {
    /// Catalogue profile name, e.g. "IPE200"
    pub profile: String,
    /// Steel grade, e.g. "S235"
    pub grade: String,
}

/// Timber member material data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimberProps {
    /// Strength class, e.g. "C24" or "GL28h"
    pub class: String,
    /// Section width [m]
    pub b: f64,
    /// Section height [m]
    pub h: f64,
    /// Configured deflection ratios (kept for reporting; the checker applies
    /// the project-level criteria)
    pub req_finished: Option<f64>,
    pub req_instant_snow: Option<f64>,
    pub req_instant_wind: Option<f64>,
    pub req_instant_live: Option<f64>,
}

/// Masonry member material data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasonryProps {
    /// Standard masonry type name
    pub murtype: String,
    /// Wall thickness [m]
    pub t: f64,
    /// Wall length [m]
    pub l: f64,
    /// Eccentricity at the foot [m]
    pub efod: f64,
    /// Out-of-plane bow at mid-height [m]
    pub e5: f64,
    /// Eccentricity at the top [m]
    pub e0: f64,
    /// Vertical line load on the wall [N/m]
    pub ned: f64,
    /// Wind pressure [N/m²]
    pub wed: f64,
    /// Bearing plate thickness [m]
    pub t_plate: f64,
    /// Bearing plate length [m]
    pub l_plate: f64,
    /// Bearing plate width [m]
    pub b_plate: f64,
    /// Stabilising wall 1 (length, thickness) [m]
    pub flange1: (f64, f64),
    /// Stabilising wall 2 (length, thickness) [m]
    pub flange2: (f64, f64),
    /// Distance from the wall end to the concentrated load [m]
    pub a1: f64,
}

/// Material-specific member data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MemberMaterial {
    Steel(SteelProps),
    Timber(TimberProps),
    Masonry(MasonryProps),
}

impl MemberMaterial {
    /// Parse the front-end member properties into typed material data
    pub fn from_prop(prop: &MemberProp) -> FrameResult<Self> {
        match prop.kind {
            MemberKind::Steel => {
                let profile = prop
                    .steel_profile
                    .clone()
                    .ok_or_else(|| FrameError::BadInput("steel member without steelProfile".into()))?;
                let grade = prop
                    .steel_strength
                    .clone()
                    .ok_or_else(|| FrameError::BadInput("steel member without steelStrength".into()))?;
                Ok(MemberMaterial::Steel(SteelProps { profile, grade }))
            }
            MemberKind::Wood => {
                let class = prop
                    .wood_type
                    .clone()
                    .ok_or_else(|| FrameError::BadInput("timber member without woodType".into()))?;
                let size = prop
                    .wood_size
                    .ok_or_else(|| FrameError::BadInput("timber member without woodSize".into()))?;
                Ok(MemberMaterial::Timber(TimberProps {
                    class,
                    b: size.width * 1e-3,
                    h: size.height * 1e-3,
                    req_finished: prop.deflection_requirement_finished,
                    req_instant_snow: prop.deflection_requirement_instant_snow,
                    req_instant_wind: prop.deflection_requirement_instant_wind,
                    req_instant_live: prop.deflection_requirement_instant_live,
                }))
            }
            MemberKind::Masonry => {
                let murtype = prop
                    .murtype
                    .clone()
                    .ok_or_else(|| FrameError::BadInput("masonry member without murtype".into()))?;
                let t = prop.t.unwrap_or(0.0);
                let l = prop.l.unwrap_or(0.0);
                if t <= 0.0 || l <= 0.0 {
                    return Err(FrameError::BadInput(format!(
                        "masonry member needs wall thickness and length (t={t}, l={l})"
                    )));
                }
                Ok(MemberMaterial::Masonry(MasonryProps {
                    murtype,
                    t,
                    l,
                    efod: prop.efod.unwrap_or(0.0),
                    e5: prop.e5.unwrap_or(0.0),
                    e0: prop.et.unwrap_or(0.0),
                    ned: prop.ned.unwrap_or(0.0) * 1e3,
                    wed: prop.vind.unwrap_or(0.0) * 1e3,
                    t_plate: prop.t_plade.unwrap_or(0.0),
                    l_plate: prop.l_plade.unwrap_or(0.0),
                    b_plate: prop.b_plade.unwrap_or(0.0),
                    flange1: (prop.l1.unwrap_or(0.0), prop.t1.unwrap_or(0.0)),
                    flange2: (prop.l2.unwrap_or(0.0), prop.t2.unwrap_or(0.0)),
                    a1: prop.afstand_kraft.unwrap_or(0.0),
                }))
            }
        }
    }

    pub fn member_type(&self) -> MemberType {
        match self {
            MemberMaterial::Steel(_) => MemberType::Steel,
            MemberMaterial::Timber(_) => MemberType::Timber,
            MemberMaterial::Masonry(_) => MemberType::Masonry,
        }
    }

    /// Section constants (E, A, I, ρ) for the frame elements of this member
    pub fn section_constants(&self) -> FrameResult<(f64, f64, f64, f64)> {
        match self {
            MemberMaterial::Steel(p) => {
                let section = steel::steel_section(&p.profile)?;
                Ok((
                    steel::ELASTIC_MODULUS,
                    section.a,
                    section.i_y,
                    steel::DENSITY,
                ))
            }
            MemberMaterial::Timber(p) => {
                let class = timber::timber_class(&p.class)?;
                let a = p.b * p.h;
                let i = p.b * p.h.powi(3) / 12.0;
                Ok((class.e_mean, a, i, class.rho_mean))
            }
            MemberMaterial::Masonry(p) => {
                let m = masonry::masonry_type(&p.murtype)?;
                let a = p.t * p.l;
                let i = p.l * p.t.powi(3) / 12.0;
                Ok((m.elasticity(), a, i, m.density))
            }
        }
    }
}

/// A logical member: a contiguous ordered run of refined elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub material: MemberMaterial,
    /// Steel deflection criterion denominator (L/x)
    pub deflection_requirement: Option<f64>,
    /// Check deflection against the member-local chord frame
    pub deflection_is_local: bool,
    pub selfweight_enabled: bool,
    /// End-to-end length [m]
    pub length: f64,
    /// Section constants shared by the member's elements
    pub e: f64,
    pub a: f64,
    pub i: f64,
    pub rho: f64,
    /// Indices into the model's element list
    pub elements: Vec<usize>,
}

impl Member {
    pub fn member_type(&self) -> MemberType {
        self.material.member_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::WoodSize;

    fn steel_prop() -> MemberProp {
        serde_json::from_str(
            r#"{"type": "Steel", "steelProfile": "IPE200", "steelStrength": "S235"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_steel_member_constants() {
        let mat = MemberMaterial::from_prop(&steel_prop()).unwrap();
        let (e, a, i, rho) = mat.section_constants().unwrap();
        assert_eq!(e, 210e9);
        assert!((a - 28.5e-4).abs() < 1e-9);
        assert!((i - 1943e-8).abs() < 1e-12);
        assert_eq!(rho, 7850.0);
    }

    #[test]
    fn test_timber_member_constants() {
        let mut prop = steel_prop();
        prop.kind = MemberKind::Wood;
        prop.wood_type = Some("C24".into());
        prop.wood_size = Some(WoodSize {
            width: 45.0,
            height: 195.0,
        });
        let mat = MemberMaterial::from_prop(&prop).unwrap();
        let (e, a, i, rho) = mat.section_constants().unwrap();
        assert_eq!(e, 11e9);
        assert!((a - 0.045 * 0.195).abs() < 1e-12);
        assert!((i - 0.045 * 0.195f64.powi(3) / 12.0).abs() < 1e-15);
        assert_eq!(rho, 420.0);
    }

    #[test]
    fn test_missing_profile_is_bad_input() {
        let mut prop = steel_prop();
        prop.steel_profile = None;
        assert!(MemberMaterial::from_prop(&prop).is_err());
    }
}
