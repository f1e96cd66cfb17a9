//! Timber member checks per DS/EN 1995-1-1
//!
//! Service class 2 with Medium-term load duration is the fixed baseline;
//! rectangular solid timber and glulam sections.

use serde::{Deserialize, Serialize};

use crate::combinations::LimitState;
use crate::discretize::DiscretizedMember;
use crate::elements::MemberMaterial;
use crate::entities::ProjectSettings;
use crate::error::{FrameError, FrameResult};
use crate::materials::timber::{
    self, LoadDuration, ServiceClass, TimberCategory, TimberClass,
};

use super::QuantitySlices;

/// Timber rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimberRule {
    Bending616,
    Shear617,
    CompressionPerp615,
    Compression614,
    Tension612,
    BendingCompression624,
    BendingTension623,
    DeflectionInstant1,
    DeflectionInstant2,
    DeflectionFinal1,
}

impl TimberRule {
    /// Human label; the deflection rules carry the configured L/x ratio
    pub fn label(&self, d: &TimberMemberData) -> String {
        match self {
            TimberRule::Bending616 => "Bøjning - DS/EN 1995 6.1.6".to_string(),
            TimberRule::Shear617 => "Forskydning - DS/EN 1995 6.1.7".to_string(),
            TimberRule::CompressionPerp615 => {
                "Tryk vinkelret på fibrene - DS/EN 1995 6.1.5".to_string()
            }
            TimberRule::Compression614 => {
                "Tryk parallelt med fibrene - DS/EN 1995 6.1.4".to_string()
            }
            TimberRule::Tension612 => "Træk parallelt med fibrene - DS/EN 1995 6.1.2".to_string(),
            TimberRule::BendingCompression624 => {
                "Kombineret bøjning og aksialt tryk - DS/EN 1995 6.2.4".to_string()
            }
            TimberRule::BendingTension623 => {
                "Kombineret bøjning og aksialt træk - DS/EN 1995 6.2.3".to_string()
            }
            TimberRule::DeflectionInstant1 => format!("Deformation, inst L/{}", d.def_crit_1),
            TimberRule::DeflectionInstant2 => format!("Deformation, inst L/{}", d.def_crit_2),
            TimberRule::DeflectionFinal1 => format!("Deformation, fin L/{}", d.def_crit_1),
        }
    }
}

/// Precomputed per-member timber data
#[derive(Debug, Clone)]
pub struct TimberMemberData {
    pub name: String,
    pub class: &'static TimberClass,
    pub category: TimberCategory,
    /// Section width [m]
    pub b: f64,
    /// Section height [m]
    pub h: f64,
    pub length: f64,
    pub a: f64,
    pub i: f64,
    pub service_class: ServiceClass,
    pub duration: LoadDuration,
    pub k_sys: f64,
    pub k_mod: f64,
    pub k_def: f64,
    pub k_m: f64,
    pub gamma_m: f64,
    /// Bearing length for compression perpendicular to grain [m]
    pub bearing_length: f64,
    pub def_crit_1: u32,
    pub def_crit_2: u32,
}

impl TimberMemberData {
    pub fn new(member: &DiscretizedMember, project: &ProjectSettings) -> FrameResult<Self> {
        let props = match &member.member.material {
            MemberMaterial::Timber(p) => p,
            _ => {
                return Err(FrameError::BadInput(format!(
                    "member '{}' is not timber",
                    member.member.id
                )))
            }
        };
        let class = timber::timber_class(&props.class)?;
        let category = class.category;
        let service_class = ServiceClass::Two;
        let duration = LoadDuration::MediumTerm;

        Ok(Self {
            name: member.member.name.clone(),
            class,
            category,
            b: props.b,
            h: props.h,
            length: member.member.length,
            a: member.member.a,
            i: member.member.i,
            service_class,
            duration,
            k_sys: 1.0,
            k_mod: timber::k_mod(service_class, duration),
            k_def: timber::k_def(service_class),
            // Rectangular solid timber, glulam and LVL
            k_m: 0.7,
            gamma_m: timber::gamma_m(category) * project.robust_factor(),
            bearing_length: 0.1,
            def_crit_1: project.def_crit_wood1,
            def_crit_2: project.def_crit_wood2,
        })
    }
}

/// Tension parallel to the grain, 6.1.2
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionCheck {
    pub n_t_ed: f64,
    pub k_ht: f64,
    pub sigma_t0d: f64,
    pub f_t0d: f64,
    pub ur: f64,
}

pub fn tension_612(d: &TimberMemberData, q: &QuantitySlices) -> TensionCheck {
    let max_abs = q.max_abs_n();
    let at_max = q
        .n
        .iter()
        .fold(0.0f64, |a, &x| if x.abs() > a.abs() { x } else { a });
    let n_t_ed = if at_max > 0.0 { max_abs } else { 0.0 };

    let k_ht = timber::k_h(d.category, d.b);
    let sigma_t0d = n_t_ed / d.a;
    let f_t0d = k_ht * d.k_mod * d.k_sys * d.class.f_t0k / d.gamma_m;

    TensionCheck {
        n_t_ed,
        k_ht,
        sigma_t0d,
        f_t0d,
        ur: sigma_t0d / f_t0d,
    }
}

/// Compression parallel to the grain, 6.1.4
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionCheck {
    pub n_c_ed: f64,
    pub sigma_c0d: f64,
    pub f_c0d: f64,
    pub ur: f64,
}

pub fn compression_614(d: &TimberMemberData, q: &QuantitySlices) -> CompressionCheck {
    let max_abs = q.max_abs_n();
    let at_max = q
        .n
        .iter()
        .fold(0.0f64, |a, &x| if x.abs() > a.abs() { x } else { a });
    let n_c_ed = if at_max > 0.0 { 0.0 } else { max_abs };

    let sigma_c0d = n_c_ed / d.a;
    let f_c0d = d.k_mod * d.k_sys * d.class.f_c0k / d.gamma_m;

    CompressionCheck {
        n_c_ed,
        sigma_c0d,
        f_c0d,
        ur: sigma_c0d / f_c0d,
    }
}

/// Compression perpendicular to the grain at the bearings, 6.1.5
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionPerpCheck {
    pub k_c90: f64,
    pub a_ef: f64,
    pub r_ed: f64,
    pub sigma_c90d: f64,
    pub f_c90d: f64,
    pub ur: f64,
}

pub fn compression_perp_615(d: &TimberMemberData, q: &QuantitySlices) -> CompressionPerpCheck {
    let f_c90d = d.k_mod * d.k_sys * d.class.f_c90k / d.gamma_m;

    let k_c90 = match d.category {
        TimberCategory::Glulam if d.bearing_length <= 0.4 => 1.75,
        TimberCategory::Solid => 1.5,
        _ => 1.0,
    };

    let a_ef = (d.bearing_length + 0.03) * d.b;

    // End shears stand in for the bearing reactions
    let r_ed = q
        .v
        .first()
        .map(|v| v.abs())
        .unwrap_or(0.0)
        .max(q.v.last().map(|v| v.abs()).unwrap_or(0.0));
    let sigma_c90d = r_ed / a_ef;

    CompressionPerpCheck {
        k_c90,
        a_ef,
        r_ed,
        sigma_c90d,
        f_c90d,
        ur: sigma_c90d / (k_c90 * f_c90d),
    }
}

/// Bending, 6.1.6
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimberBendingCheck {
    pub m_ed: f64,
    pub k_hm: f64,
    pub sigma_myd: f64,
    pub f_myd: f64,
    pub ur: f64,
}

pub fn bending_616(d: &TimberMemberData, q: &QuantitySlices) -> TimberBendingCheck {
    let m_ed = q.max_abs_m();
    let k_hm = timber::k_h(d.category, d.h);

    let sigma_myd = m_ed * (d.h / 2.0) / d.i;
    let f_myd = d.k_mod * d.k_sys * k_hm * d.class.f_mk / d.gamma_m;

    // Single-axis bending: the k_m cross-term never governs
    let ur = (sigma_myd / f_myd).max(d.k_m * sigma_myd / f_myd);

    TimberBendingCheck {
        m_ed,
        k_hm,
        sigma_myd,
        f_myd,
        ur,
    }
}

/// Shear, 6.1.7
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimberShearCheck {
    pub v_ed: f64,
    pub k_cr: f64,
    pub a_cr: f64,
    pub tau_d: f64,
    pub f_vd: f64,
    pub ur: f64,
}

pub fn shear_617(d: &TimberMemberData, q: &QuantitySlices) -> TimberShearCheck {
    let v_ed = q.max_abs_v();
    // k_cr = 1 per the Danish NA
    let k_cr = 1.0;
    let a_cr = k_cr * d.b * d.h;
    let tau_d = 1.5 * v_ed / a_cr;
    let f_vd = d.k_mod * d.k_sys * d.class.f_vk / d.gamma_m;

    TimberShearCheck {
        v_ed,
        k_cr,
        a_cr,
        tau_d,
        f_vd,
        ur: tau_d / f_vd,
    }
}

/// Combined bending and axial tension, 6.2.3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BendingTensionCheck {
    pub ur_tension: f64,
    pub ur_bending: f64,
    pub ur: f64,
}

pub fn bending_tension_623(tension: &TensionCheck, bending: &TimberBendingCheck) -> BendingTensionCheck {
    BendingTensionCheck {
        ur_tension: tension.ur,
        ur_bending: bending.ur,
        ur: tension.ur + bending.ur,
    }
}

/// Combined bending and axial compression, 6.2.4
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BendingCompressionCheck {
    pub ur_compression: f64,
    pub ur_bending: f64,
    pub ur: f64,
}

pub fn bending_compression_624(
    compression: &CompressionCheck,
    bending: &TimberBendingCheck,
) -> BendingCompressionCheck {
    BendingCompressionCheck {
        ur_compression: compression.ur,
        ur_bending: bending.ur,
        ur: compression.ur.powi(2) + bending.ur,
    }
}

/// SLS deflection with shear-deformation inflation and creep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimberDeflectionCheck {
    /// Largest resultant nodal deflection [m]
    pub max_v: f64,
    /// (E/G)·(h/L)² shear inflation
    pub shear_factor: f64,
    pub u_inst: f64,
    pub u_fin: f64,
    pub limit_1: f64,
    pub limit_2: f64,
    pub ur_inst_1: f64,
    pub ur_inst_2: f64,
    pub ur_fin_1: f64,
}

pub fn deflection(d: &TimberMemberData, q: &QuantitySlices) -> TimberDeflectionCheck {
    let max_v = q.max_deflection_global();

    let shear_factor = (d.class.e_mean / d.class.g_mean) * (d.h / d.length).powi(2);
    let u_inst = max_v * (1.0 + shear_factor);
    let u_fin = u_inst * (1.0 + d.k_def);

    let limit_1 = d.length / d.def_crit_1 as f64;
    let limit_2 = d.length / d.def_crit_2 as f64;

    TimberDeflectionCheck {
        max_v,
        shear_factor,
        u_inst,
        u_fin,
        limit_1,
        limit_2,
        ur_inst_1: u_inst / limit_1,
        ur_inst_2: u_inst / limit_2,
        ur_fin_1: u_fin / limit_1,
    }
}

/// Evaluated timber rules for one combination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimberCheckSet {
    pub bending: Option<TimberBendingCheck>,
    pub shear: Option<TimberShearCheck>,
    pub compression_perp: Option<CompressionPerpCheck>,
    pub compression: Option<CompressionCheck>,
    pub tension: Option<TensionCheck>,
    pub bending_compression: Option<BendingCompressionCheck>,
    pub bending_tension: Option<BendingTensionCheck>,
    pub deflection: Option<TimberDeflectionCheck>,
    /// Labels resolved against the member's configured criteria
    #[serde(skip)]
    labels: Vec<(String, f64)>,
}

impl TimberCheckSet {
    pub fn ur_values(&self) -> Vec<(String, f64)> {
        self.labels.clone()
    }
}

/// Evaluate the timber rules applicable to a limit state
pub fn evaluate(
    d: &TimberMemberData,
    ls: LimitState,
    q: &QuantitySlices,
) -> FrameResult<TimberCheckSet> {
    let mut set = TimberCheckSet::default();
    match ls {
        LimitState::Uls | LimitState::Als => {
            let bending = bending_616(d, q);
            let shear = shear_617(d, q);
            let comp_perp = compression_perp_615(d, q);
            let compression = compression_614(d, q);
            let tension = tension_612(d, q);
            let bc = bending_compression_624(&compression, &bending);
            let bt = bending_tension_623(&tension, &bending);

            set.labels = vec![
                (TimberRule::Bending616.label(d), bending.ur),
                (TimberRule::Shear617.label(d), shear.ur),
                (TimberRule::CompressionPerp615.label(d), comp_perp.ur),
                (TimberRule::Compression614.label(d), compression.ur),
                (TimberRule::Tension612.label(d), tension.ur),
                (TimberRule::BendingCompression624.label(d), bc.ur),
                (TimberRule::BendingTension623.label(d), bt.ur),
            ];

            set.bending = Some(bending);
            set.shear = Some(shear);
            set.compression_perp = Some(comp_perp);
            set.compression = Some(compression);
            set.tension = Some(tension);
            set.bending_compression = Some(bc);
            set.bending_tension = Some(bt);
        }
        LimitState::Sls => {
            let def = deflection(d, q);
            set.labels = vec![
                (TimberRule::DeflectionInstant1.label(d), def.ur_inst_1),
                (TimberRule::DeflectionInstant2.label(d), def.ur_inst_2),
                (TimberRule::DeflectionFinal1.label(d), def.ur_fin_1),
            ];
            set.deflection = Some(def);
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c24_45x195() -> TimberMemberData {
        TimberMemberData {
            name: "bjælke".into(),
            class: timber::timber_class("C24").unwrap(),
            category: TimberCategory::Solid,
            b: 0.045,
            h: 0.195,
            length: 4.0,
            a: 0.045 * 0.195,
            i: 0.045 * 0.195f64.powi(3) / 12.0,
            service_class: ServiceClass::Two,
            duration: LoadDuration::MediumTerm,
            k_sys: 1.0,
            k_mod: 0.8,
            k_def: 0.8,
            k_m: 0.7,
            gamma_m: 1.35,
            bearing_length: 0.1,
            def_crit_1: 400,
            def_crit_2: 250,
        }
    }

    fn slices(n: Vec<f64>, v: Vec<f64>, m: Vec<f64>) -> QuantitySlices {
        QuantitySlices {
            n,
            v,
            m,
            u_x: vec![0.0],
            u_y: vec![0.0],
            u_loc_y: vec![0.0],
        }
    }

    #[test]
    fn test_bending_stress_and_strength() {
        let d = c24_45x195();
        let q = slices(vec![0.0], vec![0.0], vec![1000.0]);
        let b = bending_616(&d, &q);
        let w_el = 0.045 * 0.195f64.powi(2) / 6.0;
        assert_relative_eq!(b.sigma_myd, 1000.0 / w_el, max_relative = 1e-9);
        // h = 195 mm > 150 mm: no size bonus
        assert_relative_eq!(b.k_hm, 1.0);
        assert_relative_eq!(b.f_myd, 0.8 * 24e6 / 1.35, max_relative = 1e-9);
    }

    #[test]
    fn test_axial_sign_split() {
        let d = c24_45x195();
        // Governing axial value is compressive
        let q = slices(vec![-8e3, 3e3], vec![0.0], vec![0.0]);
        let c = compression_614(&d, &q);
        let t = tension_612(&d, &q);
        assert_relative_eq!(c.n_c_ed, 8e3);
        assert_eq!(t.n_t_ed, 0.0);

        // Governing axial value is tensile
        let q = slices(vec![-3e3, 8e3], vec![0.0], vec![0.0]);
        let c = compression_614(&d, &q);
        let t = tension_612(&d, &q);
        assert_eq!(c.n_c_ed, 0.0);
        assert_relative_eq!(t.n_t_ed, 8e3);
        // Width 45 mm < 150 mm earns the size factor on tension
        assert!(t.k_ht > 1.0);
    }

    #[test]
    fn test_shear_stress() {
        let d = c24_45x195();
        let q = slices(vec![0.0], vec![2e3], vec![0.0]);
        let s = shear_617(&d, &q);
        assert_relative_eq!(s.tau_d, 1.5 * 2e3 / (0.045 * 0.195), max_relative = 1e-9);
        assert_relative_eq!(s.f_vd, 0.8 * 4e6 / 1.35, max_relative = 1e-9);
    }

    #[test]
    fn test_combined_rules() {
        let d = c24_45x195();
        let q = slices(vec![-8e3], vec![0.0], vec![500.0]);
        let set = evaluate(&d, LimitState::Uls, &q).unwrap();
        let bc = set.bending_compression.unwrap();
        let c = set.compression.unwrap();
        let b = set.bending.unwrap();
        assert_relative_eq!(bc.ur, c.ur.powi(2) + b.ur, max_relative = 1e-12);
        assert_eq!(set.labels.len(), 7);
    }

    #[test]
    fn test_deflection_inflation_and_creep() {
        let d = c24_45x195();
        let mut q = slices(vec![0.0], vec![0.0], vec![0.0]);
        q.u_y = vec![-0.001];
        q.u_x = vec![0.0];
        let def = deflection(&d, &q);
        let factor = (11e9 / 0.69e9) * (0.195f64 / 4.0).powi(2);
        assert_relative_eq!(def.u_inst, 0.001 * (1.0 + factor), max_relative = 1e-9);
        assert_relative_eq!(def.u_fin, def.u_inst * 1.8, max_relative = 1e-9);
        assert_relative_eq!(def.limit_1, 0.01);
        assert_relative_eq!(def.limit_2, 0.016);
    }

    #[test]
    fn test_sls_labels_carry_ratios() {
        let d = c24_45x195();
        let q = slices(vec![0.0], vec![0.0], vec![0.0]);
        let set = evaluate(&d, LimitState::Sls, &q).unwrap();
        let labels: Vec<String> = set.ur_values().into_iter().map(|(l, _)| l).collect();
        assert_eq!(
            labels,
            vec![
                "Deformation, inst L/400",
                "Deformation, inst L/250",
                "Deformation, fin L/400"
            ]
        );
    }
}
