//! Result types and the governing-combination aggregation
//!
//! Assembles per-member UR matrices (rules × combinations), selects the
//! governing columns, reduces the retained combination set to the union that
//! matters across all members, and snapshots the discretized model for
//! downstream consumers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::combinations::{CombinedQuantities, LimitState};
use crate::discretize::{Discretization, DiscretizedMember};
use crate::loads::LoadCategory;
use crate::model::FrameModel;

/// Snapshot of the discretized model for plotting and reporting
#[derive(Debug, Clone, Serialize)]
pub struct FemModel {
    /// Member snapshots keyed by entity id
    pub members: BTreeMap<String, DiscretizedMember>,
    /// Global sample coordinates
    pub x_discr: Vec<[f64; 2]>,
    /// Sample topology pairs
    pub t_discr: Vec<[usize; 2]>,
    /// Support DOF coordinates, in fixed-DOF order
    pub r0_coor: Vec<[f64; 2]>,
    /// Support DOF direction tags (x/y/r)
    pub r0_types: Vec<&'static str>,
}

impl FemModel {
    pub fn snapshot(model: &FrameModel, discretization: &Discretization) -> Self {
        Self {
            members: discretization
                .members
                .iter()
                .map(|m| (m.member.id.clone(), m.clone()))
                .collect(),
            x_discr: discretization.x_discr.iter().map(|p| [p.x, p.y]).collect(),
            t_discr: discretization.t_discr.clone(),
            r0_coor: model
                .reaction_coordinates()
                .iter()
                .map(|p| [p.x, p.y])
                .collect(),
            r0_types: model.reaction_types(),
        }
    }
}

/// Combination-level arrays of one limit state, keyed by combination name
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForcesView {
    /// Axial force
    pub f1: BTreeMap<String, Vec<f64>>,
    /// Shear force
    pub f2: BTreeMap<String, Vec<f64>>,
    /// Bending moment (design sign convention)
    pub m: BTreeMap<String, Vec<f64>>,
    /// Support reactions
    pub r0: BTreeMap<String, Vec<f64>>,
    /// Global deflections as (u_x, u_y) pairs
    pub ve: BTreeMap<String, Vec<[f64; 2]>>,
    /// Member-local deflections
    pub ve_loc: BTreeMap<String, Vec<f64>>,
}

impl ForcesView {
    pub fn from_combined(cq: &CombinedQuantities) -> Self {
        let mut view = ForcesView::default();
        for (i, name) in cq.names.iter().enumerate() {
            let row = |m: &crate::math::Mat| -> Vec<f64> { m.row(i).iter().copied().collect() };
            view.f1.insert(name.clone(), row(&cq.n));
            view.f2.insert(name.clone(), row(&cq.v));
            view.m.insert(name.clone(), row(&cq.m));
            view.r0.insert(name.clone(), row(&cq.r0));
            view.ve.insert(
                name.clone(),
                cq.u_x
                    .row(i)
                    .iter()
                    .zip(cq.u_y.row(i).iter())
                    .map(|(&x, &y)| [x, y])
                    .collect(),
            );
            view.ve_loc.insert(name.clone(), row(&cq.u_loc_y));
        }
        view
    }
}

/// Full UR matrix of one member under one limit state
#[derive(Debug, Clone, Default)]
pub struct MemberLsUr {
    pub rule_labels: Vec<String>,
    /// (rules × combinations)
    pub matrix: Vec<Vec<f64>>,
    /// Critical steel temperature per combination (steel members under ALS)
    pub fire_temperatures: Vec<Option<f64>>,
}

impl MemberLsUr {
    pub fn n_rules(&self) -> usize {
        self.rule_labels.len()
    }
}

/// Per-member verification output for one limit state
#[derive(Debug, Clone, Default, Serialize)]
pub struct LimitStateVerification {
    pub ur_names: Vec<String>,
    /// Retained combination names (reduced set)
    pub load_comb_names: Vec<String>,
    /// Reduced UR matrix (rules × retained combinations)
    pub ur_loadcomb_mat: Vec<Vec<f64>>,
    /// Governing combination name per rule
    pub ur_critical_load_comb: BTreeMap<String, String>,
    /// Coefficient row per retained combination
    pub loadcomb_mat_dict: BTreeMap<String, Vec<f64>>,
}

/// Per-member verification output
#[derive(Debug, Clone, Serialize)]
pub struct MemberVerification {
    pub member_id: String,
    pub member_name: String,
    pub uls: LimitStateVerification,
    pub sls: LimitStateVerification,
    pub als: LimitStateVerification,
    /// Critical steel temperature for the governing fire combination [°C]
    pub critical_steel_temperature: Option<f64>,
    /// Single-load ids behind the coefficient rows
    pub load_ids: Vec<String>,
}

/// The complete result set
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResults {
    #[serde(rename = "FEMModel")]
    pub fem_model: FemModel,
    /// Limit-state label → combination-level arrays
    pub forces: BTreeMap<&'static str, ForcesView>,
    #[serde(rename = "UR")]
    pub ur: Vec<MemberVerification>,
}

fn argmax(row: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in row.iter().enumerate() {
        if best.map(|(_, bv)| v > bv).unwrap_or(true) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Governing column per rule: up to one column per row
fn top_indices_strength(member: &MemberLsUr) -> Vec<usize> {
    let mut out = Vec::new();
    for row in &member.matrix {
        if let Some(i) = argmax(row) {
            if !out.contains(&i) {
                out.push(i);
            }
        }
    }
    out
}

/// Governing column per rule and per load category (SLS)
fn top_indices_sls(
    member: &MemberLsUr,
    comb_names: &[String],
    categories: &[LoadCategory],
) -> Vec<usize> {
    let mut out = Vec::new();
    for row in &member.matrix {
        for cat in categories {
            let candidates: Vec<usize> = comb_names
                .iter()
                .enumerate()
                .filter(|(_, n)| n.contains(cat.label()))
                .map(|(i, _)| i)
                .collect();
            let best = candidates
                .iter()
                .copied()
                .max_by(|&a, &b| row[a].partial_cmp(&row[b]).expect("non-finite UR"));
            if let Some(i) = best {
                if !out.contains(&i) {
                    out.push(i);
                }
            }
        }
    }
    out
}

/// Reduce one limit state across all members
///
/// The union of governing columns over every member is the retained set;
/// each member's matrix restricts to those columns, and the per-rule argmax
/// over the reduced matrix names the critical combination.
pub fn reduce_limit_state(
    limit_state: LimitState,
    members: &[MemberLsUr],
    combined: &CombinedQuantities,
    categories: &[LoadCategory],
) -> Vec<LimitStateVerification> {
    let mut retained: Vec<usize> = Vec::new();
    for m in members {
        let tops = match limit_state {
            LimitState::Sls => top_indices_sls(m, &combined.names, categories),
            _ => top_indices_strength(m),
        };
        for i in tops {
            if !retained.contains(&i) {
                retained.push(i);
            }
        }
    }
    retained.sort_unstable();

    members
        .iter()
        .map(|m| {
            let load_comb_names: Vec<String> = retained
                .iter()
                .map(|&i| combined.names[i].clone())
                .collect();
            let ur_loadcomb_mat: Vec<Vec<f64>> = m
                .matrix
                .iter()
                .map(|row| retained.iter().map(|&i| row[i]).collect())
                .collect();

            let mut ur_critical_load_comb = BTreeMap::new();
            for (rule, row) in m.rule_labels.iter().zip(ur_loadcomb_mat.iter()) {
                if let Some(i) = argmax(row) {
                    ur_critical_load_comb.insert(rule.clone(), load_comb_names[i].clone());
                }
            }

            let loadcomb_mat_dict: BTreeMap<String, Vec<f64>> = retained
                .iter()
                .map(|&i| {
                    (
                        combined.names[i].clone(),
                        combined
                            .coefficients
                            .row(i)
                            .iter()
                            .copied()
                            .collect(),
                    )
                })
                .collect();

            LimitStateVerification {
                ur_names: m.rule_labels.clone(),
                load_comb_names,
                ur_loadcomb_mat,
                ur_critical_load_comb,
                loadcomb_mat_dict,
            }
        })
        .collect()
}

/// Worst (lowest) critical fire temperature across the ALS combinations
pub fn governing_fire_temperature(als: &MemberLsUr) -> Option<f64> {
    als.fire_temperatures
        .iter()
        .flatten()
        .copied()
        .min_by(|a, b| a.partial_cmp(b).expect("non-finite temperature"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(matrix: Vec<Vec<f64>>) -> MemberLsUr {
        MemberLsUr {
            rule_labels: (0..matrix.len()).map(|i| format!("rule {i}")).collect(),
            fire_temperatures: vec![None; matrix.first().map(|r| r.len()).unwrap_or(0)],
            matrix,
        }
    }

    fn combined(names: Vec<&str>, n_loads: usize) -> CombinedQuantities {
        let n = names.len();
        CombinedQuantities {
            limit_state: LimitState::Uls,
            names: names.into_iter().map(String::from).collect(),
            coefficients: crate::math::Mat::zeros(n, n_loads),
            n: crate::math::Mat::zeros(n, 1),
            v: crate::math::Mat::zeros(n, 1),
            m: crate::math::Mat::zeros(n, 1),
            u_x: crate::math::Mat::zeros(n, 1),
            u_y: crate::math::Mat::zeros(n, 1),
            u_loc_y: crate::math::Mat::zeros(n, 1),
            r0: crate::math::Mat::zeros(n, 1),
        }
    }

    #[test]
    fn test_reduction_keeps_union_of_governing_columns() {
        // Member 1 governs in column 2, member 2 in column 0
        let m1 = member(vec![vec![0.1, 0.2, 0.9]]);
        let m2 = member(vec![vec![0.8, 0.1, 0.2]]);
        let cq = combined(vec!["Komb. 1. A", "Komb. 2. B", "Komb. 3. C"], 2);

        let reduced = reduce_limit_state(LimitState::Uls, &[m1, m2], &cq, &[]);
        assert_eq!(reduced[0].load_comb_names, vec!["Komb. 1. A", "Komb. 3. C"]);
        assert_eq!(reduced[0].ur_loadcomb_mat[0], vec![0.1, 0.9]);
        assert_eq!(reduced[1].ur_loadcomb_mat[0], vec![0.8, 0.2]);
        assert_eq!(
            reduced[0].ur_critical_load_comb["rule 0"],
            "Komb. 3. C".to_string()
        );
        assert_eq!(
            reduced[1].ur_critical_load_comb["rule 0"],
            "Komb. 1. A".to_string()
        );
    }

    #[test]
    fn test_sls_reduction_keeps_one_column_per_category() {
        let m = member(vec![vec![0.5, 0.7, 0.3]]);
        let cq = combined(
            vec![
                "Komb. 1. Karakteristisk, Egenlast alene",
                "Komb. 1. Karakteristisk, Nyttelast alene",
                "Komb. 2. Karakteristisk, Nyttelast alene",
            ],
            2,
        );
        let categories = [LoadCategory::Egenlast, LoadCategory::Nyttelast];
        let reduced = reduce_limit_state(LimitState::Sls, &[m], &cq, &categories);
        // One governing column per category: Egenlast col 0, Nyttelast col 1
        assert_eq!(reduced[0].load_comb_names.len(), 2);
        assert_eq!(reduced[0].ur_loadcomb_mat[0], vec![0.5, 0.7]);
    }

    #[test]
    fn test_fire_temperature_minimum_governs() {
        let mut m = member(vec![vec![0.5, 0.7]]);
        m.fire_temperatures = vec![Some(620.0), Some(540.0)];
        assert_eq!(governing_fire_temperature(&m), Some(540.0));
    }
}
