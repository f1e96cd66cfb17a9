//! Eurocode load combinations (EN 1990, DK NA)
//!
//! Builds the per-limit-state combination coefficient matrices C (one row
//! per named combination, one column per single load) and materializes
//! combination-level quantities by the matrix product C · Q on the
//! discretized arrays.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::discretize::Discretization;
use crate::entities::ProjectSettings;
use crate::loads::{LoadCategory, SingleLoad};
use crate::math::Mat;

/// Limit state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitState {
    Uls,
    Sls,
    Als,
}

impl LimitState {
    pub fn label(&self) -> &'static str {
        match self {
            LimitState::Uls => "ULS",
            LimitState::Sls => "SLS",
            LimitState::Als => "ALS",
        }
    }
}

// Partial factors, DK NA of EN 1990 table A1.2(B+C)
const GAMMA_GJ_SUP_610A: f64 = 1.2;
const GAMMA_GJ_INF_610A: f64 = 1.0;
const GAMMA_GJ_SUP_610B: f64 = 1.0;
const GAMMA_GJ_INF_610B: f64 = 0.9;
const GAMMA_Q1: f64 = 1.5;

/// ψ₀ per load category
fn psi_0(cat: LoadCategory) -> f64 {
    match cat {
        LoadCategory::Nyttelast => 0.5,
        LoadCategory::Snelast => 0.3,
        LoadCategory::Vindlast => 0.3,
        LoadCategory::Temperaturlast => 0.6,
        // Standard loads combine at full value
        LoadCategory::Standard => 1.0,
        LoadCategory::Egenlast => 1.0,
    }
}

/// ψ₁ per load category
fn psi_1(cat: LoadCategory) -> f64 {
    match cat {
        LoadCategory::Nyttelast => 0.3,
        LoadCategory::Snelast => 0.2,
        LoadCategory::Vindlast => 0.2,
        LoadCategory::Temperaturlast => 0.5,
        LoadCategory::Standard => 1.0,
        LoadCategory::Egenlast => 1.0,
    }
}

/// ψ₂ per load category
fn psi_2(cat: LoadCategory) -> f64 {
    match cat {
        LoadCategory::Nyttelast => 0.2,
        LoadCategory::Snelast => 0.0,
        LoadCategory::Vindlast => 0.0,
        LoadCategory::Temperaturlast => 0.0,
        LoadCategory::Standard => 1.0,
        LoadCategory::Egenlast => 1.0,
    }
}

/// Storey reduction α_n for dominant live load over n storeys
fn alpha_n(n_levels: u32) -> f64 {
    let n = n_levels.max(1) as f64;
    (1.0 + (n - 1.0) * psi_0(LoadCategory::Nyttelast)) / n
}

/// The named combination rows of one limit state
#[derive(Debug, Clone)]
pub struct CombinationSet {
    pub limit_state: LimitState,
    pub names: Vec<String>,
    /// Coefficient matrix C, (#combinations × #single loads)
    pub matrix: Mat,
}

impl CombinationSet {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The coefficient row of a combination
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.matrix.row(index).iter().copied().collect()
    }
}

/// Distinct declared load categories, in sorted order
pub fn distinct_categories(loads: &[SingleLoad]) -> Vec<LoadCategory> {
    loads
        .iter()
        .map(|l| l.category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn indices_of(loads: &[SingleLoad], cat: LoadCategory) -> Vec<usize> {
    loads
        .iter()
        .enumerate()
        .filter(|(_, l)| l.category == cat)
        .map(|(i, _)| i)
        .collect()
}

/// Nonempty subsets of the given column indices, in stable binary order
fn nonempty_subsets(indices: &[usize]) -> Vec<Vec<usize>> {
    let n = indices.len();
    let mut out = Vec::with_capacity((1usize << n).saturating_sub(1));
    for mask in 1u64..(1u64 << n) {
        let subset: Vec<usize> = indices
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, &i)| i)
            .collect();
        out.push(subset);
    }
    out
}

/// Build the ULS combination rows (6.10a/b)
pub fn build_uls(loads: &[SingleLoad], settings: &ProjectSettings) -> CombinationSet {
    let k_fi = settings.consequence_class.k_fi();
    let categories = distinct_categories(loads);
    let dead = indices_of(loads, LoadCategory::Egenlast);
    let non_dead: Vec<usize> = (0..loads.len()).filter(|i| !dead.contains(i)).collect();

    let mut names = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut counter = 0usize;

    let mut push = |rows: &mut Vec<Vec<f64>>, names: &mut Vec<String>, row: Vec<f64>, suffix: String| {
        counter += 1;
        names.push(format!("Komb. {counter}. {suffix}"));
        rows.push(row);
    };

    for &dom in &categories {
        if dom == LoadCategory::Egenlast {
            // Gravity-only rows, 6.10a
            let mut sup = vec![0.0; loads.len()];
            let mut inf = vec![0.0; loads.len()];
            for &i in &dead {
                sup[i] = GAMMA_GJ_SUP_610A * k_fi;
                inf[i] = GAMMA_GJ_INF_610A;
            }
            push(
                &mut rows,
                &mut names,
                sup,
                "Tyngde, generelt - Ugunstig - (6.10a)".to_string(),
            );
            push(
                &mut rows,
                &mut names,
                inf,
                "Tyngde, generelt - Gunstig - (6.10a)".to_string(),
            );
            continue;
        }

        // Variable-dominant rows, 6.10b: every nonempty subset of non-dead
        // loads, folded with the upper and lower gravity branch
        let dom_factor = if dom == LoadCategory::Nyttelast {
            GAMMA_Q1 * alpha_n(settings.n_levels_above) * k_fi
        } else {
            GAMMA_Q1 * k_fi
        };

        for (gamma_g, branch) in [
            (GAMMA_GJ_SUP_610B * k_fi, "Ugunstig"),
            (GAMMA_GJ_INF_610B, "Gunstig"),
        ] {
            for subset in nonempty_subsets(&non_dead) {
                let mut row = vec![0.0; loads.len()];
                for &i in &dead {
                    row[i] = gamma_g;
                }
                for &i in &subset {
                    let cat = loads[i].category;
                    row[i] = if cat == dom {
                        dom_factor
                    } else if cat == LoadCategory::Snelast && dom == LoadCategory::Vindlast {
                        // Snow under dominant wind: ψ₀ = 0
                        0.0
                    } else {
                        GAMMA_Q1 * psi_0(cat) * k_fi
                    };
                }
                push(
                    &mut rows,
                    &mut names,
                    row,
                    format!(
                        "{} dominerende - Tyngde, generelt - {} - (6.10b)",
                        dom.label(),
                        branch
                    ),
                );
            }
        }
    }

    CombinationSet {
        limit_state: LimitState::Uls,
        matrix: matrix_from_rows(&rows, loads.len()),
        names,
    }
}

/// Build the ALS (fire) combination rows, 6.11: one row per primary category
pub fn build_als(loads: &[SingleLoad]) -> CombinationSet {
    let categories = distinct_categories(loads);
    let mut names = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for &prim in &categories {
        let mut row = vec![0.0; loads.len()];
        for (i, load) in loads.iter().enumerate() {
            let cat = load.category;
            row[i] = if cat == LoadCategory::Egenlast {
                1.0
            } else if cat == prim {
                psi_1(prim)
            } else {
                psi_2(cat)
            };
        }
        names.push(format!("Komb. 1. {} primær - Brand - (6.11a/b)", prim.label()));
        rows.push(row);
    }

    CombinationSet {
        limit_state: LimitState::Als,
        matrix: matrix_from_rows(&rows, loads.len()),
        names,
    }
}

/// Build the SLS characteristic "category alone" rows
pub fn build_sls(loads: &[SingleLoad]) -> CombinationSet {
    let categories = distinct_categories(loads);
    let dead = indices_of(loads, LoadCategory::Egenlast);
    let mut names = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for &cat in &categories {
        if cat == LoadCategory::Egenlast {
            let mut row = vec![0.0; loads.len()];
            for &i in &dead {
                row[i] = 1.0;
            }
            names.push(format!("Komb. 1. Karakteristisk, {} alene", cat.label()));
            rows.push(row);
            continue;
        }

        for (k, subset) in nonempty_subsets(&indices_of(loads, cat)).iter().enumerate() {
            let mut row = vec![0.0; loads.len()];
            for &i in &dead {
                row[i] = 1.0;
            }
            for &i in subset {
                row[i] = 1.0;
            }
            names.push(format!("Komb. {}. Karakteristisk, {} alene", k + 1, cat.label()));
            rows.push(row);
        }
    }

    CombinationSet {
        limit_state: LimitState::Sls,
        matrix: matrix_from_rows(&rows, loads.len()),
        names,
    }
}

fn matrix_from_rows(rows: &[Vec<f64>], n_cols: usize) -> Mat {
    let mut m = Mat::zeros(rows.len(), n_cols);
    for (i, row) in rows.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            m[(i, j)] = *v;
        }
    }
    m
}

/// All three limit-state combination sets
#[derive(Debug, Clone)]
pub struct LimitStateCombinations {
    pub uls: CombinationSet,
    pub sls: CombinationSet,
    pub als: CombinationSet,
}

impl LimitStateCombinations {
    pub fn build(loads: &[SingleLoad], settings: &ProjectSettings) -> Self {
        let uls = build_uls(loads, settings);
        let sls = build_sls(loads);
        let als = build_als(loads);
        log::info!(
            "combinations built: {} ULS, {} SLS, {} ALS rows",
            uls.len(),
            sls.len(),
            als.len()
        );
        Self { uls, sls, als }
    }

    pub fn get(&self, ls: LimitState) -> &CombinationSet {
        match ls {
            LimitState::Uls => &self.uls,
            LimitState::Sls => &self.sls,
            LimitState::Als => &self.als,
        }
    }
}

/// Combination-level quantities for one limit state, C · Q per quantity
#[derive(Debug, Clone)]
pub struct CombinedQuantities {
    pub limit_state: LimitState,
    pub names: Vec<String>,
    /// The coefficient matrix C behind these rows
    pub coefficients: Mat,
    pub n: Mat,
    pub v: Mat,
    pub m: Mat,
    pub u_x: Mat,
    pub u_y: Mat,
    pub u_loc_y: Mat,
    pub r0: Mat,
}

impl CombinedQuantities {
    /// Materialize every quantity for one limit state
    pub fn materialize(set: &CombinationSet, d: &Discretization) -> Self {
        let c = &set.matrix;
        Self {
            limit_state: set.limit_state,
            names: set.names.clone(),
            coefficients: c.clone(),
            n: c * &d.n,
            v: c * &d.v,
            m: c * &d.m,
            u_x: c * &d.u_x,
            u_y: c * &d.u_y,
            u_loc_y: c * &d.u_loc_y,
            r0: c * &d.r0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadForm;
    use crate::math::Vec2;
    use approx::assert_relative_eq;

    fn load(id: &str, category: LoadCategory) -> SingleLoad {
        SingleLoad {
            id: id.to_string(),
            category,
            form: LoadForm::Point {
                position: Vec2::zeros(),
                force: Vec2::new(0.0, -1.0),
            },
        }
    }

    fn settings() -> ProjectSettings {
        ProjectSettings::default()
    }

    #[test]
    fn test_gravity_only_rows() {
        let loads = vec![load("sw", LoadCategory::Egenlast)];
        let uls = build_uls(&loads, &settings());
        assert_eq!(uls.len(), 2);
        assert_relative_eq!(uls.matrix[(0, 0)], 1.2);
        assert_relative_eq!(uls.matrix[(1, 0)], 1.0);
        assert!(uls.names[0].contains("6.10a"));
        assert!(uls.names[0].contains("Ugunstig"));
    }

    #[test]
    fn test_live_dominant_row_factors() {
        let loads = vec![
            load("pl", LoadCategory::Nyttelast),
            load("sw", LoadCategory::Egenlast),
        ];
        let uls = build_uls(&loads, &settings());
        // 6.10a sup/inf + 1 subset x 2 gravity branches
        assert_eq!(uls.len(), 4);

        // The unfavourable live-dominant row: dead 1.0*KFi, live 1.5*KFi
        let row = uls
            .names
            .iter()
            .position(|n| n.contains("Nyttelast dominerende") && n.contains("Ugunstig"))
            .unwrap();
        assert_relative_eq!(uls.matrix[(row, 0)], 1.5);
        assert_relative_eq!(uls.matrix[(row, 1)], 1.0);
    }

    #[test]
    fn test_wind_dominant_kills_snow() {
        // Scenario: wind line load, live point load, snow line load
        let loads = vec![
            load("wind", LoadCategory::Vindlast),
            load("live", LoadCategory::Nyttelast),
            load("snow", LoadCategory::Snelast),
        ];
        let uls = build_uls(&loads, &settings());

        // Find the unfavourable wind-dominant row where all loads are active
        let row = (0..uls.len())
            .find(|&i| {
                uls.names[i].contains("Vindlast dominerende")
                    && uls.names[i].contains("Ugunstig")
                    && uls.matrix[(i, 0)] != 0.0
                    && uls.matrix[(i, 1)] != 0.0
            })
            .unwrap();
        assert_relative_eq!(uls.matrix[(row, 0)], 1.5); // gamma_Q1 * KFi
        assert_relative_eq!(uls.matrix[(row, 1)], 0.75); // gamma_Q1 * psi0(live)
        assert_relative_eq!(uls.matrix[(row, 2)], 0.0); // snow under dominant wind
    }

    #[test]
    fn test_alpha_n_reduction() {
        let loads = vec![
            load("pl", LoadCategory::Nyttelast),
            load("sw", LoadCategory::Egenlast),
        ];
        let mut s = settings();
        s.n_levels_above = 3;
        let uls = build_uls(&loads, &s);
        let row = uls
            .names
            .iter()
            .position(|n| n.contains("Nyttelast dominerende") && n.contains("Ugunstig"))
            .unwrap();
        // alpha_3 = (1 + 2*0.5)/3 = 2/3
        assert_relative_eq!(uls.matrix[(row, 0)], 1.5 * 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_als_one_row_per_primary() {
        let loads = vec![
            load("sw", LoadCategory::Egenlast),
            load("live", LoadCategory::Nyttelast),
            load("snow", LoadCategory::Snelast),
        ];
        let als = build_als(&loads);
        assert_eq!(als.len(), 3);

        // Live-primary row: dead 1.0, live psi1 = 0.3, snow psi2 = 0.0
        let row = als
            .names
            .iter()
            .position(|n| n.contains("Nyttelast primær"))
            .unwrap();
        assert_relative_eq!(als.matrix[(row, 0)], 1.0);
        assert_relative_eq!(als.matrix[(row, 1)], 0.3);
        assert_relative_eq!(als.matrix[(row, 2)], 0.0);
    }

    #[test]
    fn test_sls_characteristic_alone() {
        let loads = vec![
            load("sw", LoadCategory::Egenlast),
            load("l1", LoadCategory::Nyttelast),
            load("l2", LoadCategory::Nyttelast),
        ];
        let sls = build_sls(&loads);
        // Gravity row + 3 nonempty subsets of the two live loads
        assert_eq!(sls.len(), 4);

        // Every live row carries the dead load at factor 1
        for i in 1..4 {
            assert_relative_eq!(sls.matrix[(i, 0)], 1.0);
        }
        // The full subset has both live columns active
        let full = (0..sls.len())
            .find(|&i| sls.matrix[(i, 1)] == 1.0 && sls.matrix[(i, 2)] == 1.0)
            .unwrap();
        assert!(sls.names[full].contains("Nyttelast alene"));
    }
}
