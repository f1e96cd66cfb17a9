//! Analysis - the full pipeline from entity set to verification results
//!
//! build → solve-per-load → discretize → combine → check → aggregate.
//! A completed [`Analysis`] owns every intermediate and is immutable; all
//! cross-references inside the result set are small integer indices.

use std::collections::BTreeMap;

use crate::checks::{self, MemberCheckSet, MemberData, QuantitySlices};
use crate::combinations::{
    distinct_categories, CombinedQuantities, LimitState, LimitStateCombinations,
};
use crate::discretize::{discretize, Discretization};
use crate::entities::{EntitySet, ProjectSettings};
use crate::error::{FrameError, FrameResult};
use crate::loads::{collect_single_loads, LoadCaseResults, LoadCategory};
use crate::model::FrameModel;
use crate::results::{
    governing_fire_temperature, reduce_limit_state, AnalysisResults, FemModel, ForcesView,
    MemberLsUr, MemberVerification,
};

/// A completed analysis run
#[derive(Debug)]
pub struct Analysis {
    pub settings: ProjectSettings,
    pub model: FrameModel,
    pub cases: LoadCaseResults,
    pub discretization: Discretization,
    pub combinations: LimitStateCombinations,
    pub uls: CombinedQuantities,
    pub sls: CombinedQuantities,
    pub als: CombinedQuantities,
    pub categories: Vec<LoadCategory>,
    pub results: AnalysisResults,
}

impl Analysis {
    /// Run the whole pipeline on an entity set
    pub fn run(set: &EntitySet, settings: ProjectSettings) -> FrameResult<Self> {
        let mut model = FrameModel::from_entities(set)?;

        let loads = collect_single_loads(set, &settings);
        if loads.is_empty() {
            return Err(FrameError::BadInput(
                "entity set declares no loads and selfweight is off".into(),
            ));
        }

        let cases = LoadCaseResults::assemble(&mut model, loads)?;
        let discretization = discretize(&model, &cases)?;

        let combinations = LimitStateCombinations::build(&cases.loads, &settings);
        let uls = CombinedQuantities::materialize(&combinations.uls, &discretization);
        let sls = CombinedQuantities::materialize(&combinations.sls, &discretization);
        let als = CombinedQuantities::materialize(&combinations.als, &discretization);

        let categories = distinct_categories(&cases.loads);

        // Evaluate every rule for every member and combination
        let mut uls_urs = Vec::with_capacity(discretization.members.len());
        let mut sls_urs = Vec::with_capacity(discretization.members.len());
        let mut als_urs = Vec::with_capacity(discretization.members.len());

        for member in &discretization.members {
            let data = MemberData::new(member, &settings)?;
            uls_urs.push(member_ur_matrix(&data, LimitState::Uls, &uls, member)?);
            sls_urs.push(member_ur_matrix(&data, LimitState::Sls, &sls, member)?);
            als_urs.push(member_ur_matrix(&data, LimitState::Als, &als, member)?);
        }

        let uls_ver = reduce_limit_state(LimitState::Uls, &uls_urs, &uls, &categories);
        let sls_ver = reduce_limit_state(LimitState::Sls, &sls_urs, &sls, &categories);
        let als_ver = reduce_limit_state(LimitState::Als, &als_urs, &als, &categories);

        let load_ids: Vec<String> = cases.loads.iter().map(|l| l.id.clone()).collect();

        let ur: Vec<MemberVerification> = discretization
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| MemberVerification {
                member_id: m.member.id.clone(),
                member_name: m.member.name.clone(),
                uls: uls_ver[i].clone(),
                sls: sls_ver[i].clone(),
                als: als_ver[i].clone(),
                critical_steel_temperature: governing_fire_temperature(&als_urs[i]),
                load_ids: load_ids.clone(),
            })
            .collect();

        let mut forces = BTreeMap::new();
        forces.insert("ULS", ForcesView::from_combined(&uls));
        forces.insert("SLS", ForcesView::from_combined(&sls));
        forces.insert("ALS", ForcesView::from_combined(&als));

        let results = AnalysisResults {
            fem_model: FemModel::snapshot(&model, &discretization),
            forces,
            ur,
        };

        log::info!(
            "analysis complete: {} members, {} single loads, {} samples",
            discretization.members.len(),
            cases.len(),
            discretization.n_samples
        );

        Ok(Self {
            settings,
            model,
            cases,
            discretization,
            combinations,
            uls,
            sls,
            als,
            categories,
            results,
        })
    }

    /// Serialize the result set to JSON
    pub fn to_json(&self) -> FrameResult<String> {
        Ok(serde_json::to_string(&self.results)?)
    }
}

/// The full (rules × combinations) UR matrix for one member and limit state
fn member_ur_matrix(
    data: &MemberData,
    ls: LimitState,
    combined: &CombinedQuantities,
    member: &crate::discretize::DiscretizedMember,
) -> FrameResult<MemberLsUr> {
    let mut out = MemberLsUr::default();
    for ci in 0..combined.names.len() {
        let q = QuantitySlices::extract(combined, ci, member);
        let set = checks::evaluate(data, ls, &q)?;
        let urs = set.ur_values();

        if ci == 0 {
            out.rule_labels = urs.iter().map(|(l, _)| l.clone()).collect();
            out.matrix = vec![Vec::with_capacity(combined.names.len()); urs.len()];
        } else if urs.len() != out.rule_labels.len() {
            return Err(FrameError::AnalysisFailed(format!(
                "rule set changed between combinations for member '{}'",
                member.member.id
            )));
        }
        for (k, (_, ur)) in urs.iter().enumerate() {
            out.matrix[k].push(*ur);
        }

        out.fire_temperatures.push(match (&set, ls) {
            (MemberCheckSet::Steel(s), LimitState::Als) => Some(s.critical_fire_temperature()),
            _ => None,
        });
    }
    Ok(out)
}
