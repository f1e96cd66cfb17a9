//! Limit-state design checks (EC3 steel, EC5 timber, EC6 masonry)
//!
//! Per member, material data is precomputed once into a data-holder struct;
//! free functions evaluate one rule each against the combination-level
//! N, V, M and deflection slices and return a typed record holding every
//! intermediate plus the final utilization ratio.

pub mod ec3;
pub mod ec5;
pub mod ec6;

use crate::combinations::{CombinedQuantities, LimitState};
use crate::discretize::DiscretizedMember;
use crate::elements::MemberMaterial;
use crate::entities::ProjectSettings;
use crate::error::{FrameError, FrameResult};

/// Combination-level quantity slices restricted to one member's samples
#[derive(Debug, Clone)]
pub struct QuantitySlices {
    pub n: Vec<f64>,
    pub v: Vec<f64>,
    pub m: Vec<f64>,
    pub u_x: Vec<f64>,
    pub u_y: Vec<f64>,
    pub u_loc_y: Vec<f64>,
}

impl QuantitySlices {
    /// Extract the sample columns of one member for one combination row
    pub fn extract(
        combined: &CombinedQuantities,
        combination: usize,
        member: &DiscretizedMember,
    ) -> Self {
        let range = member.sample_range();
        let pick = |mat: &crate::math::Mat| -> Vec<f64> {
            range.clone().map(|c| mat[(combination, c)]).collect()
        };
        Self {
            n: pick(&combined.n),
            v: pick(&combined.v),
            m: pick(&combined.m),
            u_x: pick(&combined.u_x),
            u_y: pick(&combined.u_y),
            u_loc_y: pick(&combined.u_loc_y),
        }
    }

    pub fn max_abs_n(&self) -> f64 {
        self.n.iter().fold(0.0f64, |a, &x| a.max(x.abs()))
    }

    pub fn max_abs_v(&self) -> f64 {
        self.v.iter().fold(0.0f64, |a, &x| a.max(x.abs()))
    }

    pub fn max_abs_m(&self) -> f64 {
        self.m.iter().fold(0.0f64, |a, &x| a.max(x.abs()))
    }

    pub fn min_n(&self) -> f64 {
        self.n.iter().fold(f64::INFINITY, |a, &x| a.min(x))
    }

    /// Largest resultant of the global deflection components
    pub fn max_deflection_global(&self) -> f64 {
        self.u_x
            .iter()
            .zip(self.u_y.iter())
            .fold(0.0f64, |a, (&x, &y)| a.max((x * x + y * y).sqrt()))
    }

    pub fn max_abs_u_loc(&self) -> f64 {
        self.u_loc_y.iter().fold(0.0f64, |a, &x| a.max(x.abs()))
    }
}

/// Precomputed material data for one member
#[derive(Debug, Clone)]
pub enum MemberData {
    Steel(ec3::SteelMemberData),
    Timber(ec5::TimberMemberData),
    Masonry(ec6::MasonryMemberData),
}

impl MemberData {
    pub fn new(member: &DiscretizedMember, project: &ProjectSettings) -> FrameResult<Self> {
        match &member.member.material {
            MemberMaterial::Steel(_) => Ok(MemberData::Steel(ec3::SteelMemberData::new(
                member, project,
            )?)),
            MemberMaterial::Timber(_) => Ok(MemberData::Timber(ec5::TimberMemberData::new(
                member, project,
            )?)),
            MemberMaterial::Masonry(_) => Ok(MemberData::Masonry(ec6::MasonryMemberData::new(
                member, project,
            )?)),
        }
    }
}

/// Evaluated rule set for one member under one combination
#[derive(Debug, Clone)]
pub enum MemberCheckSet {
    Steel(ec3::SteelCheckSet),
    Timber(ec5::TimberCheckSet),
    Masonry(ec6::MasonryCheckSet),
}

impl MemberCheckSet {
    /// (rule label, UR) pairs in stable rule order
    pub fn ur_values(&self) -> Vec<(String, f64)> {
        match self {
            MemberCheckSet::Steel(s) => s.ur_values(),
            MemberCheckSet::Timber(t) => t.ur_values(),
            MemberCheckSet::Masonry(m) => m.ur_values(),
        }
    }
}

/// Evaluate every applicable rule for one member and combination
///
/// Rules that hit an unsupported configuration are skipped (with a warning)
/// and absent from the result; numerical poison aborts the analysis.
pub fn evaluate(
    data: &MemberData,
    ls: LimitState,
    q: &QuantitySlices,
) -> FrameResult<MemberCheckSet> {
    match data {
        MemberData::Steel(d) => ec3::evaluate(d, ls, q).map(MemberCheckSet::Steel),
        MemberData::Timber(d) => ec5::evaluate(d, ls, q).map(MemberCheckSet::Timber),
        MemberData::Masonry(d) => ec6::evaluate(d, ls, q).map(MemberCheckSet::Masonry),
    }
}

/// Skip-or-propagate policy for per-rule failures
pub(crate) fn skip_unsupported<T>(
    rule: &str,
    member: &str,
    result: FrameResult<T>,
) -> FrameResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(FrameError::Unsupported(msg)) => {
            log::warn!("skipping {rule} for member '{member}': {msg}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
