//! Discretizer - refined section-force and deflection sampling
//!
//! Refines each member's element-nodal section forces with a cubic spline
//! over 10 sample intervals per sub-element and reconstructs deflections with
//! cubic-Hermite shape functions, in both the global frame and the member's
//! end-to-end chord frame. The result is one flat sample axis shared by every
//! quantity; each member contributes 10·n_sub + 1 consecutive columns.

use serde::{Deserialize, Serialize};

use crate::elements::Member;
use crate::error::{FrameError, FrameResult};
use crate::loads::LoadCaseResults;
use crate::math::{
    beam_transformation, hermite_shape_matrix, rotation_block, CubicSpline, Mat, Mat2, Vec2,
};
use crate::model::{FrameModel, DISCR};

/// Interpolation samples per sub-element
pub const PLOT_DISCR: usize = 10;

/// Values with a smaller magnitude clamp to zero to avoid denormal-driven
/// sign flips in the spline input and output
const CLAMP: f64 = 1e-6;

/// A member together with its place on the refined sample axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscretizedMember {
    pub member: Member,
    /// Rotation from global to member-chord coordinates
    pub au_beam: Mat2,
    /// Chord origin (first member node)
    pub x1_beam: Vec2,
    /// First sample column of this member
    pub sample_start: usize,
    /// Number of sample columns (10·n_sub + 1)
    pub sample_count: usize,
    /// Sample-element indices in the refined topology
    pub elements: Vec<usize>,
}

impl DiscretizedMember {
    /// The member's sample column range
    pub fn sample_range(&self) -> std::ops::Range<usize> {
        self.sample_start..self.sample_start + self.sample_count
    }
}

/// Discretized per-single-load quantities on the shared sample axis
///
/// Each matrix has one row per single load and one column per sample.
#[derive(Debug, Clone)]
pub struct Discretization {
    pub members: Vec<DiscretizedMember>,
    /// Sample topology: consecutive sample pairs per member
    pub t_discr: Vec<[usize; 2]>,
    /// Global sample coordinates
    pub x_discr: Vec<Vec2>,
    /// Member-local axial sample coordinate
    pub x_loc_discr: Vec<f64>,
    pub n_samples: usize,

    pub n: Mat,
    pub v: Mat,
    pub m: Mat,
    pub u_x: Mat,
    pub u_y: Mat,
    pub u_loc_y: Mat,
    /// Per-load reactions (#loads × #fixed DOFs)
    pub r0: Mat,
}

fn clamp_small(v: f64) -> f64 {
    if v.abs() < CLAMP {
        0.0
    } else {
        v
    }
}

/// Run the discretizer over every member and single load
pub fn discretize(model: &FrameModel, cases: &LoadCaseResults) -> FrameResult<Discretization> {
    let n_loads = cases.len();

    let n_samples: usize = model
        .members
        .iter()
        .map(|m| PLOT_DISCR * m.elements.len() + 1)
        .sum();

    let mut members = Vec::with_capacity(model.members.len());
    let mut t_discr = Vec::new();
    let mut x_discr = Vec::with_capacity(n_samples);
    let mut x_loc_discr = Vec::with_capacity(n_samples);

    let mut n_mat = Mat::zeros(n_loads, n_samples);
    let mut v_mat = Mat::zeros(n_loads, n_samples);
    let mut m_mat = Mat::zeros(n_loads, n_samples);
    let mut ux_mat = Mat::zeros(n_loads, n_samples);
    let mut uy_mat = Mat::zeros(n_loads, n_samples);
    let mut uloc_mat = Mat::zeros(n_loads, n_samples);

    let mut start = 0usize;
    for member in &model.members {
        let count = PLOT_DISCR * member.elements.len() + 1;

        let first_el = &model.elements[member.elements[0]];
        let last_el = &model.elements[*member.elements.last().expect("member has elements")];
        let x1_beam = model.nodes[first_el.n1].coords();
        let x2_beam = model.nodes[last_el.n2].coords();
        let (a_beam, _) = beam_transformation(&x1_beam, &x2_beam);
        let au_beam = rotation_block(&a_beam);

        // Member-local axial coordinate of a point
        let local_x = |p: &Vec2| -> f64 { (au_beam * (p - x1_beam)).x };

        // Sample positions along the chord, deduplicated at element joints
        for (k, &el) in member.elements.iter().enumerate() {
            let e = &model.elements[el];
            let xa = local_x(&model.nodes[e.n1].coords());
            let xb = local_x(&model.nodes[e.n2].coords());
            let i0 = if k == 0 { 0 } else { 1 };
            for i in i0..=PLOT_DISCR {
                let s = i as f64 / PLOT_DISCR as f64;
                let xl = xa + (xb - xa) * s;
                x_loc_discr.push(xl);
                x_discr.push(x1_beam + au_beam.transpose() * Vec2::new(xl, 0.0));
            }
        }

        for i in 0..count - 1 {
            t_discr.push([start + i, start + i + 1]);
        }

        // Section forces: one natural spline per chunk of DISCR sub-elements
        for lc in 0..n_loads {
            let result = &cases.results[lc];
            let mut col = start;
            for (c, chunk) in member.elements.chunks(DISCR).enumerate() {
                let mut knots = Vec::with_capacity(chunk.len() + 1);
                let mut qn = Vec::with_capacity(chunk.len() + 1);
                let mut qv = Vec::with_capacity(chunk.len() + 1);
                let mut qm = Vec::with_capacity(chunk.len() + 1);

                for &el in chunk {
                    let e = &model.elements[el];
                    knots.push(local_x(&model.nodes[e.n1].coords()));
                    qn.push(clamp_small(result.n[el][0]));
                    qv.push(clamp_small(result.v[el][0]));
                    // Design sign convention flips the solver moment
                    qm.push(clamp_small(-result.m[el][0]));
                }
                let last = *chunk.last().expect("chunk is non-empty");
                let e = &model.elements[last];
                knots.push(local_x(&model.nodes[e.n2].coords()));
                qn.push(clamp_small(result.n[last][1]));
                qv.push(clamp_small(result.v[last][1]));
                qm.push(clamp_small(-result.m[last][1]));

                let spline_n = CubicSpline::fit(&knots, &qn);
                let spline_v = CubicSpline::fit(&knots, &qv);
                let spline_m = CubicSpline::fit(&knots, &qm);
                let (spline_n, spline_v, spline_m) = match (spline_n, spline_v, spline_m) {
                    (Some(a), Some(b), Some(c)) => (a, b, c),
                    _ => {
                        return Err(FrameError::Numerical(format!(
                            "degenerate spline knots on member '{}'",
                            member.id
                        )))
                    }
                };

                let x0 = knots[0];
                let x1 = *knots.last().expect("chunk has knots");
                let nrp = PLOT_DISCR * chunk.len();
                let i0 = if c == 0 { 0 } else { 1 };
                for i in i0..=nrp {
                    let x = x0 + (x1 - x0) * i as f64 / nrp as f64;
                    n_mat[(lc, col)] = clamp_small(spline_n.evaluate(x));
                    v_mat[(lc, col)] = clamp_small(spline_v.evaluate(x));
                    m_mat[(lc, col)] = clamp_small(spline_m.evaluate(x));
                    col += 1;
                }
            }
            debug_assert_eq!(col, start + count);
        }

        // Deflections: cubic-Hermite reconstruction per element
        for lc in 0..n_loads {
            let result = &cases.results[lc];
            let mut col = start;
            // Deformed sample positions for the chord-frame pass
            let mut pos_def = Vec::with_capacity(count);

            for (k, &el) in member.elements.iter().enumerate() {
                let e = &model.elements[el];
                let xa = model.nodes[e.n1].coords();
                let xb = model.nodes[e.n2].coords();
                let (a_el, l_el) = beam_transformation(&xa, &xb);
                let au_el = rotation_block(&a_el);
                let v_local = a_el * result.element_disp[el];

                let i0 = if k == 0 { 0 } else { 1 };
                for i in i0..=PLOT_DISCR {
                    let s = i as f64 / PLOT_DISCR as f64;
                    let us_l = hermite_shape_matrix(s, l_el) * v_local;
                    let us_g = au_el.transpose() * us_l;
                    let pos = xa + (xb - xa) * s;

                    ux_mat[(lc, col)] = us_g.x;
                    uy_mat[(lc, col)] = us_g.y;
                    pos_def.push(pos + us_g);
                    col += 1;
                }
            }
            debug_assert_eq!(col, start + count);

            // Member-local deflection relative to the deformed end-to-end chord
            let end1 = pos_def[0];
            let end2 = *pos_def.last().expect("member has samples");
            let (a_chord, _) = beam_transformation(&end1, &end2);
            let au_chord = rotation_block(&a_chord);
            let origin = au_chord * end1;
            for (i, p) in pos_def.iter().enumerate() {
                let loc = au_chord * p;
                uloc_mat[(lc, start + i)] = loc.y - origin.y;
            }
        }

        let sample_elements: Vec<usize> =
            (t_discr.len() - (count - 1)..t_discr.len()).collect();
        members.push(DiscretizedMember {
            member: member.clone(),
            au_beam,
            x1_beam,
            sample_start: start,
            sample_count: count,
            elements: sample_elements,
        });

        start += count;
    }
    debug_assert_eq!(start, n_samples);

    // Stacked per-load reactions
    let n_reactions = model.fixed_dofs.len();
    let mut r0 = Mat::zeros(n_loads, n_reactions);
    for lc in 0..n_loads {
        for (j, r) in cases.results[lc].reactions.iter().enumerate() {
            r0[(lc, j)] = *r;
        }
    }

    log::debug!(
        "discretized {} members into {} samples for {} single loads",
        members.len(),
        n_samples,
        n_loads
    );

    Ok(Discretization {
        members,
        t_discr,
        x_discr,
        x_loc_discr,
        n_samples,
        n: n_mat,
        v: v_mat,
        m: m_mat,
        u_x: ux_mat,
        u_y: uy_mat,
        u_loc_y: uloc_mat,
        r0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntitySet, ProjectSettings};
    use crate::loads::collect_single_loads;
    use approx::assert_relative_eq;

    fn beam_case() -> (FrameModel, LoadCaseResults) {
        let set: EntitySet = serde_json::from_str(
            r#"{
                "nodes": {
                    "n1": {"x": 0.0, "y": 0.0},
                    "n2": {"x": 4.0, "y": 0.0}
                },
                "members": {
                    "m1": {
                        "node1": "n1", "node2": "n2",
                        "dependants": ["pl1", "s1", "s2"],
                        "memberprop": {
                            "type": "Steel",
                            "steelProfile": "IPE200",
                            "steelStrength": "S235",
                            "selfWeightEnabled": false
                        }
                    }
                },
                "supports": {
                    "s1": {"resolved": {"x": 0.0, "y": 0.0}, "type": "Pinned"},
                    "s2": {"resolved": {"x": 4.0, "y": 0.0}, "type": "Roller", "angle": 0}
                },
                "pointLoads": {
                    "pl1": {"resolved": {"x": 2.0, "y": 0.0}, "magnitude": 10.0, "type": "Live"}
                }
            }"#,
        )
        .unwrap();
        let mut model = FrameModel::from_entities(&set).unwrap();
        let settings = ProjectSettings {
            selfweight_on_off: false,
            ..Default::default()
        };
        let loads = collect_single_loads(&set, &settings);
        let cases = LoadCaseResults::assemble(&mut model, loads).unwrap();
        (model, cases)
    }

    #[test]
    fn test_sample_counts() {
        let (model, cases) = beam_case();
        let d = discretize(&model, &cases).unwrap();
        // 8 sub-elements: 81 samples, 80 sample elements
        assert_eq!(d.n_samples, 81);
        assert_eq!(d.t_discr.len(), 80);
        assert_eq!(d.members[0].sample_count, 81);
        assert_eq!(d.x_discr.len(), 81);
        assert_eq!(d.n.ncols(), 81);
        assert_eq!(d.n.nrows(), 1);
    }

    #[test]
    fn test_spline_matches_nodal_values() {
        let (model, cases) = beam_case();
        let d = discretize(&model, &cases).unwrap();
        // Midspan sample (x_loc = 2.0) carries the peak design moment -PL/4
        // (the design convention negates the sagging-positive solver moment)
        let mid = d
            .x_loc_discr
            .iter()
            .position(|&x| (x - 2.0).abs() < 1e-9)
            .unwrap();
        assert_relative_eq!(d.m[(0, mid)], -10e3, max_relative = 1e-6);
        // Design moment is the negated solver moment
        assert_relative_eq!(
            d.m[(0, mid)],
            -cases.results[0].m[3][1],
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_local_deflection_zero_at_ends() {
        let (model, cases) = beam_case();
        let d = discretize(&model, &cases).unwrap();
        let m = &d.members[0];
        assert_relative_eq!(d.u_loc_y[(0, m.sample_start)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            d.u_loc_y[(0, m.sample_start + m.sample_count - 1)],
            0.0,
            epsilon = 1e-12
        );
        // Midspan deflection is downward and matches PL^3/48EI closely
        let mid = m.sample_start + (m.sample_count - 1) / 2;
        let expected = 10e3 * 4.0f64.powi(3) / (48.0 * 210e9 * 1943e-8);
        assert_relative_eq!(-d.u_loc_y[(0, mid)], expected, max_relative = 1e-3);
        assert_relative_eq!(-d.u_y[(0, mid)], expected, max_relative = 1e-3);
    }

    #[test]
    fn test_topology_is_consecutive() {
        let (model, cases) = beam_case();
        let d = discretize(&model, &cases).unwrap();
        for (i, pair) in d.t_discr.iter().enumerate() {
            assert_eq!(pair[0] + 1, pair[1]);
            assert_eq!(pair[0], i);
        }
    }
}
