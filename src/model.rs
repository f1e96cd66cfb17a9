//! Frame model - geometry assembly, refinement and the linear solver
//!
//! Builds the discretized frame from the declarative entity set (node
//! de-duplication at 6 decimals, 4 sub-elements per segment, hinge DOF
//! expansion), then assembles and solves K v = R per applied single load and
//! recovers element-local section forces.

use std::collections::{HashMap, HashSet};

use crate::elements::{coordinate_key, Element, Member, MemberMaterial, Node, Support};
use crate::entities::{EntitySet, MemberEntity};
use crate::error::{FrameError, FrameResult};
use crate::loads::{LoadForm, SingleLoad};
use crate::math::{
    beam_local_stiffness, beam_transformation, consistent_line_load, SystemMatrixBuilder, Mat,
    Vec2, Vec6,
};

/// Sub-elements per refined segment
pub const DISCR: usize = 4;
/// Gravitational acceleration [m/s²], negative global y
pub const GRAVITY: f64 = -9.82;

/// Solution of one single-load run
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Full displacement vector (all DOFs)
    pub displacements: Vec<f64>,
    /// Reactions at the fixed DOFs, in fixed-DOF order
    pub reactions: Vec<f64>,
    /// Per-element nodal displacements in global components
    pub element_disp: Vec<Vec6>,
    /// Axial force at (start, end) per element; positive = tension
    pub n: Vec<[f64; 2]>,
    /// Shear force at (start, end) per element
    pub v: Vec<[f64; 2]>,
    /// Bending moment at (start, end) per element
    pub m: Vec<[f64; 2]>,
}

/// The discretized 2D frame
#[derive(Debug, Clone, Default)]
pub struct FrameModel {
    pub nodes: Vec<Node>,
    node_index: HashMap<(i64, i64), usize>,
    hinge_keys: HashSet<(i64, i64)>,
    pub elements: Vec<Element>,
    pub members: Vec<Member>,
    /// Global DOF ids per element, start node then end node
    pub dof_map: Vec<[usize; 6]>,
    pub n_dofs: usize,
    /// Fixed global DOF ids, in support declaration order
    pub fixed_dofs: Vec<usize>,
    /// Declared supports (for the reactions view)
    pub supports: Vec<Support>,
    edge_index: HashMap<(usize, usize), usize>,

    // Transient per-single-load state
    r_applied: Vec<f64>,
    element_local_loads: Vec<Vec6>,
}

impl FrameModel {
    /// Build the discretized frame from the entity set
    pub fn from_entities(set: &EntitySet) -> FrameResult<Self> {
        let mut model = FrameModel::default();

        for node in set.nodes.values() {
            if node.assembly == crate::entities::Assembly::Hinge {
                model.hinge_keys.insert(coordinate_key(node.x, node.y));
            }
        }

        for (idx, (id, mem)) in set.members.iter().enumerate() {
            model.add_member(idx, id, mem, set)?;
        }
        if model.members.is_empty() {
            return Err(FrameError::BadInput("entity set declares no members".into()));
        }

        model.build_dof_map();

        for sup in set.supports.values() {
            let support = Support::new(
                Vec2::new(sup.resolved.x, sup.resolved.y),
                sup.kind,
                sup.angle,
            );
            model.add_support(support)?;
        }
        if model.fixed_dofs.is_empty() {
            return Err(FrameError::BadInput("entity set declares no supports".into()));
        }

        model.r_applied = vec![0.0; model.n_dofs];
        model.element_local_loads = vec![Vec6::zeros(); model.elements.len()];

        log::info!(
            "frame built: {} nodes, {} elements, {} members, {} DOFs, {} fixed",
            model.nodes.len(),
            model.elements.len(),
            model.members.len(),
            model.n_dofs,
            model.fixed_dofs.len()
        );

        Ok(model)
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Node index at a coordinate (6-decimal identity)
    pub fn node_at(&self, p: &Vec2) -> FrameResult<usize> {
        self.node_index
            .get(&coordinate_key(p.x, p.y))
            .copied()
            .ok_or(FrameError::NoNodeAtCoordinate(p.x, p.y))
    }

    /// Node and direction for a nodal DOF id; None for extra hinge DOFs
    pub fn dof_info(&self, dof: usize) -> Option<(usize, crate::elements::Dof)> {
        if dof >= 3 * self.nodes.len() {
            return None;
        }
        let dir = match dof % 3 {
            0 => crate::elements::Dof::X,
            1 => crate::elements::Dof::Y,
            _ => crate::elements::Dof::R,
        };
        Some((dof / 3, dir))
    }

    fn get_or_create_node(&mut self, p: Vec2) -> usize {
        let key = coordinate_key(p.x, p.y);
        if let Some(&i) = self.node_index.get(&key) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(Node::new(p.x, p.y));
        self.node_index.insert(key, i);
        i
    }

    fn dependant_points(
        &self,
        set: &EntitySet,
        mem: &MemberEntity,
        id: &str,
    ) -> FrameResult<Vec<Vec2>> {
        let mut pts = Vec::new();
        for dep in &mem.dependants {
            if let Some(dl) = set.distributed_loads.get(dep) {
                pts.push(Vec2::new(dl.resolved.point1.x, dl.resolved.point1.y));
                pts.push(Vec2::new(dl.resolved.point2.x, dl.resolved.point2.y));
            } else if let Some(pl) = set.point_loads.get(dep) {
                pts.push(Vec2::new(pl.resolved.x, pl.resolved.y));
            } else if let Some(sup) = set.supports.get(dep) {
                pts.push(Vec2::new(sup.resolved.x, sup.resolved.y));
            } else if let Some(ml) = set.moment_loads.get(dep) {
                pts.push(Vec2::new(ml.resolved.x, ml.resolved.y));
            } else if let Some(node) = set.nodes.get(dep) {
                pts.push(Vec2::new(node.x, node.y));
            } else {
                return Err(FrameError::BadInput(format!(
                    "member '{id}' references unknown dependant '{dep}'"
                )));
            }
        }
        Ok(pts)
    }

    fn add_member(
        &mut self,
        index: usize,
        id: &str,
        mem: &MemberEntity,
        set: &EntitySet,
    ) -> FrameResult<()> {
        let n1 = set
            .nodes
            .get(&mem.node1)
            .ok_or_else(|| FrameError::NodeNotFound(mem.node1.clone()))?;
        let n2 = set
            .nodes
            .get(&mem.node2)
            .ok_or_else(|| FrameError::NodeNotFound(mem.node2.clone()))?;
        let a = Vec2::new(n1.x, n1.y);
        let b = Vec2::new(n2.x, n2.y);

        let ab = b - a;
        let length_ab = ab.norm();
        if coordinate_key(a.x, a.y) == coordinate_key(b.x, b.y) || length_ab <= 0.0 {
            return Err(FrameError::InvalidGeometry(format!(
                "member '{id}' has zero length"
            )));
        }

        let material = MemberMaterial::from_prop(&mem.memberprop)?;
        let (e_mod, area, inertia, rho) = material.section_constants()?;

        // Collect the member's own endpoints plus every dependant coordinate
        // that lies on the member axis
        let mut points = vec![a, b];
        for p in self.dependant_points(set, mem, id)? {
            let ap = p - a;
            let cross = ab.x * ap.y - ab.y * ap.x;
            let t = ap.dot(&ab) / (length_ab * length_ab);
            if (cross / length_ab).abs() < 1e-6 && (-1e-9..=1.0 + 1e-9).contains(&t) {
                points.push(p);
            }
        }

        // De-duplicate on the rounded coordinate, keeping full precision
        let mut seen = HashSet::new();
        points.retain(|p| seen.insert(coordinate_key(p.x, p.y)));

        // Sort along the member axis; vertical members sort by y
        let vertical = coordinate_key(a.x, 0.0).0 == coordinate_key(b.x, 0.0).0;
        if vertical {
            points.sort_by(|p, q| p.y.partial_cmp(&q.y).expect("non-finite coordinate"));
        } else {
            points.sort_by(|p, q| p.x.partial_cmp(&q.x).expect("non-finite coordinate"));
        }

        let end1 = points[0];
        let end2 = *points.last().expect("member has endpoints");
        let member_length = (end2 - end1).norm();

        // Subdivide every segment between needed nodes into DISCR sub-elements
        let mut chain = vec![end1];
        for w in points.windows(2) {
            for k in 1..=DISCR {
                let s = k as f64 / DISCR as f64;
                chain.push(w[0] + (w[1] - w[0]) * s);
            }
        }

        let end1_pre_existing = self.node_index.contains_key(&coordinate_key(end1.x, end1.y));
        let end2_pre_existing = self.node_index.contains_key(&coordinate_key(end2.x, end2.y));

        let node_ids: Vec<usize> = chain.iter().map(|p| self.get_or_create_node(*p)).collect();

        let first_el = self.elements.len();
        for w in node_ids.windows(2) {
            if w[0] == w[1] {
                return Err(FrameError::InvalidGeometry(format!(
                    "member '{id}' produces a zero-length element (dependants too close)"
                )));
            }
            let el = self.elements.len();
            self.elements
                .push(Element::new(w[0], w[1], e_mod, area, inertia, rho));
            self.edge_index.insert((w[0], w[1]), el);
            self.edge_index.insert((w[1], w[0]), el);
        }
        let last_el = self.elements.len() - 1;

        // A member end landing on a node that another member already created
        // inherits the hinge release declared on that node
        if end1_pre_existing && self.hinge_keys.contains(&coordinate_key(end1.x, end1.y)) {
            self.elements[first_el].hinge_start = true;
        }
        if end2_pre_existing && self.hinge_keys.contains(&coordinate_key(end2.x, end2.y)) {
            self.elements[last_el].hinge_end = true;
        }

        let name = match &mem.memberprop.name {
            Some(n) if !n.is_empty() => n.clone(),
            _ => format!("konstruktionsdel {}", index + 1),
        };

        self.members.push(Member {
            id: id.to_string(),
            name,
            material,
            deflection_requirement: mem.memberprop.deflection_requirement,
            deflection_is_local: mem.memberprop.deflection_is_local.unwrap_or(true),
            selfweight_enabled: mem.memberprop.self_weight_enabled.unwrap_or(true),
            length: member_length,
            e: e_mod,
            a: area,
            i: inertia,
            rho,
            elements: (first_el..=last_el).collect(),
        });

        Ok(())
    }

    /// Assign 3 DOFs per node in insertion order; hinged element ends get a
    /// fresh rotational DOF past 3·n_nodes
    fn build_dof_map(&mut self) {
        let mut next = 3 * self.nodes.len();
        self.dof_map.clear();
        for el in &self.elements {
            let mut d = [
                3 * el.n1,
                3 * el.n1 + 1,
                3 * el.n1 + 2,
                3 * el.n2,
                3 * el.n2 + 1,
                3 * el.n2 + 2,
            ];
            if el.hinge_start {
                d[2] = next;
                next += 1;
            }
            if el.hinge_end {
                d[5] = next;
                next += 1;
            }
            self.dof_map.push(d);
        }
        self.n_dofs = next;
    }

    fn add_support(&mut self, support: Support) -> FrameResult<()> {
        let node = self.node_at(&support.position)?;
        for dof in support.fixed_dofs()? {
            let global = 3 * node + dof.offset();
            if !self.fixed_dofs.contains(&global) {
                self.fixed_dofs.push(global);
            }
        }
        self.supports.push(support);
        Ok(())
    }

    /// Coordinates of every fixed DOF, in fixed-DOF order
    pub fn reaction_coordinates(&self) -> Vec<Vec2> {
        self.fixed_dofs
            .iter()
            .map(|&d| self.nodes[d / 3].coords())
            .collect()
    }

    /// Direction tags (x/y/r) of every fixed DOF, in fixed-DOF order
    pub fn reaction_types(&self) -> Vec<&'static str> {
        self.fixed_dofs
            .iter()
            .map(|&d| match d % 3 {
                0 => "x",
                1 => "y",
                _ => "r",
            })
            .collect()
    }

    // ========================
    // Load application
    // ========================

    /// Reset the transient load state before applying the next single load
    pub fn clear_loads(&mut self) {
        self.r_applied.iter_mut().for_each(|v| *v = 0.0);
        self.element_local_loads
            .iter_mut()
            .for_each(|v| *v = Vec6::zeros());
    }

    /// Apply one single load to the transient load state
    pub fn apply_load(&mut self, load: &SingleLoad) -> FrameResult<()> {
        match &load.form {
            LoadForm::Point { position, force } => {
                let node = self.node_at(position)?;
                if force.x != 0.0 {
                    self.r_applied[3 * node] += force.x;
                }
                if force.y != 0.0 {
                    self.r_applied[3 * node + 1] += force.y;
                }
                Ok(())
            }
            LoadForm::Moment { position, m0 } => {
                let node = self.node_at(position)?;
                if *m0 != 0.0 {
                    self.r_applied[3 * node + 2] += m0;
                }
                Ok(())
            }
            LoadForm::Line {
                start,
                end,
                force_start,
                force_end,
            } => self.add_line_load(start, end, force_start, force_end),
            LoadForm::Selfweight => self.add_selfweight(),
        }
    }

    /// Apply a linearly varying line load between two refined nodes
    ///
    /// The span is split along the intermediate nodes inside the member; each
    /// sub-segment contributes the closed-form consistent nodal vector, and
    /// the element-local vector accumulates into the fixed-end force store.
    fn add_line_load(
        &mut self,
        start: &Vec2,
        end: &Vec2,
        f1: &Vec2,
        f2: &Vec2,
    ) -> FrameResult<()> {
        let i1 = self.node_at(start)?;
        let i2 = self.node_at(end)?;
        let p0 = self.nodes[i1].coords();
        let p1 = self.nodes[i2].coords();
        let r = p1 - p0;

        // Collect every node on the span with its normalized position t
        let mut span: Vec<(f64, usize)> = vec![(0.0, i1)];
        let vertical = coordinate_key(p0.x, 0.0).0 == coordinate_key(p1.x, 0.0).0;
        let horizontal = coordinate_key(p0.y, 0.0).0 == coordinate_key(p1.y, 0.0).0;
        for (i, node) in self.nodes.iter().enumerate() {
            if i == i1 {
                continue;
            }
            let t = if vertical {
                if coordinate_key(node.x, 0.0).0 != coordinate_key(p0.x, 0.0).0 {
                    continue;
                }
                round6((node.y - p0.y) / r.y)
            } else if horizontal {
                if coordinate_key(node.y, 0.0).0 != coordinate_key(p0.y, 0.0).0 {
                    continue;
                }
                round6((node.x - p0.x) / r.x)
            } else {
                let t1 = round6((node.x - p0.x) / r.x);
                let t2 = round6((node.y - p0.y) / r.y);
                if t1 != t2 {
                    continue;
                }
                t1
            };
            if (0.0..=1.0).contains(&t) {
                span.push((t, i));
            }
        }
        span.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("non-finite span position"));

        for w in span.windows(2) {
            let (ta, na) = w[0];
            let (tb, nb) = w[1];
            let el = *self
                .edge_index
                .get(&(na, nb))
                .ok_or_else(|| {
                    FrameError::BadInput(format!(
                        "line load from ({}, {}) to ({}, {}) does not follow member elements",
                        start.x, start.y, end.x, end.y
                    ))
                })?;

            // Intensities in the element's own orientation
            let element = &self.elements[el];
            let (t_start, t_end) = if element.n1 == na {
                (ta, tb)
            } else {
                (tb, ta)
            };
            let p_start = f1 + (f2 - f1) * t_start;
            let p_end = f1 + (f2 - f1) * t_end;

            let x1 = self.nodes[element.n1].coords();
            let x2 = self.nodes[element.n2].coords();
            let (a_mat, l) = beam_transformation(&x1, &x2);

            // Decompose the global end intensities into the local frame
            let mut r_global_ends = Vec6::zeros();
            r_global_ends[0] = p_start.x;
            r_global_ends[1] = p_start.y;
            r_global_ends[3] = p_end.x;
            r_global_ends[4] = p_end.y;
            let r_local_ends = a_mat * r_global_ends;

            let r_local = consistent_line_load(
                &Vec2::new(r_local_ends[0], r_local_ends[1]),
                &Vec2::new(r_local_ends[3], r_local_ends[4]),
                l,
            );
            let r_global = a_mat.transpose() * r_local;

            self.element_local_loads[el] += r_local;
            let dofs = self.dof_map[el];
            for i in 0..6 {
                self.r_applied[dofs[i]] += r_global[i];
            }
        }

        Ok(())
    }

    /// Apply selfweight as a uniform vertical load per element of every
    /// member with selfweight enabled
    fn add_selfweight(&mut self) -> FrameResult<()> {
        let spans: Vec<(Vec2, Vec2, f64)> = self
            .members
            .iter()
            .filter(|m| m.selfweight_enabled)
            .flat_map(|m| {
                let w = m.rho * m.a * GRAVITY;
                m.elements
                    .iter()
                    .map(|&el| {
                        let e = &self.elements[el];
                        (self.nodes[e.n1].coords(), self.nodes[e.n2].coords(), w)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        for (x1, x2, w) in spans {
            let f = Vec2::new(0.0, w);
            self.add_line_load(&x1, &x2, &f, &f)?;
        }
        Ok(())
    }

    /// The currently applied global load vector
    pub fn applied_load_vector(&self) -> &[f64] {
        &self.r_applied
    }

    // ========================
    // Solution
    // ========================

    /// Assemble the global stiffness matrix (before support constraints)
    pub fn assemble_stiffness(&self) -> Mat {
        let mut builder = SystemMatrixBuilder::new(self.n_dofs);
        for (el, element) in self.elements.iter().enumerate() {
            let x1 = self.nodes[element.n1].coords();
            let x2 = self.nodes[element.n2].coords();
            let (a_mat, l) = beam_transformation(&x1, &x2);
            let k_local = beam_local_stiffness(element.e, element.a, element.i, l);
            let k_global = a_mat.transpose() * k_local * a_mat;
            builder.add_element_matrix(&self.dof_map[el], &k_global);
        }
        builder.to_dense()
    }

    /// Solve K v = R for the currently applied load and recover reactions and
    /// element section forces
    pub fn solve(&self) -> FrameResult<SolveResult> {
        let mut k = self.assemble_stiffness();
        let mut r = crate::math::Vec::from_column_slice(&self.r_applied);

        // Save the constrained rows for reaction recovery, then enforce the
        // supports by zeroing row/column and placing a unit diagonal
        let saved_rows: Vec<crate::math::Vec> = self
            .fixed_dofs
            .iter()
            .map(|&d| k.row(d).transpose())
            .collect();
        let saved_r: Vec<f64> = self.fixed_dofs.iter().map(|&d| r[d]).collect();

        for &d in &self.fixed_dofs {
            k.row_mut(d).fill(0.0);
            k.column_mut(d).fill(0.0);
            k[(d, d)] = 1.0;
            r[d] = 0.0;
        }

        // The constrained stiffness is positive-definite for a stable frame;
        // a failed Cholesky factorization means a mechanism or missing supports
        let v = k
            .clone()
            .cholesky()
            .map(|chol| chol.solve(&r))
            .ok_or(FrameError::Singular)?;
        if v.iter().any(|x| !x.is_finite() || x.abs() > 1e6) {
            return Err(FrameError::Singular);
        }

        let reactions: Vec<f64> = saved_rows
            .iter()
            .zip(saved_r.iter())
            .map(|(row, r0)| row.dot(&v) - r0)
            .collect();

        let nel = self.elements.len();
        let mut element_disp = Vec::with_capacity(nel);
        let mut n = Vec::with_capacity(nel);
        let mut vf = Vec::with_capacity(nel);
        let mut m = Vec::with_capacity(nel);

        for (el, element) in self.elements.iter().enumerate() {
            let dofs = self.dof_map[el];
            let mut ve = Vec6::zeros();
            for i in 0..6 {
                ve[i] = v[dofs[i]];
            }

            let x1 = self.nodes[element.n1].coords();
            let x2 = self.nodes[element.n2].coords();
            let (a_mat, l) = beam_transformation(&x1, &x2);
            let k_local = beam_local_stiffness(element.e, element.a, element.i, l);

            let re = k_local * (a_mat * ve) - self.element_local_loads[el];

            element_disp.push(ve);
            n.push([-re[0], re[3]]);
            vf.push([re[1], -re[4]]);
            m.push([-re[2], re[5]]);
        }

        for forces in [&n, &vf, &m] {
            if forces.iter().flatten().any(|x| !x.is_finite()) {
                return Err(FrameError::Numerical(
                    "section-force recovery produced non-finite values".into(),
                ));
            }
        }

        Ok(SolveResult {
            displacements: v.iter().copied().collect(),
            reactions,
            element_disp,
            n,
            v: vf,
            m,
        })
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProjectSettings;
    use crate::loads::collect_single_loads;
    use approx::assert_relative_eq;

    fn simply_supported_set() -> EntitySet {
        serde_json::from_str(
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
                            "deflectionRequirement": 400,
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
        .unwrap()
    }

    #[test]
    fn test_refinement_counts() {
        let set = simply_supported_set();
        let model = FrameModel::from_entities(&set).unwrap();
        // Two segments (0-2, 2-4) of 4 sub-elements each
        assert_eq!(model.n_elements(), 8);
        assert_eq!(model.n_nodes(), 9);
        assert_eq!(model.members[0].elements.len(), 8);
        assert_relative_eq!(model.members[0].length, 4.0, epsilon = 1e-12);
        // Pinned (2) + roller (1)
        assert_eq!(model.fixed_dofs.len(), 3);
    }

    #[test]
    fn test_stiffness_symmetry_before_supports() {
        let set = simply_supported_set();
        let model = FrameModel::from_entities(&set).unwrap();
        let k = model.assemble_stiffness();
        for i in 0..model.n_dofs {
            for j in 0..model.n_dofs {
                assert_relative_eq!(k[(i, j)], k[(j, i)], max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_midspan_point_load_moment() {
        let set = simply_supported_set();
        let mut model = FrameModel::from_entities(&set).unwrap();
        let settings = ProjectSettings {
            selfweight_on_off: false,
            ..Default::default()
        };
        let loads = collect_single_loads(&set, &settings);
        assert_eq!(loads.len(), 1);

        model.clear_loads();
        model.apply_load(&loads[0]).unwrap();
        let result = model.solve().unwrap();

        // M = PL/4 = 10 kNm at midspan
        let max_m = result
            .m
            .iter()
            .flatten()
            .fold(0.0f64, |acc, &v| acc.max(v.abs()));
        assert_relative_eq!(max_m, 10e3, max_relative = 1e-6);

        // V = P/2 on either side
        let max_v = result
            .v
            .iter()
            .flatten()
            .fold(0.0f64, |acc, &v| acc.max(v.abs()));
        assert_relative_eq!(max_v, 5e3, max_relative = 1e-6);

        // Reactions balance the applied load
        let sum_fy: f64 = model
            .fixed_dofs
            .iter()
            .zip(result.reactions.iter())
            .filter(|(&d, _)| d % 3 == 1)
            .map(|(_, r)| r)
            .sum();
        assert_relative_eq!(sum_fy, 10e3, max_relative = 1e-9);
    }

    #[test]
    fn test_missing_support_node_is_error() {
        let mut set = simply_supported_set();
        set.supports.get_mut("s2").unwrap().resolved.x = 5.0;
        assert!(matches!(
            FrameModel::from_entities(&set),
            Err(FrameError::NoNodeAtCoordinate(_, _))
        ));
    }

    #[test]
    fn test_unsupported_roller_angle_is_error() {
        let mut set = simply_supported_set();
        set.supports.get_mut("s2").unwrap().angle = Some(45.0);
        assert!(FrameModel::from_entities(&set).is_err());
    }

    #[test]
    fn test_underdetermined_frame_is_singular() {
        let mut set = simply_supported_set();
        // Roller only: horizontal translation and rigid rotation are free
        set.supports.remove("s1");
        set.members.get_mut("m1").unwrap().dependants.retain(|d| d != "s1");
        let mut model = FrameModel::from_entities(&set).unwrap();
        let settings = ProjectSettings {
            selfweight_on_off: false,
            ..Default::default()
        };
        let loads = collect_single_loads(&set, &settings);
        model.apply_load(&loads[0]).unwrap();
        assert!(matches!(model.solve(), Err(FrameError::Singular)));
    }
}
