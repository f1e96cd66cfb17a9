//! Load declarations and the per-load solve list
//!
//! Every declared load (and selfweight, when enabled) becomes one
//! [`SingleLoad`]; the assembler solves the frame once per single load and
//! stores the raw section forces. All downstream combination coefficients
//! refer to the single-load ordering established here.

use serde::{Deserialize, Serialize};

use crate::entities::{EntitySet, ProjectSettings, WireLoadKind};
use crate::error::FrameResult;
use crate::math::Vec2;
use crate::model::{FrameModel, SolveResult};

/// Eurocode load category (DK NA naming)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoadCategory {
    Egenlast,
    Nyttelast,
    Snelast,
    Standard,
    Temperaturlast,
    Vindlast,
}

impl LoadCategory {
    pub fn from_wire(kind: WireLoadKind) -> Self {
        match kind {
            WireLoadKind::Dead => LoadCategory::Egenlast,
            WireLoadKind::Live => LoadCategory::Nyttelast,
            WireLoadKind::Snow => LoadCategory::Snelast,
            WireLoadKind::Wind => LoadCategory::Vindlast,
            WireLoadKind::Temperature => LoadCategory::Temperaturlast,
            WireLoadKind::Standard => LoadCategory::Standard,
        }
    }

    /// Danish label used in combination names
    pub fn label(&self) -> &'static str {
        match self {
            LoadCategory::Egenlast => "Egenlast",
            LoadCategory::Nyttelast => "Nyttelast",
            LoadCategory::Snelast => "Snelast",
            LoadCategory::Vindlast => "Vindlast",
            LoadCategory::Temperaturlast => "Temperaturlast",
            LoadCategory::Standard => "Standard",
        }
    }

    /// Permanent actions fold into the gravity branch of every combination
    pub fn is_dead(&self) -> bool {
        matches!(self, LoadCategory::Egenlast)
    }
}

/// Geometric form of a single load, in SI base units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadForm {
    Point {
        position: Vec2,
        /// Global (Fx, Fy) [N]
        force: Vec2,
    },
    Line {
        start: Vec2,
        end: Vec2,
        /// Global intensities at the start/end [N/m]
        force_start: Vec2,
        force_end: Vec2,
    },
    Moment {
        position: Vec2,
        /// [Nm]
        m0: f64,
    },
    /// Expanded into per-member distributed vertical loads at solve time
    Selfweight,
}

/// One column of the combination coefficient matrices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleLoad {
    /// Declared entity id, or "All deadloads" for selfweight
    pub id: String,
    pub category: LoadCategory,
    pub form: LoadForm,
}

impl SingleLoad {
    fn point(id: &str, entity: &crate::entities::PointLoadEntity) -> Self {
        // Angle convention: 90 degrees is straight down
        let theta = entity.angle.unwrap_or(90.0).to_radians();
        let f = entity.magnitude.abs() * 1e3;
        Self {
            id: id.to_string(),
            category: LoadCategory::from_wire(entity.kind),
            form: LoadForm::Point {
                position: Vec2::new(entity.resolved.x, entity.resolved.y),
                force: Vec2::new(-f * theta.cos(), -f * theta.sin()),
            },
        }
    }

    fn line(id: &str, entity: &crate::entities::DistributedLoadEntity) -> Self {
        let (p1, p2) = if entity.resolved.point1.x <= entity.resolved.point2.x {
            (entity.resolved.point1, entity.resolved.point2)
        } else {
            (entity.resolved.point2, entity.resolved.point1)
        };
        let start = Vec2::new(p1.x, p1.y);
        let end = Vec2::new(p2.x, p2.y);
        let span = end - start;
        let c = span.norm().max(f64::MIN_POSITIVE);

        let flip = if entity.wind_flip.unwrap_or(false) {
            -1.0
        } else {
            1.0
        };
        let m1 = entity.magnitude1 * 1e3;
        let m2 = entity.magnitude2 * 1e3;

        let category = LoadCategory::from_wire(entity.kind);
        let (f1, f2) = match category {
            // Snow acts on the plan projection of the span
            LoadCategory::Snelast => {
                let scale = (span.x / c).abs();
                (Vec2::new(0.0, -scale * m1), Vec2::new(0.0, -scale * m2))
            }
            // Wind acts perpendicular to the span
            LoadCategory::Vindlast => (
                Vec2::new(flip * m1 / c * span.y, -flip * m1 / c * span.x),
                Vec2::new(flip * m2 / c * span.y, -flip * m2 / c * span.x),
            ),
            _ => (Vec2::new(0.0, -m1), Vec2::new(0.0, -m2)),
        };

        Self {
            id: id.to_string(),
            category,
            form: LoadForm::Line {
                start,
                end,
                force_start: f1,
                force_end: f2,
            },
        }
    }

    fn moment(id: &str, entity: &crate::entities::MomentLoadEntity) -> Self {
        Self {
            id: id.to_string(),
            category: LoadCategory::from_wire(entity.kind),
            form: LoadForm::Moment {
                position: Vec2::new(entity.resolved.x, entity.resolved.y),
                m0: entity.magnitude * 1e3,
            },
        }
    }

    fn selfweight() -> Self {
        Self {
            id: "All deadloads".to_string(),
            category: LoadCategory::Egenlast,
            form: LoadForm::Selfweight,
        }
    }
}

/// Build the ordered single-load list from the entity set
///
/// Declared loads come first (points, lines, moments, each in id order),
/// then the synthetic selfweight load when the project toggle is on.
pub fn collect_single_loads(set: &EntitySet, settings: &ProjectSettings) -> Vec<SingleLoad> {
    let mut loads = Vec::new();
    for (id, e) in &set.point_loads {
        loads.push(SingleLoad::point(id, e));
    }
    for (id, e) in &set.distributed_loads {
        loads.push(SingleLoad::line(id, e));
    }
    for (id, e) in &set.moment_loads {
        loads.push(SingleLoad::moment(id, e));
    }
    if settings.selfweight_on_off {
        loads.push(SingleLoad::selfweight());
    }
    loads
}

/// Per-load solver results, in single-load order
#[derive(Debug, Clone)]
pub struct LoadCaseResults {
    pub loads: Vec<SingleLoad>,
    pub results: Vec<SolveResult>,
}

impl LoadCaseResults {
    /// Solve the frame once per single load
    pub fn assemble(model: &mut FrameModel, loads: Vec<SingleLoad>) -> FrameResult<Self> {
        let mut results = Vec::with_capacity(loads.len());
        for load in &loads {
            log::debug!("solving single load '{}' ({:?})", load.id, load.category);
            model.clear_loads();
            model.apply_load(load)?;
            results.push(model.solve()?);
        }
        Ok(Self { loads, results })
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_load_resolution() {
        let e: crate::entities::PointLoadEntity = serde_json::from_str(
            r#"{"resolved": {"x": 1.0, "y": 0.0}, "magnitude": 10.0, "type": "Live"}"#,
        )
        .unwrap();
        let l = SingleLoad::point("pl1", &e);
        match l.form {
            LoadForm::Point { force, .. } => {
                assert_relative_eq!(force.x, 0.0, epsilon = 1e-6);
                assert_relative_eq!(force.y, -10000.0, epsilon = 1e-6);
            }
            _ => panic!("expected point load"),
        }
        assert_eq!(l.category, LoadCategory::Nyttelast);
    }

    #[test]
    fn test_wind_line_load_is_perpendicular() {
        // Vertical windward column, 1 kN/m
        let e: crate::entities::DistributedLoadEntity = serde_json::from_str(
            r#"{
                "resolved": {"point1": {"x": 0.0, "y": 0.0}, "point2": {"x": 0.0, "y": 3.0}},
                "magnitude1": 1.0, "magnitude2": 1.0, "type": "Wind"
            }"#,
        )
        .unwrap();
        let l = SingleLoad::line("dl1", &e);
        match l.form {
            LoadForm::Line {
                force_start,
                force_end,
                ..
            } => {
                // Span is +Y, so the pressure acts along +X
                assert_relative_eq!(force_start.x, 1000.0, epsilon = 1e-6);
                assert_relative_eq!(force_start.y, 0.0, epsilon = 1e-6);
                assert_relative_eq!(force_end.x, 1000.0, epsilon = 1e-6);
            }
            _ => panic!("expected line load"),
        }
    }

    #[test]
    fn test_snow_scaling_on_slope() {
        // 45 degree roof: plan projection scale is cos(45)
        let e: crate::entities::DistributedLoadEntity = serde_json::from_str(
            r#"{
                "resolved": {"point1": {"x": 0.0, "y": 0.0}, "point2": {"x": 2.0, "y": 2.0}},
                "magnitude1": 1.0, "magnitude2": 1.0, "type": "Snow"
            }"#,
        )
        .unwrap();
        let l = SingleLoad::line("dl2", &e);
        match l.form {
            LoadForm::Line { force_start, .. } => {
                assert_relative_eq!(
                    force_start.y,
                    -1000.0 * std::f64::consts::FRAC_1_SQRT_2,
                    epsilon = 1e-6
                );
            }
            _ => panic!("expected line load"),
        }
    }

    #[test]
    fn test_selfweight_appended_last() {
        let set = EntitySet::default();
        let settings = ProjectSettings::default();
        let loads = collect_single_loads(&set, &settings);
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].id, "All deadloads");
        assert!(loads[0].category.is_dead());
    }
}
