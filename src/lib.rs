//! frame-check - 2D frame analysis with Eurocode design checks
//!
//! This library analyzes planar building frames under a declarative entity
//! set and evaluates limit-state utilization ratios per the Danish national
//! annexes, supporting:
//! - Euler-Bernoulli frame elements with hinges and member refinement
//! - Per-load linear solves superposed into EN 1990 load combinations
//!   (ULS 6.10a/b, fire ALS, characteristic SLS)
//! - Steel checks (DS/EN 1993), timber checks (DS/EN 1995) and masonry
//!   checks (DS/EN 1996)
//! - Governing-combination selection per member and rule
//!
//! ## Example
//! ```rust,no_run
//! use frame_check::prelude::*;
//!
//! let json = std::fs::read_to_string("frame.json").unwrap();
//! let entities: EntitySet = serde_json::from_str(&json).unwrap();
//!
//! let settings = ProjectSettings::default();
//! let analysis = Analysis::run(&entities, settings).unwrap();
//!
//! for member in &analysis.results.ur {
//!     println!("{}: {:?}", member.member_name, member.uls.ur_critical_load_comb);
//! }
//! ```

pub mod analysis;
pub mod checks;
pub mod combinations;
pub mod discretize;
pub mod elements;
pub mod entities;
pub mod error;
pub mod loads;
pub mod materials;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::Analysis;
    pub use crate::combinations::{LimitState, LimitStateCombinations};
    pub use crate::discretize::{DiscretizedMember, Discretization};
    pub use crate::elements::{Element, Member, MemberMaterial, MemberType, Node, Support};
    pub use crate::entities::{ConsequenceClass, EntitySet, ProjectSettings};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::{LoadCategory, SingleLoad};
    pub use crate::model::FrameModel;
    pub use crate::results::{AnalysisResults, MemberVerification};
}
