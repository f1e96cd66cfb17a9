//! Support conditions

use serde::{Deserialize, Serialize};

use crate::entities::SupportKind;
use crate::error::{FrameError, FrameResult};
use crate::math::Vec2;

/// A nodal degree of freedom direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dof {
    X,
    Y,
    R,
}

impl Dof {
    /// Offset within a node's DOF triplet
    pub fn offset(&self) -> usize {
        match self {
            Dof::X => 0,
            Dof::Y => 1,
            Dof::R => 2,
        }
    }

    /// Direction tag used in the reactions view
    pub fn tag(&self) -> &'static str {
        match self {
            Dof::X => "x",
            Dof::Y => "y",
            Dof::R => "r",
        }
    }
}

/// A support at a coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Support {
    pub position: Vec2,
    pub kind: SupportKind,
    /// Roller orientation [degrees]
    pub angle: f64,
}

impl Support {
    pub fn new(position: Vec2, kind: SupportKind, angle: Option<f64>) -> Self {
        Self {
            position,
            kind,
            angle: angle.unwrap_or(0.0),
        }
    }

    /// The nodal DOFs this support fixes
    ///
    /// Rollers are only supported at the four axis-aligned angles.
    pub fn fixed_dofs(&self) -> FrameResult<Vec<Dof>> {
        match self.kind {
            SupportKind::Fixed => Ok(vec![Dof::X, Dof::Y, Dof::R]),
            SupportKind::Pinned => Ok(vec![Dof::X, Dof::Y]),
            SupportKind::Roller => {
                let a = self.angle.rem_euclid(360.0);
                if (a - 0.0).abs() < 1e-9 || (a - 180.0).abs() < 1e-9 {
                    Ok(vec![Dof::Y])
                } else if (a - 90.0).abs() < 1e-9 || (a - 270.0).abs() < 1e-9 {
                    Ok(vec![Dof::X])
                } else {
                    Err(FrameError::BadInput(format!(
                        "roller support at angle {} is not supported",
                        self.angle
                    )))
                }
            }
        }
    }
}
