//! Error types for frame analysis and design checks

use thiserror::Error;

/// Main error type for analysis operations
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Node '{0}' not found in entity set")]
    NodeNotFound(String),

    #[error("Member '{0}' not found in entity set")]
    MemberNotFound(String),

    #[error("No node exists at coordinate ({0}, {1})")]
    NoNodeAtCoordinate(f64, f64),

    #[error("Invalid input: {0}")]
    BadInput(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Singular stiffness matrix - model may be a mechanism or have insufficient supports")]
    Singular,

    #[error("Numerical issue: {0}")]
    Numerical(String),

    #[error("Unsupported configuration: {0}")]
    Unsupported(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for analysis operations
pub type FrameResult<T> = Result<T, FrameError>;
