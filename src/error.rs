//! Error types for the lendscore crate

use thiserror::Error;

/// Result type alias for scoring operations
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Main error type for the credit scoring core
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Persisted artifact is corrupt: {0}")]
    ArtifactCorruption(String),

    #[error("Feature order mismatch: expected {expected:?}, got {actual:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        ScoringError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for ScoringError {
    fn from(err: bincode::Error) -> Self {
        ScoringError::SerializationError(err.to_string())
    }
}
