//! Error types for the preprocessing walkthrough

use thiserror::Error;

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Cannot fit on column '{0}': no observed values")]
    EmptyInput(String),

    #[error("Transformer not fitted")]
    NotFitted,

    #[error("Transformer already fitted; fitted state is never re-learned")]
    AlreadyFitted,

    #[error("Unknown category '{category}' in column '{column}'")]
    UnknownCategory { column: String, category: String },

    /// A value that cannot be represented as a number reached the model.
    #[error("Cannot convert column '{column}' to numeric: {reason}")]
    ValueConversion { column: String, reason: String },

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrepError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PrepError {
    fn from(err: ndarray::ShapeError) -> Self {
        PrepError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
