//! Model error types
//!
//! Defines the standardized error type for fitting, transforming and
//! predicting.

use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while fitting or applying a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Insufficient rows for the operation
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Invalid hyper-parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Model has not been fitted yet
    #[error("Model must be fitted before use")]
    NotFitted,

    /// Input dimensions do not match what the model expects
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Input columns differ from the ones seen during fit
    #[error("Feature names mismatch: fitted on {expected:?}, got {actual:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Invalid input values
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
