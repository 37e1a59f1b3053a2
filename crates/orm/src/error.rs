//! Error types for the record-mapping layer
//!
//! Covers relation path validation at declaration time and the
//! failures that can surface while eager-loading relations.

/// Result type alias for record and relation operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Validation errors for dotted relation paths.
///
/// Paths are checked in a fixed order: emptiness, leading dot, trailing
/// dot, then consecutive dots. A path like `".."` therefore reports
/// `LeadingDot`, not `ConsecutiveDots`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("relation path is empty")]
    Empty,

    #[error("relation path '{0}' starts with a dot")]
    LeadingDot(String),

    #[error("relation path '{0}' ends with a dot")]
    TrailingDot(String),

    #[error("relation path '{0}' contains consecutive dots")]
    ConsecutiveDots(String),
}

/// Error type for record mapping and eager loading
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("model '{model}' has no relation named '{relation}'")]
    UnknownRelation { model: String, relation: String },

    #[error("failed to fetch relation '{relation}': {message}")]
    Fetch { relation: String, message: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        ModelError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}
