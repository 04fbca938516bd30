//! Query error types

use druidq_core::ValidationError;
use thiserror::Error;

/// Failure while rendering a validated query to JSON
///
/// A query that passed `build()` should always encode; this error signals a
/// broken internal invariant rather than bad caller input.
#[derive(Debug, Error)]
#[error("Encoding error: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Query errors
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        QueryError::Encode(EncodeError(e))
    }
}
