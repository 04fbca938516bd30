//! Error types for druidq-core

use thiserror::Error;

/// Construction-time validation errors
///
/// Every value type in the query model is checked when it is built, so a
/// value that exists is always encodable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),

    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: String, end: String },

    #[error("Unknown granularity: {0}")]
    UnknownGranularity(String),

    #[error("Unknown arithmetic function: {0}")]
    UnknownArithmeticFunction(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("{field} requires at least {required} operands, got {actual}")]
    NotEnoughOperands {
        field: &'static str,
        required: usize,
        actual: usize,
    },
}

/// Result type alias for validation
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Deepest filter or post-aggregator tree accepted at build time
///
/// Encoding recurses once per level, so this bounds native stack use.
pub const MAX_TREE_DEPTH: usize = 256;

/// Fail with `InvalidValue` if a tree node sits deeper than [`MAX_TREE_DEPTH`]
pub fn check_depth(field: &'static str, depth: usize) -> Result<()> {
    if depth > MAX_TREE_DEPTH {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("nesting depth exceeds {}", MAX_TREE_DEPTH),
        });
    }
    Ok(())
}

/// Fail with `EmptyField` if `value` is blank
pub fn require_non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
