//! Validation error types for desired state.

use thiserror::Error;

/// Errors raised while validating a desired assignment before any network
/// call is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value '{value}' for field '{field}', expected one of {allowed:?}")]
    InvalidEnum {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("invalid field '{field}': {message}")]
    Invalid { field: String, message: String },
}
