//! Error types for API client operations.

use thiserror::Error;

/// Errors that can occur while talking to the OS policy service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its deadline.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Optimistic-concurrency collision (HTTP 409-class).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The server rejected the request (other 4xx/5xx).
    #[error("server error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// A long-running operation reached a terminal failure state.
    #[error("operation failed with code {code}: {message}")]
    OperationFailed { code: i32, message: String },

    /// The response body does not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The resource was still visible after the delete confirmation budget.
    #[error("resource {0} still present after delete")]
    DeleteUnconfirmed(String),

    /// Client construction or configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
