//! Errors while awaiting a long-running operation.

use crate::client::ClientError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaitError {
    /// The operation reached a terminal failure state.
    #[error("operation {name} failed with code {code}: {message}")]
    Failed {
        name: String,
        code: i32,
        message: String,
    },

    /// A poll request itself failed.
    #[error("polling operation failed: {0}")]
    Poll(#[from] ClientError),

    #[error("rollout did not complete within {0:?}")]
    TimedOut(Duration),

    #[error("cancelled while awaiting rollout")]
    Cancelled,
}

impl From<WaitError> for ClientError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::Poll(inner) => inner,
            WaitError::Failed { name, code, message } => ClientError::OperationFailed {
                code,
                message: format!("{name}: {message}"),
            },
            WaitError::TimedOut(elapsed) => ClientError::Timeout(elapsed.as_secs()),
            WaitError::Cancelled => ClientError::Cancelled,
        }
    }
}
