//! Error types for the apply orchestrator.

use crate::client::ClientError;
use crate::diff::FieldDiff;
use crate::model::ValidationError;
use crate::ops::ExecuteError;
use std::time::Duration;
use thiserror::Error;

/// The requested change cannot be performed. Always fatal, never retried.
#[derive(Debug, Error)]
pub enum InfeasibleError {
    #[error("creation of {0} is blocked by lifecycle policy")]
    CreationBlocked(String),

    #[error("acquisition of existing resource {0} is blocked by lifecycle policy")]
    AcquireBlocked(String),

    #[error("modification of {0} is blocked by lifecycle policy")]
    ModificationBlocked(String),

    /// An immutable field diverged; converging would require deleting and
    /// recreating the resource, which apply never does silently.
    #[error("update of {name} requires recreation; immutable field(s) changed: {fields}")]
    RequiresRecreate { name: String, fields: String },
}

/// Errors from one apply call.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Infeasible(#[from] InfeasibleError),

    /// An imperative operation failed; names which one.
    #[error("{kind} operation failed: {source}")]
    Operation {
        kind: &'static str,
        source: ExecuteError,
    },

    /// The server did not converge to the requested state. Carries every
    /// residual diff for diagnosis.
    #[error("state differs after apply: {}", format_diffs(.diffs))]
    DiffAfterApply { diffs: Vec<FieldDiff> },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("apply timed out after {0:?}")]
    Timeout(Duration),
}

impl ApplyError {
    /// Conflict-class errors are the only ones the outer retry loop acts
    /// on; everything else propagates immediately.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Client(e) => e.is_conflict(),
            Self::Operation {
                source: ExecuteError::Client(e),
                ..
            } => e.is_conflict(),
            _ => false,
        }
    }
}

fn format_diffs(diffs: &[FieldDiff]) -> String {
    diffs
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
