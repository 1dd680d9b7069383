//! Long-running operation handling.
//!
//! Mutating calls return an operation handle that resolves asynchronously
//! while the server rolls the change out across the fleet. The waiter polls
//! the handle until it reports terminal success or failure. This is an
//! inner wait loop scoped to one imperative call; it never counts against
//! the outer apply retry budget.

mod error;

pub use error::WaitError;

use crate::client::AssignmentClient;
use crate::config::PollConfig;
use crate::model::{AssignmentRef, OsPolicyAssignment, Snapshot};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Server-assigned handle for an asynchronous operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationHandle {
    /// Pollable operation name, e.g.
    /// `projects/p/locations/l/osPolicyAssignments/a/operations/op-1`.
    pub name: String,
    pub done: bool,
    pub error: Option<OperationStatus>,
    pub response: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

/// Terminal error reported by a failed operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OperationStatus {
    pub code: i32,
    pub message: String,
}

impl OperationHandle {
    /// The resource embedded in a terminal operation's response, when the
    /// server included one. The immediate response can carry fields a
    /// subsequent re-fetch has not caught up to yet.
    pub fn response_assignment(&self, hint: &AssignmentRef) -> Option<OsPolicyAssignment> {
        let payload = self.response.clone()?;
        match Snapshot::normalize(payload, hint) {
            Ok(Snapshot::Present(assignment)) => Some(assignment),
            _ => None,
        }
    }
}

/// Polls one operation handle until terminal.
pub struct RolloutWaiter<'a> {
    client: &'a AssignmentClient,
    poll: PollConfig,
}

impl<'a> RolloutWaiter<'a> {
    pub fn new(client: &'a AssignmentClient) -> Self {
        Self {
            client,
            poll: client.config().poll.clone(),
        }
    }

    /// Poll until the operation is done, its rollout failed, the wait
    /// deadline elapsed, or the caller cancelled.
    pub async fn wait(
        &self,
        mut handle: OperationHandle,
        cancel: &CancellationToken,
    ) -> Result<OperationHandle, WaitError> {
        let started = Instant::now();
        let deadline = Duration::from_secs(self.poll.timeout_seconds);
        let mut backoff = self.poll.backoff();

        loop {
            if handle.done {
                metrics::histogram!("ospolicy_rollout_wait_seconds")
                    .record(started.elapsed().as_secs_f64());
                if let Some(status) = handle.error.take() {
                    return Err(WaitError::Failed {
                        name: handle.name,
                        code: status.code,
                        message: status.message,
                    });
                }
                tracing::debug!(operation = %handle.name, "operation completed");
                return Ok(handle);
            }

            if started.elapsed() >= deadline {
                return Err(WaitError::TimedOut(deadline));
            }

            let delay = backoff.next_delay();
            tokio::select! {
                _ = cancel.cancelled() => return Err(WaitError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }

            tracing::trace!(operation = %handle.name, "polling operation");
            handle = self.client.poll_operation(&handle.name, cancel).await?;
        }
    }
}
