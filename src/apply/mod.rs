//! Apply orchestrator: the declarative reconcile loop.
//!
//! One apply cycle is strictly ordered: validate, fetch, diff, gate, plan,
//! execute, re-fetch, reconcile. Concurrent appliers on the same resource
//! are expected; correctness under contention comes from optimistic
//! concurrency — a conflict-class failure restarts the whole cycle from a
//! fresh fetch under the caller's bounded retry policy. No lock is held
//! across network round trips.

mod error;

pub use error::{ApplyError, InfeasibleError};

use crate::client::{AssignmentClient, ClientError};
use crate::config::RetryConfig;
use crate::diff::{diff, requires_recreate};
use crate::model::{content_hash, validate, AssignmentRef, OsPolicyAssignment, ParentRef};
use crate::ops::{plan, OperationContext};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Lifecycle gates: which resource transitions the caller permits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecyclePolicy {
    /// Fail instead of creating a missing resource.
    pub block_create: bool,
    /// Fail instead of taking ownership of a resource that already exists.
    pub block_acquire: bool,
    /// Fail instead of modifying an existing resource.
    pub block_modify: bool,
}

/// Options for one apply call.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Project/location used for identity fields the desired state omits.
    pub parent: ParentRef,
    pub lifecycle: LifecyclePolicy,
    /// Overall deadline for the call, including retries and rollout waits.
    pub timeout: Option<Duration>,
    /// Conflict retry policy; falls back to the client configuration.
    pub retry: Option<RetryConfig>,
    /// Cancels at the next suspension point, including inside the rollout
    /// waiter's poll loop.
    pub cancel: CancellationToken,
}

impl ApplyOptions {
    pub fn new(parent: ParentRef) -> Self {
        Self {
            parent,
            lifecycle: LifecyclePolicy::default(),
            timeout: None,
            retry: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl AssignmentClient {
    /// Converge the live resource to the desired state.
    ///
    /// Returns the final server state once a post-apply re-fetch diffs
    /// clean against the (server-canonicalized) desired state. A residual
    /// diff after apply is an error, never silently dropped.
    pub async fn apply(
        &self,
        desired: &OsPolicyAssignment,
        options: &ApplyOptions,
    ) -> Result<OsPolicyAssignment, ApplyError> {
        match options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.apply_with_retry(desired, options))
                .await
                .map_err(|_| ApplyError::Timeout(limit))?,
            None => self.apply_with_retry(desired, options).await,
        }
    }

    async fn apply_with_retry(
        &self,
        desired: &OsPolicyAssignment,
        options: &ApplyOptions,
    ) -> Result<OsPolicyAssignment, ApplyError> {
        let retry = options
            .retry
            .clone()
            .unwrap_or_else(|| self.config().retry.clone());
        let mut backoff = retry.backoff();
        let mut attempt = 1u32;

        loop {
            match self.apply_once(desired, options).await {
                Err(err) if err.is_conflict() && attempt < retry.max_attempts => {
                    metrics::counter!("ospolicy_apply_conflicts_total").increment(1);
                    tracing::warn!(
                        attempt,
                        max_attempts = retry.max_attempts,
                        error = %err,
                        "conflict detected, restarting apply from a fresh fetch"
                    );
                    let delay = backoff.next_delay();
                    tokio::select! {
                        _ = options.cancel.cancelled() => {
                            return Err(ClientError::Cancelled.into());
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn apply_once(
        &self,
        desired: &OsPolicyAssignment,
        options: &ApplyOptions,
    ) -> Result<OsPolicyAssignment, ApplyError> {
        let cycle = Uuid::new_v4();
        metrics::counter!("ospolicy_apply_cycles_total").increment(1);

        validate(desired)?;
        let target = AssignmentRef::for_assignment(desired, &options.parent)
            .map_err(ApplyError::Validation)?;

        let initial = match self.get(&target, &options.cancel).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };

        let creating = initial.is_none();
        let diffs = match initial {
            None => Vec::new(),
            Some(snapshot) => {
                let actual = snapshot.into_assignment(&target);
                diff(desired, &actual)
            }
        };

        tracing::info!(
            cycle = %cycle,
            target = %target,
            creating,
            diff_count = diffs.len(),
            "reconcile cycle started"
        );

        // Lifecycle gating happens before any mutation is issued.
        if creating && options.lifecycle.block_create {
            return Err(InfeasibleError::CreationBlocked(target.resource_path()).into());
        }
        if !creating && options.lifecycle.block_acquire {
            return Err(InfeasibleError::AcquireBlocked(target.resource_path()).into());
        }
        let recreate_fields = requires_recreate(&diffs);
        if !recreate_fields.is_empty() {
            return Err(InfeasibleError::RequiresRecreate {
                name: target.resource_path(),
                fields: recreate_fields.join(", "),
            }
            .into());
        }
        let mutates_server_state = diffs.iter().any(|d| d.mask_field.is_some());
        if !creating && mutates_server_state && options.lifecycle.block_modify {
            return Err(InfeasibleError::ModificationBlocked(target.resource_path()).into());
        }

        let operations = plan(creating, diffs);
        let ctx = OperationContext {
            client: self,
            target: &target,
            desired,
            cancel: &options.cancel,
        };

        let mut operation_response: Option<OsPolicyAssignment> = None;
        for operation in &operations {
            tracing::debug!(cycle = %cycle, kind = operation.kind(), "executing operation");
            match operation.execute(&ctx).await {
                Ok(Some(result)) => operation_response = Some(result),
                Ok(None) => {}
                Err(source) => {
                    return Err(ApplyError::Operation {
                        kind: operation.kind(),
                        source,
                    })
                }
            }
        }

        // The re-fetch can lag the mutating call's own response, so fields
        // only the latter reported are merged in.
        let refetched = self.get(&target, &options.cancel).await?;
        let mut final_state = refetched.into_assignment(&target);
        if let Some(extra) = &operation_response {
            final_state.merge_missing(extra);
        }

        let new_desired = desired.reconciled_with(&final_state);
        // Hash equality is a cheap "likely converged" short-circuit; the
        // structural diff is the authority whenever the hashes differ.
        let residual = if content_hash(&new_desired) == content_hash(&final_state) {
            Vec::new()
        } else {
            diff(&new_desired, &final_state)
        };
        if residual.is_empty() {
            tracing::info!(cycle = %cycle, target = %target, "converged");
            Ok(final_state)
        } else {
            Err(ApplyError::DiffAfterApply { diffs: residual })
        }
    }
}
