//! Operation planning and execution.
//!
//! Diffs are grouped into imperative operations; each operation builds its
//! request from the desired state, sends the mutating call, and hands the
//! returned operation handle to the rollout waiter unless the caller opted
//! out of awaiting rollout.


use crate::client::{AssignmentClient, ClientError};
use crate::diff::{FieldDiff, UpdateOp};
use crate::lro::{RolloutWaiter, WaitError};
use crate::model::{AssignmentRef, OsPolicyAssignment};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors from executing one operation.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Wait(#[from] WaitError),
}

impl From<ExecuteError> for ClientError {
    fn from(err: ExecuteError) -> Self {
        match err {
            ExecuteError::Client(inner) => inner,
            ExecuteError::Wait(inner) => inner.into(),
        }
    }
}

/// Everything an operation needs to execute: the client, the target
/// identity, and the desired state it was planned from.
pub struct OperationContext<'a> {
    pub client: &'a AssignmentClient,
    pub target: &'a AssignmentRef,
    pub desired: &'a OsPolicyAssignment,
    pub cancel: &'a CancellationToken,
}

/// One unit of imperative work. A closed set: every mutation the service
/// supports is one of these.
#[derive(Debug)]
pub enum Operation {
    Create(CreateOperation),
    Update(UpdateOperation),
    Delete(DeleteOperation),
}

#[derive(Debug, Default)]
pub struct CreateOperation;

/// In-place update addressing the diffs of one update endpoint.
#[derive(Debug)]
pub struct UpdateOperation {
    pub op: UpdateOp,
    pub diffs: Vec<FieldDiff>,
}

#[derive(Debug, Default)]
pub struct DeleteOperation;

impl Operation {
    pub fn delete() -> Self {
        Self::Delete(DeleteOperation)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }

    /// Execute this operation. Returns the assignment embedded in the
    /// terminal operation response, when the server included one and the
    /// rollout was awaited.
    pub async fn execute(
        &self,
        ctx: &OperationContext<'_>,
    ) -> Result<Option<OsPolicyAssignment>, ExecuteError> {
        match self {
            Self::Create(op) => op.execute(ctx).await,
            Self::Update(op) => op.execute(ctx).await,
            Self::Delete(op) => op.execute(ctx).await,
        }
    }
}

/// Build the ordered operation plan for one apply cycle.
///
/// Creation needs exactly one Create regardless of diffs. Updates dedupe
/// by update-endpoint identity in first-seen order: several fields sharing
/// one endpoint collapse into a single operation.
pub fn plan(create: bool, diffs: Vec<FieldDiff>) -> Vec<Operation> {
    if create {
        return vec![Operation::Create(CreateOperation)];
    }

    let mut order: Vec<UpdateOp> = Vec::new();
    for diff in &diffs {
        if let Some(op) = diff.update_op {
            if !order.contains(&op) {
                order.push(op);
            }
        }
    }

    order
        .into_iter()
        .map(|op| {
            let owned: Vec<FieldDiff> = diffs
                .iter()
                .filter(|d| d.update_op == Some(op))
                .cloned()
                .collect();
            Operation::Update(UpdateOperation { op, diffs: owned })
        })
        .collect()
}

/// The server-facing update mask for a set of diffs: deduplicated
/// top-level field names in first-seen order. Client-side-only fields
/// carry no mask entry and are excluded entirely.
pub fn update_mask(diffs: &[FieldDiff]) -> String {
    let mut fields: Vec<&str> = Vec::new();
    for diff in diffs {
        if let Some(mask) = diff.mask_field {
            if !fields.contains(&mask) {
                fields.push(mask);
            }
        }
    }
    fields.join(",")
}

impl CreateOperation {
    async fn execute(
        &self,
        ctx: &OperationContext<'_>,
    ) -> Result<Option<OsPolicyAssignment>, ExecuteError> {
        tracing::info!(target = %ctx.target, "creating assignment");
        let handle = ctx
            .client
            .create_assignment(ctx.target, ctx.desired, ctx.cancel)
            .await?;
        await_rollout(ctx, handle).await
    }
}

impl UpdateOperation {
    async fn execute(
        &self,
        ctx: &OperationContext<'_>,
    ) -> Result<Option<OsPolicyAssignment>, ExecuteError> {
        let mask = update_mask(&self.diffs);
        if mask.is_empty() {
            tracing::debug!(
                target = %ctx.target,
                "update mask empty after excluding client-side fields, nothing to send"
            );
            return Ok(None);
        }

        tracing::info!(
            target = %ctx.target,
            update_mask = %mask,
            diff_count = self.diffs.len(),
            "patching assignment"
        );
        let handle = match self.op {
            UpdateOp::PatchAssignment => {
                ctx.client
                    .patch_assignment(ctx.target, ctx.desired, &mask, ctx.cancel)
                    .await?
            }
        };
        await_rollout(ctx, handle).await
    }
}

impl DeleteOperation {
    async fn execute(
        &self,
        ctx: &OperationContext<'_>,
    ) -> Result<Option<OsPolicyAssignment>, ExecuteError> {
        tracing::info!(target = %ctx.target, "deleting assignment");
        let handle = ctx
            .client
            .delete_assignment(ctx.target, ctx.cancel)
            .await?;
        await_rollout(ctx, handle).await
    }
}

async fn await_rollout(
    ctx: &OperationContext<'_>,
    handle: crate::lro::OperationHandle,
) -> Result<Option<OsPolicyAssignment>, ExecuteError> {
    if ctx.desired.skips_rollout() {
        tracing::debug!(operation = %handle.name, "rollout await skipped by request");
        return Ok(None);
    }
    let done = RolloutWaiter::new(ctx.client)
        .wait(handle, ctx.cancel)
        .await?;
    Ok(done.response_assignment(ctx.target))
}
