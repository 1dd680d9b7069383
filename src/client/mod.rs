//! HTTP client for the OS policy assignment service.
//!
//! Wraps a shared pooled `reqwest::Client` and exposes the imperative
//! surface the apply orchestrator is built on: get, list, create, patch,
//! delete, and operation polling. Every call is a cancellation suspension
//! point: the caller's token is checked before the request is sent.

mod error;

pub use error::ClientError;

use crate::config::ClientConfig;
use crate::lro::OperationHandle;
use crate::model::{AssignmentRef, OsPolicyAssignment, ParentRef, Snapshot};
use crate::ops::{ExecuteError, Operation, OperationContext};
use reqwest::Method;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const NO_QUERY: &[(&str, String)] = &[];

/// One page of a list traversal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPage {
    pub os_policy_assignments: Vec<OsPolicyAssignment>,
    pub next_page_token: Option<String>,
}

/// Options for delete.
#[derive(Debug, Clone)]
pub struct DeleteOptions {
    /// Treat an already-absent resource as success.
    pub allow_missing: bool,
    /// Return as soon as the server accepts the delete, without awaiting
    /// the rollout or confirming the resource is gone.
    pub skip_await: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            allow_missing: true,
            skip_await: false,
        }
    }
}

/// Client for one OS policy service endpoint.
pub struct AssignmentClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AssignmentClient {
    /// Create a client with a default pooled HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.service.request_timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Create a client with a custom HTTP client (for testing).
    pub fn with_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.service.endpoint.trim_end_matches('/'),
            path
        )
    }

    /// Fetch the current state of one assignment.
    pub async fn get(
        &self,
        target: &AssignmentRef,
        cancel: &CancellationToken,
    ) -> Result<Snapshot, ClientError> {
        let payload = self
            .send(Method::GET, &self.url(&target.resource_path()), NO_QUERY, None, cancel)
            .await?;
        Snapshot::normalize(payload, target)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Fetch one page of assignments under a location.
    pub async fn list_page(
        &self,
        parent: &ParentRef,
        page_size: Option<u32>,
        page_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ListPage, ClientError> {
        let url = self.url(&format!("{}/osPolicyAssignments", parent.parent_path()));
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(size) = page_size {
            query.push(("pageSize", size.to_string()));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let payload = self.send(Method::GET, &url, &query, None, cancel).await?;
        let mut page: ListPage = serde_json::from_value(payload)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        for assignment in &mut page.os_policy_assignments {
            if assignment.project.is_none() {
                assignment.project = Some(parent.project.clone());
            }
            if assignment.location.is_none() {
                assignment.location = Some(parent.location.clone());
            }
        }
        Ok(page)
    }

    /// List every assignment under a location.
    pub async fn list(
        &self,
        parent: &ParentRef,
        cancel: &CancellationToken,
    ) -> Result<Vec<OsPolicyAssignment>, ClientError> {
        self.list_with_max_results(parent, None, cancel).await
    }

    /// List assignments under a location, stopping once `max_results` have
    /// been collected. The traversal is sequential: fetch a page, collect,
    /// follow the continuation token.
    pub async fn list_with_max_results(
        &self,
        parent: &ParentRef,
        max_results: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<Vec<OsPolicyAssignment>, ClientError> {
        let mut collected = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self
                .list_page(parent, None, token.as_deref(), cancel)
                .await?;
            collected.extend(page.os_policy_assignments);

            if let Some(max) = max_results {
                if collected.len() >= max {
                    collected.truncate(max);
                    return Ok(collected);
                }
            }

            match page.next_page_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => return Ok(collected),
            }
        }
    }

    /// Delete one assignment, await its rollout, and confirm the server
    /// stopped reporting it. Deletes propagate lazily, so confirmation
    /// polls GET a bounded number of times until it returns not-found.
    ///
    /// Returns whether a resource was actually deleted; an already-absent
    /// resource is success when `allow_missing` is set.
    pub async fn delete(
        &self,
        target: &AssignmentRef,
        options: &DeleteOptions,
        cancel: &CancellationToken,
    ) -> Result<bool, ClientError> {
        let mut control = OsPolicyAssignment::EMPTY.clone();
        control.skip_await_rollout = options.skip_await.then_some(true);

        let operation = Operation::delete();
        let ctx = OperationContext {
            client: self,
            target,
            desired: &control,
            cancel,
        };

        match operation.execute(&ctx).await {
            Ok(_) => {}
            Err(ExecuteError::Client(e)) if e.is_not_found() && options.allow_missing => {
                tracing::debug!(target = %target, "resource already absent, nothing to delete");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }

        if !options.skip_await {
            self.confirm_deleted(target, cancel).await?;
        }
        tracing::info!(target = %target, "assignment deleted");
        Ok(true)
    }

    /// Delete every assignment under a location matching the filter.
    /// Sequential paginated traversal; returns how many were deleted.
    pub async fn delete_all<F>(
        &self,
        parent: &ParentRef,
        mut filter: F,
        cancel: &CancellationToken,
    ) -> Result<usize, ClientError>
    where
        F: FnMut(&OsPolicyAssignment) -> bool,
    {
        let options = DeleteOptions::default();
        let mut deleted = 0;
        let mut token: Option<String> = None;

        loop {
            let page = self
                .list_page(parent, None, token.as_deref(), cancel)
                .await?;
            for assignment in &page.os_policy_assignments {
                if !filter(assignment) {
                    continue;
                }
                let Some(name) = assignment.name.clone() else {
                    continue;
                };
                let target = AssignmentRef {
                    project: assignment
                        .project
                        .clone()
                        .unwrap_or_else(|| parent.project.clone()),
                    location: assignment
                        .location
                        .clone()
                        .unwrap_or_else(|| parent.location.clone()),
                    name,
                };
                if self.delete(&target, &options, cancel).await? {
                    deleted += 1;
                }
            }

            match page.next_page_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => break,
            }
        }

        Ok(deleted)
    }

    async fn confirm_deleted(
        &self,
        target: &AssignmentRef,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let attempts = self.config.delete.confirm_attempts.max(1);
        let interval = Duration::from_millis(self.config.delete.confirm_interval_ms);

        for attempt in 1..=attempts {
            match self.get(target, cancel).await {
                Err(e) if e.is_not_found() => return Ok(()),
                Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
                Ok(_) | Err(_) => {
                    if attempt == attempts {
                        break;
                    }
                    tracing::debug!(
                        target = %target,
                        attempt,
                        "resource still visible after delete, polling again"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                        _ = tokio::time::sleep(interval) => {}
                    }
                }
            }
        }

        Err(ClientError::DeleteUnconfirmed(target.resource_path()))
    }

    pub(crate) async fn create_assignment(
        &self,
        target: &AssignmentRef,
        desired: &OsPolicyAssignment,
        cancel: &CancellationToken,
    ) -> Result<OperationHandle, ClientError> {
        let url = self.url(&format!(
            "{}/osPolicyAssignments",
            target.parent().parent_path()
        ));
        let body = serde_json::to_value(desired)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let query = [("osPolicyAssignmentId", target.name.clone())];
        let payload = self
            .send(Method::POST, &url, &query, Some(body), cancel)
            .await?;
        parse_operation(payload)
    }

    pub(crate) async fn patch_assignment(
        &self,
        target: &AssignmentRef,
        desired: &OsPolicyAssignment,
        update_mask: &str,
        cancel: &CancellationToken,
    ) -> Result<OperationHandle, ClientError> {
        let url = self.url(&target.resource_path());
        let body = serde_json::to_value(desired)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let query = [("updateMask", update_mask.to_string())];
        let payload = self
            .send(Method::PATCH, &url, &query, Some(body), cancel)
            .await?;
        parse_operation(payload)
    }

    pub(crate) async fn delete_assignment(
        &self,
        target: &AssignmentRef,
        cancel: &CancellationToken,
    ) -> Result<OperationHandle, ClientError> {
        let payload = self
            .send(
                Method::DELETE,
                &self.url(&target.resource_path()),
                NO_QUERY,
                None,
                cancel,
            )
            .await?;
        parse_operation(payload)
    }

    pub(crate) async fn poll_operation(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<OperationHandle, ClientError> {
        let payload = self
            .send(Method::GET, &self.url(name), NO_QUERY, None, cancel)
            .await?;
        parse_operation(payload)
    }

    async fn send<Q: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        query: &Q,
        body: Option<serde_json::Value>,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, ClientError> {
        let mut request = self.http.request(method, url).query(query);
        if let Some(token) = &self.config.service.auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = request.send() => result.map_err(|e| self.classify_transport(e))?,
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), url, &text));
        }

        if text.is_empty() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    fn classify_transport(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.service.request_timeout_seconds)
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

fn parse_operation(payload: serde_json::Value) -> Result<OperationHandle, ClientError> {
    let handle: OperationHandle = serde_json::from_value(payload)
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
    if handle.name.is_empty() && !handle.done {
        return Err(ClientError::InvalidResponse(
            "mutating call returned an operation with no name".to_string(),
        ));
    }
    Ok(handle)
}

/// Extract a human-readable message from an error payload, falling back to
/// the raw body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        #[serde(default)]
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "(no error detail)".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        }
    }
}

fn classify_status(status: u16, url: &str, body: &str) -> ClientError {
    match status {
        404 => ClientError::NotFound(url.to_string()),
        409 => ClientError::Conflict(error_message(body)),
        _ => ClientError::Upstream {
            status,
            message: error_message(body),
        },
    }
}
