//! Shared helpers for integration tests against a mock HTTP server.
#![allow(dead_code)]

use ospolicy::client::AssignmentClient;
use ospolicy::config::{ClientConfig, DeleteConfig, PollConfig, RetryConfig};
use ospolicy::model::{AssignmentRef, OsPolicyAssignment, ParentRef};
use serde_json::{json, Value};

pub const PROJECT: &str = "acme-prod";
pub const LOCATION: &str = "us-central1-a";
pub const NAME: &str = "web-hardening";

/// Client wired to the mock server with fast, deterministic policies.
pub fn test_client(endpoint: String) -> AssignmentClient {
    AssignmentClient::new(test_config(endpoint)).unwrap()
}

pub fn test_config(endpoint: String) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.service.endpoint = endpoint;
    config.service.project = PROJECT.to_string();
    config.service.location = LOCATION.to_string();
    config.service.request_timeout_seconds = 5;
    config.retry = RetryConfig {
        max_attempts: 3,
        initial_backoff_ms: 10,
        max_backoff_ms: 20,
        multiplier: 2.0,
    };
    config.poll = PollConfig {
        initial_interval_ms: 10,
        max_interval_ms: 20,
        multiplier: 2.0,
        timeout_seconds: 5,
    };
    config.delete = DeleteConfig {
        confirm_attempts: 3,
        confirm_interval_ms: 10,
    };
    config
}

pub fn parent() -> ParentRef {
    ParentRef::new(PROJECT, LOCATION)
}

pub fn target() -> AssignmentRef {
    AssignmentRef::new(PROJECT, LOCATION, NAME)
}

/// URL path of the assignment resource on the mock server.
pub fn resource_path() -> String {
    format!("/{}", target().resource_path())
}

/// URL path of the assignment collection on the mock server.
pub fn collection_path() -> String {
    format!("/{}/osPolicyAssignments", parent().parent_path())
}

/// URL path of an operation on the mock server.
pub fn operation_path(op: &str) -> String {
    format!("/{}", operation_name(op))
}

/// Relative operation name as returned in mutating call responses.
pub fn operation_name(op: &str) -> String {
    format!("{}/operations/{}", target().resource_path(), op)
}

/// Desired state used across tests (wire shape).
pub fn desired_json() -> Value {
    json!({
        "name": NAME,
        "description": "Baseline hardening for web fleet",
        "osPolicies": [{
            "id": "install-auditd",
            "mode": "ENFORCEMENT",
            "resourceGroups": [{
                "resources": [{
                    "id": "auditd-pkg",
                    "pkg": {"desiredState": "INSTALLED", "name": "auditd"}
                }]
            }]
        }],
        "instanceFilter": {"all": true},
        "rollout": {
            "disruptionBudget": {"percent": 10},
            "minWaitDuration": "300s"
        }
    })
}

pub fn desired() -> OsPolicyAssignment {
    serde_json::from_value(desired_json()).unwrap()
}

/// The same state as the server would report it after convergence.
pub fn server_state() -> Value {
    let mut state = desired_json();
    let obj = state.as_object_mut().unwrap();
    obj.insert("revisionId".to_string(), json!("rev-1"));
    obj.insert("rolloutState".to_string(), json!("SUCCEEDED"));
    obj.insert("uid".to_string(), json!("uid-123"));
    obj.insert("etag".to_string(), json!("etag-1"));
    state
}

/// A terminal successful operation payload embedding the final state.
pub fn done_operation(op: &str) -> Value {
    json!({
        "name": operation_name(op),
        "done": true,
        "response": server_state()
    })
}

/// A pending operation payload.
pub fn pending_operation(op: &str) -> Value {
    json!({
        "name": operation_name(op),
        "done": false
    })
}
