//! Shared fixtures for unit tests.

use super::{AssignmentRef, OsPolicyAssignment};
use serde_json::json;

pub(crate) fn target() -> AssignmentRef {
    AssignmentRef::new("acme-prod", "us-central1-a", "web-hardening")
}

/// A minimal valid desired assignment.
pub(crate) fn valid_desired() -> OsPolicyAssignment {
    serde_json::from_value(json!({
        "name": "web-hardening",
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
    }))
    .unwrap()
}
