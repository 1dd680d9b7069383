//! Typed resource model for OS policy assignments.
//!
//! Scalars are `Option` so an omitted field stays distinguishable from a
//! zero value, nested objects use [`ObjectField`] to keep the empty-vs-unset
//! distinction, lists are order-sensitive `Vec`s, and label maps are
//! `BTreeMap`s so key insertion order never leaks into comparisons.

use super::presence::ObjectField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One OS policy assignment: a set of OS policies applied to a filtered
/// group of instances, rolled out under a disruption budget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OsPolicyAssignment {
    /// Short resource name, unique within the parent location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Policies applied in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub os_policies: Vec<OsPolicy>,

    #[serde(skip_serializing_if = "ObjectField::is_unset")]
    pub instance_filter: ObjectField<InstanceFilter>,

    #[serde(skip_serializing_if = "ObjectField::is_unset")]
    pub rollout: ObjectField<Rollout>,

    /// Client-side control: return without awaiting the server rollout.
    /// Never serialized into a request body.
    #[serde(skip_serializing)]
    pub skip_await_rollout: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    // Server-assigned output fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_create_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollout_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciling: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl OsPolicyAssignment {
    /// Canonical empty assignment, shared by everything that needs to diff
    /// against "exists but reported no fields". Immutable by construction.
    pub const EMPTY: Self = Self {
        name: None,
        description: None,
        os_policies: Vec::new(),
        instance_filter: ObjectField::Unset,
        rollout: ObjectField::Unset,
        skip_await_rollout: None,
        project: None,
        location: None,
        revision_id: None,
        revision_create_time: None,
        etag: None,
        rollout_state: None,
        baseline: None,
        deleted: None,
        reconciling: None,
        uid: None,
    };

    /// Fill identity fields the payload could not carry (they live in the
    /// request URL, not the body) from the request that produced it.
    pub fn overlay_identity(&mut self, hint: &super::AssignmentRef) {
        if self.name.is_none() {
            self.name = Some(hint.name.clone());
        }
        if self.project.is_none() {
            self.project = Some(hint.project.clone());
        }
        if self.location.is_none() {
            self.location = Some(hint.location.clone());
        }
    }

    /// Fill server-assigned fields missing here from another snapshot of the
    /// same resource. Used when a re-fetch lags behind what the mutating
    /// call's immediate response already reported.
    pub fn merge_missing(&mut self, extra: &Self) {
        if self.revision_id.is_none() {
            self.revision_id = extra.revision_id.clone();
        }
        if self.revision_create_time.is_none() {
            self.revision_create_time = extra.revision_create_time;
        }
        if self.etag.is_none() {
            self.etag = extra.etag.clone();
        }
        if self.rollout_state.is_none() {
            self.rollout_state = extra.rollout_state.clone();
        }
        if self.baseline.is_none() {
            self.baseline = extra.baseline;
        }
        if self.deleted.is_none() {
            self.deleted = extra.deleted;
        }
        if self.reconciling.is_none() {
            self.reconciling = extra.reconciling;
        }
        if self.uid.is_none() {
            self.uid = extra.uid.clone();
        }
    }

    /// Derive the post-apply desired state: the caller's intent overlaid
    /// with everything only the server can decide. The rollout-skip control
    /// is consumed by the apply cycle and cleared here so it never shows up
    /// as a residual diff.
    pub fn reconciled_with(&self, actual: &Self) -> Self {
        let mut desired = self.clone();
        if desired.name.is_none() {
            desired.name = actual.name.clone();
        }
        if desired.project.is_none() {
            desired.project = actual.project.clone();
        }
        if desired.location.is_none() {
            desired.location = actual.location.clone();
        }
        desired.merge_missing(actual);
        desired.skip_await_rollout = None;
        desired
    }

    /// Whether the caller asked to skip awaiting the server-side rollout.
    pub fn skips_rollout(&self) -> bool {
        self.skip_await_rollout.unwrap_or(false)
    }
}

/// One OS policy: ordered resource groups evaluated against an instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OsPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `VALIDATION` or `ENFORCEMENT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_groups: Vec<ResourceGroup>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_no_resource_group_match: Option<bool>,
}

/// Resources applied together when the group's inventory filters match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceGroup {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inventory_filters: Vec<InventoryFilter>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<PolicyResource>,
}

/// OS selector for a resource group or instance filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_short_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
}

/// One declarative resource inside a policy. Exactly one payload is
/// expected to be set; validation enforces it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "ObjectField::is_unset")]
    pub pkg: ObjectField<PackageResource>,

    #[serde(skip_serializing_if = "ObjectField::is_unset")]
    pub exec: ObjectField<ExecResource>,
}

/// Package install/remove resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageResource {
    /// `INSTALLED` or `REMOVED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Script resource with a validate/enforce script.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecResource {
    /// `NONE`, `SHELL`, or `POWERSHELL`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// Selects which instances the assignment applies to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inclusion_labels: Vec<LabelSet>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusion_labels: Vec<LabelSet>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inventories: Vec<InventoryFilter>,
}

/// A conjunction of instance labels. Key order is irrelevant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSet {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// Staged rollout controls for a policy change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rollout {
    #[serde(skip_serializing_if = "ObjectField::is_unset")]
    pub disruption_budget: ObjectField<FixedOrPercent>,

    /// Wire-format duration string, e.g. `"300s"` or `"5m"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_wait_duration: Option<String>,
}

/// Disruption budget: how many targets may be in flight at once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedOrPercent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}
