//! Differ: desired vs actual comparison.
//!
//! Fields are walked in schema declaration order so output is deterministic
//! and error messages are reproducible. A desired-side unset field means
//! "unspecified" and never produces a diff; the server's value stands.
//! Field-specific canonicalization applies before comparison: unset and
//! empty string are the same text value, unset and `false` the same bool,
//! and durations compare by elapsed time rather than textual form.

mod field;

#[cfg(test)]
mod tests;

pub use field::{FieldDiff, UpdateOp};

use crate::model::{durations_equal, ObjectField, OsPolicyAssignment};
use serde_json::Value;

/// Compare desired against actual state, producing field diffs in
/// declaration order.
pub fn diff(desired: &OsPolicyAssignment, actual: &OsPolicyAssignment) -> Vec<FieldDiff> {
    let mut out = DiffBuilder::default();

    out.text("name", None, true, &actual.name, &desired.name);
    out.text(
        "description",
        Some("description"),
        false,
        &actual.description,
        &desired.description,
    );

    if !desired.os_policies.is_empty() && desired.os_policies != actual.os_policies {
        out.push(
            "os_policies",
            Some("osPolicies"),
            false,
            to_value(&actual.os_policies),
            to_value(&desired.os_policies),
        );
    }

    out.object(
        "instance_filter",
        Some("instanceFilter"),
        &actual.instance_filter,
        &desired.instance_filter,
    );

    match (&desired.rollout, &actual.rollout) {
        (ObjectField::Unset, _) => {}
        (ObjectField::Set(want), ObjectField::Set(have)) => {
            if !want.disruption_budget.is_unset() && want.disruption_budget != have.disruption_budget
            {
                out.push(
                    "rollout.disruption_budget",
                    Some("rollout"),
                    false,
                    object_value(&have.disruption_budget),
                    object_value(&want.disruption_budget),
                );
            }
            if want.min_wait_duration.is_some()
                && !durations_equal(
                    have.min_wait_duration.as_deref(),
                    want.min_wait_duration.as_deref(),
                )
            {
                out.push(
                    "rollout.min_wait_duration",
                    Some("rollout"),
                    false,
                    to_value(&have.min_wait_duration),
                    to_value(&want.min_wait_duration),
                );
            }
        }
        (want, have) => out.object("rollout", Some("rollout"), have, want),
    }

    // Synthetic client-side control: participates in diffing and planning
    // but is excluded from the server-facing update mask.
    if !bools_equal(actual.skip_await_rollout, desired.skip_await_rollout) {
        out.push(
            "skip_await_rollout",
            None,
            false,
            to_value(&actual.skip_await_rollout),
            to_value(&desired.skip_await_rollout),
        );
    }

    out.text("project", None, true, &actual.project, &desired.project);
    out.text("location", None, true, &actual.location, &desired.location);

    out.diffs
}

/// Whether any diff in the set can only be resolved by recreating the
/// resource.
pub fn requires_recreate(diffs: &[FieldDiff]) -> Vec<&'static str> {
    diffs
        .iter()
        .filter(|d| d.requires_recreate)
        .map(|d| d.path)
        .collect()
}

fn texts_equal(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or("") == b.unwrap_or("")
}

fn bools_equal(a: Option<bool>, b: Option<bool>) -> bool {
    a.unwrap_or(false) == b.unwrap_or(false)
}

fn to_value<T: serde::Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(Value::Null) => None,
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

fn object_value<T: serde::Serialize>(field: &ObjectField<T>) -> Option<Value> {
    match field {
        ObjectField::Unset => None,
        ObjectField::Empty => Some(Value::Object(serde_json::Map::new())),
        ObjectField::Set(value) => to_value(value),
    }
}

#[derive(Default)]
struct DiffBuilder {
    diffs: Vec<FieldDiff>,
}

impl DiffBuilder {
    fn push(
        &mut self,
        path: &'static str,
        mask_field: Option<&'static str>,
        immutable: bool,
        old: Option<Value>,
        new: Option<Value>,
    ) {
        self.diffs.push(FieldDiff {
            path,
            old,
            new,
            requires_recreate: immutable,
            update_op: if immutable {
                None
            } else {
                Some(UpdateOp::PatchAssignment)
            },
            mask_field,
        });
    }

    fn text(
        &mut self,
        path: &'static str,
        mask_field: Option<&'static str>,
        immutable: bool,
        actual: &Option<String>,
        desired: &Option<String>,
    ) {
        if desired.is_none() {
            return;
        }
        if !texts_equal(actual.as_deref(), desired.as_deref()) {
            self.push(path, mask_field, immutable, to_value(actual), to_value(desired));
        }
    }

    fn object<T: serde::Serialize + PartialEq>(
        &mut self,
        path: &'static str,
        mask_field: Option<&'static str>,
        actual: &ObjectField<T>,
        desired: &ObjectField<T>,
    ) {
        if desired.is_unset() {
            return;
        }
        if desired != actual {
            self.push(
                path,
                mask_field,
                false,
                object_value(actual),
                object_value(desired),
            );
        }
    }
}
