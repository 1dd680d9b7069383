//! Unit tests for the differ.

use super::*;
use crate::model::testutil::{target, valid_desired};
use crate::model::{ObjectField, OsPolicyAssignment, Snapshot};
use serde_json::json;

#[test]
fn diff_of_identical_states_is_empty() {
    let state = valid_desired();
    assert!(diff(&state, &state.clone()).is_empty());
}

#[test]
fn diff_of_empty_sentinels_is_empty() {
    let a = Snapshot::Empty.into_assignment(&target());
    let b = Snapshot::Empty.into_assignment(&target());
    assert!(diff(&a, &b).is_empty());
}

#[test]
fn desired_unset_fields_produce_no_diff() {
    let mut desired = valid_desired();
    desired.description = None;

    let mut actual = valid_desired();
    actual.description = Some("server-side description".to_string());

    assert!(diff(&desired, &actual).is_empty());
}

#[test]
fn unset_and_empty_string_are_canonically_equal() {
    let mut desired = valid_desired();
    desired.description = Some(String::new());

    let mut actual = valid_desired();
    actual.description = None;

    assert!(diff(&desired, &actual).is_empty());
}

#[test]
fn mutable_description_change_is_a_single_update_diff() {
    let mut desired = valid_desired();
    desired.description = Some("b".to_string());

    let mut actual = valid_desired();
    actual.description = Some("a".to_string());

    let diffs = diff(&desired, &actual);
    assert_eq!(diffs.len(), 1);
    let d = &diffs[0];
    assert_eq!(d.path, "description");
    assert_eq!(d.old, Some(json!("a")));
    assert_eq!(d.new, Some(json!("b")));
    assert!(!d.requires_recreate);
    assert_eq!(d.update_op, Some(UpdateOp::PatchAssignment));
    assert_eq!(d.mask_field, Some("description"));
}

#[test]
fn immutable_field_divergence_requires_recreate() {
    let mut desired = valid_desired();
    desired.location = Some("us-central1-a".to_string());

    let mut actual = valid_desired();
    actual.location = Some("europe-west1-b".to_string());

    let diffs = diff(&desired, &actual);
    assert_eq!(diffs.len(), 1);
    assert!(diffs[0].requires_recreate);
    assert_eq!(diffs[0].update_op, None);
    assert_eq!(requires_recreate(&diffs), vec!["location"]);
}

#[test]
fn list_reorder_produces_a_diff() {
    let mut desired = valid_desired();
    let mut second = desired.os_policies[0].clone();
    second.id = Some("second".to_string());
    desired.os_policies.push(second);

    let mut actual = desired.clone();
    actual.os_policies.reverse();

    let diffs = diff(&desired, &actual);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "os_policies");
}

#[test]
fn map_insertion_order_produces_no_diff() {
    let desired: OsPolicyAssignment = serde_json::from_value(json!({
        "instanceFilter": {"inclusionLabels": [{"labels": {"env": "prod", "tier": "web"}}]}
    }))
    .unwrap();
    let actual: OsPolicyAssignment = serde_json::from_value(json!({
        "instanceFilter": {"inclusionLabels": [{"labels": {"tier": "web", "env": "prod"}}]}
    }))
    .unwrap();

    assert!(diff(&desired, &actual).is_empty());
}

#[test]
fn durations_compare_by_elapsed_time() {
    let mut desired = valid_desired();
    if let ObjectField::Set(rollout) = &mut desired.rollout {
        rollout.min_wait_duration = Some("5m".to_string());
    }

    let actual = valid_desired(); // "300s"
    assert!(diff(&desired, &actual).is_empty());

    if let ObjectField::Set(rollout) = &mut desired.rollout {
        rollout.min_wait_duration = Some("301s".to_string());
    }
    let diffs = diff(&desired, &actual);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "rollout.min_wait_duration");
    assert_eq!(diffs[0].mask_field, Some("rollout"));
}

#[test]
fn explicitly_cleared_nested_object_diffs_against_set_value() {
    let mut desired = valid_desired();
    desired.instance_filter = ObjectField::Empty;

    let actual = valid_desired();
    let diffs = diff(&desired, &actual);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "instance_filter");
    assert_eq!(diffs[0].new, Some(json!({})));
}

#[test]
fn skip_await_rollout_diff_carries_no_mask_field() {
    let mut desired = valid_desired();
    desired.skip_await_rollout = Some(true);

    let actual = valid_desired();
    let diffs = diff(&desired, &actual);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, "skip_await_rollout");
    assert_eq!(diffs[0].mask_field, None);
    assert_eq!(diffs[0].update_op, Some(UpdateOp::PatchAssignment));
}

#[test]
fn skip_await_rollout_false_matches_absent() {
    let mut desired = valid_desired();
    desired.skip_await_rollout = Some(false);
    let actual = valid_desired();
    assert!(diff(&desired, &actual).is_empty());
}

#[test]
fn diffs_are_reported_in_declaration_order() {
    let mut desired = valid_desired();
    desired.description = Some("new".to_string());
    desired.skip_await_rollout = Some(true);
    if let ObjectField::Set(rollout) = &mut desired.rollout {
        rollout.min_wait_duration = Some("600s".to_string());
    }

    let actual = valid_desired();
    let paths: Vec<_> = diff(&desired, &actual).iter().map(|d| d.path).collect();
    assert_eq!(
        paths,
        vec!["description", "rollout.min_wait_duration", "skip_await_rollout"]
    );
}
