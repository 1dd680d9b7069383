//! Unit tests for the resource model.

use super::testutil::{target, valid_desired};
use super::*;
use serde_json::json;

#[test]
fn empty_object_decodes_to_empty_sentinel() {
    let snapshot = Snapshot::normalize(json!({}), &target()).unwrap();
    assert_eq!(snapshot, Snapshot::Empty);
}

#[test]
fn empty_sentinel_differs_from_default_valued_payload() {
    // A payload with a field set to its zero value is Present, not Empty.
    let snapshot = Snapshot::normalize(json!({"description": ""}), &target()).unwrap();
    assert!(matches!(snapshot, Snapshot::Present(_)));
}

#[test]
fn normalize_overlays_identity_from_hint() {
    let snapshot = Snapshot::normalize(json!({"description": "x"}), &target()).unwrap();
    let assignment = snapshot.into_assignment(&target());
    assert_eq!(assignment.name.as_deref(), Some("web-hardening"));
    assert_eq!(assignment.project.as_deref(), Some("acme-prod"));
    assert_eq!(assignment.location.as_deref(), Some("us-central1-a"));
}

#[test]
fn normalize_keeps_payload_identity_over_hint() {
    let snapshot =
        Snapshot::normalize(json!({"name": "renamed"}), &target()).unwrap();
    let assignment = snapshot.into_assignment(&target());
    assert_eq!(assignment.name.as_deref(), Some("renamed"));
}

#[test]
fn nested_empty_object_is_empty_not_default() {
    let assignment: OsPolicyAssignment =
        serde_json::from_value(json!({"instanceFilter": {}})).unwrap();
    assert!(assignment.instance_filter.is_empty());

    let assignment: OsPolicyAssignment =
        serde_json::from_value(json!({"instanceFilter": {"all": false}})).unwrap();
    assert!(matches!(
        assignment.instance_filter,
        ObjectField::Set(_)
    ));
}

#[test]
fn absent_nested_object_is_unset() {
    let assignment: OsPolicyAssignment = serde_json::from_value(json!({})).unwrap();
    assert!(assignment.instance_filter.is_unset());
    assert!(assignment.rollout.is_unset());
}

#[test]
fn skip_await_rollout_is_never_serialized() {
    let mut desired = valid_desired();
    desired.skip_await_rollout = Some(true);
    let body = serde_json::to_value(&desired).unwrap();
    assert!(body.get("skipAwaitRollout").is_none());

    // But it is read from user-supplied payloads.
    let parsed: OsPolicyAssignment =
        serde_json::from_value(json!({"skipAwaitRollout": true})).unwrap();
    assert_eq!(parsed.skip_await_rollout, Some(true));
}

#[test]
fn validate_accepts_complete_desired_state() {
    assert!(validate(&valid_desired()).is_ok());
}

#[test]
fn validate_requires_name_and_policies() {
    let mut desired = valid_desired();
    desired.name = None;
    assert!(matches!(
        validate(&desired),
        Err(ValidationError::MissingField(f)) if f == "name"
    ));

    let mut desired = valid_desired();
    desired.os_policies.clear();
    assert!(matches!(
        validate(&desired),
        Err(ValidationError::MissingField(f)) if f == "os_policies"
    ));
}

#[test]
fn validate_rejects_unknown_mode() {
    let mut desired = valid_desired();
    desired.os_policies[0].mode = Some("AUDIT".to_string());
    assert!(matches!(
        validate(&desired),
        Err(ValidationError::InvalidEnum { .. })
    ));
}

#[test]
fn validate_rejects_ambiguous_disruption_budget() {
    let mut desired = valid_desired();
    if let ObjectField::Set(rollout) = &mut desired.rollout {
        rollout.disruption_budget = ObjectField::Set(FixedOrPercent {
            fixed: Some(1),
            percent: Some(10),
        });
    }
    assert!(matches!(
        validate(&desired),
        Err(ValidationError::Invalid { .. })
    ));
}

#[test]
fn validate_rejects_resource_without_payload() {
    let mut desired = valid_desired();
    desired.os_policies[0].resource_groups[0].resources[0].pkg = ObjectField::Unset;
    assert!(validate(&desired).is_err());
}

#[test]
fn validate_rejects_bad_min_wait_duration() {
    let mut desired = valid_desired();
    if let ObjectField::Set(rollout) = &mut desired.rollout {
        rollout.min_wait_duration = Some("soon".to_string());
    }
    assert!(matches!(
        validate(&desired),
        Err(ValidationError::Invalid { ref field, .. }) if field == "rollout.min_wait_duration"
    ));
}

#[test]
fn merge_missing_fills_only_absent_output_fields() {
    let mut refetched = valid_desired();
    refetched.etag = Some("etag-from-get".to_string());

    let mut from_operation = valid_desired();
    from_operation.etag = Some("etag-from-op".to_string());
    from_operation.revision_id = Some("rev-1".to_string());
    from_operation.uid = Some("uid-123".to_string());

    refetched.merge_missing(&from_operation);
    assert_eq!(refetched.etag.as_deref(), Some("etag-from-get"));
    assert_eq!(refetched.revision_id.as_deref(), Some("rev-1"));
    assert_eq!(refetched.uid.as_deref(), Some("uid-123"));
}

#[test]
fn reconciled_desired_takes_server_fields_and_drops_skip_control() {
    let mut desired = valid_desired();
    desired.skip_await_rollout = Some(true);

    let mut actual = valid_desired();
    actual.project = Some("acme-prod".to_string());
    actual.location = Some("us-central1-a".to_string());
    actual.revision_id = Some("rev-2".to_string());
    actual.rollout_state = Some("SUCCEEDED".to_string());

    let reconciled = desired.reconciled_with(&actual);
    assert_eq!(reconciled.revision_id.as_deref(), Some("rev-2"));
    assert_eq!(reconciled.rollout_state.as_deref(), Some("SUCCEEDED"));
    assert_eq!(reconciled.skip_await_rollout, None);
    assert_eq!(reconciled.project.as_deref(), Some("acme-prod"));
}

#[test]
fn resource_path_layout() {
    assert_eq!(
        target().resource_path(),
        "projects/acme-prod/locations/us-central1-a/osPolicyAssignments/web-hardening"
    );
}
