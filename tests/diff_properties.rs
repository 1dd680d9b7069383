//! Property tests for diff determinism and ordering semantics.

use ospolicy::diff::diff;
use ospolicy::model::{
    content_hash, InstanceFilter, LabelSet, ObjectField, OsPolicy, OsPolicyAssignment,
    PackageResource, PolicyResource, ResourceGroup,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_policy() -> impl Strategy<Value = OsPolicy> {
    (
        "[a-z][a-z0-9-]{0,10}",
        proptest::option::of("[a-zA-Z ]{0,16}"),
        prop_oneof![Just("VALIDATION"), Just("ENFORCEMENT")],
        any::<bool>(),
    )
        .prop_map(|(id, description, mode, allow)| OsPolicy {
            id: Some(id.clone()),
            description,
            mode: Some(mode.to_string()),
            resource_groups: vec![ResourceGroup {
                inventory_filters: Vec::new(),
                resources: vec![PolicyResource {
                    id: Some(format!("{id}-pkg")),
                    pkg: ObjectField::Set(PackageResource {
                        desired_state: Some("INSTALLED".to_string()),
                        name: Some(id),
                    }),
                    exec: ObjectField::Unset,
                }],
            }],
            allow_no_resource_group_match: allow.then_some(true),
        })
}

fn arb_labels() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{1,6}", 0..4)
}

fn arb_assignment() -> impl Strategy<Value = OsPolicyAssignment> {
    (
        "[a-z][a-z0-9-]{0,12}",
        proptest::option::of("[a-zA-Z ]{0,24}"),
        proptest::collection::vec(arb_policy(), 1..4),
        arb_labels(),
    )
        .prop_map(|(name, description, os_policies, labels)| OsPolicyAssignment {
            name: Some(name),
            description,
            os_policies,
            instance_filter: ObjectField::Set(InstanceFilter {
                all: None,
                inclusion_labels: vec![LabelSet { labels }],
                exclusion_labels: Vec::new(),
                inventories: Vec::new(),
            }),
            ..Default::default()
        })
}

proptest! {
    /// Diffing any state against itself is always empty.
    #[test]
    fn diff_is_reflexively_empty(state in arb_assignment()) {
        prop_assert!(diff(&state, &state.clone()).is_empty());
    }

    /// Content hashes are deterministic across clones.
    #[test]
    fn content_hash_is_deterministic(state in arb_assignment()) {
        prop_assert_eq!(content_hash(&state), content_hash(&state.clone()));
    }

    /// A JSON round trip preserves diff-equality with the original.
    #[test]
    fn wire_round_trip_preserves_equality(state in arb_assignment()) {
        let round_tripped: OsPolicyAssignment =
            serde_json::from_value(serde_json::to_value(&state).unwrap()).unwrap();
        prop_assert!(diff(&state, &round_tripped).is_empty());
    }

    /// Reordering a list-typed field is a real change.
    #[test]
    fn list_reorder_is_a_change(state in arb_assignment()) {
        prop_assume!(state.os_policies.len() >= 2);
        prop_assume!(state.os_policies[0] != state.os_policies[1]);

        let mut reordered = state.clone();
        reordered.os_policies.swap(0, 1);

        // The change is attributed to the list field.
        let diffs = diff(&state, &reordered);
        prop_assert!(diffs.iter().any(|d| d.path == "os_policies"));
    }
}
