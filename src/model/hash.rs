//! Content fingerprints for equality short-circuits.

use super::assignment::OsPolicyAssignment;

/// Deterministic content hash over the canonical JSON form of an
/// assignment. Serialization is deterministic: struct fields serialize in
/// declaration order and label maps are sorted `BTreeMap`s.
///
/// Equal hashes mean "likely equal"; callers needing exactness compare
/// structurally.
pub fn content_hash(assignment: &OsPolicyAssignment) -> String {
    let canonical = serde_json::to_vec(assignment).unwrap_or_default();
    blake3::hash(&canonical).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assignment::{LabelSet, OsPolicyAssignment};

    #[test]
    fn hash_is_stable() {
        let a = OsPolicyAssignment {
            name: Some("web-hardening".to_string()),
            ..Default::default()
        };
        assert_eq!(content_hash(&a), content_hash(&a.clone()));
    }

    #[test]
    fn hash_ignores_label_insertion_order() {
        let mut forward = LabelSet::default();
        forward.labels.insert("env".to_string(), "prod".to_string());
        forward.labels.insert("tier".to_string(), "web".to_string());

        let mut reverse = LabelSet::default();
        reverse.labels.insert("tier".to_string(), "web".to_string());
        reverse.labels.insert("env".to_string(), "prod".to_string());

        assert_eq!(
            serde_json::to_string(&forward).unwrap(),
            serde_json::to_string(&reverse).unwrap()
        );
    }

    #[test]
    fn hash_differs_on_content_change() {
        let a = OsPolicyAssignment {
            name: Some("a".to_string()),
            ..Default::default()
        };
        let b = OsPolicyAssignment {
            name: Some("b".to_string()),
            ..Default::default()
        };
        assert_ne!(content_hash(&a), content_hash(&b));
    }
}
