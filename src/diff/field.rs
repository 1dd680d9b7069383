//! Field-level diff descriptors.

use serde_json::Value;

/// Server-side update operations. Fields sharing an endpoint share a
/// variant; the planner dedupes by this identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    /// PATCH on the assignment with an update mask.
    PatchAssignment,
}

/// One detected divergence between desired and actual state on a single
/// field path. Produced fresh on each diff pass, never mutated, consumed
/// once by the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff {
    /// Dotted field path in declaration order, e.g. `rollout.min_wait_duration`.
    pub path: &'static str,
    /// Actual (server) value, if any.
    pub old: Option<Value>,
    /// Desired value, if any.
    pub new: Option<Value>,
    /// No in-place update exists for this field.
    pub requires_recreate: bool,
    /// Which update operation resolves this diff, when one exists.
    pub update_op: Option<UpdateOp>,
    /// Top-level field name for the server-facing update mask. `None` for
    /// client-side-only fields, which are excluded from the mask entirely.
    pub mask_field: Option<&'static str>,
}

impl std::fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn render(value: &Option<Value>) -> String {
            match value {
                Some(v) => v.to_string(),
                None => "(unset)".to_string(),
            }
        }
        write!(
            f,
            "{}: {} -> {}",
            self.path,
            render(&self.old),
            render(&self.new)
        )
    }
}
