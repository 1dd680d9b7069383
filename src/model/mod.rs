//! Resource model for OS policy assignments.
//!
//! Typed desired/actual state, presence-aware nested fields, enum
//! validation, duration canonicalization, and content hashing.

mod assignment;
mod duration;
mod enums;
mod error;
mod hash;
mod presence;
mod validate;

#[cfg(test)]
mod tests;
#[cfg(test)]
pub(crate) mod testutil;

pub use assignment::*;
pub use duration::{durations_equal, parse_duration};
pub use enums::{
    check_enum, EXEC_INTERPRETERS, PACKAGE_DESIRED_STATES, POLICY_MODES, ROLLOUT_STATES,
};
pub use error::ValidationError;
pub use hash::content_hash;
pub use presence::ObjectField;
pub use validate::validate;

use serde::{Deserialize, Serialize};

/// Identity of one assignment: enough to address it in the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRef {
    pub project: String,
    pub location: String,
    pub name: String,
}

impl AssignmentRef {
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            name: name.into(),
        }
    }

    /// Identity for a desired assignment. Fails when any identity field is
    /// absent from both the assignment and the caller's defaults.
    pub fn for_assignment(
        assignment: &OsPolicyAssignment,
        parent: &ParentRef,
    ) -> Result<Self, ValidationError> {
        let name = assignment
            .name
            .clone()
            .ok_or_else(|| ValidationError::MissingField("name".to_string()))?;
        Ok(Self {
            project: assignment.project.clone().unwrap_or_else(|| parent.project.clone()),
            location: assignment
                .location
                .clone()
                .unwrap_or_else(|| parent.location.clone()),
            name,
        })
    }

    /// Relative resource path, e.g.
    /// `projects/p/locations/us-central1-a/osPolicyAssignments/web`.
    pub fn resource_path(&self) -> String {
        format!(
            "{}/osPolicyAssignments/{}",
            self.parent().parent_path(),
            self.name
        )
    }

    pub fn parent(&self) -> ParentRef {
        ParentRef {
            project: self.project.clone(),
            location: self.location.clone(),
        }
    }
}

impl std::fmt::Display for AssignmentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.resource_path())
    }
}

/// Identity of a location that contains assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub project: String,
    pub location: String,
}

impl ParentRef {
    pub fn new(project: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
        }
    }

    pub fn parent_path(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.location)
    }
}

/// A decoded server payload for one assignment.
///
/// The literal empty object `{}` decodes to [`Snapshot::Empty`]: the server
/// reported the resource with no fields, which is not the same as a payload
/// that happens to hold only default values, and not the same as a 404.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Empty,
    Present(OsPolicyAssignment),
}

impl Snapshot {
    /// Decode a server payload, resolving the empty-object sentinel and
    /// overlaying identity fields the body cannot carry.
    pub fn normalize(
        payload: serde_json::Value,
        hint: &AssignmentRef,
    ) -> Result<Self, serde_json::Error> {
        match &payload {
            serde_json::Value::Object(map) if map.is_empty() => Ok(Self::Empty),
            _ => {
                let mut assignment: OsPolicyAssignment = serde_json::from_value(payload)?;
                assignment.overlay_identity(hint);
                Ok(Self::Present(assignment))
            }
        }
    }

    /// Collapse to a concrete assignment for diffing. The empty sentinel
    /// becomes the canonical empty assignment carrying only identity.
    pub fn into_assignment(self, hint: &AssignmentRef) -> OsPolicyAssignment {
        match self {
            Self::Present(assignment) => assignment,
            Self::Empty => {
                let mut empty = OsPolicyAssignment::EMPTY.clone();
                empty.overlay_identity(hint);
                empty
            }
        }
    }
}
