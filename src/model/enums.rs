//! Allowed value sets for enum-typed fields.
//!
//! Enum fields travel as strings on the wire. An unset or empty value is
//! always accepted (it means "unspecified"); anything else must be in the
//! field's allowed set.

use super::error::ValidationError;

pub const POLICY_MODES: &[&str] = &["MODE_UNSPECIFIED", "VALIDATION", "ENFORCEMENT"];

pub const PACKAGE_DESIRED_STATES: &[&str] =
    &["DESIRED_STATE_UNSPECIFIED", "INSTALLED", "REMOVED"];

pub const EXEC_INTERPRETERS: &[&str] =
    &["INTERPRETER_UNSPECIFIED", "NONE", "SHELL", "POWERSHELL"];

pub const ROLLOUT_STATES: &[&str] = &[
    "ROLLOUT_STATE_UNSPECIFIED",
    "IN_PROGRESS",
    "CANCELLING",
    "CANCELLED",
    "SUCCEEDED",
];

/// Validate an enum-typed field against its allowed set.
pub fn check_enum(
    field: &str,
    value: Option<&str>,
    allowed: &'static [&'static str],
) -> Result<(), ValidationError> {
    match value {
        None | Some("") => Ok(()),
        Some(v) if allowed.contains(&v) => Ok(()),
        Some(v) => Err(ValidationError::InvalidEnum {
            field: field.to_string(),
            value: v.to_string(),
            allowed,
        }),
    }
}
