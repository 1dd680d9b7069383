//! Desired-state validation.

use super::assignment::{OsPolicyAssignment, PolicyResource};
use super::duration::parse_duration;
use super::enums::{
    check_enum, EXEC_INTERPRETERS, PACKAGE_DESIRED_STATES, POLICY_MODES,
};
use super::error::ValidationError;
use super::presence::ObjectField;

fn require_str(field: &str, value: &Option<String>) -> Result<(), ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingField(field.to_string())),
    }
}

/// Validate a desired assignment: required fields present, enum values in
/// range, rollout well-formed. Runs before the first network call so a
/// malformed desired state never reaches the server.
pub fn validate(desired: &OsPolicyAssignment) -> Result<(), ValidationError> {
    require_str("name", &desired.name)?;

    if desired.os_policies.is_empty() {
        return Err(ValidationError::MissingField("os_policies".to_string()));
    }
    for (i, policy) in desired.os_policies.iter().enumerate() {
        let at = |suffix: &str| format!("os_policies[{i}].{suffix}");

        require_str(&at("id"), &policy.id)?;
        match policy.mode.as_deref() {
            Some(m) if !m.is_empty() => check_enum(&at("mode"), Some(m), POLICY_MODES)?,
            _ => return Err(ValidationError::MissingField(at("mode"))),
        }

        if policy.resource_groups.is_empty() {
            return Err(ValidationError::MissingField(at("resource_groups")));
        }
        for (g, group) in policy.resource_groups.iter().enumerate() {
            if group.resources.is_empty() {
                return Err(ValidationError::MissingField(at(&format!(
                    "resource_groups[{g}].resources"
                ))));
            }
            for (r, resource) in group.resources.iter().enumerate() {
                let path = at(&format!("resource_groups[{g}].resources[{r}]"));
                validate_resource(&path, resource)?;
            }
        }
    }

    match &desired.instance_filter {
        ObjectField::Unset => {
            return Err(ValidationError::MissingField("instance_filter".to_string()))
        }
        ObjectField::Empty | ObjectField::Set(_) => {}
    }

    match &desired.rollout {
        ObjectField::Unset | ObjectField::Empty => {
            return Err(ValidationError::MissingField("rollout".to_string()))
        }
        ObjectField::Set(rollout) => {
            let budget = rollout.disruption_budget.as_set().ok_or_else(|| {
                ValidationError::MissingField("rollout.disruption_budget".to_string())
            })?;
            match (budget.fixed, budget.percent) {
                (Some(_), Some(_)) => {
                    return Err(ValidationError::Invalid {
                        field: "rollout.disruption_budget".to_string(),
                        message: "fixed and percent are mutually exclusive".to_string(),
                    })
                }
                (None, None) => {
                    return Err(ValidationError::MissingField(
                        "rollout.disruption_budget".to_string(),
                    ))
                }
                _ => {}
            }
            if let Some(wait) = rollout.min_wait_duration.as_deref() {
                if !wait.is_empty() && parse_duration(wait).is_none() {
                    return Err(ValidationError::Invalid {
                        field: "rollout.min_wait_duration".to_string(),
                        message: format!("'{wait}' is not a valid duration"),
                    });
                }
            }
        }
    }

    Ok(())
}

fn validate_resource(path: &str, resource: &PolicyResource) -> Result<(), ValidationError> {
    require_str(&format!("{path}.id"), &resource.id)?;

    let has_pkg = !resource.pkg.is_unset();
    let has_exec = !resource.exec.is_unset();
    match (has_pkg, has_exec) {
        (false, false) => {
            return Err(ValidationError::Invalid {
                field: path.to_string(),
                message: "exactly one resource payload (pkg or exec) must be set".to_string(),
            })
        }
        (true, true) => {
            return Err(ValidationError::Invalid {
                field: path.to_string(),
                message: "pkg and exec are mutually exclusive".to_string(),
            })
        }
        _ => {}
    }

    if let ObjectField::Set(pkg) = &resource.pkg {
        check_enum(
            &format!("{path}.pkg.desired_state"),
            pkg.desired_state.as_deref(),
            PACKAGE_DESIRED_STATES,
        )?;
    }
    if let ObjectField::Set(exec) = &resource.exec {
        check_enum(
            &format!("{path}.exec.interpreter"),
            exec.interpreter.as_deref(),
            EXEC_INTERPRETERS,
        )?;
    }

    Ok(())
}
