//! Apply command handler

use crate::apply::{ApplyOptions, LifecyclePolicy};
use crate::cli::output::{format_assignment_detail, format_assignment_json};
use crate::cli::ApplyArgs;
use crate::client::AssignmentClient;
use crate::model::{OsPolicyAssignment, ParentRef};
use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Duration;

/// Read a desired state file (JSON, wire shape).
pub fn read_desired_state(path: &std::path::Path) -> Result<OsPolicyAssignment> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read desired state file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse desired state file {}", path.display()))
}

/// Handle `ospolicy apply`
pub async fn handle_apply(
    args: &ApplyArgs,
    client: &AssignmentClient,
    parent: &ParentRef,
) -> Result<String> {
    let desired = read_desired_state(&args.file)?;

    let mut options = ApplyOptions::new(parent.clone());
    options.lifecycle = LifecyclePolicy {
        block_create: args.block_create,
        block_acquire: args.block_acquire,
        block_modify: args.block_modify,
    };
    options.timeout = args.timeout_seconds.map(Duration::from_secs);

    let final_state = client.apply(&desired, &options).await?;

    if args.json {
        Ok(format_assignment_json(&final_state))
    } else {
        Ok(format!(
            "{} converged\n{}",
            "✓".green(),
            format_assignment_detail(&final_state)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_desired_state_parses_wire_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"name": "web", "osPolicies": [{"id": "p1", "mode": "VALIDATION"}]}"#,
        )
        .unwrap();

        let desired = read_desired_state(&path).unwrap();
        assert_eq!(desired.name.as_deref(), Some("web"));
        assert_eq!(desired.os_policies.len(), 1);
    }

    #[test]
    fn read_desired_state_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(read_desired_state(&path).is_err());
    }
}
