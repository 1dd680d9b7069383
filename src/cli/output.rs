//! Output formatting helpers for CLI commands

use crate::model::{ObjectField, OsPolicyAssignment};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for assignment display
#[derive(Debug, Clone, serde::Serialize)]
pub struct AssignmentView {
    pub name: String,
    pub policies: usize,
    pub modes: Vec<String>,
    pub rollout_state: String,
    pub revision_id: String,
    pub reconciling: bool,
}

impl From<&OsPolicyAssignment> for AssignmentView {
    fn from(assignment: &OsPolicyAssignment) -> Self {
        let mut modes: Vec<String> = assignment
            .os_policies
            .iter()
            .filter_map(|p| p.mode.clone())
            .collect();
        modes.dedup();

        Self {
            name: assignment.name.clone().unwrap_or_default(),
            policies: assignment.os_policies.len(),
            modes,
            rollout_state: assignment.rollout_state.clone().unwrap_or_default(),
            revision_id: assignment.revision_id.clone().unwrap_or_default(),
            reconciling: assignment.reconciling.unwrap_or(false),
        }
    }
}

/// Format assignments as a table
pub fn format_assignments_table(assignments: &[AssignmentView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Policies", "Modes", "Rollout", "Revision"]);

    for view in assignments {
        let rollout = match view.rollout_state.as_str() {
            "SUCCEEDED" => view.rollout_state.as_str().green().to_string(),
            "IN_PROGRESS" => view.rollout_state.as_str().yellow().to_string(),
            "CANCELLING" | "CANCELLED" => view.rollout_state.as_str().red().to_string(),
            other => other.to_string(),
        };

        table.add_row(vec![
            Cell::new(&view.name),
            Cell::new(view.policies),
            Cell::new(view.modes.join(", ")),
            Cell::new(rollout),
            Cell::new(&view.revision_id),
        ]);
    }

    table.to_string()
}

/// Format assignments as JSON
pub fn format_assignments_json(assignments: &[AssignmentView]) -> String {
    serde_json::to_string_pretty(&json!({
        "assignments": assignments
    }))
    .unwrap_or_default()
}

/// Multi-line detail view for a single assignment
pub fn format_assignment_detail(assignment: &OsPolicyAssignment) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        "Name:".bold(),
        assignment.name.as_deref().unwrap_or("(unset)")
    ));
    if let Some(description) = &assignment.description {
        lines.push(format!("{} {}", "Description:".bold(), description));
    }
    lines.push(format!(
        "{} {}",
        "Policies:".bold(),
        assignment.os_policies.len()
    ));
    for policy in &assignment.os_policies {
        lines.push(format!(
            "  - {} ({})",
            policy.id.as_deref().unwrap_or("(unset)"),
            policy.mode.as_deref().unwrap_or("MODE_UNSPECIFIED")
        ));
    }
    if let ObjectField::Set(rollout) = &assignment.rollout {
        if let Some(wait) = &rollout.min_wait_duration {
            lines.push(format!("{} {}", "Min wait:".bold(), wait));
        }
    }
    if let Some(state) = &assignment.rollout_state {
        lines.push(format!("{} {}", "Rollout state:".bold(), state));
    }
    if let Some(revision) = &assignment.revision_id {
        lines.push(format!("{} {}", "Revision:".bold(), revision));
    }
    lines.join("\n")
}

/// Pretty JSON for a single assignment
pub fn format_assignment_json(assignment: &OsPolicyAssignment) -> String {
    serde_json::to_string_pretty(assignment).unwrap_or_default()
}
