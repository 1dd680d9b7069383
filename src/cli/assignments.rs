//! Get, list, and delete command handlers

use crate::cli::output::{
    format_assignment_detail, format_assignment_json, format_assignments_json,
    format_assignments_table, AssignmentView,
};
use crate::cli::{DeleteAllArgs, DeleteArgs, GetArgs, ListArgs};
use crate::client::{AssignmentClient, DeleteOptions};
use crate::model::AssignmentRef;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Handle `ospolicy get`
pub async fn handle_get(
    args: &GetArgs,
    client: &AssignmentClient,
    parent: &crate::model::ParentRef,
) -> Result<String> {
    let target = AssignmentRef::new(
        parent.project.clone(),
        parent.location.clone(),
        args.name.clone(),
    );
    let cancel = CancellationToken::new();
    let snapshot = client.get(&target, &cancel).await?;
    let assignment = snapshot.into_assignment(&target);

    if args.json {
        Ok(format_assignment_json(&assignment))
    } else {
        Ok(format_assignment_detail(&assignment))
    }
}

/// Handle `ospolicy list`
pub async fn handle_list(
    args: &ListArgs,
    client: &AssignmentClient,
    parent: &crate::model::ParentRef,
) -> Result<String> {
    let cancel = CancellationToken::new();
    let assignments = client
        .list_with_max_results(parent, args.max_results, &cancel)
        .await?;
    let views: Vec<AssignmentView> = assignments.iter().map(AssignmentView::from).collect();

    if args.json {
        Ok(format_assignments_json(&views))
    } else {
        Ok(format_assignments_table(&views))
    }
}

/// Handle `ospolicy delete`
pub async fn handle_delete(
    args: &DeleteArgs,
    client: &AssignmentClient,
    parent: &crate::model::ParentRef,
) -> Result<String> {
    let target = AssignmentRef::new(
        parent.project.clone(),
        parent.location.clone(),
        args.name.clone(),
    );
    let options = DeleteOptions {
        allow_missing: !args.strict,
        skip_await: args.skip_await,
    };
    let cancel = CancellationToken::new();

    if client.delete(&target, &options, &cancel).await? {
        Ok(format!("Deleted {}", target.resource_path()))
    } else {
        Ok(format!(
            "Nothing to delete: {} does not exist",
            target.resource_path()
        ))
    }
}

/// Handle `ospolicy delete-all`
pub async fn handle_delete_all(
    args: &DeleteAllArgs,
    client: &AssignmentClient,
    parent: &crate::model::ParentRef,
) -> Result<String> {
    let prefix = args.name_prefix.clone();
    let cancel = CancellationToken::new();
    let deleted = client
        .delete_all(
            parent,
            |assignment| match (&prefix, &assignment.name) {
                (Some(prefix), Some(name)) => name.starts_with(prefix.as_str()),
                (Some(_), None) => false,
                (None, _) => true,
            },
            &cancel,
        )
        .await?;
    Ok(format!("Deleted {deleted} assignment(s)"))
}
