//! CLI module
//!
//! Command-line interface definitions and handlers for the OS policy
//! assignment client.
//!
//! # Commands
//!
//! - `get` - Show one assignment
//! - `list` - List assignments in a location
//! - `apply` - Converge an assignment to a desired state file
//! - `delete` - Delete an assignment
//! - `delete-all` - Delete assignments matching a name prefix
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Converge to the state described in a file
//! ospolicy apply -f web-hardening.json --project acme-prod
//!
//! # List assignments as JSON
//! ospolicy list --project acme-prod --json
//! ```

pub mod apply;
pub mod assignments;
pub mod completions;
pub mod config;
pub mod output;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::ClientConfig;
use crate::model::ParentRef;
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ospolicy - declarative OS policy assignment client
#[derive(Parser, Debug)]
#[command(
    name = "ospolicy",
    version,
    about = "Declarative client for OS policy assignments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one assignment
    Get(GetArgs),
    /// List assignments in a location
    List(ListArgs),
    /// Converge an assignment to a desired state file
    Apply(ApplyArgs),
    /// Delete an assignment
    Delete(DeleteArgs),
    /// Delete assignments matching a name prefix
    DeleteAll(DeleteAllArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Assignment name
    pub name: String,

    /// Project (falls back to config)
    #[arg(short, long, env = "OSPOLICY_PROJECT")]
    pub project: Option<String>,

    /// Location (falls back to config)
    #[arg(short, long, env = "OSPOLICY_LOCATION")]
    pub location: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "ospolicy.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Project (falls back to config)
    #[arg(short, long, env = "OSPOLICY_PROJECT")]
    pub project: Option<String>,

    /// Location (falls back to config)
    #[arg(short, long, env = "OSPOLICY_LOCATION")]
    pub location: Option<String>,

    /// Stop after this many results
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "ospolicy.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Desired state file (JSON, wire shape)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Project (falls back to config)
    #[arg(short, long, env = "OSPOLICY_PROJECT")]
    pub project: Option<String>,

    /// Location (falls back to config)
    #[arg(short, long, env = "OSPOLICY_LOCATION")]
    pub location: Option<String>,

    /// Fail instead of creating a missing resource
    #[arg(long)]
    pub block_create: bool,

    /// Fail instead of taking ownership of an existing resource
    #[arg(long)]
    pub block_acquire: bool,

    /// Fail instead of modifying an existing resource
    #[arg(long)]
    pub block_modify: bool,

    /// Overall deadline in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Output the final state as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "ospolicy.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Assignment name
    pub name: String,

    /// Project (falls back to config)
    #[arg(short, long, env = "OSPOLICY_PROJECT")]
    pub project: Option<String>,

    /// Location (falls back to config)
    #[arg(short, long, env = "OSPOLICY_LOCATION")]
    pub location: Option<String>,

    /// Fail if the assignment does not exist
    #[arg(long)]
    pub strict: bool,

    /// Return once the server accepts the delete, without awaiting rollout
    #[arg(long)]
    pub skip_await: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "ospolicy.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteAllArgs {
    /// Only delete assignments whose name starts with this prefix
    #[arg(long)]
    pub name_prefix: Option<String>,

    /// Project (falls back to config)
    #[arg(short, long, env = "OSPOLICY_PROJECT")]
    pub project: Option<String>,

    /// Location (falls back to config)
    #[arg(short, long, env = "OSPOLICY_LOCATION")]
    pub location: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "ospolicy.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "ospolicy.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration, with the file being optional.
pub fn load_config(path: &PathBuf) -> Result<ClientConfig> {
    let config = if path.exists() {
        ClientConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        ClientConfig::default()
    };
    Ok(config.with_env_overrides())
}

/// Resolve project/location from CLI flags with config fallback.
pub fn resolve_parent(
    config: &ClientConfig,
    project: &Option<String>,
    location: &Option<String>,
) -> Result<ParentRef> {
    let project = project
        .clone()
        .unwrap_or_else(|| config.service.project.clone());
    if project.is_empty() {
        bail!("no project specified; pass --project or set it in the config file");
    }
    let location = location
        .clone()
        .unwrap_or_else(|| config.service.location.clone());
    Ok(ParentRef::new(project, location))
}
