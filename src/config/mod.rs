//! Configuration module
//!
//! Provides layered configuration loading from files, environment
//! variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`OSPOLICY_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)

pub mod error;
pub mod logging;
pub mod retry;
pub mod service;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use retry::{Backoff, DeleteConfig, PollConfig, RetryConfig};
pub use service::ServiceConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified client configuration: service endpoint, retry and poll
/// policies, delete confirmation, and logging.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub service: ServiceConfig,
    pub retry: RetryConfig,
    pub poll: PollConfig,
    pub delete: DeleteConfig,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supports OSPOLICY_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("OSPOLICY_ENDPOINT") {
            self.service.endpoint = endpoint;
        }
        if let Ok(project) = std::env::var("OSPOLICY_PROJECT") {
            self.service.project = project;
        }
        if let Ok(location) = std::env::var("OSPOLICY_LOCATION") {
            self.service.location = location;
        }
        if let Ok(token) = std::env::var("OSPOLICY_AUTH_TOKEN") {
            self.service.auth_token = Some(token);
        }

        if let Ok(level) = std::env::var("OSPOLICY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("OSPOLICY_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }
}
