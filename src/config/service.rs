//! Service endpoint configuration

use serde::{Deserialize, Serialize};

/// Service endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the OS policy service API.
    pub endpoint: String,
    /// Default project for commands and desired states that omit one.
    pub project: String,
    /// Default location for commands and desired states that omit one.
    pub location: String,
    pub request_timeout_seconds: u64,
    /// Bearer token sent with every request, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://osconfig.googleapis.com/v1".to_string(),
            project: String::new(),
            location: "global".to_string(),
            request_timeout_seconds: 30,
            auth_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.location, "global");
        assert_eq!(config.request_timeout_seconds, 30);
        assert!(config.auth_token.is_none());
    }
}
