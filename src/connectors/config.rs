use serde::{Deserialize, Serialize};

/// Configuration for external service connectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    pub auth_service: Option<AuthServiceConfig>,
}

/// Auth Service connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthServiceConfig {
    /// Enable/disable the Auth Service integration; disabled falls back to
    /// the mock (local development against the mocked backend)
    pub enabled: bool,
    /// Base URL for the Auth Service API (e.g., http://localhost:4100/oauth_server)
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:4100/oauth_server".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            auth_service: Some(AuthServiceConfig::default()),
        }
    }
}
