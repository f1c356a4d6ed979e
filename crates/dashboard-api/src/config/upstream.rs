//! Upstream identity service (Appwrite) configuration.

use serde::Deserialize;

/// Credentials and endpoint of the Appwrite project.
///
/// Environment variables are prefixed with `APPWRITE_`:
/// - `APPWRITE_ENDPOINT`: API endpoint (default: "http://localhost/v1")
/// - `APPWRITE_PROJECT_ID`: Project identifier (required)
/// - `APPWRITE_API_KEY`: Server API key with `users.read` scope (required)
/// - `APPWRITE_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
#[derive(Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    pub project_id: String,

    pub api_key: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl UpstreamConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("APPWRITE_").from_env::<UpstreamConfig>()
    }
}

// The API key must never reach the logs.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
