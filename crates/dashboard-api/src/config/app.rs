//! Application configuration for the Appwrite Dashboard API.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `DASHBOARD_`:
/// - `DASHBOARD_HOST`: Server bind address (default: "0.0.0.0")
/// - `DASHBOARD_PORT`: Server port (default: 5000)
/// - `DASHBOARD_USER_PAGE_SIZE`: Users scanned per session listing (default: 100)
/// - `DASHBOARD_SESSION_FANOUT`: Concurrent per-user session calls (default: 8)
/// - `DASHBOARD_LOG_JSON`: Emit JSON log lines (default: false)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Fixed page of users scanned by the session routines
    #[serde(default = "default_user_page_size")]
    pub user_page_size: u32,

    /// Upper bound on in-flight per-user session requests
    #[serde(default = "default_session_fanout")]
    pub session_fanout: usize,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_user_page_size() -> u32 {
    100
}

fn default_session_fanout() -> usize {
    8
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `DASHBOARD_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("DASHBOARD_").from_env::<AppConfig>()
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fan-out cap, never below one.
    pub fn fanout(&self) -> usize {
        self.session_fanout.max(1)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user_page_size: default_user_page_size(),
            session_fanout: default_session_fanout(),
            log_json: false,
        }
    }
}
