//! Health check endpoint for the Appwrite Dashboard API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealthResponse {
    /// Health status, always "ok" while the process serves requests
    pub status: String,

    pub message: String,

    /// Server uptime in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,

    /// Server version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Liveness probe.
///
/// `GET /api/health`
///
/// Does not contact the upstream service, so it stays cheap enough for
/// load balancer checks.
pub async fn api_health(State(state): State<AppState>) -> Json<ApiHealthResponse> {
    Json(ApiHealthResponse {
        status: "ok".to_string(),
        message: "Appwrite Dashboard API is running".to_string(),
        uptime_seconds: Some(state.uptime_seconds()),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::MemoryBackend;

    #[tokio::test]
    async fn test_health_check() {
        let state = AppState::new(MemoryBackend::new().unavailable().into_arc(), AppConfig::default());
        let response = api_health(State(state)).await;
        assert_eq!(response.status, "ok");
        assert!(response.version.is_some());
    }
}
