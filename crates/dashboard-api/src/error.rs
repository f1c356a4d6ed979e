//! Errors surfaced by the dashboard routes.
//!
//! Every error renders as HTTP 500 with a bare `{"error": <message>}` body.
//! Upstream detail goes to the log, never to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Body message for an upstream failure that no route relabelled.
const GENERIC_UPSTREAM_MESSAGE: &str = "Failed to reach the identity service";

#[derive(Error, Debug)]
pub enum AppError {
    /// The Appwrite API failed or answered with a non-2xx status.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// An upstream failure relabelled with the route's public message.
    #[error("{message}")]
    Route {
        message: &'static str,
        #[source]
        source: UpstreamError,
    },

    /// A session identifier matched nothing in the scanned users.
    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    /// Attach the message the caller sees in place of upstream detail.
    pub fn public(self, message: &'static str) -> Self {
        match self {
            AppError::Upstream(source) => AppError::Route { message, source },
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Upstream(e) => {
                tracing::error!(error = %e, "Appwrite request failed");
                GENERIC_UPSTREAM_MESSAGE.to_string()
            }
            AppError::Route { message, source } => {
                tracing::error!(error = %source, message, "Appwrite request failed");
                message.to_string()
            }
            AppError::NotFound(msg) => {
                tracing::warn!(error = %msg, "Lookup failed");
                msg
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn outage() -> UpstreamError {
        UpstreamError::Status {
            status: 401,
            body: "invalid api key".to_string(),
        }
    }

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFound("Session not found: abc".to_string());
        assert_eq!(err.to_string(), "Session not found: abc");
    }

    #[tokio::test]
    async fn test_not_found_is_500_with_bare_body() {
        let (status, body) = render(AppError::NotFound("Session not found: abc".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Session not found: abc" }));
    }

    #[tokio::test]
    async fn test_route_message_hides_upstream_detail() {
        let err = AppError::from(outage()).public("Failed to fetch user count");
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch user count" }));
    }

    #[tokio::test]
    async fn test_unlabelled_upstream_error_is_generic() {
        let (status, body) = render(AppError::from(outage())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GENERIC_UPSTREAM_MESSAGE);
        assert!(!body.to_string().contains("invalid api key"));
    }

    #[test]
    fn test_public_keeps_not_found() {
        let err = AppError::NotFound("Session not found: abc".to_string()).public("Failed to fetch session details");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
