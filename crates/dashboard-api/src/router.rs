//! Route table of the dashboard API.

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    // The dashboard frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let health_routes = Router::new()
        .route("/api/health", get(handlers::api_health))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/api/users/count", get(handlers::users::count))
        .route("/api/users/recent", get(handlers::users::recent))
        .route("/api/users/growth", get(handlers::users::growth))
        .with_state(state.user_service());

    let session_routes = Router::new()
        .route("/api/sessions/active", get(handlers::sessions::active))
        .route("/api/sessions/by-device", get(handlers::sessions::by_device))
        .route(
            "/api/sessions/by-location",
            get(handlers::sessions::by_location),
        )
        .route("/api/sessions/by-time", get(handlers::sessions::by_time))
        .route(
            "/api/sessions/details/{session_id}",
            get(handlers::sessions::details),
        )
        .with_state(state.session_service());

    let dashboard_routes = Router::new()
        .route("/api/dashboard/stats", get(handlers::dashboard::get_stats))
        .with_state(state.dashboard_service());

    Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(session_routes)
        .merge(dashboard_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::{self, session_expiring, user, MemoryBackend};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(backend: MemoryBackend) -> Router {
        build_router(AppState::new(backend.into_arc(), AppConfig::default()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(MemoryBackend::new()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_user_count() {
        let backend = MemoryBackend::new()
            .with_user(user("u1", Utc::now()))
            .with_user(user("u2", Utc::now()));
        let (status, body) = get_json(app(backend), "/api/users/count").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_recent_users_limit_with_fewer_users() {
        let now = Utc::now();
        let backend = MemoryBackend::new()
            .with_user(user("b", now - Duration::days(1)))
            .with_user(user("a", now - Duration::days(2)))
            .with_user(user("c", now));

        let (status, body) = get_json(app(backend), "/api/users/recent?limit=5").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["users"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["$id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_recent_users_bad_limit_uses_default() {
        let mut backend = MemoryBackend::new();
        for i in 0..15 {
            backend = backend.with_user(user(&format!("u{}", i), Utc::now()));
        }
        let (status, body) = get_json(app(backend), "/api/users/recent?limit=lots").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_recent_users_limit_reads_leading_digits() {
        let mut backend = MemoryBackend::new();
        for i in 0..5 {
            backend = backend.with_user(user(&format!("u{}", i), Utc::now()));
        }
        let (status, body) = get_json(app(backend), "/api/users/recent?limit=2abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_user_routes_fail_with_500_on_outage() {
        let (status, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/users/count").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to fetch user count" }));

        let (status, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/users/recent").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch recent users");

        let (_, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/users/growth").await;
        assert_eq!(body["error"], "Failed to fetch user growth data");
    }

    #[tokio::test]
    async fn test_growth_shape() {
        let backend = MemoryBackend::new().with_user(user("u1", Utc::now() - Duration::days(1)));
        let (status, body) = get_json(app(backend), "/api/users/growth?days=7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["users"], 1);
        assert!(body["data"][0]["date"].is_string());
    }

    #[tokio::test]
    async fn test_active_sessions() {
        let backend = MemoryBackend::new()
            .with_user(user("u1", Utc::now()))
            .with_session(testing::session(
                "live",
                "u1",
                Utc::now() - Duration::hours(1),
                Utc::now() + Duration::minutes(5),
                testing::CHROME_WINDOWS,
            ))
            .with_session(testing::session(
                "gone",
                "u1",
                Utc::now() - Duration::hours(1),
                Utc::now() - Duration::minutes(5),
                testing::CHROME_WINDOWS,
            ));

        let (status, body) = get_json(app(backend), "/api/sessions/active").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        let active = body["sessions"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|s| s["active"] == true)
            .count();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_session_routes_degrade_on_outage() {
        let (status, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/sessions/active").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);

        let (status, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/sessions/by-device").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "Desktop");
        assert_eq!(body["data"][0]["value"], 0);

        let (_, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/sessions/by-location").await;
        assert_eq!(body["data"][0]["name"], "Unknown");

        let (_, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/sessions/by-time").await;
        assert_eq!(body["data"][0]["time"], "00:00");
        assert_eq!(body["data"][0]["sessions"], 0);
    }

    #[tokio::test]
    async fn test_session_details_found() {
        let backend = MemoryBackend::new()
            .with_user(user("u1", Utc::now()))
            .with_session(session_expiring("s1", "u1", Duration::hours(1)));

        let (status, body) = get_json(app(backend), "/api/sessions/details/s1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "s1");
        assert_eq!(body["userEmail"], "u1@example.com");
        assert_eq!(body["actions"][0]["type"], "login");
    }

    #[tokio::test]
    async fn test_session_details_unknown_id() {
        let backend = MemoryBackend::new().with_user(user("u1", Utc::now()));
        let (status, body) = get_json(app(backend), "/api/sessions/details/unknown-id").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Session not found: unknown-id" }));
    }

    #[tokio::test]
    async fn test_session_details_outage_is_generic_500() {
        let (status, body) = get_json(
            app(MemoryBackend::new().unavailable()),
            "/api/sessions/details/s1",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to fetch session details" }));
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let backend = MemoryBackend::new()
            .with_user(user("u1", Utc::now() - Duration::hours(1)))
            .with_user(user("u2", Utc::now() - Duration::days(3)));

        let (status, body) = get_json(app(backend), "/api/dashboard/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalUsers"], 2);
        assert_eq!(body["newUsers"], 1);
        assert_eq!(body["userGrowth"], 50.0);
        assert_eq!(body["activeSessions"], 0);
    }

    #[tokio::test]
    async fn test_dashboard_stats_outage_is_500() {
        let (status, body) = get_json(app(MemoryBackend::new().unavailable()), "/api/dashboard/stats").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to fetch dashboard stats" }));
    }
}
