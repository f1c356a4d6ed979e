//! Session API handlers.
//!
//! Listing and histogram endpoints degrade to empty or fallback data when
//! the upstream is unavailable; only the detail lookup reports errors.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::models::{ActiveSessionsResponse, DataResponse, NamedCount, SessionDetails, TimeBucket};
use crate::services::SessionService;

/// Enriched session list.
///
/// `GET /api/sessions/active`
///
/// # Response
///
/// ```json
/// {
///   "sessions": [{ "id": "...", "userId": "...", "device": "Desktop", "active": true, ... }],
///   "total": 1
/// }
/// ```
pub async fn active(State(service): State<SessionService>) -> Json<ActiveSessionsResponse> {
    Json(service.active_sessions().await.into())
}

/// Device histogram.
///
/// `GET /api/sessions/by-device`
pub async fn by_device(State(service): State<SessionService>) -> Json<DataResponse<NamedCount>> {
    Json(service.by_device().await.into())
}

/// IP histogram. No geolocation is performed.
///
/// `GET /api/sessions/by-location`
pub async fn by_location(State(service): State<SessionService>) -> Json<DataResponse<NamedCount>> {
    Json(service.by_location().await.into())
}

/// Time-of-day histogram in 3-hour buckets.
///
/// `GET /api/sessions/by-time`
pub async fn by_time(State(service): State<SessionService>) -> Json<DataResponse<TimeBucket>> {
    Json(service.by_time().await.into())
}

/// Single session with its activity timeline.
///
/// `GET /api/sessions/details/{session_id}`
///
/// # Returns
///
/// - `200 OK` with the enriched session and `actions`
/// - `500` with `{"error": "Session not found: <id>"}` if no scanned user owns the session
pub async fn details(
    State(service): State<SessionService>,
    Path(session_id): Path<String>,
) -> AppResult<Json<SessionDetails>> {
    let details = service
        .session_details(&session_id)
        .await
        .map_err(|e| e.public("Failed to fetch session details"))?;
    Ok(Json(details))
}
