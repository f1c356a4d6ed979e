//! Dashboard API handlers.

use axum::{extract::State, Json};

use crate::error::AppError;
use crate::models::DashboardStats;
use crate::services::DashboardService;

/// Get dashboard statistics.
///
/// GET /api/dashboard/stats
///
/// # Response
///
/// ```json
/// {
///   "totalUsers": 1250,
///   "activeSessions": 320,
///   "newUsers": 45,
///   "userGrowth": 3.6,
///   "sessionGrowth": 25.6
/// }
/// ```
pub async fn get_stats(
    State(service): State<DashboardService>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = service
        .stats()
        .await
        .map_err(|e| e.public("Failed to fetch dashboard stats"))?;
    Ok(Json(stats))
}
