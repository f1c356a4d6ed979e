//! User API handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{DataResponse, GrowthPoint, RecentUsersResponse, UserCountResponse};
use crate::services::users::{UserService, DEFAULT_GROWTH_DAYS, DEFAULT_RECENT_LIMIT};

/// Query parameters for `GET /api/users/recent`.
#[derive(Debug, Deserialize, Default)]
pub struct RecentQuery {
    pub limit: Option<String>,
}

/// Query parameters for `GET /api/users/growth`.
#[derive(Debug, Deserialize, Default)]
pub struct GrowthQuery {
    pub days: Option<String>,
}

static LEADING_INT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").ok());

/// Parse the leading integer of a query value, so `"5abc"` reads as 5.
/// No leading digits means "use the default".
fn numeric(raw: Option<&str>) -> Option<i64> {
    let re: &Option<Regex> = &LEADING_INT;
    let digits = re.as_ref()?.captures(raw?)?.get(1)?.as_str();
    digits.parse::<i64>().ok()
}

/// Total user count.
///
/// `GET /api/users/count`
///
/// # Response
///
/// ```json
/// { "total": 1250 }
/// ```
pub async fn count(State(service): State<UserService>) -> AppResult<Json<UserCountResponse>> {
    let total = service
        .count()
        .await
        .map_err(|e| e.public("Failed to fetch user count"))?;
    Ok(Json(UserCountResponse { total }))
}

/// Most recently created users, newest first.
///
/// `GET /api/users/recent?limit=10`
pub async fn recent(
    State(service): State<UserService>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<RecentUsersResponse>> {
    let limit = numeric(query.limit.as_deref())
        .map(|n| n.clamp(1, u32::MAX as i64) as u32)
        .unwrap_or(DEFAULT_RECENT_LIMIT);
    let users = service
        .recent(limit)
        .await
        .map_err(|e| e.public("Failed to fetch recent users"))?;
    Ok(Json(RecentUsersResponse { users }))
}

/// Sign-ups per day.
///
/// `GET /api/users/growth?days=30`
///
/// # Response
///
/// ```json
/// { "data": [{ "date": "2024-06-10", "users": 2 }] }
/// ```
pub async fn growth(
    State(service): State<UserService>,
    Query(query): Query<GrowthQuery>,
) -> AppResult<Json<DataResponse<GrowthPoint>>> {
    let days = numeric(query.days.as_deref()).unwrap_or(DEFAULT_GROWTH_DAYS);
    let data = service
        .growth(days)
        .await
        .map_err(|e| e.public("Failed to fetch user growth data"))?;
    Ok(Json(data.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_param() {
        assert_eq!(numeric(Some("5")), Some(5));
        assert_eq!(numeric(Some(" 12 ")), Some(12));
        assert_eq!(numeric(Some("abc")), None);
        assert_eq!(numeric(None), None);
    }

    #[test]
    fn test_numeric_reads_leading_digits() {
        assert_eq!(numeric(Some("5abc")), Some(5));
        assert_eq!(numeric(Some("  7 days")), Some(7));
        assert_eq!(numeric(Some("-3")), Some(-3));
        assert_eq!(numeric(Some("+4")), Some(4));
        assert_eq!(numeric(Some("x5")), None);
        assert_eq!(numeric(Some("99999999999999999999")), None);
    }
}
