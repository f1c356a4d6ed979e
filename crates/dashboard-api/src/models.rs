//! Response shapes of the dashboard API.
//!
//! Field names are camelCase on the wire; the terminal client
//! deserializes the same types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::upstream::User;
use crate::user_agent::DeviceClass;

/// Placeholder shown wherever a location is expected; sessions are never geolocated.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// A session augmented with parsed client details and derived timing fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSession {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub device: DeviceClass,
    pub browser: String,
    pub os: String,
    pub ip: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whole minutes between creation and expiry.
    pub duration: i64,
    pub active: bool,
    pub provider: String,
    pub current: bool,
}

/// `GET /api/sessions/active`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveSessionsResponse {
    pub sessions: Vec<EnrichedSession>,
    pub total: usize,
}

impl From<Vec<EnrichedSession>> for ActiveSessionsResponse {
    fn from(sessions: Vec<EnrichedSession>) -> Self {
        Self {
            total: sessions.len(),
            sessions,
        }
    }
}

/// One entry of a session's activity timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}

impl SessionAction {
    pub fn login(at: DateTime<Utc>) -> Self {
        Self {
            kind: "login".to_string(),
            timestamp: at,
            details: "Session started".to_string(),
        }
    }
}

/// `GET /api/sessions/details/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub session: EnrichedSession,
    pub actions: Vec<SessionAction>,
}

/// A labelled count, used by the device and location histograms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

impl NamedCount {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A 3-hour time-of-day bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBucket {
    pub time: String,
    pub sessions: u64,
}

/// A day of the user growth histogram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrowthPoint {
    pub date: String,
    pub users: u64,
}

/// Envelope for chart series: `{"data": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for DataResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// `GET /api/users/count`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCountResponse {
    pub total: u64,
}

/// `GET /api/users/recent`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentUsersResponse {
    pub users: Vec<User>,
}

/// `GET /api/dashboard/stats`
///
/// The growth figures are instantaneous ratios against the total user
/// count, not period-over-period growth.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_sessions: u64,
    pub new_users: u64,
    pub user_growth: f64,
    pub session_growth: f64,
}
