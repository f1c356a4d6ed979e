//! Dashboard summary service.

use chrono::{DateTime, Duration, Utc};

use crate::error::AppResult;
use crate::models::DashboardStats;
use crate::services::{SessionService, UserService};
use crate::upstream::User;

/// Recent users inspected when counting new sign-ups.
const RECENT_WINDOW: u32 = 30;

/// Service for the summary block of the dashboard.
#[derive(Clone)]
pub struct DashboardService {
    users: UserService,
    sessions: SessionService,
}

impl DashboardService {
    pub fn new(users: UserService, sessions: SessionService) -> Self {
        Self { users, sessions }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        self.stats_at(Utc::now()).await
    }

    /// Count, session aggregate and recent users are fetched concurrently.
    /// Only the user fetches can fail the summary.
    pub async fn stats_at(&self, now: DateTime<Utc>) -> AppResult<DashboardStats> {
        let (total_users, sessions, recent) = tokio::join!(
            self.users.count(),
            self.sessions.active_sessions_at(now),
            self.users.recent(RECENT_WINDOW),
        );

        let total_users = total_users?;
        let recent = recent?;
        let active_sessions = sessions.iter().filter(|s| s.active).count() as u64;
        let new_users = count_new_users(&recent, now);

        Ok(DashboardStats {
            total_users,
            active_sessions,
            new_users,
            user_growth: percentage(new_users, total_users),
            session_growth: percentage(active_sessions, total_users),
        })
    }
}

/// Users created within the 24 hours before `now`.
pub fn count_new_users(recent: &[User], now: DateTime<Utc>) -> u64 {
    let cutoff = now - Duration::hours(24);
    recent.iter().filter(|u| u.created_at > cutoff).count() as u64
}

/// `part / total × 100` to one decimal place; zero when `total` is zero.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = part as f64 / total as f64 * 100.0;
    (ratio * 10.0).round() / 10.0
}
