//! User service: counts, recent sign-ups and growth histogram.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::AppResult;
use crate::models::GrowthPoint;
use crate::upstream::{IdentityBackend, User, UserQuery};

pub const DEFAULT_RECENT_LIMIT: u32 = 10;
pub const MAX_RECENT_LIMIT: u32 = 100;
pub const DEFAULT_GROWTH_DAYS: i64 = 30;
pub const MAX_GROWTH_DAYS: i64 = 365;

/// Users fetched for the growth histogram.
const GROWTH_PAGE: u32 = 100;

/// Service for user operations.
#[derive(Clone)]
pub struct UserService {
    backend: Arc<dyn IdentityBackend>,
}

impl UserService {
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Total number of users in the project.
    pub async fn count(&self) -> AppResult<u64> {
        let list = self.backend.list_users(&UserQuery::new().limit(1)).await?;
        Ok(list.total)
    }

    /// The `limit` most recently created users, newest first.
    pub async fn recent(&self, limit: u32) -> AppResult<Vec<User>> {
        let limit = limit.clamp(1, MAX_RECENT_LIMIT);
        let mut users = self
            .backend
            .list_users(&UserQuery::new().newest_first().limit(limit))
            .await?
            .users;

        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users.truncate(limit as usize);
        Ok(users)
    }

    /// Sign-ups per UTC calendar day over the trailing `days`.
    pub async fn growth(&self, days: i64) -> AppResult<Vec<GrowthPoint>> {
        self.growth_at(days, Utc::now()).await
    }

    pub async fn growth_at(&self, days: i64, now: DateTime<Utc>) -> AppResult<Vec<GrowthPoint>> {
        let days = days.clamp(1, MAX_GROWTH_DAYS);
        let since = now - Duration::days(days);

        let users = self
            .backend
            .list_users(
                &UserQuery::new()
                    .created_after(since)
                    .oldest_first()
                    .limit(GROWTH_PAGE),
            )
            .await?
            .users;

        Ok(users_by_date(&users))
    }
}

/// Fold users into per-day counts, oldest day first.
pub fn users_by_date(users: &[User]) -> Vec<GrowthPoint> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for user in users {
        *by_date.entry(user.created_at.date_naive()).or_insert(0) += 1;
    }

    by_date
        .into_iter()
        .map(|(date, users)| GrowthPoint {
            date: date.format("%Y-%m-%d").to_string(),
            users,
        })
        .collect()
}
