//! In-memory identity backend for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::upstream::{
    IdentityBackend, Order, Session, SessionList, UpstreamError, User, UserList, UserQuery,
};

pub const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.71 Safari/537.36";
pub const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
pub const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";

/// Fixed reference instant used across tests.
pub fn now() -> DateTime<Utc> {
    "2024-06-15T12:00:00Z".parse().unwrap()
}

pub fn user(id: &str, created_at: DateTime<Utc>) -> User {
    User {
        id: id.to_string(),
        name: format!("User {}", id),
        email: format!("{}@example.com", id),
        created_at,
    }
}

pub fn session(
    id: &str,
    user_id: &str,
    created_at: DateTime<Utc>,
    expire: DateTime<Utc>,
    user_agent: &str,
) -> Session {
    Session {
        id: id.to_string(),
        user_id: user_id.to_string(),
        created_at,
        updated_at: None,
        expire,
        provider: "email".to_string(),
        ip: "10.0.0.1".to_string(),
        current: false,
        user_agent: Some(user_agent.to_string()),
        client_name: None,
        client_version: None,
        os_name: None,
        os_version: None,
        device_name: None,
    }
}

/// Session created one hour before [`now`] that expires `expires_in` after it.
pub fn session_expiring(id: &str, user_id: &str, expires_in: Duration) -> Session {
    session(
        id,
        user_id,
        now() - Duration::hours(1),
        now() + expires_in,
        CHROME_WINDOWS,
    )
}

#[derive(Default)]
pub struct MemoryBackend {
    users: Vec<User>,
    sessions: HashMap<String, Vec<Session>>,
    failing_users: HashSet<String>,
    unavailable: bool,
    session_delays: HashMap<String, StdDuration>,
    session_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.sessions
            .entry(session.user_id.clone())
            .or_default()
            .push(session);
        self
    }

    /// Session listing for this user fails.
    pub fn with_failing_user(mut self, user_id: &str) -> Self {
        self.failing_users.insert(user_id.to_string());
        self
    }

    /// Every call fails, as if the upstream were unreachable.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Session listing for this user takes `delay` to answer.
    pub fn with_session_delay(mut self, user_id: &str, delay: StdDuration) -> Self {
        self.session_delays.insert(user_id.to_string(), delay);
        self
    }

    /// Most session listings that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn outage() -> UpstreamError {
        UpstreamError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl IdentityBackend for MemoryBackend {
    async fn list_users(&self, query: &UserQuery) -> Result<UserList, UpstreamError> {
        if self.unavailable {
            return Err(Self::outage());
        }

        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|u| query.created_after.map_or(true, |after| u.created_at > after))
            .cloned()
            .collect();

        match query.order_by_created {
            Some(Order::Asc) => users.sort_by_key(|u| u.created_at),
            Some(Order::Desc) => users.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            None => {}
        }

        let total = users.len() as u64;
        if let Some(limit) = query.limit {
            users.truncate(limit as usize);
        }

        Ok(UserList { total, users })
    }

    async fn list_user_sessions(&self, user_id: &str) -> Result<SessionList, UpstreamError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.session_delays.get(user_id) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unavailable || self.failing_users.contains(user_id) {
            return Err(Self::outage());
        }

        let sessions = self.sessions.get(user_id).cloned().unwrap_or_default();
        Ok(SessionList {
            total: sessions.len() as u64,
            sessions,
        })
    }
}
