//! Session service: enrichment, lookup and histograms.
//!
//! Appwrite has no project-wide session listing for server keys, so every
//! routine here rebuilds the session view by scanning a fixed page of users
//! and listing each user's sessions. Per-user calls are fanned out with a
//! concurrency cap.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use futures::stream::{self, StreamExt};

use crate::error::{AppError, AppResult};
use crate::models::{EnrichedSession, NamedCount, SessionAction, SessionDetails, TimeBucket, UNKNOWN_LOCATION};
use crate::result_ext::ResultExt;
use crate::upstream::{IdentityBackend, Session, User, UserQuery};
use crate::user_agent::{self, browser_label, classify_device, os_label, DeviceClass, Product, UserAgent};

/// Hours covered by one time-of-day bucket.
const BUCKET_HOURS: u32 = 3;

/// Service for session operations.
#[derive(Clone)]
pub struct SessionService {
    backend: Arc<dyn IdentityBackend>,
    page_size: u32,
    fanout: usize,
}

impl SessionService {
    /// Create a new session service.
    ///
    /// # Arguments
    ///
    /// * `backend` - Upstream identity service
    /// * `page_size` - Number of users scanned per request
    /// * `fanout` - Maximum concurrent per-user session requests
    pub fn new(backend: Arc<dyn IdentityBackend>, page_size: u32, fanout: usize) -> Self {
        Self {
            backend,
            page_size,
            fanout: fanout.max(1),
        }
    }

    /// All sessions of the scanned users, enriched.
    ///
    /// Never fails: an upstream outage yields an empty list and a failure
    /// for one user only drops that user's sessions.
    pub async fn active_sessions(&self) -> Vec<EnrichedSession> {
        self.active_sessions_at(Utc::now()).await
    }

    pub async fn active_sessions_at(&self, now: DateTime<Utc>) -> Vec<EnrichedSession> {
        let users = self
            .backend
            .list_users(&UserQuery::new().limit(self.page_size))
            .await
            .degrade("listing users for session enrichment")
            .users;

        let per_user: Vec<(User, Vec<Session>)> = stream::iter(users)
            .map(|user| {
                let backend = Arc::clone(&self.backend);
                async move {
                    let sessions = backend
                        .list_user_sessions(&user.id)
                        .await
                        .degrade(format!("listing sessions for user {}", user.id))
                        .sessions;
                    (user, sessions)
                }
            })
            .buffered(self.fanout)
            .collect()
            .await;

        let enriched: Vec<EnrichedSession> = per_user
            .iter()
            .flat_map(|(user, sessions)| sessions.iter().map(move |s| enrich(user, s, now)))
            .collect();

        tracing::debug!(sessions = enriched.len(), "Enriched sessions");
        enriched
    }

    /// Look up one session by identifier, scanning users in order.
    pub async fn session_details(&self, session_id: &str) -> AppResult<SessionDetails> {
        self.session_details_at(session_id, Utc::now()).await
    }

    pub async fn session_details_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<SessionDetails> {
        let users = self
            .backend
            .list_users(&UserQuery::new().limit(self.page_size))
            .await?
            .users;

        for user in &users {
            let sessions = self
                .backend
                .list_user_sessions(&user.id)
                .await
                .degrade(format!("listing sessions for user {}", user.id))
                .sessions;

            if let Some(found) = sessions.iter().find(|s| s.id == session_id) {
                let session = enrich(user, found, now);
                return Ok(SessionDetails {
                    actions: vec![SessionAction::login(session.start_time)],
                    session,
                });
            }
        }

        Err(AppError::NotFound(format!("Session not found: {}", session_id)))
    }

    pub async fn by_device(&self) -> Vec<NamedCount> {
        group_by_device(&self.active_sessions().await)
    }

    pub async fn by_location(&self) -> Vec<NamedCount> {
        group_by_location(&self.active_sessions().await)
    }

    pub async fn by_time(&self) -> Vec<TimeBucket> {
        group_by_time(&self.active_sessions().await)
    }
}

/// Parsed client details, from the raw user-agent when present and from
/// Appwrite's own client fields otherwise.
fn client_of(session: &Session) -> UserAgent {
    if let Some(ua) = session.user_agent.as_deref().filter(|ua| !ua.trim().is_empty()) {
        return user_agent::parse(ua);
    }

    let product = |name: &Option<String>, version: &Option<String>| {
        name.as_ref().filter(|n| !n.is_empty()).map(|n| Product {
            name: n.clone(),
            version: version.clone().filter(|v| !v.is_empty()),
        })
    };

    let device_type = session.device_name.as_deref().map(|d| match d {
        "smartphone" | "phone" | "feature phone" => "mobile".to_string(),
        other => other.to_string(),
    });

    UserAgent {
        browser: product(&session.client_name, &session.client_version),
        os: product(&session.os_name, &session.os_version),
        device_type,
    }
}

/// Whole minutes from creation to expiry, rounded down.
pub fn duration_minutes(created_at: DateTime<Utc>, expire: DateTime<Utc>) -> i64 {
    (expire - created_at).num_milliseconds().div_euclid(60_000)
}

/// Build the enriched view of one session.
pub fn enrich(user: &User, session: &Session, now: DateTime<Utc>) -> EnrichedSession {
    let client = client_of(session);

    EnrichedSession {
        id: session.id.clone(),
        user_id: session.user_id.clone(),
        user_email: user.email.clone(),
        user_name: user.name.clone(),
        device: classify_device(client.device_type.as_deref()),
        browser: browser_label(client.browser.as_ref()),
        os: os_label(client.os.as_ref()),
        ip: session.ip.clone(),
        location: UNKNOWN_LOCATION.to_string(),
        start_time: session.created_at,
        last_active: session.updated_at.unwrap_or(session.created_at),
        expires_at: session.expire,
        duration: duration_minutes(session.created_at, session.expire),
        active: now < session.expire,
        provider: session.provider.clone(),
        current: session.current,
    }
}

/// Session counts per device class, Mobile/Desktop/Tablet order, zero classes omitted.
pub fn group_by_device(sessions: &[EnrichedSession]) -> Vec<NamedCount> {
    let mut counts: BTreeMap<DeviceClass, u64> = BTreeMap::new();
    for s in sessions {
        *counts.entry(s.device).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return vec![NamedCount::new(DeviceClass::Desktop.as_str(), 0)];
    }

    counts
        .into_iter()
        .map(|(class, count)| NamedCount::new(class.as_str(), count))
        .collect()
}

/// Session counts per raw IP address, most frequent first.
pub fn group_by_location(sessions: &[EnrichedSession]) -> Vec<NamedCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for s in sessions {
        let ip = if s.ip.trim().is_empty() { "Unknown" } else { s.ip.as_str() };
        *counts.entry(ip).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return vec![NamedCount::new("Unknown", 0)];
    }

    let mut data: Vec<NamedCount> = counts
        .into_iter()
        .map(|(ip, count)| NamedCount::new(ip, count))
        .collect();
    data.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    data
}

/// Session counts per 3-hour window of the start time (UTC).
pub fn group_by_time(sessions: &[EnrichedSession]) -> Vec<TimeBucket> {
    let label = |bucket: u32| format!("{:02}:00", bucket * BUCKET_HOURS);

    if sessions.is_empty() {
        return vec![TimeBucket {
            time: label(0),
            sessions: 0,
        }];
    }

    let mut buckets = [0u64; (24 / BUCKET_HOURS) as usize];
    for s in sessions {
        buckets[(s.start_time.hour() / BUCKET_HOURS) as usize] += 1;
    }

    buckets
        .iter()
        .enumerate()
        .map(|(i, &count)| TimeBucket {
            time: label(i as u32),
            sessions: count,
        })
        .collect()
}
