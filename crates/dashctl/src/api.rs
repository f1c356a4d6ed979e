//! HTTP client for the dashboard API.
//!
//! Every read degrades to an empty or zero value when the server is
//! unreachable or answers with an error, so a screen always has something
//! to draw. Only `session_details` distinguishes "missing" via `Option`.

use anyhow::{anyhow, bail, Context, Result};
use appwrite_dashboard_api::handlers::health::ApiHealthResponse;
use appwrite_dashboard_api::models::{
    ActiveSessionsResponse, DashboardStats, DataResponse, GrowthPoint, NamedCount, RecentUsersResponse,
    SessionDetails, TimeBucket, UserCountResponse,
};
use appwrite_dashboard_api::upstream::User;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe; unlike the data reads, failures propagate.
    pub async fn health(&self) -> Result<ApiHealthResponse> {
        self.get_json("/health").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(&format!("{}{}", self.base_url, path)).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("{} returned {} - {}", url, status, text);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    /// Detail route for one session, with the id encoded as a single path segment.
    fn details_url(&self, session_id: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).with_context(|| format!("Invalid server URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Server URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["sessions", "details", session_id]);
        Ok(url)
    }

    async fn get_or_default<T: DeserializeOwned + Default>(&self, path: &str) -> T {
        match self.get_json(path).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, path, "Request failed, using empty value");
                T::default()
            }
        }
    }

    async fn series<T: DeserializeOwned>(&self, path: &str) -> Vec<T> {
        match self.get_json::<DataResponse<T>>(path).await {
            Ok(resp) => resp.data,
            Err(e) => {
                warn!(error = %e, path, "Request failed, using empty series");
                Vec::new()
            }
        }
    }

    pub async fn user_count(&self) -> u64 {
        match self.get_json::<UserCountResponse>("/users/count").await {
            Ok(resp) => resp.total,
            Err(e) => {
                warn!(error = %e, "Failed to fetch user count");
                0
            }
        }
    }

    pub async fn recent_users(&self, limit: u32) -> Vec<User> {
        self.get_or_default::<RecentUsersResponse>(&format!("/users/recent?limit={}", limit))
            .await
            .users
    }

    pub async fn user_growth(&self, days: u32) -> Vec<GrowthPoint> {
        self.series(&format!("/users/growth?days={}", days)).await
    }

    pub async fn active_sessions(&self) -> ActiveSessionsResponse {
        self.get_or_default("/sessions/active").await
    }

    pub async fn sessions_by_device(&self) -> Vec<NamedCount> {
        self.series("/sessions/by-device").await
    }

    pub async fn sessions_by_location(&self) -> Vec<NamedCount> {
        self.series("/sessions/by-location").await
    }

    pub async fn sessions_by_time(&self) -> Vec<TimeBucket> {
        self.series("/sessions/by-time").await
    }

    pub async fn session_details(&self, session_id: &str) -> Option<SessionDetails> {
        let url = match self.details_url(session_id) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, session_id, "Cannot build session details URL");
                return None;
            }
        };

        match self.fetch(url.as_str()).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(error = %e, session_id, "Failed to fetch session details");
                None
            }
        }
    }

    pub async fn dashboard_stats(&self) -> DashboardStats {
        self.get_or_default("/dashboard/stats").await
    }
}
