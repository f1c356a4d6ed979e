//! HTTP client for the Appwrite server API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{IdentityBackend, SessionList, UpstreamError, UserList, UserQuery};
use crate::config::UpstreamConfig;

/// Appwrite Users API client authenticated with a server API key.
#[derive(Clone)]
pub struct AppwriteClient {
    endpoint: String,
    project_id: String,
    api_key: String,
    http: reqwest::Client,
}

impl AppwriteClient {
    /// Build the client; fails only if the TLS backend cannot be initialised.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.endpoint, path);

        let res = self
            .http
            .get(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .query(params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IdentityBackend for AppwriteClient {
    /// GET /users
    async fn list_users(&self, query: &UserQuery) -> Result<UserList, UpstreamError> {
        tracing::debug!(?query, "Listing users");
        self.get("/users", &query.to_params()).await
    }

    /// GET /users/{userId}/sessions
    async fn list_user_sessions(&self, user_id: &str) -> Result<SessionList, UpstreamError> {
        tracing::debug!(user_id, "Listing user sessions");
        self.get(&format!("/users/{}/sessions", user_id), &[]).await
    }
}
