//! Upstream identity service access.
//!
//! Everything the dashboard knows about users and sessions comes from the
//! Appwrite Users API. Handlers never talk to Appwrite directly; they go
//! through the [`IdentityBackend`] trait so that the client is constructed
//! once at startup and can be swapped for an in-memory backend in tests.

mod appwrite;
mod models;
mod query;

pub use appwrite::AppwriteClient;
pub use models::{Session, SessionList, User, UserList};
pub use query::{Order, UserQuery};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to the upstream identity service.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status (auth failures land here)
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body could not be decoded
    #[error("invalid upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only view of the identity service used by the dashboard.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// List users matching the query.
    async fn list_users(&self, query: &UserQuery) -> Result<UserList, UpstreamError>;

    /// List all sessions belonging to a user.
    async fn list_user_sessions(&self, user_id: &str) -> Result<SessionList, UpstreamError>;
}
