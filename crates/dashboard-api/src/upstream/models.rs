//! Wire models of the Appwrite Users API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record, passed through to dashboard clients unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserList {
    pub total: u64,

    #[serde(default)]
    pub users: Vec<User>,
}

/// A session record as returned by `GET /users/{id}/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,

    pub user_id: String,

    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,

    pub expire: DateTime<Utc>,

    #[serde(default)]
    pub provider: String,

    #[serde(default)]
    pub ip: String,

    #[serde(default)]
    pub current: bool,

    /// Raw user-agent, when the project records it.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Appwrite's own pre-parsed client fields.
    #[serde(default)]
    pub client_name: Option<String>,

    #[serde(default)]
    pub client_version: Option<String>,

    #[serde(default)]
    pub os_name: Option<String>,

    #[serde(default)]
    pub os_version: Option<String>,

    #[serde(default)]
    pub device_name: Option<String>,
}

/// Response of `GET /users/{id}/sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionList {
    pub total: u64,

    #[serde(default)]
    pub sessions: Vec<Session>,
}
