//! Query builder for the Appwrite list endpoints.
//!
//! Appwrite accepts repeated `queries[]` parameters, each a JSON object of
//! the form `{"method": ..., "attribute": ..., "values": [...]}`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// The subset of user queries the dashboard issues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub limit: Option<u32>,
    pub order_by_created: Option<Order>,
    pub created_after: Option<DateTime<Utc>>,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order_by_created = Some(Order::Desc);
        self
    }

    pub fn oldest_first(mut self) -> Self {
        self.order_by_created = Some(Order::Asc);
        self
    }

    pub fn created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    /// Encode as `(key, value)` pairs for `reqwest::RequestBuilder::query`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(after) = self.created_after {
            params.push(json!({
                "method": "greaterThan",
                "attribute": "$createdAt",
                "values": [after.to_rfc3339_opts(SecondsFormat::Millis, true)],
            }));
        }

        match self.order_by_created {
            Some(Order::Asc) => params.push(json!({"method": "orderAsc", "attribute": "$createdAt"})),
            Some(Order::Desc) => params.push(json!({"method": "orderDesc", "attribute": "$createdAt"})),
            None => {}
        }

        if let Some(limit) = self.limit {
            params.push(json!({"method": "limit", "values": [limit]}));
        }

        params
            .into_iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect()
    }
}
