//! Appwrite Dashboard API Library
//!
//! This crate provides the aggregation server behind the Appwrite project
//! dashboard. It proxies the Appwrite Users API and reshapes the results
//! into dashboard-friendly JSON:
//!
//! - **Users**: total count, recent sign-ups, sign-ups per day
//! - **Sessions**: enriched session list with parsed device/browser/OS,
//!   per-session details, and device/IP/time-of-day histograms
//! - **Summary**: the headline numbers of the dashboard
//!
//! ## Architecture
//!
//! The server is stateless between requests. Every response is recomputed
//! from live upstream data; the only long-lived object is the upstream
//! client, built once at startup and shared through [`state::AppState`].
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`upstream`]: Appwrite client and the [`upstream::IdentityBackend`] seam
//! - [`user_agent`]: Best-effort user-agent parsing
//! - [`services`]: Aggregation logic
//! - [`handlers`]: HTTP route handlers
//! - [`error`]: Custom error types with Axum integration
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use appwrite_dashboard_api::{
//!     config::{AppConfig, UpstreamConfig},
//!     router::build_router,
//!     state::AppState,
//!     upstream::AppwriteClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AppwriteClient::new(&UpstreamConfig::from_env()?)?;
//!     let state = AppState::new(Arc::new(client), AppConfig::from_env()?);
//!     let app = build_router(state);
//!     // ... bind and serve
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod result_ext;
pub mod router;
pub mod services;
pub mod state;
pub mod upstream;
pub mod user_agent;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
