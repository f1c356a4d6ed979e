//! Application state for the Appwrite Dashboard API.
//!
//! This module defines the shared application state that is
//! passed to handlers via Axum's state management.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{DashboardService, SessionService, UserService};
use crate::upstream::IdentityBackend;

/// Shared application state.
///
/// The upstream client is built once at startup and shared by every
/// request; nothing else is kept between requests.
#[derive(Clone)]
pub struct AppState {
    /// Upstream identity service
    pub backend: Arc<dyn IdentityBackend>,

    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `backend` - Upstream identity service client
    /// * `config` - Application configuration
    pub fn new(backend: Arc<dyn IdentityBackend>, config: AppConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(Arc::clone(&self.backend))
    }

    pub fn session_service(&self) -> SessionService {
        SessionService::new(
            Arc::clone(&self.backend),
            self.config.user_page_size,
            self.config.fanout(),
        )
    }

    pub fn dashboard_service(&self) -> DashboardService {
        DashboardService::new(self.user_service(), self.session_service())
    }
}
