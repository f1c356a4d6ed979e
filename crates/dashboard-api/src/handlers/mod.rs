//! HTTP handlers for the Appwrite Dashboard API.
//!
//! This module contains all route handlers organized by domain.

pub mod dashboard;
pub mod health;
pub mod sessions;
pub mod users;

pub use health::api_health;
