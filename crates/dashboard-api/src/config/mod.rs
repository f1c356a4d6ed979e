//! Configuration module for the Appwrite Dashboard API.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod app;
mod upstream;

pub use app::AppConfig;
pub use upstream::UpstreamConfig;
