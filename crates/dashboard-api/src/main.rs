//! Appwrite Dashboard API Server
//!
//! Serves the dashboard's JSON API on top of an Appwrite project.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appwrite_dashboard_api::{
    config::{AppConfig, UpstreamConfig},
    router::build_router,
    state::AppState,
    upstream::AppwriteClient,
};

/// Initialize tracing/logging.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,appwrite_dashboard_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let app_config = AppConfig::from_env();
    let log_json = app_config.as_ref().map(|c| c.log_json).unwrap_or(false);
    init_tracing(log_json);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Appwrite Dashboard API"
    );

    let app_config = app_config.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    let upstream_config = UpstreamConfig::from_env()
        .context("APPWRITE_PROJECT_ID and APPWRITE_API_KEY must be set")?;

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        endpoint = %upstream_config.endpoint,
        project = %upstream_config.project_id,
        user_page_size = app_config.user_page_size,
        session_fanout = app_config.fanout(),
        "Configuration loaded"
    );

    let client = AppwriteClient::new(&upstream_config).context("failed to build Appwrite client")?;
    let state = AppState::new(Arc::new(client), app_config.clone());
    let app = build_router(state);

    let addr: SocketAddr = app_config
        .bind_address()
        .parse()
        .context("invalid bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
