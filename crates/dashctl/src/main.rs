mod api;
mod render;
mod tui;
mod view;

use anyhow::{Context, Result};
use api::{ApiClient, DEFAULT_API_URL};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use view::{SessionFilter, SummaryCards};

#[derive(Parser)]
#[command(name = "dashctl")]
#[command(version, about = "Appwrite Dashboard terminal client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Interactive mode (TUI)
    #[arg(short, long)]
    interactive: bool,

    /// Dashboard API base URL, including the /api prefix
    #[arg(long)]
    server_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the dashboard API is up
    Health {
        /// Emit only JSON response
        #[arg(short, long)]
        json: bool,
    },

    /// Summary cards and the most recent sign-ups
    Summary {
        /// Number of recent users to list
        #[arg(short, long, default_value_t = 5)]
        limit: u32,

        /// Emit only JSON response
        #[arg(short, long)]
        json: bool,
    },

    /// List active sessions
    ///
    /// Examples:
    ///     dashctl sessions
    ///     dashctl sessions --device mobile
    ///     dashctl sessions --search ada@example.com
    #[command(verbatim_doc_comment)]
    Sessions {
        /// Only show one device class: mobile, desktop, tablet (or all)
        #[arg(short, long)]
        device: Option<String>,

        /// Match on user email or user id
        #[arg(short, long)]
        search: Option<String>,

        /// Emit only JSON response
        #[arg(short, long)]
        json: bool,
    },

    /// Show one session with its timeline
    Session {
        /// Session ID
        #[arg(value_name = "ID")]
        session_id: String,

        /// Emit only JSON response
        #[arg(short, long)]
        json: bool,
    },

    /// Device, location and time-of-day histograms
    Analytics {
        /// Emit only JSON response
        #[arg(short, long)]
        json: bool,
    },

    /// New users per day
    Growth {
        /// Window size in days
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        /// Emit only JSON response
        #[arg(short, long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_base_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("DASHCTL_API_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::new(&resolve_base_url(cli.server_url));

    if cli.interactive {
        return tui::run_tui(client).await;
    }

    match cli.command {
        Some(Commands::Health { json }) => {
            let health = client.health().await.context("Dashboard API is not reachable")?;
            if json {
                print_json(&health)?;
            } else {
                let color = if health.status == "ok" { "\x1b[32m" } else { "\x1b[33m" };
                println!("Server:  {}", client.base_url());
                println!("Status:  {}{}\x1b[0m", color, health.status);
                println!("Message: {}", health.message);
                if let Some(uptime) = health.uptime_seconds {
                    println!("Uptime:  {}s", uptime);
                }
                if let Some(version) = &health.version {
                    println!("Version: {}", version);
                }
            }
        }
        Some(Commands::Summary { limit, json }) => {
            let (stats, recent) = tokio::join!(client.dashboard_stats(), client.recent_users(limit));
            if json {
                print_json(&serde_json::json!({ "stats": stats, "recentUsers": recent }))?;
            } else {
                render::summary(&SummaryCards::from_stats(&stats), &recent);
            }
        }
        Some(Commands::Sessions { device, search, json }) => {
            let active = client.active_sessions().await;
            let filter = SessionFilter {
                device: device.as_deref().and_then(SessionFilter::parse_device),
                search,
            };
            let shown = filter.apply(&active.sessions);
            if json {
                print_json(&shown)?;
            } else {
                render::sessions(&shown, active.total);
            }
        }
        Some(Commands::Session { session_id, json }) => match client.session_details(&session_id).await {
            Some(details) if json => print_json(&details)?,
            Some(details) => render::session_details(&details),
            None => anyhow::bail!("Session not found: {}", session_id),
        },
        Some(Commands::Analytics { json }) => {
            let (devices, locations, times) = tokio::join!(
                client.sessions_by_device(),
                client.sessions_by_location(),
                client.sessions_by_time(),
            );
            if json {
                print_json(&serde_json::json!({
                    "byDevice": devices,
                    "byLocation": locations,
                    "byTime": times,
                }))?;
            } else {
                render::analytics(&devices, &locations, &times);
            }
        }
        Some(Commands::Growth { days, json }) => {
            let (points, total) = tokio::join!(client.user_growth(days), client.user_count());
            if json {
                print_json(&serde_json::json!({ "data": points, "total": total }))?;
            } else {
                render::growth(&points, total);
            }
        }
        None => {
            println!("No command given. Run `dashctl --help` or `dashctl -i` for the interactive dashboard.");
        }
    }

    Ok(())
}
