//! Deployment Tracker: application entry point.
//!
//! Initializes tracing, loads configuration from an optional TOML file and the
//! environment, builds the ledger and status reporter, sets up the Axum router,
//! and starts the HTTP server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deployment_tracker::config::{AppConfig, CLI_AFTER_HELP, DEFAULT_LOG_FILTER};
use deployment_tracker::{create_router, http, AppState};

/// Deployment Tracker: records deployment events and reports service health
#[derive(Parser, Debug)]
#[command(name = "deployment-tracker", version, about, after_help = CLI_AFTER_HELP)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "deployment_tracker=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration is loaded before tracing so the log format can be honoured
    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let state = AppState::new(config);
    tracing::info!(
        version = %state.config.app.version,
        environment = %state.config.app.environment,
        hostname = %state.reporter.hostname(),
        "Loaded configuration"
    );

    let app = create_router(state.clone());
    http::start_server(app, &state.config.http).await?;

    tracing::info!(
        deployments = state.ledger.len(),
        "Server stopped, discarding in-memory ledger"
    );
    Ok(())
}
