//! Vera - Predictive Executive Reporting API
//!
//! REST service that turns project status snapshots into risk-scored
//! executive reports aligned to the strategic pillars.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (0.0.0.0:8080, ./vera.toml if present)
//! cargo run --release
//!
//! # Override the bind address
//! cargo run --release -- --addr 127.0.0.1:9000
//! ```
//!
//! # Environment Variables
//!
//! - `VERA_CONFIG`: path to the TOML config file
//! - `VERA_CORS_ORIGINS`: comma-separated allowed origins (development)
//! - `VERA_EVIDENCE_ENABLED`: set to "true" to enable evidence lookups
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use vera::api::{create_app, ApiState};
use vera::config::{self, AppConfig};
use vera::evidence::EvidenceClient;
use vera::storage::HistoryStorage;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "vera")]
#[command(about = "Vera Predictive Executive Reporting API")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default from config: "0.0.0.0:8080")
    #[arg(short, long, env = "VERA_ADDR")]
    addr: Option<String>,

    /// Path to the TOML config file (overrides VERA_CONFIG)
    #[arg(long)]
    config: Option<String>,

    /// Clear the analysis history database on startup.
    /// WARNING: This is destructive and cannot be undone!
    #[arg(long)]
    reset_history: bool,
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(args: &CliArgs) -> AppConfig {
    if let Some(path) = &args.config {
        match AppConfig::load_from_file(std::path::Path::new(path)) {
            Ok(config) => {
                info!(path = %path, "Loaded config from --config");
                return config;
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to load --config file, using search order");
            }
        }
    }
    AppConfig::load()
}

fn open_history(config: &AppConfig, reset: bool) -> Option<HistoryStorage> {
    match HistoryStorage::open(&config.history.path) {
        Ok(history) => {
            if reset {
                warn!("--reset-history: clearing analysis history");
                if let Err(e) = history.clear() {
                    warn!(error = %e, "Failed to clear history");
                }
            }
            match history.prune_older_than(config.history.keep_days) {
                Ok(0) => {}
                Ok(n) => info!(
                    "Pruned {n} analyses older than {} days",
                    config.history.keep_days
                ),
                Err(e) => warn!(error = %e, "Failed to prune old analyses"),
            }
            info!(path = %config.history.path, count = history.count(), "Analysis history ready");
            Some(history)
        }
        Err(e) => {
            warn!(error = %e, "Failed to open history database. Analyses will not be persisted.");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    info!("Vera Predictive Executive Reporting API v{}", env!("CARGO_PKG_VERSION"));

    let mut app_config = load_config(&args);
    app_config.apply_env_overrides();
    let addr = args
        .addr
        .clone()
        .unwrap_or_else(|| app_config.server.addr.clone());

    let history = open_history(&app_config, args.reset_history);
    let evidence = EvidenceClient::new(
        &app_config.evidence,
        app_config.features.external_evidence,
    );
    if evidence.is_enabled() {
        info!(
            sources = app_config.evidence.sources.len(),
            "External evidence lookups enabled"
        );
    }

    config::init(app_config);

    let state = ApiState { history, evidence };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}
