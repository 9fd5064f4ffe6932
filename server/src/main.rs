//! LicenseVerify licensing-verification server.
//!
//! Serves the JSON API over HTTP:
//! - `POST /api/verify-license`: validate a license key
//! - `POST /api/verify-company`: check whether a company is licensed
//! - `GET  /api/companies`: directory of active licenses
//! - `POST /api/support-request`: submit a support ticket
//! - `GET  /api/stats`: row counts across the three tables
//!
//! Usage:
//!   licenseverify-server --port 3000 --database licenses.db

use anyhow::{Context, Result};
use clap::Parser;
use licenseverify_server::{build_router, AppState};
use licenseverify_store::Pool;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "licenseverify-server")]
#[command(about = "LicenseVerify licensing-verification service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Path to the SQLite database file
    #[arg(short, long, default_value = "licenses.db")]
    database: PathBuf,

    /// Number of pooled database connections
    #[arg(long, default_value = "4")]
    pool_size: usize,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("LicenseVerify server starting...");
    let pool = Pool::open(&args.database, args.pool_size)
        .with_context(|| format!("failed to open database at {}", args.database.display()))?;
    info!(
        "Database ready at {} ({} pooled connections)",
        args.database.display(),
        pool.capacity()
    );

    let state = Arc::new(AppState::new(pool));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("failed to bind port {}", args.port))?;
    info!("Listening on port {}", args.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => warn!("Failed to listen for shutdown signal: {}", err),
    }
}
