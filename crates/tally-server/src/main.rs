//! Tally Query Service
//!
//! Read-only HTTP API: a fast summary from the key-value mirror and detailed
//! reports from the relational store.

mod error;
mod handlers;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use axum::{routing::any, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tally_core::config::{DatabaseArgs, MirrorArgs};
use tally_core::logging::{install_panic_hook, LogArgs};
use tally_core::{Mirror, RecordStore};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tally-server")]
#[command(author, version, about = "Tally query service - summaries and detailed reports over HTTP", long_about = None)]
struct Cli {
    /// Address the HTTP listener binds to
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    bind_address: SocketAddr,

    #[command(flatten)]
    database: DatabaseArgs,

    #[command(flatten)]
    mirror: MirrorArgs,

    #[command(flatten)]
    log: LogArgs,
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub mirror: Mirror,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    install_panic_hook();
    if let Err(e) = cli.log.init() {
        eprintln!("[FATAL] {}", e);
        std::process::exit(1);
    }

    info!("Starting Tally query service v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(cli).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(cli: Cli) -> Result<()> {
    info!("Connecting to relational store at {}...", cli.database.describe());
    let records = cli
        .database
        .connect()
        .await
        .context("Failed to connect to the relational store")?;

    info!("Connecting to key-value store...");
    let mirror = cli
        .mirror
        .connect()
        .await
        .context("Failed to connect to the key-value store")?;
    info!(
        "Mirror tables: sales={}, salaries={}",
        mirror.sales_table(),
        mirror.salaries_table()
    );

    let app = app(AppState { records, mirror });

    info!("Server listening on {}", cli.bind_address);
    let listener = tokio::net::TcpListener::bind(cli.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Builds the router with its middleware stack
fn app(state: AppState) -> Router {
    // Paths route regardless of method; every answer stays JSON
    Router::new()
        .route("/summary", any(handlers::summary::summary))
        .route("/report/:kind", any(handlers::report::report))
        .fallback(handlers::not_found)
        // Layers
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received, shutting down"),
        Err(e) => {
            error!("Failed to listen for interrupt: {}", e);
            std::future::pending::<()>().await
        }
    }
}
