//! HTTP server binary for paperbase.
//!
//! A thin shim over the library crate: loads configuration from the
//! environment, connects the stores, and serves the API router.

use anyhow::{Context, Result};
use clap::Parser;
use paperbase::{build_router, AppConfig, AppState};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Document digitization API server.
#[derive(Parser, Debug)]
#[command(
    name = "paperbase-server",
    version,
    about = "Document digitization API: upload, OCR, keyword extraction, multi-store persistence",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Enable debug-level logging.
    #[arg(short, long, env = "PAPERBASE_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(
        upload_dir = %config.upload_dir.display(),
        dpi = config.dpi,
        "starting paperbase"
    );

    let state = Arc::new(AppState::connect(config).await);

    info!(
        mongodb = state.stores.mongo.is_some(),
        postgresql = state.stores.postgres.is_some(),
        elasticsearch = state.stores.search.is_some(),
        tesseract = state.ocr.available(),
        "backend availability"
    );
    if state.stores.mongo.is_none()
        && state.stores.postgres.is_none()
        && state.stores.search.is_none()
    {
        warn!("no stores connected, uploads will be processed but not persisted");
    }

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cli.host, cli.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .await
        .context("server error")?;

    Ok(())
}
