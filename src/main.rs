use anyhow::Context;
use clap::Parser;
use paydia_snap::app::config::Config;
use paydia_snap::handlers::{self, AppState};
use paydia_snap::SnapClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "paydia-snap", about = "SNAP QR MPM payment adapter")]
struct Args {
    /// TOML config file; the environment (and `.env`) is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::from_env().context("loading config from environment")?,
    };
    if let Some(port) = args.port {
        config.server_port = port;
    }

    let default_level = if config.debug_mode { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!(
        "Starting SNAP adapter on port {} against {}",
        config.server_port, config.snap.host
    );

    let client = SnapClient::from_config(config.snap.clone()).context("building HTTP client")?;
    let app = handlers::router(AppState::new(Arc::new(client)));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
