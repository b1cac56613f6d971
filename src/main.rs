// ABOUTME: Entry point for the minitwit-sim binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and serves the simulator API until shutdown.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use minitwit_sim_server::{AppState, SimConfig, create_router};
use tokio::net::TcpListener;

/// Simulator API facade for the MiniTwit backend.
#[derive(Debug, Parser)]
#[command(name = "minitwit-sim", version, about)]
struct Cli {
    /// Address of the backend API, e.g. localhost:8080 (overrides SIM_BACKEND).
    #[arg(long)]
    backend: Option<String>,

    /// Port to serve the simulator API on (overrides SIM_PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Expected Authorization header value (overrides SIM_AUTH_TOKEN).
    #[arg(long)]
    auth_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "minitwit_sim=debug,minitwit_sim_server=debug,tower_http=debug",
                )
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SimConfig::from_env().context("invalid configuration")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(token) = cli.auth_token {
        config.auth_token = token;
    }
    config.validate().context("invalid configuration")?;

    let state = Arc::new(AppState::from_config(&config).context("failed to build backend client")?);
    tracing::info!(backend = %config.backend_base_url(), "forwarding to backend");

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "minitwit-sim listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("minitwit-sim stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
