//! `fare-compare` server binary.

use anyhow::Context;
use clap::Parser;
use fare_compare::bootstrap;
use fare_compare::config::Settings;
use fare_compare::telemetry;
use std::path::PathBuf;
use tracing::info;

/// Ride fare comparison server.
#[derive(Debug, Parser)]
#[command(name = "fare-compare", version, about)]
struct Cli {
    /// Settings file layered over the built-in defaults.
    #[arg(short, long, env = "FARE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding `server.bind`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
        settings.validate().context("invalid --bind")?;
    }

    telemetry::init(&settings.logging).context("failed to install tracing subscriber")?;

    let addr = settings.bind_addr()?;
    let router = bootstrap::build_router(&settings).context("failed to build service")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        %addr,
        providers = settings.providers.len(),
        version = env!("CARGO_PKG_VERSION"),
        "fare comparison server listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
