use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use accountgate_backend_lib::{config::Settings, router::create_router, AppState};
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Account authentication server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML config file; `accountgate.toml` in the working directory by default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("loading settings")?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    settings.validate().context("invalid settings")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = settings.bind_addr;
    tracing::info!(store = ?settings.store, data_dir = %settings.data_dir.display(), "starting");
    let state = Arc::new(AppState::from_settings(settings)?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
