//! castboard-web - podcast companion site backend
//!
//! Loads the record store, optionally refreshes broadcasts from the vendor
//! feed, and serves the JSON views.

use std::path::PathBuf;

use anyhow::{Context, Result};
use castboard_common::config::{load_config, ConfigOverrides};
use castboard_common::RecordStore;
use castboard_web::transport::{DataSource, Transport};
use castboard_web::{build_router, AppState};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "castboard-web")]
#[command(about = "Podcast companion site backend")]
#[command(version)]
struct Args {
    /// Path to the TOML config file (else $CASTBOARD_CONFIG, else the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CASTBOARD_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CASTBOARD_PORT")]
    port: Option<u16>,

    /// Vendor broadcast feed URL
    #[arg(long, env = "CASTBOARD_BROADCAST_SYNC_URL")]
    broadcast_sync_url: Option<String>,

    /// Remote search service URL
    #[arg(long, env = "CASTBOARD_SEARCH_URL")]
    search_url: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "CASTBOARD_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            broadcast_sync_url: self.broadcast_sync_url.clone(),
            search_url: self.search_url.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())
        .context("Failed to load configuration")?
        .apply(args.overrides());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Build identification first, before any network delay
    info!(
        "Starting castboard-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let transport = Transport::new(config.sources.clone()).context("Failed to build HTTP client")?;
    let mut store = RecordStore::sample().context("Failed to load sample records")?;

    if config.sources.broadcast_sync_url.is_some() {
        let fetched = transport.sync_broadcasts(store.broadcasts()).await;
        if fetched.source == DataSource::Remote {
            store = store.with_broadcasts(fetched.data);
        }
    }
    info!("Serving {} records", store.len());

    let state = AppState::new(store, transport, config.plot);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("castboard-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
