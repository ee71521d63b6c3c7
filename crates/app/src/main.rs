//! Berth - personal NAS web console backend.
//!
//! Serves a confined view of one directory tree over HTTP: browsing,
//! text/image preview, range-aware streaming, downloads and short-lived
//! signed delivery URLs, plus a small tools catalog and a LAN speed test.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use service::{Config, ServiceState};

/// Berth - personal NAS web console backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory all browsing is confined to (defaults to the home directory)
    #[arg(short, long, env = "BERTH_ROOT")]
    root: Option<PathBuf>,

    /// Address to listen on for HTTP requests
    #[arg(short, long, env = "BERTH_LISTEN", default_value = "0.0.0.0:3000")]
    listen: String,

    /// HS256 secret for session verification and signed URLs
    #[arg(long, env = "BERTH_SECRET")]
    secret: Option<String>,

    /// Default lifetime of signed URLs, in seconds
    #[arg(long, env = "BERTH_DEFAULT_TTL", default_value = "120")]
    default_ttl: u64,

    /// Largest file size served through the text preview endpoint, in bytes
    #[arg(long, env = "BERTH_MAX_PREVIEW_BYTES")]
    max_preview_bytes: Option<u64>,

    /// TOML file overriding the built-in tool catalog
    #[arg(long, env = "BERTH_TOOLS_FILE")]
    tools_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "BERTH_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    tracing::info!("Starting Berth");

    // Create configuration
    let mut config = Config {
        root: args.root,
        secret: args.secret,
        tools_file: args.tools_file,
        default_ttl_secs: args.default_ttl,
        listen_addr: SocketAddr::from_str(&args.listen)?,
        log_level,
        ..Config::default()
    };
    if let Some(max_preview_bytes) = args.max_preview_bytes {
        config.max_preview_bytes = max_preview_bytes;
    }

    // Create state
    let state = match ServiceState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create service state: {}", e);
            std::process::exit(1);
        }
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    };
    tokio::spawn(graceful_shutdown);

    let router = service::http::router(state);

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    let mut server_rx = shutdown_rx.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = server_rx.changed().await;
        })
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
