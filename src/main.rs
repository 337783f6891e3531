//! request-filter host
//!
//! Runs the content filter in front of one upstream service.
//!
//! ```text
//!     Client Request       ┌──────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ request id ─▶ trace ─▶ timeout ─▶ filter ──┼──▶ upstream
//!                          │                                     │        │    (or echo)
//!     403 / 500  ◀─────────┼─────────────────────────────────────┘        │
//!                          │                                              │
//!                          │  config watcher ──▶ live filter swap         │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use request_filter::config::loader::{build_filter, load_config};
use request_filter::config::watcher::ConfigWatcher;
use request_filter::config::HostConfig;
use request_filter::filter::SharedFilter;
use request_filter::observability::{logging, metrics};
use request_filter::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "request-filter")]
#[command(about = "Regex request filter in front of an HTTP upstream", long_about = None)]
struct Cli {
    /// Configuration file (.toml or .json). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    let filter = build_filter(&config)?;

    if cli.check {
        println!(
            "configuration OK: {} pattern(s), mode {}",
            filter.pattern_count(),
            filter.mode().as_str()
        );
        return Ok(());
    }

    tracing::info!("request-filter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = ?config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shared = SharedFilter::new(filter);

    // Held for the lifetime of the server; dropping it stops the watch.
    let _watcher = match &cli.config {
        Some(path) => Some(ConfigWatcher::new(path, shared.clone()).run()?),
        None => None,
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, shared)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
