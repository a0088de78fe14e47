//! Atomos blog server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http::server (middleware, dispatch)
//!                        │
//!                        ▼
//!                    routing (PathPattern table → Endpoint)
//!                        │
//!                        ▼
//!                    http::handlers ──▶ security::wsse (writes only)
//!                        │
//!                        ├──▶ atom::codec (Atom entry/feed/service XML)
//!                        ├──▶ http::views (HTML)
//!                        ▼
//!                    blog::EntryRepository
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use atomos::blog::{EntryRepository, MemoryRepository};
use atomos::config::{load_config, BlogConfig};
use atomos::lifecycle::signals::wait_for_termination;
use atomos::net::tls;
use atomos::observability::{logging, metrics};
use atomos::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "atomos")]
#[command(about = "Minimal blog server with AtomPub", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => BlogConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level)?;
    tracing::info!("atomos v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        url = %config.blog.url,
        per_page = config.blog.per_page,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let repository: Arc<dyn EntryRepository> = match &config.storage.persistence_path {
        Some(path) => Arc::new(MemoryRepository::load_from_file(Path::new(path))?),
        None => Arc::new(MemoryRepository::default()),
    };

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_termination().await;
        trigger.trigger();
    });

    let tls_config = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, repository)?;

    match tls_config {
        Some(tls_section) => {
            let rustls = tls::from_config(&tls_section).await?;
            let addr: SocketAddr = bind_address.parse()?;
            server.run_tls(addr, rustls, shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
