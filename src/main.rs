//! site-edge
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ timeout ─▶ trailing-slash filter
//!                                                          │            │
//!                                             301 ◀────────┘            ▼
//!                                                        ┌─────────────────┐
//!                                                        │ /api/newsletter │──▶ email provider
//!                                                        │ /api/test       │
//!                                                        │ static assets   │
//!                                                        └─────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use site_edge::config::{self, validation::validate_config, ConfigError};
use site_edge::observability::{logging, metrics};
use site_edge::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "site-edge", version)]
#[command(
    about = "Serves a static site with canonical URLs and a newsletter relay",
    long_about = None
)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "SITE_EDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override assets.root.
    #[arg(short, long)]
    root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(root) = cli.root {
        config.assets.root = root;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("site-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        assets_root = %config.assets.root,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
