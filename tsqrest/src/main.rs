//! tsqrest - REST facade over Temporary Storage Queues
//!
//! Serves `/tsq/{tsqName}`: GET browses a queue, POST creates it with a
//! first record, PUT appends to it, DELETE removes it.

mod config;
mod router;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tsqrest_tsq::{MemoryQueueClient, QueueClient};

use crate::config::{BackendConfig, Config};

#[derive(Parser, Debug)]
#[command(name = "tsqrest")]
#[command(about = "REST facade over Temporary Storage Queues", long_about = None)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "TSQREST_PORT")]
    port: Option<u16>,

    /// Host to bind to (overrides the config file)
    #[arg(long, env = "TSQREST_HOST")]
    host: Option<String>,

    /// Configuration file (defaults to ./tsqrest.toml when present)
    #[arg(short, long, env = "TSQREST_CONFIG")]
    config: Option<PathBuf>,

    /// Report business-rule outcomes as 404/409 instead of 200
    #[arg(long, env = "TSQREST_STRICT_STATUS")]
    strict_status: bool,

    /// Enable permissive CORS
    #[arg(long, env = "TSQREST_CORS")]
    cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "TSQREST_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tsqrest={},tower_http=debug", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    config.api.strict_status |= args.strict_status;
    config.api.cors |= args.cors;

    let client: Arc<dyn QueueClient> = match config.backend {
        BackendConfig::Memory(memory) => {
            info!(
                max_name_length = memory.max_name_length,
                max_record_length = memory.max_record_length,
                max_items = memory.max_items,
                "Using in-memory queue backend"
            );
            Arc::new(MemoryQueueClient::with_config(memory))
        }
    };

    info!("Starting tsqrest...");
    info!(
        "  Business-rule status codes: {}",
        if config.api.strict_status { "strict" } else { "compatible" }
    );
    info!(
        "  CORS: {}",
        if config.api.cors { "enabled" } else { "disabled" }
    );

    let state = router::AppState::new(client, config.api.strict_status, config.api.cors);
    let app = router::create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
