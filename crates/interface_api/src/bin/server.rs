//! Ledger API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory store, reports written under ./data/blobs
//! cargo run --bin ledger-api
//!
//! # PostgreSQL store
//! LEDGER_STORAGE=postgres LEDGER_DATABASE_URL=postgres://... cargo run --bin ledger-api
//! ```
//!
//! # Environment Variables
//!
//! * `LEDGER_HOST` / `LEDGER_PORT` - Listen address (default: 0.0.0.0:8080)
//! * `LEDGER_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `LEDGER_LOG_JSON` - Emit JSON log lines (default: false)
//! * `LEDGER_STORAGE` - memory | postgres (default: memory)
//! * `LEDGER_DATABASE_URL` - PostgreSQL connection string
//! * `LEDGER_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `LEDGER_REPORT_BUCKET` - Report bucket (default: finance-tracker-reports)
//! * `LEDGER_BLOB_ROOT` - Blob store directory (default: ./data/blobs)
//! * `LEDGER_DISPATCH_TIMEOUT_SECS` - Per-upload timeout (default: 30)
//! * `LEDGER_DISPATCH_MAX_IN_FLIGHT` - Concurrent uploads (default: 16)
//! * `LEDGER_CURRENCY` - Report currency code (default: USD)
//! * `LEDGER_SHUTDOWN_GRACE_SECS` - Wait for uploads at shutdown (default: 10)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use interface_api::{bootstrap, config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::load().context("failed to load configuration")?;

    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = %config.storage,
        "Starting ledger API server"
    );

    let service = Arc::new(
        bootstrap::build_service(&config)
            .await
            .context("failed to build ledger service")?,
    );

    let app = create_router(AppState::new(Arc::clone(&service)));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Requests are done; give detached report uploads a bounded chance to finish
    let drained = service.dispatcher().shutdown(config.shutdown_grace()).await;
    let stats = service.dispatcher().stats();
    tracing::info!(
        drained,
        succeeded = stats.succeeded,
        failed = stats.failed,
        timed_out = stats.timed_out,
        queued = stats.queued,
        "Server shutdown complete"
    );
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
