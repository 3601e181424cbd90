//! PX Validator API Server
//!
//! Usage:
//!   cargo run --bin px_api
//!
//! Environment:
//!   PORT / PX_PORT      - Server port (default: 8080)
//!   PX_HOST             - Server host (default: 0.0.0.0)
//!   PX_LEDGER_ENDPOINTS - comma-separated ledger JSON-RPC URLs
//!   PX_RPC_TIMEOUT_SECS - per-endpoint timeout (default: 6)
//!   PX_METRICS_DIR      - metrics directory (default: .)
//!   RUST_LOG            - Log level (default: info)

use px_validator::api::{create_router, handlers::AppState};
use px_validator::utils::constants::{APP_NAME, APP_VERSION};
use px_validator::{ValidatorConfig, WalletValidator};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = ValidatorConfig::from_env();
    let addr = config.bind_addr()?;

    let validator = Arc::new(WalletValidator::new(&config)?);
    for (i, endpoint) in validator.ledger().endpoints().iter().enumerate() {
        info!("   #{} {}", i + 1, endpoint);
    }

    let state = Arc::new(AppState::new(validator.clone()));
    let app = create_router(state);

    info!("🚀 {} v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  POST /validate    - Ledger lookup + risk score");
    info!("  POST /export_iso  - ISO 20022 pain.001 export");
    info!("  GET  /metrics     - Usage metrics");
    info!("  GET  /healthz     - Health check");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received");
    match validator.metrics().summary() {
        Ok(summary) => info!(
            "   Total validations: {} (avg {:.1}ms, uptime {}s)",
            summary.total, summary.avg_response_ms, summary.uptime_sec
        ),
        Err(e) => warn!("   ⚠️ Metrics unavailable: {}", e),
    }

    Ok(())
}
