//! PX Validator - one-shot wallet validation from the command line
//!
//! Usage:
//!   px_validator <address>
//!
//! Environment:
//!   PX_LEDGER_ENDPOINTS - comma-separated ledger JSON-RPC URLs
//!   PX_METRICS_DIR      - metrics directory (default: .)
//!   RUST_LOG            - Log level (default: info)

use eyre::{eyre, Result};
use px_validator::{sanitize_wallet_input, ValidatorConfig, WalletValidator};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let raw = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: px_validator <address>"))?;
    let wallet = sanitize_wallet_input(&raw).ok_or_else(|| eyre!("Invalid wallet address: {:?}", raw))?;

    let config = ValidatorConfig::from_env();
    let validator = WalletValidator::new(&config)?;

    let (report, pending_metrics) = validator.validate_tracked(&wallet).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    // Let the metrics write land before the runtime shuts down
    pending_metrics.await?;

    Ok(())
}
