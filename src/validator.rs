//! Wallet Validator - lookup → score → metrics
//!
//! Owns the process-wide pieces (ledger rotation state, metrics store) as
//! explicit instances; share one validator behind `Arc`.

use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::risk_score::RiskScorer;
use crate::models::config::ValidatorConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{AccountSnapshot, MetricsSummary, RwaStatus, ValidationReport};
use crate::providers::ledger::LedgerClient;
use crate::utils::metrics::MetricsStore;

pub struct WalletValidator {
    ledger: LedgerClient,
    scorer: RiskScorer,
    metrics: Arc<MetricsStore>,
}

impl WalletValidator {
    pub fn new(config: &ValidatorConfig) -> AppResult<Self> {
        let ledger = LedgerClient::new(config)?;
        let metrics = MetricsStore::open(&config.metrics_dir)?;
        info!("📊 Metrics store at {}", metrics.path().display());

        Ok(Self::from_parts(
            ledger,
            RiskScorer::with_thresholds(config.thresholds.clone()),
            metrics,
        ))
    }

    pub fn from_parts(ledger: LedgerClient, scorer: RiskScorer, metrics: MetricsStore) -> Self {
        Self {
            ledger,
            scorer,
            metrics: Arc::new(metrics),
        }
    }

    /// Validate an already-sanitized address.
    ///
    /// Always produces a full report: an unreachable ledger yields a zeroed
    /// snapshot that is scored like any other. The metrics write runs on the
    /// blocking pool and is not awaited.
    pub async fn validate(&self, wallet: &str) -> ValidationReport {
        let (report, _pending) = self.validate_tracked(wallet).await;
        report
    }

    /// Like [`validate`](Self::validate), also returning the handle of the
    /// background metrics write so short-lived callers can wait for it.
    pub async fn validate_tracked(&self, wallet: &str) -> (ValidationReport, JoinHandle<()>) {
        let start = Instant::now();

        let snapshot = self.ledger.lookup_account(wallet).await;
        let risk = self.scorer.score(&snapshot);
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        let pending = self.record_in_background(risk.score, duration_ms);

        let report = ValidationReport {
            wallet: wallet.to_string(),
            xrpl: snapshot,
            risk_score: risk,
            rwa_status: RwaStatus::in_development(),
        };
        info!("{} ({:.1}ms)", report.summary(), duration_ms);
        (report, pending)
    }

    fn record_in_background(&self, score: u8, duration_ms: f64) -> JoinHandle<()> {
        let metrics = Arc::clone(&self.metrics);
        tokio::task::spawn_blocking(move || {
            // Metrics loss never fails the validation
            if let Err(e) = metrics.record_event(score, duration_ms) {
                warn!(code = e.code_str(), "⚠️ Metrics event dropped: {}", e);
            }
        })
    }

    /// Metrics summary read off the async worker
    pub async fn metrics_summary(&self) -> AppResult<MetricsSummary> {
        let metrics = Arc::clone(&self.metrics);
        tokio::task::spawn_blocking(move || metrics.summary())
            .await
            .map_err(|e| AppError::internal(format!("metrics reader failed: {}", e)))?
    }

    /// Plain ledger lookup, without scoring or metrics
    pub async fn lookup(&self, wallet: &str) -> AccountSnapshot {
        self.ledger.lookup_account(wallet).await
    }

    pub fn ledger(&self) -> &LedgerClient {
        &self.ledger
    }

    pub fn metrics(&self) -> &MetricsStore {
        &self.metrics
    }
}
