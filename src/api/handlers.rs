//! API Request Handlers

use axum::{
    extract::{Json, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use super::iso_export::{export_filename, generate_iso20022_xml};
use super::types::*;
use crate::models::errors::AppError;
use crate::models::types::{MetricsSummary, ValidationReport};
use crate::utils::sanitize::sanitize_wallet_input;
use crate::validator::WalletValidator;

/// Shared application state
pub struct AppState {
    pub validator: Arc<WalletValidator>,
}

impl AppState {
    pub fn new(validator: Arc<WalletValidator>) -> Self {
        Self { validator }
    }
}

fn require_wallet(raw: &str, message: &str, start: Instant) -> Result<String, ErrorResponse> {
    sanitize_wallet_input(raw).ok_or_else(|| {
        ErrorResponse::from_app_error(
            &AppError::bad_request(message),
            start.elapsed().as_secs_f64() * 1000.0,
        )
    })
}

// ============================================
// Health Check
// ============================================

pub async fn health_check() -> Json<HealthData> {
    Json(HealthData { ok: true })
}

// ============================================
// Wallet Validation
// ============================================

pub async fn validate_wallet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WalletRequest>,
) -> Result<Json<ValidationReport>, ErrorResponse> {
    let start = Instant::now();
    let wallet = require_wallet(&req.wallet, "Invalid wallet address.", start)?;

    Ok(Json(state.validator.validate(&wallet).await))
}

// ============================================
// Metrics
// ============================================

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSummary> {
    match state.validator.metrics_summary().await {
        Ok(summary) => Json(summary),
        Err(e) => {
            // keep the endpoint healthy even if the store is unreadable
            warn!(code = e.code_str(), "⚠️ Metrics summary unavailable: {}", e);
            Json(MetricsSummary::unavailable(e.to_string()))
        }
    }
}

// ============================================
// ISO 20022 Export
// ============================================

pub async fn export_iso(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WalletRequest>,
) -> Result<Response, ErrorResponse> {
    let start = Instant::now();
    let wallet = require_wallet(&req.wallet, "Invalid XRPL address.", start)?;

    // An unreachable ledger exports a zero balance
    let snapshot = state.validator.lookup(&wallet).await;
    let xml = generate_iso20022_xml(&wallet, snapshot.balance_xrp());
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&wallet));

    Ok((
        [
            (header::CONTENT_TYPE, "application/xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        xml,
    )
        .into_response())
}
