//! PX Wallet Validator Library
//!
//! Read-only XRPL wallet validation:
//! - Account lookup over redundant public JSON-RPC endpoints with sticky failover
//! - Heuristic, advisory risk scoring from the account's flags and reserves
//! - Durable usage metrics that survive restarts (no addresses stored)

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;
pub mod validator;

pub use crate::core::risk_score::{score_snapshot, RiskScorer};
pub use models::config::{ScoringThresholds, ValidatorConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AccountSnapshot, MetricsSummary, RecentEvent, RiskAssessment, RiskLevel, ValidationReport,
};
pub use providers::ledger::{EndpointRotation, LedgerClient, LookupOutcome};
pub use utils::metrics::{MetricsState, MetricsStore};
pub use utils::sanitize::sanitize_wallet_input;
pub use validator::WalletValidator;
