//! Type definitions for the wallet validator
//! Core data structures shared by the ledger client, scorer and metrics store

use serde::{Deserialize, Serialize};

use crate::utils::constants::{DROPS_PER_XRP, XRP_DECIMALS};

/// Result of one ledger lookup attempt.
///
/// Constructed through [`AccountSnapshot::funded`], [`AccountSnapshot::unfunded`]
/// or [`AccountSnapshot::all_failed`] so an unfunded snapshot always carries
/// zeroed numeric fields. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    /// Lookup reached a consistent answer (true for "not found" as well)
    pub(crate) ok: bool,
    /// Endpoint that produced the answer, empty if all failed
    pub(crate) api_used: String,
    pub(crate) funded: bool,
    pub(crate) balance_xrp: f64,
    pub(crate) balance_drops: u64,
    pub(crate) owner_count: u64,
    pub(crate) flags: u32,
}

impl AccountSnapshot {
    /// Existing account with ledger data
    pub fn funded(endpoint: impl Into<String>, balance_drops: u64, owner_count: u64, flags: u32) -> Self {
        Self {
            ok: true,
            api_used: endpoint.into(),
            funded: true,
            balance_xrp: drops_to_xrp(balance_drops),
            balance_drops,
            owner_count,
            flags,
        }
    }

    /// Ledger answered: no such funded account
    pub fn unfunded(endpoint: impl Into<String>) -> Self {
        Self {
            ok: true,
            api_used: endpoint.into(),
            ..Self::all_failed()
        }
    }

    /// Every endpoint failed
    pub fn all_failed() -> Self {
        Self {
            ok: false,
            api_used: String::new(),
            funded: false,
            balance_xrp: 0.0,
            balance_drops: 0,
            owner_count: 0,
            flags: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn is_funded(&self) -> bool {
        self.funded
    }

    pub fn api_used(&self) -> &str {
        &self.api_used
    }

    pub fn balance_xrp(&self) -> f64 {
        self.balance_xrp
    }

    pub fn balance_drops(&self) -> u64 {
        self.balance_drops
    }

    pub fn owner_count(&self) -> u64 {
        self.owner_count
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }
}

/// Convert drops to XRP, rounded to 6 decimals
pub fn drops_to_xrp(drops: u64) -> f64 {
    let scale = 10f64.powi(XRP_DECIMALS);
    ((drops as f64 / DROPS_PER_XRP) * scale).round() / scale
}

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// ≤20 Low, ≤60 Medium, else High
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => RiskLevel::Low,
            21..=60 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "✅",
            RiskLevel::Medium => "🟠",
            RiskLevel::High => "🔴",
        }
    }
}

/// Advisory risk classification derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Clamped score (0-100)
    pub score: u8,
    pub level: RiskLevel,
    /// Triggered rules, in evaluation order
    pub reasons: Vec<String>,
    /// Ruleset tag
    pub model: String,
}

/// One entry of the recent-history window. Never carries the address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEvent {
    /// Unix seconds
    pub ts: f64,
    pub score: u8,
    /// Duration of the validation (ms)
    #[serde(default)]
    pub dur: f64,
}

/// Public view of a recent event (timestamp + score only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentScore {
    pub ts: f64,
    pub score: u8,
}

impl From<&RecentEvent> for RecentScore {
    fn from(event: &RecentEvent) -> Self {
        Self {
            ts: event.ts,
            score: event.score,
        }
    }
}

/// Metrics snapshot returned by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub status: String,
    pub uptime_sec: u64,
    pub total: u64,
    pub avg_response_ms: f64,
    pub last: Vec<RecentScore>,
    /// Backward-compatible alias of `total`
    pub total_validations: u64,
    /// Backward-compatible average, in seconds
    pub average_response_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricsSummary {
    /// Zeroed summary used when the store cannot be read at all
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            status: "online".to_string(),
            uptime_sec: 0,
            total: 0,
            avg_response_ms: 0.0,
            last: Vec::new(),
            total_validations: 0,
            average_response_time: 0.0,
            error: Some(error.into()),
        }
    }
}

/// Real-world-asset check placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RwaStatus {
    pub status: String,
}

impl RwaStatus {
    pub fn in_development() -> Self {
        Self {
            status: "in-development".to_string(),
        }
    }
}

/// Full answer for one validated wallet
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub wallet: String,
    pub xrpl: AccountSnapshot,
    pub risk_score: RiskAssessment,
    pub rwa_status: RwaStatus,
}

impl ValidationReport {
    pub fn summary(&self) -> String {
        format!(
            "{} {} | Score: {} | Funded: {} | Balance: {:.6} XRP | Endpoint: {}",
            self.risk_score.level.emoji(),
            self.risk_score.level.as_str(),
            self.risk_score.score,
            self.xrpl.funded,
            self.xrpl.balance_xrp,
            if self.xrpl.api_used.is_empty() { "-" } else { &self.xrpl.api_used },
        )
    }
}
