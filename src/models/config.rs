//! Configuration module for the wallet validator
//!
//! Defaults live in utils/constants.rs; this module only layers the
//! environment on top of them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{DEFAULT_LEDGER_ENDPOINTS, DEFAULT_RPC_TIMEOUT_SECS};

/// Runtime configuration for the validator and its API server
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Ledger JSON-RPC endpoints, in priority order
    pub endpoints: Vec<String>,
    /// Bound on each endpoint request
    pub rpc_timeout: Duration,
    /// Directory holding metrics.json and uptime.txt
    pub metrics_dir: PathBuf,
    /// Host for the API server
    pub host: String,
    /// Port for the API server
    pub port: u16,
    /// Scoring rule constants
    pub thresholds: ScoringThresholds,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_LEDGER_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
            metrics_dir: PathBuf::from("."),
            host: "0.0.0.0".to_string(),
            port: 8080,
            thresholds: ScoringThresholds::default(),
        }
    }
}

impl ValidatorConfig {
    /// Build from environment, falling back to defaults per field.
    ///
    /// - `PX_LEDGER_ENDPOINTS`: comma-separated URLs
    /// - `PX_RPC_TIMEOUT_SECS`: per-endpoint timeout
    /// - `PX_METRICS_DIR`: metrics directory
    /// - `PX_HOST`, `PORT` (or `PX_PORT`): API bind address
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("PX_LEDGER_ENDPOINTS") {
            let endpoints = parse_endpoint_list(&raw);
            if endpoints.is_empty() {
                warn!("⚠️ PX_LEDGER_ENDPOINTS is empty, using default endpoints");
            } else {
                config.endpoints = endpoints;
            }
        }

        if let Some(raw) = lookup("PX_RPC_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.rpc_timeout = Duration::from_secs(secs),
                _ => warn!("⚠️ Invalid PX_RPC_TIMEOUT_SECS={:?}, using {}s", raw, DEFAULT_RPC_TIMEOUT_SECS),
            }
        }

        if let Some(dir) = lookup("PX_METRICS_DIR").filter(|d| !d.trim().is_empty()) {
            config.metrics_dir = PathBuf::from(dir.trim());
        }

        if let Some(host) = lookup("PX_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        if let Some(raw) = lookup("PORT").or_else(|| lookup("PX_PORT")) {
            match raw.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("⚠️ Invalid port {:?}, using {}", raw, config.port),
            }
        }

        config
    }

    /// Socket address for the API server
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| AppError::invalid_config(format!("Invalid bind address {}:{}", self.host, self.port)))
    }
}

/// Split a comma-separated endpoint list, dropping blanks
pub fn parse_endpoint_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Thresholds and deltas for the heuristic ruleset
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringThresholds {
    /// Below this balance (XRP) the account is "very low balance"
    pub low_balance_xrp: f64,
    /// Above this balance (XRP) the account is "healthy"
    pub healthy_balance_xrp: f64,
    /// Above this owner count the account is flagged
    pub high_owner_count: u64,

    pub low_balance_delta: i32,
    pub healthy_balance_delta: i32,
    pub high_owner_delta: i32,
    pub no_owner_delta: i32,
    pub global_freeze_delta: i32,
    pub disallow_xrp_delta: i32,
    pub require_dest_tag_delta: i32,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            low_balance_xrp: 1.0,
            healthy_balance_xrp: 20.0,
            high_owner_count: 100,
            low_balance_delta: 15,
            healthy_balance_delta: -5,
            high_owner_delta: 10,
            no_owner_delta: -2,
            global_freeze_delta: 60,
            disallow_xrp_delta: 25,
            require_dest_tag_delta: 5,
        }
    }
}
