//! Ledger RPC Client - Sticky Failover over Public JSON-RPC Endpoints
//!
//! 1. One `account_info` request per attempt, bounded by the client timeout
//! 2. At most one attempt per configured endpoint per lookup
//! 3. Any transient failure advances the shared rotation index, so the next
//!    lookup starts on the endpoint after the one that failed
//! 4. Every outcome collapses into an [`AccountSnapshot`]; nothing is raised
//!    past `lookup_account`

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Deserializer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::config::ValidatorConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::AccountSnapshot;
use crate::utils::constants::{UNFUNDED_ERROR_CODES, USER_AGENT as USER_AGENT_CONST};
use crate::utils::sanitize::rotate_fallback;

/// Shared rotation index over a fixed endpoint list.
///
/// Not reset between lookups: a failure during one request moves the
/// starting endpoint of every later request.
#[derive(Debug)]
pub struct EndpointRotation {
    index: AtomicUsize,
    len: usize,
}

impl EndpointRotation {
    pub fn new(len: usize) -> Self {
        Self {
            index: AtomicUsize::new(0),
            len,
        }
    }

    /// Index the next lookup starts on
    pub fn current(&self) -> usize {
        self.index.load(Ordering::Acquire) % self.len.max(1)
    }

    /// Move past `failed`. If another task already moved the index off
    /// `failed`, its rotation stands and this call is a no-op.
    pub fn advance_from(&self, failed: usize) {
        let next = rotate_fallback(failed, self.len);
        let _ = self
            .index
            .compare_exchange(failed, next, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Classification of a single endpoint answer
#[derive(Debug)]
pub enum LookupOutcome {
    /// Account exists
    Funded {
        balance_drops: u64,
        owner_count: u64,
        flags: u32,
    },
    /// Well-formed "not found" / "malformed input"
    Unfunded,
    /// Rotate and retry
    Transient(AppError),
}

// ============================================
// Wire shapes
// ============================================

#[derive(Debug, Deserialize)]
struct AccountInfoEnvelope {
    result: AccountInfoResult,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResult {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    account_data: Option<AccountRoot>,
}

#[derive(Debug, Deserialize)]
struct AccountRoot {
    /// Drops, sent as a decimal string
    #[serde(rename = "Balance", deserialize_with = "drops_from_string_or_number")]
    balance: u64,
    #[serde(rename = "OwnerCount", default)]
    owner_count: u64,
    #[serde(rename = "Flags", default)]
    flags: u32,
}

fn drops_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Drops {
        Text(String),
        Number(u64),
    }

    match Drops::deserialize(deserializer)? {
        Drops::Number(n) => Ok(n),
        Drops::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Build the `account_info` request body
pub fn account_info_request(address: &str) -> serde_json::Value {
    serde_json::json!({
        "method": "account_info",
        "params": [{
            "account": address,
            "ledger_index": "validated",
            "strict": true
        }]
    })
}

/// Map one HTTP answer onto a [`LookupOutcome`]
pub fn classify_response(status: u16, body: &str) -> LookupOutcome {
    if !(200..300).contains(&status) {
        return LookupOutcome::Transient(AppError::rpc_http_status(status));
    }

    let envelope: AccountInfoEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            return LookupOutcome::Transient(AppError::rpc_invalid_response(format!(
                "Bad response shape: {}",
                e
            )))
        }
    };

    let result = envelope.result;
    let is_error = result.status.as_deref() == Some("error");

    match result.account_data {
        Some(account) if !is_error => LookupOutcome::Funded {
            balance_drops: account.balance,
            owner_count: account.owner_count,
            flags: account.flags,
        },
        _ => match result.error.as_deref() {
            Some(code) if UNFUNDED_ERROR_CODES.contains(&code) => LookupOutcome::Unfunded,
            Some(code) => LookupOutcome::Transient(AppError::rpc_ledger_error(code)),
            None => LookupOutcome::Transient(AppError::rpc_ledger_error("unknown")),
        },
    }
}

/// Failover-aware ledger client
#[derive(Debug)]
pub struct LedgerClient {
    endpoints: Vec<String>,
    rotation: EndpointRotation,
    client: reqwest::Client,
}

impl LedgerClient {
    /// Create a client from the validator configuration
    pub fn new(config: &ValidatorConfig) -> AppResult<Self> {
        Self::with_endpoints(config.endpoints.clone(), config.rpc_timeout)
    }

    /// Create a client over an explicit endpoint list
    pub fn with_endpoints(endpoints: Vec<String>, timeout: Duration) -> AppResult<Self> {
        if endpoints.is_empty() {
            return Err(AppError::no_endpoints());
        }

        let client = Self::build_client(timeout)?;
        info!("🔗 Ledger client ready with {} endpoint(s)", endpoints.len());

        Ok(Self {
            rotation: EndpointRotation::new(endpoints.len()),
            endpoints,
            client,
        })
    }

    fn build_client(timeout: Duration) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| AppError::invalid_config(format!("Failed to build HTTP client: {}", e)))
    }

    /// Look up an account, trying each endpoint at most once.
    pub async fn lookup_account(&self, address: &str) -> AccountSnapshot {
        let address = address.trim();
        let total = self.endpoints.len();
        let mut index = self.rotation.current();

        for attempt in 1..=total {
            let url = &self.endpoints[index];

            match self.query_endpoint(url, address).await {
                LookupOutcome::Funded {
                    balance_drops,
                    owner_count,
                    flags,
                } => {
                    debug!("✅ Funded account via {} (attempt {}/{})", url, attempt, total);
                    return AccountSnapshot::funded(url.as_str(), balance_drops, owner_count, flags);
                }
                LookupOutcome::Unfunded => {
                    debug!("📭 Unfunded account via {} (attempt {}/{})", url, attempt, total);
                    return AccountSnapshot::unfunded(url.as_str());
                }
                LookupOutcome::Transient(err) if !err.code.is_retryable() => {
                    warn!(
                        endpoint = %url,
                        code = err.code_str(),
                        "❌ [XRPL] {} failed with a non-retryable error: {}",
                        url,
                        err.message
                    );
                    break;
                }
                LookupOutcome::Transient(err) => {
                    warn!(
                        endpoint = %url,
                        code = err.code_str(),
                        "⚠️ [XRPL] {} failed (attempt {}/{}): {}",
                        url,
                        attempt,
                        total,
                        err.message
                    );
                    self.rotation.advance_from(index);
                    index = rotate_fallback(index, total);
                }
            }
        }

        warn!("❌ All {} ledger endpoints failed", total);
        AccountSnapshot::all_failed()
    }

    /// Single request against one endpoint
    async fn query_endpoint(&self, url: &str, address: &str) -> LookupOutcome {
        let response = match self
            .client
            .post(url)
            .json(&account_info_request(address))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return LookupOutcome::Transient(AppError::from(e)),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => classify_response(status, &body),
            Err(e) => LookupOutcome::Transient(AppError::from(e)),
        }
    }

    /// Configured endpoints, in priority order
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Endpoint the next lookup will start on
    pub fn current_endpoint(&self) -> &str {
        &self.endpoints[self.rotation.current()]
    }
}
