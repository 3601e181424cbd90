//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so it can be grepped in the
//! operational log.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - RPC_xxx: ledger endpoint errors
//! - METRICS_xxx: durable metrics store errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Ledger RPC Errors
    // ============================================
    /// Endpoint unreachable
    RpcConnectionFailed,
    /// Endpoint did not answer within the per-endpoint timeout
    RpcTimeout,
    /// Endpoint answered with a non-2xx status
    RpcHttpStatus,
    /// Body was not JSON or did not carry the expected shape
    RpcInvalidResponse,
    /// Well-formed ledger error other than "not found"/"malformed"
    RpcLedgerError,
    /// No endpoints configured
    RpcNoEndpoints,

    // ============================================
    // Metrics Store Errors
    // ============================================
    /// Writing the metrics file failed
    MetricsPersistFailed,
    /// Metrics file exists but could not be understood
    MetricsCorruptState,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RpcConnectionFailed => "RPC_CONNECTION_FAILED",
            Self::RpcTimeout => "RPC_TIMEOUT",
            Self::RpcHttpStatus => "RPC_HTTP_STATUS",
            Self::RpcInvalidResponse => "RPC_INVALID_RESPONSE",
            Self::RpcLedgerError => "RPC_LEDGER_ERROR",
            Self::RpcNoEndpoints => "RPC_NO_ENDPOINTS",

            Self::MetricsPersistFailed => "METRICS_PERSIST_FAILED",
            Self::MetricsCorruptState => "METRICS_CORRUPT_STATE",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::ConfigInvalidValue => 400,
            Self::RpcConnectionFailed
            | Self::RpcHttpStatus
            | Self::RpcInvalidResponse
            | Self::RpcLedgerError
            | Self::RpcNoEndpoints => 502,
            Self::RpcTimeout => 504,
            Self::MetricsPersistFailed | Self::MetricsCorruptState | Self::ApiInternalError => 500,
        }
    }

    /// Transient endpoint failures: the client rotates to the next endpoint
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RpcConnectionFailed
                | Self::RpcTimeout
                | Self::RpcHttpStatus
                | Self::RpcInvalidResponse
                | Self::RpcLedgerError
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn rpc_connection_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcConnectionFailed, msg)
    }

    pub fn rpc_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcTimeout, msg)
    }

    pub fn rpc_http_status(status: u16) -> Self {
        Self::new(ErrorCode::RpcHttpStatus, format!("HTTP status {}", status))
    }

    pub fn rpc_invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcInvalidResponse, msg)
    }

    /// Ledger answered with an error code we do not treat as terminal
    pub fn rpc_ledger_error(error: &str) -> Self {
        Self::new(ErrorCode::RpcLedgerError, format!("XRPL error: {}", error))
    }

    pub fn no_endpoints() -> Self {
        Self::new(ErrorCode::RpcNoEndpoints, "No ledger endpoints configured")
    }

    pub fn metrics_persist_failed(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(ErrorCode::MetricsPersistFailed, msg, source)
    }

    pub fn metrics_corrupt(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MetricsCorruptState, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// Server-side failure outside the ledger path
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::rpc_timeout("Request timeout")
        } else if err.is_connect() {
            Self::rpc_connection_failed("Connection failed")
        } else if let Some(status) = err.status() {
            Self::rpc_http_status(status.as_u16())
        } else if err.is_decode() {
            Self::rpc_invalid_response(err.to_string())
        } else {
            Self::rpc_connection_failed(err.to_string())
        }
    }
}
