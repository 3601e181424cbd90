//! API Request/Response Types

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};

use crate::models::errors::AppError;

/// Error body returned on rejected requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
    pub latency_ms: f64,
    pub timestamp: i64,
    #[serde(skip)]
    status: u16,
}

impl ErrorResponse {
    pub fn from_app_error(err: &AppError, latency_ms: f64) -> Self {
        Self {
            success: false,
            error: ApiError::from(err),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
            status: err.code.http_status(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
        }
    }
}

/// Body of `/validate` and `/export_iso`
#[derive(Debug, Deserialize)]
pub struct WalletRequest {
    #[serde(default)]
    pub wallet: String,
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub ok: bool,
}
