//! Error responses
//!
//! Every failure leaves the API as `{ "error": <message>, "code": <CODE> }`.
//! Server-side failures only carry their detail in development mode.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use mockncrack_core::{Error, OperatingMode};

/// Message shown for 5xx responses outside development
pub const GENERIC_UNAVAILABLE: &str = "Service temporarily unavailable";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug)]
pub struct ApiError {
    pub error: Error,
    pub mode: OperatingMode,
}

impl ApiError {
    pub fn new(error: Error, mode: OperatingMode) -> Self {
        Self { error, mode }
    }

    fn message(&self) -> String {
        match &self.error {
            _ if !self.error.is_client_error() && !self.mode.is_development() => {
                GENERIC_UNAVAILABLE.to_string()
            }
            Error::InvalidInput(msg) | Error::Unauthorized(msg) => msg.clone(),
            Error::Jwt(_) => "Invalid or expired token".to_string(),
            Error::InsufficientTokens { .. } => {
                "Insufficient tokens. Please purchase more tokens to continue.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            log::error!("[api] Request failed: {}", self.error.code());
            log::debug!("[api] Failure detail: {}", self.error);
        } else {
            log::debug!("[api] Rejected request: {}", self.error);
        }

        let body = ErrorBody {
            error: self.message(),
            code: self.error.code(),
        };
        (status, Json(body)).into_response()
    }
}
