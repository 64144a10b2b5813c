//! Response envelope and error rendering.
//!
//! Every body the API produces, success or failure, has the same shape:
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "resource not found",
//!   "error": { "code": "NOT_FOUND", "message": "resource not found", "details": "GetTaskByID: abc" },
//!   "timestamp": "2025-01-01T00:00:00Z"
//! }
//! ```

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorKind};

/// Standard envelope for successful responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[schema(example = "Task created successfully")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// RFC3339 UTC time the response was produced
    #[schema(example = "2025-01-01T00:00:00Z")]
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: now_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload (deletes).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            timestamp: now_rfc3339(),
        }
    }
}

/// Error details inside the envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorInfo {
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    #[schema(example = "resource not found")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Envelope for failed responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    #[schema(example = "resource not found")]
    pub message: String,
    pub error: ErrorInfo,
    #[schema(example = "2025-01-01T00:00:00Z")]
    pub timestamp: String,
}

impl From<&AppError> for ErrorResponse {
    /// Details are rendered for client errors only; server-side details
    /// stay in the log.
    fn from(err: &AppError) -> Self {
        let details = match err.kind() {
            ErrorKind::NotFound | ErrorKind::BadRequest => err.details().map(str::to_string),
            ErrorKind::Database | ErrorKind::Internal => None,
        };
        Self {
            success: false,
            message: err.message().to_string(),
            error: ErrorInfo {
                code: err.kind().code().to_string(),
                message: err.message().to_string(),
                details,
            },
            timestamp: now_rfc3339(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_code = self.kind().code();
        let cause = std::error::Error::source(&self).map(|s| s.to_string());

        if status.is_server_error() {
            error!(
                status_code = status.as_u16(),
                error_code,
                details = ?self.details(),
                cause = ?cause,
                "server error occurred: {}",
                self.message()
            );
        } else {
            warn!(
                status_code = status.as_u16(),
                error_code,
                details = ?self.details(),
                "client error occurred: {}",
                self.message()
            );
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("Error parsing json body").with_details(rejection.body_text())
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
