//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use desabafa_types::error::ServiceError;

use super::response::{ApiErrorDetail, ApiResponse};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors raised by the core services.
    Service(ServiceError),
    /// Malformed request input caught before reaching a service.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Service(e) => match e {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::QuotaExceeded => StatusCode::FORBIDDEN,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::Auth => StatusCode::UNAUTHORIZED,
                ServiceError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                ServiceError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
                ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ApiErrorDetail {
        let (code, message, details) = match self {
            AppError::Service(ServiceError::QuotaExceeded) => (
                "QUOTA_EXCEEDED",
                ServiceError::QuotaExceeded.to_string(),
                Some(json!({ "upgrade_required": true })),
            ),
            AppError::Service(e @ (ServiceError::Upstream { .. } | ServiceError::UpstreamTimeout)) => (
                e.code(),
                e.to_string(),
                Some(json!({ "retryable": e.is_retryable() })),
            ),
            // Internal details are logged, never returned.
            AppError::Service(ServiceError::Storage(_)) | AppError::Internal(_) => {
                ("INTERNAL_ERROR", "internal server error".to_string(), None)
            }
            AppError::Service(e) => (e.code(), e.to_string(), None),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone(), None),
        };

        ApiErrorDetail {
            code: code.to_string(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Service(ServiceError::Storage(msg)) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
            }
            AppError::Service(e @ (ServiceError::Upstream { .. } | ServiceError::UpstreamTimeout)) => {
                tracing::warn!(error = %e, "Upstream call failed");
            }
            _ => {}
        }

        let body = ApiResponse::error(self.detail(), Uuid::now_v7().to_string());
        (status, Json(body)).into_response()
    }
}
