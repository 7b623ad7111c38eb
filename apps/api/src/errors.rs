#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::providers::{ProviderError, UnsupportedProvider};
use crate::storage::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller-controlled configuration names a provider with no
    /// implementation — a client error, rejected before any network call.
    #[error(transparent)]
    UnsupportedProvider(#[from] UnsupportedProvider),

    /// The remote AI provider failed (communication or response format) on a
    /// single-call path.
    #[error(transparent)]
    Upstream(#[from] ProviderError),

    #[error("Storage error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedProvider(e) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_PROVIDER", e.to_string())
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream provider error: {e}");
                (StatusCode::FAILED_DEPENDENCY, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Persistence(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
