#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractionError;
use crate::ollama::OllamaError;
use crate::providers::ProviderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File too large. Maximum size is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Upstream extraction service error: {0}")]
    Upstream(String),

    #[error("The extraction service timed out. Please try again.")]
    UpstreamTimeout,

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(_) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            AppError::Multipart(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Invalid multipart upload: {e}"),
            ),
            AppError::Extraction(e) => (
                StatusCode::BAD_REQUEST,
                "EXTRACTION_ERROR",
                e.to_string(),
            ),
            AppError::NotConfigured(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROVIDER_NOT_CONFIGURED",
                msg.clone(),
            ),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream provider error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                self.to_string(),
            ),
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE", msg.clone())
            }
            AppError::Model(msg) => {
                tracing::error!("Model error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "MODEL_ERROR", msg.clone())
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

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        match &e {
            ProviderError::Http(err) if err.is_timeout() => AppError::UpstreamTimeout,
            ProviderError::NoneConfigured => AppError::NotConfigured(e.to_string()),
            _ => AppError::Upstream(e.to_string()),
        }
    }
}

impl From<OllamaError> for AppError {
    fn from(e: OllamaError) -> Self {
        match &e {
            OllamaError::Unreachable { .. } => AppError::ModelUnavailable(e.to_string()),
            _ => AppError::Model(e.to_string()),
        }
    }
}
