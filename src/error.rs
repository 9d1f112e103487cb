//! Error types for Cyberfort Core.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for check operations.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for CheckError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CheckError::UpstreamUnavailable(format!("request timed out: {}", e))
        } else {
            CheckError::UpstreamUnavailable(e.to_string())
        }
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Internal error text is only exposed by debug builds.
fn internal_details(details: String) -> Option<String> {
    cfg!(debug_assertions).then_some(details)
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            CheckError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone(), None)
            }
            CheckError::UpstreamUnavailable(msg) => {
                tracing::error!(error = %msg, "Upstream reputation service unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_UNAVAILABLE",
                    "Reputation service unavailable. API error or rate limit exceeded."
                        .to_string(),
                    internal_details(msg.clone()),
                )
            }
            CheckError::Storage(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_FAILURE",
                    "A storage error occurred".to_string(),
                    internal_details(e.to_string()),
                )
            }
            CheckError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                msg.clone(),
                None,
            ),
            CheckError::Serialization(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERIALIZATION_ERROR",
                "Failed to process request/response".to_string(),
                internal_details(e.to_string()),
            ),
            CheckError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    internal_details(msg.clone()),
                )
            }
        };

        let body = ErrorResponse {
            message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for check operations.
pub type CheckResult<T> = Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = CheckError::InvalidInput("URL is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_and_config_are_server_errors() {
        let upstream = CheckError::UpstreamUnavailable("502".to_string()).into_response();
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let config = CheckError::Config("VirusTotal API key not configured".to_string())
            .into_response();
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorResponse {
            message: "Invalid URL format".to_string(),
            code: "INVALID_INPUT".to_string(),
            details: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Invalid URL format");
        assert!(json.get("details").is_none());
    }
}
