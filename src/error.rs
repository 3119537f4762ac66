//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::event_store::EventStoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", Some(msg.clone()))
            }

            // 404 Not Found
            AppError::ProductNotFound(id) => {
                (StatusCode::NOT_FOUND, "product_not_found", Some(id.clone()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidWeek(_)
                | DomainError::DuplicateWeek { .. }
                | DomainError::HorizonExceeded { .. }
                | DomainError::AmountOverflow { .. }
                | DomainError::InvalidInput(_) => (
                    StatusCode::BAD_REQUEST,
                    "invalid_input",
                    Some(domain_err.to_string()),
                ),
                DomainError::ProductNotFound(id) => {
                    (StatusCode::NOT_FOUND, "product_not_found", Some(id.clone()))
                }
                DomainError::ActualNotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    "actual_not_found",
                    Some(domain_err.to_string()),
                ),
                DomainError::VersionConflict { expected, found } => (
                    StatusCode::CONFLICT,
                    "version_conflict",
                    Some(format!("expected {}, found {}", expected, found)),
                ),
            },

            // 409 Conflict (retries exhausted)
            AppError::EventStore(EventStoreError::ConcurrencyConflict { .. })
            | AppError::EventStore(EventStoreError::MaxRetriesExceeded) => {
                (StatusCode::CONFLICT, "version_conflict", None)
            }

            // 500 Internal Server Error
            AppError::EventStore(e) => {
                tracing::error!("Event store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = self.status_and_code();

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let err = AppError::from(DomainError::DuplicateWeek { week: 4 });
        let (status, code, details) = err.status_and_code();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "invalid_input");
        assert!(details.unwrap().contains("week 4"));
    }

    #[test]
    fn test_amount_overflow_maps_to_bad_request() {
        let err = AppError::from(DomainError::AmountOverflow { field: "total revenue" });
        let (status, code, _) = err.status_and_code();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "invalid_input");
    }

    #[test]
    fn test_not_found_mappings() {
        let (status, code, _) = AppError::ProductNotFound("x".to_string()).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "product_not_found");

        let (status, code, _) =
            AppError::from(DomainError::ActualNotFound { week: 2 }).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "actual_not_found");
    }

    #[test]
    fn test_conflicts_map_to_409() {
        let err = AppError::from(EventStoreError::MaxRetriesExceeded);
        assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
