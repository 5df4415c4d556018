//! Unified error types for the HBnB API
//!
//! This module defines error types for each layer:
//! - `ValidationError`: Field-level violations raised by entity constructors
//! - `DomainError`: Core business logic errors raised by the catalog services
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} must contain a maximum of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("invalid email format: {0}")]
    InvalidEmail(String),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("Rating must be an integer between 1 and 5, got {0}")]
    InvalidRating(String),

    #[error("Name is required")]
    InvalidName,
}

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid numeric value for {field}: {value}")]
    InvalidNumericField { field: &'static str, value: String },

    #[error("Invalid place data: {0}")]
    InvalidPlaceData(ValidationError),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Owner not found: {0}")]
    OwnerNotFound(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("User {user_id} has already reviewed place {place_id}")]
    DuplicateReview { user_id: String, place_id: String },

    #[error("You cannot review your own place")]
    SelfReview,

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Malformed or out-of-range input, whichever way it was detected
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_)
                | DomainError::InvalidNumericField { .. }
                | DomainError::InvalidPlaceData(_)
        )
    }

    /// The field-level violation behind a validation failure, if any
    pub fn violation(&self) -> Option<&ValidationError> {
        match self {
            DomainError::Validation(v) | DomainError::InvalidPlaceData(v) => Some(v),
            _ => None,
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(e) if e.is_validation() => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(e.to_string()),
            ),
            AppError::Domain(DomainError::InvalidReference(msg)) => (
                StatusCode::BAD_REQUEST,
                "Invalid reference",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::OwnerNotFound(msg)) => (
                StatusCode::BAD_REQUEST,
                "Owner not found",
                Some(msg.clone()),
            ),
            AppError::Domain(e @ DomainError::DuplicateEmail(_)) => (
                StatusCode::BAD_REQUEST,
                "Email already registered",
                Some(e.to_string()),
            ),
            AppError::Domain(e @ DomainError::DuplicateReview { .. }) => (
                StatusCode::BAD_REQUEST,
                "You have already reviewed this place",
                Some(e.to_string()),
            ),
            AppError::Domain(DomainError::SelfReview) => (
                StatusCode::FORBIDDEN,
                "You cannot review your own place",
                None,
            ),
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                (StatusCode::CONFLICT, "Already exists", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "Forbidden", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            // Validation kinds are caught by the guard above
            AppError::Domain(e) => {
                (StatusCode::BAD_REQUEST, "Invalid input", Some(e.to_string()))
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
