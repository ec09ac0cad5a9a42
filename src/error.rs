/// Unified error types for the reflexboard service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type; every failure crosses the service boundary as one of
/// these variants so the router can map it to a status code deterministically.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors (storage unavailable or query failure)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Entity lookup failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// Registration attempted with an email that is already taken
    #[error("Email {0} already taken")]
    DuplicateEmail(String),

    /// Login failed; deliberately identical for unknown email and wrong password
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// A list-style query matched nothing
    #[error("{0}")]
    EmptyResult(String),

    /// Timer creation referenced a user id that does not resolve
    #[error("No user found with this id")]
    UserNotFound,

    /// Token signature or structure is invalid
    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    /// Token is past its expiration
    #[error("Token has expired")]
    TokenExpired,

    /// Password hashing or hash parsing failed
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Timer timestamps are inconsistent (click before start)
    #[error("Invalid timer input: {0}")]
    InvalidTimerInput(String),

    /// Validation errors (configuration, request fields)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, "UserNotFound", self.to_string()),
            ApiError::EmptyResult(_) => (StatusCode::NOT_FOUND, "EmptyResult", self.to_string()),
            ApiError::DuplicateEmail(_) => {
                (StatusCode::CONFLICT, "DuplicateEmail", self.to_string())
            }
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "InvalidCredentials",
                self.to_string(),
            ),
            ApiError::TokenInvalid(_) => {
                (StatusCode::UNAUTHORIZED, "TokenInvalid", self.to_string())
            }
            ApiError::TokenExpired => (StatusCode::UNAUTHORIZED, "TokenExpired", self.to_string()),
            ApiError::InvalidTimerInput(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidTimerInput",
                self.to_string(),
            ),
            ApiError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            ApiError::Database(_)
            | ApiError::Hashing(_)
            | ApiError::Internal(_)
            | ApiError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "Internal server error".to_string(), // Don't leak details
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = ApiError::Hashing("entropy source exhausted".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(
            ApiError::UserNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::DuplicateEmail("a@x.com".to_string())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidTimerInput("click before start".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
