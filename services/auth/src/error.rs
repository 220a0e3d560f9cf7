//! Error types for authentication and the HTTP boundary

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures of the session lifecycle
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was presented
    #[error("Unauthorized request")]
    AuthenticationRequired,

    /// Bad signature, expired, wrong token type, or unknown identity
    #[error("Invalid credential")]
    InvalidCredential,

    /// The refresh token no longer matches the one on record
    #[error("Refresh token is expired or used")]
    SessionRevoked,

    /// Authenticated, but not allowed to touch this resource
    #[error("You are not allowed to modify this resource")]
    Forbidden,

    /// Signing or storage failed
    #[error("Internal server error")]
    InternalFailure,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AuthenticationRequired
            | AuthError::InvalidCredential
            | AuthError::SessionRevoked => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::InternalFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AuthError::AuthenticationRequired => "authentication_required",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::SessionRevoked => "session_revoked",
            AuthError::Forbidden => "forbidden",
            AuthError::InternalFailure => "internal_failure",
        }
    }
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        error!("Credential store failure: {}", err);
        AuthError::InternalFailure
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_body(self.status(), self.kind(), self.to_string())
    }
}

/// Error type returned by route handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The addressed resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The write collides with existing data
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Too many attempts from the same source
    #[error("Too many requests")]
    TooManyRequests,

    /// Authentication or authorization failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(constraint) => {
                ApiError::Conflict(format!("Value already in use ({})", constraint))
            }
            other => ApiError::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => error_body(StatusCode::CONFLICT, "conflict", msg),
            ApiError::TooManyRequests => error_body(
                StatusCode::TOO_MANY_REQUESTS,
                "too_many_requests",
                "Too many attempts, try again later".to_string(),
            ),
            ApiError::Auth(err) => err.into_response(),
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database",
                    "Database error".to_string(),
                )
            }
        }
    }
}

fn error_body(status: StatusCode, kind: &str, message: String) -> Response {
    let body = Json(json!({
        "success": false,
        "statusCode": status.as_u16(),
        "error": kind,
        "message": message,
    }));

    (status, body).into_response()
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
