use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::TokenError;

/// Closed set of API failures. Token failures deliberately collapse to one
/// message at the boundary so a caller cannot tell which check rejected it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("missing authorization header")]
    MissingAuthHeader,
    #[error("invalid authorization header")]
    InvalidAuthScheme,
    #[error(transparent)]
    InvalidToken(#[from] TokenError),
    #[error("token subject does not resolve to a user")]
    UnknownSubject,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::EmailTaken => (
                StatusCode::CONFLICT,
                "Email already registered".to_string(),
            ),
            ApiError::MissingAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ),
            ApiError::InvalidAuthScheme => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            ),
            ApiError::InvalidToken(e) => {
                warn!(error = %e, "token rejected");
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                )
            }
            ApiError::UnknownSubject => (
                StatusCode::UNAUTHORIZED,
                "Invalid token subject".to_string(),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, message).into_response()
    }
}
