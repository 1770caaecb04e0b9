//! One error type for every layer; actix renders it as `{ "error": "..." }`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate username or duplicate join.
    #[error("{0}")]
    Conflict(String),

    #[error("Match is full")]
    Full,

    /// Wrong username / password.
    #[error("{0}")]
    Unauthorized(String),

    /// Missing, unknown or expired session token.
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    /// True for store / infrastructure failures that must not leak to clients.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            ApiError::Database(_) | ApiError::Redis(_) | ApiError::Internal(_)
        )
    }
}

/// Postgres SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Was this a unique-constraint violation reported by Postgres?
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) | ApiError::Full => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) | ApiError::Redis(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_service_error() {
            log::error!("request failed: {self}");
            "Internal server error".to_string()
        } else {
            log::warn!("request rejected: {self}");
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}
