use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::{ErrorKind, LedgerError};

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Ledger(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Precondition => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
                ErrorKind::ConcurrencyConflict => StatusCode::CONFLICT,
                ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::RateLimitExceeded(_) => "RATE_LIMIT_EXCEEDED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Ledger(err) => err.code(),
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            AppError::RateLimitExceeded(_) => true,
            AppError::Ledger(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::InternalError(err) => {
                tracing::error!(error = %err, "internal error");
                "Internal server error".to_string()
            }
            AppError::Ledger(err) if err.is_retryable() => {
                tracing::warn!(code = err.code(), error = %err, "retryable ledger failure");
                err.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.code(),
            "message": message,
            "retryable": self.retryable(),
        }));

        (status, body).into_response()
    }
}
