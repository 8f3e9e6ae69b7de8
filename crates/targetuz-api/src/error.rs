//! API error handling
//!
//! Maps the platform error taxonomy onto HTTP. Every response body carries
//! a stable machine code plus a human-readable message suitable for direct
//! display; store internals never leak to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use targetuz_types::TargetUzError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error with stable codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    NotFound {
        code: &'static str,
        message: String,
    },

    #[error("{message}")]
    Forbidden {
        code: &'static str,
        message: String,
    },

    #[error("{message}")]
    BadRequest {
        code: &'static str,
        message: String,
    },

    /// The operation was a no-op because the order is not in the required
    /// state; the caller should re-read and reconcile its view
    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    #[error("{message}")]
    UnprocessableEntity {
        code: &'static str,
        message: String,
    },

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "INVALID_INPUT",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            code: "NOT_FOUND",
            message: message.into(),
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable machine code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { code, .. }
            | Self::Forbidden { code, .. }
            | Self::BadRequest { code, .. }
            | Self::Conflict { code, .. }
            | Self::UnprocessableEntity { code, .. } => code,
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine code
    pub code: String,
    /// Human-readable message, suitable for direct display
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}

impl From<TargetUzError> for ApiError {
    fn from(err: TargetUzError) -> Self {
        let code = err.error_code();
        let message = err.to_string();
        match &err {
            TargetUzError::OrderNotFound { .. }
            | TargetUzError::WalletNotFound { .. }
            | TargetUzError::UserNotFound { .. } => Self::NotFound { code, message },

            TargetUzError::Unauthorized { .. } => Self::Forbidden { code, message },

            TargetUzError::InvalidAmount { .. } | TargetUzError::InvalidInput { .. } => {
                Self::BadRequest { code, message }
            }

            TargetUzError::AlreadyEscrowed { .. }
            | TargetUzError::NothingToRelease { .. }
            | TargetUzError::InvalidEscrowAmount { .. }
            | TargetUzError::IllegalTransition { .. } => Self::Conflict { code, message },

            TargetUzError::InsufficientFunds { .. } => {
                Self::UnprocessableEntity { code, message }
            }

            TargetUzError::Storage { .. } | TargetUzError::Internal { .. } => {
                tracing::error!(error = %err, "Settlement operation failed");
                Self::Internal
            }
        }
    }
}

impl From<targetuz_db::DbError> for ApiError {
    fn from(err: targetuz_db::DbError) -> Self {
        match err {
            targetuz_db::DbError::NotFound(msg) => Self::not_found(msg),
            targetuz_db::DbError::Duplicate(msg) => Self::Conflict {
                code: "DUPLICATE",
                message: msg,
            },
            targetuz_db::DbError::InvalidInput(msg) => Self::bad_request(msg),
            other => {
                tracing::error!(error = ?other, "Database error");
                Self::Internal
            }
        }
    }
}
