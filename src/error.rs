//! Error types for the complaint desk

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::domain::HashingError;
use crate::lifecycle::{ComplaintStatus, TransitionRejection};
use crate::models::ApiResponse;
use crate::ports::RepositoryError;

/// Caller-visible failure of a core operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Unknown email or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or revoked token
    #[error("authentication required")]
    Unauthenticated,

    /// Valid session, insufficient role or department scope
    #[error("not permitted: {0}")]
    Unauthorized(String),

    #[error("complaint not found: {0}")]
    NotFound(String),

    #[error("transition {from} -> {to} is not allowed")]
    IllegalTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    /// Status changed underneath the caller; re-read and resubmit
    #[error("complaint is {actual}, expected {expected}")]
    StaleState {
        expected: ComplaintStatus,
        actual: ComplaintStatus,
    },

    #[error("department classification failed: {0}")]
    ClassificationFailed(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    /// Backing store failure; never assume the operation succeeded
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::IllegalTransition { .. } => "illegal_transition",
            Self::StaleState { .. } => "stale_state",
            Self::ClassificationFailed(_) => "classification_failed",
            Self::InvalidInput(_) => "invalid_input",
            Self::DuplicateAccount(_) => "duplicate_account",
            Self::Unavailable(_) => "unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::IllegalTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StaleState { .. } | Self::DuplicateAccount(_) => StatusCode::CONFLICT,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ClassificationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<TransitionRejection> for CoreError {
    fn from(rejection: TransitionRejection) -> Self {
        match rejection {
            TransitionRejection::Illegal { from, to } => Self::IllegalTransition { from, to },
            TransitionRejection::Stale { expected, actual } => Self::StaleState { expected, actual },
        }
    }
}

impl From<HashingError> for CoreError {
    fn from(err: HashingError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StatusMismatch { expected, actual } => Self::StaleState { expected, actual },
            RepositoryError::NotFound(key) => Self::NotFound(key),
            RepositoryError::DuplicateKey(key) => Self::DuplicateAccount(key),
            RepositoryError::Unavailable(e) => Self::Unavailable(e),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ApiResponse::<()>::error(self.code(), &self.to_string());
        (status, Json(body)).into_response()
    }
}
