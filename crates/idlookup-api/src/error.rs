//! # API Error Types
//!
//! Every handler failure maps to one [`AppError`] variant. Bodies are plain
//! text: the fixed message for client errors, the error text for
//! internal failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use idlookup_core::{NotFound, QueryError};
use thiserror::Error;

/// Body of every 401 response.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Body of a 500 raised before a handler runs.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or conflicting query parameters (400).
    #[error("{0}")]
    Validation(&'static str),

    /// A lookup matched no rows (404).
    #[error(transparent)]
    NotFound(#[from] NotFound),

    /// Missing or mismatched API key (401).
    #[error("{}", UNAUTHORIZED)]
    Unauthorized,

    /// Anything else (500). The message is returned to the caller.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(reason) => tracing::info!(reason, "rejected request"),
            Self::NotFound(_) => {}
            Self::Unauthorized => tracing::debug!("unauthorized request"),
            Self::Internal(message) => tracing::error!(error = %message, "internal server error"),
        }
        (self.status(), self.to_string()).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        Self::Internal(err.to_string())
    }
}
