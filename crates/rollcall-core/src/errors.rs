//! Application error types with HTTP response conversion.
//!
//! Every fallible operation in the API returns [`AppError`]. Each variant maps
//! to exactly one HTTP status code, so handlers can bubble errors with `?` and
//! let the [`IntoResponse`] impl produce the `{"error": "..."}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid credentials/token.
    #[error("{0}")]
    Unauthorized(String),

    /// A role or ownership gate failed.
    #[error("{0}")]
    PermissionDenied(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The target account's role is incompatible with the requested relationship.
    #[error("{0}")]
    WrongRole(String),

    /// The entity is in a state that disallows the operation.
    #[error("{0}")]
    InvalidState(String),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// Unexpected persistence failure, surfaced as a typed error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other wrapped failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn wrong_role(msg: impl Into<String>) -> Self {
        Self::WrongRole(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::WrongRole(_) | Self::InvalidState(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
