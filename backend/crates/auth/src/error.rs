//! Auth Error Types
//!
//! Fatal failures only. Validation problems travel as `FieldError`s inside
//! the response body and never reach this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::ephemeral::EphemeralStoreError;
use platform::mail::MailError;
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unique constraint hit on insert; the use case turns it into a field error
    #[error("User name already exists")]
    UserNameTaken,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] EphemeralStoreError),

    #[error("Mail delivery error: {0}")]
    Mail(#[from] MailError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UserNameTaken => StatusCode::CONFLICT,
            AuthError::TokenStore(_) | AuthError::Database(sqlx::Error::PoolTimedOut) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AuthError::PasswordHash(_)
            | AuthError::Mail(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::TokenStore(_) | AuthError::Database(sqlx::Error::PoolTimedOut) => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::PasswordHash(_)
            | AuthError::Mail(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError; server-side details stay out of the body
    pub fn to_app_error(&self) -> AppError {
        if self.kind().is_server_error() {
            AppError::new(self.kind(), "Internal server error")
        } else {
            AppError::new(self.kind(), self.to_string())
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::TokenStore(e) => {
                tracing::error!(error = %e, "Auth token store error");
            }
            AuthError::Mail(e) => {
                tracing::error!(error = %e, "Auth mail error");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Auth password hashing error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::UserNameTaken => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
