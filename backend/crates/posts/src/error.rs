//! Posts Error Types
//!
//! Fatal failures of the posts module. Invalid post input is not an error
//! here; it is returned as a `FieldError` in the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Posts-specific result type alias
pub type PostResult<T> = Result<T, PostError>;

#[derive(Debug, Error)]
pub enum PostError {
    /// Mutation attempted without a logged-in session
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Post not found")]
    PostNotFound,

    /// Pagination cursor that this server did not issue
    #[error("Invalid cursor")]
    InvalidCursor,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The session store could not be read, so the caller is unknown
    #[error("Session store unavailable")]
    SessionUnavailable,
}

impl PostError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PostError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            PostError::PostNotFound => StatusCode::NOT_FOUND,
            PostError::InvalidCursor => StatusCode::BAD_REQUEST,
            PostError::SessionUnavailable | PostError::Database(sqlx::Error::PoolTimedOut) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            PostError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PostError::NotAuthenticated => ErrorKind::Unauthorized,
            PostError::PostNotFound => ErrorKind::NotFound,
            PostError::InvalidCursor => ErrorKind::BadRequest,
            PostError::SessionUnavailable | PostError::Database(sqlx::Error::PoolTimedOut) => {
                ErrorKind::ServiceUnavailable
            }
            PostError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let app_error = if self.kind().is_server_error() {
            AppError::new(self.kind(), "Internal server error")
        } else {
            AppError::new(self.kind(), self.to_string())
        };

        match self {
            PostError::NotAuthenticated => app_error.with_action("Log in and retry"),
            _ => app_error,
        }
    }

    fn log(&self) {
        match self {
            PostError::Database(e) => {
                tracing::error!(error = %e, "Posts database error");
            }
            PostError::SessionUnavailable => {
                tracing::warn!("Posts mutation while session store is down");
            }
            PostError::NotAuthenticated => {
                tracing::warn!("Unauthenticated posts mutation");
            }
            _ => {
                tracing::debug!(error = %self, "Posts error");
            }
        }
    }
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
