//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the per-request session context
//! - `infra/` - PostgreSQL repositories and the reset-token vault
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Register / login with username or email + password
//! - Server-side sessions referenced by an HMAC-signed cookie
//! - Password reset through single-use tokens held in an ephemeral store
//!
//! Validation failures are returned as field errors inside a normal
//! response; only store and transport failures become `AuthError`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use infra::token_vault::EphemeralTokenVault;
pub use presentation::middleware::{AuthMiddlewareState, AuthStatus, check_auth_session};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::AppError,
    field::FieldError,
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
