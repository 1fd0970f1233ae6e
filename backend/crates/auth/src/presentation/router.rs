//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use platform::ephemeral::EphemeralStore;
use platform::mail::Mailer;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::PasswordResetTokenRepository;
use crate::infra::{postgres::PgAuthRepository, token_vault::EphemeralTokenVault};
use crate::presentation::handlers::{self, AuthAppState, AuthBackend};

/// Create the Auth router with the PostgreSQL repository and a token vault
/// over `store`
pub fn auth_router<S, M>(
    repo: PgAuthRepository,
    store: Arc<S>,
    mailer: M,
    config: AuthConfig,
) -> Router
where
    S: EphemeralStore + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    auth_router_generic(repo, EphemeralTokenVault::new(store), mailer, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R, T, M>(repo: R, tokens: T, mailer: M, config: AuthConfig) -> Router
where
    R: AuthBackend,
    T: PasswordResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens: Arc::new(tokens),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R, T, M>))
        .route("/login", post(handlers::login::<R, T, M>))
        .route("/logout", post(handlers::logout::<R, T, M>))
        .route("/me", get(handlers::me::<R, T, M>))
        .route("/forgot-password", post(handlers::forgot_password::<R, T, M>))
        .route("/change-password", post(handlers::change_password::<R, T, M>))
        .with_state(state)
}
