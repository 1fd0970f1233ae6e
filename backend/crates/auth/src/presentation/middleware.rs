//! Auth Middleware
//!
//! Resolves the session cookie for routes owned by other crates and leaves
//! the result in the request extensions as [`AuthStatus`].

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::SessionManager;
use crate::domain::repository::AuthSessionRepository;

/// Middleware state
pub struct AuthMiddlewareState<S> {
    pub repo: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> AuthMiddlewareState<S> {
    pub fn new(repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<S> Clone for AuthMiddlewareState<S> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Authentication status stored in request extensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// No cookie, or one that does not name a live session
    #[default]
    Anonymous,
    User(UserId),
    /// The session store could not be read
    Unavailable,
}

/// Middleware that checks the auth session but doesn't require it.
///
/// A store failure is recorded as [`AuthStatus::Unavailable`]; handlers
/// that need a user report it, the rest serve the request anonymously.
pub async fn check_auth_session<S>(
    State(state): State<AuthMiddlewareState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    S: AuthSessionRepository + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let sessions = SessionManager::new(state.repo.clone(), state.config.clone());
    let status = match sessions.load(token.as_deref()).await {
        Ok(ctx) => ctx.user_id().map_or(AuthStatus::Anonymous, AuthStatus::User),
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed");
            AuthStatus::Unavailable
        }
    };

    req.extensions_mut().insert(status);

    next.run(req).await
}
