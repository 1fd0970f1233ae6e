//! Session Context
//!
//! A request's login state is loaded once into a [`SessionContext`] and
//! handed to the use cases that need it. Only [`SessionManager`] changes it;
//! the change it queues is turned into a `Set-Cookie` header by the
//! presentation layer.

use std::sync::Arc;

use chrono::Duration;
use kernel::id::UserId;
use platform::crypto;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthSessionRepository;
use crate::error::AuthResult;

/// Cookie update owed to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieChange {
    /// Send this signed session token
    Set(String),
    /// Drop the session cookie
    Clear,
}

#[derive(Debug, Default)]
pub struct SessionContext {
    session_id: Option<Uuid>,
    user_id: Option<UserId>,
    cookie_change: Option<CookieChange>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn cookie_change(&self) -> Option<&CookieChange> {
        self.cookie_change.as_ref()
    }

    pub fn take_cookie_change(&mut self) -> Option<CookieChange> {
        self.cookie_change.take()
    }
}

/// Signed cookie value for a session id
pub fn session_token(secret: &[u8; 32], session_id: Uuid) -> String {
    crypto::sign(secret, &session_id.to_string())
}

/// Session id from a signed cookie value, if the signature holds
pub fn parse_session_token(secret: &[u8; 32], token: &str) -> Option<Uuid> {
    crypto::verify_signed(secret, token)?.parse().ok()
}

pub struct SessionManager<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SessionManager<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Resolve the cookie value into a context.
    ///
    /// Forged, unknown and expired tokens give an anonymous context; only
    /// store failures are errors.
    pub async fn load(&self, token: Option<&str>) -> AuthResult<SessionContext> {
        let Some(token) = token else {
            return Ok(SessionContext::anonymous());
        };

        let Some(session_id) = parse_session_token(&self.config.session_secret, token) else {
            tracing::debug!("Session cookie failed signature check");
            return Ok(SessionContext::anonymous());
        };

        let session = self.session_repo.find_by_id(session_id).await?;

        Ok(match session {
            Some(session) if !session.is_expired() => SessionContext {
                session_id: Some(session.session_id),
                user_id: Some(session.user_id),
                cookie_change: None,
            },
            _ => SessionContext::anonymous(),
        })
    }

    /// Context to log out of. If the store cannot be read, a validly
    /// signed cookie still names the session to delete.
    pub async fn load_for_logout(&self, token: Option<&str>) -> SessionContext {
        match self.load(token).await {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load session during logout");
                SessionContext {
                    session_id: token
                        .and_then(|t| parse_session_token(&self.config.session_secret, t)),
                    user_id: None,
                    cookie_change: None,
                }
            }
        }
    }

    /// Log `user_id` in, replacing whatever session the context held
    pub async fn bind(&self, ctx: &mut SessionContext, user_id: UserId) -> AuthResult<()> {
        if let Some(old) = ctx.session_id.take() {
            self.session_repo.delete(old).await?;
        }

        let ttl = Duration::milliseconds(self.config.session_ttl_ms());
        let session = AuthSession::new(user_id, ttl);
        self.session_repo.create(&session).await?;

        ctx.session_id = Some(session.session_id);
        ctx.user_id = Some(user_id);
        ctx.cookie_change = Some(CookieChange::Set(session_token(
            &self.config.session_secret,
            session.session_id,
        )));

        tracing::info!(
            user_id = %user_id,
            session_id = %session.session_id,
            "Session bound"
        );

        Ok(())
    }

    /// Log out. The cookie is cleared even when the record cannot be
    /// deleted; the return value says whether deletion succeeded.
    pub async fn destroy(&self, ctx: &mut SessionContext) -> bool {
        ctx.user_id = None;
        ctx.cookie_change = Some(CookieChange::Clear);

        let Some(session_id) = ctx.session_id.take() else {
            return true;
        };

        match self.session_repo.delete(session_id).await {
            Ok(()) => {
                tracing::info!(session_id = %session_id, "Session destroyed");
                true
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to destroy session");
                false
            }
        }
    }
}
