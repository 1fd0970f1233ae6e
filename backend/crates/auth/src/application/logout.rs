//! Logout Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{SessionContext, SessionManager};
use crate::domain::repository::AuthSessionRepository;

pub struct LogoutUseCase<S>
where
    S: AuthSessionRepository,
{
    sessions: SessionManager<S>,
}

impl<S> LogoutUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions: SessionManager::new(session_repo, config),
        }
    }

    /// `false` when the server-side record could not be removed; the
    /// cookie is cleared either way
    pub async fn execute(&self, ctx: &mut SessionContext) -> bool {
        let user_id = ctx.user_id();
        let destroyed = self.sessions.destroy(ctx).await;
        if let Some(user_id) = user_id {
            tracing::info!(user_id = %user_id, destroyed, "User logged out");
        }
        destroyed
    }
}
