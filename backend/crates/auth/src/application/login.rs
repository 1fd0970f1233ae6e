//! Login Use Case
//!
//! Authenticates by username or email and binds the session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::outcome::UserOutcome;
use crate::application::session::{SessionContext, SessionManager};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_name::UserName, user_password::RawPassword};
use crate::error::AuthResult;

/// Same text for unknown account and wrong password
pub const INVALID_CREDENTIALS: &str = "invalid username/email or password";

pub struct LoginInput {
    /// Looked up as an email when it contains `@`
    pub user_name_or_email: String,
    pub password: String,
}

pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    sessions: SessionManager<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> LoginUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            sessions: SessionManager::new(session_repo, config.clone()),
            config,
        }
    }

    pub async fn execute(
        &self,
        ctx: &mut SessionContext,
        input: LoginInput,
    ) -> AuthResult<UserOutcome> {
        let identifier = input.user_name_or_email;
        let user = if Email::looks_like_email(&identifier) {
            self.user_repo.find_by_email(&identifier).await?
        } else {
            self.user_repo
                .find_by_username(&UserName::from_db(identifier))
                .await?
        };

        let Some(user) = user else {
            tracing::debug!("Login for unknown account");
            return Ok(UserOutcome::invalid("userNameOrEmail", INVALID_CREDENTIALS));
        };

        let raw_password = RawPassword::for_verification(input.password);
        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            tracing::warn!(user_id = %user.id, "Invalid login attempt");
            return Ok(UserOutcome::invalid("password", INVALID_CREDENTIALS));
        }

        self.sessions.bind(ctx, user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(UserOutcome::Success(user))
    }
}
