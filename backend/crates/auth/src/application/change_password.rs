//! Change Password Use Case
//!
//! Redeems a reset token. Success logs the user in.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::outcome::UserOutcome;
use crate::application::session::{SessionContext, SessionManager};
use crate::domain::repository::{
    AuthSessionRepository, PasswordResetTokenRepository, UserRepository,
};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::AuthResult;

pub struct ChangePasswordInput {
    pub token: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<U, T, S>
where
    U: UserRepository,
    T: PasswordResetTokenRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    sessions: SessionManager<S>,
    config: Arc<AuthConfig>,
}

impl<U, T, S> ChangePasswordUseCase<U, T, S>
where
    U: UserRepository,
    T: PasswordResetTokenRepository,
    S: AuthSessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            sessions: SessionManager::new(session_repo, config.clone()),
            config,
        }
    }

    pub async fn execute(
        &self,
        ctx: &mut SessionContext,
        input: ChangePasswordInput,
    ) -> AuthResult<UserOutcome> {
        let raw_password = match RawPassword::new(input.new_password) {
            Ok(password) => password,
            Err(e) => return Ok(UserOutcome::invalid("newPassword", e.message())),
        };

        let Some(user_id) = self.token_repo.find_user_id(&input.token).await? else {
            return Ok(UserOutcome::invalid("token", "token expired"));
        };

        let Some(mut user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(UserOutcome::invalid("user", "user no longer exists"));
        };

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        if !self
            .user_repo
            .update_password(user.id, &password_hash)
            .await?
        {
            return Ok(UserOutcome::invalid("user", "user no longer exists"));
        }
        user.password_hash = password_hash;

        // Revoked before responding so the token cannot be replayed
        self.token_repo.revoke(&input.token).await?;

        self.sessions.bind(ctx, user.id).await?;

        tracing::info!(user_id = %user.id, "Password changed through reset token");

        Ok(UserOutcome::Success(user))
    }
}
