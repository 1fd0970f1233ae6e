//! Forgot Password Use Case
//!
//! Mails a single-use reset link. The answer is the same whether or not
//! the email belongs to an account.

use std::sync::Arc;

use platform::crypto;
use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::domain::repository::{PasswordResetTokenRepository, UserRepository};
use crate::error::AuthResult;

/// Random bytes behind each reset token
const RESET_TOKEN_BYTES: usize = 32;

pub struct ForgotPasswordUseCase<U, T, M>
where
    U: UserRepository,
    T: PasswordResetTokenRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, T, M> ForgotPasswordUseCase<U, T, M>
where
    U: UserRepository,
    T: PasswordResetTokenRepository,
    M: Mailer,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            mailer,
            config,
        }
    }

    /// Always `Ok(true)` unless a store or the mailer fails
    pub async fn execute(&self, email: &str) -> AuthResult<bool> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(true);
        };

        let token = crypto::random_token(RESET_TOKEN_BYTES);
        self.token_repo
            .store(&token, user.id, self.config.reset_token_ttl)
            .await?;

        let link = self.config.reset_link(&token);
        let html = format!("<a href=\"{}\">Reset password</a>", link);
        self.mailer
            .send(user.email.as_str(), "Reset your password", &html)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset token issued");

        Ok(true)
    }
}
