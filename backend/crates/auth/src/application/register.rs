//! Register Use Case
//!
//! Creates a new user account and logs it in.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::outcome::UserOutcome;
use crate::application::session::{SessionContext, SessionManager};
use crate::domain::entity::user::NewUser;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    sessions: SessionManager<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> RegisterUseCase<U, S>
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
        input: RegisterInput,
    ) -> AuthResult<UserOutcome> {
        // First failing field wins
        let username = match UserName::new(input.username) {
            Ok(name) => name,
            Err(e) => return Ok(UserOutcome::invalid("username", e.message())),
        };
        let email = match Email::new(input.email) {
            Ok(email) => email,
            Err(e) => return Ok(UserOutcome::invalid("email", e.message())),
        };
        let raw_password = match RawPassword::new(input.password) {
            Ok(password) => password,
            Err(e) => return Ok(UserOutcome::invalid("password", e.message())),
        };

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = match self
            .user_repo
            .create(NewUser::new(username, email, password_hash))
            .await
        {
            Ok(user) => user,
            Err(AuthError::UserNameTaken) => {
                return Ok(UserOutcome::invalid("username", "username already exist"));
            }
            Err(e) => return Err(e),
        };

        self.sessions.bind(ctx, user.id).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(UserOutcome::Success(user))
    }
}
