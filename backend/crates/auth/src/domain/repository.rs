//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use std::time::Duration;

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, user::NewUser, user::User};
use crate::domain::value_object::{user_name::UserName, user_password::UserPassword};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user. A username/email uniqueness violation is
    /// `AuthError::UserNameTaken`, nothing is written in that case.
    async fn create(&self, user: NewUser) -> AuthResult<User>;

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Replace the stored hash; `false` when the user no longer exists
    async fn update_password(&self, user_id: UserId, password: &UserPassword) -> AuthResult<bool>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Live session only; expired records read as `None`
    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Single-use password-reset tokens
#[trait_variant::make(PasswordResetTokenRepository: Send)]
pub trait LocalPasswordResetTokenRepository {
    async fn store(&self, token: &str, user_id: UserId, ttl: Duration) -> AuthResult<()>;

    /// `None` once the token expired or was revoked
    async fn find_user_id(&self, token: &str) -> AuthResult<Option<UserId>>;

    async fn revoke(&self, token: &str) -> AuthResult<()>;
}
