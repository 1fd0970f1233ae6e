//! User Entity

use chrono::{DateTime, SubsecRound, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};

/// Stored user. Immutable apart from the password hash and timestamps.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: UserName,
    pub email: Email,
    /// Never leaves the crate in a response DTO
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User about to be inserted; the id is assigned by the database
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: UserName,
    pub email: Email,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: UserName, email: Email, password_hash: UserPassword) -> Self {
        Self {
            username,
            email,
            password_hash,
            // timestamptz keeps microseconds
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Attach the id the store assigned
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
