//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::field::FieldError;
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::outcome::UserOutcome;
use crate::domain::entity::user::User;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub token: String,
    pub new_password: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of a user; the password hash has no field here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.to_string(),
            email: user.email.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `errors` or `user`, never both
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
}

impl From<UserOutcome> for UserResponse {
    fn from(outcome: UserOutcome) -> Self {
        match outcome {
            UserOutcome::Success(user) => Self {
                errors: None,
                user: Some(UserDto::from(&user)),
            },
            UserOutcome::Invalid(errors) => Self {
                errors: Some(errors),
                user: None,
            },
        }
    }
}
