//! Use-case results that can carry field errors

use kernel::error::field::FieldError;

use crate::domain::entity::user::User;

/// Either the affected user or the validation failures that stopped the
/// operation. Failures are an expected outcome, not an `AuthError`.
#[derive(Debug)]
pub enum UserOutcome {
    Success(User),
    Invalid(Vec<FieldError>),
}

impl UserOutcome {
    pub fn invalid(field: &'static str, message: &'static str) -> Self {
        UserOutcome::Invalid(vec![FieldError::new(field, message)])
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            UserOutcome::Success(user) => Some(user),
            UserOutcome::Invalid(_) => None,
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            UserOutcome::Success(_) => &[],
            UserOutcome::Invalid(errors) => errors,
        }
    }
}
