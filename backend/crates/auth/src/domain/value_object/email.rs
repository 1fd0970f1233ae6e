//! Email Value Object
//!
//! Only the shape needed to tell an email apart from a user name is
//! checked. Ownership is proven by the password-reset mail, not here.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    TooShort,
    MissingAt,
}

impl EmailError {
    /// Message shown next to the `email` field
    pub fn message(&self) -> &'static str {
        "Invalid email"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(input: impl Into<String>) -> Result<Self, EmailError> {
        let value = input.into();
        if value.chars().count() <= 2 {
            return Err(EmailError::TooShort);
        }
        if !Self::looks_like_email(&value) {
            return Err(EmailError::MissingAt);
        }
        Ok(Self(value))
    }

    /// Rebuild from a stored row without re-validating
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Login identifiers containing `@` are treated as emails
    pub fn looks_like_email(identifier: &str) -> bool {
        identifier.contains('@')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
