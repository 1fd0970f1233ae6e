//! User Name Value Object
//!
//! Public handle used for login and display. Stored exactly as entered and
//! compared case-sensitively.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Shortest accepted user name, in characters
pub const USER_NAME_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserNameError {
    TooShort { length: usize },
}

impl UserNameError {
    /// Message shown next to the `username` field
    pub fn message(&self) -> &'static str {
        match self {
            UserNameError::TooShort { .. } => "Length should be greater than 2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(input: impl Into<String>) -> Result<Self, UserNameError> {
        let value = input.into();
        let length = value.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort { length });
        }
        Ok(Self(value))
    }

    /// Rebuild from a stored row without re-validating
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
