//! User Password Value Object
//!
//! Domain wrapper over `platform::password`. `RawPassword` is user input
//! (zeroized on drop), `UserPassword` is the Argon2id hash that gets stored.

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};
use std::fmt;

/// Shortest accepted password, in characters
pub const PASSWORD_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    TooShort { length: usize },
}

impl PasswordError {
    /// Message shown next to the `password` / `newPassword` field
    pub fn message(&self) -> &'static str {
        match self {
            PasswordError::TooShort { .. } => "Length should be greater than 2",
        }
    }
}

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Accept a new password, enforcing the length rule
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PasswordError> {
        let clear_text = ClearTextPassword::new(raw);
        let length = clear_text.char_count();
        if length < PASSWORD_MIN_LENGTH {
            return Err(PasswordError::TooShort { length });
        }
        Ok(Self(clear_text))
    }

    /// Wrap a login attempt; existing passwords are checked as-is
    pub fn for_verification(raw: impl AsRef<str>) -> Self {
        Self(ClearTextPassword::new(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed user password for database storage
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash with a fresh salt; `pepper` is the application-wide secret
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> Result<Self, PasswordHashError> {
        raw.inner().hash(pepper).map(Self)
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_phc_string(phc_string).map(Self)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `pepper` must match the one used when hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
