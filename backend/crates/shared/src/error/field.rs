//! Field Errors - the recoverable error tier
//!
//! Validation and business-rule failures are not transport errors. They are
//! returned inside a normal response body as `{field, message}` pairs and
//! the caller is expected to inspect them.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single validation failure tied to an input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl FieldError {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
