//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Transport-level error type (`AppError`) and its classification
//! - Field-level validation errors returned inside response payloads
//! - Typed integer identifiers for users and posts
//!
//! Nothing here knows about a specific domain; domain crates build on it.

pub mod error {
    pub mod app_error;
    pub mod field;
    pub mod kind;
}
pub mod id;
