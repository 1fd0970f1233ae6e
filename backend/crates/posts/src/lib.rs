//! Posts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, vote/cursor value objects, delta policy, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Invariants
//! - At most one vote per (user, post); a repeated vote is a no-op
//! - `points` moves by `new - old` in the same transaction as the vote row
//! - The feed is ordered by creation time, never by score, so cursors
//!   stay stable under concurrent voting

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::PostsConfig;
pub use error::{PostError, PostResult};
pub use infra::postgres::PgPostsRepository;
pub use presentation::router::posts_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
