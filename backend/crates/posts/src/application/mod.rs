//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod create_post;
pub mod delete_post;
pub mod feed;
pub mod get_post;
pub mod update_post;
pub mod vote;

use auth::AuthStatus;
use kernel::id::UserId;

use crate::error::{PostError, PostResult};

// Re-exports
pub use config::PostsConfig;
pub use create_post::{CreatePostInput, CreatePostUseCase, PostOutcome};
pub use delete_post::DeletePostUseCase;
pub use feed::{FeedPage, FeedQuery, GetFeedUseCase};
pub use get_post::GetPostUseCase;
pub use update_post::UpdatePostUseCase;
pub use vote::VoteUseCase;

/// User behind an authenticated request, or the error a mutation reports
pub(crate) fn require_user(auth: AuthStatus) -> PostResult<UserId> {
    match auth {
        AuthStatus::User(user_id) => Ok(user_id),
        AuthStatus::Anonymous => Err(PostError::NotAuthenticated),
        AuthStatus::Unavailable => Err(PostError::SessionUnavailable),
    }
}
