//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{PostId, UserId};

use crate::domain::entities::{FeedPost, NewPost, Post, VoteApplied};
use crate::domain::value_objects::VoteValue;
use crate::error::PostResult;

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create(&self, post: NewPost) -> PostResult<Post>;

    async fn find_by_id(&self, post_id: PostId) -> PostResult<Option<Post>>;

    /// Up to `fetch` posts with their authors, newest first (`created_at`
    /// then `id`), strictly older than `before` when given
    async fn feed(
        &self,
        fetch: i64,
        before: Option<DateTime<Utc>>,
    ) -> PostResult<Vec<FeedPost>>;

    /// Write the title and return the stored post, `None` if absent
    async fn update_title(&self, post_id: PostId, title: &str) -> PostResult<Option<Post>>;

    /// `true` if a row was removed
    async fn delete(&self, post_id: PostId) -> PostResult<bool>;

    /// Delete and return the post as it was
    async fn delete_returning(&self, post_id: PostId) -> PostResult<Option<Post>>;
}

/// Vote repository trait
#[trait_variant::make(VoteRepository: Send)]
pub trait LocalVoteRepository {
    /// Record `value` as `user_id`'s vote on `post_id` and move the post's
    /// points by `services::vote_delta`, all or nothing.
    ///
    /// `PostError::PostNotFound` when the post does not exist.
    async fn apply_vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        value: VoteValue,
    ) -> PostResult<VoteApplied>;
}
