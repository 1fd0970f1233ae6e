//! Vote Use Case
//!
//! One vote per user and post. Repeating a vote changes nothing, switching
//! moves the score by two.

use std::sync::Arc;

use auth::AuthStatus;
use kernel::id::PostId;

use crate::application::require_user;
use crate::domain::repository::VoteRepository;
use crate::domain::value_objects::VoteValue;
use crate::error::PostResult;

pub struct VoteUseCase<V>
where
    V: VoteRepository,
{
    vote_repo: Arc<V>,
}

impl<V> VoteUseCase<V>
where
    V: VoteRepository,
{
    pub fn new(vote_repo: Arc<V>) -> Self {
        Self { vote_repo }
    }

    pub async fn execute(
        &self,
        auth: AuthStatus,
        post_id: PostId,
        raw_value: i32,
    ) -> PostResult<bool> {
        let user_id = require_user(auth)?;
        let value = VoteValue::normalize(raw_value);

        let applied = self.vote_repo.apply_vote(post_id, user_id, value).await?;

        tracing::info!(
            user_id = %user_id,
            post_id = %post_id,
            delta = applied.delta,
            points = applied.points,
            "Vote applied"
        );

        Ok(true)
    }
}
