//! Delete Post Use Case
//!
//! Deleting is idempotent: a missing post is not an error. Votes on the post
//! go with it.

use std::sync::Arc;

use kernel::id::PostId;

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::error::PostResult;

pub struct DeletePostUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
}

impl<P> DeletePostUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }

    /// Always `true` unless the store fails
    pub async fn execute(&self, post_id: PostId) -> PostResult<bool> {
        if self.post_repo.delete(post_id).await? {
            tracing::info!(post_id = %post_id, "Post deleted");
        }
        Ok(true)
    }

    /// The post as it was before deletion, `None` if it never existed
    pub async fn execute_and_return(&self, post_id: PostId) -> PostResult<Option<Post>> {
        let post = self.post_repo.delete_returning(post_id).await?;
        if post.is_some() {
            tracing::info!(post_id = %post_id, "Post deleted");
        }
        Ok(post)
    }
}
