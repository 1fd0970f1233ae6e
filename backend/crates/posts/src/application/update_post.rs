//! Update Post Use Case
//!
//! Only the title can change. An omitted title leaves the post untouched;
//! an empty one is written as given.

use std::sync::Arc;

use kernel::id::PostId;

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::error::PostResult;

pub struct UpdatePostUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
}

impl<P> UpdatePostUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }

    /// The post as stored afterwards, `None` if it does not exist
    pub async fn execute(
        &self,
        post_id: PostId,
        title: Option<String>,
    ) -> PostResult<Option<Post>> {
        let Some(title) = title else {
            return self.post_repo.find_by_id(post_id).await;
        };

        let post = self.post_repo.update_title(post_id, &title).await?;
        if post.is_some() {
            tracing::info!(post_id = %post_id, "Post title updated");
        }

        Ok(post)
    }
}
