//! Get Post Use Case

use std::sync::Arc;

use kernel::id::PostId;

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::error::PostResult;

pub struct GetPostUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
}

impl<P> GetPostUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }

    pub async fn execute(&self, post_id: PostId) -> PostResult<Option<Post>> {
        self.post_repo.find_by_id(post_id).await
    }
}
