//! Create Post Use Case

use std::sync::Arc;

use auth::AuthStatus;
use kernel::error::field::FieldError;

use crate::application::require_user;
use crate::domain::entities::{NewPost, Post};
use crate::domain::repository::PostRepository;
use crate::domain::services::validate_new_post;
use crate::error::PostResult;

pub struct CreatePostInput {
    pub title: String,
    pub text: String,
}

/// Created post, or the first field that failed validation
#[derive(Debug)]
pub enum PostOutcome {
    Success(Post),
    Invalid(FieldError),
}

pub struct CreatePostUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
}

impl<P> CreatePostUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }

    /// Authentication is checked before the input is looked at
    pub async fn execute(
        &self,
        auth: AuthStatus,
        input: CreatePostInput,
    ) -> PostResult<PostOutcome> {
        let author_id = require_user(auth)?;

        if let Err(field_error) = validate_new_post(&input.title, &input.text) {
            return Ok(PostOutcome::Invalid(field_error));
        }

        let post = self
            .post_repo
            .create(NewPost::new(input.title, input.text, author_id))
            .await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");

        Ok(PostOutcome::Success(post))
    }
}
