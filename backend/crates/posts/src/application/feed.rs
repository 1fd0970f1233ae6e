//! Feed Use Case
//!
//! Reverse-chronological pages of posts. A page asks the store for one row
//! more than it returns; that row only signals `has_more`.

use std::sync::Arc;

use crate::application::config::PostsConfig;
use crate::domain::entities::FeedPost;
use crate::domain::repository::PostRepository;
use crate::domain::services::split_page;
use crate::domain::value_objects::{Cursor, PageLimit};
use crate::error::{PostError, PostResult};

#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FeedPage {
    pub posts: Vec<FeedPost>,
    pub has_more: bool,
}

impl FeedPage {
    /// Cursor continuing after the last post, `None` for an empty page
    pub fn next_cursor(&self) -> Option<Cursor> {
        self.posts
            .last()
            .map(|feed_post| Cursor::new(feed_post.post.created_at))
    }
}

pub struct GetFeedUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
    config: Arc<PostsConfig>,
}

impl<P> GetFeedUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>, config: Arc<PostsConfig>) -> Self {
        Self { post_repo, config }
    }

    pub async fn execute(&self, query: FeedQuery) -> PostResult<FeedPage> {
        let limit = PageLimit::new(
            query.limit,
            self.config.default_page_size,
            self.config.max_page_size,
        );

        let before = match query.cursor.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(Cursor::decode(raw).ok_or(PostError::InvalidCursor)?),
            None => None,
        };

        let rows = self
            .post_repo
            .feed(limit.fetch_count(), before.map(|cursor| cursor.created_at()))
            .await?;

        let (posts, has_more) = split_page(rows, limit);

        tracing::debug!(count = posts.len(), has_more, "Feed page served");

        Ok(FeedPage { posts, has_more })
    }
}
