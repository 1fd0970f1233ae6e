//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::field::FieldError;
use kernel::id::{PostId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::create_post::PostOutcome;
use crate::application::feed::FeedPage;
use crate::domain::entities::{Author, FeedPost, Post};
use crate::domain::services::text_snippet;

// ============================================================================
// Requests
// ============================================================================

/// Query for GET /api/posts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Request for POST /api/posts
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub text: String,
}

/// Request for PATCH /api/posts/{id}
///
/// A missing or `null` title leaves the post as it is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request for POST /api/posts/{id}/vote
#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub value: i32,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: PostId,
    pub title: String,
    pub text: String,
    pub points: i32,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostDto {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            text: post.text.clone(),
            points: post.points,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            username: author.username,
            email: author.email,
            created_at: author.created_at,
            updated_at: author.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPostDto {
    #[serde(flatten)]
    pub post: PostDto,
    pub text_snippet: String,
    pub author: AuthorDto,
}

impl FeedPostDto {
    pub fn new(feed_post: FeedPost, snippet_chars: usize) -> Self {
        Self {
            text_snippet: text_snippet(&feed_post.post.text, snippet_chars),
            post: PostDto::from(&feed_post.post),
            author: AuthorDto::from(feed_post.author),
        }
    }
}

/// Response for GET /api/posts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub posts: Vec<FeedPostDto>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl FeedResponse {
    pub fn new(page: FeedPage, snippet_chars: usize) -> Self {
        let next_cursor = page.next_cursor().map(|cursor| cursor.encode());
        Self {
            posts: page
                .posts
                .into_iter()
                .map(|feed_post| FeedPostDto::new(feed_post, snippet_chars))
                .collect(),
            has_more: page.has_more,
            next_cursor,
        }
    }
}

/// Response for POST /api/posts
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostDto>,
}

impl From<PostOutcome> for PostResponse {
    fn from(outcome: PostOutcome) -> Self {
        match outcome {
            PostOutcome::Success(post) => Self {
                error: None,
                post: Some(PostDto::from(&post)),
            },
            PostOutcome::Invalid(error) => Self {
                error: Some(error),
                post: None,
            },
        }
    }
}
