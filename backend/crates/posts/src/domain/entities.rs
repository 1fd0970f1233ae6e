//! Domain Entities

use chrono::{DateTime, SubsecRound, Utc};
use kernel::id::{PostId, UserId};

/// Stored post. `points` is only ever changed by a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub text: String,
    pub points: i32,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post about to be inserted
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// `created_at` is truncated to the store's microsecond precision so
    /// the feed cursor derived from it matches the stored value exactly.
    pub fn new(title: String, text: String, author_id: UserId) -> Self {
        Self {
            title,
            text,
            author_id,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            text: self.text,
            points: 0,
            author_id: self.author_id,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Public identity of a post's author, read together with the post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Feed row: a post plus its author snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPost {
    pub post: Post,
    pub author: Author,
}

/// Result of applying a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteApplied {
    /// Change made to the post's points; 0 for a repeated vote
    pub delta: i32,
    /// Points after the vote
    pub points: i32,
}
