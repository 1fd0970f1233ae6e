//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{PostId, UserId};
use sqlx::PgPool;

use crate::domain::entities::{Author, FeedPost, NewPost, Post, VoteApplied};
use crate::domain::repository::{PostRepository, VoteRepository};
use crate::domain::services::vote_delta;
use crate::domain::value_objects::VoteValue;
use crate::error::{PostError, PostResult};

const POST_COLUMNS: &str = "id, title, text, points, author_id, created_at, updated_at";

/// PostgreSQL-backed posts repository
#[derive(Clone)]
pub struct PgPostsRepository {
    pool: PgPool,
}

impl PgPostsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgPostsRepository {
    async fn create(&self, post: NewPost) -> PostResult<Post> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (
                title,
                text,
                author_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $4)
            RETURNING id
            "#,
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(post.author_id.get())
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(post.into_post(PostId::new(id)))
    }

    async fn find_by_id(&self, post_id: PostId) -> PostResult<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn feed(
        &self,
        fetch: i64,
        before: Option<DateTime<Utc>>,
    ) -> PostResult<Vec<FeedPost>> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT
                p.id,
                p.title,
                p.text,
                p.points,
                p.author_id,
                p.created_at,
                p.updated_at,
                u.username AS author_username,
                u.email AS author_email,
                u.created_at AS author_created_at,
                u.updated_at AS author_updated_at
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE $2::timestamptz IS NULL OR p.created_at < $2
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1
            "#,
        )
        .bind(fetch)
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedRow::into_feed_post).collect())
    }

    async fn update_title(&self, post_id: PostId, title: &str) -> PostResult<Option<Post>> {
        let sql = format!(
            "UPDATE posts SET title = $2, updated_at = now() WHERE id = $1 RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id.get())
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn delete(&self, post_id: PostId) -> PostResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_returning(&self, post_id: PostId) -> PostResult<Option<Post>> {
        let sql = format!("DELETE FROM posts WHERE id = $1 RETURNING {POST_COLUMNS}");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostRow::into_post))
    }
}

// ============================================================================
// Vote Repository Implementation
// ============================================================================

impl VoteRepository for PgPostsRepository {
    async fn apply_vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        value: VoteValue,
    ) -> PostResult<VoteApplied> {
        // Dropping `tx` on any early return rolls back
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent votes on the same post
        let points =
            sqlx::query_scalar::<_, i32>("SELECT points FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id.get())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(PostError::PostNotFound)?;

        let prior = sqlx::query_scalar::<_, i16>(
            "SELECT value FROM votes WHERE user_id = $1 AND post_id = $2",
        )
        .bind(user_id.get())
        .bind(post_id.get())
        .fetch_optional(&mut *tx)
        .await?
        .map(|stored| VoteValue::normalize(i32::from(stored)));

        let delta = vote_delta(prior, value);
        if delta == 0 {
            tx.commit().await?;
            tracing::debug!(user_id = %user_id, post_id = %post_id, "Repeated vote ignored");
            return Ok(VoteApplied { delta, points });
        }

        sqlx::query(
            r#"
            INSERT INTO votes (user_id, post_id, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, post_id) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(user_id.get())
        .bind(post_id.get())
        .bind(value.as_i16())
        .execute(&mut *tx)
        .await?;

        let points = sqlx::query_scalar::<_, i32>(
            "UPDATE posts SET points = points + $2 WHERE id = $1 RETURNING points",
        )
        .bind(post_id.get())
        .bind(delta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(VoteApplied { delta, points })
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    points: i32,
    author_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: PostId::new(self.id),
            title: self.title,
            text: self.text,
            points: self.points,
            author_id: UserId::new(self.author_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_username: String,
    author_email: String,
    author_created_at: DateTime<Utc>,
    author_updated_at: DateTime<Utc>,
}

impl FeedRow {
    fn into_feed_post(self) -> FeedPost {
        let author = Author {
            id: UserId::new(self.post.author_id),
            username: self.author_username,
            email: self.author_email,
            created_at: self.author_created_at,
            updated_at: self.author_updated_at,
        };

        FeedPost {
            post: self.post.into_post(),
            author,
        }
    }
}
