//! Unit tests for Posts crate
//! Use cases and the router run against an in-memory repository.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};
    use kernel::id::{PostId, UserId};

    use crate::domain::entities::{Author, FeedPost, NewPost, Post, VoteApplied};
    use crate::domain::repository::{PostRepository, VoteRepository};
    use crate::domain::services::vote_delta;
    use crate::domain::value_objects::VoteValue;
    use crate::error::{PostError, PostResult};

    #[derive(Default)]
    struct State {
        next_id: i64,
        posts: Vec<Post>,
        votes: HashMap<(UserId, PostId), VoteValue>,
    }

    #[derive(Default)]
    pub struct MemoryPostsRepo {
        state: Mutex<State>,
    }

    impl MemoryPostsRepo {
        /// Insert a post with a chosen creation time
        pub fn seed(&self, title: &str, author_id: UserId, created_at: DateTime<Utc>) -> Post {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let post = NewPost {
                title: title.to_string(),
                text: format!("{title} body"),
                author_id,
                created_at,
            }
            .into_post(PostId::new(state.next_id));
            state.posts.push(post.clone());
            post
        }

        pub fn points(&self, post_id: PostId) -> i32 {
            let state = self.state.lock().unwrap();
            state
                .posts
                .iter()
                .find(|p| p.id == post_id)
                .map(|p| p.points)
                .unwrap()
        }

        pub fn vote_rows(&self, post_id: PostId) -> usize {
            let state = self.state.lock().unwrap();
            state.votes.keys().filter(|(_, p)| *p == post_id).count()
        }

        pub fn vote_of(&self, user_id: UserId, post_id: PostId) -> Option<VoteValue> {
            let state = self.state.lock().unwrap();
            state.votes.get(&(user_id, post_id)).copied()
        }
    }

    fn author_of(post: &Post) -> Author {
        Author {
            id: post.author_id,
            username: format!("user{}", post.author_id),
            email: format!("user{}@example.com", post.author_id),
            created_at: post.created_at,
            updated_at: post.created_at,
        }
    }

    impl PostRepository for MemoryPostsRepo {
        async fn create(&self, post: NewPost) -> PostResult<Post> {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let post = post.into_post(PostId::new(state.next_id));
            state.posts.push(post.clone());
            Ok(post)
        }

        async fn find_by_id(&self, post_id: PostId) -> PostResult<Option<Post>> {
            let state = self.state.lock().unwrap();
            Ok(state.posts.iter().find(|p| p.id == post_id).cloned())
        }

        async fn feed(
            &self,
            fetch: i64,
            before: Option<DateTime<Utc>>,
        ) -> PostResult<Vec<FeedPost>> {
            let state = self.state.lock().unwrap();
            let mut posts: Vec<&Post> = state
                .posts
                .iter()
                .filter(|p| before.is_none_or(|before| p.created_at < before))
                .collect();
            posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

            Ok(posts
                .into_iter()
                .take(fetch as usize)
                .map(|p| FeedPost {
                    post: p.clone(),
                    author: author_of(p),
                })
                .collect())
        }

        async fn update_title(&self, post_id: PostId, title: &str) -> PostResult<Option<Post>> {
            let mut state = self.state.lock().unwrap();
            Ok(state
                .posts
                .iter_mut()
                .find(|p| p.id == post_id)
                .map(|p| {
                    p.title = title.to_string();
                    p.updated_at = Utc::now();
                    p.clone()
                }))
        }

        async fn delete(&self, post_id: PostId) -> PostResult<bool> {
            Ok(self.delete_returning(post_id).await?.is_some())
        }

        async fn delete_returning(&self, post_id: PostId) -> PostResult<Option<Post>> {
            let mut state = self.state.lock().unwrap();
            let index = state.posts.iter().position(|p| p.id == post_id);
            state.votes.retain(|(_, p), _| *p != post_id);
            Ok(index.map(|i| state.posts.remove(i)))
        }
    }

    impl VoteRepository for MemoryPostsRepo {
        async fn apply_vote(
            &self,
            post_id: PostId,
            user_id: UserId,
            value: VoteValue,
        ) -> PostResult<VoteApplied> {
            let mut state = self.state.lock().unwrap();
            let state = &mut *state;

            let post = state
                .posts
                .iter_mut()
                .find(|p| p.id == post_id)
                .ok_or(PostError::PostNotFound)?;

            let prior = state.votes.insert((user_id, post_id), value);
            let delta = vote_delta(prior, value);
            post.points += delta;

            Ok(VoteApplied {
                delta,
                points: post.points,
            })
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use auth::AuthStatus;
    use chrono::{Duration, TimeZone, Utc};
    use kernel::id::{PostId, UserId};

    use super::support::MemoryPostsRepo;
    use crate::application::*;
    use crate::domain::value_objects::{Cursor, VoteValue};
    use crate::error::PostError;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    fn logged_in(user_id: UserId) -> AuthStatus {
        AuthStatus::User(user_id)
    }

    fn repo_with_post() -> (Arc<MemoryPostsRepo>, PostId) {
        let repo = Arc::new(MemoryPostsRepo::default());
        let post = repo.seed("hello world", ALICE, Utc::now());
        (repo, post.id)
    }

    fn seed_many(repo: &MemoryPostsRepo, count: i64) -> Vec<PostId> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                repo.seed(&format!("post {i}"), ALICE, start + Duration::seconds(i))
                    .id
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // vote
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_vote_requires_session() {
        let (repo, post_id) = repo_with_post();
        let use_case = VoteUseCase::new(repo.clone());

        let result = use_case.execute(AuthStatus::default(), post_id, 1).await;

        assert!(matches!(result, Err(PostError::NotAuthenticated)));
        assert_eq!(repo.points(post_id), 0);
    }

    #[tokio::test]
    async fn test_vote_with_unreadable_session_is_not_a_401() {
        let (repo, post_id) = repo_with_post();
        let use_case = VoteUseCase::new(repo.clone());

        let result = use_case.execute(AuthStatus::Unavailable, post_id, 1).await;

        assert!(matches!(result, Err(PostError::SessionUnavailable)));
        assert_eq!(repo.points(post_id), 0);
    }

    #[tokio::test]
    async fn test_repeated_vote_is_noop() {
        let (repo, post_id) = repo_with_post();
        let use_case = VoteUseCase::new(repo.clone());

        assert!(use_case.execute(logged_in(BOB), post_id, 1).await.unwrap());
        assert_eq!(repo.points(post_id), 1);

        assert!(use_case.execute(logged_in(BOB), post_id, 1).await.unwrap());
        assert_eq!(repo.points(post_id), 1);
        assert_eq!(repo.vote_rows(post_id), 1);
    }

    #[tokio::test]
    async fn test_switching_vote_moves_by_two() {
        let (repo, post_id) = repo_with_post();
        let use_case = VoteUseCase::new(repo.clone());
        let before = repo.points(post_id);

        use_case.execute(logged_in(BOB), post_id, 1).await.unwrap();
        let after_up = repo.points(post_id);
        assert_eq!(after_up - before, 1);

        use_case.execute(logged_in(BOB), post_id, -1).await.unwrap();
        assert_eq!(repo.points(post_id) - after_up, -2);
        assert_eq!(repo.vote_rows(post_id), 1);
        assert_eq!(repo.vote_of(BOB, post_id), Some(VoteValue::Down));

        use_case.execute(logged_in(BOB), post_id, 1).await.unwrap();
        assert_eq!(repo.points(post_id), after_up);
    }

    #[tokio::test]
    async fn test_votes_from_different_users_add_up() {
        let (repo, post_id) = repo_with_post();
        let use_case = VoteUseCase::new(repo.clone());

        use_case.execute(logged_in(ALICE), post_id, 1).await.unwrap();
        use_case.execute(logged_in(BOB), post_id, 1).await.unwrap();

        assert_eq!(repo.points(post_id), 2);
        assert_eq!(repo.vote_rows(post_id), 2);
    }

    #[tokio::test]
    async fn test_any_value_but_minus_one_is_upvote() {
        let (repo, post_id) = repo_with_post();
        let use_case = VoteUseCase::new(repo.clone());

        use_case.execute(logged_in(BOB), post_id, 42).await.unwrap();
        assert_eq!(repo.points(post_id), 1);

        use_case.execute(logged_in(BOB), post_id, 0).await.unwrap();
        assert_eq!(repo.points(post_id), 1);
    }

    #[tokio::test]
    async fn test_vote_on_missing_post() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let use_case = VoteUseCase::new(repo);

        let result = use_case.execute(logged_in(BOB), PostId::new(99), 1).await;
        assert!(matches!(result, Err(PostError::PostNotFound)));
    }

    // ------------------------------------------------------------------
    // feed
    // ------------------------------------------------------------------

    fn feed_use_case(repo: Arc<MemoryPostsRepo>) -> GetFeedUseCase<MemoryPostsRepo> {
        GetFeedUseCase::new(repo, Arc::new(PostsConfig::default()))
    }

    #[tokio::test]
    async fn test_feed_pages_through_51_posts() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let ids = seed_many(&repo, 51);
        let use_case = feed_use_case(repo);

        let first = use_case
            .execute(FeedQuery {
                limit: Some(50),
                cursor: None,
            })
            .await
            .unwrap();

        assert_eq!(first.posts.len(), 50);
        assert!(first.has_more);
        assert_eq!(first.posts[0].post.id, ids[50]);

        let cursor = first.next_cursor().unwrap();
        assert_eq!(cursor.created_at(), first.posts[49].post.created_at);

        let second = use_case
            .execute(FeedQuery {
                limit: Some(50),
                cursor: Some(cursor.encode()),
            })
            .await
            .unwrap();

        assert_eq!(second.posts.len(), 1);
        assert!(!second.has_more);
        assert_eq!(second.posts[0].post.id, ids[0]);
    }

    #[tokio::test]
    async fn test_feed_is_newest_first_with_authors() {
        let repo = Arc::new(MemoryPostsRepo::default());
        seed_many(&repo, 5);

        let page = feed_use_case(repo).execute(FeedQuery::default()).await.unwrap();

        assert_eq!(page.posts.len(), 5);
        assert!(!page.has_more);
        assert!(
            page.posts
                .windows(2)
                .all(|w| w[0].post.created_at > w[1].post.created_at)
        );
        assert!(page.posts.iter().all(|p| p.author.id == ALICE));
    }

    #[tokio::test]
    async fn test_feed_limit_is_clamped() {
        let repo = Arc::new(MemoryPostsRepo::default());
        seed_many(&repo, 60);
        let use_case = feed_use_case(repo);

        let page = use_case
            .execute(FeedQuery {
                limit: Some(1_000),
                cursor: None,
            })
            .await
            .unwrap();
        assert_eq!(page.posts.len(), 50);
        assert!(page.has_more);

        let page = use_case
            .execute(FeedQuery {
                limit: Some(0),
                cursor: None,
            })
            .await
            .unwrap();
        assert_eq!(page.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_feed_order_ignores_votes() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let ids = seed_many(&repo, 3);
        VoteUseCase::new(repo.clone())
            .execute(logged_in(BOB), ids[0], 1)
            .await
            .unwrap();

        let page = feed_use_case(repo).execute(FeedQuery::default()).await.unwrap();
        let order: Vec<PostId> = page.posts.iter().map(|p| p.post.id).collect();
        assert_eq!(order, vec![ids[2], ids[1], ids[0]]);
    }

    #[tokio::test]
    async fn test_feed_empty_page_has_no_cursor() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let page = feed_use_case(repo).execute(FeedQuery::default()).await.unwrap();

        assert!(page.posts.is_empty());
        assert!(!page.has_more);
        assert!(page.next_cursor().is_none());
    }

    #[tokio::test]
    async fn test_feed_rejects_foreign_cursor() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let result = feed_use_case(repo)
            .execute(FeedQuery {
                limit: None,
                cursor: Some("not a cursor".into()),
            })
            .await;

        assert!(matches!(result, Err(PostError::InvalidCursor)));
    }

    #[tokio::test]
    async fn test_feed_cursor_excludes_equal_timestamp() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let ids = seed_many(&repo, 3);

        // ids[1] was created at exactly this instant
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        let page = feed_use_case(repo)
            .execute(FeedQuery {
                limit: None,
                cursor: Some(Cursor::new(start).encode()),
            })
            .await
            .unwrap();

        let order: Vec<PostId> = page.posts.iter().map(|p| p.post.id).collect();
        assert_eq!(order, vec![ids[0]]);
    }

    // ------------------------------------------------------------------
    // post CRUD
    // ------------------------------------------------------------------

    fn input(title: &str, text: &str) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_post() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let use_case = CreatePostUseCase::new(repo.clone());

        let outcome = use_case
            .execute(logged_in(ALICE), input("First post", "Some text"))
            .await
            .unwrap();

        let PostOutcome::Success(post) = outcome else {
            panic!("expected a created post");
        };
        assert_eq!(post.author_id, ALICE);
        assert_eq!(post.points, 0);

        let stored = GetPostUseCase::new(repo).execute(post.id).await.unwrap();
        assert_eq!(stored, Some(post));
    }

    #[tokio::test]
    async fn test_create_post_requires_session() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let result = CreatePostUseCase::new(repo)
            .execute(AuthStatus::default(), input("First post", "Some text"))
            .await;

        assert!(matches!(result, Err(PostError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_create_post_field_errors() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let use_case = CreatePostUseCase::new(repo.clone());

        let outcome = use_case
            .execute(logged_in(ALICE), input("abc", "x"))
            .await
            .unwrap();
        let PostOutcome::Invalid(error) = outcome else {
            panic!("expected a field error");
        };
        assert_eq!(error.field(), "title");

        let outcome = use_case
            .execute(logged_in(ALICE), input("abcd", "xyz"))
            .await
            .unwrap();
        let PostOutcome::Invalid(error) = outcome else {
            panic!("expected a field error");
        };
        assert_eq!(error.field(), "text");

        let page = feed_use_case(repo).execute(FeedQuery::default()).await.unwrap();
        assert!(page.posts.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let post = GetPostUseCase::new(repo).execute(PostId::new(5)).await.unwrap();
        assert!(post.is_none());
    }

    #[tokio::test]
    async fn test_update_title_absent_vs_empty() {
        let (repo, post_id) = repo_with_post();
        let use_case = UpdatePostUseCase::new(repo.clone());

        let untouched = use_case.execute(post_id, None).await.unwrap().unwrap();
        assert_eq!(untouched.title, "hello world");

        let emptied = use_case
            .execute(post_id, Some(String::new()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(emptied.title, "");

        let renamed = use_case
            .execute(post_id, Some("renamed".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "renamed");
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let repo = Arc::new(MemoryPostsRepo::default());
        let use_case = UpdatePostUseCase::new(repo);

        assert!(
            use_case
                .execute(PostId::new(3), Some("title".into()))
                .await
                .unwrap()
                .is_none()
        );
        assert!(use_case.execute(PostId::new(3), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (repo, post_id) = repo_with_post();
        let use_case = DeletePostUseCase::new(repo.clone());

        assert!(use_case.execute(post_id).await.unwrap());
        assert!(use_case.execute(post_id).await.unwrap());
        assert!(
            GetPostUseCase::new(repo)
                .execute(post_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_and_get_returns_snapshot_once() {
        let (repo, post_id) = repo_with_post();
        VoteUseCase::new(repo.clone())
            .execute(logged_in(BOB), post_id, 1)
            .await
            .unwrap();
        let use_case = DeletePostUseCase::new(repo.clone());

        let deleted = use_case.execute_and_return(post_id).await.unwrap().unwrap();
        assert_eq!(deleted.id, post_id);
        assert_eq!(deleted.points, 1);
        assert_eq!(repo.vote_rows(post_id), 0);

        assert!(use_case.execute_and_return(post_id).await.unwrap().is_none());
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use auth::application::session::session_token;
    use auth::domain::entity::auth_session::AuthSession;
    use auth::domain::repository::AuthSessionRepository;
    use auth::{AuthConfig, AuthMiddlewareState, AuthResult};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use kernel::id::UserId;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::support::MemoryPostsRepo;
    use crate::application::config::PostsConfig;
    use crate::presentation::router::posts_router_generic;

    /// Knows exactly one session
    struct OneSession(AuthSession);

    impl AuthSessionRepository for OneSession {
        async fn create(&self, _session: &AuthSession) -> AuthResult<()> {
            Ok(())
        }

        async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
            Ok((session_id == self.0.session_id).then(|| self.0.clone()))
        }

        async fn delete(&self, _session_id: Uuid) -> AuthResult<()> {
            Ok(())
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            Ok(0)
        }
    }

    /// Session store that cannot be reached
    struct DownSessions;

    impl AuthSessionRepository for DownSessions {
        async fn create(&self, _session: &AuthSession) -> AuthResult<()> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn find_by_id(&self, _session_id: Uuid) -> AuthResult<Option<AuthSession>> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn delete(&self, _session_id: Uuid) -> AuthResult<()> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            Err(sqlx::Error::PoolTimedOut.into())
        }
    }

    struct Fixture {
        app: Router,
        repo_handle: Arc<MemoryPostsRepo>,
        cookie: String,
    }

    fn fixture() -> Fixture {
        let config = AuthConfig::development();
        let session = AuthSession::new(UserId::new(7), chrono::Duration::hours(1));
        let cookie = format!(
            "{}={}",
            config.session_cookie_name,
            session_token(&config.session_secret, session.session_id)
        );
        let auth = AuthMiddlewareState::new(Arc::new(OneSession(session)), Arc::new(config));

        // The router owns its repository; seed through a second handle
        let repo = SharedRepo::default();
        let repo_handle = repo.0.clone();
        repo_handle.seed("hello world", UserId::new(1), Utc::now());

        Fixture {
            app: posts_router_generic(repo, auth, PostsConfig::default()),
            repo_handle,
            cookie,
        }
    }

    /// Repository handle sharing state with the test
    #[derive(Default)]
    struct SharedRepo(Arc<MemoryPostsRepo>);

    mod shared_impls {
        use chrono::{DateTime, Utc};
        use kernel::id::{PostId, UserId};

        use super::SharedRepo;
        use crate::domain::entities::{FeedPost, NewPost, Post, VoteApplied};
        use crate::domain::repository::{PostRepository, VoteRepository};
        use crate::domain::value_objects::VoteValue;
        use crate::error::PostResult;

        impl PostRepository for SharedRepo {
            async fn create(&self, post: NewPost) -> PostResult<Post> {
                PostRepository::create(&*self.0, post).await
            }

            async fn find_by_id(&self, post_id: PostId) -> PostResult<Option<Post>> {
                self.0.find_by_id(post_id).await
            }

            async fn feed(
                &self,
                fetch: i64,
                before: Option<DateTime<Utc>>,
            ) -> PostResult<Vec<FeedPost>> {
                self.0.feed(fetch, before).await
            }

            async fn update_title(&self, post_id: PostId, title: &str) -> PostResult<Option<Post>> {
                self.0.update_title(post_id, title).await
            }

            async fn delete(&self, post_id: PostId) -> PostResult<bool> {
                self.0.delete(post_id).await
            }

            async fn delete_returning(&self, post_id: PostId) -> PostResult<Option<Post>> {
                self.0.delete_returning(post_id).await
            }
        }

        impl VoteRepository for SharedRepo {
            async fn apply_vote(
                &self,
                post_id: PostId,
                user_id: UserId,
                value: VoteValue,
            ) -> PostResult<VoteApplied> {
                self.0.apply_vote(post_id, user_id, value).await
            }
        }
    }

    fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_vote_without_cookie_is_401() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_request("POST", "/1/vote", None, r#"{"value":1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_vote_with_session() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_request(
                "POST",
                "/1/vote",
                Some(&f.cookie),
                r#"{"value":-1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, Value::Bool(true));
        assert_eq!(f.repo_handle.points(kernel::id::PostId::new(1)), -1);
    }

    #[tokio::test]
    async fn test_vote_unknown_post_is_404() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_request(
                "POST",
                "/99/vote",
                Some(&f.cookie),
                r#"{"value":1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_feed_response_shape() {
        let f = fixture();
        let response = f
            .app
            .oneshot(Request::get("/?limit=5").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["hasMore"], false);
        assert!(body["nextCursor"].is_string());

        let post = &body["posts"][0];
        assert_eq!(post["title"], "hello world");
        assert_eq!(post["textSnippet"], "hello world body...");
        assert_eq!(post["points"], 0);
        assert_eq!(post["author"]["id"], 1);
        assert!(post["author"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_feed_bad_cursor_is_400() {
        let f = fixture();
        let response = f
            .app
            .oneshot(Request::get("/?cursor=%21%21").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_post_field_error_is_200() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_request(
                "POST",
                "/",
                Some(&f.cookie),
                r#"{"title":"abc","text":"long enough"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["error"]["field"], "title");
        assert!(body.get("post").is_none());
    }

    #[tokio::test]
    async fn test_create_post_as_session_user() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_request(
                "POST",
                "/",
                Some(&f.cookie),
                r#"{"title":"Second","text":"long enough"}"#,
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["post"]["authorId"], 7);
        assert_eq!(body["post"]["points"], 0);
    }

    #[tokio::test]
    async fn test_patch_without_title_keeps_post() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_request("PATCH", "/1", None, "{}"))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["title"], "hello world");
    }

    #[tokio::test]
    async fn test_get_missing_post_is_null() {
        let f = fixture();
        let response = f
            .app
            .oneshot(Request::get("/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, Value::Null);
    }

    fn app_with_sessions_down() -> (Router, String) {
        let config = AuthConfig::development();
        let cookie = format!(
            "{}={}",
            config.session_cookie_name,
            session_token(&config.session_secret, Uuid::new_v4())
        );
        let auth = AuthMiddlewareState::new(Arc::new(DownSessions), Arc::new(config));

        let repo = SharedRepo::default();
        repo.0.seed("hello world", UserId::new(1), Utc::now());

        (posts_router_generic(repo, auth, PostsConfig::default()), cookie)
    }

    #[tokio::test]
    async fn test_vote_with_session_store_down_is_503() {
        let (app, cookie) = app_with_sessions_down();
        let response = app
            .oneshot(json_request("POST", "/1/vote", Some(&cookie), r#"{"value":1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], 503);
    }

    #[tokio::test]
    async fn test_feed_served_with_session_store_down() {
        let (app, cookie) = app_with_sessions_down();
        let mut request = Request::get("/").body(Body::empty()).unwrap();
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["posts"].as_array().unwrap().len(), 1);
    }
}

/// Runs against a fresh PostgreSQL database per test, migrated from
/// `database/migrations`. Needs `DATABASE_URL`; run with `--ignored`.
#[cfg(test)]
mod postgres_tests {
    use std::sync::Arc;

    use auth::AuthStatus;
    use kernel::id::{PostId, UserId};
    use sqlx::PgPool;

    use crate::application::*;
    use crate::domain::repository::VoteRepository;
    use crate::domain::value_objects::VoteValue;
    use crate::error::PostError;
    use crate::infra::postgres::PgPostsRepository;

    async fn insert_user(pool: &PgPool, name: &str) -> UserId {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
        )
        .bind(name)
        .bind(format!("{name}@example.com"))
        .fetch_one(pool)
        .await
        .unwrap();
        UserId::new(id)
    }

    /// `count` posts one second apart, oldest first
    async fn insert_posts(pool: &PgPool, author: UserId, count: i32) -> Vec<PostId> {
        let mut ids = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (title, text, author_id, created_at, updated_at)
            SELECT 'post ' || i, 'body of post ' || i, $1,
                   timestamptz '2024-01-01 00:00:00+00' + i * interval '1 second', now()
            FROM generate_series(1, $2) AS i
            RETURNING id
            "#,
        )
        .bind(author.get())
        .bind(count)
        .fetch_all(pool)
        .await
        .unwrap();
        ids.sort();
        ids.into_iter().map(PostId::new).collect()
    }

    async fn points(pool: &PgPool, post_id: PostId) -> i32 {
        sqlx::query_scalar("SELECT points FROM posts WHERE id = $1")
            .bind(post_id.get())
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn vote_rows(pool: &PgPool, post_id: PostId) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE post_id = $1")
            .bind(post_id.get())
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_pg_repeated_vote_is_noop(pool: PgPool) {
        let alice = insert_user(&pool, "alice").await;
        let post_id = insert_posts(&pool, alice, 1).await[0];
        let use_case = VoteUseCase::new(Arc::new(PgPostsRepository::new(pool.clone())));

        assert!(use_case.execute(AuthStatus::User(alice), post_id, 1).await.unwrap());
        assert!(use_case.execute(AuthStatus::User(alice), post_id, 1).await.unwrap());

        assert_eq!(points(&pool, post_id).await, 1);
        assert_eq!(vote_rows(&pool, post_id).await, 1);
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_pg_switching_vote_updates_row_in_place(pool: PgPool) {
        let alice = insert_user(&pool, "alice").await;
        let post_id = insert_posts(&pool, alice, 1).await[0];
        let repo = PgPostsRepository::new(pool.clone());

        let up = repo.apply_vote(post_id, alice, VoteValue::Up).await.unwrap();
        assert_eq!((up.delta, up.points), (1, 1));

        let down = repo.apply_vote(post_id, alice, VoteValue::Down).await.unwrap();
        assert_eq!((down.delta, down.points), (-2, -1));

        assert_eq!(points(&pool, post_id).await, -1);
        assert_eq!(vote_rows(&pool, post_id).await, 1);
        let stored: i16 = sqlx::query_scalar("SELECT value FROM votes WHERE post_id = $1")
            .bind(post_id.get())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, -1);
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_pg_concurrent_votes_all_count(pool: PgPool) {
        let author = insert_user(&pool, "author").await;
        let post_id = insert_posts(&pool, author, 1).await[0];
        let repo = Arc::new(PgPostsRepository::new(pool.clone()));

        let mut voters = Vec::new();
        for i in 0..12 {
            voters.push(insert_user(&pool, &format!("voter{i}")).await);
        }

        let tasks: Vec<_> = voters
            .into_iter()
            .map(|voter| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.apply_vote(post_id, voter, VoteValue::Up).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(points(&pool, post_id).await, 12);
        assert_eq!(vote_rows(&pool, post_id).await, 12);
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_pg_vote_on_missing_post(pool: PgPool) {
        let alice = insert_user(&pool, "alice").await;
        let repo = PgPostsRepository::new(pool.clone());

        let result = repo.apply_vote(PostId::new(999), alice, VoteValue::Up).await;

        assert!(matches!(result, Err(PostError::PostNotFound)));
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_pg_feed_pages_51_posts_as_50_and_1(pool: PgPool) {
        let alice = insert_user(&pool, "alice").await;
        let ids = insert_posts(&pool, alice, 51).await;
        let feed = GetFeedUseCase::new(
            Arc::new(PgPostsRepository::new(pool.clone())),
            Arc::new(PostsConfig::default()),
        );

        let first = feed
            .execute(FeedQuery {
                limit: Some(50),
                cursor: None,
            })
            .await
            .unwrap();
        assert_eq!(first.posts.len(), 50);
        assert!(first.has_more);
        assert_eq!(first.posts[0].post.id, ids[50]);
        assert_eq!(first.posts[0].author.username, "alice");

        let second = feed
            .execute(FeedQuery {
                limit: Some(50),
                cursor: first.next_cursor().map(|c| c.encode()),
            })
            .await
            .unwrap();
        assert_eq!(second.posts.len(), 1);
        assert!(!second.has_more);
        assert_eq!(second.posts[0].post.id, ids[0]);
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_pg_delete_cascades_votes(pool: PgPool) {
        let alice = insert_user(&pool, "alice").await;
        let post_id = insert_posts(&pool, alice, 1).await[0];
        let repo = Arc::new(PgPostsRepository::new(pool.clone()));
        repo.apply_vote(post_id, alice, VoteValue::Up).await.unwrap();

        let snapshot = DeletePostUseCase::new(repo.clone())
            .execute_and_return(post_id)
            .await
            .unwrap();

        assert_eq!(snapshot.map(|p| p.points), Some(1));
        assert_eq!(vote_rows(&pool, post_id).await, 0);
        assert!(DeletePostUseCase::new(repo).execute(post_id).await.unwrap());
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(PostError, StatusCode)> = vec![
            (PostError::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (PostError::PostNotFound, StatusCode::NOT_FOUND),
            (PostError::InvalidCursor, StatusCode::BAD_REQUEST),
            (
                PostError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PostError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PostError::SessionUnavailable,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_unauthenticated_carries_action() {
        let app_error = PostError::NotAuthenticated.to_app_error();
        assert_eq!(app_error.status_code(), 401);
        assert!(app_error.action().is_some());
    }
}
