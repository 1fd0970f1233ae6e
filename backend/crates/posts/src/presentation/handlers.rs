//! HTTP Handlers
//!
//! `AuthStatus` is put into the request extensions by
//! `auth::check_auth_session`, layered on in the router.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use auth::AuthStatus;
use kernel::id::PostId;
use std::sync::Arc;

use crate::application::config::PostsConfig;
use crate::application::{
    CreatePostInput, CreatePostUseCase, DeletePostUseCase, FeedQuery, GetFeedUseCase,
    GetPostUseCase, UpdatePostUseCase, VoteUseCase,
};
use crate::domain::repository::{PostRepository, VoteRepository};
use crate::error::PostResult;
use crate::presentation::dto::{
    CreatePostRequest, FeedParams, FeedResponse, PostDto, PostResponse, UpdatePostRequest,
    VoteRequest,
};

/// Shared state for posts handlers
pub struct PostsAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<PostsConfig>,
}

impl<R> Clone for PostsAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Bounds every posts handler shares
pub trait PostsBackend: PostRepository + VoteRepository + Send + Sync + 'static {}

impl<R> PostsBackend for R where R: PostRepository + VoteRepository + Send + Sync + 'static {}

/// GET /api/posts?limit=&cursor=
pub async fn feed<R: PostsBackend>(
    State(state): State<PostsAppState<R>>,
    Query(params): Query<FeedParams>,
) -> PostResult<Json<FeedResponse>> {
    let use_case = GetFeedUseCase::new(state.repo.clone(), state.config.clone());

    let page = use_case
        .execute(FeedQuery {
            limit: params.limit,
            cursor: params.cursor,
        })
        .await?;

    Ok(Json(FeedResponse::new(page, state.config.snippet_chars)))
}

/// POST /api/posts
pub async fn create_post<R: PostsBackend>(
    State(state): State<PostsAppState<R>>,
    Extension(auth): Extension<AuthStatus>,
    Json(req): Json<CreatePostRequest>,
) -> PostResult<Json<PostResponse>> {
    let use_case = CreatePostUseCase::new(state.repo.clone());

    let input = CreatePostInput {
        title: req.title,
        text: req.text,
    };

    let outcome = use_case.execute(auth, input).await?;

    Ok(Json(PostResponse::from(outcome)))
}

/// GET /api/posts/{id}
pub async fn get_post<R: PostsBackend>(
    State(state): State<PostsAppState<R>>,
    Path(post_id): Path<PostId>,
) -> PostResult<Json<Option<PostDto>>> {
    let post = GetPostUseCase::new(state.repo.clone())
        .execute(post_id)
        .await?;

    Ok(Json(post.as_ref().map(PostDto::from)))
}

/// PATCH /api/posts/{id}
pub async fn update_post<R: PostsBackend>(
    State(state): State<PostsAppState<R>>,
    Path(post_id): Path<PostId>,
    Json(req): Json<UpdatePostRequest>,
) -> PostResult<Json<Option<PostDto>>> {
    let post = UpdatePostUseCase::new(state.repo.clone())
        .execute(post_id, req.title)
        .await?;

    Ok(Json(post.as_ref().map(PostDto::from)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post<R: PostsBackend>(
    State(state): State<PostsAppState<R>>,
    Path(post_id): Path<PostId>,
) -> PostResult<Json<bool>> {
    let deleted = DeletePostUseCase::new(state.repo.clone())
        .execute(post_id)
        .await?;

    Ok(Json(deleted))
}

/// POST /api/posts/{id}/delete
pub async fn delete_and_get_post<R: PostsBackend>(
    State(state): State<PostsAppState<R>>,
    Path(post_id): Path<PostId>,
) -> PostResult<Json<Option<PostDto>>> {
    let post = DeletePostUseCase::new(state.repo.clone())
        .execute_and_return(post_id)
        .await?;

    Ok(Json(post.as_ref().map(PostDto::from)))
}

/// POST /api/posts/{id}/vote
pub async fn vote<R: PostsBackend>(
    State(state): State<PostsAppState<R>>,
    Extension(auth): Extension<AuthStatus>,
    Path(post_id): Path<PostId>,
    Json(req): Json<VoteRequest>,
) -> PostResult<Json<bool>> {
    let voted = VoteUseCase::new(state.repo.clone())
        .execute(auth, post_id, req.value)
        .await?;

    Ok(Json(voted))
}
