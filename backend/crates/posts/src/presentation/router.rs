//! Posts Router

use auth::domain::repository::AuthSessionRepository;
use auth::{AuthMiddlewareState, check_auth_session};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::PostsConfig;
use crate::infra::postgres::PgPostsRepository;
use crate::presentation::handlers::{self, PostsAppState, PostsBackend};

/// Create the posts router with the PostgreSQL repository
pub fn posts_router<S>(
    repo: PgPostsRepository,
    auth: AuthMiddlewareState<S>,
    config: PostsConfig,
) -> Router
where
    S: AuthSessionRepository + Send + Sync + 'static,
{
    posts_router_generic(repo, auth, config)
}

/// Create a generic posts router for any repository implementation
pub fn posts_router_generic<R, S>(
    repo: R,
    auth: AuthMiddlewareState<S>,
    config: PostsConfig,
) -> Router
where
    R: PostsBackend,
    S: AuthSessionRepository + Send + Sync + 'static,
{
    let state = PostsAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            get(handlers::feed::<R>).post(handlers::create_post::<R>),
        )
        .route(
            "/{id}",
            get(handlers::get_post::<R>)
                .patch(handlers::update_post::<R>)
                .delete(handlers::delete_post::<R>),
        )
        .route("/{id}/delete", post(handlers::delete_and_get_post::<R>))
        .route("/{id}/vote", post(handlers::vote::<R>))
        .layer(middleware::from_fn_with_state(auth, check_auth_session::<S>))
        .with_state(state)
}
