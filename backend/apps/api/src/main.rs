//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by
//! the auth and posts crates.

mod config;

use std::sync::Arc;

use auth::{AuthConfig, AuthMiddlewareState, PgAuthRepository, auth_router};
use axum::{
    Router,
    http::{Method, header},
};
use platform::ephemeral::{EphemeralStore, MemoryStore, RedisStore};
use platform::mail::LogMailer;
use posts::{PgPostsRepository, PostsConfig, posts_router};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,posts=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.store_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    match auth_store_for_cleanup.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }

    let auth_config = config.auth_config();

    // Reset tokens live in Redis when configured, in-process otherwise
    let app = match &config.redis_url {
        Some(url) => {
            let store = RedisStore::connect_lazy(url, config.store_timeout)?;
            tracing::info!("Using Redis for reset tokens");
            build_app(&config, pool, Arc::new(store), auth_config)
        }
        None => {
            tracing::warn!("REDIS_URL not set, reset tokens are kept in memory");
            build_app(&config, pool, Arc::new(MemoryStore::new()), auth_config)
        }
    };

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app<S>(
    config: &ApiConfig,
    pool: PgPool,
    store: Arc<S>,
    auth_config: AuthConfig,
) -> Router
where
    S: EphemeralStore + Sync + 'static,
{
    let auth_repo = PgAuthRepository::new(pool.clone());
    let posts_repo = PgPostsRepository::new(pool);

    let session_check =
        AuthMiddlewareState::new(Arc::new(auth_repo.clone()), Arc::new(auth_config.clone()));

    Router::new()
        .nest(
            "/api/auth",
            auth_router(auth_repo, store, LogMailer, auth_config),
        )
        .nest(
            "/api/posts",
            posts_router(posts_repo, session_check, PostsConfig::default()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors(config))
}

fn cors(config: &ApiConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.frontend_origins.clone())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
