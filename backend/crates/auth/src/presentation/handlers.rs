//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};
use platform::mail::Mailer;
use serde::Serialize;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, CookieChange, ForgotPasswordUseCase, LoginInput,
    LoginUseCase, LogoutUseCase, MeUseCase, RegisterInput, RegisterUseCase, SessionContext,
    SessionManager,
};
use crate::domain::repository::{
    AuthSessionRepository, PasswordResetTokenRepository, UserRepository,
};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest, UserDto,
    UserResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, T, M> {
    pub repo: Arc<R>,
    pub tokens: Arc<T>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

// Manual impl: derive would require the repositories themselves to be Clone
impl<R, T, M> Clone for AuthAppState<R, T, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

/// Bounds every auth handler shares
pub trait AuthBackend:
    UserRepository + AuthSessionRepository + Send + Sync + 'static
{
}

impl<R> AuthBackend for R where R: UserRepository + AuthSessionRepository + Send + Sync + 'static {}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, T, M>(
    State(state): State<AuthAppState<R, T, M>>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Response>
where
    R: AuthBackend,
    T: PasswordResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    let mut ctx = load_session(&state, &headers).await?;
    let use_case = RegisterUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    let outcome = use_case.execute(&mut ctx, input).await?;

    Ok(respond(&state.config, &mut ctx, UserResponse::from(outcome)))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, T, M>(
    State(state): State<AuthAppState<R, T, M>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: AuthBackend,
    T: PasswordResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    let mut ctx = load_session(&state, &headers).await?;
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = LoginInput {
        user_name_or_email: req.user_name_or_email,
        password: req.password,
    };

    let outcome = use_case.execute(&mut ctx, input).await?;

    Ok(respond(&state.config, &mut ctx, UserResponse::from(outcome)))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R, T, M>(
    State(state): State<AuthAppState<R, T, M>>,
    headers: HeaderMap,
) -> Response
where
    R: AuthBackend,
    T: PasswordResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.session_cookie_name);
    let mut ctx = SessionManager::new(state.repo.clone(), state.config.clone())
        .load_for_logout(token.as_deref())
        .await;

    let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
    let destroyed = use_case.execute(&mut ctx).await;

    respond(&state.config, &mut ctx, destroyed)
}

// ============================================================================
// Me
// ============================================================================

/// GET /api/auth/me
pub async fn me<R, T, M>(
    State(state): State<AuthAppState<R, T, M>>,
    headers: HeaderMap,
) -> AuthResult<Json<Option<UserDto>>>
where
    R: AuthBackend,
    T: PasswordResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    let ctx = load_session(&state, &headers).await?;
    let use_case = MeUseCase::new(state.repo.clone());

    let user = use_case.execute(&ctx).await?;

    Ok(Json(user.as_ref().map(UserDto::from)))
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<R, T, M>(
    State(state): State<AuthAppState<R, T, M>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<bool>>
where
    R: AuthBackend,
    T: PasswordResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    let use_case = ForgotPasswordUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    Ok(Json(use_case.execute(&req.email).await?))
}

/// POST /api/auth/change-password
pub async fn change_password<R, T, M>(
    State(state): State<AuthAppState<R, T, M>>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Response>
where
    R: AuthBackend,
    T: PasswordResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Sync + 'static,
{
    let mut ctx = load_session(&state, &headers).await?;
    let use_case = ChangePasswordUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = ChangePasswordInput {
        token: req.token,
        new_password: req.new_password,
    };

    let outcome = use_case.execute(&mut ctx, input).await?;

    Ok(respond(&state.config, &mut ctx, UserResponse::from(outcome)))
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn load_session<R, T, M>(
    state: &AuthAppState<R, T, M>,
    headers: &HeaderMap,
) -> AuthResult<SessionContext>
where
    R: AuthBackend,
{
    let token = extract_cookie(headers, &state.config.session_cookie_name);
    SessionManager::new(state.repo.clone(), state.config.clone())
        .load(token.as_deref())
        .await
}

/// JSON body plus whatever cookie change the session queued
fn respond<B: Serialize>(config: &AuthConfig, ctx: &mut SessionContext, body: B) -> Response {
    let mut response = Json(body).into_response();

    let cookie = match ctx.take_cookie_change() {
        Some(CookieChange::Set(token)) => Some(set_cookie_header(&config.cookie(), &token)),
        Some(CookieChange::Clear) => Some(delete_cookie_header(&config.cookie())),
        None => None,
    };
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }

    response
}
