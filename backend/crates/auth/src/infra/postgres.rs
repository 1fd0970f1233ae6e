//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, user::NewUser, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }

    async fn find_user_where(&self, column: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                username,
                email,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $4)
            RETURNING id
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(user.into_user(UserId::new(id))),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!(constraint = ?e.constraint(), "User insert hit unique constraint");
                Err(AuthError::UserNameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        self.find_user_where("username", username.as_str()).await
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        self.find_user_where("email", email).await
    }

    async fn update_password(&self, user_id: UserId, password: &UserPassword) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                password_hash = $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.get())
        .bind(password.as_phc_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                expires_at_ms,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.get())
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();

        // Reading a session counts as activity
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            UPDATE auth_sessions
            SET last_activity_at = now()
            WHERE session_id = $1 AND expires_at_ms > $2
            RETURNING
                session_id,
                user_id,
                expires_at_ms,
                created_at,
                last_activity_at
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthSessionRow::into_session))
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.cleanup_expired().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            id: UserId::new(self.id),
            username: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: i64,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            user_id: UserId::new(self.user_id),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}
