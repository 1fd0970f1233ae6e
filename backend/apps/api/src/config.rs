//! Server Configuration
//!
//! Everything the binary reads from the environment, resolved once at
//! startup. Domain crates receive their own config structs built from this.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";

/// Holds secrets, so deliberately not `Debug`
#[derive(Clone)]
pub struct ApiConfig {
    pub database_url: String,
    /// `None` selects the in-process token store
    pub redis_url: Option<String>,
    /// `None` means a random secret; only allowed in debug builds
    pub session_secret: Option<[u8; 32]>,
    pub password_pepper: Option<Vec<u8>>,
    pub frontend_origins: Vec<HeaderValue>,
    pub frontend_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    /// Upper bound on waiting for a database or Redis connection
    pub store_timeout: Duration,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let session_secret = match optional("SESSION_SECRET") {
            Some(encoded) => Some(decode_secret(&encoded)?),
            None if cfg!(debug_assertions) => None,
            None => bail!("SESSION_SECRET must be set in production"),
        };

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let db_max_connections = match optional("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().context("DB_MAX_CONNECTIONS is not a number")?,
            None => 5,
        };

        let store_timeout = match optional("STORE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .context("STORE_TIMEOUT_SECS is not a number")?,
            ),
            None => Duration::from_secs(5),
        };

        Ok(Self {
            database_url,
            redis_url: optional("REDIS_URL"),
            session_secret,
            password_pepper: optional("PASSWORD_PEPPER").map(String::into_bytes),
            frontend_origins: parse_origins(
                &optional("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_ORIGINS.to_string()),
            ),
            frontend_url: optional("FRONTEND_URL"),
            bind_addr,
            db_max_connections,
            store_timeout,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        let base = match self.session_secret {
            Some(secret) => AuthConfig {
                session_secret: secret,
                ..AuthConfig::default()
            },
            None => {
                tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
                AuthConfig::development()
            }
        };

        AuthConfig {
            password_pepper: self.password_pepper.clone(),
            frontend_url: self.frontend_url.clone().unwrap_or_else(|| base.frontend_url.clone()),
            ..base
        }
    }
}

/// Unset and empty variables are treated alike
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("SESSION_SECRET is not valid base64")?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len())
    })
}

fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect()
}
