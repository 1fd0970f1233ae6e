//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
use platform::cookie::CookieConfig;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Lifetime of a login, server record and cookie alike
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// How long a password-reset token stays redeemable
    pub reset_token_ttl: Duration,
    /// Base URL of the web client, used to build reset links
    pub frontend_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "sid".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            reset_token_ttl: Duration::from_secs(3 * 24 * 3600), // 3 days
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Attributes of the session cookie; Max-Age follows the session TTL
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs()),
        }
    }

    /// Link mailed to the user for a password reset
    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/change-password/{}",
            self.frontend_url.trim_end_matches('/'),
            token
        )
    }
}
