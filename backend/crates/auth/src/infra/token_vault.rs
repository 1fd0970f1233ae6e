//! Password-reset tokens in the ephemeral store
//!
//! Keys are derived from a SHA-256 of the token, so a dump of the store
//! does not hand out usable reset links. Expiry is left to the store.

use std::sync::Arc;
use std::time::Duration;

use kernel::id::UserId;
use platform::crypto;
use platform::ephemeral::EphemeralStore;

use crate::domain::repository::PasswordResetTokenRepository;
use crate::error::{AuthError, AuthResult};

const KEY_PREFIX: &str = "forget-password:";

pub struct EphemeralTokenVault<S>
where
    S: EphemeralStore,
{
    store: Arc<S>,
}

impl<S> Clone for EphemeralTokenVault<S>
where
    S: EphemeralStore,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> EphemeralTokenVault<S>
where
    S: EphemeralStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn key(token: &str) -> String {
        format!("{}{}", KEY_PREFIX, crypto::sha256_b64url(token.as_bytes()))
    }
}

impl<S> PasswordResetTokenRepository for EphemeralTokenVault<S>
where
    S: EphemeralStore + Sync,
{
    async fn store(&self, token: &str, user_id: UserId, ttl: Duration) -> AuthResult<()> {
        self.store
            .set(&Self::key(token), &user_id.to_string(), ttl)
            .await?;
        Ok(())
    }

    async fn find_user_id(&self, token: &str) -> AuthResult<Option<UserId>> {
        let Some(value) = self.store.get(&Self::key(token)).await? else {
            return Ok(None);
        };

        value
            .parse::<UserId>()
            .map(Some)
            .map_err(|_| AuthError::Internal(format!("malformed reset token entry: {value}")))
    }

    async fn revoke(&self, token: &str) -> AuthResult<()> {
        self.store.del(&Self::key(token)).await?;
        Ok(())
    }
}
