//! Ephemeral Key-Value Store
//!
//! String values that disappear on their own once a per-key TTL elapses.
//! Production uses Redis through a `bb8` pool; [`MemoryStore`] serves
//! development setups without Redis and tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use bb8_redis::{RedisConnectionManager, bb8::Pool, redis::AsyncCommands};
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum EphemeralStoreError {
    #[error("ephemeral store unavailable: {0}")]
    Unavailable(String),

    #[error("ephemeral store command failed: {0}")]
    Command(String),
}

#[trait_variant::make(EphemeralStore: Send)]
pub trait LocalEphemeralStore {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), EphemeralStoreError>;

    /// `None` once the key expired or was deleted
    async fn get(&self, key: &str) -> Result<Option<String>, EphemeralStoreError>;

    /// Remove `key`; missing keys are not an error
    async fn del(&self, key: &str) -> Result<(), EphemeralStoreError>;
}

// ============================================================================
// Redis
// ============================================================================

#[derive(Clone)]
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisStore {
    pub fn new(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    /// Build a pool against `url`; no connection is made until first use
    pub fn connect_lazy(url: &str, connection_timeout: Duration) -> Result<Self, EphemeralStoreError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|e| EphemeralStoreError::Unavailable(e.to_string()))?;
        let pool = Pool::builder()
            .connection_timeout(connection_timeout)
            .build_unchecked(manager);
        Ok(Self::new(pool))
    }
}

impl EphemeralStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), EphemeralStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| EphemeralStoreError::Unavailable(e.to_string()))?;
        // Redis rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(|e| EphemeralStoreError::Command(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, EphemeralStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| EphemeralStoreError::Unavailable(e.to_string()))?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| EphemeralStoreError::Command(e.to_string()))
    }

    async fn del(&self, key: &str) -> Result<(), EphemeralStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| EphemeralStoreError::Unavailable(e.to_string()))?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| EphemeralStoreError::Command(e.to_string()))
    }
}

// ============================================================================
// In-process
// ============================================================================

/// In-process store; entries expire lazily on read
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, EphemeralStoreError> {
        self.entries
            .lock()
            .map_err(|_| EphemeralStoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl EphemeralStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), EphemeralStoreError> {
        let expires_at = Instant::now() + ttl;
        let mut entries = self.lock()?;
        entries.retain(|_, (_, at)| *at > Instant::now());
        entries.insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, EphemeralStoreError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn del(&self, key: &str) -> Result<(), EphemeralStoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
