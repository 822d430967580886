//! Cache backend implementations.
//!
//! [`CacheBackend`] is the capability interface the rest of the crate codes
//! against: string keys, string values, per-key expiry. `RedisBackend` is the
//! production implementation; `MemoryBackend` is the in-process fallback used
//! when Redis is unreachable at startup, and by tests.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use thiserror::Error;

use super::lock::rw_write;

const SOURCE: &str = "cache::backend";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Which concrete backend is serving the cache; surfaced by the health
/// endpoint as `connected` / `mock` / `disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Redis,
    Memory,
}

/// Key/value store with per-key expiry.
///
/// Implementations must be safe to share across request tasks. Callers never
/// see these errors directly; the [`super::SideCache`] adapter downgrades
/// every failure to a miss or a no-op.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;

    fn kind(&self) -> BackendKind;
}

// ============================================================================
// Redis backend
// ============================================================================

/// Redis-backed cache using a reconnecting connection manager.
#[derive(Clone)]
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    /// Open a connection to the given Redis URL and verify it with a ping.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        let backend = Self { manager };
        backend.ping().await?;
        Ok(backend)
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut con = self.manager.clone();
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut con = self.manager.clone();
        // SETEX rejects a zero expiry; clamp to the smallest Redis accepts.
        let seconds = ttl.as_secs().max(1);
        let _: () = con.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut con = self.manager.clone();
        let _: () = con.del(key).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut con = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Redis
    }
}

// ============================================================================
// In-process backend
// ============================================================================

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process cache with per-entry expiry.
///
/// Stands in for Redis when it is unreachable, so a development deployment
/// still exercises the full cache-aside path. Expired entries are dropped on
/// access rather than by a sweeper.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "memory.get");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        rw_write(&self.entries, SOURCE, "memory.set_ex").insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        rw_write(&self.entries, SOURCE, "memory.delete").remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }
}
