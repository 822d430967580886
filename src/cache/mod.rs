//! Recensio side cache.
//!
//! The cache sits in front of the SQLite store as a strict performance
//! optimization: reads go through [`SideCache::read_through`], writes
//! invalidate the exact keys they affect, and entries expire after a fixed
//! TTL regardless of invalidation. The cache is never authoritative; any
//! backend failure is downgraded to a miss or a no-op.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `recensio.toml`:
//!
//! ```toml
//! [cache]
//! url = "redis://localhost:6379/0"
//! ttl_seconds = 10
//! ```

mod aside;
mod backend;
mod keys;
mod lock;

pub use aside::{CacheStatus, SideCache, Source};
pub use backend::{BackendKind, CacheBackend, CacheError, MemoryBackend, RedisBackend};
pub use keys::CacheKey;
