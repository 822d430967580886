//! The cache-aside accessor.
//!
//! [`SideCache`] mediates every cached read: check the backend, fall back to
//! the loader (the SQLite store) on miss, repopulate under a fixed TTL, and
//! report where the data came from. Writes call [`SideCache::invalidate`]
//! after their commit; the TTL bounds staleness even if an invalidation is
//! lost.
//!
//! The backend is best-effort throughout. Errors from `get` are misses,
//! errors from `set_ex` and `delete` are no-ops; all of them are logged and
//! counted, none of them reach the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::backend::{BackendKind, CacheBackend};
use super::keys::CacheKey;

const SOURCE: &str = "cache::aside";

/// Where a read was served from. Part of the observable contract: every read
/// response carries this tag so clients and tests can assert cache behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Database,
}

/// Cache connectivity as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Connected,
    Mock,
    Disconnected,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Connected => "connected",
            CacheStatus::Mock => "mock",
            CacheStatus::Disconnected => "disconnected",
        }
    }
}

/// Best-effort side cache over a [`CacheBackend`].
pub struct SideCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl SideCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Serve `key` from the cache when possible, otherwise run `loader`
    /// against the source of truth and repopulate the entry.
    ///
    /// Only loader errors propagate; the cache cannot fail a read.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: CacheKey,
        loader: F,
    ) -> Result<(T, Source), E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get_json::<T>(key).await {
            counter!("recensio_cache_hit_total").increment(1);
            return Ok((hit, Source::Cache));
        }
        counter!("recensio_cache_miss_total").increment(1);

        let value = loader().await?;
        self.put_json(key, &value).await;
        Ok((value, Source::Database))
    }

    /// Remove `key` from the cache. Called after a successful write commit,
    /// before the write's response is returned. Removing an absent key is a
    /// no-op; an unreachable backend never fails the surrounding write.
    pub async fn invalidate(&self, key: CacheKey) {
        counter!("recensio_cache_invalidate_total").increment(1);
        if let Err(error) = self.backend.delete(&key.to_string()).await {
            counter!("recensio_cache_error_total").increment(1);
            warn!(
                target_module = SOURCE,
                key = %key,
                error = %error,
                "Cache invalidation error"
            );
        }
    }

    /// Health probe for the backing store.
    pub async fn status(&self) -> CacheStatus {
        match self.backend.kind() {
            BackendKind::Memory => CacheStatus::Mock,
            BackendKind::Redis => match self.backend.ping().await {
                Ok(()) => CacheStatus::Connected,
                Err(_) => CacheStatus::Disconnected,
            },
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let payload = match self.backend.get(&key.to_string()).await {
            Ok(payload) => payload?,
            Err(error) => {
                counter!("recensio_cache_error_total").increment(1);
                warn!(
                    target_module = SOURCE,
                    key = %key,
                    error = %error,
                    "Cache read error"
                );
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(error) => {
                // A payload we cannot decode is as good as absent.
                warn!(
                    target_module = SOURCE,
                    key = %key,
                    error = %error,
                    "Discarding undecodable cache entry"
                );
                None
            }
        }
    }

    async fn put_json<T: Serialize>(&self, key: CacheKey, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(
                    target_module = SOURCE,
                    key = %key,
                    error = %error,
                    "Cache serialization error"
                );
                return;
            }
        };

        if let Err(error) = self
            .backend
            .set_ex(&key.to_string(), &payload, self.ttl)
            .await
        {
            counter!("recensio_cache_error_total").increment(1);
            warn!(
                target_module = SOURCE,
                key = %key,
                error = %error,
                "Cache write error"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::super::backend::{CacheError, MemoryBackend};
    use super::*;

    struct FailingBackend;

    #[async_trait]
    impl CacheBackend for FailingBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::backend("connection refused"))
        }

        async fn set_ex(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> Result<(), CacheError> {
            Err(CacheError::backend("connection refused"))
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::backend("connection refused"))
        }

        async fn ping(&self) -> Result<(), CacheError> {
            Err(CacheError::backend("connection refused"))
        }

        fn kind(&self) -> BackendKind {
            BackendKind::Redis
        }
    }

    fn memory_cache() -> SideCache {
        SideCache::new(Arc::new(MemoryBackend::new()), Duration::from_secs(10))
    }

    async fn load_titles(cache: &SideCache, titles: Vec<String>) -> (Vec<String>, Source) {
        cache
            .read_through(CacheKey::Books, || async {
                Ok::<_, std::convert::Infallible>(titles)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn read_through_populates_then_serves_from_cache() {
        let cache = memory_cache();

        let (first, source) = load_titles(&cache, vec!["1984".to_string()]).await;
        assert_eq!(source, Source::Database);
        assert_eq!(first, vec!["1984".to_string()]);

        // The second loader must not be consulted.
        let (second, source) = load_titles(&cache, vec!["ignored".to_string()]).await;
        assert_eq!(source, Source::Cache);
        assert_eq!(second, vec!["1984".to_string()]);
    }

    #[tokio::test]
    async fn invalidate_forces_the_next_read_back_to_the_loader() {
        let cache = memory_cache();

        let (_, source) = load_titles(&cache, vec!["old".to_string()]).await;
        assert_eq!(source, Source::Database);

        cache.invalidate(CacheKey::Books).await;

        let (value, source) = load_titles(&cache, vec!["new".to_string()]).await;
        assert_eq!(source, Source::Database);
        assert_eq!(value, vec!["new".to_string()]);
    }

    #[tokio::test]
    async fn invalidating_an_absent_key_is_a_no_op() {
        let cache = memory_cache();
        cache.invalidate(CacheKey::ReviewsForBook(42)).await;
        cache.invalidate(CacheKey::ReviewsForBook(42)).await;
    }

    #[tokio::test]
    async fn backend_failures_never_reach_the_caller() {
        let cache = SideCache::new(Arc::new(FailingBackend), Duration::from_secs(10));

        let (value, source) = load_titles(&cache, vec!["1984".to_string()]).await;
        assert_eq!(source, Source::Database);
        assert_eq!(value, vec!["1984".to_string()]);

        // Every read keeps falling through to the loader.
        let (_, source) = load_titles(&cache, vec!["1984".to_string()]).await;
        assert_eq!(source, Source::Database);

        cache.invalidate(CacheKey::Books).await;
    }

    #[tokio::test]
    async fn undecodable_entries_count_as_misses() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set_ex("books:all", "{not json", Duration::from_secs(10))
            .await
            .unwrap();

        let cache = SideCache::new(backend, Duration::from_secs(10));
        let (_, source) = load_titles(&cache, vec!["fresh".to_string()]).await;
        assert_eq!(source, Source::Database);
    }

    #[tokio::test]
    async fn status_reflects_the_backend() {
        assert_eq!(memory_cache().status().await, CacheStatus::Mock);

        let failing = SideCache::new(Arc::new(FailingBackend), Duration::from_secs(10));
        assert_eq!(failing.status().await, CacheStatus::Disconnected);
    }

    #[tokio::test]
    async fn expired_entries_fall_back_to_the_loader() {
        let cache = SideCache::new(Arc::new(MemoryBackend::new()), Duration::ZERO);

        let (_, source) = load_titles(&cache, vec!["1984".to_string()]).await;
        assert_eq!(source, Source::Database);

        let (_, source) = load_titles(&cache, vec!["1984".to_string()]).await;
        assert_eq!(source, Source::Database);
    }
}
