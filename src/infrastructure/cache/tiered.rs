//! Two-tier cache: remote store with an in-process fallback
//!
//! Operations never fail. Remote errors are logged and treated as misses,
//! and every write also lands in the fallback.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheHealth};
use crate::infrastructure::observability::{record_cache_lookup, CacheLookupResult};

#[derive(Debug, Clone)]
pub struct TieredCache {
    remote: Option<Arc<dyn Cache>>,
    fallback: Arc<dyn Cache>,
    health: Arc<CacheHealth>,
}

impl TieredCache {
    /// Creates a cache backed only by `fallback`
    pub fn new(fallback: Arc<dyn Cache>, health: Arc<CacheHealth>) -> Self {
        Self {
            remote: None,
            fallback,
            health,
        }
    }

    /// Adds the remote tier, consulted while `health` reports it available
    pub fn with_remote(mut self, remote: Arc<dyn Cache>) -> Self {
        self.remote = Some(remote);
        self
    }

    fn active_remote(&self) -> Option<&Arc<dyn Cache>> {
        self.remote
            .as_ref()
            .filter(|_| self.health.is_available())
    }

    /// Looks up `key`, remote tier first
    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(remote) = self.active_remote() {
            match remote.get_raw(key).await {
                Ok(Some(value)) => {
                    debug!(key = %key, tier = remote.tier_name(), "Cache hit");
                    record_cache_lookup(remote.tier_name(), CacheLookupResult::Hit);
                    return Some(value);
                }
                Ok(None) => {
                    record_cache_lookup(remote.tier_name(), CacheLookupResult::Miss);
                }
                Err(e) => {
                    warn!(key = %key, tier = remote.tier_name(), error = %e, "Cache read failed");
                    record_cache_lookup(remote.tier_name(), CacheLookupResult::Error);
                }
            }
        }

        match self.fallback.get_raw(key).await {
            Ok(Some(value)) => {
                debug!(key = %key, tier = self.fallback.tier_name(), "Cache hit");
                record_cache_lookup(self.fallback.tier_name(), CacheLookupResult::Hit);
                Some(value)
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                record_cache_lookup(self.fallback.tier_name(), CacheLookupResult::Miss);
                None
            }
            Err(e) => {
                warn!(key = %key, tier = self.fallback.tier_name(), error = %e, "Cache read failed");
                record_cache_lookup(self.fallback.tier_name(), CacheLookupResult::Error);
                None
            }
        }
    }

    /// Stores `value` in every reachable tier
    ///
    /// Returns `false` only if no tier accepted the write.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let mut stored = false;

        if let Some(remote) = self.active_remote() {
            match remote.set_raw(key, value, ttl).await {
                Ok(()) => stored = true,
                Err(e) => {
                    warn!(key = %key, tier = remote.tier_name(), error = %e, "Cache write failed");
                }
            }
        }

        match self.fallback.set_raw(key, value, ttl).await {
            Ok(()) => stored = true,
            Err(e) => {
                warn!(key = %key, tier = self.fallback.tier_name(), error = %e, "Cache write failed");
            }
        }

        stored
    }

    /// Typed lookup; an undecodable payload counts as a miss
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Typed write
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, &raw, ttl).await,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize cache value");
                false
            }
        }
    }
}
