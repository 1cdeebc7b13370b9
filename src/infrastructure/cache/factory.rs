//! Cache factory - wires the tiered cache from configuration

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::cache::CacheHealth;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::monitor::{ConnectionMonitor, RetryPolicy};
use super::redis::{RedisCache, RedisCacheConfig};
use super::tiered::TieredCache;

/// Configuration for the cache stack
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Remote tier; `None` runs on the in-process tier only
    pub remote: Option<RedisCacheConfig>,
    /// Reconnect schedule for the remote tier
    pub retry: RetryPolicy,
    /// Interval between health checks of a connected remote
    pub check_interval: Duration,
    pub fallback: InMemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            remote: None,
            retry: RetryPolicy::default(),
            check_interval: Duration::from_secs(30),
            fallback: InMemoryCacheConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Creates a configuration for the in-process tier only
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates a configuration with a Redis remote tier
    pub fn redis(config: RedisCacheConfig) -> Self {
        Self {
            remote: Some(config),
            ..Default::default()
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.fallback = self.fallback.with_max_capacity(capacity);
        self
    }
}

/// A built cache stack and its background monitor
#[derive(Debug)]
pub struct CacheStack {
    pub cache: Arc<TieredCache>,
    pub health: Arc<CacheHealth>,
    /// Running connection monitor, if a remote tier is configured
    pub monitor: Option<JoinHandle<()>>,
}

/// Factory for creating the tiered cache
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a new cache factory
    pub fn new() -> Self {
        Self
    }

    /// Creates the tiered cache described by `config`
    ///
    /// With a remote tier configured this spawns its connection monitor, so it
    /// must be called from within a Tokio runtime.
    pub fn create(&self, config: &CacheConfig) -> Result<CacheStack, DomainError> {
        let health = Arc::new(CacheHealth::new());
        let fallback = Arc::new(InMemoryCache::with_config(config.fallback.clone()));
        let cache = TieredCache::new(fallback, health.clone());

        let Some(redis_config) = &config.remote else {
            info!("Remote cache disabled, using in-process cache only");
            return Ok(CacheStack {
                cache: Arc::new(cache),
                health,
                monitor: None,
            });
        };

        let redis = Arc::new(RedisCache::new(redis_config.clone())?);
        info!(url = %redis_config.url(), "Remote cache configured");

        let monitor = ConnectionMonitor::new(redis.clone(), health.clone())
            .with_policy(config.retry)
            .with_check_interval(config.check_interval)
            .spawn();

        Ok(CacheStack {
            cache: Arc::new(cache.with_remote(redis)),
            health,
            monitor: Some(monitor),
        })
    }
}
