//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::monitor::ConnectionProbe;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    pub host: String,
    pub port: u16,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Timeout for establishing the connection
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration for the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Connection URL (e.g., "redis://127.0.0.1:6379")
    pub fn url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }
}

/// Remote cache tier backed by Redis
///
/// The connection is established lazily by the first successful probe.
/// Until then every operation fails with a cache error, which the tiered
/// cache treats as a miss.
pub struct RedisCache {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl RedisCache {
    /// Creates a Redis cache without connecting
    pub fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url().as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            config,
        })
    }

    pub fn config(&self) -> &RedisCacheConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    async fn connect(&self) -> Result<ConnectionManager, DomainError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                debug!(url = %self.config.url(), "Connecting to Redis");

                let connect = ConnectionManager::new(self.client.clone());
                match tokio::time::timeout(self.config.connection_timeout, connect).await {
                    Ok(Ok(manager)) => Ok(manager),
                    Ok(Err(e)) => Err(DomainError::cache(format!(
                        "Failed to connect to Redis: {}",
                        e
                    ))),
                    Err(_) => Err(DomainError::cache(format!(
                        "Timed out connecting to Redis after {:?}",
                        self.config.connection_timeout
                    ))),
                }
            })
            .await?;

        Ok(manager.clone())
    }

    fn connection(&self) -> Result<ConnectionManager, DomainError> {
        self.connection
            .get()
            .cloned()
            .ok_or_else(|| DomainError::cache("Redis connection not established"))
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl Cache for RedisCache {
    fn tier_name(&self) -> &'static str {
        "redis"
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection()?;

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection()?;

        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(&prefixed_key, value, ttl_secs)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }
}

#[async_trait]
impl ConnectionProbe for RedisCache {
    fn target(&self) -> String {
        self.config.url()
    }

    async fn probe(&self) -> Result<(), DomainError> {
        let mut conn = self.connect().await?;

        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Redis PING failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_url() {
        let config = RedisCacheConfig::new("cache.internal", 6380);
        assert_eq!(config.url(), "redis://cache.internal:6380");
    }

    #[test]
    fn test_config_builder() {
        let config = RedisCacheConfig::default()
            .with_key_prefix("survey")
            .with_connection_timeout(Duration::from_secs(1));

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6379);
        assert_eq!(config.key_prefix, Some("survey".to_string()));
        assert_eq!(config.connection_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_prefix_key() {
        let cache = RedisCache::new(RedisCacheConfig::default().with_key_prefix("survey")).unwrap();
        assert_eq!(cache.prefix_key("embedding:ab"), "survey:embedding:ab");

        let cache = RedisCache::new(RedisCacheConfig::default()).unwrap();
        assert_eq!(cache.prefix_key("embedding:ab"), "embedding:ab");
    }

    #[tokio::test]
    async fn test_operations_fail_before_connecting() {
        let cache = RedisCache::new(RedisCacheConfig::default()).unwrap();

        assert!(!cache.is_connected());
        assert!(cache.get_raw("key").await.is_err());
        assert!(cache
            .set_raw("key", "value", Duration::from_secs(1))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_probe_fails_when_nothing_listens() {
        // Port 1 is reserved and closed on CI hosts
        let config = RedisCacheConfig::new("127.0.0.1", 1)
            .with_connection_timeout(Duration::from_millis(500));
        let cache = RedisCache::new(config).unwrap();

        let result = cache.probe().await;

        assert!(matches!(result, Err(DomainError::Cache { .. })));
        assert!(!cache.is_connected());
    }

    // Integration tests require a running Redis instance
    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_redis_round_trip() {
        let cache = RedisCache::new(RedisCacheConfig::default()).unwrap();
        cache.probe().await.unwrap();

        cache
            .set_raw("test:key", "value", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get_raw("test:key").await.unwrap(),
            Some("value".to_string())
        );
    }
}
