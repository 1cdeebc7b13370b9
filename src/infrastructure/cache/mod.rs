//! Cache infrastructure - Cache tiers, connection monitoring and wiring

mod factory;
mod in_memory;
mod monitor;
mod redis;
mod tiered;

pub use factory::{CacheConfig, CacheFactory, CacheStack};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use monitor::{ConnectionMonitor, ConnectionProbe, RetryPolicy};
pub use redis::{RedisCache, RedisCacheConfig};
pub use tiered::TieredCache;

#[cfg(test)]
pub use monitor::mock::MockProbe;
