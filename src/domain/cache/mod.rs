//! Cache domain - Caching abstraction shared by the cache tiers

mod clock;
mod health;
mod key;
mod repository;

pub use clock::{Clock, SystemClock};
pub use health::{CacheAvailability, CacheHealth};
pub use key::{
    embedding_cache_key, CacheKeyGenerator, ContentHashKeyGenerator, EMBEDDING_NAMESPACE,
};
pub use repository::Cache;

#[cfg(test)]
pub use clock::mock::ManualClock;
#[cfg(test)]
pub use repository::mock::MockCache;
