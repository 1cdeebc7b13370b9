//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Key-value cache tier with TTL support
///
/// Values are JSON strings so the trait stays dyn-compatible.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Short label used in logs and metrics
    fn tier_name(&self) -> &'static str;

    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value in the cache with a TTL
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;
}
