//! Cache service trait definition

use super::errors::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Operations the façade needs from a key-value backend
///
/// Values are opaque strings; the façade owns encoding. Expiry is enforced
/// by the backend itself, nothing here scans or evicts.
#[async_trait]
pub trait CacheService: Send + Sync + std::fmt::Debug {
    /// Get a value from the cache by key
    ///
    /// Returns `Ok(Some(value))` on cache hit, `Ok(None)` on cache miss.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a value in the cache with a TTL
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Check if the cache backend is healthy
    async fn health_check(&self) -> CacheResult<bool>;

    /// Get the name of the cache provider
    fn provider_name(&self) -> &'static str;
}
