use async_trait::async_trait;
use chrono::Duration;
use mockall::automock;
use std::sync::Arc;

pub type DynCacheStore = Arc<dyn CacheStoreTrait + Send + Sync>;

/// Key/value store holding JSON text. Reads miss and writes are dropped
/// when the backend is unavailable.
#[automock]
#[async_trait]
pub trait CacheStoreTrait {
    async fn get_from_cache(&self, key: &str) -> Option<String>;
    async fn set_to_cache(&self, key: &str, value: &str, expiration: Duration);
    async fn delete_from_cache(&self, key: &str);
}
