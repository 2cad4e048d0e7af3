mod cache_store;

pub use self::cache_store::CacheStore;

use crate::abstract_trait::DynCacheStore;
use chrono::Duration;
use serde::{Serialize, de::DeserializeOwned};
use tracing::error;

/// Reads `key` and decodes it as JSON. Undecodable entries count as a miss.
pub async fn get_json<T>(cache: &DynCacheStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let data = cache.get_from_cache(key).await?;

    match serde_json::from_str::<T>(&data) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            error!("Failed to deserialize cached value for key '{key}': {e:?}");
            None
        }
    }
}

pub async fn set_json<T>(cache: &DynCacheStore, key: &str, data: &T, expiration: Duration)
where
    T: Serialize + ?Sized,
{
    let json_data = match serde_json::to_string(data) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize data for key '{key}': {e:?}");
            return;
        }
    };

    cache.set_to_cache(key, &json_data, expiration).await;
}

/// Mock that misses on every read and accepts every write.
#[cfg(test)]
pub(crate) fn idle_cache() -> crate::abstract_trait::MockCacheStoreTrait {
    let mut cache = crate::abstract_trait::MockCacheStoreTrait::new();
    cache.expect_get_from_cache().returning(|_| None);
    cache.expect_set_to_cache().return_const(());
    cache.expect_delete_from_cache().return_const(());
    cache
}
