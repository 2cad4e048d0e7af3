use crate::abstract_trait::CacheStoreTrait;
use async_trait::async_trait;
use chrono::Duration;
use deadpool_redis::{Connection, Pool};
use tracing::{debug, error, warn};

/// Redis-backed cache. Every operation degrades to a miss or a no-op
/// when Redis is unreachable or not configured.
#[derive(Clone)]
pub struct CacheStore {
    redis_pool: Option<Pool>,
}

impl CacheStore {
    pub fn new(redis_pool: Pool) -> Self {
        Self {
            redis_pool: Some(redis_pool),
        }
    }

    pub fn disabled() -> Self {
        Self { redis_pool: None }
    }

    async fn get_conn(&self) -> Option<Connection> {
        let pool = self.redis_pool.as_ref()?;

        match pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis pooled connection: {:?}", e);
                None
            }
        }
    }
}

#[async_trait]
impl CacheStoreTrait for CacheStore {
    async fn get_from_cache(&self, key: &str) -> Option<String> {
        let mut conn = self.get_conn().await?;
        let result: redis::RedisResult<Option<String>> =
            redis::cmd("GET").arg(key).query_async(&mut conn).await;

        match result {
            Ok(Some(data)) => Some(data),
            Ok(None) => {
                warn!("Cache miss for key: {key}");
                None
            }
            Err(e) => {
                error!("Redis get error for key '{key}': {e:?}");
                None
            }
        }
    }

    async fn set_to_cache(&self, key: &str, value: &str, expiration: Duration) {
        let Some(mut conn) = self.get_conn().await else {
            return;
        };

        let result: redis::RedisResult<()> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(expiration.num_seconds().max(1))
            .query_async(&mut conn)
            .await;

        match result {
            Ok(_) => debug!("Cached key '{key}' with TTL {expiration:?}"),
            Err(e) => error!("Failed to set cache key '{key}': {e:?}"),
        }
    }

    async fn delete_from_cache(&self, key: &str) {
        if let Some(mut conn) = self.get_conn().await
            && let Err(e) = redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut conn)
                .await
        {
            error!("Failed to delete key '{key}': {e:?}");
        }
    }
}
