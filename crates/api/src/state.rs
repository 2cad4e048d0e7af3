use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynCacheStore, DynHashing, DynImageUploader, DynJwtService},
    cache::CacheStore,
    config::{Cloudinary, Config, ConnectionManager, CorsConfig, Hashing, JwtConfig, RedisClient},
    di::{DependenciesInject, DependenciesInjectDeps},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: DynJwtService,
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
    pub cors: CorsConfig,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let jwt_config = Arc::new(JwtConfig::new(&config.jwt_secret)) as DynJwtService;
        let registry = Arc::new(Mutex::new(Registry::default()));

        let pool = ConnectionManager::new_pool(&config.database_url)
            .await
            .context("Failed to connect to database")?;

        if config.run_migrations {
            ConnectionManager::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
        }

        let cache: DynCacheStore = match &config.redis_url {
            Some(url) => {
                info!("Initializing Redis connection");
                let redis = RedisClient::new(url).context("Failed to create Redis pool")?;
                redis.ping().await.context("Failed to ping Redis server")?;
                Arc::new(CacheStore::new(redis.pool))
            }
            None => {
                warn!("⚠️ REDIS_URL not set, product cache and login lockout disabled");
                Arc::new(CacheStore::disabled())
            }
        };

        let uploader =
            Arc::new(Cloudinary::new(config.cloudinary.clone())) as DynImageUploader;
        let hash = Arc::new(Hashing::new()) as DynHashing;

        let di_container = DependenciesInject::new(DependenciesInjectDeps {
            pool,
            hash,
            jwt_config: jwt_config.clone(),
            uploader,
            admin: config.admin.clone(),
            delivery_fee: config.delivery_fee,
            registry: registry.clone(),
            cache,
        })
        .await;

        Ok(Self {
            jwt_config,
            di_container,
            registry,
            cors: config.cors.clone(),
        })
    }
}
