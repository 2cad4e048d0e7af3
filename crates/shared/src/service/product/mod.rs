mod command;
mod query;

use self::command::ProductCommandService;
use self::query::ProductQueryService;
use crate::abstract_trait::{
    DynCacheStore, DynImageUploader, DynProductCommandRepository, DynProductCommandService,
    DynProductQueryRepository, DynProductQueryService,
};
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

const PRODUCT_LIST_CACHE_KEY: &str = "product:list";

fn product_cache_key(id: i32) -> String {
    format!("product:{id}")
}

#[derive(Clone)]
pub struct ProductService {
    pub query: DynProductQueryService,
    pub command: DynProductCommandService,
}

impl fmt::Debug for ProductService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductService")
            .field("query", &"Arc<dyn ProductQueryServiceTrait>")
            .field("command", &"Arc<dyn ProductCommandServiceTrait>")
            .finish()
    }
}

#[derive(Clone)]
pub struct ProductServiceDeps {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub uploader: DynImageUploader,
    pub registry: Arc<Mutex<Registry>>,
    pub cache_store: DynCacheStore,
}

impl ProductService {
    pub async fn new(deps: ProductServiceDeps) -> Self {
        let ProductServiceDeps {
            query,
            command,
            uploader,
            registry,
            cache_store,
        } = deps;

        let query_service = Arc::new(
            ProductQueryService::new(query, registry.clone(), cache_store.clone()).await,
        ) as DynProductQueryService;

        let command_service = Arc::new(
            ProductCommandService::new(command, uploader, registry, cache_store).await,
        ) as DynProductCommandService;

        Self {
            query: query_service,
            command: command_service,
        }
    }
}
