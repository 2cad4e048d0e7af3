use super::{PRODUCT_LIST_CACHE_KEY, product_cache_key};
use crate::{
    abstract_trait::{DynCacheStore, DynProductQueryRepository, ProductQueryServiceTrait},
    cache::{get_json, set_json},
    domain::{
        requests::FindAllProducts,
        responses::{ApiResponse, ProductResponse},
    },
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use async_trait::async_trait;
use chrono::Duration;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub struct ProductQueryService {
    query: DynProductQueryRepository,
    metrics: Metrics,
    cache_store: DynCacheStore,
}

impl ProductQueryService {
    pub async fn new(
        query: DynProductQueryRepository,
        registry: Arc<Mutex<Registry>>,
        cache_store: DynCacheStore,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register(
            &mut *registry.lock().await,
            "product_query_service",
            "ProductQueryService",
        );

        Self {
            query,
            metrics,
            cache_store,
        }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        info!("🔍 Listing products: {req:?}");

        let method = Method::Get;
        let tracing_ctx = TracingContext::start("product", "FindAllProducts");

        let cacheable = req.is_unfiltered();

        if cacheable
            && let Some(cached) =
                get_json::<Vec<ProductResponse>>(&self.cache_store, PRODUCT_LIST_CACHE_KEY).await
        {
            info!("✅ Found {} products in cache", cached.len());
            tracing_ctx.complete_success(&self.metrics, method, "Products served from cache");
            return Ok(ApiResponse::success("Products retrieved successfully", cached));
        }

        let products = match self.query.find_all(req).await {
            Ok(products) => products,
            Err(err) => {
                error!("❌ Failed to fetch products: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to fetch products");
                return Err(ServiceError::Repo(err));
            }
        };

        let data: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

        if cacheable {
            set_json(
                &self.cache_store,
                PRODUCT_LIST_CACHE_KEY,
                &data,
                Duration::minutes(5),
            )
            .await;
        }

        tracing_ctx.complete_success(&self.metrics, method, "Products retrieved");

        Ok(ApiResponse::success("Products retrieved successfully", data))
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔍 Fetching product ID {id}");

        let method = Method::Get;
        let tracing_ctx = TracingContext::start("product", "FindProductById");

        let cache_key = product_cache_key(id);

        if let Some(cached) = get_json::<ProductResponse>(&self.cache_store, &cache_key).await {
            tracing_ctx.complete_success(&self.metrics, method, "Product served from cache");
            return Ok(ApiResponse::success("Product retrieved successfully", cached));
        }

        let product = match self.query.find_by_id(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                tracing_ctx.complete_error(&self.metrics, method, "Product not found");
                return Err(ServiceError::NotFound("Product not found".to_string()));
            }
            Err(err) => {
                error!("❌ Failed to fetch product {id}: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to fetch product");
                return Err(ServiceError::Repo(err));
            }
        };

        let response = ProductResponse::from(product);

        set_json(&self.cache_store, &cache_key, &response, Duration::minutes(10)).await;

        tracing_ctx.complete_success(&self.metrics, method, "Product retrieved");

        Ok(ApiResponse::success("Product retrieved successfully", response))
    }
}
