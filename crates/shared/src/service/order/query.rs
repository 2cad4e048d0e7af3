use super::to_responses;
use crate::{
    abstract_trait::{DynOrderQueryRepository, OrderQueryServiceTrait},
    domain::{
        requests::FindAllOrders,
        responses::{ApiResponse, ApiResponsePagination, OrderResponse, Pagination},
    },
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use validator::Validate;

pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    metrics: Metrics,
}

impl OrderQueryService {
    pub async fn new(query: DynOrderQueryRepository, registry: Arc<Mutex<Registry>>) -> Self {
        let metrics = Metrics::new();
        metrics.register(
            &mut *registry.lock().await,
            "order_query_service",
            "OrderQueryService",
        );

        Self { query, metrics }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        info!(
            "📋 Listing orders page {} (size {}), status {:?}",
            req.page, req.page_size, req.status
        );

        let method = Method::Get;
        let tracing_ctx = TracingContext::start("order", "FindAllOrders");

        if let Err(errors) = req.validate() {
            tracing_ctx.complete_error(&self.metrics, method, "Invalid pagination");
            return Err(ServiceError::from(errors));
        }

        let (orders, total) = match self.query.find_all(req).await {
            Ok(result) => result,
            Err(err) => {
                error!("❌ Failed to fetch orders: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to fetch orders");
                return Err(ServiceError::Repo(err));
            }
        };

        let data = match to_responses(orders) {
            Ok(data) => data,
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Corrupt order row");
                return Err(e);
            }
        };

        tracing_ctx.complete_success(&self.metrics, method, "Orders retrieved");

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: "Orders retrieved successfully".to_string(),
            data,
            pagination: Pagination::new(req.page, req.page_size, total),
        })
    }

    async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!("📦 Listing orders of user {user_id}");

        let method = Method::Get;
        let tracing_ctx = TracingContext::start("order", "FindOrdersByUser");

        let orders = match self.query.find_by_user(user_id).await {
            Ok(orders) => orders,
            Err(err) => {
                error!("❌ Failed to fetch orders of user {user_id}: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to fetch orders");
                return Err(ServiceError::Repo(err));
            }
        };

        let data = match to_responses(orders) {
            Ok(data) => data,
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Corrupt order row");
                return Err(e);
            }
        };

        tracing_ctx.complete_success(&self.metrics, method, "User orders retrieved");

        Ok(ApiResponse::success("Orders retrieved successfully", data))
    }
}
