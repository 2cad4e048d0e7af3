use crate::{
    domain::{
        order::OrderStatus,
        requests::{NewOrder, PlaceOrderRequest},
        responses::{ApiResponse, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Order as OrderModel,
};
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;
pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Inserts the order and empties the buyer's cart atomically.
    async fn place_order(&self, order: &NewOrder) -> Result<OrderModel, RepositoryError>;
    async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<OrderModel, RepositoryError>;
}

#[automock]
#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn place_order(
        &self,
        user_id: i32,
        req: &PlaceOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
