use crate::{
    domain::{
        cart::CartData,
        requests::{AddToCartRequest, UpdateCartRequest},
        responses::{ApiResponse, CartResponse, CartSummaryResponse},
    },
    errors::{RepositoryError, ServiceError},
};
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;

pub type DynCartRepository = Arc<dyn CartRepositoryTrait + Send + Sync>;
pub type DynCartService = Arc<dyn CartServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait CartRepositoryTrait {
    async fn find_cart(&self, user_id: i32) -> Result<Option<CartData>, RepositoryError>;
    async fn save_cart(&self, user_id: i32, cart: &CartData) -> Result<(), RepositoryError>;
}

#[automock]
#[async_trait]
pub trait CartServiceTrait {
    async fn add_to_cart(
        &self,
        user_id: i32,
        req: &AddToCartRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn update_cart(
        &self,
        user_id: i32,
        req: &UpdateCartRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn get_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn get_summary(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<CartSummaryResponse>, ServiceError>;
    async fn clear_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError>;
}
