use crate::{
    abstract_trait::{CartServiceTrait, DynCartRepository, DynProductQueryRepository},
    domain::{
        cart::CartData,
        requests::{AddToCartRequest, UpdateCartRequest},
        responses::{ApiResponse, CartResponse, CartSummaryResponse},
    },
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info};

#[derive(Clone)]
pub struct CartServiceDeps {
    pub cart: DynCartRepository,
    pub product_query: DynProductQueryRepository,
    pub delivery_fee: i64,
    pub registry: Arc<Mutex<Registry>>,
}

pub struct CartService {
    cart: DynCartRepository,
    product_query: DynProductQueryRepository,
    delivery_fee: i64,
    metrics: Metrics,
}

impl CartService {
    pub async fn new(deps: CartServiceDeps) -> Self {
        let metrics = Metrics::new();
        metrics.register(&mut *deps.registry.lock().await, "cart_service", "CartService");

        Self {
            cart: deps.cart,
            product_query: deps.product_query,
            delivery_fee: deps.delivery_fee,
            metrics,
        }
    }

    async fn load_cart(&self, user_id: i32) -> Result<CartData, ServiceError> {
        self.cart
            .find_cart(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// The product must exist and be offered in `size`.
    async fn ensure_purchasable(&self, product_id: i32, size: &str) -> Result<(), ServiceError> {
        let product = self
            .product_query
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;

        if !product.has_size(size) {
            return Err(ServiceError::validation(format!(
                "Size {size} is not available for {}",
                product.name
            )));
        }

        Ok(())
    }

    async fn add(&self, user_id: i32, req: &AddToCartRequest) -> Result<CartData, ServiceError> {
        let size = req.size.trim();
        self.ensure_purchasable(req.item_id, size).await?;

        let mut cart = self.load_cart(user_id).await?;
        let quantity = cart.add_item(req.item_id, size)?;
        self.cart.save_cart(user_id, &cart).await?;

        info!(
            "🛒 User {user_id} now has {quantity} x product {} ({size})",
            req.item_id
        );
        Ok(cart)
    }

    async fn update(
        &self,
        user_id: i32,
        req: &UpdateCartRequest,
    ) -> Result<CartData, ServiceError> {
        let size = req.size.trim();

        // removal is allowed even after the product left the catalogue
        if req.quantity > 0 {
            self.ensure_purchasable(req.item_id, size).await?;
        }

        let mut cart = self.load_cart(user_id).await?;
        cart.set_quantity(req.item_id, size, req.quantity)?;
        self.cart.save_cart(user_id, &cart).await?;

        Ok(cart)
    }

    async fn summarize(&self, user_id: i32) -> Result<CartSummaryResponse, ServiceError> {
        let cart = self.load_cart(user_id).await?;

        let products = self
            .product_query
            .find_by_ids(&cart.product_ids())
            .await?;
        let prices: HashMap<i32, i64> = products
            .iter()
            .map(|p| (p.product_id, p.price))
            .collect();

        let subtotal = cart.amount(|id| prices.get(&id).copied())?;
        let item_count: i64 = cart
            .lines()
            .filter(|line| prices.contains_key(&line.product_id))
            .map(|line| i64::from(line.quantity))
            .sum();

        let delivery_fee = if item_count > 0 { self.delivery_fee } else { 0 };
        let total = subtotal
            .checked_add(delivery_fee)
            .ok_or_else(|| ServiceError::validation("Cart amount overflow"))?;

        Ok(CartSummaryResponse {
            item_count,
            subtotal,
            delivery_fee,
            total,
        })
    }
}

#[async_trait]
impl CartServiceTrait for CartService {
    async fn add_to_cart(
        &self,
        user_id: i32,
        req: &AddToCartRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = TracingContext::start("cart", "AddToCart");

        match self.add(user_id, req).await {
            Ok(cart_data) => {
                tracing_ctx.complete_success(&self.metrics, method, "Item added to cart");
                Ok(ApiResponse::success("Added To Cart", CartResponse { cart_data }))
            }
            Err(e) => {
                error!("❌ Failed to add to cart for user {user_id}: {e}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to add to cart");
                Err(e)
            }
        }
    }

    async fn update_cart(
        &self,
        user_id: i32,
        req: &UpdateCartRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = TracingContext::start("cart", "UpdateCart");

        match self.update(user_id, req).await {
            Ok(cart_data) => {
                tracing_ctx.complete_success(&self.metrics, method, "Cart updated");
                Ok(ApiResponse::success("Cart Updated", CartResponse { cart_data }))
            }
            Err(e) => {
                error!("❌ Failed to update cart for user {user_id}: {e}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to update cart");
                Err(e)
            }
        }
    }

    async fn get_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = TracingContext::start("cart", "GetCart");

        match self.load_cart(user_id).await {
            Ok(cart_data) => {
                tracing_ctx.complete_success(&self.metrics, method, "Cart fetched");
                Ok(ApiResponse::success(
                    "Cart retrieved successfully",
                    CartResponse { cart_data },
                ))
            }
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Failed to fetch cart");
                Err(e)
            }
        }
    }

    async fn get_summary(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<CartSummaryResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = TracingContext::start("cart", "CartSummary");

        match self.summarize(user_id).await {
            Ok(summary) => {
                tracing_ctx.complete_success(&self.metrics, method, "Cart summary computed");
                Ok(ApiResponse::success("Cart summary", summary))
            }
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Failed to compute summary");
                Err(e)
            }
        }
    }

    async fn clear_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let method = Method::Delete;
        let tracing_ctx = TracingContext::start("cart", "ClearCart");

        let cart_data = CartData::new();

        match self.cart.save_cart(user_id, &cart_data).await {
            Ok(()) => {
                tracing_ctx.complete_success(&self.metrics, method, "Cart cleared");
                Ok(ApiResponse::success("Cart cleared", CartResponse { cart_data }))
            }
            Err(err) => {
                tracing_ctx.complete_error(&self.metrics, method, "Failed to clear cart");
                Err(ServiceError::Repo(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{MockCartRepositoryTrait, MockProductQueryRepositoryTrait},
        model::Product,
    };
    use mockall::predicate::eq;
    use testresult::TestResult;

    fn product(id: i32, price: i64, sizes: &[&str]) -> Product {
        Product {
            product_id: id,
            name: format!("Product {id}"),
            description: String::new(),
            price,
            category: "Women".into(),
            sub_category: "Topwear".into(),
            sizes: sizes.iter().map(ToString::to_string).collect(),
            images: vec![],
            bestseller: false,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    fn cart_with(lines: &[(i32, &str, i32)]) -> CartData {
        let mut cart = CartData::new();
        for (product_id, size, quantity) in lines {
            cart.set_quantity(*product_id, size, *quantity)
                .expect("valid test quantity");
        }
        cart
    }

    async fn service(
        cart: MockCartRepositoryTrait,
        products: MockProductQueryRepositoryTrait,
    ) -> CartService {
        CartService::new(CartServiceDeps {
            cart: Arc::new(cart),
            product_query: Arc::new(products),
            delivery_fee: 10,
            registry: Arc::new(Mutex::new(Registry::default())),
        })
        .await
    }

    #[tokio::test]
    async fn add_increments_existing_line() -> TestResult {
        let mut products = MockProductQueryRepositoryTrait::new();
        products
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(product(id, 100, &["S", "M"]))));

        let mut cart = MockCartRepositoryTrait::new();
        let existing = cart_with(&[(3, "M", 1)]);
        cart.expect_find_cart()
            .returning(move |_| Ok(Some(existing.clone())));
        cart.expect_save_cart()
            .withf(|user_id, cart| *user_id == 7 && cart.quantity(3, "M") == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let response = service(cart, products)
            .await
            .add_to_cart(
                7,
                &AddToCartRequest {
                    item_id: 3,
                    size: "M".into(),
                },
            )
            .await?;

        assert_eq!(response.message, "Added To Cart");
        assert_eq!(response.data.cart_data.quantity(3, "M"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_unoffered_size() {
        let mut products = MockProductQueryRepositoryTrait::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(product(id, 100, &["S"]))));

        let mut cart = MockCartRepositoryTrait::new();
        cart.expect_save_cart().never();

        let result = service(cart, products)
            .await
            .add_to_cart(
                1,
                &AddToCartRequest {
                    item_id: 3,
                    size: "XXL".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn update_to_zero_skips_catalogue_lookup() -> TestResult {
        let mut products = MockProductQueryRepositoryTrait::new();
        products.expect_find_by_id().never();

        let mut cart = MockCartRepositoryTrait::new();
        let existing = cart_with(&[(8, "L", 4)]);
        cart.expect_find_cart()
            .returning(move |_| Ok(Some(existing.clone())));
        cart.expect_save_cart()
            .withf(|_, cart| cart.is_empty())
            .returning(|_, _| Ok(()));

        let response = service(cart, products)
            .await
            .update_cart(
                1,
                &UpdateCartRequest {
                    item_id: 8,
                    size: "L".into(),
                    quantity: 0,
                },
            )
            .await?;

        assert!(response.data.cart_data.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn summary_adds_fee_for_known_products_only() -> TestResult {
        let mut cart = MockCartRepositoryTrait::new();
        let existing = cart_with(&[(1, "M", 2), (2, "S", 1)]);
        cart.expect_find_cart()
            .returning(move |_| Ok(Some(existing.clone())));

        let mut products = MockProductQueryRepositoryTrait::new();
        products
            .expect_find_by_ids()
            .returning(|_| Ok(vec![product(1, 250, &["M"])]));

        let response = service(cart, products).await.get_summary(1).await?;

        assert_eq!(
            response.data,
            CartSummaryResponse {
                item_count: 2,
                subtotal: 500,
                delivery_fee: 10,
                total: 510,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_has_no_delivery_fee() -> TestResult {
        let mut cart = MockCartRepositoryTrait::new();
        cart.expect_find_cart()
            .returning(|_| Ok(Some(CartData::new())));

        let mut products = MockProductQueryRepositoryTrait::new();
        products.expect_find_by_ids().returning(|_| Ok(vec![]));

        let summary = service(cart, products).await.get_summary(1).await?.data;
        assert_eq!(summary.total, 0);
        assert_eq!(summary.delivery_fee, 0);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_cart_is_not_found() {
        let mut cart = MockCartRepositoryTrait::new();
        cart.expect_find_cart().returning(|_| Ok(None));

        let result = service(cart, MockProductQueryRepositoryTrait::new())
            .await
            .get_cart(404)
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
