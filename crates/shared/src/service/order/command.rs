use crate::{
    abstract_trait::{
        DynCartRepository, DynOrderCommandRepository, DynOrderQueryRepository,
        DynProductQueryRepository, OrderCommandServiceTrait,
    },
    domain::{
        order::{OrderItem, OrderStatus},
        requests::{NewOrder, PlaceOrderRequest},
        responses::{ApiResponse, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Product as ProductModel,
    utils::{Method, Metrics, TracingContext},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use validator::Validate;

pub struct OrderCommandServiceDeps {
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub cart: DynCartRepository,
    pub product_query: DynProductQueryRepository,
    pub delivery_fee: i64,
    pub registry: Arc<Mutex<Registry>>,
}

pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    cart: DynCartRepository,
    product_query: DynProductQueryRepository,
    delivery_fee: i64,
    metrics: Metrics,
}

impl OrderCommandService {
    pub async fn new(deps: OrderCommandServiceDeps) -> Self {
        let metrics = Metrics::new();
        metrics.register(
            &mut *deps.registry.lock().await,
            "order_command_service",
            "OrderCommandService",
        );

        Self {
            command: deps.command,
            query: deps.query,
            cart: deps.cart,
            product_query: deps.product_query,
            delivery_fee: deps.delivery_fee,
            metrics,
        }
    }

    /// Snapshots the cart against the current catalogue. Products that no
    /// longer exist are dropped.
    async fn build_order(
        &self,
        user_id: i32,
        req: &PlaceOrderRequest,
    ) -> Result<NewOrder, ServiceError> {
        req.validate()?;
        req.payment_method.ensure_available()?;

        let cart = self
            .cart
            .find_cart(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if cart.is_empty() {
            return Err(ServiceError::validation("Cart is empty"));
        }

        let products: HashMap<i32, ProductModel> = self
            .product_query
            .find_by_ids(&cart.product_ids())
            .await?
            .into_iter()
            .map(|p| (p.product_id, p))
            .collect();

        let mut items = Vec::new();
        for line in cart.lines() {
            let Some(product) = products.get(&line.product_id) else {
                warn!(
                    "⚠️ Skipping product {} from user {user_id}'s cart: no longer listed",
                    line.product_id
                );
                continue;
            };

            items.push(OrderItem {
                product_id: product.product_id,
                name: product.name.clone(),
                price: product.price,
                image: product.images.first().cloned(),
                size: line.size.to_string(),
                quantity: line.quantity,
            });
        }

        if items.is_empty() {
            return Err(ServiceError::validation("Cart is empty"));
        }

        let amount = items
            .iter()
            .try_fold(self.delivery_fee, |acc, item| {
                item.line_total().and_then(|total| acc.checked_add(total))
            })
            .ok_or_else(|| ServiceError::validation("Order amount overflow"))?;

        Ok(NewOrder {
            user_id,
            items,
            address: req.address.clone(),
            amount,
            payment_method: req.payment_method,
        })
    }

    async fn change_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<OrderResponse, ServiceError> {
        let order = self
            .query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let current: OrderStatus = order
            .status
            .parse()
            .map_err(|e| ServiceError::Internal(format!("Corrupt order row: {e}")))?;

        if !current.can_transition_to(status) {
            return Err(ServiceError::validation(format!(
                "Cannot move order from {current} back to {status}"
            )));
        }

        let updated = match self.command.update_status(id, status).await {
            Ok(order) => order,
            Err(RepositoryError::NotFound) => {
                return Err(ServiceError::NotFound("Order not found".to_string()));
            }
            Err(err) => return Err(ServiceError::Repo(err)),
        };

        OrderResponse::try_from(updated)
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn place_order(
        &self,
        user_id: i32,
        req: &PlaceOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🧾 Placing order for user {user_id}");

        let method = Method::Post;
        let tracing_ctx = TracingContext::start("order", "PlaceOrder");

        let new_order = match self.build_order(user_id, req).await {
            Ok(order) => order,
            Err(e) => {
                error!("❌ Cannot place order for user {user_id}: {e}");
                tracing_ctx.complete_error(&self.metrics, method, "Order rejected");
                return Err(e);
            }
        };

        let order = match self.command.place_order(&new_order).await {
            Ok(order) => order,
            Err(err) => {
                error!("❌ Failed to persist order: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to place order");
                return Err(ServiceError::Repo(err));
            }
        };

        let response = match OrderResponse::try_from(order) {
            Ok(response) => response,
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Corrupt order row");
                return Err(e);
            }
        };

        info!(
            "✅ Order {} placed for user {user_id}, amount {}",
            response.id, response.amount
        );
        tracing_ctx.complete_success(&self.metrics, method, "Order placed");

        Ok(ApiResponse::success("Order Placed", response))
    }

    async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🚚 Updating order {id} to {status}");

        let method = Method::Put;
        let tracing_ctx = TracingContext::start("order", "UpdateOrderStatus");

        match self.change_status(id, status).await {
            Ok(response) => {
                tracing_ctx.complete_success(&self.metrics, method, "Order status updated");
                Ok(ApiResponse::success("Status Updated", response))
            }
            Err(e) => {
                error!("❌ Failed to update order {id}: {e}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to update status");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            MockCartRepositoryTrait, MockOrderCommandRepositoryTrait,
            MockOrderQueryRepositoryTrait, MockProductQueryRepositoryTrait,
        },
        domain::{
            cart::CartData,
            order::{Address, PaymentMethod},
        },
        model::Order as OrderModel,
    };
    use mockall::predicate::eq;
    use sqlx::types::Json;
    use testresult::TestResult;

    fn address() -> Address {
        Address {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@example.com".into(),
            street: "1 Market St".into(),
            city: "Pune".into(),
            state: "MH".into(),
            zipcode: "411001".into(),
            country: "India".into(),
            phone: "9999999999".into(),
        }
    }

    fn request(payment_method: PaymentMethod) -> PlaceOrderRequest {
        PlaceOrderRequest {
            address: address(),
            payment_method,
        }
    }

    fn product(id: i32, price: i64) -> ProductModel {
        ProductModel {
            product_id: id,
            name: format!("Product {id}"),
            description: String::new(),
            price,
            category: "Men".into(),
            sub_category: "Topwear".into(),
            sizes: vec!["M".into()],
            images: vec![format!("https://cdn.test/{id}-a.png"), format!("https://cdn.test/{id}-b.png")],
            bestseller: false,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    fn persisted(order: &NewOrder, id: i32, status: OrderStatus) -> OrderModel {
        OrderModel {
            order_id: id,
            user_id: order.user_id,
            items: Json(order.items.clone()),
            address: Json(order.address.clone()),
            amount: order.amount,
            payment_method: order.payment_method.to_string(),
            payment: false,
            status: status.to_string(),
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    fn stored_order(id: i32, status: OrderStatus) -> OrderModel {
        let new_order = NewOrder {
            user_id: 1,
            items: vec![],
            address: address(),
            amount: 10,
            payment_method: PaymentMethod::Cod,
        };
        persisted(&new_order, id, status)
    }

    fn cart_with(lines: &[(i32, &str, i32)]) -> CartData {
        let mut cart = CartData::new();
        for (product_id, size, quantity) in lines {
            cart.set_quantity(*product_id, size, *quantity)
                .expect("valid test quantity");
        }
        cart
    }

    struct Mocks {
        command: MockOrderCommandRepositoryTrait,
        query: MockOrderQueryRepositoryTrait,
        cart: MockCartRepositoryTrait,
        products: MockProductQueryRepositoryTrait,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                command: MockOrderCommandRepositoryTrait::new(),
                query: MockOrderQueryRepositoryTrait::new(),
                cart: MockCartRepositoryTrait::new(),
                products: MockProductQueryRepositoryTrait::new(),
            }
        }

        async fn service(self) -> OrderCommandService {
            OrderCommandService::new(OrderCommandServiceDeps {
                command: Arc::new(self.command),
                query: Arc::new(self.query),
                cart: Arc::new(self.cart),
                product_query: Arc::new(self.products),
                delivery_fee: 10,
                registry: Arc::new(Mutex::new(Registry::default())),
            })
            .await
        }
    }

    #[tokio::test]
    async fn place_order_prices_on_server_and_skips_missing_products() -> TestResult {
        let mut mocks = Mocks::new();

        let cart = cart_with(&[(1, "M", 2), (2, "L", 1)]);
        mocks
            .cart
            .expect_find_cart()
            .with(eq(7))
            .returning(move |_| Ok(Some(cart.clone())));

        mocks
            .products
            .expect_find_by_ids()
            .returning(|_| Ok(vec![product(1, 150)]));

        mocks
            .command
            .expect_place_order()
            .withf(|order| {
                order.user_id == 7
                    && order.amount == 310
                    && order.items.len() == 1
                    && order.items[0].image.as_deref() == Some("https://cdn.test/1-a.png")
            })
            .times(1)
            .returning(|order| Ok(persisted(order, 11, OrderStatus::OrderPlaced)));

        let response = mocks
            .service()
            .await
            .place_order(7, &request(PaymentMethod::Cod))
            .await?;

        assert_eq!(response.message, "Order Placed");
        assert_eq!(response.data.id, 11);
        assert_eq!(response.data.status, OrderStatus::OrderPlaced);
        assert!(!response.data.payment);
        Ok(())
    }

    #[tokio::test]
    async fn cart_of_only_missing_products_is_empty() {
        let mut mocks = Mocks::new();

        let cart = cart_with(&[(5, "M", 1)]);
        mocks
            .cart
            .expect_find_cart()
            .returning(move |_| Ok(Some(cart.clone())));
        mocks.products.expect_find_by_ids().returning(|_| Ok(vec![]));
        mocks.command.expect_place_order().never();

        let result = mocks
            .service()
            .await
            .place_order(7, &request(PaymentMethod::Cod))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(msgs)) if msgs == ["Cart is empty"]));
    }

    #[tokio::test]
    async fn card_payments_are_unavailable() {
        let mut mocks = Mocks::new();
        mocks.cart.expect_find_cart().never();

        let result = mocks
            .service()
            .await
            .place_order(7, &request(PaymentMethod::Stripe))
            .await;

        assert!(matches!(result, Err(ServiceError::PaymentUnavailable(_))));
    }

    #[tokio::test]
    async fn invalid_address_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.cart.expect_find_cart().never();

        let mut req = request(PaymentMethod::Cod);
        req.address.email = "nope".into();

        let result = mocks.service().await.place_order(7, &req).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn status_moves_forward() -> TestResult {
        let mut mocks = Mocks::new();
        mocks
            .query
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(stored_order(id, OrderStatus::Packing))));
        mocks
            .command
            .expect_update_status()
            .with(eq(3), eq(OrderStatus::Shipped))
            .returning(|id, status| Ok(stored_order(id, status)));

        let response = mocks
            .service()
            .await
            .update_status(3, OrderStatus::Shipped)
            .await?;

        assert_eq!(response.data.status, OrderStatus::Shipped);
        Ok(())
    }

    #[tokio::test]
    async fn status_cannot_move_backwards() {
        let mut mocks = Mocks::new();
        mocks
            .query
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_order(id, OrderStatus::Delivered))));
        mocks.command.expect_update_status().never();

        let result = mocks
            .service()
            .await
            .update_status(3, OrderStatus::Packing)
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.query.expect_find_by_id().returning(|_| Ok(None));

        let result = mocks
            .service()
            .await
            .update_status(404, OrderStatus::Packing)
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
