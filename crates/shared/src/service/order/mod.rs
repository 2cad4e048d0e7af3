mod command;
mod query;

use self::command::{OrderCommandService, OrderCommandServiceDeps};
use self::query::OrderQueryService;
use crate::{
    abstract_trait::{
        DynCartRepository, DynOrderCommandRepository, DynOrderCommandService,
        DynOrderQueryRepository, DynOrderQueryService, DynProductQueryRepository,
    },
    domain::responses::OrderResponse,
    errors::ServiceError,
    model::Order as OrderModel,
};
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct OrderService {
    pub query: DynOrderQueryService,
    pub command: DynOrderCommandService,
}

pub struct OrderServiceDeps {
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub cart: DynCartRepository,
    pub product_query: DynProductQueryRepository,
    pub delivery_fee: i64,
    pub registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for OrderService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderService")
            .field("query", &"Arc<dyn OrderQueryServiceTrait>")
            .field("command", &"Arc<dyn OrderCommandServiceTrait>")
            .finish()
    }
}

impl OrderService {
    pub async fn new(deps: OrderServiceDeps) -> Self {
        let OrderServiceDeps {
            query,
            command,
            cart,
            product_query,
            delivery_fee,
            registry,
        } = deps;

        let query_service = Arc::new(OrderQueryService::new(query.clone(), registry.clone()).await)
            as DynOrderQueryService;

        let command_deps = OrderCommandServiceDeps {
            command,
            query,
            cart,
            product_query,
            delivery_fee,
            registry,
        };

        let command_service =
            Arc::new(OrderCommandService::new(command_deps).await) as DynOrderCommandService;

        Self {
            query: query_service,
            command: command_service,
        }
    }
}

fn to_responses(orders: Vec<OrderModel>) -> Result<Vec<OrderResponse>, ServiceError> {
    orders.into_iter().map(OrderResponse::try_from).collect()
}
