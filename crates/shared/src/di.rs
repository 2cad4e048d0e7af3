use crate::{
    abstract_trait::{
        DynAuthService, DynCacheStore, DynCartRepository, DynCartService, DynHashing,
        DynImageUploader, DynJwtService,
    },
    config::{AdminCredentials, ConnectionPool},
    repository::{CartRepository, OrderRepository, ProductRepository, UserRepository},
    service::{
        AuthService, AuthServiceDeps, CartService, CartServiceDeps, OrderService,
        OrderServiceDeps, ProductService, ProductServiceDeps, UserService,
    },
};
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: DynAuthService,
    pub cart_service: DynCartService,
    pub product_service: ProductService,
    pub order_service: OrderService,
    pub user_service: UserService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"<AuthService>")
            .field("cart_service", &"<CartService>")
            .field("product_service", &"<ProductService>")
            .field("order_service", &"<OrderService>")
            .field("user_service", &"<UserService>")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub hash: DynHashing,
    pub jwt_config: DynJwtService,
    pub uploader: DynImageUploader,
    pub admin: AdminCredentials,
    pub delivery_fee: i64,
    pub registry: Arc<Mutex<Registry>>,
    pub cache: DynCacheStore,
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps) -> Self {
        let DependenciesInjectDeps {
            pool,
            hash,
            jwt_config,
            uploader,
            admin,
            delivery_fee,
            registry,
            cache,
        } = deps;

        let user_repository = UserRepository::new(pool.clone());
        let product_repository = ProductRepository::new(pool.clone());
        let order_repository = OrderRepository::new(pool.clone());
        let cart_repository = Arc::new(CartRepository::new(pool.clone())) as DynCartRepository;

        let auth_deps = AuthServiceDeps {
            hash,
            jwt: jwt_config,
            user_query: user_repository.query.clone(),
            user_command: user_repository.command.clone(),
            admin,
            cache_store: cache.clone(),
            registry: registry.clone(),
        };

        let auth_service = Arc::new(AuthService::new(auth_deps).await) as DynAuthService;

        let cart_deps = CartServiceDeps {
            cart: cart_repository.clone(),
            product_query: product_repository.query.clone(),
            delivery_fee,
            registry: registry.clone(),
        };

        let cart_service = Arc::new(CartService::new(cart_deps).await) as DynCartService;

        let product_deps = ProductServiceDeps {
            query: product_repository.query.clone(),
            command: product_repository.command.clone(),
            uploader,
            registry: registry.clone(),
            cache_store: cache.clone(),
        };

        let product_service = ProductService::new(product_deps).await;

        let order_deps = OrderServiceDeps {
            query: order_repository.query.clone(),
            command: order_repository.command.clone(),
            cart: cart_repository,
            product_query: product_repository.query.clone(),
            delivery_fee,
            registry: registry.clone(),
        };

        let order_service = OrderService::new(order_deps).await;

        let user_service = UserService::new(user_repository.query, registry).await;

        Self {
            auth_service,
            cart_service,
            product_service,
            order_service,
            user_service,
        }
    }
}
