mod auth;
mod cart;
mod order;
mod product;
mod user;

pub use self::auth::{AuthService, AuthServiceDeps};
pub use self::cart::{CartService, CartServiceDeps};
pub use self::order::{OrderService, OrderServiceDeps};
pub use self::product::{ProductService, ProductServiceDeps};
pub use self::user::UserService;
