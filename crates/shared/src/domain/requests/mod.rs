mod auth;
mod cart;
mod order;
mod product;
mod user;

pub use self::auth::{LoginRequest, RegisterRequest};
pub use self::cart::{AddToCartRequest, UpdateCartRequest};
pub use self::order::{FindAllOrders, NewOrder, PlaceOrderRequest, UpdateOrderStatusRequest};
pub use self::product::{CreateProductRequest, FindAllProducts, ImageFile, ProductSort};
pub use self::user::{CreateUserRequest, FindAllUsers};
