mod api;
mod cart;
mod order;
mod pagination;
mod product;
mod token;
mod user;

pub use self::api::{ApiResponse, ApiResponsePagination};
pub use self::cart::{CartResponse, CartSummaryResponse};
pub use self::order::OrderResponse;
pub use self::pagination::Pagination;
pub use self::product::ProductResponse;
pub use self::token::TokenResponse;
pub use self::user::UserResponse;
