mod auth;
mod cache;
mod cart;
mod hashing;
mod image;
mod jwt;
mod order;
mod product;
mod user;

pub use self::auth::{AuthServiceTrait, DynAuthService, MockAuthServiceTrait};
pub use self::cache::{CacheStoreTrait, DynCacheStore, MockCacheStoreTrait};
pub use self::cart::{
    CartRepositoryTrait, CartServiceTrait, DynCartRepository, DynCartService,
    MockCartRepositoryTrait, MockCartServiceTrait,
};
pub use self::hashing::{DynHashing, HashingTrait, MockHashingTrait};
pub use self::image::{DynImageUploader, ImageUploaderTrait, MockImageUploaderTrait};
pub use self::jwt::{DynJwtService, JwtServiceTrait, MockJwtServiceTrait};
pub use self::order::{
    DynOrderCommandRepository, DynOrderCommandService, DynOrderQueryRepository,
    DynOrderQueryService, MockOrderCommandRepositoryTrait, MockOrderCommandServiceTrait,
    MockOrderQueryRepositoryTrait, MockOrderQueryServiceTrait, OrderCommandRepositoryTrait,
    OrderCommandServiceTrait, OrderQueryRepositoryTrait, OrderQueryServiceTrait,
};
pub use self::product::{
    DynProductCommandRepository, DynProductCommandService, DynProductQueryRepository,
    DynProductQueryService, MockProductCommandRepositoryTrait, MockProductCommandServiceTrait,
    MockProductQueryRepositoryTrait, MockProductQueryServiceTrait, ProductCommandRepositoryTrait,
    ProductCommandServiceTrait, ProductQueryRepositoryTrait, ProductQueryServiceTrait,
};
pub use self::user::{
    DynUserCommandRepository, DynUserQueryRepository, DynUserQueryService,
    MockUserCommandRepositoryTrait, MockUserQueryRepositoryTrait, MockUserQueryServiceTrait,
    UserCommandRepositoryTrait, UserQueryRepositoryTrait, UserQueryServiceTrait,
};
