mod command;
mod query;

pub use self::command::{
    DynProductCommandRepository, DynProductCommandService, MockProductCommandRepositoryTrait,
    MockProductCommandServiceTrait, ProductCommandRepositoryTrait, ProductCommandServiceTrait,
};
pub use self::query::{
    DynProductQueryRepository, DynProductQueryService, MockProductQueryRepositoryTrait,
    MockProductQueryServiceTrait, ProductQueryRepositoryTrait, ProductQueryServiceTrait,
};
