mod command;
mod query;

pub use self::command::{
    DynOrderCommandRepository, DynOrderCommandService, MockOrderCommandRepositoryTrait,
    MockOrderCommandServiceTrait, OrderCommandRepositoryTrait, OrderCommandServiceTrait,
};
pub use self::query::{
    DynOrderQueryRepository, DynOrderQueryService, MockOrderQueryRepositoryTrait,
    MockOrderQueryServiceTrait, OrderQueryRepositoryTrait, OrderQueryServiceTrait,
};
