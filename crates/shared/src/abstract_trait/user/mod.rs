mod command;
mod query;

pub use self::command::{
    DynUserCommandRepository, MockUserCommandRepositoryTrait, UserCommandRepositoryTrait,
};
pub use self::query::{
    DynUserQueryRepository, DynUserQueryService, MockUserQueryRepositoryTrait,
    MockUserQueryServiceTrait, UserQueryRepositoryTrait, UserQueryServiceTrait,
};
