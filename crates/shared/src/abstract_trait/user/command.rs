use crate::{
    domain::requests::CreateUserRequest, errors::RepositoryError, model::User as UserModel,
};
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;

pub type DynUserCommandRepository = Arc<dyn UserCommandRepositoryTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait UserCommandRepositoryTrait {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<UserModel, RepositoryError>;
}
