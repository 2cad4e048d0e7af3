use crate::{
    config::{Claims, Role},
    errors::ServiceError,
};
use mockall::automock;
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

#[automock]
pub trait JwtServiceTrait {
    fn generate_token(&self, subject: &str, role: Role) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str) -> Result<Claims, ServiceError>;
}
