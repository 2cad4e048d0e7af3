use crate::model::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub cart_count: i64,
    pub created_at: String,
}

// model to response; the password hash never leaves the service layer
impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        UserResponse {
            id: value.user_id,
            cart_count: value.cart_data.total_count(),
            name: value.name,
            email: value.email,
            created_at: value.created_at.to_string(),
        }
    }
}
