use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[schema(example = "Asha Rao")]
    pub name: String,

    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "asha@example.com")]
    pub email: String,

    #[validate(length(min = 8, message = "Please enter a strong password"))]
    #[schema(example = "correct-horse-battery")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "asha@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
