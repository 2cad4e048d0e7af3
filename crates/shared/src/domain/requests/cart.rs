use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    #[serde(alias = "itemId")]
    #[validate(range(min = 1, message = "Product ID is required"))]
    #[schema(example = 1)]
    pub item_id: i32,

    #[validate(length(min = 1, message = "Select Product Size"))]
    #[schema(example = "M")]
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCartRequest {
    #[serde(alias = "itemId")]
    #[validate(range(min = 1, message = "Product ID is required"))]
    #[schema(example = 1)]
    pub item_id: i32,

    #[validate(length(min = 1, message = "Size is required"))]
    #[schema(example = "M")]
    pub size: String,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[schema(example = 2)]
    pub quantity: i32,
}
