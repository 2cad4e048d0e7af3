use crate::domain::cart::CartData;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    /// `product_id -> size -> quantity`
    #[schema(value_type = Object, example = json!({"12": {"M": 2, "L": 1}}))]
    pub cart_data: CartData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartSummaryResponse {
    pub item_count: i64,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
}
