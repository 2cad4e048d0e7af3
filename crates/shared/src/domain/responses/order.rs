use crate::{
    domain::order::{Address, OrderItem, OrderStatus, PaymentMethod},
    errors::ServiceError,
    model::Order,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<OrderItem>,
    pub address: Address,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub payment: bool,
    pub status: OrderStatus,
    pub created_at: String,
}

// model to response; status and method are stored as text
impl TryFrom<Order> for OrderResponse {
    type Error = ServiceError;

    fn try_from(value: Order) -> Result<Self, Self::Error> {
        Ok(OrderResponse {
            id: value.order_id,
            user_id: value.user_id,
            status: value
                .status
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Corrupt order row: {e}")))?,
            payment_method: value
                .payment_method
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Corrupt order row: {e}")))?,
            items: value.items.0,
            address: value.address.0,
            amount: value.amount,
            payment: value.payment,
            created_at: value.created_at.to_string(),
        })
    }
}
