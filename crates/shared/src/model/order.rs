use crate::domain::order::{Address, OrderItem};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub user_id: i32,
    pub items: Json<Vec<OrderItem>>,
    pub address: Json<Address>,
    pub amount: i64,
    pub payment_method: String,
    pub payment: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
}
