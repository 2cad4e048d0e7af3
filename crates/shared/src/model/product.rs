use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub sub_category: String,
    pub sizes: Vec<String>,
    pub images: Vec<String>,
    pub bestseller: bool,
    pub created_at: NaiveDateTime,
}

impl Product {
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }
}
