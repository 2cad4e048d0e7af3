use crate::model::Product;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub sub_category: String,
    pub sizes: Vec<String>,
    pub images: Vec<String>,
    pub bestseller: bool,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        ProductResponse {
            id: value.product_id,
            name: value.name,
            description: value.description,
            price: value.price,
            category: value.category,
            sub_category: value.sub_category,
            sizes: value.sizes,
            images: value.images,
            bestseller: value.bestseller,
            created_at: value.created_at.to_string(),
        }
    }
}
