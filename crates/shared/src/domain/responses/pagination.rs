use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: i32,
    pub page_size: i32,
    pub total_items: i64,
    pub total_pages: i32,
}

impl Pagination {
    pub fn new(page: i32, page_size: i32, total_items: i64) -> Self {
        let size = i64::from(page_size.max(1));
        let total_pages = i32::try_from((total_items + size - 1) / size).unwrap_or(i32::MAX);

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
