use crate::{
    abstract_trait::ProductQueryRepositoryTrait, config::ConnectionPool,
    domain::requests::FindAllProducts, errors::RepositoryError, model::Product as ProductModel,
    repository::escape_like,
};
use async_trait::async_trait;
use sqlx::Postgres;
use tracing::{error, info};

const PRODUCT_COLUMNS: &str = "product_id, name, description, price, category, sub_category, \
                               sizes, images, bestseller, created_at";

pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(&self, req: &FindAllProducts) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🔍 Fetching products with filters: {:?}", req);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        // ORDER BY comes from a closed set of static fragments
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%' ESCAPE '\')
              AND ($2::TEXT IS NULL OR category = $2)
              AND ($3::TEXT IS NULL OR sub_category = $3)
              AND ($4::BOOLEAN IS NULL OR bestseller = $4)
            ORDER BY {}
            "#,
            req.sort.order_by()
        );

        let products = sqlx::query_as::<Postgres, ProductModel>(&sql)
            .bind(non_blank(&req.search).map(escape_like))
            .bind(non_blank(&req.category))
            .bind(non_blank(&req.sub_category))
            .bind(req.bestseller)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products: {:?}", e);
                RepositoryError::from(e)
            })?;

        info!("✅ Found {} products", products.len());
        Ok(products)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1");

        let product = sqlx::query_as::<Postgres, ProductModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch product {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        Ok(product)
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductModel>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ANY($1)");

        let products = sqlx::query_as::<Postgres, ProductModel>(&sql)
            .bind(ids)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products {:?}: {:?}", ids, e);
                RepositoryError::from(e)
            })?;

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(non_blank(&None), None);
        assert_eq!(non_blank(&Some("   ".into())), None);
        assert_eq!(non_blank(&Some(" Men ".into())), Some("Men"));
    }
}
