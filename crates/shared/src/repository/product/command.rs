use crate::{
    abstract_trait::ProductCommandRepositoryTrait, config::ConnectionPool,
    domain::requests::CreateProductRequest, errors::RepositoryError,
    model::Product as ProductModel,
};
use async_trait::async_trait;
use sqlx::Postgres;
use tracing::{error, info};

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        product: &CreateProductRequest,
        images: &[String],
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<Postgres, ProductModel>(
            r#"
            INSERT INTO products
                (name, description, price, category, sub_category, sizes, images, bestseller, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, current_timestamp)
            RETURNING product_id, name, description, price, category, sub_category,
                      sizes, images, bestseller, created_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.sizes)
        .bind(images)
        .bind(product.bestseller)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product {}: {:?}", product.name, err);
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Created product ID {} ({})",
            result.product_id, result.name
        );
        Ok(result)
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        info!("❌ Deleting product: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query::<Postgres>("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete product {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("✅ Product ID {} deleted", id);
        Ok(())
    }
}
