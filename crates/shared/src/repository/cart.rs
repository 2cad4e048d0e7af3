use async_trait::async_trait;
use sqlx::{Postgres, types::Json};
use tracing::{error, info};

use crate::{
    abstract_trait::CartRepositoryTrait, config::ConnectionPool, domain::cart::CartData,
    errors::RepositoryError,
};

/// Reads and writes the cart map embedded in the `users` row.
pub struct CartRepository {
    db_pool: ConnectionPool,
}

impl CartRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CartRepositoryTrait for CartRepository {
    async fn find_cart(&self, user_id: i32) -> Result<Option<CartData>, RepositoryError> {
        let mut conn = self.db_pool.acquire().await.map_err(|e| {
            error!("Failed to acquire DB connection: {}", e);
            RepositoryError::from(e)
        })?;

        let row: Option<(Json<CartData>,)> =
            sqlx::query_as::<Postgres, (Json<CartData>,)>(
                "SELECT cart_data FROM users WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("Failed to load cart for user_id={}: {}", user_id, e);
                RepositoryError::from(e)
            })?;

        Ok(row.map(|(cart,)| cart.0))
    }

    async fn save_cart(&self, user_id: i32, cart: &CartData) -> Result<(), RepositoryError> {
        let mut conn = self.db_pool.acquire().await.map_err(|e| {
            error!("Failed to acquire DB connection: {}", e);
            RepositoryError::from(e)
        })?;

        let result = sqlx::query::<Postgres>("UPDATE users SET cart_data = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(Json(cart))
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("Failed to save cart for user_id={}: {}", user_id, e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(
            "Saved cart for user_id={} ({} units)",
            user_id,
            cart.total_count()
        );
        Ok(())
    }
}
