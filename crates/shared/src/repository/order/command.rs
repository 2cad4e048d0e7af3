use crate::{
    abstract_trait::OrderCommandRepositoryTrait,
    config::ConnectionPool,
    domain::{order::OrderStatus, requests::NewOrder},
    errors::RepositoryError,
    model::Order as OrderModel,
};
use async_trait::async_trait;
use sqlx::{Postgres, types::Json};
use tracing::{error, info};

const ORDER_COLUMNS: &str =
    "order_id, user_id, items, address, amount, payment_method, payment, status, created_at";

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn place_order(&self, order: &NewOrder) -> Result<OrderModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        let sql = format!(
            r#"
            INSERT INTO orders (user_id, items, address, amount, payment_method, payment, status, created_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, current_timestamp)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<Postgres, OrderModel>(&sql)
            .bind(order.user_id)
            .bind(Json(&order.items))
            .bind(Json(&order.address))
            .bind(order.amount)
            .bind(order.payment_method.as_str())
            .bind(OrderStatus::OrderPlaced.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create order for user {}: {:?}",
                    order.user_id, err
                );
                RepositoryError::from(err)
            })?;

        sqlx::query::<Postgres>("UPDATE users SET cart_data = '{}'::jsonb WHERE user_id = $1")
            .bind(order.user_id)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to clear cart for user {}: {:?}",
                    order.user_id, err
                );
                RepositoryError::from(err)
            })?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit order transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!(
            "✅ Created order ID {} for user {} (amount {})",
            result.order_id, result.user_id, result.amount
        );
        Ok(result)
    }

    async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE orders
            SET status = $2
            WHERE order_id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<Postgres, OrderModel>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update status of order {}: {:?}", id, err);
                RepositoryError::from(err)
            })?
            .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Order ID {} is now {}", order.order_id, order.status);
        Ok(order)
    }
}
