use crate::{
    abstract_trait::OrderQueryRepositoryTrait, config::ConnectionPool,
    domain::requests::FindAllOrders, errors::RepositoryError, model::Order as OrderModel,
};
use async_trait::async_trait;
use sqlx::Postgres;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!("🔍 Fetching orders with status filter: {:?}", req.status);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = i64::from(req.page_size);
        let offset = i64::from((req.page - 1).max(0)) * limit;
        let status = req.status.map(|s| s.as_str());

        let orders = sqlx::query_as::<Postgres, OrderModel>(
            r#"
            SELECT
                o.order_id,
                o.user_id,
                o.items,
                o.address,
                o.amount,
                o.payment_method,
                o.payment,
                o.status,
                o.created_at
            FROM orders o
            WHERE ($1::TEXT IS NULL OR o.status = $1)
            ORDER BY o.created_at DESC, o.order_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        // counted separately so pages past the end still report the real total
        let total: i64 = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM orders o
            WHERE ($1::TEXT IS NULL OR o.status = $1)
            "#,
        )
        .bind(status)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to count orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok((orders, total))
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderModel>, RepositoryError> {
        info!("📦 Fetching orders for user {}", user_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let orders = sqlx::query_as::<Postgres, OrderModel>(
            r#"
            SELECT order_id, user_id, items, address, amount, payment_method, payment, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, order_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders for user {}: {:?}", user_id, e);
            RepositoryError::from(e)
        })?;

        Ok(orders)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<Postgres, OrderModel>(
            r#"
            SELECT order_id, user_id, items, address, amount, payment_method, payment, status, created_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        Ok(order)
    }
}
