use crate::{
    abstract_trait::UserCommandRepositoryTrait, config::ConnectionPool,
    domain::requests::CreateUserRequest, errors::RepositoryError, model::User as UserModel,
};
use async_trait::async_trait;
use sqlx::Postgres;
use tracing::{error, info};

pub struct UserCommandRepository {
    db: ConnectionPool,
}

impl UserCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for UserCommandRepository {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<UserModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let user = sqlx::query_as::<Postgres, UserModel>(
            r#"
            INSERT INTO users (name, email, password, cart_data, created_at)
            VALUES ($1, LOWER($2), $3, '{}'::jsonb, CURRENT_TIMESTAMP)
            RETURNING user_id, name, email, password, cart_data, created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.password)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to create user {}: {:?}", req.email, e);
            RepositoryError::from_unique(e, "User already exists")
        })?;

        info!("✅ Created user ID {}", user.user_id);
        Ok(user)
    }
}
