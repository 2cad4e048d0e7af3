use crate::{
    abstract_trait::UserQueryRepositoryTrait, config::ConnectionPool,
    domain::requests::FindAllUsers, errors::RepositoryError, model::User as UserModel,
    repository::escape_like,
};
use async_trait::async_trait;
use sqlx::Postgres;
use tracing::{error, info};

const USER_SEARCH_FILTER: &str = r#"
            WHERE ($1::TEXT IS NULL
                   OR name ILIKE '%' || $1 || '%' ESCAPE '\'
                   OR email ILIKE '%' || $1 || '%' ESCAPE '\')
"#;

pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllUsers,
    ) -> Result<(Vec<UserModel>, i64), RepositoryError> {
        info!("🔍 Fetching users with search: {:?}", req.search);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = i64::from(req.page_size);
        let offset = i64::from((req.page - 1).max(0)) * limit;

        let search_pattern = match req.search.trim() {
            "" => None,
            term => Some(escape_like(term)),
        };

        let sql = format!(
            r#"
            SELECT user_id, name, email, password, cart_data, created_at
            FROM users
            {USER_SEARCH_FILTER}
            ORDER BY created_at DESC, user_id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let users = sqlx::query_as::<Postgres, UserModel>(&sql)
            .bind(search_pattern.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch users: {:?}", e);
                RepositoryError::from(e)
            })?;

        let count_sql = format!("SELECT COUNT(*) FROM users {USER_SEARCH_FILTER}");

        let total: i64 = sqlx::query_scalar::<Postgres, i64>(&count_sql)
            .bind(search_pattern.as_deref())
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to count users: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((users, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let user = sqlx::query_as::<Postgres, UserModel>(
            r#"
            SELECT user_id, name, email, password, cart_data, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch user {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let user = sqlx::query_as::<Postgres, UserModel>(
            r#"
            SELECT user_id, name, email, password, cart_data, created_at
            FROM users
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch user by email: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(user)
    }
}
