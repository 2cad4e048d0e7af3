use crate::{
    abstract_trait::{DynUserQueryRepository, UserQueryServiceTrait},
    domain::{
        requests::FindAllUsers,
        responses::{ApiResponsePagination, Pagination, UserResponse},
    },
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use validator::Validate;

pub struct UserQueryService {
    query: DynUserQueryRepository,
    metrics: Metrics,
}

impl UserQueryService {
    pub async fn new(query: DynUserQueryRepository, registry: Arc<Mutex<Registry>>) -> Self {
        let metrics = Metrics::new();
        metrics.register(
            &mut *registry.lock().await,
            "user_query_service",
            "UserQueryService",
        );

        Self { query, metrics }
    }
}

#[async_trait]
impl UserQueryServiceTrait for UserQueryService {
    async fn find_all(
        &self,
        req: &FindAllUsers,
    ) -> Result<ApiResponsePagination<Vec<UserResponse>>, ServiceError> {
        info!(
            "👥 Listing users page {} (size {}), search {:?}",
            req.page, req.page_size, req.search
        );

        let method = Method::Get;
        let tracing_ctx = TracingContext::start("user", "FindAllUsers");

        if let Err(errors) = req.validate() {
            tracing_ctx.complete_error(&self.metrics, method, "Invalid pagination");
            return Err(ServiceError::from(errors));
        }

        let (users, total) = match self.query.find_all(req).await {
            Ok(result) => result,
            Err(err) => {
                error!("❌ Failed to fetch users: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to fetch users");
                return Err(ServiceError::Repo(err));
            }
        };

        let data = users.into_iter().map(UserResponse::from).collect();

        tracing_ctx.complete_success(&self.metrics, method, "Users retrieved");

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: "Users retrieved successfully".to_string(),
            data,
            pagination: Pagination::new(req.page, req.page_size, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::MockUserQueryRepositoryTrait, domain::cart::CartData, model::User,
    };
    use sqlx::types::Json;
    use testresult::TestResult;

    #[tokio::test]
    async fn users_are_listed_without_passwords() -> TestResult {
        let mut cart = CartData::new();
        cart.add_item(3, "M")?;
        cart.add_item(3, "M")?;

        let mut repo = MockUserQueryRepositoryTrait::new();
        repo.expect_find_all()
            .withf(|req| req.search == "asha")
            .returning(move |_| {
                Ok((
                    vec![User {
                        user_id: 1,
                        name: "Asha".into(),
                        email: "asha@example.com".into(),
                        password: "bcrypt-hash".into(),
                        cart_data: Json(cart.clone()),
                        created_at: chrono::NaiveDateTime::default(),
                    }],
                    1,
                ))
            });

        let service =
            UserQueryService::new(Arc::new(repo), Arc::new(Mutex::new(Registry::default()))).await;

        let response = service
            .find_all(&FindAllUsers {
                page: 1,
                page_size: 10,
                search: "asha".into(),
            })
            .await?;

        assert_eq!(response.pagination.total_items, 1);
        assert_eq!(response.data[0].cart_count, 2);

        let json = serde_json::to_string(&response)?;
        assert!(!json.contains("bcrypt-hash"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_trailing_page_reports_total() -> TestResult {
        let mut repo = MockUserQueryRepositoryTrait::new();
        repo.expect_find_all().returning(|_| Ok((vec![], 21)));

        let service =
            UserQueryService::new(Arc::new(repo), Arc::new(Mutex::new(Registry::default()))).await;

        let response = service
            .find_all(&FindAllUsers {
                page: 4,
                page_size: 10,
                search: String::new(),
            })
            .await?;

        assert!(response.data.is_empty());
        assert_eq!(response.pagination.total_items, 21);
        assert_eq!(response.pagination.total_pages, 3);
        Ok(())
    }
}
