mod query;

use self::query::UserQueryService;
use crate::abstract_trait::{DynUserQueryRepository, DynUserQueryService};
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

/// Admin-facing user directory. Account creation lives in the auth service.
#[derive(Clone)]
pub struct UserService {
    pub query: DynUserQueryService,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService")
            .field("query", &"Arc<dyn UserQueryServiceTrait>")
            .finish()
    }
}

impl UserService {
    pub async fn new(query: DynUserQueryRepository, registry: Arc<Mutex<Registry>>) -> Self {
        let query_service =
            Arc::new(UserQueryService::new(query, registry).await) as DynUserQueryService;

        Self {
            query: query_service,
        }
    }
}
