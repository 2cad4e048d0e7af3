use crate::{
    abstract_trait::{
        AuthServiceTrait, DynCacheStore, DynHashing, DynJwtService, DynUserCommandRepository,
        DynUserQueryRepository,
    },
    cache::{get_json, set_json},
    config::{AdminCredentials, Role},
    domain::{
        requests::{CreateUserRequest, LoginRequest, RegisterRequest},
        responses::{ApiResponse, TokenResponse, UserResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, TracingContext},
};
use async_trait::async_trait;
use chrono::Duration;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const MAX_LOGIN_ATTEMPTS: i32 = 5;

#[derive(Clone)]
pub struct AuthServiceDeps {
    pub hash: DynHashing,
    pub jwt: DynJwtService,
    pub user_query: DynUserQueryRepository,
    pub user_command: DynUserCommandRepository,
    pub admin: AdminCredentials,
    pub cache_store: DynCacheStore,
    pub registry: Arc<Mutex<Registry>>,
}

pub struct AuthService {
    hash: DynHashing,
    jwt: DynJwtService,
    user_query: DynUserQueryRepository,
    user_command: DynUserCommandRepository,
    admin: AdminCredentials,
    cache_store: DynCacheStore,
    metrics: Metrics,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn login_attempts_key(email: &str) -> String {
    format!("auth:login_attempts:{email}")
}

impl AuthService {
    pub async fn new(deps: AuthServiceDeps) -> Self {
        let metrics = Metrics::new();
        metrics.register(&mut *deps.registry.lock().await, "auth_service", "AuthService");

        Self {
            hash: deps.hash,
            jwt: deps.jwt,
            user_query: deps.user_query,
            user_command: deps.user_command,
            admin: deps.admin,
            cache_store: deps.cache_store,
            metrics,
        }
    }

    async fn record_failed_login(&self, key: &str, current_attempts: i32) {
        set_json(
            &self.cache_store,
            key,
            &(current_attempts + 1),
            Duration::minutes(15),
        )
        .await;
    }

    fn issue_token(&self, subject: &str, role: Role) -> Result<TokenResponse, ServiceError> {
        let token = self.jwt.generate_token(subject, role)?;
        Ok(TokenResponse { token })
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let email = normalize_email(&req.email);
        info!("📝 Registering user: {email}");

        let method = Method::Post;
        let tracing_ctx = TracingContext::start("auth", "Register");

        match self.user_query.find_by_email(&email).await {
            Ok(Some(_)) => {
                error!("❌ Email already registered: {email}");
                tracing_ctx.complete_error(&self.metrics, method, "User already exists");
                return Err(ServiceError::Repo(RepositoryError::AlreadyExists(
                    "User already exists".to_string(),
                )));
            }
            Ok(None) => {}
            Err(err) => {
                tracing_ctx.complete_error(&self.metrics, method, "Database error");
                return Err(ServiceError::Repo(err));
            }
        }

        let hashed = match self.hash.hash_password(&req.password).await {
            Ok(hashed) => hashed,
            Err(e) => {
                error!("❌ Failed to hash password: {e:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to hash password");
                return Err(e);
            }
        };

        let new_user = CreateUserRequest {
            name: req.name.trim().to_string(),
            email,
            password: hashed,
        };

        let user = match self.user_command.create_user(&new_user).await {
            Ok(user) => user,
            Err(err) => {
                error!("❌ Failed to create user: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to create user");
                return Err(ServiceError::Repo(err));
            }
        };

        let token = match self.issue_token(&user.user_id.to_string(), Role::User) {
            Ok(token) => token,
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Failed to generate token");
                return Err(e);
            }
        };

        tracing_ctx.complete_success(&self.metrics, method, "User registered");

        Ok(ApiResponse::success("User registered successfully", token))
    }

    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let email = normalize_email(&req.email);
        info!("🔐 Attempting login for email: {email}");

        let method = Method::Post;
        let tracing_ctx = TracingContext::start("auth", "Login");

        let attempts_key = login_attempts_key(&email);
        let current_attempts = get_json::<i32>(&self.cache_store, &attempts_key)
            .await
            .unwrap_or(0);

        if current_attempts >= MAX_LOGIN_ATTEMPTS {
            let msg = "Too many failed login attempts";
            warn!("❌ {msg}: {email}");
            tracing_ctx.complete_error(&self.metrics, method, msg);
            return Err(ServiceError::Forbidden(
                "Too many failed attempts. Try again later.".to_string(),
            ));
        }

        let user = match self.user_query.find_by_email(&email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                error!("❌ User not found: {email}");
                tracing_ctx.complete_error(&self.metrics, method, "User not found");
                return Err(ServiceError::NotFound("User doesn't exist".to_string()));
            }
            Err(err) => {
                error!("❌ Failed to query user: {err}");
                tracing_ctx.complete_error(&self.metrics, method, "Database error");
                return Err(ServiceError::Repo(err));
            }
        };

        if let Err(e) = self.hash.compare_password(&user.password, &req.password).await {
            error!("❌ Invalid password for user: {email}");
            if matches!(e, ServiceError::InvalidCredentials) {
                self.record_failed_login(&attempts_key, current_attempts)
                    .await;
            }
            tracing_ctx.complete_error(&self.metrics, method, "Invalid password");
            return Err(e);
        }

        self.cache_store.delete_from_cache(&attempts_key).await;

        let token = match self.issue_token(&user.user_id.to_string(), Role::User) {
            Ok(token) => token,
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Failed to generate token");
                return Err(e);
            }
        };

        tracing_ctx.complete_success(&self.metrics, method, "Login successful");

        Ok(ApiResponse::success("Login successful", token))
    }

    async fn admin_login(
        &self,
        req: &LoginRequest,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let email = normalize_email(&req.email);
        info!("🛡️ Admin login attempt for {email}");

        let method = Method::Post;
        let tracing_ctx = TracingContext::start("auth", "AdminLogin");

        if email != normalize_email(&self.admin.email) || req.password != self.admin.password {
            tracing_ctx.complete_error(&self.metrics, method, "Invalid admin credentials");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = match self.issue_token(&email, Role::Admin) {
            Ok(token) => token,
            Err(e) => {
                tracing_ctx.complete_error(&self.metrics, method, "Failed to generate token");
                return Err(e);
            }
        };

        tracing_ctx.complete_success(&self.metrics, method, "Admin login successful");

        Ok(ApiResponse::success("Admin login successful", token))
    }

    async fn get_me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = TracingContext::start("auth", "GetMe");

        let user = match self.user_query.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing_ctx.complete_error(&self.metrics, method, "User not found");
                return Err(ServiceError::NotFound("User not found".to_string()));
            }
            Err(err) => {
                tracing_ctx.complete_error(&self.metrics, method, "Database error");
                return Err(ServiceError::Repo(err));
            }
        };

        tracing_ctx.complete_success(&self.metrics, method, "User fetched");

        Ok(ApiResponse::success(
            "User fetched successfully",
            UserResponse::from(user),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            MockCacheStoreTrait, MockHashingTrait, MockJwtServiceTrait,
            MockUserCommandRepositoryTrait, MockUserQueryRepositoryTrait,
        },
        cache::idle_cache,
        domain::cart::CartData,
        model::User,
    };
    use mockall::predicate::eq;
    use sqlx::types::Json;
    use testresult::TestResult;

    fn user(id: i32, email: &str) -> User {
        User {
            user_id: id,
            name: "Asha".into(),
            email: email.into(),
            password: "hashed".into(),
            cart_data: Json(CartData::new()),
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    async fn service(
        hash: MockHashingTrait,
        jwt: MockJwtServiceTrait,
        query: MockUserQueryRepositoryTrait,
        command: MockUserCommandRepositoryTrait,
    ) -> AuthService {
        service_with_cache(hash, jwt, query, command, idle_cache()).await
    }

    async fn service_with_cache(
        hash: MockHashingTrait,
        jwt: MockJwtServiceTrait,
        query: MockUserQueryRepositoryTrait,
        command: MockUserCommandRepositoryTrait,
        cache: MockCacheStoreTrait,
    ) -> AuthService {
        AuthService::new(AuthServiceDeps {
            hash: Arc::new(hash),
            jwt: Arc::new(jwt),
            user_query: Arc::new(query),
            user_command: Arc::new(command),
            admin: AdminCredentials {
                email: "admin@shop.test".into(),
                password: "admin-pass".into(),
            },
            cache_store: Arc::new(cache),
            registry: Arc::new(Mutex::new(Registry::default())),
        })
        .await
    }

    #[tokio::test]
    async fn register_hashes_and_issues_user_token() -> TestResult {
        let mut query = MockUserQueryRepositoryTrait::new();
        query
            .expect_find_by_email()
            .with(eq("asha@example.com"))
            .returning(|_| Ok(None));

        let mut hash = MockHashingTrait::new();
        hash.expect_hash_password()
            .returning(|_| Ok("bcrypt-hash".to_string()));

        let mut command = MockUserCommandRepositoryTrait::new();
        command
            .expect_create_user()
            .withf(|req| req.email == "asha@example.com" && req.password == "bcrypt-hash")
            .returning(|req| Ok(user(9, &req.email)));

        let mut jwt = MockJwtServiceTrait::new();
        jwt.expect_generate_token()
            .withf(|sub, role| sub == "9" && *role == Role::User)
            .returning(|_, _| Ok("token-9".to_string()));

        let svc = service(hash, jwt, query, command).await;
        let response = svc
            .register(&RegisterRequest {
                name: " Asha ".into(),
                email: "Asha@Example.com".into(),
                password: "long-enough".into(),
            })
            .await?;

        assert_eq!(response.status, "success");
        assert_eq!(response.data.token, "token-9");
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let mut query = MockUserQueryRepositoryTrait::new();
        query
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(1, email))));

        let svc = service(
            MockHashingTrait::new(),
            MockJwtServiceTrait::new(),
            query,
            MockUserCommandRepositoryTrait::new(),
        )
        .await;

        let result = svc
            .register(&RegisterRequest {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                password: "long-enough".into(),
            })
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::AlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn login_unknown_user_is_not_found() {
        let mut query = MockUserQueryRepositoryTrait::new();
        query.expect_find_by_email().returning(|_| Ok(None));

        let mut cache = MockCacheStoreTrait::new();
        cache.expect_get_from_cache().returning(|_| None);
        cache.expect_set_to_cache().never();

        let svc = service_with_cache(
            MockHashingTrait::new(),
            MockJwtServiceTrait::new(),
            query,
            MockUserCommandRepositoryTrait::new(),
            cache,
        )
        .await;

        let result = svc
            .login(&LoginRequest {
                email: "ghost@example.com".into(),
                password: "whatever".into(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound(msg)) if msg == "User doesn't exist"));
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let mut query = MockUserQueryRepositoryTrait::new();
        query
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(3, email))));

        let mut hash = MockHashingTrait::new();
        hash.expect_compare_password()
            .returning(|_, _| Err(ServiceError::InvalidCredentials));

        let svc = service(
            hash,
            MockJwtServiceTrait::new(),
            query,
            MockUserCommandRepositoryTrait::new(),
        )
        .await;

        let result = svc
            .login(&LoginRequest {
                email: "asha@example.com".into(),
                password: "wrong".into(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn wrong_password_increments_attempt_counter() {
        let mut query = MockUserQueryRepositoryTrait::new();
        query
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(3, email))));

        let mut hash = MockHashingTrait::new();
        hash.expect_compare_password()
            .returning(|_, _| Err(ServiceError::InvalidCredentials));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_get_from_cache()
            .with(eq("auth:login_attempts:asha@example.com"))
            .returning(|_| Some("2".to_string()));
        cache
            .expect_set_to_cache()
            .withf(|key, value, ttl| {
                key == "auth:login_attempts:asha@example.com"
                    && value == "3"
                    && *ttl == Duration::minutes(15)
            })
            .times(1)
            .return_const(());

        let svc = service_with_cache(
            hash,
            MockJwtServiceTrait::new(),
            query,
            MockUserCommandRepositoryTrait::new(),
            cache,
        )
        .await;

        let result = svc
            .login(&LoginRequest {
                email: "asha@example.com".into(),
                password: "wrong".into(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn locked_out_email_is_refused_before_lookup() {
        let mut query = MockUserQueryRepositoryTrait::new();
        query.expect_find_by_email().never();

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_get_from_cache()
            .with(eq("auth:login_attempts:asha@example.com"))
            .returning(|_| Some("5".to_string()));
        cache.expect_set_to_cache().never();

        let svc = service_with_cache(
            MockHashingTrait::new(),
            MockJwtServiceTrait::new(),
            query,
            MockUserCommandRepositoryTrait::new(),
            cache,
        )
        .await;

        let result = svc
            .login(&LoginRequest {
                email: " Asha@Example.com ".into(),
                password: "long-enough".into(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn successful_login_clears_attempt_counter() -> TestResult {
        let mut query = MockUserQueryRepositoryTrait::new();
        query
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(7, email))));

        let mut hash = MockHashingTrait::new();
        hash.expect_compare_password().returning(|_, _| Ok(()));

        let mut jwt = MockJwtServiceTrait::new();
        jwt.expect_generate_token()
            .returning(|_, _| Ok("token-7".to_string()));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_get_from_cache()
            .returning(|_| Some("4".to_string()));
        cache
            .expect_delete_from_cache()
            .with(eq("auth:login_attempts:asha@example.com"))
            .times(1)
            .return_const(());

        let svc = service_with_cache(
            hash,
            jwt,
            query,
            MockUserCommandRepositoryTrait::new(),
            cache,
        )
        .await;

        let response = svc
            .login(&LoginRequest {
                email: "asha@example.com".into(),
                password: "long-enough".into(),
            })
            .await?;

        assert_eq!(response.data.token, "token-7");
        Ok(())
    }

    #[tokio::test]
    async fn admin_login_checks_configured_credentials() -> TestResult {
        let mut jwt = MockJwtServiceTrait::new();
        jwt.expect_generate_token()
            .withf(|sub, role| sub == "admin@shop.test" && *role == Role::Admin)
            .times(1)
            .returning(|_, _| Ok("admin-token".to_string()));

        let svc = service(
            MockHashingTrait::new(),
            jwt,
            MockUserQueryRepositoryTrait::new(),
            MockUserCommandRepositoryTrait::new(),
        )
        .await;

        let ok = svc
            .admin_login(&LoginRequest {
                email: "ADMIN@shop.test".into(),
                password: "admin-pass".into(),
            })
            .await?;
        assert_eq!(ok.data.token, "admin-token");

        let bad = svc
            .admin_login(&LoginRequest {
                email: "admin@shop.test".into(),
                password: "guess".into(),
            })
            .await;
        assert!(matches!(bad, Err(ServiceError::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn get_me_hides_password() -> TestResult {
        let mut query = MockUserQueryRepositoryTrait::new();
        query
            .expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(user(id, "asha@example.com"))));

        let svc = service(
            MockHashingTrait::new(),
            MockJwtServiceTrait::new(),
            query,
            MockUserCommandRepositoryTrait::new(),
        )
        .await;

        let response = svc.get_me(4).await?;
        let json = serde_json::to_value(&response.data)?;
        assert_eq!(json["id"], 4);
        assert!(json.get("password").is_none());
        Ok(())
    }
}
