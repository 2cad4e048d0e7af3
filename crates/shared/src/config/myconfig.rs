use crate::config::CloudinaryConfig;
use anyhow::{Context, Result, anyhow};

#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub is_production: bool,
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Development accepts any origin; production only the configured
    /// storefront and admin URLs.
    pub fn is_allowed(&self, origin: &str) -> bool {
        if !self.is_production {
            return true;
        }
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub admin: AdminCredentials,
    pub cloudinary: CloudinaryConfig,
    pub redis_url: Option<String>,
    pub delivery_fee: i64,
    pub cors: CorsConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "false".into());
        let port_str = std::env::var("PORT").unwrap_or_else(|_| "4000".into());

        let run_migrations = parse_bool("RUN_MIGRATIONS", &run_migrations_str)?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let admin = AdminCredentials {
            email: std::env::var("ADMIN_EMAIL")
                .context("Missing environment variable: ADMIN_EMAIL")?,
            password: std::env::var("ADMIN_PASSWORD")
                .context("Missing environment variable: ADMIN_PASSWORD")?,
        };

        let cloudinary = CloudinaryConfig {
            cloud_name: std::env::var("CLOUDINARY_NAME")
                .context("Missing environment variable: CLOUDINARY_NAME")?,
            api_key: std::env::var("CLOUDINARY_API_KEY")
                .context("Missing environment variable: CLOUDINARY_API_KEY")?,
            api_secret: std::env::var("CLOUDINARY_SECRET_KEY")
                .context("Missing environment variable: CLOUDINARY_SECRET_KEY")?,
        };

        let redis_url = std::env::var("REDIS_URL").ok().filter(|v| !v.is_empty());

        let delivery_fee = match std::env::var("DELIVERY_FEE") {
            Ok(v) => v
                .parse::<i64>()
                .context("DELIVERY_FEE must be an integer")?,
            Err(_) => 10,
        };

        if delivery_fee < 0 {
            return Err(anyhow!("DELIVERY_FEE cannot be negative, got {delivery_fee}"));
        }

        let is_production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let allowed_origins = ["FRONTEND_URL", "ADMIN_URL"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .filter(|v| !v.is_empty())
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            admin,
            cloudinary,
            redis_url,
            delivery_fee,
            cors: CorsConfig {
                is_production,
                allowed_origins,
            },
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(anyhow!("{key} must be 'true' or 'false', got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_rejects_garbage() {
        assert!(matches!(parse_bool("RUN_MIGRATIONS", "true"), Ok(true)));
        assert!(matches!(parse_bool("RUN_MIGRATIONS", "0"), Ok(false)));
        assert!(parse_bool("RUN_MIGRATIONS", "yes").is_err());
    }

    #[test]
    fn production_cors_uses_allow_list() {
        let cors = CorsConfig {
            is_production: true,
            allowed_origins: vec!["https://shop.example.com".into()],
        };

        assert!(cors.is_allowed("https://shop.example.com"));
        assert!(!cors.is_allowed("https://evil.example.com"));

        let dev = CorsConfig {
            is_production: false,
            allowed_origins: vec![],
        };
        assert!(dev.is_allowed("http://localhost:5173"));
    }
}
