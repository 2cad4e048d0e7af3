use crate::{abstract_trait::JwtServiceTrait, errors::ServiceError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id for [`Role::User`], admin email for [`Role::Admin`].
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(sub: String, role: Role, exp: usize, iat: usize) -> Self {
        Claims {
            sub,
            role,
            exp,
            iat,
        }
    }

    pub fn user_id(&self) -> Result<i32, ServiceError> {
        if self.role != Role::User {
            return Err(ServiceError::InvalidTokenType);
        }
        self.sub
            .parse::<i32>()
            .map_err(|_| ServiceError::InvalidTokenType)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
    pub user_ttl: Duration,
    pub admin_ttl: Duration,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
            user_ttl: Duration::days(7),
            admin_ttl: Duration::hours(12),
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, subject: &str, role: Role) -> Result<String, ServiceError> {
        let now = Utc::now();
        let ttl = match role {
            Role::User => self.user_ttl,
            Role::Admin => self.admin_ttl,
        };
        let iat = now.timestamp() as usize;
        let exp = (now + ttl).timestamp() as usize;

        let claims = Claims::new(subject.to_string(), role, exp, iat);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(ServiceError::Jwt)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());

        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(e),
            },
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn user_token_round_trips() -> TestResult {
        let jwt = JwtConfig::new("test-secret");
        let token = jwt.generate_token("42", Role::User)?;

        let claims = jwt.verify_token(&token)?;
        assert_eq!(claims.user_id()?, 42);
        assert!(!claims.is_admin());
        Ok(())
    }

    #[test]
    fn admin_token_has_no_user_id() -> TestResult {
        let jwt = JwtConfig::new("test-secret");
        let token = jwt.generate_token("admin@example.com", Role::Admin)?;

        let claims = jwt.verify_token(&token)?;
        assert!(claims.is_admin());
        assert!(matches!(
            claims.user_id(),
            Err(ServiceError::InvalidTokenType)
        ));
        Ok(())
    }

    #[test]
    fn foreign_secret_is_rejected() -> TestResult {
        let token = JwtConfig::new("secret-a").generate_token("1", Role::User)?;
        let result = JwtConfig::new("secret-b").verify_token(&token);
        assert!(matches!(result, Err(ServiceError::Jwt(_))));
        Ok(())
    }

    #[test]
    fn expired_token_is_reported() -> TestResult {
        let mut jwt = JwtConfig::new("test-secret");
        jwt.user_ttl = Duration::hours(-2);

        let token = jwt.generate_token("1", Role::User)?;
        assert!(matches!(
            jwt.verify_token(&token),
            Err(ServiceError::TokenExpired)
        ));
        Ok(())
    }
}
