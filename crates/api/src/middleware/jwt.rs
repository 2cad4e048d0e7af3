use axum::{
    Extension, Json,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynJwtService, config::Claims, errors::ErrorResponse};

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (
        status,
        Json(ErrorResponse {
            status: "fail".to_string(),
            message: message.to_string(),
        }),
    )
}

/// Cookie first, then `Authorization: Bearer`, then the bare `token` header
/// the storefront sends.
fn extract_token(cookie_jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .or_else(|| {
            headers
                .get("token")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        })
        .filter(|token| !token.trim().is_empty())
}

fn verify(
    jwt: &DynJwtService,
    cookie_jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<Claims, Rejection> {
    let token = extract_token(cookie_jar, headers).ok_or_else(|| {
        reject(
            StatusCode::UNAUTHORIZED,
            "Not Authorized Login Again",
        )
    })?;

    jwt.verify_token(&token)
        .map_err(|_| reject(StatusCode::UNAUTHORIZED, "Invalid token"))
}

pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, Rejection> {
    let claims = verify(&jwt, &cookie_jar, req.headers())?;

    let user_id = claims
        .user_id()
        .map_err(|_| reject(StatusCode::UNAUTHORIZED, "Invalid token"))?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, Rejection> {
    let claims = verify(&jwt, &cookie_jar, req.headers())?;

    if !claims.is_admin() {
        return Err(reject(
            StatusCode::FORBIDDEN,
            "Not Authorized Login Again",
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn bearer_header_is_accepted() {
        let token = extract_token(
            &CookieJar::new(),
            &headers(&[("authorization", "Bearer abc")]),
        );
        assert_eq!(token.as_deref(), Some("abc"));
    }

    #[test]
    fn storefront_token_header_is_accepted() {
        let token = extract_token(&CookieJar::new(), &headers(&[("token", "xyz")]));
        assert_eq!(token.as_deref(), Some("xyz"));
    }

    #[test]
    fn blank_token_is_ignored() {
        let token = extract_token(&CookieJar::new(), &headers(&[("token", " ")]));
        assert!(token.is_none());
    }
}
