use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::env;

/// Container for the authenticated tenant's company id stored in request
/// extensions.
#[derive(Clone, Copy, Debug)]
pub struct CurrentCompany(pub i64);

/// Claims expected inside the JWT for tenant-scoped routes.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Subject - the company id as a string.
    pub sub: String,
    pub exp: usize,
}

/// Claims expected inside the JWT for admin routes.
#[derive(Debug, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Middleware to validate a Bearer JWT on tenant-scoped routes.
///
/// On success the company id is attached to request extensions and the
/// request is forwarded; on failure a `401` is returned.
pub async fn company_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let token = bearer_token(&req).ok_or(StatusCode::UNAUTHORIZED)?;

    let secret = env::var("JWT_SECRET").map_err(|_| StatusCode::UNAUTHORIZED)?;
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let claims = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .claims;

    // Parse subject as company id and attach for downstream handlers.
    let company_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(CurrentCompany(company_id));

    Ok(next.run(req).await)
}

/// Middleware to validate a Bearer JWT on admin routes.
///
/// Admin tokens use a separate secret and must carry the `admin` role.
pub async fn admin_auth(req: Request, next: Next) -> Result<Response, StatusCode> {
    let token = bearer_token(&req).ok_or(StatusCode::UNAUTHORIZED)?;

    let secret = env::var("ADMIN_JWT_SECRET").map_err(|_| StatusCode::UNAUTHORIZED)?;
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let claims = decode::<AdminClaims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .claims;

    if claims.role != "admin" {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
