// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::admin::Admin, session::AdminSession, state::AppState};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the Admin ID (as string).
    pub sub: String,
    pub username: String,
    /// Role at sign-in. Informational; access is re-read from the database per request.
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new JWT for an admin account.
pub fn sign_jwt(admin: &Admin, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: admin.id.to_string(),
        username: admin.username.clone(),
        role: admin.role.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header, loads the admin named by the
/// token's subject and injects the resulting `AdminSession` into the request extensions.
/// A token whose account no longer exists is rejected with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let unauthorized = || AppError::AuthError("Invalid token".to_string());

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;

    let claims = verify_jwt(token, &state.config.jwt_secret)?;
    let admin_id: i64 = claims.sub.parse().map_err(|_| {
        tracing::warn!("Malformed subject claim for '{}'", claims.username);
        unauthorized()
    })?;

    let admin = sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, username, password, role, sidebar_restricted, created_at
        FROM admins
        WHERE id = $1
        "#,
    )
    .bind(admin_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| {
        tracing::warn!("Token for removed admin '{}' (id {})", claims.username, admin_id);
        unauthorized()
    })?;

    let session = AdminSession::from_admin(&admin, &state.config).map_err(|e| {
        tracing::warn!("Rejected session for '{}': {}", admin.username, e);
        unauthorized()
    })?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// Axum Middleware: Superadmin Authorization.
///
/// Must be used AFTER `auth_middleware`. Returns 403 unless the session is elevated.
pub async fn superadmin_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let session = req
        .extensions()
        .get::<AdminSession>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !session.access.is_elevated() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(restricted: bool) -> Admin {
        Admin {
            id: 42,
            username: "clerk".to_string(),
            password: String::new(),
            role: "admin".to_string(),
            sidebar_restricted: restricted,
            created_at: None,
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let token = sign_jwt(&admin(false), "s3cret", 60).unwrap();
        let claims = verify_jwt(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "clerk");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(&admin(true), "s3cret", 60).unwrap();
        assert!(matches!(
            verify_jwt(&token, "other"),
            Err(AppError::AuthError(_))
        ));
    }
}
