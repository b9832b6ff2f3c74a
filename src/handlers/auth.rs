// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::admin::{Admin, LoginRequest},
    session::AdminSession,
    utils::{hash::verify_password, jwt::sign_jwt},
};

/// Authenticates an admin and returns a JWT token.
///
/// The same message is returned for unknown usernames and wrong passwords.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let admin = sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, username, password, role, sidebar_restricted, created_at
        FROM admins
        WHERE username = $1
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or(AppError::AuthError("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &admin.password)? {
        tracing::warn!("Failed login for '{}'", payload.username);
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = sign_jwt(&admin, &config.jwt_secret, config.jwt_expiration)?;

    tracing::info!("Admin '{}' signed in", admin.username);

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "expires_in": config.jwt_expiration,
        "role": admin.role,
    })))
}

/// Returns the caller's session as seen by the server.
pub async fn me(Extension(session): Extension<AdminSession>) -> impl IntoResponse {
    Json(session)
}
