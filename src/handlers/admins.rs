// src/handlers/admins.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, conflict_or_internal},
    models::admin::{Admin, CreateAdminRequest, UpdateAdminRequest},
    session::{AdminSession, Role},
    utils::hash::hash_password,
};

/// Lists all admin accounts.
/// Superadmin only.
pub async fn list_admins(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let admins = sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, username, password, role, sidebar_restricted, created_at
        FROM admins
        ORDER BY id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list admins: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(admins))
}

/// Creates an admin account with the given role.
/// Superadmin only.
pub async fn create_admin(
    State(pool): State<PgPool>,
    Extension(session): Extension<AdminSession>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO admins (username, password, role, sidebar_restricted)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .bind(&payload.role)
    .bind(payload.sidebar_restricted)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_or_internal(e, format!("Username '{}' already exists", payload.username)))?;

    tracing::info!(
        "Admin '{}' created account '{}' ({})",
        session.username,
        payload.username,
        payload.role
    );

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates role, password or sidebar restriction of an admin account.
/// Superadmin only.
pub async fn update_admin(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAdminRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.role.is_none() && payload.password.is_none() && payload.sidebar_restricted.is_none() {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE admins SET ");
    let mut separated = builder.separated(", ");

    if let Some(role) = payload.role {
        separated.push("role = ");
        separated.push_bind_unseparated(role);
    }

    if let Some(password) = payload.password {
        separated.push("password = ");
        separated.push_bind_unseparated(hash_password(&password)?);
    }

    if let Some(restricted) = payload.sidebar_restricted {
        separated.push("sidebar_restricted = ");
        separated.push_bind_unseparated(restricted);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update admin: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Admin not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes an admin account. Prevents deleting self.
/// Superadmin only.
pub async fn delete_admin(
    State(pool): State<PgPool>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id == session.admin_id {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete admin: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Admin not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Promotes the bootstrap admin from the environment to 'superadmin'.
/// Available to any signed-in admin so a fresh install can unlock user management.
pub async fn create_superadmin(
    State(pool): State<PgPool>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let username = config
        .admin_username
        .as_deref()
        .ok_or(AppError::BadRequest("No default admin is configured".to_string()))?;

    let result = sqlx::query("UPDATE admins SET role = $1 WHERE username = $2")
        .bind(Role::Superadmin.as_str())
        .bind(username)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Admin '{}' not found", username)));
    }

    tracing::info!("Default admin '{}' set as superadmin", username);

    Ok(Json(serde_json::json!({
        "message": "Default admin set as superadmin!"
    })))
}
