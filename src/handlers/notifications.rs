// src/handlers/notifications.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgExecutor, PgPool};
use validator::Validate;

use crate::{
    error::AppError,
    models::notification::{CreateNotificationRequest, Notification, NotificationListParams},
    utils::html::clean_html,
};

/// Stores a notification. Used by handlers that publish something worth announcing.
pub async fn record<'e>(
    executor: impl PgExecutor<'e>,
    message: &str,
) -> Result<Notification, AppError> {
    insert(executor, &clean_html(message)).await
}

/// Sanitises a user-supplied message, rejecting one that is empty afterwards.
fn sanitised_message(raw: &str) -> Result<String, AppError> {
    let message = clean_html(raw);
    if message.is_empty() {
        return Err(AppError::BadRequest("Message is empty after sanitising".to_string()));
    }
    Ok(message)
}

/// `message` must already be sanitised.
async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    message: &str,
) -> Result<Notification, AppError> {
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (message)
        VALUES ($1)
        RETURNING id, message, read, created_at
        "#,
    )
    .bind(message)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record notification: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(notification)
}

/// Lists notifications, newest first.
pub async fn list_notifications(
    State(pool): State<PgPool>,
    Query(params): Query<NotificationListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);

    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, message, read, created_at
        FROM notifications
        WHERE ($1 = FALSE OR read = FALSE)
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(params.unread_only)
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    Ok(Json(notifications))
}

pub async fn create_notification(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let message = sanitised_message(&payload.message)?;
    let notification = insert(&pool, &message).await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

pub async fn mark_read(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::OK)
}

pub async fn delete_notification(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
