// src/handlers/batches.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::{AppError, conflict_or_internal},
    models::batch::{Batch, CreateBatchRequest, UpdateBatchRequest},
};

pub async fn list_batches(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let batches = sqlx::query_as::<_, Batch>(
        "SELECT id, name, class_name, created_at FROM batches ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(batches))
}

pub async fn get_batch(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let batch = sqlx::query_as::<_, Batch>(
        "SELECT id, name, class_name, created_at FROM batches WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Batch not found".to_string()))?;

    Ok(Json(batch))
}

pub async fn create_batch(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateBatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = sqlx::query_as::<_, Batch>(
        r#"
        INSERT INTO batches (name, class_name)
        VALUES ($1, $2)
        RETURNING id, name, class_name, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.class_name)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_or_internal(e, format!("Batch '{}' already exists", payload.name)))?;

    Ok((StatusCode::CREATED, Json(batch)))
}

pub async fn update_batch(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.name.is_none() && payload.class_name.is_none() {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE batches SET ");
    let mut separated = builder.separated(", ");

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(class_name) = payload.class_name {
        separated.push("class_name = ");
        separated.push_bind_unseparated(class_name);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder
        .build()
        .execute(&pool)
        .await
        .map_err(|e| conflict_or_internal(e, "Batch name already exists"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Batch not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a batch. Students keep their records with no batch; exams of the batch go with it.
pub async fn delete_batch(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM batches WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete batch: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Batch not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
