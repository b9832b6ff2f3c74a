// src/handlers/subjects.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::subject::{CreateSubjectRequest, SubjectRecord, UpdateSubjectRequest},
};

const SUBJECT_COLUMNS: &str = "id, name, name_arabic, scoring_scheme, created_at";

pub async fn list_subjects(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let subjects = sqlx::query_as::<_, SubjectRecord>(&format!(
        "SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY id"
    ))
    .fetch_all(&pool)
    .await?;

    Ok(Json(subjects))
}

pub async fn get_subject(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let subject = sqlx::query_as::<_, SubjectRecord>(&format!(
        "SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Subject not found".to_string()))?;

    Ok(Json(subject))
}

pub async fn create_subject(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let subject = sqlx::query_as::<_, SubjectRecord>(&format!(
        r#"
        INSERT INTO subjects (name, name_arabic, scoring_scheme)
        VALUES ($1, $2, $3)
        RETURNING {SUBJECT_COLUMNS}
        "#
    ))
    .bind(&payload.name)
    .bind(&payload.name_arabic)
    .bind(SqlJson(&payload.scoring_scheme))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create subject: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// Updates a subject. A new scoring scheme applies to every existing result card.
pub async fn update_subject(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.name.is_none() && payload.name_arabic.is_none() && payload.scoring_scheme.is_none() {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE subjects SET ");
    let mut separated = builder.separated(", ");

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(name_arabic) = payload.name_arabic {
        separated.push("name_arabic = ");
        separated.push_bind_unseparated(name_arabic);
    }

    if let Some(scheme) = payload.scoring_scheme {
        separated.push("scoring_scheme = ");
        separated.push_bind_unseparated(SqlJson(scheme));
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update subject: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Subject not found".to_string()));
    }

    Ok(StatusCode::OK)
}

pub async fn delete_subject(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete subject: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Subject not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
