// src/handlers/exams.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::notifications,
    models::exam::{CreateExamRequest, Exam, assign_ranks},
};

pub async fn list_exams(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let exams = sqlx::query_as::<_, Exam>(
        "SELECT id, title, batch_id, created_at FROM exams ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(exams))
}

pub async fn create_exam(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let exam = sqlx::query_as::<_, Exam>(
        r#"
        INSERT INTO exams (title, batch_id)
        VALUES ($1, $2)
        RETURNING id, title, batch_id, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(payload.batch_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_foreign_key_violation()) {
            AppError::BadRequest("Batch does not exist".to_string())
        } else {
            tracing::error!("Failed to create exam: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Deletes an exam and every result recorded for it.
pub async fn delete_exam(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM exams WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete exam: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Exam not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Assigns class ranks for an exam by descending grand total and publishes a notification.
///
/// Runs in one transaction so a card never shows a half-ranked class.
pub async fn rank_exam(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = pool.begin().await?;

    let title: String = sqlx::query_scalar("SELECT title FROM exams WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let totals: Vec<(i64, f64)> =
        sqlx::query_as("SELECT id, grand_total FROM results WHERE exam_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    let ranks = assign_ranks(&totals);

    for assignment in &ranks {
        sqlx::query("UPDATE results SET rank = $1, updated_at = NOW() WHERE id = $2")
            .bind(assignment.rank)
            .bind(assignment.result_id)
            .execute(&mut *tx)
            .await?;
    }

    notifications::record(
        &mut *tx,
        &format!("Ranks published for '{}' ({} students)", title, ranks.len()),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Ranked exam {} ({} results)", id, ranks.len());

    Ok(Json(ranks))
}
