// src/handlers/results.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::{AppError, conflict_or_internal},
    handlers::notifications,
    models::result::{
        CreateResultRequest, ExamResult, ResultListParams, StoredSubjectMark, UpdateResultRequest,
    },
};

pub(crate) const RESULT_COLUMNS: &str =
    "id, exam_id, student_id, marks, grand_total, percentage, rank, created_at, updated_at";

/// Lists results, optionally for one exam, best totals first.
pub async fn list_results(
    State(pool): State<PgPool>,
    Query(params): Query<ResultListParams>,
) -> Result<impl IntoResponse, AppError> {
    let results = sqlx::query_as::<_, ExamResult>(&format!(
        r#"
        SELECT {RESULT_COLUMNS}
        FROM results
        WHERE ($1::BIGINT IS NULL OR exam_id = $1)
        ORDER BY exam_id, grand_total DESC, id
        "#
    ))
    .bind(params.exam_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(results))
}

pub async fn get_result(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(fetch_result(&pool, id).await?))
}

pub(crate) async fn fetch_result(pool: &PgPool, id: i64) -> Result<ExamResult, AppError> {
    sqlx::query_as::<_, ExamResult>(&format!(
        "SELECT {RESULT_COLUMNS} FROM results WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Result not found".to_string()))
}

/// Rejects marks that reference subjects which do not exist.
async fn ensure_subjects_exist(pool: &PgPool, marks: &[StoredSubjectMark]) -> Result<(), AppError> {
    if marks.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = marks.iter().map(|m| m.subject_id).collect();
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_one(pool)
        .await?;

    if found != ids.len() as i64 {
        return Err(AppError::BadRequest("Unknown subject in marks".to_string()));
    }
    Ok(())
}

/// Records a student's result for an exam and announces it.
pub async fn create_result(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    ensure_subjects_exist(&pool, &payload.subjects).await?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query_as::<_, ExamResult>(&format!(
        r#"
        INSERT INTO results (exam_id, student_id, marks, grand_total, percentage)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {RESULT_COLUMNS}
        "#
    ))
    .bind(payload.exam_id)
    .bind(payload.student_id)
    .bind(SqlJson(&payload.subjects))
    .bind(payload.grand_total)
    .bind(payload.percentage)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_foreign_key_violation()) {
            AppError::BadRequest("Exam or student does not exist".to_string())
        } else {
            conflict_or_internal(e, "A result for this student and exam already exists")
        }
    })?;

    let (reg_number, title): (String, String) = sqlx::query_as(
        r#"
        SELECT s.reg_number, e.title
        FROM students s, exams e
        WHERE s.id = $1 AND e.id = $2
        "#,
    )
    .bind(payload.student_id)
    .bind(payload.exam_id)
    .fetch_one(&mut *tx)
    .await?;

    notifications::record(
        &mut *tx,
        &format!("Result entered for {} in '{}'", reg_number, title),
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Updates marks or totals. The stored rank is kept until the exam is ranked again.
pub async fn update_result(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.subjects.is_none() && payload.grand_total.is_none() && payload.percentage.is_none() {
        return Ok(StatusCode::OK);
    }

    if let Some(subjects) = &payload.subjects {
        ensure_subjects_exist(&pool, subjects).await?;
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE results SET updated_at = NOW()");

    if let Some(subjects) = payload.subjects {
        builder.push(", marks = ");
        builder.push_bind(SqlJson(subjects));
    }

    if let Some(grand_total) = payload.grand_total {
        builder.push(", grand_total = ");
        builder.push_bind(grand_total);
    }

    if let Some(percentage) = payload.percentage {
        builder.push(", percentage = ");
        builder.push_bind(percentage);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update result: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Result not found".to_string()));
    }

    Ok(StatusCode::OK)
}

pub async fn delete_result(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM results WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Result not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
