// src/handlers/students.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::{AppError, conflict_or_internal},
    models::student::{CreateStudentRequest, Student, StudentListParams, UpdateStudentRequest},
    utils::html::clean_html,
};

const STUDENT_COLUMNS: &str = "id, reg_number, name, batch_id, profile_photo, created_at";

/// Lists students, optionally filtered by batch and a name / registration number keyword.
pub async fn list_students(
    State(pool): State<PgPool>,
    Query(params): Query<StudentListParams>,
) -> Result<impl IntoResponse, AppError> {
    let search_pattern = params.q.map(|k| format!("%{}%", k));

    let students = sqlx::query_as::<_, Student>(&format!(
        r#"
        SELECT {STUDENT_COLUMNS}
        FROM students
        WHERE ($1::BIGINT IS NULL OR batch_id = $1)
          AND ($2::TEXT IS NULL OR name ILIKE $2 OR reg_number ILIKE $2)
        ORDER BY reg_number
        "#
    ))
    .bind(params.batch_id)
    .bind(search_pattern)
    .fetch_all(&pool)
    .await?;

    Ok(Json(students))
}

pub async fn get_student(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let student = sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Student not found".to_string()))?;

    Ok(Json(student))
}

pub async fn create_student(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = sqlx::query_as::<_, Student>(&format!(
        r#"
        INSERT INTO students (reg_number, name, batch_id, profile_photo)
        VALUES ($1, $2, $3, $4)
        RETURNING {STUDENT_COLUMNS}
        "#
    ))
    .bind(&payload.reg_number)
    .bind(clean_html(&payload.name))
    .bind(payload.batch_id)
    .bind(&payload.profile_photo)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        conflict_or_internal(
            e,
            format!("Registration number '{}' already exists", payload.reg_number),
        )
    })?;

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.reg_number.is_none()
        && payload.name.is_none()
        && payload.batch_id.is_none()
        && payload.profile_photo.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE students SET ");
    let mut separated = builder.separated(", ");

    if let Some(reg_number) = &payload.reg_number {
        separated.push("reg_number = ");
        separated.push_bind_unseparated(reg_number.clone());
    }

    if let Some(name) = &payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(clean_html(name));
    }

    if let Some(batch_id) = payload.batch_id {
        separated.push("batch_id = ");
        separated.push_bind_unseparated(batch_id);
    }

    if let Some(photo) = &payload.profile_photo {
        separated.push("profile_photo = ");
        separated.push_bind_unseparated(photo.clone());
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder
        .build()
        .execute(&pool)
        .await
        .map_err(|e| conflict_or_internal(e, "Registration number already exists"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Student not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a student together with their results.
pub async fn delete_student(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete student: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Student not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
