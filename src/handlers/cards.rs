// src/handlers/cards.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    grading::{CardStudent, ResultCard, ResultCardInput, SubjectMark},
    handlers::results::{RESULT_COLUMNS, fetch_result},
    models::{
        result::{ExamResult, ResultLookupParams},
        student::Student,
        subject::SubjectRecord,
    },
};

/// Loads everything a card needs for `result` and assembles the card input.
///
/// Marks for subjects deleted since the result was entered are skipped.
async fn load_card_input(pool: &PgPool, result: &ExamResult) -> Result<ResultCardInput, AppError> {
    let rank = result
        .rank
        .and_then(|r| u32::try_from(r).ok())
        .filter(|r| *r > 0)
        .ok_or(AppError::Conflict(
            "Result has not been published yet".to_string(),
        ))?;

    let (exam_title, class_name): (String, String) = sqlx::query_as(
        r#"
        SELECT e.title, b.class_name
        FROM exams e
        JOIN batches b ON b.id = e.batch_id
        WHERE e.id = $1
        "#,
    )
    .bind(result.exam_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let student = sqlx::query_as::<_, Student>(
        "SELECT id, reg_number, name, batch_id, profile_photo, created_at FROM students WHERE id = $1",
    )
    .bind(result.student_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Student not found".to_string()))?;

    let subject_ids: Vec<i64> = result.marks.iter().map(|m| m.subject_id).collect();
    let subjects: HashMap<i64, SubjectRecord> = sqlx::query_as::<_, SubjectRecord>(
        "SELECT id, name, name_arabic, scoring_scheme, created_at FROM subjects WHERE id = ANY($1)",
    )
    .bind(&subject_ids)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|s| (s.id, s))
    .collect();

    let subject_marks = result
        .marks
        .iter()
        .filter_map(|stored| match subjects.get(&stored.subject_id) {
            Some(record) => Some(SubjectMark {
                subject: record.to_subject(),
                marks: stored.marks.clone(),
            }),
            None => {
                tracing::warn!(
                    "Result {} references missing subject {}",
                    result.id,
                    stored.subject_id
                );
                None
            }
        })
        .collect();

    Ok(ResultCardInput {
        exam_title,
        class_name,
        student: CardStudent {
            reg_number: student.reg_number,
            name: student.name,
            profile_photo: student.profile_photo,
        },
        subjects: subject_marks,
        grand_total: result.grand_total,
        rank,
        percentage: result.percentage,
    })
}

/// Result card for an admin preview.
pub async fn result_card(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = fetch_result(&pool, id).await?;
    let input = load_card_input(&pool, &result).await?;

    Ok(Json(ResultCard::build(&input)))
}

/// Public lookup of a published result by exam and registration number.
pub async fn lookup_card(
    State(pool): State<PgPool>,
    Query(params): Query<ResultLookupParams>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query_as::<_, ExamResult>(&format!(
        r#"
        SELECT {RESULT_COLUMNS}
        FROM results
        WHERE exam_id = $1
          AND student_id = (SELECT id FROM students WHERE reg_number = $2)
        "#
    ))
    .bind(params.exam_id)
    .bind(params.reg_number.trim())
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("No result for this registration number".to_string()))?;

    let input = load_card_input(&pool, &result).await?;

    Ok(Json(ResultCard::build(&input)))
}
