// src/handlers/reports.rs

use std::{collections::HashMap, time::Instant};

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::{
    error::AppError,
    grading::{LetterGrade, SubjectMark, aggregate, grade, summary::EXAM_FAIL_SUBJECTS},
    models::{result::StoredSubjectMark, subject::SubjectRecord},
};

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub students: i64,
    pub subjects: i64,
    pub batches: i64,
    pub exams: i64,
    pub results: i64,
    pub unread_notifications: i64,
}

/// Headline counts for the admin landing page.
pub async fn dashboard(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let row: (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM students),
            (SELECT COUNT(*) FROM subjects),
            (SELECT COUNT(*) FROM batches),
            (SELECT COUNT(*) FROM exams),
            (SELECT COUNT(*) FROM results),
            (SELECT COUNT(*) FROM notifications WHERE read = FALSE)
        "#,
    )
    .fetch_one(&pool)
    .await?;

    Ok(Json(Dashboard {
        students: row.0,
        subjects: row.1,
        batches: row.2,
        exams: row.3,
        results: row.4,
        unread_notifications: row.5,
    }))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GradeCount {
    pub grade: LetterGrade,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ExamReport {
    pub exam_id: i64,
    pub title: String,
    pub results: usize,
    /// Results with fewer than three failed subjects.
    pub passed: usize,
    pub failed: usize,
    /// Mean of the recorded percentages. `None` for an exam without results.
    pub average_percentage: Option<f64>,
    pub grade_distribution: Vec<GradeCount>,
}

impl ExamReport {
    /// Builds the report from each result's subject marks and recorded percentage.
    pub fn compile(exam_id: i64, title: String, results: &[(Vec<SubjectMark>, f64)]) -> Self {
        let mut counts: HashMap<LetterGrade, usize> = HashMap::new();
        let mut passed = 0;
        let mut percentage_sum = 0.0;

        for (subjects, percentage) in results {
            let failed_subjects = subjects.iter().map(aggregate).filter(|o| o.is_failed).count();
            if failed_subjects < EXAM_FAIL_SUBJECTS {
                passed += 1;
            }
            *counts.entry(grade(*percentage).label).or_default() += 1;
            percentage_sum += percentage;
        }

        let average_percentage =
            (!results.is_empty()).then(|| percentage_sum / results.len() as f64);

        Self {
            exam_id,
            title,
            results: results.len(),
            passed,
            failed: results.len() - passed,
            average_percentage,
            grade_distribution: LetterGrade::ALL
                .iter()
                .map(|g| GradeCount {
                    grade: *g,
                    count: counts.get(g).copied().unwrap_or(0),
                })
                .collect(),
        }
    }
}

/// Pass counts, average and grade distribution for one exam.
pub async fn exam_report(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let title: String = sqlx::query_scalar("SELECT title FROM exams WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let rows: Vec<(sqlx::types::Json<Vec<StoredSubjectMark>>, f64)> =
        sqlx::query_as("SELECT marks, percentage FROM results WHERE exam_id = $1")
            .bind(id)
            .fetch_all(&pool)
            .await?;

    let subjects: HashMap<i64, SubjectRecord> = sqlx::query_as::<_, SubjectRecord>(
        "SELECT id, name, name_arabic, scoring_scheme, created_at FROM subjects",
    )
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|s| (s.id, s))
    .collect();

    let results: Vec<(Vec<SubjectMark>, f64)> = rows
        .into_iter()
        .map(|(marks, percentage)| {
            let subject_marks = marks
                .0
                .into_iter()
                .filter_map(|stored| {
                    subjects.get(&stored.subject_id).map(|record| SubjectMark {
                        subject: record.to_subject(),
                        marks: stored.marks,
                    })
                })
                .collect();
            (subject_marks, percentage)
        })
        .collect();

    Ok(Json(ExamReport::compile(id, title, &results)))
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub database: &'static str,
    pub database_latency_ms: Option<u128>,
}

impl SystemStatus {
    /// Pings the database and times the round trip.
    pub async fn check(pool: &PgPool) -> Self {
        let started = Instant::now();

        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => SystemStatus {
                version: env!("CARGO_PKG_VERSION"),
                database: "up",
                database_latency_ms: Some(started.elapsed().as_millis()),
            },
            Err(e) => {
                tracing::warn!("Database ping failed: {:?}", e);
                SystemStatus {
                    version: env!("CARGO_PKG_VERSION"),
                    database: "down",
                    database_latency_ms: None,
                }
            }
        }
    }
}

/// Database reachability for the superadmin status page.
pub async fn system_status(State(pool): State<PgPool>) -> impl IntoResponse {
    Json(SystemStatus::check(&pool).await)
}
