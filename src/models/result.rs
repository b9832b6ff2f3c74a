// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::grading::{MarkSet, Score};

/// Marks for one subject as stored inside a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubjectMark {
    pub subject_id: i64,
    pub marks: MarkSet,
}

/// Represents the 'results' table: one student's result in one exam.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,

    /// Ordered per-subject marks, stored as a JSON array.
    pub marks: Json<Vec<StoredSubjectMark>>,

    /// Authoritative totals entered by the exam office.
    pub grand_total: f64,
    pub percentage: f64,

    /// Class position. `None` until the exam is ranked.
    pub rank: Option<i32>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for entering a student's result.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateResultRequest {
    pub exam_id: i64,
    pub student_id: i64,
    #[validate(length(max = 50), custom(function = validate_subject_marks))]
    pub subjects: Vec<StoredSubjectMark>,
    #[validate(range(min = 0.0))]
    pub grand_total: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: f64,
}

/// DTO for updating a result. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateResultRequest {
    #[validate(length(max = 50), custom(function = validate_subject_marks))]
    pub subjects: Option<Vec<StoredSubjectMark>>,
    #[validate(range(min = 0.0))]
    pub grand_total: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: Option<f64>,
}

/// Query parameters for the public result lookup.
#[derive(Debug, Deserialize)]
pub struct ResultLookupParams {
    pub exam_id: i64,
    pub reg_number: String,
}

/// Query parameters for listing results.
#[derive(Debug, Deserialize)]
pub struct ResultListParams {
    pub exam_id: Option<i64>,
}

/// A subject may appear only once per result, and recorded scores are finite and non-negative.
fn validate_subject_marks(marks: &[StoredSubjectMark]) -> Result<(), validator::ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for mark in marks {
        if !seen.insert(mark.subject_id) {
            return Err(validator::ValidationError::new("duplicate_subject"));
        }

        if let MarkSet::Present(scores) = &mark.marks {
            let bad = scores
                .values()
                .any(|score| matches!(score, Score::Numeric(v) if !v.is_finite() || *v < 0.0));
            if bad {
                return Err(validator::ValidationError::new("negative_score"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_accepts_mixed_mark_shapes() {
        let req: CreateResultRequest = serde_json::from_value(json!({
            "exam_id": 1,
            "student_id": 2,
            "subjects": [
                { "subject_id": 5, "marks": { "theory": 60, "practical": "A" } },
                { "subject_id": 6, "marks": { "absent": true } }
            ],
            "grand_total": 60,
            "percentage": 30
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert!(req.subjects[1].marks.is_absent());
    }

    #[test]
    fn duplicate_subject_and_out_of_range_percentage_fail() {
        let req: CreateResultRequest = serde_json::from_value(json!({
            "exam_id": 1,
            "student_id": 2,
            "subjects": [
                { "subject_id": 5, "marks": { "absent": true } },
                { "subject_id": 5, "marks": { "absent": true } }
            ],
            "grand_total": 0,
            "percentage": 120
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("subjects"));
        assert!(fields.contains_key("percentage"));
    }

    #[test]
    fn negative_component_score_fails() {
        let req: CreateResultRequest = serde_json::from_value(json!({
            "exam_id": 1,
            "student_id": 2,
            "subjects": [
                { "subject_id": 5, "marks": { "theory": -40, "practical": 20 } }
            ],
            "grand_total": 0,
            "percentage": 0
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["subjects"][0].code, "negative_score");
    }

    #[test]
    fn update_rejects_negative_score_and_keeps_zero() {
        let bad: UpdateResultRequest = serde_json::from_value(json!({
            "subjects": [{ "subject_id": 5, "marks": { "theory": -0.5 } }]
        }))
        .unwrap();
        assert!(bad.validate().is_err());

        let zero: UpdateResultRequest = serde_json::from_value(json!({
            "subjects": [{ "subject_id": 5, "marks": { "theory": 0, "practical": "A" } }]
        }))
        .unwrap();
        assert!(zero.validate().is_ok());
    }
}
