// src/models/subject.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::grading::{self, ScoringComponent, marks::validate_scheme};

/// Represents the 'subjects' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: i64,

    pub name: String,

    /// Name printed in Arabic script under the English one.
    pub name_arabic: String,

    /// Ordered scoring components, stored as a JSON array.
    pub scoring_scheme: Json<Vec<ScoringComponent>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SubjectRecord {
    pub fn to_subject(&self) -> grading::Subject {
        grading::Subject {
            name: self.name.clone(),
            name_arabic: self.name_arabic.clone(),
            scoring_scheme: self.scoring_scheme.0.clone(),
        }
    }
}

/// DTO for creating a subject.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub name_arabic: String,
    #[validate(custom(function = validate_scheme))]
    pub scoring_scheme: Vec<ScoringComponent>,
}

/// DTO for updating a subject. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub name_arabic: Option<String>,
    #[validate(custom(function = validate_scheme))]
    pub scoring_scheme: Option<Vec<ScoringComponent>>,
}
