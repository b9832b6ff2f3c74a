// src/models/student.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use validator::Validate;

static REG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9/_-]{1,32}$").expect("valid regex"));

/// Represents the 'students' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,

    /// School registration number. Unique.
    pub reg_number: String,

    pub name: String,

    pub batch_id: Option<i64>,

    /// Absolute URL or site-relative path to the profile picture.
    pub profile_photo: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a student.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(custom(function = validate_reg_number))]
    pub reg_number: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub batch_id: Option<i64>,
    #[validate(length(max = 500), custom(function = validate_photo))]
    pub profile_photo: Option<String>,
}

/// DTO for updating a student. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(custom(function = validate_reg_number))]
    pub reg_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub batch_id: Option<i64>,
    #[validate(length(max = 500), custom(function = validate_photo))]
    pub profile_photo: Option<String>,
}

/// Query parameters for listing students.
#[derive(Debug, Deserialize)]
pub struct StudentListParams {
    pub batch_id: Option<i64>,
    /// Matches name or registration number.
    pub q: Option<String>,
}

pub fn validate_reg_number(reg: &str) -> Result<(), validator::ValidationError> {
    if !REG_NUMBER.is_match(reg) {
        return Err(validator::ValidationError::new("invalid_reg_number"));
    }
    Ok(())
}

/// Accepts `https://...` URLs and paths served by the front end such as `/uploads/1.png`.
fn validate_photo(photo: &str) -> Result<(), validator::ValidationError> {
    if photo.starts_with('/') && !photo.starts_with("//") {
        return Ok(());
    }
    match Url::parse(photo) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_photo_url")),
    }
}
