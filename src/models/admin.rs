// src/models/admin.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'admins' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,

    /// Unique login name.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// 'admin' or 'superadmin'.
    pub role: String,

    /// When false the account sees every sidebar entry regardless of role.
    pub sidebar_restricted: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for admin login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for a superadmin creating another admin account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password length must be between 8 and 128 characters."
    ))]
    pub password: String,
    #[validate(custom(function = validate_role))]
    pub role: String,
    #[serde(default = "default_restricted")]
    pub sidebar_restricted: bool,
}

/// DTO for updating an admin account. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    #[validate(custom(function = validate_role))]
    pub role: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    pub sidebar_restricted: Option<bool>,
}

fn default_restricted() -> bool {
    true
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    role.parse::<crate::session::Role>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_role"))
}
