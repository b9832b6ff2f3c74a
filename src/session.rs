// src/session.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{config::Config, models::admin::Admin};

/// Role stored on an admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Superadmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Effective access level of a signed-in admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Admin,
    Superadmin,
    /// The bootstrap admin configured through `ADMIN_USERNAME`.
    EnvSuperadmin,
    /// An account whose sidebar restriction has been lifted.
    Unrestricted,
}

impl Access {
    /// User management, system status and settings.
    pub fn is_elevated(&self) -> bool {
        !matches!(self, Access::Admin)
    }
}

/// Request-scoped identity, built once per request by the auth middleware from the
/// current `admins` row. Token claims only identify the account.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub admin_id: i64,
    pub username: String,
    pub role: Role,
    pub access: Access,
}

impl AdminSession {
    /// Classification order: bootstrap admin, then lifted sidebar restriction, then stored role.
    pub fn from_admin(admin: &Admin, config: &Config) -> Result<Self, String> {
        let role: Role = admin.role.parse()?;

        let access = if config.is_bootstrap_admin(&admin.username) {
            Access::EnvSuperadmin
        } else if !admin.sidebar_restricted {
            Access::Unrestricted
        } else {
            match role {
                Role::Admin => Access::Admin,
                Role::Superadmin => Access::Superadmin,
            }
        };

        Ok(Self {
            admin_id: admin.id,
            username: admin.username.clone(),
            role,
            access,
        })
    }
}
