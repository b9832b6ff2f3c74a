// src/handlers/navigation.rs

use axum::{Extension, Json, extract::Query, response::IntoResponse};
use serde::Deserialize;

use crate::{navigation::visible_menu, session::AdminSession};

#[derive(Debug, Deserialize)]
pub struct NavigationParams {
    /// Front-end route currently shown, used to mark the active entry.
    pub path: Option<String>,
}

/// Sidebar entries for the signed-in admin.
pub async fn sidebar(
    Extension(session): Extension<AdminSession>,
    Query(params): Query<NavigationParams>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "access": session.access,
        "items": visible_menu(&session, params.path.as_deref()),
    }))
}
