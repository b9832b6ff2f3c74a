// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        admins, auth, batches, cards, exams, navigation, notifications, reports, results, students,
        subjects,
    },
    state::AppState,
    utils::jwt::{auth_middleware, superadmin_middleware},
};

/// Assembles the main application router.
///
/// * `/api/auth` and `/api/results/lookup` are public.
/// * `/api/admin` requires a signed-in admin; `/api/admin/system` additionally requires
///   an elevated session.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000"
                .parse()
                .expect("static origin is a valid header value"),
            "http://127.0.0.1:3000"
                .parse()
                .expect("static origin is a valid header value"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let public_result_routes = Router::new().route("/lookup", get(cards::lookup_card));

    // User management, system status.
    let superadmin_routes = Router::new()
        .route("/admins", get(admins::list_admins).post(admins::create_admin))
        .route(
            "/admins/{id}",
            put(admins::update_admin).delete(admins::delete_admin),
        )
        .route("/status", get(reports::system_status))
        .layer(middleware::from_fn(superadmin_middleware));

    let admin_routes = Router::new()
        .route("/navigation", get(navigation::sidebar))
        .route("/dashboard", get(reports::dashboard))
        .route("/admins/create-superadmin", post(admins::create_superadmin))
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route(
            "/subjects",
            get(subjects::list_subjects).post(subjects::create_subject),
        )
        .route(
            "/subjects/{id}",
            get(subjects::get_subject)
                .put(subjects::update_subject)
                .delete(subjects::delete_subject),
        )
        .route(
            "/batches",
            get(batches::list_batches).post(batches::create_batch),
        )
        .route(
            "/batches/{id}",
            get(batches::get_batch)
                .put(batches::update_batch)
                .delete(batches::delete_batch),
        )
        .route("/exams", get(exams::list_exams).post(exams::create_exam))
        .route("/exams/{id}", axum::routing::delete(exams::delete_exam))
        .route("/exams/{id}/rank", post(exams::rank_exam))
        .route(
            "/results",
            get(results::list_results).post(results::create_result),
        )
        .route(
            "/results/{id}",
            get(results::get_result)
                .put(results::update_result)
                .delete(results::delete_result),
        )
        .route("/results/{id}/card", get(cards::result_card))
        .route("/reports/exams/{id}", get(reports::exam_report))
        .route(
            "/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/notifications/{id}",
            axum::routing::delete(notifications::delete_notification),
        )
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .nest("/system", superadmin_routes)
        // Auth runs first for everything under /api/admin
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/results", public_result_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
