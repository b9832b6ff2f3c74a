// tests/flow_tests.rs
//
// End-to-end flows against a real Postgres. Run with
// `DATABASE_URL=postgres://... cargo test -- --ignored`.

use result_desk::{
    config::Config, models::admin::Admin, routes, state::AppState, utils::jwt::sign_jwt,
};
use serde_json::{Value, json};
use sqlx::{PgPool, postgres::PgPoolOptions};

const ADMIN: &str = "flow_admin";
const PASSWORD: &str = "flow-password-1";
const SECRET: &str = "flow_test_secret";

/// Spawns the app on a random port against `DATABASE_URL` with a seeded bootstrap admin.
async fn spawn_app() -> (String, PgPool) {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let hashed = result_desk::utils::hash::hash_password(PASSWORD).unwrap();
    sqlx::query(
        "INSERT INTO admins (username, password, role) VALUES ($1, $2, 'admin')
         ON CONFLICT (username) DO UPDATE SET password = EXCLUDED.password",
    )
    .bind(ADMIN)
    .bind(hashed)
    .execute(&pool)
    .await
    .unwrap();

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: SECRET.to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_username: Some(ADMIN.to_string()),
        admin_password: None,
        port: 0,
    };

    let app = routes::create_router(AppState::new(pool.clone(), config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{}", port), pool)
}

/// Inserts a throwaway admin account and returns it with a token signed for it.
async fn seed_account(pool: &PgPool, role: &str, sidebar_restricted: bool) -> (Admin, String) {
    let username = format!("acct_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let admin = sqlx::query_as::<_, Admin>(
        "INSERT INTO admins (username, password, role, sidebar_restricted)
         VALUES ($1, 'unused', $2, $3)
         RETURNING id, username, password, role, sidebar_restricted, created_at",
    )
    .bind(&username)
    .bind(role)
    .bind(sidebar_restricted)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = sign_jwt(&admin, SECRET, 600).unwrap();
    (admin, token)
}

async fn get(client: &reqwest::Client, url: String, token: &str) -> (u16, Value) {
    let resp = client.get(url).bearer_auth(token).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap_or(Value::Null))
}

async fn login(client: &reqwest::Client, address: &str) -> String {
    let resp: Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({"username": ADMIN, "password": PASSWORD}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    resp["token"].as_str().expect("Token not found").to_string()
}

async fn post(client: &reqwest::Client, url: String, token: &str, body: Value) -> (u16, Value) {
    let resp = client
        .post(url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn wrong_password_is_rejected() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({"username": ADMIN, "password": "nope"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn result_card_flow() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &address).await;
    let tag = &uuid::Uuid::new_v4().to_string()[..8];

    // 1. Reference data
    let (status, batch) = post(
        &client,
        format!("{}/api/admin/batches", address),
        &token,
        json!({"name": format!("batch_{}", tag), "class_name": "Grade 7"}),
    )
    .await;
    assert_eq!(status, 201);

    let (_, physics) = post(
        &client,
        format!("{}/api/admin/subjects", address),
        &token,
        json!({
            "name": "Physics",
            "name_arabic": "الفيزياء",
            "scoring_scheme": [
                {"key": "theory", "label": "Theory", "max": 80},
                {"key": "practical", "label": "Practical", "max": 20}
            ]
        }),
    )
    .await;

    let (_, arabic) = post(
        &client,
        format!("{}/api/admin/subjects", address),
        &token,
        json!({
            "name": "Arabic",
            "scoring_scheme": [
                {"key": "written", "label": "Written", "max": 100},
                {"key": "total", "label": "Total", "max": 100, "computed": true}
            ]
        }),
    )
    .await;

    let mut student_ids = Vec::new();
    for i in 0..2 {
        let (status, student) = post(
            &client,
            format!("{}/api/admin/students", address),
            &token,
            json!({
                "reg_number": format!("R{}-{}", tag, i),
                "name": format!("Student {}", i),
                "batch_id": batch["id"]
            }),
        )
        .await;
        assert_eq!(status, 201);
        student_ids.push(student["id"].as_i64().unwrap());
    }

    // Duplicate registration number
    let (status, _) = post(
        &client,
        format!("{}/api/admin/students", address),
        &token,
        json!({"reg_number": format!("R{}-0", tag), "name": "Copy"}),
    )
    .await;
    assert_eq!(status, 409);

    let (_, exam) = post(
        &client,
        format!("{}/api/admin/exams", address),
        &token,
        json!({"title": "Final Semester", "batch_id": batch["id"]}),
    )
    .await;
    let exam_id = exam["id"].as_i64().unwrap();

    // 2. Results
    let (status, first) = post(
        &client,
        format!("{}/api/admin/results", address),
        &token,
        json!({
            "exam_id": exam_id,
            "student_id": student_ids[0],
            "subjects": [
                {"subject_id": physics["id"], "marks": {"theory": 60, "practical": 15}},
                {"subject_id": arabic["id"], "marks": {"absent": true}}
            ],
            "grand_total": 75,
            "percentage": 37.5
        }),
    )
    .await;
    assert_eq!(status, 201);

    let (status, _) = post(
        &client,
        format!("{}/api/admin/results", address),
        &token,
        json!({
            "exam_id": exam_id,
            "student_id": student_ids[1],
            "subjects": [
                {"subject_id": physics["id"], "marks": {"theory": 70, "practical": "A"}},
                {"subject_id": arabic["id"], "marks": {"written": 90}}
            ],
            "grand_total": 160,
            "percentage": 80
        }),
    )
    .await;
    assert_eq!(status, 201);

    // 3. Card is unavailable before ranking
    let resp = client
        .get(format!("{}/api/admin/results/{}/card", address, first["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);

    // 4. Rank and read the public card
    let (status, ranks) = post(
        &client,
        format!("{}/api/admin/exams/{}/rank", address, exam_id),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(ranks.as_array().unwrap().len(), 2);

    let card: Value = client
        .get(format!(
            "{}/api/results/lookup?exam_id={}&reg_number=R{}-0",
            address, exam_id, tag
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(card["class_name"], "Grade 7");
    assert_eq!(card["summary"]["rank"], 2);
    assert_eq!(card["summary"]["rank_suffix"], "nd");
    assert_eq!(card["summary"]["grand_total"], 75.0);
    assert_eq!(card["summary"]["max_total"], 200.0);
    assert_eq!(card["summary"]["failed_subjects"], 1);
    assert_eq!(card["summary"]["grade"]["label"], "F");
    assert_eq!(card["subjects"][0]["percentage_label"], "75.0%");
    assert_eq!(card["subjects"][1]["is_absent"], true);
    assert_eq!(card["photo_url"], "/images/student-avatar.png");

    // 5. Report and notifications
    let report: Value = client
        .get(format!("{}/api/admin/reports/exams/{}", address, exam_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["results"], 2);
    assert_eq!(report["passed"], 2);

    let notifications: Value = client
        .get(format!("{}/api/admin/notifications?unread_only=true", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        notifications
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["message"].as_str().unwrap().contains("Final Semester"))
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn navigation_follows_access_level() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, clerk) = seed_account(&pool, "admin", true).await;
    let (status, body) = get(
        &client,
        format!("{}/api/admin/navigation?path=/admin/results", address),
        &clerk,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["access"], "admin");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 6);
    let active: Vec<_> = items
        .iter()
        .filter(|i| i["active"] == true)
        .map(|i| i["href"].as_str().unwrap())
        .collect();
    assert_eq!(active, ["/admin/results"]);

    let (_, open) = seed_account(&pool, "admin", false).await;
    let (_, body) = get(&client, format!("{}/api/admin/navigation", address), &open).await;
    assert_eq!(body["access"], "unrestricted");
    assert_eq!(body["items"].as_array().unwrap().len(), 9);

    let bootstrap = login(&client, &address).await;
    let (_, body) = get(&client, format!("{}/api/admin/navigation", address), &bootstrap).await;
    assert_eq!(body["access"], "env_superadmin");
    assert_eq!(body["items"].as_array().unwrap().len(), 9);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn system_routes_need_an_elevated_session() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, clerk) = seed_account(&pool, "admin", true).await;
    let (status, _) = get(&client, format!("{}/api/admin/system/admins", address), &clerk).await;
    assert_eq!(status, 403);

    let (head, token) = seed_account(&pool, "superadmin", true).await;
    let (status, body) = get(&client, format!("{}/api/admin/system/status", address), &token).await;
    assert_eq!(status, 200);
    assert_eq!(body["database"], "up");

    let (status, me) = get(&client, format!("{}/api/auth/me", address), &token).await;
    assert_eq!(status, 200);
    assert_eq!(me["username"], head.username.as_str());
    assert_eq!(me["access"], "superadmin");
    assert_eq!(me["admin_id"], head.id);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn issued_tokens_follow_account_changes() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let bootstrap = login(&client, &address).await;

    // Demotion takes effect on the next request.
    let (head, token) = seed_account(&pool, "superadmin", true).await;
    let status_url = format!("{}/api/admin/system/status", address);
    assert_eq!(get(&client, status_url.clone(), &token).await.0, 200);

    let resp = client
        .put(format!("{}/api/admin/system/admins/{}", address, head.id))
        .bearer_auth(&bootstrap)
        .json(&json!({"role": "admin"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(get(&client, status_url, &token).await.0, 403);

    // A deleted account's token is dead.
    let (clerk, clerk_token) = seed_account(&pool, "admin", true).await;
    let nav_url = format!("{}/api/admin/navigation", address);
    assert_eq!(get(&client, nav_url.clone(), &clerk_token).await.0, 200);

    let resp = client
        .delete(format!("{}/api/admin/system/admins/{}", address, clerk.id))
        .bearer_auth(&bootstrap)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let (status, body) = get(&client, nav_url, &clerk_token).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid token");
}
