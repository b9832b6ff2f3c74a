// src/main.rs

use dotenvy::dotenv;
use result_desk::config::Config;
use result_desk::routes;
use result_desk::session::Role;
use result_desk::state::AppState;
use result_desk::utils::hash::hash_password;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env().map_err(|e| format!("DATABASE_URL and JWT_SECRET must be set: {}", e))?;

    let file_appender = tracing_appender::rolling::daily("logs", "result_desk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    return Err(format!("Failed to connect to database after 5 retries: {}", e).into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    if let Err(e) = seed_admin(&pool, &config).await {
        tracing::error!("Failed to seed default admin: {:?}", e);
    }

    let app = routes::create_router(AppState::new(pool, config.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Result desk listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// Creates the bootstrap admin from `ADMIN_USERNAME` / `ADMIN_PASSWORD` on first start.
async fn seed_admin(pool: &PgPool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        if exists.is_none() {
            tracing::info!("Seeding default admin: {}", username);
            let hashed_password = hash_password(password)?;

            sqlx::query("INSERT INTO admins (username, password, role) VALUES ($1, $2, $3)")
                .bind(username)
                .bind(hashed_password)
                .bind(Role::Superadmin.as_str())
                .execute(pool)
                .await?;
            tracing::info!("Default admin created successfully.");
        }
    }
    Ok(())
}
