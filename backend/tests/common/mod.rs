// tests/common/mod.rs

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use quiz_portal::{
    catalog::QuizCatalog, config::Config, db, db::MIGRATOR, models::user::User, routes,
    state::AppState,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub const TEST_SECRET: &str = "test_secret_for_integration_tests";
pub const TEST_EMAIL: &str = "student@example.com";
pub const TEST_PASSWORD: &str = "password123";

pub struct TestApp {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub address: String,
    pub pool: SqlitePool,
    pub config: Config,
    pub user: User,
}

/// Spawns the app on a random port over a fresh in-memory database with one
/// seeded user.
pub async fn spawn_app() -> TestApp {
    // A single connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let user = db::seed_user(&pool, TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("Failed to seed test user");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        production: false,
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        quiz_catalog_path: None,
        static_dir: None,
        seed_user_email: None,
        seed_user_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        catalog: Arc::new(QuizCatalog::embedded().expect("Embedded catalog must load")),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        config,
        user,
    }
}

impl TestApp {
    /// Logs in with the seeded credentials and returns the bearer token.
    pub async fn login_token(&self) -> String {
        let body: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/api/auth/login", self.address))
            .json(&serde_json::json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }))
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .expect("Failed to parse login json");

        body["token"]
            .as_str()
            .expect("Token not found")
            .to_string()
    }

    pub async fn attempt_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attempts")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
