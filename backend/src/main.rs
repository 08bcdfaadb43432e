// src/main.rs

use std::sync::Arc;

use quiz_portal::{
    catalog::QuizCatalog,
    config::Config,
    db::{self, MIGRATOR},
    routes,
    state::AppState,
    utils::hash::warm_up_dummy_hash,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Config errors happen before the subscriber is installed.
        if tracing::dispatcher::has_been_set() {
            tracing::error!("Fatal: {}", e);
        }
        eprintln!("quiz-portal: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (and .env, if present)
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    warm_up_dummy_hash();

    let catalog = QuizCatalog::load(config.quiz_catalog_path.as_deref())?;
    tracing::info!("Loaded {} quiz(zes) into the catalog", catalog.len());

    let pool = db::connect_with_retry(&config.database_url).await?;
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    if let (Some(email), Some(password)) = (&config.seed_user_email, &config.seed_user_password) {
        if let Err(e) = db::seed_user(&pool, email, password).await {
            tracing::error!("Failed to seed user: {:?}", e);
        }
    }

    let addr = config.bind_addr;
    let state = AppState {
        pool,
        config,
        catalog: Arc::new(catalog),
    };

    let app = routes::create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
