// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, quiz, results},
    state::AppState,
    utils::{guard::route_guard, jwt::auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quizzes, results).
/// * Serves page paths from `STATIC_DIR` when configured.
/// * Applies global middleware (route guard, Trace, CORS).
/// * Injects global state (pool, config, catalog).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let quiz_routes = Router::new()
        .route("/api/quizzes", get(quiz::list_quizzes))
        .route("/api/quizzes/{id}", get(quiz::get_quiz));

    // Protected: bearer token required
    let results_routes = Router::new()
        .route(
            "/api/results",
            post(results::submit_result).get(results::latest_result),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .nest("/api/auth", auth_routes)
        .merge(quiz_routes)
        .merge(results_routes);

    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        // Global Middleware (applied from outside in)
        .layer(middleware::from_fn(route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
