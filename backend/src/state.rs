// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{catalog::QuizCatalog, config::Config};

/// Shared, process-wide state. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub catalog: Arc<QuizCatalog>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<QuizCatalog> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}
