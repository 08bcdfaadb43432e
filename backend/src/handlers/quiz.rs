// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{catalog::QuizCatalog, error::AppError, models::quiz::PublicQuiz};

/// Lists the quizzes in the catalog (no questions).
pub async fn list_quizzes(State(catalog): State<Arc<QuizCatalog>>) -> impl IntoResponse {
    Json(catalog.summaries())
}

/// Returns a quiz with its questions, without the correct answers.
pub async fn get_quiz(
    State(catalog): State<Arc<QuizCatalog>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(PublicQuiz::from(quiz)))
}
