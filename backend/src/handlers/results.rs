// src/handlers/results.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    catalog::QuizCatalog,
    error::AppError,
    extractors::AppJson,
    models::attempt::{
        Attempt, AttemptSummary, LatestAttemptQuery, SubmitAttemptRequest, SubmitAttemptResponse,
    },
    scoring::score_answers,
    utils::jwt::Claims,
};

/// Stores a finished attempt for the authenticated user.
///
/// * The score is recomputed from the catalog and the submitted answers; the
///   client-reported score and question count are only compared and logged.
/// * Every call appends a new row. Nothing is updated in place.
pub async fn submit_result(
    State(pool): State<SqlitePool>,
    State(catalog): State<Arc<QuizCatalog>>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let (Some(quiz_id), Some(reported_score), Some(reported_total), Some(answers)) =
        (req.quiz_id, req.score, req.total_questions, req.answers)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let quiz = catalog
        .get(&quiz_id)
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    if let Some(index) = answers
        .keys()
        .find(|index| **index as usize >= quiz.question_count())
    {
        return Err(AppError::BadRequest(format!(
            "Answer index {} is out of range",
            index
        )));
    }

    let score = i64::from(score_answers(quiz, &answers));
    let total_questions = quiz.question_count() as i64;

    if reported_score != score || reported_total != total_questions {
        tracing::warn!(
            "User {} reported {}/{} for quiz {}, recomputed {}/{}",
            claims.user_id,
            reported_score,
            reported_total,
            quiz_id,
            score,
            total_questions
        );
    }

    let attempt = sqlx::query_as::<_, Attempt>(
        r#"
        INSERT INTO attempts (user_id, quiz_id, score, answers, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, quiz_id, score, answers, created_at
        "#,
    )
    .bind(claims.user_id)
    .bind(&quiz_id)
    .bind(score)
    .bind(SqlJson(&answers))
    .bind(Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert attempt: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!(
        "Stored attempt {} for user {} on quiz {} with score {}",
        attempt.id,
        attempt.user_id,
        attempt.quiz_id,
        attempt.score
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitAttemptResponse {
            success: true,
            data: AttemptSummary::new(attempt, total_questions),
        }),
    ))
}

/// Returns the most recent attempt of the authenticated user for a quiz.
///
/// `totalQuestions` is the number of answers stored with the attempt.
pub async fn latest_result(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<LatestAttemptQuery>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = params
        .quiz_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Quiz ID is required".to_string()))?;

    let attempt = sqlx::query_as::<_, Attempt>(
        r#"
        SELECT id, user_id, quiz_id, score, answers, created_at
        FROM attempts
        WHERE user_id = ? AND quiz_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(claims.user_id)
    .bind(&quiz_id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch latest attempt: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or_else(|| AppError::NotFound("No results found".to_string()))?;

    let total_questions = attempt.answers.len() as i64;

    Ok(Json(AttemptSummary::new(attempt, total_questions)))
}
