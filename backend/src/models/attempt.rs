// src/models/attempt.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

use crate::config::PASSING_SCORE_PERCENTAGE;

/// Submitted answers, keyed by zero-based question index.
pub type Answers = BTreeMap<u32, String>;

/// Represents the 'attempts' table in the database.
/// Rows are append-only; the latest attempt is the newest `created_at`.
#[derive(Debug, Clone, FromRow)]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: String,
    pub score: i64,
    pub answers: Json<Answers>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    #[validate(
        required(message = "Missing required fields"),
        length(min = 1, max = 100, message = "Missing required fields")
    )]
    pub quiz_id: Option<String>,

    /// Score as computed by the client. Recomputed server side before storage.
    #[validate(
        required(message = "Missing required fields"),
        range(min = 0, message = "Score must be a non-negative number")
    )]
    pub score: Option<i64>,

    #[validate(
        required(message = "Missing required fields"),
        range(min = 1, message = "Missing required fields")
    )]
    pub total_questions: Option<i64>,

    #[validate(required(message = "Missing required fields"))]
    pub answers: Option<Answers>,
}

/// Query parameters for fetching the latest attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestAttemptQuery {
    pub quiz_id: Option<String>,
}

/// Attempt summary returned by both results endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub quiz_id: String,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub passed: bool,
    pub answers: Answers,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl AttemptSummary {
    pub fn new(attempt: Attempt, total_questions: i64) -> Self {
        let percentage = percentage(attempt.score, total_questions);
        Self {
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            total_questions,
            percentage,
            passed: percentage >= PASSING_SCORE_PERCENTAGE,
            answers: attempt.answers.0,
            completed_at: attempt.created_at,
        }
    }
}

/// Response body of a successful submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAttemptResponse {
    pub success: bool,
    pub data: AttemptSummary,
}

fn percentage(score: i64, total_questions: i64) -> f64 {
    if total_questions <= 0 {
        return 0.0;
    }
    (score as f64 / total_questions as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(score: i64, answers: Answers) -> Attempt {
        Attempt {
            id: 1,
            user_id: 1,
            quiz_id: "exam1".to_string(),
            score,
            answers: Json(answers),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn summary_pass_threshold() {
        let summary = AttemptSummary::new(attempt(3, Answers::new()), 5);
        assert_eq!(summary.percentage, 60.0);
        assert!(summary.passed);

        let summary = AttemptSummary::new(attempt(2, Answers::new()), 5);
        assert!(!summary.passed);
    }

    #[test]
    fn summary_with_no_questions_is_zero_percent() {
        let summary = AttemptSummary::new(attempt(0, Answers::new()), 0);
        assert_eq!(summary.percentage, 0.0);
        assert!(!summary.passed);
    }

    #[test]
    fn answers_keys_round_trip_as_json_object() {
        let req: SubmitAttemptRequest = serde_json::from_value(serde_json::json!({
            "quizId": "exam1",
            "score": 1,
            "totalQuestions": 5,
            "answers": { "0": "Paris", "3": "Blue Whale" }
        }))
        .unwrap();

        let answers = req.answers.unwrap();
        assert_eq!(answers.get(&0).map(String::as_str), Some("Paris"));
        assert_eq!(answers.get(&3).map(String::as_str), Some("Blue Whale"));
    }

    #[test]
    fn missing_fields_fail_validation() {
        let req: SubmitAttemptRequest = serde_json::from_value(serde_json::json!({
            "quizId": "exam1",
            "score": 1
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }
}
