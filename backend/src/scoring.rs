// src/scoring.rs

use crate::models::{attempt::Answers, quiz::Quiz};

/// Normalizes an answer for comparison: surrounding whitespace is trimmed on
/// both sides and the text is case-folded.
pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

pub fn is_correct(submitted: &str, correct: &str) -> bool {
    normalize(submitted) == normalize(correct)
}

/// Scores a set of answers against a quiz: one point per question whose
/// recorded answer matches the correct answer. Unanswered questions and
/// answers for indices outside the quiz score nothing.
pub fn score_answers(quiz: &Quiz, answers: &Answers) -> u32 {
    quiz.questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            answers
                .get(&(*index as u32))
                .is_some_and(|answer| is_correct(answer, &question.correct_answer))
        })
        .count() as u32
}
