// src/models/quiz.rs

use serde::{Deserialize, Deserializer, Serialize};

/// Question kind. Catalog files may use the short forms `multiple` / `short`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[serde(alias = "multiple")]
    MultipleChoice,
    #[serde(alias = "short")]
    ShortAnswer,
}

/// A single question of a quiz, including its answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,

    #[serde(alias = "question")]
    pub prompt: String,

    #[serde(alias = "type")]
    pub kind: QuestionKind,

    /// Present iff `kind` is `MultipleChoice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Numeric answers in catalog files are coerced to their string form.
    #[serde(deserialize_with = "string_or_number")]
    pub correct_answer: String,
}

impl Question {
    /// Checks the shape invariants of the question.
    pub fn check(&self) -> Result<(), String> {
        match (self.kind, &self.options) {
            (QuestionKind::MultipleChoice, None) => {
                Err("multiple choice question has no options".to_string())
            }
            (QuestionKind::MultipleChoice, Some(options)) if options.is_empty() => {
                Err("multiple choice question has no options".to_string())
            }
            (QuestionKind::MultipleChoice, Some(options)) => {
                let correct = self.correct_answer.to_lowercase();
                if options.iter().any(|o| o.to_lowercase() == correct) {
                    Ok(())
                } else {
                    Err(format!(
                        "correct answer {:?} is not one of the options",
                        self.correct_answer
                    ))
                }
            }
            (QuestionKind::ShortAnswer, Some(_)) => {
                Err("short answer question must not have options".to_string())
            }
            (QuestionKind::ShortAnswer, None) => Ok(()),
        }
    }
}

/// A quiz definition. Static configuration; never mutated after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub duration_seconds: u64,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// DTO for the quiz list (no questions).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub duration_seconds: u64,
    pub question_count: usize,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            duration_seconds: quiz.duration_seconds,
            question_count: quiz.question_count(),
        }
    }
}

/// DTO for sending a question to the client (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: u32,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// DTO for sending a full quiz to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: String,
    pub title: String,
    pub duration_seconds: u64,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            duration_seconds: quiz.duration_seconds,
            questions: quiz
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    prompt: q.prompt.clone(),
                    kind: q.kind,
                    options: q.options.clone(),
                })
                .collect(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
