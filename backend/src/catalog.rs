// src/catalog.rs

use std::{collections::HashSet, fs, path::Path};

use thiserror::Error;

use crate::models::quiz::{Quiz, QuizSummary};

const EMBEDDED_CATALOG: &str = include_str!("../data/quizzes.json");

/// Read-only quiz catalog, loaded once at startup and shared by the scoring
/// code, the catalog endpoints and exam sessions.
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    quizzes: Vec<Quiz>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read quiz catalog: {0}")]
    Io(#[source] std::io::Error),
    #[error("failed to parse quiz catalog: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid quiz catalog: {0}")]
    Invalid(String),
}

impl QuizCatalog {
    /// Builds a catalog, checking every quiz and question.
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for quiz in &quizzes {
            if !seen.insert(quiz.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate quiz id {:?}",
                    quiz.id
                )));
            }
            if quiz.questions.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "quiz {:?} has no questions",
                    quiz.id
                )));
            }
            if quiz.duration_seconds == 0 {
                return Err(CatalogError::Invalid(format!(
                    "quiz {:?} has a zero duration",
                    quiz.id
                )));
            }
            for question in &quiz.questions {
                question.check().map_err(|reason| {
                    CatalogError::Invalid(format!(
                        "quiz {:?}, question {}: {}",
                        quiz.id, question.id, reason
                    ))
                })?;
            }
        }

        Ok(Self { quizzes })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let quizzes: Vec<Quiz> = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Self::new(quizzes)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path).map_err(CatalogError::Io)?;
        Self::from_json(&json)
    }

    /// The catalog bundled with the binary (EXAM-1).
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Loads from `path` when given, otherwise falls back to the bundled catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }

    pub fn summaries(&self) -> Vec<QuizSummary> {
        self.quizzes.iter().map(QuizSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}
