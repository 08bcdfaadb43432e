// src/session.rs

use std::time::Duration;

use thiserror::Error;

use crate::{
    client::{AttemptSubmitter, ClientError},
    models::{
        attempt::{Answers, AttemptSummary, SubmitAttemptRequest},
        quiz::{Question, Quiz},
    },
    scoring::score_answers,
};

/// Interval at which the owner of a session is expected to call `tick`.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// State of a client-held exam run.
#[derive(Debug, Clone, PartialEq)]
pub enum ExamState {
    InProgress { question_index: usize, elapsed: u64 },
    /// Waiting for the attempt to be stored. `forced` is set when the timer ran out.
    Submitting { forced: bool },
    /// Stored after a manual submit.
    Submitted(AttemptSummary),
    /// Stored after the timer forced the submit.
    TimedOut(AttemptSummary),
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The action only applies while the exam is in progress.
    #[error("exam is not in progress")]
    NotInProgress,
    #[error("exam was already submitted")]
    AlreadySubmitted,
    /// Storing the attempt failed. The session stays in `Submitting` and can be resubmitted.
    #[error("failed to submit quiz, please try again: {0}")]
    SubmitFailed(#[source] ClientError),
}

impl SessionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::SubmitFailed(_))
    }
}

/// One user's run through a quiz: current question, answers and the timer.
#[derive(Debug, Clone)]
pub struct ExamSession {
    quiz: Quiz,
    answers: Answers,
    state: ExamState,
}

impl ExamSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            answers: Answers::new(),
            state: ExamState::InProgress {
                question_index: 0,
                elapsed: 0,
            },
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn state(&self) -> &ExamState {
        &self.state
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn question_index(&self) -> Option<usize> {
        match self.state {
            ExamState::InProgress { question_index, .. } => Some(question_index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.question_index().and_then(|i| self.quiz.questions.get(i))
    }

    /// The answer recorded for the current question, if any.
    pub fn current_answer(&self) -> Option<&str> {
        self.question_index()
            .and_then(|i| self.answers.get(&(i as u32)))
            .map(String::as_str)
    }

    pub fn remaining_seconds(&self) -> u64 {
        match self.state {
            ExamState::InProgress { elapsed, .. } => {
                self.quiz.duration_seconds.saturating_sub(elapsed)
            }
            _ => 0,
        }
    }

    /// Score of the answers recorded so far.
    pub fn running_score(&self) -> u32 {
        score_answers(&self.quiz, &self.answers)
    }

    /// Records `value` for the current question. The question index is unchanged.
    pub fn answer(&mut self, value: impl Into<String>) -> Result<(), SessionError> {
        let index = self.question_index().ok_or(SessionError::NotInProgress)?;
        self.answers.insert(index as u32, value.into());
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), SessionError> {
        let last = self.quiz.question_count().saturating_sub(1);
        self.move_to(|index| (index + 1).min(last))
    }

    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.move_to(|index| index.saturating_sub(1))
    }

    fn move_to(&mut self, step: impl FnOnce(usize) -> usize) -> Result<(), SessionError> {
        match &mut self.state {
            ExamState::InProgress { question_index, .. } => {
                *question_index = step(*question_index);
                Ok(())
            }
            _ => Err(SessionError::NotInProgress),
        }
    }

    /// Advances the timer by one second. Returns `true` when this tick used up
    /// the remaining time, in which case the session is now `Submitting` and
    /// the caller must `submit` it. Ticks outside `InProgress` are ignored.
    pub fn tick(&mut self) -> bool {
        let ExamState::InProgress { elapsed, .. } = &mut self.state else {
            return false;
        };

        *elapsed += 1;
        if *elapsed >= self.quiz.duration_seconds {
            tracing::info!("Time is up for quiz {}, forcing submit", self.quiz.id);
            self.state = ExamState::Submitting { forced: true };
            return true;
        }
        false
    }

    /// Builds the request body sent to the results endpoint.
    pub fn submission_request(&self) -> SubmitAttemptRequest {
        SubmitAttemptRequest {
            quiz_id: Some(self.quiz.id.clone()),
            score: Some(i64::from(self.running_score())),
            total_questions: Some(self.quiz.question_count() as i64),
            answers: Some(self.answers.clone()),
        }
    }

    /// Scores the recorded answers and stores the attempt through `submitter`.
    ///
    /// Works from `InProgress` (manual submit) and from `Submitting` (forced
    /// by the timer, or a retry after a failure). Answers are kept on failure.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<AttemptSummary, SessionError>
    where
        S: AttemptSubmitter + ?Sized,
    {
        let forced = match self.state {
            ExamState::InProgress { .. } => false,
            ExamState::Submitting { forced } => forced,
            ExamState::Submitted(_) | ExamState::TimedOut(_) => {
                return Err(SessionError::AlreadySubmitted);
            }
        };
        self.state = ExamState::Submitting { forced };

        let request = self.submission_request();
        match submitter.submit(&request).await {
            Ok(summary) => {
                self.state = if forced {
                    ExamState::TimedOut(summary.clone())
                } else {
                    ExamState::Submitted(summary.clone())
                };
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!("Error submitting quiz {}: {}", self.quiz.id, e);
                Err(SessionError::SubmitFailed(e))
            }
        }
    }
}
