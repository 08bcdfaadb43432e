// src/client.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    attempt::{AttemptSummary, SubmitAttemptRequest, SubmitAttemptResponse},
    user::{LoginResponse, User},
};

/// The client's view of "who is logged in". Created from a login response and
/// passed explicitly to whatever needs the token.
#[derive(Debug, Clone)]
pub struct ClientSession {
    token: String,
    user: User,
}

impl ClientSession {
    pub fn new(token: String, user: User) -> Self {
        Self { token, user }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

impl From<LoginResponse> for ClientSession {
    fn from(resp: LoginResponse) -> Self {
        Self::new(resp.token, resp.user)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// 401 from the server: missing, invalid or expired token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The request never got a response.
    #[error("request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Seam between an exam session and wherever attempts are stored.
#[async_trait]
pub trait AttemptSubmitter: Send + Sync {
    async fn submit(&self, request: &SubmitAttemptRequest) -> Result<AttemptSummary, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the results API, authenticated with a `ClientSession`.
#[derive(Debug, Clone)]
pub struct HttpResultsClient {
    http: reqwest::Client,
    base_url: String,
    session: ClientSession,
}

impl HttpResultsClient {
    pub fn new(base_url: impl Into<String>, session: ClientSession) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Logs in and returns the resulting session.
    pub async fn login(
        base_url: &str,
        email: &str,
        password: &str,
    ) -> Result<ClientSession, ClientError> {
        let response = reqwest::Client::new()
            .post(format!("{}/api/auth/login", base_url.trim_end_matches('/')))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body: LoginResponse = parse(response).await?;
        Ok(ClientSession::from(body))
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// Fetches the latest stored attempt for a quiz.
    pub async fn latest(&self, quiz_id: &str) -> Result<AttemptSummary, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/results", self.base_url))
            .query(&[("quizId", quiz_id)])
            .bearer_auth(self.session.token())
            .send()
            .await?;

        parse(response).await
    }
}

#[async_trait]
impl AttemptSubmitter for HttpResultsClient {
    async fn submit(&self, request: &SubmitAttemptRequest) -> Result<AttemptSummary, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/results", self.base_url))
            .bearer_auth(self.session.token())
            .json(request)
            .send()
            .await?;

        let body: SubmitAttemptResponse = parse(response).await?;
        Ok(body.data)
    }
}

/// Maps a response to its JSON body or to a `ClientError` carrying the
/// server's `{"error": ...}` message.
async fn parse<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Rejected {
            status: status.as_u16(),
            message,
        },
    })
}
