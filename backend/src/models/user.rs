// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for user login.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation error instead of a body rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email and password are required"),
        length(min = 1, message = "Email and password are required")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Email and password are required"),
        length(min = 1, message = "Email and password are required")
    )]
    pub password: Option<String>,
}

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user: User,
}
