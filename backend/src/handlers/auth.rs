// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::{Config, TOKEN_COOKIE_NAME},
    error::AppError,
    extractors::AppJson,
    models::user::{LoginRequest, LoginResponse, User},
    utils::{hash::verify_password_or_dummy, jwt::sign_jwt},
};

/// Same message for unknown email and wrong password.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

const MISSING_CREDENTIALS: &str = "Email and password are required";

/// Builds the HTTP-only session cookie carrying the token.
fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    let max_age = i64::try_from(config.jwt_expiration).unwrap_or(i64::MAX);

    Cookie::build((TOKEN_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(config.production)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Authenticates a user and returns a JWT token.
///
/// Verifies the email and password against the database.
/// If valid, signs a JWT with the user's ID and email, sets it as the
/// session cookie and returns it together with the user (without the hash).
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.validate().is_err() {
        return Err(AppError::BadRequest(MISSING_CREDENTIALS.to_string()));
    }
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::BadRequest(MISSING_CREDENTIALS.to_string()));
    };

    tracing::info!("Login attempt for email: {}", email);

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let is_valid =
        verify_password_or_dummy(&password, user.as_ref().map(|u| u.password.as_str()))?;

    let user = match user {
        Some(user) if is_valid => user,
        _ => {
            tracing::info!("Rejected login for email: {}", email);
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = sign_jwt(user.id, &user.email, &config.jwt_secret, config.jwt_expiration)?;
    let jar = jar.add(session_cookie(token.clone(), &config));

    tracing::info!("Login successful for user {}", user.id);

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
            token_type: "Bearer".to_string(),
            user,
        }),
    ))
}

/// Clears the session cookie. Always succeeds.
pub async fn logout(State(config): State<Config>, jar: CookieJar) -> impl IntoResponse {
    let cookie = Cookie::build((TOKEN_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .secure(config.production)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build();

    (StatusCode::NO_CONTENT, jar.add(cookie))
}
