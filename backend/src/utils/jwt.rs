// src/utils/jwt.rs

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// JWT Claims structure.
/// Field names on the wire are the registered claim names.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject - the user ID.
    #[serde(rename = "sub")]
    pub user_id: i64,
    pub email: String,
    /// Issued-at time as Unix timestamp.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiration time as Unix timestamp.
    #[serde(rename = "exp")]
    pub expiry: i64,
}

/// Signs a new JWT for the user, valid for `expiration_seconds` from now.
pub fn sign_jwt(
    user_id: i64,
    email: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    sign_jwt_at(user_id, email, secret, expiration_seconds, Utc::now().timestamp())
}

/// Signs a JWT as if issued at `issued_at` (Unix seconds).
pub fn sign_jwt_at(
    user_id: i64,
    email: &str,
    secret: &str,
    expiration_seconds: u64,
    issued_at: i64,
) -> Result<String, AppError> {
    let lifetime = i64::try_from(expiration_seconds)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let expiry = issued_at
        .checked_add(lifetime)
        .ok_or_else(|| AppError::InternalServerError("token expiry overflows".to_string()))?;

    let claims = Claims {
        user_id,
        email: email.to_owned(),
        issued_at,
        expiry,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Checks the signature and expiry (no leeway). Any failure is reported as an
/// `AppError::AuthError`; callers treat it as "unauthenticated".
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AppError::AuthError("Invalid token".to_string())
    })?;

    Ok(token_data.claims)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// If valid, injects `Claims` into the request extensions for handlers to use.
/// If missing or invalid, returns 401 before the handler runs.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

    let claims = verify_jwt(token, &config.jwt_secret)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit_test_secret";

    #[test]
    fn test_sign_and_verify_round_trip() {
        let token = sign_jwt(42, "a@example.com", SECRET, 3600).unwrap();
        let claims = verify_jwt(&token, SECRET).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.expiry - claims.issued_at, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let two_days_ago = Utc::now().timestamp() - 2 * 86_400;
        let token = sign_jwt_at(42, "a@example.com", SECRET, 86_400, two_days_ago).unwrap();

        assert!(matches!(
            verify_jwt(&token, SECRET),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn test_unrepresentable_expiry_is_internal_error() {
        for lifetime in [u64::MAX, i64::MAX as u64] {
            assert!(matches!(
                sign_jwt(42, "a@example.com", SECRET, lifetime),
                Err(AppError::InternalServerError(_))
            ));
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = sign_jwt(42, "a@example.com", SECRET, 3600).unwrap();
        assert!(verify_jwt(&token, "rotated_secret").is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(verify_jwt("not.a.jwt", SECRET).is_err());
        assert!(verify_jwt("", SECRET).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc.def"), None);
    }
}
