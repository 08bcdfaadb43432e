// src/utils/hash.rs

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash verified against when the login email is unknown, so both failure
/// paths cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("dummy-password-for-timing").ok());

/// Computes the dummy hash up front so the first unknown-email login costs
/// the same as any other.
pub fn warm_up_dummy_hash() {
    LazyLock::force(&DUMMY_HASH);
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a stored PHC hash string.
/// A malformed stored hash is a server-side fault, not a credential mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Verifies against the stored hash when there is one, otherwise burns the
/// same work on a dummy hash and reports a mismatch.
pub fn verify_password_or_dummy(
    password: &str,
    password_hash: Option<&str>,
) -> Result<bool, AppError> {
    match password_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            Ok(false)
        }
    }
}
