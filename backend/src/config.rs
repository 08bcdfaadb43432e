// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;
use thiserror::Error;

/// Minimum percentage for an attempt to count as passed.
pub const PASSING_SCORE_PERCENTAGE: f64 = 60.0;

/// Name of the session cookie set on login and checked by the route guard.
pub const TOKEN_COOKIE_NAME: &str = "token";

/// Default token lifetime: one day.
pub const DEFAULT_JWT_EXPIRATION: u64 = 86_400;

/// Longest accepted token lifetime: one year.
pub const MAX_JWT_EXPIRATION: u64 = 365 * 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds. Also used as the cookie max-age.
    pub jwt_expiration: u64,
    pub rust_log: String,
    /// Sets the `Secure` flag on the session cookie.
    pub production: bool,
    pub bind_addr: SocketAddr,
    pub quiz_catalog_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub seed_user_email: Option<String>,
    pub seed_user_password: Option<String>,
}

/// Startup configuration problems. The server refuses to start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;

        // No fallback secret: a missing key is a misconfiguration.
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = match optional("JWT_EXPIRATION") {
            Some(raw) => parse_jwt_expiration(raw)?,
            None => DEFAULT_JWT_EXPIRATION,
        };

        let rust_log = optional("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let production = optional("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let bind_addr = match optional("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: raw,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            production,
            bind_addr,
            quiz_catalog_path: optional("QUIZ_CATALOG_PATH").map(PathBuf::from),
            static_dir: optional("STATIC_DIR").map(PathBuf::from),
            seed_user_email: optional("SEED_USER_EMAIL"),
            seed_user_password: optional("SEED_USER_PASSWORD"),
        })
    }
}

/// Token lifetime in seconds, within `1..=MAX_JWT_EXPIRATION`.
fn parse_jwt_expiration(raw: String) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| (1..=MAX_JWT_EXPIRATION).contains(secs))
        .ok_or(ConfigError::Invalid {
            key: "JWT_EXPIRATION",
            value: raw,
        })
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

/// Reads a variable, treating an empty value the same as an unset one.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_expiration_accepts_sane_lifetimes() {
        assert_eq!(parse_jwt_expiration("600".to_string()).unwrap(), 600);
        assert_eq!(
            parse_jwt_expiration(MAX_JWT_EXPIRATION.to_string()).unwrap(),
            MAX_JWT_EXPIRATION
        );
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Missing("JWT_SECRET").to_string(),
            "JWT_SECRET must be set"
        );
        assert_eq!(
            parse_jwt_expiration("0".to_string()).unwrap_err().to_string(),
            "JWT_EXPIRATION has an invalid value: \"0\""
        );
    }

    #[test]
    fn test_jwt_expiration_rejects_out_of_range_values() {
        let too_long = (MAX_JWT_EXPIRATION + 1).to_string();
        let huge = u64::MAX.to_string();

        for raw in ["0", "-5", "soon", too_long.as_str(), huge.as_str()] {
            assert!(
                matches!(
                    parse_jwt_expiration(raw.to_string()),
                    Err(ConfigError::Invalid { key: "JWT_EXPIRATION", .. })
                ),
                "value: {}",
                raw
            );
        }
    }
}
