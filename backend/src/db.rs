// src/db.rs

use std::{str::FromStr, time::Duration};

use chrono::Utc;
use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{error::AppError, models::user::User, utils::hash::hash_password};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const CONNECT_RETRIES: u32 = 5;

/// Opens the connection pool, retrying a few times while the database comes up.
pub async fn connect_with_retry(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut retry_count = 0;
    loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > CONNECT_RETRIES {
                    return Err(e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

/// Creates a user with the given credentials unless the email is already taken.
/// Returns the stored user either way.
pub async fn seed_user(pool: &SqlitePool, email: &str, password: &str) -> Result<User, AppError> {
    let existing = sqlx::query_as::<_, User>(
        "SELECT id, email, password, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    if let Some(user) = existing {
        return Ok(user);
    }

    tracing::info!("Seeding user: {}", email);
    let hashed_password = hash_password(password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password, created_at)
        VALUES (?, ?, ?)
        RETURNING id, email, password, created_at
        "#,
    )
    .bind(email)
    .bind(hashed_password)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}
