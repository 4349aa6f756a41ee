//! User records, profile settings and referral credits

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::models::User;
use crate::{Error, Result};

/// Profile fields editable from the settings page
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsUpdate {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub two_factor_enabled: bool,
}

impl SettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(Error::InvalidInput("Full name is required".to_string()));
        }
        Ok(())
    }
}

/// Dashboard statistics for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub agent_count: i64,
    pub meeting_count: i64,
    /// Total call time in seconds over meetings with both timestamps
    pub total_duration: i64,
}

pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Conflict(format!("{} already exists", what))
        }
        _ => Error::Database(err),
    }
}

/// Create a user row (called when the auth service signs someone up)
pub async fn create_user(pool: &SqlitePool, name: &str, email: &str) -> Result<User> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(Error::InvalidInput(format!("Invalid email: {}", email)));
    }

    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(email)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, "A user with this email"))?;

    info!(user_id = %user.id, "Created user");
    Ok(user)
}

pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Credit the user with `referrer_email` for one successful referral.
///
/// Returns false when no such user exists.
pub async fn credit_referral(pool: &SqlitePool, referrer_email: &str) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE users SET referral_count = referral_count + 1, updated_at = ? WHERE email = ?",
    )
    .bind(Utc::now())
    .bind(referrer_email.trim())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Raw referral credits, validated non-negative.
///
/// An unknown user has no credits.
pub async fn referral_count(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let count: Option<i64> = sqlx::query_scalar("SELECT referral_count FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match count {
        None => Ok(0),
        Some(n) => u64::try_from(n)
            .map_err(|_| Error::InvalidInput(format!("Negative referral count {} for user {}", n, user_id))),
    }
}

pub async fn update_settings(
    pool: &SqlitePool,
    user_id: &str,
    update: &SettingsUpdate,
) -> Result<User> {
    update.validate()?;

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = ?, phone = ?, location = ?, two_factor_enabled = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(update.full_name.trim())
    .bind(&update.phone)
    .bind(&update.location)
    .bind(update.two_factor_enabled)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound("User not found".to_string()))
}

pub async fn user_stats(pool: &SqlitePool, user_id: &str) -> Result<UserStats> {
    let agent_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agents WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let meeting_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meetings WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let total_duration: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT CAST(ROUND(SUM((julianday(ended_at) - julianday(started_at)) * 86400)) AS INTEGER)
        FROM meetings
        WHERE user_id = ? AND started_at IS NOT NULL AND ended_at IS NOT NULL
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(UserStats {
        agent_count,
        meeting_count,
        total_duration: total_duration.unwrap_or(0),
    })
}
