//! Meeting queries

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::models::{Meeting, MeetingStatus, MeetingWithAgent};
use crate::{Error, Result};

/// Fields required to schedule a meeting
#[derive(Debug, Clone, Deserialize)]
pub struct NewMeeting {
    pub name: String,
    pub agent_id: String,
}

impl NewMeeting {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Name is required".to_string()));
        }
        if self.agent_id.trim().is_empty() {
            return Err(Error::InvalidInput("Agent is required".to_string()));
        }
        Ok(())
    }
}

/// Partial meeting update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub status: Option<MeetingStatus>,
}

impl MeetingUpdate {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(Error::InvalidInput("Name is required".to_string()));
        }
        if matches!(&self.agent_id, Some(id) if id.trim().is_empty()) {
            return Err(Error::InvalidInput("Agent is required".to_string()));
        }
        Ok(())
    }
}

/// List filters; `None` means unfiltered
#[derive(Debug, Clone, Default)]
pub struct MeetingFilter {
    pub search: Option<String>,
    pub agent_id: Option<String>,
    pub status: Option<MeetingStatus>,
}

const SELECT_WITH_AGENT: &str = r#"
    SELECT m.*,
           a.name AS agent_name,
           CAST(ROUND((julianday(m.ended_at) - julianday(m.started_at)) * 86400) AS INTEGER) AS duration
    FROM meetings m
    JOIN agents a ON a.id = m.agent_id
"#;

const FILTER_CLAUSE: &str = "m.user_id = ? \
    AND (? IS NULL OR m.name LIKE '%' || ? || '%') \
    AND (? IS NULL OR m.agent_id = ?) \
    AND (? IS NULL OR m.status = ?)";

fn not_found() -> Error {
    Error::NotFound("Meeting not found".to_string())
}

async fn ensure_agent_owned(pool: &SqlitePool, user_id: &str, agent_id: &str) -> Result<()> {
    let owned: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM agents WHERE id = ? AND user_id = ?)")
            .bind(agent_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    if owned {
        Ok(())
    } else {
        Err(Error::NotFound("Agent not found".to_string()))
    }
}

pub async fn create_meeting(pool: &SqlitePool, user_id: &str, new_meeting: &NewMeeting) -> Result<Meeting> {
    new_meeting.validate()?;
    ensure_agent_owned(pool, user_id, new_meeting.agent_id.trim()).await?;

    let now = Utc::now();
    let meeting = sqlx::query_as::<_, Meeting>(
        r#"
        INSERT INTO meetings (id, user_id, agent_id, name, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(new_meeting.agent_id.trim())
    .bind(new_meeting.name.trim())
    .bind(MeetingStatus::Upcoming)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(meeting)
}

pub async fn get_meeting(pool: &SqlitePool, user_id: &str, meeting_id: &str) -> Result<MeetingWithAgent> {
    let sql = format!("{} WHERE m.id = ? AND m.user_id = ?", SELECT_WITH_AGENT);
    sqlx::query_as::<_, MeetingWithAgent>(&sql)
        .bind(meeting_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)
}

/// One page of meetings, newest first
pub async fn list_meetings(
    pool: &SqlitePool,
    user_id: &str,
    filter: &MeetingFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<MeetingWithAgent>> {
    let sql = format!(
        "{} WHERE {} ORDER BY m.created_at DESC, m.id DESC LIMIT ? OFFSET ?",
        SELECT_WITH_AGENT, FILTER_CLAUSE
    );

    let meetings = sqlx::query_as::<_, MeetingWithAgent>(&sql)
        .bind(user_id)
        .bind(filter.search.as_deref())
        .bind(filter.search.as_deref())
        .bind(filter.agent_id.as_deref())
        .bind(filter.agent_id.as_deref())
        .bind(filter.status)
        .bind(filter.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(meetings)
}

/// Number of meetings matching the same filter as [`list_meetings`]
pub async fn count_meetings(pool: &SqlitePool, user_id: &str, filter: &MeetingFilter) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM meetings m WHERE {}", FILTER_CLAUSE);
    let total: i64 = sqlx::query_scalar(&sql)
        .bind(user_id)
        .bind(filter.search.as_deref())
        .bind(filter.search.as_deref())
        .bind(filter.agent_id.as_deref())
        .bind(filter.agent_id.as_deref())
        .bind(filter.status)
        .bind(filter.status)
        .fetch_one(pool)
        .await?;

    Ok(total)
}

/// Apply a partial update.
///
/// Moving to `active` stamps `started_at`; moving to a terminal status stamps
/// `ended_at`. Existing stamps are never overwritten.
pub async fn update_meeting(
    pool: &SqlitePool,
    user_id: &str,
    meeting_id: &str,
    update: &MeetingUpdate,
) -> Result<Meeting> {
    update.validate()?;

    if let Some(agent_id) = &update.agent_id {
        ensure_agent_owned(pool, user_id, agent_id.trim()).await?;
    }

    let now = Utc::now();
    let start_stamp = update.status.filter(MeetingStatus::starts_call).map(|_| now);
    let end_stamp = update.status.filter(MeetingStatus::ends_call).map(|_| now);

    sqlx::query_as::<_, Meeting>(
        r#"
        UPDATE meetings
        SET name = COALESCE(?, name),
            agent_id = COALESCE(?, agent_id),
            status = COALESCE(?, status),
            started_at = COALESCE(started_at, ?),
            ended_at = COALESCE(ended_at, ?),
            updated_at = ?
        WHERE id = ? AND user_id = ?
        RETURNING *
        "#,
    )
    .bind(update.name.as_deref().map(str::trim))
    .bind(update.agent_id.as_deref().map(str::trim))
    .bind(update.status)
    .bind(start_stamp)
    .bind(end_stamp)
    .bind(now)
    .bind(meeting_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

pub async fn delete_meeting(pool: &SqlitePool, user_id: &str, meeting_id: &str) -> Result<Meeting> {
    sqlx::query_as::<_, Meeting>("DELETE FROM meetings WHERE id = ? AND user_id = ? RETURNING *")
        .bind(meeting_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)
}
