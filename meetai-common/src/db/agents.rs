//! Agent queries
//!
//! Every query is scoped by `user_id`; an agent owned by someone else is
//! indistinguishable from a missing one.

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::models::{Agent, AgentWithMeetingCount};
use crate::{Error, Result};

/// Fields required to create an agent
#[derive(Debug, Clone, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub instructions: String,
}

impl NewAgent {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Name is required".to_string()));
        }
        if self.instructions.trim().is_empty() {
            return Err(Error::InvalidInput("Instructions are required".to_string()));
        }
        Ok(())
    }
}

/// Partial agent update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

impl AgentUpdate {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(Error::InvalidInput("Name is required".to_string()));
        }
        if matches!(&self.instructions, Some(text) if text.trim().is_empty()) {
            return Err(Error::InvalidInput("Instructions are required".to_string()));
        }
        Ok(())
    }
}

const SELECT_WITH_MEETING_COUNT: &str = r#"
    SELECT a.*,
           (SELECT COUNT(*) FROM meetings m WHERE m.agent_id = a.id) AS meeting_count
    FROM agents a
"#;

fn not_found() -> Error {
    Error::NotFound("Agent not found".to_string())
}

pub async fn create_agent(pool: &SqlitePool, user_id: &str, new_agent: &NewAgent) -> Result<Agent> {
    new_agent.validate()?;

    let now = Utc::now();
    let agent = sqlx::query_as::<_, Agent>(
        r#"
        INSERT INTO agents (id, user_id, name, instructions, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(new_agent.name.trim())
    .bind(new_agent.instructions.trim())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(agent)
}

pub async fn get_agent(pool: &SqlitePool, user_id: &str, agent_id: &str) -> Result<AgentWithMeetingCount> {
    let sql = format!("{} WHERE a.id = ? AND a.user_id = ?", SELECT_WITH_MEETING_COUNT);
    sqlx::query_as::<_, AgentWithMeetingCount>(&sql)
        .bind(agent_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)
}

/// One page of agents, newest first
pub async fn list_agents(
    pool: &SqlitePool,
    user_id: &str,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AgentWithMeetingCount>> {
    let sql = format!(
        "{} WHERE a.user_id = ? AND (? IS NULL OR a.name LIKE '%' || ? || '%') \
         ORDER BY a.created_at DESC, a.id DESC LIMIT ? OFFSET ?",
        SELECT_WITH_MEETING_COUNT
    );

    let agents = sqlx::query_as::<_, AgentWithMeetingCount>(&sql)
        .bind(user_id)
        .bind(search)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(agents)
}

/// Number of agents matching the same filter as [`list_agents`]
pub async fn count_agents(pool: &SqlitePool, user_id: &str, search: Option<&str>) -> Result<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM agents WHERE user_id = ? AND (? IS NULL OR name LIKE '%' || ? || '%')",
    )
    .bind(user_id)
    .bind(search)
    .bind(search)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

pub async fn update_agent(
    pool: &SqlitePool,
    user_id: &str,
    agent_id: &str,
    update: &AgentUpdate,
) -> Result<Agent> {
    update.validate()?;

    sqlx::query_as::<_, Agent>(
        r#"
        UPDATE agents
        SET name = COALESCE(?, name),
            instructions = COALESCE(?, instructions),
            updated_at = ?
        WHERE id = ? AND user_id = ?
        RETURNING *
        "#,
    )
    .bind(update.name.as_deref().map(str::trim))
    .bind(update.instructions.as_deref().map(str::trim))
    .bind(Utc::now())
    .bind(agent_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

/// Delete an agent; its meetings go with it
pub async fn delete_agent(pool: &SqlitePool, user_id: &str, agent_id: &str) -> Result<Agent> {
    sqlx::query_as::<_, Agent>("DELETE FROM agents WHERE id = ? AND user_id = ? RETURNING *")
        .bind(agent_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)
}
