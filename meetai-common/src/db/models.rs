//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub two_factor_enabled: bool,
    pub referral_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Agent {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Agent with the number of meetings that use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgentWithMeetingCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub agent: Agent,
    pub meeting_count: i64,
}

/// Meeting lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MeetingStatus {
    Upcoming,
    Active,
    Completed,
    Processing,
    Cancelled,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Upcoming => "upcoming",
            MeetingStatus::Active => "active",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Processing => "processing",
            MeetingStatus::Cancelled => "cancelled",
        }
    }

    /// Entering this status starts the call clock
    pub fn starts_call(&self) -> bool {
        matches!(self, MeetingStatus::Active)
    }

    /// Entering this status stops the call clock
    pub fn ends_call(&self) -> bool {
        matches!(
            self,
            MeetingStatus::Completed | MeetingStatus::Processing | MeetingStatus::Cancelled
        )
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(MeetingStatus::Upcoming),
            "active" => Ok(MeetingStatus::Active),
            "completed" => Ok(MeetingStatus::Completed),
            "processing" => Ok(MeetingStatus::Processing),
            "cancelled" => Ok(MeetingStatus::Cancelled),
            other => Err(Error::InvalidInput(format!("Unknown meeting status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meeting {
    pub id: String,
    pub user_id: String,
    pub agent_id: String,
    pub name: String,
    pub status: MeetingStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub transcript_url: Option<String>,
    pub recording_url: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Meeting joined with its agent's name, plus call duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MeetingWithAgent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meeting: Meeting,
    pub agent_name: String,
    /// Seconds between start and end, when both are known
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_amount: i64,
    pub is_recurring: bool,
    pub is_archived: bool,
}

/// Subscription state mirrored from the billing provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    PastDue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
