//! SQLite-backed usage gate collaborators

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{billing, users};
use crate::usage::{Counter, ReferralStore, ResourceKind, SubscriptionLookup};
use crate::{Error, Result};

/// Answers gate lookups from the application database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Counter for SqliteStore {
    async fn count(&self, user_id: &str, kind: ResourceKind) -> Result<u64> {
        let sql = match kind {
            ResourceKind::Agent => "SELECT COUNT(*) FROM agents WHERE user_id = ?",
            ResourceKind::Meeting => "SELECT COUNT(*) FROM meetings WHERE user_id = ?",
        };

        let count: i64 = sqlx::query_scalar(sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|_| Error::Internal(format!("Negative {} count", kind)))
    }
}

#[async_trait]
impl SubscriptionLookup for SqliteStore {
    async fn is_active(&self, user_id: &str) -> Result<bool> {
        billing::has_active_subscription(&self.pool, user_id).await
    }
}

#[async_trait]
impl ReferralStore for SqliteStore {
    async fn referral_count(&self, user_id: &str) -> Result<u64> {
        users::referral_count(&self.pool, user_id).await
    }
}
