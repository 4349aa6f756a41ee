//! Gate input resolution
//!
//! The gate itself never touches storage. [`UsageService`] gathers its inputs
//! from the collaborators below and hands them to [`evaluate`].
//!
//! Count-check and insert are NOT one transaction: two concurrent creations
//! may both be allowed and push a user one past the cap. This is accepted
//! for a soft usage cap.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};

use super::gate::{bonus_allowance, evaluate, Decision, FreeTierPolicy, ResourceKind, UsageSnapshot};
use crate::Result;

/// Counts existing resources owned by a user
#[async_trait]
pub trait Counter: Send + Sync {
    async fn count(&self, user_id: &str, kind: ResourceKind) -> Result<u64>;
}

/// Reports whether a user currently holds an active paid plan
#[async_trait]
pub trait SubscriptionLookup: Send + Sync {
    async fn is_active(&self, user_id: &str) -> Result<bool>;
}

/// Reads accumulated referral credits
#[async_trait]
pub trait ReferralStore: Send + Sync {
    async fn referral_count(&self, user_id: &str) -> Result<u64>;
}

/// Free-tier usage summary shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeUsage {
    pub meeting_count: u64,
    pub agent_count: u64,
    pub bonus_limit: u64,
    pub max_free_agents: u64,
    pub max_free_meetings: u64,
}

/// Resolves gate inputs from a store and evaluates the free-tier policy
#[derive(Debug, Clone)]
pub struct UsageService<S> {
    policy: FreeTierPolicy,
    store: S,
}

impl<S> UsageService<S>
where
    S: Counter + SubscriptionLookup + ReferralStore,
{
    pub fn new(policy: FreeTierPolicy, store: S) -> Self {
        Self { policy, store }
    }

    /// Referral credits, or 0 when the lookup fails.
    ///
    /// Failing toward the plain free limit never grants extra capacity.
    async fn referral_count_or_zero(&self, user_id: &str) -> u64 {
        match self.store.referral_count(user_id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(user_id, "Referral count lookup failed, using no bonus: {}", e);
                0
            }
        }
    }

    /// Gather all gate inputs for `user_id`
    ///
    /// Count and subscription failures propagate; only the referral lookup
    /// has a fallback.
    pub async fn snapshot(&self, user_id: &str) -> Result<UsageSnapshot> {
        let has_active_subscription = self.store.is_active(user_id).await.map_err(|e| {
            error!(user_id, "Subscription lookup failed: {}", e);
            crate::Error::usage_lookup("subscription", e)
        })?;

        let agent_count = self
            .store
            .count(user_id, ResourceKind::Agent)
            .await
            .map_err(|e| {
                error!(user_id, "Agent count lookup failed: {}", e);
                crate::Error::usage_lookup("agent count", e)
            })?;

        let meeting_count = self
            .store
            .count(user_id, ResourceKind::Meeting)
            .await
            .map_err(|e| {
                error!(user_id, "Meeting count lookup failed: {}", e);
                crate::Error::usage_lookup("meeting count", e)
            })?;

        let referral_count = self.referral_count_or_zero(user_id).await;

        Ok(UsageSnapshot {
            agent_count,
            meeting_count,
            referral_count,
            has_active_subscription,
        })
    }

    /// May `user_id` create one more `kind`?
    pub async fn evaluate(&self, user_id: &str, kind: ResourceKind) -> Result<Decision> {
        let snapshot = self.snapshot(user_id).await?;
        let decision = evaluate(&self.policy, kind, &snapshot);

        if let Decision::Deny(reason) = decision {
            info!(
                user_id,
                kind = %kind,
                count = snapshot.count(kind),
                "Free-tier gate denied creation: {}",
                reason
            );
        }

        Ok(decision)
    }

    /// Usage summary for a free user, `None` for subscribers
    pub async fn free_usage(&self, user_id: &str) -> Result<Option<FreeUsage>> {
        let snapshot = self.snapshot(user_id).await?;
        if snapshot.has_active_subscription {
            return Ok(None);
        }

        Ok(Some(FreeUsage {
            meeting_count: snapshot.meeting_count,
            agent_count: snapshot.agent_count,
            bonus_limit: bonus_allowance(snapshot.referral_count),
            max_free_agents: self.policy.limit(ResourceKind::Agent, snapshot.referral_count),
            max_free_meetings: self
                .policy
                .limit(ResourceKind::Meeting, snapshot.referral_count),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::gate::DenyReason;
    use crate::Error;

    /// In-memory collaborator with switchable failures
    #[derive(Default)]
    struct FakeStore {
        agents: u64,
        meetings: u64,
        referrals: u64,
        subscribed: bool,
        fail_count: bool,
        fail_subscription: bool,
        fail_referral: bool,
    }

    #[async_trait]
    impl Counter for FakeStore {
        async fn count(&self, _user_id: &str, kind: ResourceKind) -> Result<u64> {
            if self.fail_count {
                return Err(Error::Internal("count backend down".to_string()));
            }
            Ok(match kind {
                ResourceKind::Agent => self.agents,
                ResourceKind::Meeting => self.meetings,
            })
        }
    }

    #[async_trait]
    impl SubscriptionLookup for FakeStore {
        async fn is_active(&self, _user_id: &str) -> Result<bool> {
            if self.fail_subscription {
                return Err(Error::Internal("billing unavailable".to_string()));
            }
            Ok(self.subscribed)
        }
    }

    #[async_trait]
    impl ReferralStore for FakeStore {
        async fn referral_count(&self, _user_id: &str) -> Result<u64> {
            if self.fail_referral {
                return Err(Error::NotFound("user".to_string()));
            }
            Ok(self.referrals)
        }
    }

    fn service(store: FakeStore) -> UsageService<FakeStore> {
        UsageService::new(FreeTierPolicy::new(3, 3), store)
    }

    #[tokio::test]
    async fn test_referral_failure_falls_back_to_base_limit() {
        let svc = service(FakeStore {
            meetings: 3,
            referrals: 50,
            fail_referral: true,
            ..Default::default()
        });

        let decision = svc.evaluate("u1", ResourceKind::Meeting).await.unwrap();
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::LimitReached {
                kind: ResourceKind::Meeting,
                limit: 3
            })
        );
    }

    #[tokio::test]
    async fn test_count_failure_is_not_an_allow() {
        let svc = service(FakeStore {
            fail_count: true,
            ..Default::default()
        });

        let err = svc.evaluate("u1", ResourceKind::Agent).await.unwrap_err();
        assert!(matches!(err, Error::UsageLookup { what: "agent count", .. }));
    }

    #[tokio::test]
    async fn test_subscription_failure_is_not_an_allow() {
        let svc = service(FakeStore {
            fail_subscription: true,
            ..Default::default()
        });

        let err = svc.evaluate("u1", ResourceKind::Meeting).await.unwrap_err();
        assert!(matches!(err, Error::UsageLookup { what: "subscription", .. }));
    }

    #[tokio::test]
    async fn test_free_usage_reports_bonus() {
        let svc = service(FakeStore {
            agents: 1,
            meetings: 2,
            referrals: 12,
            ..Default::default()
        });

        let usage = svc.free_usage("u1").await.unwrap().unwrap();
        assert_eq!(
            usage,
            FreeUsage {
                meeting_count: 2,
                agent_count: 1,
                bonus_limit: 2,
                max_free_agents: 5,
                max_free_meetings: 5,
            }
        );
    }

    #[tokio::test]
    async fn test_free_usage_is_none_for_subscribers() {
        let svc = service(FakeStore {
            subscribed: true,
            ..Default::default()
        });

        assert!(svc.free_usage("u1").await.unwrap().is_none());
    }
}
