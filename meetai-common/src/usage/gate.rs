//! Free-tier usage gate
//!
//! Pure decision function: given already-resolved counts, referral credits and
//! subscription status, decide whether one more agent or meeting may be
//! created. No I/O, no hidden state; identical inputs give identical results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Successful referrals needed for one unit of bonus allowance
pub const REFERRALS_PER_BONUS: u64 = 5;

/// Default free-tier cap on agents
pub const DEFAULT_MAX_FREE_AGENTS: u64 = 3;

/// Default free-tier cap on meetings
pub const DEFAULT_MAX_FREE_MEETINGS: u64 = 3;

/// Kind of resource subject to the free-tier cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Agent,
    Meeting,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Agent => "agent",
            ResourceKind::Meeting => "meeting",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" | "agents" => Ok(ResourceKind::Agent),
            "meeting" | "meetings" => Ok(ResourceKind::Meeting),
            other => Err(Error::InvalidInput(format!(
                "Unknown resource kind '{}' (expected 'agent' or 'meeting')",
                other
            ))),
        }
    }
}

/// Bonus allowance earned from referrals: `floor(referral_count / 5)`
pub fn bonus_allowance(referral_count: u64) -> u64 {
    referral_count / REFERRALS_PER_BONUS
}

/// Free-tier base caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTierPolicy {
    pub max_agents: u64,
    pub max_meetings: u64,
}

impl Default for FreeTierPolicy {
    fn default() -> Self {
        Self {
            max_agents: DEFAULT_MAX_FREE_AGENTS,
            max_meetings: DEFAULT_MAX_FREE_MEETINGS,
        }
    }
}

impl FreeTierPolicy {
    pub fn new(max_agents: u64, max_meetings: u64) -> Self {
        Self {
            max_agents,
            max_meetings,
        }
    }

    /// Base cap for `kind` before any referral bonus
    pub fn base_limit(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Agent => self.max_agents,
            ResourceKind::Meeting => self.max_meetings,
        }
    }

    /// Effective cap for `kind` including the referral bonus
    pub fn limit(&self, kind: ResourceKind, referral_count: u64) -> u64 {
        self.base_limit(kind)
            .saturating_add(bonus_allowance(referral_count))
    }
}

/// Gate inputs for one user at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub agent_count: u64,
    pub meeting_count: u64,
    pub referral_count: u64,
    pub has_active_subscription: bool,
}

impl UsageSnapshot {
    pub fn count(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Agent => self.agent_count,
            ResourceKind::Meeting => self.meeting_count,
        }
    }
}

/// Why a creation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    LimitReached { kind: ResourceKind, limit: u64 },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::LimitReached { kind, .. } => {
                write!(f, "You have reached your {} limit.", kind)
            }
        }
    }
}

/// Outcome of a gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether one more `kind` may be created.
///
/// Paid users are never limited. Otherwise the cap is inclusive: holding
/// exactly `limit` resources blocks the next one.
pub fn evaluate(policy: &FreeTierPolicy, kind: ResourceKind, snapshot: &UsageSnapshot) -> Decision {
    if snapshot.has_active_subscription {
        return Decision::Allow;
    }

    let limit = policy.limit(kind, snapshot.referral_count);
    if snapshot.count(kind) >= limit {
        Decision::Deny(DenyReason::LimitReached { kind, limit })
    } else {
        Decision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_user(agent_count: u64, meeting_count: u64, referral_count: u64) -> UsageSnapshot {
        UsageSnapshot {
            agent_count,
            meeting_count,
            referral_count,
            has_active_subscription: false,
        }
    }

    #[test]
    fn test_bonus_allowance_table() {
        assert_eq!(bonus_allowance(0), 0);
        assert_eq!(bonus_allowance(4), 0);
        assert_eq!(bonus_allowance(5), 1);
        assert_eq!(bonus_allowance(24), 4);
        assert_eq!(bonus_allowance(25), 5);
    }

    #[test]
    fn test_subscriber_always_allowed() {
        let policy = FreeTierPolicy::new(3, 3);
        let snapshot = UsageSnapshot {
            agent_count: 10_000,
            meeting_count: 10_000,
            referral_count: 0,
            has_active_subscription: true,
        };

        assert_eq!(evaluate(&policy, ResourceKind::Agent, &snapshot), Decision::Allow);
        assert_eq!(evaluate(&policy, ResourceKind::Meeting, &snapshot), Decision::Allow);
    }

    #[test]
    fn test_agent_cap_is_inclusive() {
        let policy = FreeTierPolicy::new(3, 3);

        assert_eq!(
            evaluate(&policy, ResourceKind::Agent, &free_user(3, 0, 0)),
            Decision::Deny(DenyReason::LimitReached {
                kind: ResourceKind::Agent,
                limit: 3
            })
        );
        assert_eq!(
            evaluate(&policy, ResourceKind::Agent, &free_user(2, 0, 0)),
            Decision::Allow
        );
    }

    #[test]
    fn test_meeting_bonus_raises_cap() {
        let policy = FreeTierPolicy::new(3, 3);

        assert_eq!(
            evaluate(&policy, ResourceKind::Meeting, &free_user(0, 3, 5)),
            Decision::Allow
        );
        assert_eq!(
            evaluate(&policy, ResourceKind::Meeting, &free_user(0, 4, 5)),
            Decision::Deny(DenyReason::LimitReached {
                kind: ResourceKind::Meeting,
                limit: 4
            })
        );
    }

    #[test]
    fn test_kinds_are_checked_independently() {
        let policy = FreeTierPolicy::new(3, 3);
        // Agents at cap must not block meetings
        let snapshot = free_user(3, 0, 0);
        assert!(!evaluate(&policy, ResourceKind::Agent, &snapshot).is_allowed());
        assert!(evaluate(&policy, ResourceKind::Meeting, &snapshot).is_allowed());
    }

    #[test]
    fn test_zero_cap_denies_everything_for_free_users() {
        let policy = FreeTierPolicy::new(0, 0);
        assert!(!evaluate(&policy, ResourceKind::Agent, &free_user(0, 0, 0)).is_allowed());
    }

    #[test]
    fn test_resource_kind_parse() {
        assert_eq!("agent".parse::<ResourceKind>().unwrap(), ResourceKind::Agent);
        assert_eq!("meetings".parse::<ResourceKind>().unwrap(), ResourceKind::Meeting);
        assert!("workspace".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_deny_reason_message() {
        let reason = DenyReason::LimitReached {
            kind: ResourceKind::Agent,
            limit: 3,
        };
        assert_eq!(reason.to_string(), "You have reached your agent limit.");
    }
}
