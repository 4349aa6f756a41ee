//! Free-tier usage limits
//!
//! - [`gate`]: the pure allow/deny decision
//! - [`service`]: collaborator traits and input resolution

pub mod gate;
pub mod service;

pub use gate::{
    bonus_allowance, evaluate, Decision, DenyReason, FreeTierPolicy, ResourceKind, UsageSnapshot,
    REFERRALS_PER_BONUS,
};
pub use service::{Counter, FreeUsage, ReferralStore, SubscriptionLookup, UsageService};
