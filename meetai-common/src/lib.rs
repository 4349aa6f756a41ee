//! # Meet.AI Common Library
//!
//! Shared code for the Meet.AI backend:
//! - Free-tier usage gate and its input resolution
//! - Database schema, models and queries
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod usage;

pub use error::{Error, Result};
pub use usage::{Decision, DenyReason, FreeTierPolicy, ResourceKind, UsageService};
