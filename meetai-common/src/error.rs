//! Common error types for Meet.AI

use thiserror::Error;

/// Common result type for Meet.AI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Meet.AI crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found (or not owned by the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Uniqueness violation (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A collaborator lookup needed by the usage gate failed.
    ///
    /// Kept distinct from `Database` so callers can never mistake a failed
    /// count or subscription lookup for an allow decision.
    #[error("Usage lookup failed ({what}): {reason}")]
    UsageLookup { what: &'static str, reason: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap any error raised while resolving gate inputs.
    pub fn usage_lookup(what: &'static str, err: impl std::fmt::Display) -> Self {
        Error::UsageLookup {
            what,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lookup_names_the_failed_lookup() {
        let err = Error::usage_lookup("agent count", "database is locked");
        assert!(matches!(err, Error::UsageLookup { what: "agent count", .. }));
        assert_eq!(
            err.to_string(),
            "Usage lookup failed (agent count): database is locked"
        );
    }
}
