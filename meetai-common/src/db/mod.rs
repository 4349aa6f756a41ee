//! Database models and queries

pub mod agents;
pub mod billing;
pub mod init;
pub mod meetings;
pub mod models;
pub mod store;
pub mod users;

pub use init::*;
pub use models::*;
pub use store::SqliteStore;
