//! HTTP API handlers for meetai-server

pub mod agents;
pub mod auth;
pub mod billing;
pub mod health;
pub mod meetings;
pub mod premium;
pub mod referral;
pub mod settings;
pub mod users;

pub use auth::{auth_middleware, CurrentUser, USER_ID_HEADER};
pub use health::health_routes;

use meetai_common::{Decision, ResourceKind};

use crate::error::ApiError;
use crate::AppState;

/// Run the free-tier gate before creating a `kind`.
///
/// Must be called before any insert so a denial creates nothing.
pub(crate) async fn require_capacity(
    state: &AppState,
    user_id: &str,
    kind: ResourceKind,
) -> Result<(), ApiError> {
    match state.usage.evaluate(user_id, kind).await? {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(ApiError::LimitReached(reason)),
    }
}
