//! Authentication middleware for meetai-server
//!
//! Sign-in, sessions and 2FA live in the external auth service. It forwards
//! the authenticated user's id in `X-User-Id`; this middleware only checks
//! that the id names a known user and makes that user available to handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use meetai_common::db::{users, User};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user, inserted into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware
///
/// Returns 401 Unauthorized when the header is missing or names no user.
/// Applied to protected routes only.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::Unauthorized)?;

    let user = users::get_user(&state.db, &user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "Rejected request for unknown user");
            ApiError::Unauthorized
        })?;

    debug!(user_id = %user.id, "Authenticated request");
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
