//! User provisioning
//!
//! The auth service calls this once per sign-up so the backend has a user
//! row to hang agents, meetings and referral credits on.

use axum::{extract::State, http::StatusCode, Json};
use meetai_common::db::{users, User};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProvisionUserRequest {
    pub name: String,
    pub email: String,
}

/// POST /api/users
pub async fn provision_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProvisionUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = users::create_user(&state.db, &request.name, &request.email).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
