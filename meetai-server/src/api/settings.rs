//! Account settings endpoints

use axum::{extract::State, Extension, Json};
use meetai_common::db::users::{self, SettingsUpdate, UserStats};
use meetai_common::db::User;

use super::CurrentUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

/// GET /api/settings/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<UserStats>, ApiError> {
    let stats = users::user_stats(&state.db, &user.id).await?;
    Ok(Json(stats))
}

/// GET /api/settings/profile
///
/// The record loaded by the auth middleware, including referral credits.
pub async fn get_profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> Result<Json<User>, ApiError> {
    let updated = users::update_settings(&state.db, &user.id, &update).await?;
    Ok(Json(updated))
}
