//! Referral credit endpoint
//!
//! Called after a sign-up that carried a referral code (the referrer's
//! email). An unknown referrer is not an error: the sign-up already happened.

use axum::{extract::State, Json};
use meetai_common::db::users;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReferralRequest {
    #[serde(rename = "ref", default)]
    pub referrer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReferralResponse {
    pub success: bool,
}

/// POST /api/referral
pub async fn record_referral(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReferralRequest>,
) -> Result<Json<ReferralResponse>, ApiError> {
    let referrer = request
        .referrer
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No ref provided".to_string()))?;

    if users::credit_referral(&state.db, referrer).await? {
        info!("Referral credited");
    } else {
        debug!("Referral code matched no user");
    }

    Ok(Json(ReferralResponse { success: true }))
}
