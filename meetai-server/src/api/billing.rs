//! Billing provider sync endpoint
//!
//! The billing provider owns subscription state. A sync job pushes each
//! change here so the usage gate can read it locally.

use axum::{extract::State, http::HeaderMap, Json};
use meetai_common::db::{billing, Subscription, SubscriptionStatus};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

/// Header carrying the billing sync token
pub const BILLING_TOKEN_HEADER: &str = "x-billing-token";

#[derive(Debug, Deserialize)]
pub struct SubscriptionSync {
    pub user_id: String,
    pub product_id: String,
    pub status: SubscriptionStatus,
}

fn check_token(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.billing_sync_token.as_deref() else {
        return Err(ApiError::Forbidden("Billing sync is disabled".to_string()));
    };

    let provided = headers
        .get(BILLING_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if token_matches(provided, expected) {
        Ok(())
    } else {
        warn!("Billing sync rejected: bad token");
        Err(ApiError::Unauthorized)
    }
}

fn token_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// POST /api/billing/subscriptions
pub async fn sync_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(sync): ApiJson<SubscriptionSync>,
) -> Result<Json<Subscription>, ApiError> {
    check_token(&state, &headers)?;

    let subscription =
        billing::upsert_subscription(&state.db, &sync.user_id, &sync.product_id, sync.status)
            .await?;
    Ok(Json(subscription))
}
