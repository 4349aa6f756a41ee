//! Premium endpoints: free-tier usage, current plan, available plans

use axum::{extract::State, Extension, Json};
use meetai_common::db::{billing, Product};
use meetai_common::usage::FreeUsage;

use super::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/premium/usage
///
/// `null` for subscribers, who have no free-tier limits.
pub async fn get_free_usage(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Option<FreeUsage>>, ApiError> {
    let usage = state.usage.free_usage(&user.id).await?;
    Ok(Json(usage))
}

/// GET /api/premium/subscription
pub async fn get_current_subscription(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Option<Product>>, ApiError> {
    let product = billing::current_subscription_product(&state.db, &user.id).await?;
    Ok(Json(product))
}

/// GET /api/premium/products
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = billing::list_products(&state.db).await?;
    Ok(Json(products))
}
