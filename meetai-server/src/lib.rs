//! meetai-server library - Meet.AI backend HTTP service
//!
//! Agents, meetings, premium usage, referrals and account settings, with
//! agent/meeting creation gated by the free-tier usage policy.

use axum::Router;
use meetai_common::db::SqliteStore;
use meetai_common::{FreeTierPolicy, UsageService};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod extract;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Free-tier gate backed by the same database
    pub usage: UsageService<SqliteStore>,
    /// Token required by the billing sync endpoint (`None` disables it)
    pub billing_sync_token: Option<String>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, policy: FreeTierPolicy, billing_sync_token: Option<String>) -> Self {
        let usage = UsageService::new(policy, SqliteStore::new(db.clone()));
        Self {
            db,
            usage,
            billing_sync_token,
        }
    }
}

/// Build application router
///
/// Protected routes require an authenticated user id from the upstream
/// auth proxy. Health, provisioning, referral, billing sync and the public
/// product list are open.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    let protected = Router::new()
        .route(
            "/api/agents",
            get(api::agents::list_agents).post(api::agents::create_agent),
        )
        .route(
            "/api/agents/:id",
            get(api::agents::get_agent)
                .patch(api::agents::update_agent)
                .delete(api::agents::delete_agent),
        )
        .route(
            "/api/meetings",
            get(api::meetings::list_meetings).post(api::meetings::create_meeting),
        )
        .route(
            "/api/meetings/:id",
            get(api::meetings::get_meeting)
                .patch(api::meetings::update_meeting)
                .delete(api::meetings::delete_meeting),
        )
        .route("/api/premium/usage", get(api::premium::get_free_usage))
        .route(
            "/api/premium/subscription",
            get(api::premium::get_current_subscription),
        )
        .route("/api/settings", put(api::settings::update_settings))
        .route("/api/settings/stats", get(api::settings::get_stats))
        .route("/api/settings/profile", get(api::settings::get_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .route("/api/users", post(api::users::provision_user))
        .route("/api/referral", post(api::referral::record_referral))
        .route(
            "/api/billing/subscriptions",
            post(api::billing::sync_subscription),
        )
        .route("/api/premium/products", get(api::premium::get_products))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
