//! Agent endpoints
//!
//! Creation is gated by the free-tier policy; everything else is plain
//! owner-scoped CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use meetai_common::db::agents::{self, AgentUpdate, NewAgent};
use meetai_common::db::{Agent, AgentWithMeetingCount};
use meetai_common::ResourceKind;
use tracing::info;

use super::{require_capacity, CurrentUser};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::pagination::{calculate_pagination, validate_page_size, ListQuery, Page};
use crate::AppState;

/// POST /api/agents
pub async fn create_agent(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<NewAgent>,
) -> Result<(StatusCode, Json<Agent>), ApiError> {
    input.validate()?;
    require_capacity(&state, &user.id, ResourceKind::Agent).await?;

    let agent = agents::create_agent(&state.db, &user.id, &input).await?;
    info!(user_id = %user.id, agent_id = %agent.id, "Agent created");

    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /api/agents?page=&page_size=&search=
pub async fn list_agents(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Page<AgentWithMeetingCount>>, ApiError> {
    let page_size = validate_page_size(query.page_size)?;
    let search = query.search();

    let total = agents::count_agents(&state.db, &user.id, search).await?;
    let pagination = calculate_pagination(total, query.page, page_size);
    let items = agents::list_agents(
        &state.db,
        &user.id,
        search,
        pagination.page_size,
        pagination.offset,
    )
    .await?;

    Ok(Json(Page::new(items, total, pagination)))
}

/// GET /api/agents/:id
pub async fn get_agent(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(agent_id): Path<String>,
) -> Result<Json<AgentWithMeetingCount>, ApiError> {
    let agent = agents::get_agent(&state.db, &user.id, &agent_id).await?;
    Ok(Json(agent))
}

/// PATCH /api/agents/:id
pub async fn update_agent(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(agent_id): Path<String>,
    ApiJson(update): ApiJson<AgentUpdate>,
) -> Result<Json<Agent>, ApiError> {
    let agent = agents::update_agent(&state.db, &user.id, &agent_id, &update).await?;
    Ok(Json(agent))
}

/// DELETE /api/agents/:id
pub async fn delete_agent(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(agent_id): Path<String>,
) -> Result<Json<Agent>, ApiError> {
    let agent = agents::delete_agent(&state.db, &user.id, &agent_id).await?;
    info!(user_id = %user.id, agent_id = %agent.id, "Agent deleted");
    Ok(Json(agent))
}
