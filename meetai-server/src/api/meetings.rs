//! Meeting endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use meetai_common::db::meetings::{self, MeetingFilter, MeetingUpdate, NewMeeting};
use meetai_common::db::{Meeting, MeetingStatus, MeetingWithAgent};
use meetai_common::ResourceKind;
use serde::Deserialize;
use tracing::info;

use super::{require_capacity, CurrentUser};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::pagination::{
    calculate_pagination, validate_page_size, Page, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
use crate::AppState;

/// Query parameters for the meeting list
#[derive(Debug, Deserialize)]
pub struct MeetingListQuery {
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,

    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub agent_id: Option<String>,

    #[serde(default)]
    pub status: Option<MeetingStatus>,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// POST /api/meetings
pub async fn create_meeting(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<NewMeeting>,
) -> Result<(StatusCode, Json<Meeting>), ApiError> {
    input.validate()?;
    require_capacity(&state, &user.id, ResourceKind::Meeting).await?;

    let meeting = meetings::create_meeting(&state.db, &user.id, &input).await?;
    info!(user_id = %user.id, meeting_id = %meeting.id, "Meeting created");

    Ok((StatusCode::CREATED, Json(meeting)))
}

/// GET /api/meetings?page=&page_size=&search=&agent_id=&status=
pub async fn list_meetings(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<MeetingListQuery>,
) -> Result<Json<Page<MeetingWithAgent>>, ApiError> {
    let page_size = validate_page_size(query.page_size)?;
    let filter = MeetingFilter {
        search: non_blank(query.search),
        agent_id: non_blank(query.agent_id),
        status: query.status,
    };

    let total = meetings::count_meetings(&state.db, &user.id, &filter).await?;
    let pagination = calculate_pagination(total, query.page, page_size);
    let items = meetings::list_meetings(
        &state.db,
        &user.id,
        &filter,
        pagination.page_size,
        pagination.offset,
    )
    .await?;

    Ok(Json(Page::new(items, total, pagination)))
}

/// GET /api/meetings/:id
pub async fn get_meeting(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(meeting_id): Path<String>,
) -> Result<Json<MeetingWithAgent>, ApiError> {
    let meeting = meetings::get_meeting(&state.db, &user.id, &meeting_id).await?;
    Ok(Json(meeting))
}

/// PATCH /api/meetings/:id
pub async fn update_meeting(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(meeting_id): Path<String>,
    ApiJson(update): ApiJson<MeetingUpdate>,
) -> Result<Json<Meeting>, ApiError> {
    let meeting = meetings::update_meeting(&state.db, &user.id, &meeting_id, &update).await?;
    Ok(Json(meeting))
}

/// DELETE /api/meetings/:id
pub async fn delete_meeting(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(meeting_id): Path<String>,
) -> Result<Json<Meeting>, ApiError> {
    let meeting = meetings::delete_meeting(&state.db, &user.id, &meeting_id).await?;
    info!(user_id = %user.id, meeting_id = %meeting.id, "Meeting deleted");
    Ok(Json(meeting))
}
