//! Handlers for the activity feed (read-only; entries are written by the
//! mutating endpoints and the batch worker).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use redress_core::error::CoreError;
use redress_core::pagination::{clamp_limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use redress_core::sla::parse_timestamp;
use redress_core::types::DbId;
use redress_db::repositories::{ActivityRepo, ComplaintRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    /// RFC 3339 lower bound on entry creation time.
    pub since: Option<String>,
}

/// GET /api/v1/activity
///
/// Most recent entries across all complaints.
pub async fn list_recent(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let since = params.since.as_deref().map(parse_timestamp).transpose()?;

    let entries = ActivityRepo::list_recent(&state.pool, limit, since).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/complaints/{id}/activity
///
/// The audit trail for one complaint, newest first.
pub async fn list_for_complaint(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    ComplaintRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "complaint",
            id,
        })?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let entries = ActivityRepo::list_for_complaint(&state.pool, id, limit).await?;
    Ok(Json(DataResponse { data: entries }))
}
