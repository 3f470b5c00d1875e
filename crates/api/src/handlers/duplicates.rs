//! Handler for duplicate/keyword group detection over live complaints.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use redress_core::duplicates::{detect_duplicate_groups, DuplicateInput, DEFAULT_GROUP_THRESHOLD};
use redress_db::repositories::ComplaintRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GroupQuery {
    /// Minimum bucket size before a keyword group is reported.
    pub threshold: Option<usize>,
}

/// GET /api/v1/complaints/duplicate-groups
///
/// Bucket live complaints by issue keyword as a systemic-issue signal.
pub async fn list_groups(
    State(state): State<AppState>,
    Query(params): Query<GroupQuery>,
) -> AppResult<impl IntoResponse> {
    let threshold = params.threshold.unwrap_or(DEFAULT_GROUP_THRESHOLD);

    let complaints = ComplaintRepo::list_live(&state.pool).await?;
    let inputs: Vec<DuplicateInput> = complaints
        .into_iter()
        .map(|c| DuplicateInput {
            complaint_id: c.id,
            title: c.title,
            description: c.description,
            created_at: c.created_at,
        })
        .collect();

    let groups = detect_duplicate_groups(&inputs, threshold);
    Ok(Json(DataResponse { data: groups }))
}
