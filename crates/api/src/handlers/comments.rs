//! Handlers for complaint comments.
//!
//! Comments do not bump the complaint's `updated_at`. The stale-complaint
//! batch reads comment timestamps as its second signal, so an
//! actively-discussed complaint survives auto-closure even when its status
//! field is untouched.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use redress_core::activity::ACTION_COMMENTED;
use redress_core::complaint::validate_comment_message;
use redress_core::error::CoreError;
use redress_core::types::DbId;
use redress_db::models::comment::CreateComment;
use redress_db::repositories::{CommentRepo, ComplaintRepo};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::complaints::log_activity;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for adding a comment.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub user_id: DbId,
    pub message: String,
}

/// GET /api/v1/complaints/{id}/comments
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_complaint_exists(&state, id).await?;
    let comments = CommentRepo::list_for_complaint(&state.pool, id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/complaints/{id}/comments
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    validate_comment_message(&body.message)?;
    ensure_complaint_exists(&state, id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            complaint_id: id,
            user_id: body.user_id,
            message: body.message,
        },
    )
    .await?;

    log_activity(
        &state,
        id,
        body.user_id,
        ACTION_COMMENTED,
        "A comment was added".to_string(),
        json!({ "comment_id": comment.id }),
    )
    .await;

    Ok(Json(DataResponse { data: comment }))
}

async fn ensure_complaint_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ComplaintRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "complaint",
            id,
        })?;
    Ok(())
}
