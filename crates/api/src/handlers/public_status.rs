//! Unauthenticated status check by public token.
//!
//! Complaints carry an opaque uuid token so a submitter can check progress
//! (e.g. from a printed QR code) without logging in. The response never
//! includes identity fields.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use redress_core::complaint::ComplaintStatus;
use redress_core::sla::is_overdue;
use redress_core::types::Timestamp;
use redress_db::repositories::ComplaintRepo;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Identity-free view of a complaint's progress.
#[derive(Debug, Serialize)]
pub struct PublicStatus {
    pub status: String,
    pub category: String,
    pub urgency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub overdue: bool,
}

/// GET /api/v1/public/complaints/{token}
pub async fn get(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let complaint = ComplaintRepo::find_by_public_token(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound("No complaint for that status token".to_string()))?;

    let status = ComplaintStatus::from_str(&complaint.status)?;
    let overdue = is_overdue(complaint.created_at, status, complaint.resolved_at);

    Ok(Json(DataResponse {
        data: PublicStatus {
            status: complaint.status,
            category: complaint.category,
            urgency: complaint.urgency,
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
            resolved_at: complaint.resolved_at,
            overdue,
        },
    }))
}
