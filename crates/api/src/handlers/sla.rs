//! Handler for SLA breach listings.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use redress_core::sla::{overdue_hours, SLA_HOURS};
use redress_db::models::complaint::Complaint;
use redress_db::repositories::ComplaintRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// A complaint past its SLA, annotated with the breach magnitude.
#[derive(Debug, Serialize)]
pub struct OverdueComplaint {
    #[serde(flatten)]
    pub complaint: Complaint,
    /// Hours past the 48h deadline.
    pub overdue_hours: f64,
}

/// GET /api/v1/complaints/overdue
///
/// Non-resolved complaints older than the SLA window, oldest first, each
/// annotated with how many hours it has breached by.
pub async fn list_overdue(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sla_cutoff = Utc::now() - Duration::hours(SLA_HOURS);

    let rows = ComplaintRepo::list_overdue(&state.pool, sla_cutoff).await?;
    let overdue: Vec<OverdueComplaint> = rows
        .into_iter()
        .map(|complaint| OverdueComplaint {
            overdue_hours: overdue_hours(complaint.created_at),
            complaint,
        })
        .collect();

    Ok(Json(DataResponse { data: overdue }))
}
