//! Handler for dashboard aggregates.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use redress_core::sla::SLA_HOURS;
use redress_db::models::complaint::{ComplaintQuery, CountByValue};
use redress_db::repositories::ComplaintRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Aggregate complaint counts for dashboards. All numbers are computed from
/// the complaint table at request time.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: i64,
    pub by_status: Vec<CountByValue>,
    pub by_category: Vec<CountByValue>,
    pub by_urgency: Vec<CountByValue>,
    /// Non-resolved complaints past the 48h SLA.
    pub overdue_count: i64,
    /// Mean hours from creation to resolution, if anything has resolved yet.
    pub avg_resolution_hours: Option<f64>,
}

/// GET /api/v1/stats
pub async fn overview(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sla_cutoff = Utc::now() - Duration::hours(SLA_HOURS);

    let total = ComplaintRepo::count(&state.pool, &ComplaintQuery::default()).await?;
    let by_status = ComplaintRepo::count_by_column(&state.pool, "status").await?;
    let by_category = ComplaintRepo::count_by_column(&state.pool, "category").await?;
    let by_urgency = ComplaintRepo::count_by_column(&state.pool, "urgency").await?;
    let overdue_count = ComplaintRepo::count_overdue(&state.pool, sla_cutoff).await?;
    let avg_resolution_hours = ComplaintRepo::avg_resolution_hours(&state.pool).await?;

    Ok(Json(DataResponse {
        data: StatsResponse {
            total,
            by_status,
            by_category,
            by_urgency,
            overdue_count,
            avg_resolution_hours,
        },
    }))
}
