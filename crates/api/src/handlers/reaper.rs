//! Operator endpoint for triggering a stale-complaint sweep on demand.
//!
//! The scheduled sweeps run in the worker binary; this endpoint reuses the
//! same batch over the same store so a manual run behaves identically.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use redress_core::stale::{ReaperReport, DEFAULT_STALE_DAYS};
use redress_db::store::PgComplaintStore;
use redress_worker::StaleReaper;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a manual sweep. An empty body uses the default window.
#[derive(Debug, Default, Deserialize)]
pub struct RunReaperRequest {
    pub stale_days: Option<i64>,
}

/// Response for a manual sweep.
#[derive(Debug, Serialize)]
pub struct RunReaperResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: ReaperReport,
}

/// POST /api/v1/maintenance/stale-reaper/run
pub async fn run_once(
    State(state): State<AppState>,
    body: Option<Json<RunReaperRequest>>,
) -> AppResult<impl IntoResponse> {
    let stale_days = body
        .and_then(|Json(b)| b.stale_days)
        .unwrap_or(DEFAULT_STALE_DAYS);

    let reaper = StaleReaper::new(PgComplaintStore::new(state.pool.clone()), stale_days);
    let report = reaper.run_once().await?;

    tracing::info!(
        stale_days,
        closed = report.closed_count,
        failed = report.failed_count,
        "Manual stale-reaper sweep finished"
    );

    Ok(Json(DataResponse {
        data: RunReaperResponse {
            success: true,
            report,
        },
    }))
}
