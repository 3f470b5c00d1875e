//! Handlers for admin workload inspection and auto-balancing.
//!
//! Loads are always recomputed from the complaint table; nothing caches a
//! per-admin counter. The balance endpoint builds a plan in memory and
//! applies it as independent, unordered updates. Partial failure is
//! expected and reported, never rolled back.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use futures::future::join_all;
use redress_core::activity::ACTION_ASSIGNED;
use redress_core::complaint::Urgency;
use redress_core::error::CoreError;
use redress_core::types::DbId;
use redress_core::workload::{
    balance_workload, Assignment, BalanceOutcome, RosterMember, WorkloadItem,
};
use redress_db::models::activity::CreateActivityEntry;
use redress_db::repositories::{ActivityRepo, ComplaintRepo, ProfileRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for a balancing pass.
#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    /// Who triggered the pass (recorded in the activity feed).
    pub actor_id: DbId,
}

/// Result of one balancing pass. `assigned_count < attempted` means some
/// per-item updates failed; the remainder were still applied.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub outcome: BalanceOutcome,
    pub attempted: usize,
    pub assigned_count: usize,
    pub failed_count: usize,
    pub eligible_count: usize,
    pub roster_size: usize,
    /// Assignments that were successfully applied.
    pub assignments: Vec<Assignment>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admins
///
/// The plain admin roster (for manual-assignment pickers).
pub async fn admins(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let admins = ProfileRepo::list_admins(&state.pool).await?;
    Ok(Json(DataResponse { data: admins }))
}

/// GET /api/v1/workload
///
/// The admin roster with per-admin complaint counts, least loaded first.
pub async fn roster(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let workloads = ProfileRepo::admin_workloads(&state.pool).await?;
    Ok(Json(DataResponse { data: workloads }))
}

/// POST /api/v1/workload/balance
///
/// Build a round-robin assignment plan over the current snapshot and apply
/// it. Each update is independent; failures are collected and reported as a
/// count discrepancy rather than aborting the pass.
pub async fn balance(
    State(state): State<AppState>,
    Json(body): Json<BalanceRequest>,
) -> AppResult<impl IntoResponse> {
    let admins = ProfileRepo::admin_workloads(&state.pool).await?;
    let candidates = ComplaintRepo::list_unassigned_live(&state.pool).await?;

    let items = candidates
        .iter()
        .map(|c| {
            Ok(WorkloadItem {
                complaint_id: c.id,
                urgency: Urgency::from_str(&c.urgency)?,
                assigned_to: c.assigned_to,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let members: Vec<RosterMember> = admins
        .iter()
        .map(|a| RosterMember {
            admin_id: a.id,
            assigned_count: a.assigned_count,
        })
        .collect();

    let plan = balance_workload(&items, &members);

    if plan.outcome != BalanceOutcome::Planned {
        return Ok(Json(DataResponse {
            data: BalanceResponse {
                outcome: plan.outcome,
                attempted: 0,
                assigned_count: 0,
                failed_count: 0,
                eligible_count: plan.eligible_count,
                roster_size: plan.roster_size,
                assignments: Vec::new(),
            },
        }));
    }

    // Fire all updates concurrently and collect per-item results. No
    // ordering between them is required; a later manual pass fixes
    // stragglers.
    let results = join_all(plan.assignments.iter().map(|a| {
        let pool = state.pool.clone();
        async move {
            ComplaintRepo::assign(&pool, a.complaint_id, Some(a.assignee_id))
                .await
                .map(|row| (a.clone(), row.is_some()))
        }
    }))
    .await;

    let mut applied: Vec<Assignment> = Vec::new();
    let mut failed_count = 0usize;

    for result in results {
        match result {
            Ok((assignment, true)) => applied.push(assignment),
            // The complaint vanished between snapshot and update.
            Ok((assignment, false)) => {
                tracing::warn!(
                    complaint_id = assignment.complaint_id,
                    "Complaint missing during balance pass"
                );
                failed_count += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Assignment update failed");
                failed_count += 1;
            }
        }
    }

    for assignment in &applied {
        let entry = CreateActivityEntry {
            complaint_id: assignment.complaint_id,
            user_id: body.actor_id,
            action_type: ACTION_ASSIGNED.to_string(),
            description: format!("Complaint assigned to admin {}", assignment.assignee_id),
            metadata: json!({
                "assignee_id": assignment.assignee_id,
                "via": "workload_balancer",
            }),
        };
        if let Err(e) = ActivityRepo::create(&state.pool, &entry).await {
            tracing::error!(
                complaint_id = assignment.complaint_id,
                error = %e,
                "Failed to record balance activity"
            );
        }
    }

    Ok(Json(DataResponse {
        data: BalanceResponse {
            outcome: plan.outcome,
            attempted: plan.assignments.len(),
            assigned_count: applied.len(),
            failed_count,
            eligible_count: plan.eligible_count,
            roster_size: plan.roster_size,
            assignments: applied,
        },
    }))
}
