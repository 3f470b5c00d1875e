//! Handlers for complaint CRUD, status changes, and assignment.
//!
//! Every mutating endpoint appends an activity-feed entry so the audit trail
//! stays complete. Identity is supplied by the caller (`student_id` /
//! `actor_id`); authentication is handled upstream of this service.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use redress_core::activity::{ACTION_ASSIGNED, ACTION_CREATED, ACTION_STATUS_CHANGED, ACTION_UNASSIGNED};
use redress_core::complaint::{
    self, ComplaintCategory, ComplaintStatus, Urgency,
};
use redress_core::error::CoreError;
use redress_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use redress_core::types::DbId;
use redress_db::models::activity::CreateActivityEntry;
use redress_db::models::complaint::{Complaint, ComplaintQuery, CreateComplaint, UpdateComplaint};
use redress_db::repositories::{ActivityRepo, ComplaintRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for creating a complaint.
#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub urgency: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub student_id: DbId,
}

/// Request body for patching complaint fields.
#[derive(Debug, Deserialize)]
pub struct UpdateComplaintRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub urgency: Option<String>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
    /// Who performed the change (recorded in the activity feed).
    pub actor_id: DbId,
}

/// Request body for assignment. `assignee_id: null` unassigns.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub assignee_id: Option<DbId>,
    /// Who performed the change (recorded in the activity feed).
    pub actor_id: DbId,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Paginated complaint listing.
#[derive(Debug, Serialize)]
pub struct ComplaintPage {
    pub items: Vec<Complaint>,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/complaints
///
/// List complaints with optional filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ComplaintQuery>,
) -> AppResult<impl IntoResponse> {
    validate_filters(&params)?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = ComplaintRepo::list(&state.pool, &params, limit, offset).await?;
    let total = ComplaintRepo::count(&state.pool, &params).await?;

    Ok(Json(DataResponse {
        data: ComplaintPage { items, total },
    }))
}

/// POST /api/v1/complaints
///
/// Create a complaint and log the `created` activity entry.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateComplaintRequest>,
) -> AppResult<impl IntoResponse> {
    complaint::validate_title(&body.title)?;
    complaint::validate_description(&body.description)?;
    ComplaintCategory::from_str(&body.category)?;
    let urgency = match body.urgency {
        Some(ref u) => Urgency::from_str(u)?,
        None => Urgency::Medium,
    };

    let created = ComplaintRepo::create(
        &state.pool,
        &CreateComplaint {
            title: body.title,
            description: body.description,
            category: body.category,
            urgency: urgency.as_str().to_string(),
            is_anonymous: body.is_anonymous,
            student_id: body.student_id,
        },
    )
    .await?;

    log_activity(
        &state,
        created.id,
        body.student_id,
        ACTION_CREATED,
        format!("Complaint \"{}\" was submitted", created.title),
        json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: created }))
}

/// GET /api/v1/complaints/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = ComplaintRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "complaint",
            id,
        })?;
    Ok(Json(DataResponse { data: found }))
}

/// PATCH /api/v1/complaints/{id}
///
/// Update title, description, category, or urgency. Status and assignment
/// have dedicated endpoints.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateComplaintRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = body.title {
        complaint::validate_title(title)?;
    }
    if let Some(ref description) = body.description {
        complaint::validate_description(description)?;
    }
    if let Some(ref category) = body.category {
        ComplaintCategory::from_str(category)?;
    }
    if let Some(ref urgency) = body.urgency {
        Urgency::from_str(urgency)?;
    }

    let updated = ComplaintRepo::update(
        &state.pool,
        id,
        &UpdateComplaint {
            title: body.title,
            description: body.description,
            category: body.category,
            urgency: body.urgency,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "complaint",
        id,
    })?;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Status changes
// ---------------------------------------------------------------------------

/// PUT /api/v1/complaints/{id}/status
///
/// Change the status. `resolved_at` is set exactly when the new status is
/// `resolved` and cleared otherwise, keeping the invariant in one place.
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let new_status = ComplaintStatus::from_str(&body.status)?;

    let existing = ComplaintRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "complaint",
            id,
        })?;

    let resolved_at = match new_status {
        ComplaintStatus::Resolved => Some(Utc::now()),
        _ => None,
    };

    let updated = ComplaintRepo::set_status(&state.pool, id, new_status.as_str(), resolved_at)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "complaint",
            id,
        })?;

    log_activity(
        &state,
        id,
        body.actor_id,
        ACTION_STATUS_CHANGED,
        format!(
            "Status changed from {} to {}",
            existing.status,
            new_status.as_str()
        ),
        json!({ "from": existing.status, "to": new_status.as_str() }),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// PUT /api/v1/complaints/{id}/assign
///
/// Assign a complaint to an admin, or unassign with a null `assignee_id`.
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = ComplaintRepo::assign(&state.pool, id, body.assignee_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "complaint",
            id,
        })?;

    let (action, description) = match body.assignee_id {
        Some(assignee) => (
            ACTION_ASSIGNED,
            format!("Complaint assigned to admin {assignee}"),
        ),
        None => (ACTION_UNASSIGNED, "Complaint unassigned".to_string()),
    };

    log_activity(
        &state,
        id,
        body.actor_id,
        action,
        description,
        json!({ "assignee_id": body.assignee_id }),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject filter values outside the known enumerations.
fn validate_filters(params: &ComplaintQuery) -> Result<(), CoreError> {
    if let Some(ref status) = params.status {
        ComplaintStatus::from_str(status)?;
    }
    if let Some(ref category) = params.category {
        ComplaintCategory::from_str(category)?;
    }
    if let Some(ref urgency) = params.urgency {
        Urgency::from_str(urgency)?;
    }
    Ok(())
}

/// Append an activity entry, logging (not propagating) failures.
///
/// The feed is best-effort from the API's perspective: a feed write failure
/// must not fail the mutation it documents.
pub(crate) async fn log_activity(
    state: &AppState,
    complaint_id: DbId,
    actor_id: DbId,
    action_type: &str,
    description: String,
    metadata: serde_json::Value,
) {
    let entry = CreateActivityEntry {
        complaint_id,
        user_id: actor_id,
        action_type: action_type.to_string(),
        description,
        metadata,
    };
    if let Err(e) = ActivityRepo::create(&state.pool, &entry).await {
        tracing::error!(complaint_id, action_type, error = %e, "Failed to record activity");
    }
}
