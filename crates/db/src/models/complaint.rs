//! Complaint entity models and DTOs.

use redress_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Complaint entity
// ---------------------------------------------------------------------------

/// A complaint row. Never physically deleted; lifecycle is status-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complaint {
    pub id: DbId,
    /// Opaque token for unauthenticated status checks.
    pub public_token: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub urgency: String,
    pub status: String,
    pub is_anonymous: bool,
    pub student_id: DbId,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// DTO for inserting a new complaint. Status starts as `open`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComplaint {
    pub title: String,
    pub description: String,
    pub category: String,
    pub urgency: String,
    pub is_anonymous: bool,
    pub student_id: DbId,
}

/// DTO for patching complaint fields. Status and assignment have dedicated
/// repository operations and are not patchable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComplaint {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub urgency: Option<String>,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filter parameters for listing complaints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub urgency: Option<String>,
    pub student_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    /// When `true`, only complaints with no assignee.
    pub unassigned: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// A `(value, count)` aggregation row for status/category/urgency rollups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CountByValue {
    pub value: String,
    pub count: i64,
}
