//! Activity-feed entity model and create DTO.
//!
//! The feed is append-only: entries have no `updated_at` and are never
//! modified or deleted.

use redress_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single activity-feed entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub complaint_id: DbId,
    pub user_id: DbId,
    pub action_type: String,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for appending a new activity entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivityEntry {
    pub complaint_id: DbId,
    pub user_id: DbId,
    pub action_type: String,
    pub description: String,
    pub metadata: serde_json::Value,
}
