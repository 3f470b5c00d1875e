//! Comment entity model and create DTO.

use redress_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment on a complaint. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub complaint_id: DbId,
    pub user_id: DbId,
    pub message: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub complaint_id: DbId,
    pub user_id: DbId,
    pub message: String,
}
