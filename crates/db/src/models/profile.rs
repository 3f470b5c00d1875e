//! Profile and roster models.
//!
//! Profiles and roles are provisioned by the external auth system; this
//! service reads them for roster and attribution purposes only.

use redress_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A user profile row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub created_at: Timestamp,
}

/// An admin with workload counts recomputed from the complaint table.
///
/// Counts are always derived on read; nothing persists a running total, so
/// the numbers cannot drift from ground truth.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminWorkload {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    /// All complaints currently assigned, any status.
    pub assigned_count: i64,
    /// Assigned complaints that are still live.
    pub active_count: i64,
}
