//! Data-store seam consumed by batch logic.
//!
//! The auto-close batch talks to the complaint store exclusively through
//! [`ComplaintStore`], so the batch semantics can be exercised against an
//! in-memory implementation while production wires in the Postgres-backed
//! one from the db crate.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A live complaint whose `updated_at` predates the stale cutoff.
#[derive(Debug, Clone)]
pub struct StaleCandidate {
    pub complaint_id: DbId,
    pub title: String,
    pub submitter_id: DbId,
    pub updated_at: Timestamp,
}

/// A comment to append to a complaint.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub complaint_id: DbId,
    pub author_id: DbId,
    pub message: String,
}

/// An activity-feed entry to append. Write-once.
#[derive(Debug, Clone)]
pub struct NewActivityEntry {
    pub complaint_id: DbId,
    pub actor_id: DbId,
    pub action_type: String,
    pub description: String,
    pub metadata: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The complaint-store operations the batch layer depends on.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Live (`open`/`in_progress`) complaints last updated before `cutoff`.
    async fn stale_candidates(&self, cutoff: Timestamp)
        -> Result<Vec<StaleCandidate>, CoreError>;

    /// Whether any comment on the complaint was created at or after `since`.
    async fn has_activity_since(
        &self,
        complaint_id: DbId,
        since: Timestamp,
    ) -> Result<bool, CoreError>;

    /// Conditionally resolve a complaint: the transition applies only if the
    /// row is still live. Returns `false` when another writer got there
    /// first, which makes overlapping runs close each complaint at most once.
    async fn close_if_live(
        &self,
        complaint_id: DbId,
        resolved_at: Timestamp,
    ) -> Result<bool, CoreError>;

    /// Append a comment.
    async fn add_comment(&self, comment: NewComment) -> Result<(), CoreError>;

    /// Append an activity-feed entry.
    async fn record_activity(&self, entry: NewActivityEntry) -> Result<(), CoreError>;
}
