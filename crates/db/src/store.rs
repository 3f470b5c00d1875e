//! Postgres-backed implementation of the core complaint-store seam.

use async_trait::async_trait;
use redress_core::error::CoreError;
use redress_core::store::{ComplaintStore, NewActivityEntry, NewComment, StaleCandidate};
use redress_core::types::{DbId, Timestamp};

use crate::models::activity::CreateActivityEntry;
use crate::models::comment::CreateComment;
use crate::repositories::{ActivityRepo, CommentRepo, ComplaintRepo};
use crate::DbPool;

/// [`ComplaintStore`] over the production Postgres pool.
#[derive(Clone)]
pub struct PgComplaintStore {
    pool: DbPool,
}

impl PgComplaintStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintStore for PgComplaintStore {
    async fn stale_candidates(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<StaleCandidate>, CoreError> {
        let rows = ComplaintRepo::list_live_stale(&self.pool, cutoff)
            .await
            .map_err(storage_err)?;
        Ok(rows
            .into_iter()
            .map(|c| StaleCandidate {
                complaint_id: c.id,
                title: c.title,
                submitter_id: c.student_id,
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn has_activity_since(
        &self,
        complaint_id: DbId,
        since: Timestamp,
    ) -> Result<bool, CoreError> {
        CommentRepo::has_comment_since(&self.pool, complaint_id, since)
            .await
            .map_err(storage_err)
    }

    async fn close_if_live(
        &self,
        complaint_id: DbId,
        resolved_at: Timestamp,
    ) -> Result<bool, CoreError> {
        ComplaintRepo::close_if_live(&self.pool, complaint_id, resolved_at)
            .await
            .map_err(storage_err)
    }

    async fn add_comment(&self, comment: NewComment) -> Result<(), CoreError> {
        CommentRepo::create(
            &self.pool,
            &CreateComment {
                complaint_id: comment.complaint_id,
                user_id: comment.author_id,
                message: comment.message,
            },
        )
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn record_activity(&self, entry: NewActivityEntry) -> Result<(), CoreError> {
        redress_core::activity::validate_action_type(&entry.action_type)?;
        ActivityRepo::create(
            &self.pool,
            &CreateActivityEntry {
                complaint_id: entry.complaint_id,
                user_id: entry.actor_id,
                action_type: entry.action_type,
                description: entry.description,
                metadata: entry.metadata,
            },
        )
        .await
        .map_err(storage_err)?;
        Ok(())
    }
}

fn storage_err(e: sqlx::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}
