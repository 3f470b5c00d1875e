//! Repository for the `activity_feed` table.
//!
//! Append-only: there are no update or delete operations.

use redress_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::activity::{ActivityEntry, CreateActivityEntry};

/// Column list for `activity_feed` queries.
const COLUMNS: &str = "id, complaint_id, user_id, action_type, description, metadata, created_at";

/// Provides insert and query operations for the activity feed.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append an activity entry.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateActivityEntry,
    ) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_feed \
             (complaint_id, user_id, action_type, description, metadata) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(dto.complaint_id)
            .bind(dto.user_id)
            .bind(&dto.action_type)
            .bind(&dto.description)
            .bind(&dto.metadata)
            .fetch_one(pool)
            .await
    }

    /// List entries for a complaint, newest first.
    pub async fn list_for_complaint(
        pool: &PgPool,
        complaint_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_feed \
             WHERE complaint_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(complaint_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List the most recent entries across all complaints, optionally only
    /// those created at or after `since`.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        since: Option<Timestamp>,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        match since {
            Some(since) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM activity_feed \
                     WHERE created_at >= $1 \
                     ORDER BY created_at DESC \
                     LIMIT $2"
                );
                sqlx::query_as::<_, ActivityEntry>(&query)
                    .bind(since)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM activity_feed \
                     ORDER BY created_at DESC \
                     LIMIT $1"
                );
                sqlx::query_as::<_, ActivityEntry>(&query)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
