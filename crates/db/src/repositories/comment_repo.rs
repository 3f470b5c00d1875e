//! Repository for the `comments` table.

use redress_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list for `comments` queries.
const COLUMNS: &str = "id, complaint_id, user_id, message, created_at";

/// Provides insert and query operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment to a complaint.
    pub async fn create(pool: &PgPool, dto: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (complaint_id, user_id, message) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(dto.complaint_id)
            .bind(dto.user_id)
            .bind(&dto.message)
            .fetch_one(pool)
            .await
    }

    /// List comments for a complaint, oldest first.
    pub async fn list_for_complaint(
        pool: &PgPool,
        complaint_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments \
             WHERE complaint_id = $1 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(complaint_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any comment on the complaint was created at or after `since`.
    ///
    /// Existence check only; used by the stale-complaint batch to spare
    /// complaints with recent discussion.
    pub async fn has_comment_since(
        pool: &PgPool,
        complaint_id: DbId,
        since: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
                SELECT 1 FROM comments \
                WHERE complaint_id = $1 AND created_at >= $2)",
        )
        .bind(complaint_id)
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
