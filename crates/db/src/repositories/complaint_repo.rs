//! Repository for the `complaints` table.

use redress_core::complaint::{STATUS_IN_PROGRESS, STATUS_OPEN, STATUS_RESOLVED};
use redress_core::types::{DbId, Timestamp};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::complaint::{
    Complaint, ComplaintQuery, CountByValue, CreateComplaint, UpdateComplaint,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `complaints` SELECT queries.
const COLUMNS: &str = "\
    id, public_token, title, description, category, urgency, status, \
    is_anonymous, student_id, assigned_to, created_at, updated_at, resolved_at";

// ---------------------------------------------------------------------------
// ComplaintRepo
// ---------------------------------------------------------------------------

/// Provides CRUD and batch-support operations for complaints.
pub struct ComplaintRepo;

impl ComplaintRepo {
    /// Insert a new complaint with a fresh public token. Status defaults to
    /// `open` at the schema level.
    pub async fn create(pool: &PgPool, dto: &CreateComplaint) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaints \
             (public_token, title, description, category, urgency, is_anonymous, student_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(Uuid::new_v4())
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(&dto.category)
            .bind(&dto.urgency)
            .bind(dto.is_anonymous)
            .bind(dto.student_id)
            .fetch_one(pool)
            .await
    }

    /// Find a complaint by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a complaint by its public status-check token.
    pub async fn find_by_public_token(
        pool: &PgPool,
        token: Uuid,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE public_token = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List complaints with filtering and pagination, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &ComplaintQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_complaint_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM complaints {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_complaint_values(sqlx::query_as::<_, Complaint>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count complaints matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &ComplaintQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_complaint_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM complaints {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            match val {
                BindValue::BigInt(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
            }
        }
        q.fetch_one(pool).await
    }

    /// Patch mutable complaint fields. Bumps `updated_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateComplaint,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_idx = 2u32; // $1 is id
        let mut bind_values: Vec<String> = Vec::new();

        if let Some(ref title) = dto.title {
            sets.push(format!("title = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(title.clone());
        }
        if let Some(ref description) = dto.description {
            sets.push(format!("description = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(description.clone());
        }
        if let Some(ref category) = dto.category {
            sets.push(format!("category = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(category.clone());
        }
        if let Some(ref urgency) = dto.urgency {
            sets.push(format!("urgency = ${bind_idx}"));
            let _ = bind_idx;
            bind_values.push(urgency.clone());
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE complaints SET {}, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Complaint>(&query).bind(id);
        for val in &bind_values {
            q = q.bind(val.as_str());
        }
        q.fetch_optional(pool).await
    }

    /// Set the complaint status, maintaining the `resolved_at` invariant:
    /// the caller passes `Some(now)` when resolving and `None` otherwise.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        resolved_at: Option<Timestamp>,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints \
             SET status = $2, resolved_at = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(status)
            .bind(resolved_at)
            .fetch_optional(pool)
            .await
    }

    /// Assign or unassign a complaint. Bumps `updated_at`.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assignee: Option<DbId>,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints \
             SET assigned_to = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(assignee)
            .fetch_optional(pool)
            .await
    }

    /// Conditionally resolve a still-live complaint.
    ///
    /// The status filter in the WHERE clause makes the transition atomic:
    /// when two reaper runs overlap, only one of them observes a live row,
    /// so each complaint is closed at most once per stale window.
    pub async fn close_if_live(
        pool: &PgPool,
        id: DbId,
        resolved_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE complaints \
             SET status = '{STATUS_RESOLVED}', resolved_at = $2, updated_at = NOW() \
             WHERE id = $1 AND status IN ('{STATUS_OPEN}', '{STATUS_IN_PROGRESS}')"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(resolved_at)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Live complaints last updated before `cutoff`, oldest first.
    pub async fn list_live_stale(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaints \
             WHERE status IN ('{STATUS_OPEN}', '{STATUS_IN_PROGRESS}') \
               AND updated_at < $1 \
             ORDER BY updated_at ASC"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// All live complaints, newest first (duplicate-group scanning).
    pub async fn list_live(pool: &PgPool) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaints \
             WHERE status <> '{STATUS_RESOLVED}' \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Complaint>(&query).fetch_all(pool).await
    }

    /// Unassigned live complaints, oldest first (balancing candidates).
    pub async fn list_unassigned_live(pool: &PgPool) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaints \
             WHERE assigned_to IS NULL AND status <> '{STATUS_RESOLVED}' \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Complaint>(&query).fetch_all(pool).await
    }

    /// Non-resolved complaints created before `sla_cutoff`, oldest first.
    pub async fn list_overdue(
        pool: &PgPool,
        sla_cutoff: Timestamp,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaints \
             WHERE status <> '{STATUS_RESOLVED}' AND created_at < $1 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(sla_cutoff)
            .fetch_all(pool)
            .await
    }

    /// Count non-resolved complaints created before `sla_cutoff`.
    pub async fn count_overdue(pool: &PgPool, sla_cutoff: Timestamp) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM complaints \
             WHERE status <> '{STATUS_RESOLVED}' AND created_at < $1"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(sla_cutoff)
            .fetch_one(pool)
            .await
    }

    /// Complaint counts grouped by one of the enumerated columns.
    ///
    /// `column` must be a trusted identifier (`status`, `category`,
    /// `urgency`); it is interpolated, not bound.
    pub async fn count_by_column(
        pool: &PgPool,
        column: &str,
    ) -> Result<Vec<CountByValue>, sqlx::Error> {
        let query = format!(
            "SELECT {column} AS value, COUNT(*)::BIGINT AS count \
             FROM complaints GROUP BY {column} ORDER BY count DESC, value ASC"
        );
        sqlx::query_as::<_, CountByValue>(&query).fetch_all(pool).await
    }

    /// Mean hours from creation to resolution across resolved complaints.
    pub async fn avg_resolution_hours(pool: &PgPool) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(EXTRACT(EPOCH FROM (resolved_at - created_at)) / 3600.0)::DOUBLE PRECISION \
             FROM complaints WHERE resolved_at IS NOT NULL",
        )
        .fetch_one(pool)
        .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built complaint queries.
enum BindValue {
    BigInt(i64),
    Text(String),
}

/// Build a WHERE clause and bind values from `ComplaintQuery` filters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_complaint_filter(params: &ComplaintQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.clone()));
    }

    if let Some(ref category) = params.category {
        conditions.push(format!("category = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(category.clone()));
    }

    if let Some(ref urgency) = params.urgency {
        conditions.push(format!("urgency = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(urgency.clone()));
    }

    if let Some(student_id) = params.student_id {
        conditions.push(format!("student_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(student_id));
    }

    if let Some(assigned_to) = params.assigned_to {
        conditions.push(format!("assigned_to = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(assigned_to));
    }

    if params.unassigned == Some(true) {
        conditions.push("assigned_to IS NULL".to_string());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_complaint_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
