//! Repository for `profiles` and `user_roles`.
//!
//! Read-only: identity rows are owned by the external auth system.

use redress_core::complaint::STATUS_RESOLVED;
use sqlx::PgPool;

use crate::models::profile::{AdminWorkload, Profile};

/// Role value identifying assignment-eligible users.
const ROLE_ADMIN: &str = "admin";

/// Provides roster queries over profiles and roles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// List all admin profiles (the assignment roster).
    pub async fn list_admins(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            "SELECT p.id, p.full_name, p.email, p.created_at \
             FROM profiles p \
             JOIN user_roles r ON r.user_id = p.id AND r.role = $1 \
             ORDER BY p.full_name ASC, p.id ASC",
        )
        .bind(ROLE_ADMIN)
        .fetch_all(pool)
        .await
    }

    /// Admins with per-admin workload counts recomputed from the complaint
    /// table, least loaded first.
    pub async fn admin_workloads(pool: &PgPool) -> Result<Vec<AdminWorkload>, sqlx::Error> {
        let query = format!(
            "SELECT p.id, p.full_name, p.email, \
                    COUNT(c.id) AS assigned_count, \
                    COUNT(c.id) FILTER (WHERE c.status <> '{STATUS_RESOLVED}') AS active_count \
             FROM profiles p \
             JOIN user_roles r ON r.user_id = p.id AND r.role = $1 \
             LEFT JOIN complaints c ON c.assigned_to = p.id \
             GROUP BY p.id, p.full_name, p.email \
             ORDER BY assigned_count ASC, p.id ASC"
        );
        sqlx::query_as::<_, AdminWorkload>(&query)
            .bind(ROLE_ADMIN)
            .fetch_all(pool)
            .await
    }
}
