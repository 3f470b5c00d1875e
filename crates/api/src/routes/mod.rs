pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /complaints                              list, create
/// /complaints/overdue                      past-SLA complaints with breach hours (GET)
/// /complaints/duplicate-groups             keyword buckets (?threshold) (GET)
/// /complaints/{id}                         get, update (PATCH)
/// /complaints/{id}/status                  status change (PUT)
/// /complaints/{id}/assign                  assign / unassign (PUT)
/// /complaints/{id}/comments                list, add (GET, POST)
/// /complaints/{id}/activity                per-complaint audit trail (GET)
///
/// /activity                                recent feed entries (?limit) (GET)
/// /stats                                   status/category/urgency rollups (GET)
///
/// /admins                                  plain admin roster (GET)
/// /workload                                roster with recomputed loads (GET)
/// /workload/balance                        build + apply assignment plan (POST)
///
/// /maintenance/stale-reaper/run            manual reaper sweep (POST)
///
/// /public/complaints/{token}               anonymous status check (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Complaints.
        .route(
            "/complaints",
            get(handlers::complaints::list).post(handlers::complaints::create),
        )
        .route("/complaints/overdue", get(handlers::sla::list_overdue))
        .route(
            "/complaints/duplicate-groups",
            get(handlers::duplicates::list_groups),
        )
        .route(
            "/complaints/{id}",
            get(handlers::complaints::get).patch(handlers::complaints::update),
        )
        .route("/complaints/{id}/status", put(handlers::complaints::set_status))
        .route("/complaints/{id}/assign", put(handlers::complaints::assign))
        .route(
            "/complaints/{id}/comments",
            get(handlers::comments::list).post(handlers::comments::create),
        )
        .route(
            "/complaints/{id}/activity",
            get(handlers::activity::list_for_complaint),
        )
        // Feed + aggregates.
        .route("/activity", get(handlers::activity::list_recent))
        .route("/stats", get(handlers::stats::overview))
        // Roster + workload distribution.
        .route("/admins", get(handlers::workload::admins))
        .route("/workload", get(handlers::workload::roster))
        .route("/workload/balance", post(handlers::workload::balance))
        // Operator maintenance.
        .route(
            "/maintenance/stale-reaper/run",
            post(handlers::reaper::run_once),
        )
        // Public, unauthenticated status check.
        .route(
            "/public/complaints/{token}",
            get(handlers::public_status::get),
        )
}
