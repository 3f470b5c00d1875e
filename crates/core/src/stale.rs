//! Stale-complaint closure policy.
//!
//! The pure half of the auto-close batch: cutoff arithmetic, the text and
//! metadata written alongside a closure, and the run report. The I/O half
//! lives in the worker crate behind [`crate::store::ComplaintStore`].

use chrono::Duration;
use serde::Serialize;
use serde_json::json;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Days of inactivity before a live complaint becomes an auto-close candidate.
pub const DEFAULT_STALE_DAYS: i64 = 5;

/// Metadata `reason` value recorded on every auto-closure.
pub const REASON_STALE_COMPLAINT: &str = "stale_complaint";

// ---------------------------------------------------------------------------
// Cutoff
// ---------------------------------------------------------------------------

/// Validate a stale window. Zero or negative windows would close everything.
pub fn validate_stale_days(stale_days: i64) -> Result<(), CoreError> {
    if stale_days < 1 {
        return Err(CoreError::Validation(format!(
            "Stale window must be at least 1 day, got {stale_days}"
        )));
    }
    Ok(())
}

/// The instant before which a complaint's last update counts as stale.
pub fn stale_cutoff(now: Timestamp, stale_days: i64) -> Timestamp {
    now - Duration::days(stale_days)
}

// ---------------------------------------------------------------------------
// Closure records
// ---------------------------------------------------------------------------

/// Comment body appended to an auto-closed complaint.
pub fn auto_close_message(stale_days: i64) -> String {
    format!(
        "This complaint was automatically closed due to {stale_days} days of inactivity. \
         If the issue persists, please reopen or create a new complaint."
    )
}

/// Activity-feed description for an auto-closure.
pub fn auto_close_description(title: &str) -> String {
    format!("Complaint \"{title}\" was auto-closed due to inactivity")
}

/// Activity-feed metadata for an auto-closure.
pub fn auto_close_metadata(stale_days: i64) -> serde_json::Value {
    json!({
        "reason": REASON_STALE_COMPLAINT,
        "days_inactive": stale_days,
    })
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Summary of one reaper run.
///
/// `attempted` counts candidates that survived the recent-activity check;
/// a gap between `attempted` and `closed_count` means per-item failures or
/// complaints another run closed first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReaperReport {
    pub attempted: usize,
    pub closed_count: usize,
    pub closed_ids: Vec<DbId>,
    /// Candidates skipped because a comment landed after the cutoff.
    pub skipped_active: usize,
    pub failed_count: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn cutoff_is_stale_days_before_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let cutoff = stale_cutoff(now, 5);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap());
    }

    #[test]
    fn stale_days_must_be_positive() {
        assert!(validate_stale_days(1).is_ok());
        assert!(validate_stale_days(5).is_ok());
        assert_matches!(validate_stale_days(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_stale_days(-3), Err(CoreError::Validation(_)));
    }

    #[test]
    fn close_message_names_the_window() {
        let msg = auto_close_message(5);
        assert!(msg.contains("5 days of inactivity"));
        assert!(msg.contains("reopen"));
    }

    #[test]
    fn close_description_names_the_complaint() {
        let desc = auto_close_description("Wifi down");
        assert_eq!(desc, "Complaint \"Wifi down\" was auto-closed due to inactivity");
    }

    #[test]
    fn close_metadata_carries_reason_and_window() {
        let meta = auto_close_metadata(7);
        assert_eq!(meta["reason"], "stale_complaint");
        assert_eq!(meta["days_inactive"], 7);
    }
}
