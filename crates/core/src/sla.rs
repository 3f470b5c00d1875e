//! Service-level agreement evaluation.
//!
//! A complaint is overdue when it has stayed unresolved for more than
//! [`SLA_HOURS`] hours after submission. Pure functions over explicit clock
//! values, with wall-clock wrappers for callers that want `Utc::now()`.

use chrono::Utc;

use crate::complaint::ComplaintStatus;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Resolution deadline in hours. A single threshold for all categories;
/// per-category thresholds would hang off this constant.
pub const SLA_HOURS: i64 = 48;

// ---------------------------------------------------------------------------
// Overdue predicate
// ---------------------------------------------------------------------------

/// Whether a complaint is past its SLA at the given instant.
///
/// Resolved complaints are never overdue, regardless of age. The threshold
/// is strict: a complaint aged exactly [`SLA_HOURS`] is not yet overdue.
pub fn is_overdue_at(
    created_at: Timestamp,
    status: ComplaintStatus,
    resolved_at: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    if !status.is_live() || resolved_at.is_some() {
        return false;
    }
    elapsed_hours(created_at, now) > SLA_HOURS as f64
}

/// Wall-clock wrapper over [`is_overdue_at`].
pub fn is_overdue(
    created_at: Timestamp,
    status: ComplaintStatus,
    resolved_at: Option<Timestamp>,
) -> bool {
    is_overdue_at(created_at, status, resolved_at, Utc::now())
}

// ---------------------------------------------------------------------------
// Breach magnitude
// ---------------------------------------------------------------------------

/// Hours past the SLA deadline at the given instant. Never negative.
pub fn overdue_hours_at(created_at: Timestamp, now: Timestamp) -> f64 {
    (elapsed_hours(created_at, now) - SLA_HOURS as f64).max(0.0)
}

/// Wall-clock wrapper over [`overdue_hours_at`].
pub fn overdue_hours(created_at: Timestamp) -> f64 {
    overdue_hours_at(created_at, Utc::now())
}

/// Fractional hours between two instants.
fn elapsed_hours(from: Timestamp, to: Timestamp) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 timestamp into UTC.
///
/// Malformed input is a distinct error kind so callers can tell it apart
/// from a legitimately absent value.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, CoreError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::InvalidTimestamp(format!("'{s}': {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;

    use super::*;

    fn now() -> Timestamp {
        parse_timestamp("2024-03-10T12:00:00Z").unwrap()
    }

    // -- is_overdue_at --------------------------------------------------------

    #[test]
    fn resolved_is_never_overdue() {
        let created = now() - Duration::days(30);
        assert!(!is_overdue_at(
            created,
            ComplaintStatus::Resolved,
            Some(now()),
            now()
        ));
    }

    #[test]
    fn resolved_without_timestamp_still_not_overdue() {
        let created = now() - Duration::days(30);
        assert!(!is_overdue_at(created, ComplaintStatus::Resolved, None, now()));
    }

    #[test]
    fn exactly_48_hours_is_not_overdue() {
        let created = now() - Duration::hours(SLA_HOURS);
        assert!(!is_overdue_at(created, ComplaintStatus::Open, None, now()));
    }

    #[test]
    fn one_second_past_48_hours_is_overdue() {
        let created = now() - Duration::hours(SLA_HOURS) - Duration::seconds(1);
        assert!(is_overdue_at(created, ComplaintStatus::Open, None, now()));
    }

    #[test]
    fn in_progress_past_sla_is_overdue() {
        let created = now() - Duration::hours(SLA_HOURS + 10);
        assert!(is_overdue_at(
            created,
            ComplaintStatus::InProgress,
            None,
            now()
        ));
    }

    #[test]
    fn fresh_complaint_is_not_overdue() {
        let created = now() - Duration::hours(1);
        assert!(!is_overdue_at(created, ComplaintStatus::Open, None, now()));
    }

    // -- overdue_hours_at -----------------------------------------------------

    #[test]
    fn overdue_hours_never_negative() {
        let created = now() - Duration::hours(1);
        assert_eq!(overdue_hours_at(created, now()), 0.0);
    }

    #[test]
    fn overdue_hours_at_deadline_is_zero() {
        let created = now() - Duration::hours(SLA_HOURS);
        assert_eq!(overdue_hours_at(created, now()), 0.0);
    }

    #[test]
    fn overdue_hours_measures_breach_magnitude() {
        let created = now() - Duration::hours(SLA_HOURS + 6);
        let breach = overdue_hours_at(created, now());
        assert!((breach - 6.0).abs() < 1e-9);
    }

    #[test]
    fn overdue_hours_monotone_in_elapsed_time() {
        let created = now() - Duration::hours(SLA_HOURS);
        let mut prev = overdue_hours_at(created, now());
        for h in 1..=12 {
            let later = overdue_hours_at(created, now() + Duration::hours(h));
            assert!(later >= prev);
            prev = later;
        }
    }

    // -- parse_timestamp ------------------------------------------------------

    #[test]
    fn parses_rfc3339() {
        let ts = parse_timestamp("2024-03-10T12:00:00+05:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-10T06:30:00+00:00");
    }

    #[test]
    fn malformed_timestamp_is_distinct_error() {
        assert_matches!(
            parse_timestamp("yesterday"),
            Err(CoreError::InvalidTimestamp(_))
        );
        assert_matches!(parse_timestamp(""), Err(CoreError::InvalidTimestamp(_)));
    }
}
