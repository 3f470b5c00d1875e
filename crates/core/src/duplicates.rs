//! Keyword co-occurrence grouping for systemic-issue detection.
//!
//! Buckets complaints by a fixed vocabulary of campus issue keywords using
//! naive substring containment. No stemming, no semantic similarity: the
//! output is an explainable triage signal, not a duplicate detector of
//! record.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Campus issue keywords scanned for in complaint text.
pub const ISSUE_KEYWORDS: &[&str] = &[
    "wifi",
    "internet",
    "network",
    "laptop",
    "computer",
    "projector",
    "ac",
    "air conditioner",
    "fan",
    "light",
    "electricity",
    "power",
    "hostel",
    "mess",
    "food",
    "water",
    "toilet",
    "bathroom",
    "mentor",
    "faculty",
    "teacher",
    "class",
    "schedule",
    "timetable",
    "lab",
    "library",
    "canteen",
    "parking",
    "security",
];

/// Minimum bucket size before a keyword group is reported.
pub const DEFAULT_GROUP_THRESHOLD: usize = 3;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The text a complaint contributes to keyword matching.
#[derive(Debug, Clone)]
pub struct DuplicateInput {
    pub complaint_id: DbId,
    pub title: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// A member of a reported keyword group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupMember {
    pub complaint_id: DbId,
    pub title: String,
    pub created_at: Timestamp,
}

/// A keyword bucket that met the reporting threshold.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Display-capitalized keyword, e.g. `Wifi`.
    pub keyword: String,
    pub count: usize,
    /// Members sorted newest first.
    pub complaints: Vec<GroupMember>,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Bucket complaints by keyword and report buckets of `threshold` or more.
///
/// Matching is case-insensitive substring containment over the concatenated
/// title and description. A complaint is counted at most once per bucket.
/// Groups are sorted by size descending (keyword ascending on ties) and
/// members by recency descending.
pub fn detect_duplicate_groups(
    complaints: &[DuplicateInput],
    threshold: usize,
) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for keyword in ISSUE_KEYWORDS {
        let mut members: Vec<GroupMember> = Vec::new();

        for complaint in complaints {
            let text = format!("{} {}", complaint.title, complaint.description).to_lowercase();
            if !text.contains(keyword) {
                continue;
            }
            if members.iter().any(|m| m.complaint_id == complaint.complaint_id) {
                continue;
            }
            members.push(GroupMember {
                complaint_id: complaint.complaint_id,
                title: complaint.title.clone(),
                created_at: complaint.created_at,
            });
        }

        if members.len() >= threshold.max(1) {
            members.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            groups.push(DuplicateGroup {
                keyword: capitalize(keyword),
                count: members.len(),
                complaints: members,
            });
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count).then(a.keyword.cmp(&b.keyword)));
    groups
}

/// Upper-case the first character for display.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn input(id: DbId, title: &str, description: &str, age_hours: i64) -> DuplicateInput {
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        DuplicateInput {
            complaint_id: id,
            title: title.to_string(),
            description: description.to_string(),
            created_at: base - Duration::hours(age_hours),
        }
    }

    #[test]
    fn groups_at_threshold_reported_below_excluded() {
        let complaints = vec![
            input(1, "Wifi down in block A", "No wifi since morning", 1),
            input(2, "WiFi keeps dropping", "laptop disconnects constantly", 2),
            input(3, "Cannot connect", "the wifi router in the library is dead", 3),
            input(4, "Hostel water issue", "no hot water", 4),
            input(5, "Hostel mess timing", "dinner closes too early", 5),
        ];

        let groups = detect_duplicate_groups(&complaints, 3);

        let keywords: Vec<&str> = groups.iter().map(|g| g.keyword.as_str()).collect();
        assert!(keywords.contains(&"Wifi"));
        assert!(!keywords.contains(&"Hostel"));

        let wifi = groups.iter().find(|g| g.keyword == "Wifi").unwrap();
        assert_eq!(wifi.count, 3);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let complaints = vec![
            input(1, "WIFI outage", "", 1),
            input(2, "Wifi outage", "", 2),
            input(3, "wifi outage", "", 3),
        ];
        let groups = detect_duplicate_groups(&complaints, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 3);
    }

    #[test]
    fn complaint_counted_once_per_bucket() {
        // "wifi" appears in both title and description; must not double-count.
        let complaints = vec![
            input(1, "wifi broken", "the wifi is broken", 1),
            input(2, "wifi slow", "wifi crawls at night", 2),
            input(3, "wifi dead", "wifi gone again", 3),
        ];
        let groups = detect_duplicate_groups(&complaints, 3);
        assert_eq!(groups[0].count, 3);
    }

    #[test]
    fn members_sorted_newest_first() {
        let complaints = vec![
            input(1, "wifi a", "", 10),
            input(2, "wifi b", "", 1),
            input(3, "wifi c", "", 5),
        ];
        let groups = detect_duplicate_groups(&complaints, 3);
        let ids: Vec<DbId> = groups[0].complaints.iter().map(|m| m.complaint_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn groups_sorted_by_count_descending() {
        let mut complaints = Vec::new();
        for i in 0..3 {
            complaints.push(input(i, "hostel issue", "", i));
        }
        for i in 10..14 {
            complaints.push(input(i, "wifi issue", "", i));
        }

        let groups = detect_duplicate_groups(&complaints, 3);
        assert_eq!(groups[0].keyword, "Wifi");
        assert_eq!(groups[0].count, 4);
        assert_eq!(groups[1].keyword, "Hostel");
        assert_eq!(groups[1].count, 3);
    }

    #[test]
    fn one_complaint_can_join_multiple_buckets() {
        let complaints = vec![
            input(1, "wifi in hostel", "", 1),
            input(2, "wifi in hostel", "", 2),
            input(3, "wifi in hostel", "", 3),
        ];
        let groups = detect_duplicate_groups(&complaints, 3);
        let keywords: Vec<&str> = groups.iter().map(|g| g.keyword.as_str()).collect();
        assert!(keywords.contains(&"Wifi"));
        assert!(keywords.contains(&"Hostel"));
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(detect_duplicate_groups(&[], 3).is_empty());
    }

    #[test]
    fn keyword_capitalized_for_display() {
        assert_eq!(capitalize("wifi"), "Wifi");
        assert_eq!(capitalize("air conditioner"), "Air conditioner");
        assert_eq!(capitalize(""), "");
    }
}
