//! Complaint status, category, and urgency enumerations plus field validators.
//!
//! The database stores these as TEXT (with CHECK constraints); this module is
//! the single source of truth for the accepted values and their parsing.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_OPEN: &str = "open";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_RESOLVED: &str = "resolved";

/// All valid complaint statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_IN_PROGRESS, STATUS_RESOLVED];

// ---------------------------------------------------------------------------
// Category constants
// ---------------------------------------------------------------------------

pub const CATEGORY_TECHNICAL: &str = "technical";
pub const CATEGORY_FACILITIES: &str = "facilities";
pub const CATEGORY_CURRICULUM: &str = "curriculum";
pub const CATEGORY_MENTORSHIP: &str = "mentorship";
pub const CATEGORY_OTHER: &str = "other";

/// All valid complaint categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_TECHNICAL,
    CATEGORY_FACILITIES,
    CATEGORY_CURRICULUM,
    CATEGORY_MENTORSHIP,
    CATEGORY_OTHER,
];

// ---------------------------------------------------------------------------
// Urgency constants
// ---------------------------------------------------------------------------

pub const URGENCY_LOW: &str = "low";
pub const URGENCY_MEDIUM: &str = "medium";
pub const URGENCY_HIGH: &str = "high";
pub const URGENCY_URGENT: &str = "urgent";

/// All valid urgency levels.
pub const VALID_URGENCIES: &[&str] = &[URGENCY_LOW, URGENCY_MEDIUM, URGENCY_HIGH, URGENCY_URGENT];

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

/// Maximum length for a complaint title.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length for a complaint description.
pub const MAX_DESCRIPTION_LEN: usize = 5_000;

/// Maximum length for a comment message.
pub const MAX_COMMENT_LEN: usize = 2_000;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Complaint lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => STATUS_OPEN,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Resolved => STATUS_RESOLVED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_OPEN => Ok(Self::Open),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_RESOLVED => Ok(Self::Resolved),
            other => Err(CoreError::Validation(format!(
                "Unknown status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether a complaint in this status is still live (not resolved).
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Resolved)
    }
}

/// Complaint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Technical,
    Facilities,
    Curriculum,
    Mentorship,
    Other,
}

impl ComplaintCategory {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => CATEGORY_TECHNICAL,
            Self::Facilities => CATEGORY_FACILITIES,
            Self::Curriculum => CATEGORY_CURRICULUM,
            Self::Mentorship => CATEGORY_MENTORSHIP,
            Self::Other => CATEGORY_OTHER,
        }
    }

    /// Parse from a string, returning an error for unknown categories.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            CATEGORY_TECHNICAL => Ok(Self::Technical),
            CATEGORY_FACILITIES => Ok(Self::Facilities),
            CATEGORY_CURRICULUM => Ok(Self::Curriculum),
            CATEGORY_MENTORSHIP => Ok(Self::Mentorship),
            CATEGORY_OTHER => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "Unknown category: '{other}'. Valid categories: {}",
                VALID_CATEGORIES.join(", ")
            ))),
        }
    }
}

/// Complaint urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Urgent,
}

impl Urgency {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => URGENCY_LOW,
            Self::Medium => URGENCY_MEDIUM,
            Self::High => URGENCY_HIGH,
            Self::Urgent => URGENCY_URGENT,
        }
    }

    /// Parse from a string, returning an error for unknown urgencies.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            URGENCY_LOW => Ok(Self::Low),
            URGENCY_MEDIUM => Ok(Self::Medium),
            URGENCY_HIGH => Ok(Self::High),
            URGENCY_URGENT => Ok(Self::Urgent),
            other => Err(CoreError::Validation(format!(
                "Unknown urgency: '{other}'. Valid urgencies: {}",
                VALID_URGENCIES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

/// Validate that a complaint title is non-empty and within length limits.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Title must not be empty".to_string(),
        ));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that a complaint description is non-empty and within length limits.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Description must not be empty".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that a comment message is non-empty and within length limits.
pub fn validate_comment_message(message: &str) -> Result<(), CoreError> {
    if message.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment must not be empty".to_string(),
        ));
    }
    if message.len() > MAX_COMMENT_LEN {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Status ---------------------------------------------------------------

    #[test]
    fn status_as_str() {
        assert_eq!(ComplaintStatus::Open.as_str(), "open");
        assert_eq!(ComplaintStatus::InProgress.as_str(), "in_progress");
        assert_eq!(ComplaintStatus::Resolved.as_str(), "resolved");
    }

    #[test]
    fn status_from_str_valid() {
        assert_eq!(
            ComplaintStatus::from_str("open").unwrap(),
            ComplaintStatus::Open
        );
        assert_eq!(
            ComplaintStatus::from_str("in_progress").unwrap(),
            ComplaintStatus::InProgress
        );
        assert_eq!(
            ComplaintStatus::from_str("resolved").unwrap(),
            ComplaintStatus::Resolved
        );
    }

    #[test]
    fn status_from_str_invalid() {
        assert!(ComplaintStatus::from_str("closed").is_err());
        assert!(ComplaintStatus::from_str("").is_err());
    }

    #[test]
    fn resolved_is_not_live() {
        assert!(ComplaintStatus::Open.is_live());
        assert!(ComplaintStatus::InProgress.is_live());
        assert!(!ComplaintStatus::Resolved.is_live());
    }

    // -- Category -------------------------------------------------------------

    #[test]
    fn category_round_trip() {
        for s in VALID_CATEGORIES {
            assert_eq!(ComplaintCategory::from_str(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn category_from_str_invalid() {
        assert!(ComplaintCategory::from_str("sports").is_err());
    }

    // -- Urgency --------------------------------------------------------------

    #[test]
    fn urgency_round_trip() {
        for s in VALID_URGENCIES {
            assert_eq!(Urgency::from_str(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn urgency_from_str_invalid() {
        assert!(Urgency::from_str("critical").is_err());
    }

    // -- Validators -----------------------------------------------------------

    #[test]
    fn valid_title_accepted() {
        assert!(validate_title("Projector broken in lab 3").is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn long_title_rejected() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(validate_title(&long).is_err());
    }

    #[test]
    fn max_length_title_accepted() {
        let exact = "x".repeat(MAX_TITLE_LEN);
        assert!(validate_title(&exact).is_ok());
    }

    #[test]
    fn empty_description_rejected() {
        assert!(validate_description("").is_err());
    }

    #[test]
    fn long_description_rejected() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_description(&long).is_err());
    }

    #[test]
    fn empty_comment_rejected() {
        assert!(validate_comment_message("").is_err());
        assert!(validate_comment_message("  \n").is_err());
    }

    #[test]
    fn reasonable_comment_accepted() {
        assert!(validate_comment_message("Following up on this today.").is_ok());
    }
}
