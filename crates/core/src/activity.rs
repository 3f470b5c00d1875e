//! Activity-feed action types.
//!
//! The feed is an append-only audit trail; every mutating action writes one
//! entry with one of these action types. Entries are never updated or
//! deleted.

use crate::error::CoreError;

pub const ACTION_CREATED: &str = "created";
pub const ACTION_STATUS_CHANGED: &str = "status_changed";
pub const ACTION_ASSIGNED: &str = "assigned";
pub const ACTION_UNASSIGNED: &str = "unassigned";
pub const ACTION_COMMENTED: &str = "commented";
pub const ACTION_AUTO_CLOSED: &str = "auto_closed";

/// All valid action types.
pub const VALID_ACTION_TYPES: &[&str] = &[
    ACTION_CREATED,
    ACTION_STATUS_CHANGED,
    ACTION_ASSIGNED,
    ACTION_UNASSIGNED,
    ACTION_COMMENTED,
    ACTION_AUTO_CLOSED,
];

/// Validate that `action` is one of the known action types.
pub fn validate_action_type(action: &str) -> Result<(), CoreError> {
    if VALID_ACTION_TYPES.contains(&action) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown action type '{action}'. Must be one of: {}",
            VALID_ACTION_TYPES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_action_types_accepted() {
        for action in VALID_ACTION_TYPES {
            assert!(validate_action_type(action).is_ok());
        }
    }

    #[test]
    fn unknown_action_type_rejected() {
        assert!(validate_action_type("deleted").is_err());
        assert!(validate_action_type("").is_err());
    }
}
